use crate::application::catalog::{
    self, BookPage, CatalogApplicationError, ServiceDependencies,
};
use crate::domain::{Book, BookBorrowed, BookReturned, commands::ReturnBook, timestamp};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{
    error::{ApiError, QueryError},
    extract::JsonBody,
    types::{
        BookResponse, BorrowBookRequest, CreateBookRequest, ErrorResponse, ListBooksQuery,
        MessageResponse, UpdateBookRequest, parse_book_id,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

/// パスパラメータをIDに変換する（読めない値は該当なし）
fn book_id_or_not_found(raw: &str) -> Result<crate::domain::BookId, ApiError> {
    parse_book_id(raw).ok_or(ApiError::Application(CatalogApplicationError::BookNotFound))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /books - 書籍一覧（絞り込み・ページ分割）
///
/// クエリパラメータ:
/// - available: "true" / それ以外（オプション）
/// - genre: ジャンル（大文字小文字を区別しない完全一致、オプション）
/// - search: タイトル・著者の部分一致（オプション）
/// - page, limit: ページ番号と件数（不正値は 1 / 10）
///
/// このエンドポイントのレスポンスには `success` フィールドがない。
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListBooksQuery>, QueryRejection>,
) -> Result<Json<BookPage>, QueryError> {
    let Query(query) = query.map_err(|e| QueryError::InternalError(e.to_string()))?;

    let page = catalog::list_books(&state.service_deps, query.to_query())
        .await
        .map_err(|e| QueryError::InternalError(format!("{:?}", e)))?;

    Ok(Json(page))
}

/// GET /books/:id - 書籍詳細をIDで取得
///
/// 見つかった場合は書籍と貸出・返却へのリンクを返し、見つからない場合は404を返す。
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<BookResponse>, QueryError> {
    let Some(book_id) = parse_book_id(&raw_id) else {
        return Err(QueryError::NotFound(raw_id));
    };

    match catalog::get_book(&state.service_deps, book_id).await {
        Ok(book) => Ok(Json(BookResponse::from(book))),
        Err(CatalogApplicationError::BookNotFound) => Err(QueryError::NotFound(raw_id)),
        Err(e) => Err(QueryError::InternalError(format!("{:?}", e))),
    }
}

// ============================================================================
// Command handlers (POST / PUT / DELETE)
// ============================================================================

/// POST /books - 書籍を登録
///
/// 強制されるビジネスルール:
/// - title, author, isbn が指定されていること
/// - ISBNが既存の書籍と重複しないこと
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateBookRequest>,
) -> Result<(StatusCode, Json<MessageResponse<Book>>), ApiError> {
    let cmd = req.to_command(timestamp::now());
    let book = catalog::add_book(&state.service_deps, cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Book added successfully", book)),
    ))
}

/// PUT /books/:id - 書籍情報を部分更新
///
/// 空文字列・0 の項目は無視される（`available` を除く）。
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    JsonBody(req): JsonBody<UpdateBookRequest>,
) -> Result<Json<MessageResponse<Book>>, ApiError> {
    let book_id = book_id_or_not_found(&raw_id)?;
    let cmd = req.to_command(book_id, timestamp::now());
    let book = catalog::update_book(&state.service_deps, cmd).await?;

    Ok(Json(MessageResponse::new("Book updated successfully", book)))
}

/// DELETE /books/:id - 書籍を削除
///
/// 削除した書籍を返す。
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse<Book>>, ApiError> {
    let book_id = book_id_or_not_found(&raw_id)?;
    let book = catalog::remove_book(&state.service_deps, book_id).await?;

    Ok(Json(MessageResponse::new("Book deleted successfully", book)))
}

/// POST /books/:id/borrow - 書籍を貸出
///
/// 強制されるビジネスルール:
/// - 書籍が存在すること
/// - 書籍が貸出可能であること
/// - userId が指定されていること
/// - 返却期限は14日後
pub async fn borrow_book(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    JsonBody(req): JsonBody<BorrowBookRequest>,
) -> Result<Json<MessageResponse<BookBorrowed>>, ApiError> {
    let book_id = book_id_or_not_found(&raw_id)?;
    let cmd = req.to_command(book_id, timestamp::now());
    let event = catalog::borrow_book(&state.service_deps, cmd).await?;

    Ok(Json(MessageResponse::new("Book borrowed successfully", event)))
}

/// POST /books/:id/return - 書籍を返却
///
/// 強制されるビジネスルール:
/// - 書籍が存在すること
/// - 書籍が貸出中であること
pub async fn return_book(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse<BookReturned>>, ApiError> {
    let book_id = book_id_or_not_found(&raw_id)?;

    let cmd = ReturnBook {
        book_id,
        returned_at: timestamp::now(),
    };
    let event = catalog::return_book(&state.service_deps, cmd).await?;

    Ok(Json(MessageResponse::new("Book returned successfully", event)))
}

// ============================================================================
// Fallback
// ============================================================================

/// 未定義のルート・メソッド
pub async fn endpoint_not_found(method: Method, uri: Uri) -> Response {
    let body = ErrorResponse::new("Endpoint not found").with_message(format!(
        "The requested endpoint {} {} does not exist",
        method,
        uri.path()
    ));
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
