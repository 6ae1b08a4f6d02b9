use crate::application::catalog::CatalogApplicationError;
use crate::domain::{RequiredField, timestamp};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::any::Any;

use super::types::ErrorResponse;

/// 内部エラーのレスポンス
///
/// 詳細はログにのみ記録し、クライアントには一般的なメッセージのみを返す。
pub fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal()),
    )
        .into_response()
}

/// ハンドラー内のpanicを500レスポンスに変換する
///
/// `CatchPanicLayer::custom` から呼ばれる。
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);
    internal_error_response()
}

/// API層のエラー型（更新系ハンドラー用）
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub enum ApiError {
    Application(CatalogApplicationError),
    /// リクエストボディをリクエスト型として読めなかった
    InvalidBody(String),
}

impl From<CatalogApplicationError> for ApiError {
    fn from(err: CatalogApplicationError) -> Self {
        ApiError::Application(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            ApiError::Application(err) => err,
            ApiError::InvalidBody(detail) => {
                tracing::error!("Invalid request body: {}", detail);
                return internal_error_response();
            }
        };

        let (status, body) = match err {
            // 404 Not Found - リクエストされた書籍が存在しない
            CatalogApplicationError::BookNotFound => {
                (StatusCode::NOT_FOUND, ErrorResponse::new("Book not found"))
            }

            // 400 Bad Request - 入力不備・状態違反
            CatalogApplicationError::MissingRequiredFields(missing) => {
                let mut body = ErrorResponse::new("Missing required fields");
                body.required = Some(field_names(&RequiredField::ALL));
                body.missing = Some(field_names(&missing));
                (StatusCode::BAD_REQUEST, body)
            }
            CatalogApplicationError::BookNotAvailable {
                borrowed_by,
                expected_return,
            } => {
                let borrower = borrowed_by
                    .as_ref()
                    .map_or("another user", |user| user.as_str());
                let mut body = ErrorResponse::new("Book not available").with_message(format!(
                    "This book is currently borrowed by {}",
                    borrower
                ));
                body.expected_return = Some(
                    expected_return
                        .as_ref()
                        .map_or_else(|| "Unknown".to_string(), timestamp::to_iso_string),
                );
                (StatusCode::BAD_REQUEST, body)
            }
            CatalogApplicationError::UserIdRequired => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("User ID required")
                    .with_message("Please provide the user ID borrowing this book"),
            ),
            CatalogApplicationError::BookAlreadyAvailable => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Book already available")
                    .with_message("This book is not currently borrowed"),
            ),

            // 409 Conflict - ISBNの重複
            CatalogApplicationError::DuplicateIsbn(isbn) => (
                StatusCode::CONFLICT,
                ErrorResponse::new("Book already exists").with_message(format!(
                    "A book with ISBN {} is already in the system",
                    isbn
                )),
            ),

            // 500 Internal Server Error - システム障害
            CatalogApplicationError::StoreError(e) => {
                tracing::error!("Catalog store error: {}", e);
                return internal_error_response();
            }
        };

        (status, Json(body)).into_response()
    }
}

fn field_names(fields: &[RequiredField]) -> Vec<String> {
    fields.iter().map(|f| f.as_str().to_string()).collect()
}

/// クエリハンドラー用のエラー型
#[derive(Debug)]
pub enum QueryError {
    /// 要求されたID（パース前の値）の書籍が存在しない
    NotFound(String),
    InternalError(String),
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        match self {
            QueryError::NotFound(requested_id) => (
                StatusCode::NOT_FOUND,
                Json(
                    ErrorResponse::new("Book not found")
                        .with_message(format!("No book exists with ID {}", requested_id)),
                ),
            )
                .into_response(),
            QueryError::InternalError(msg) => {
                tracing::error!("Internal error in query handler: {}", msg);
                internal_error_response()
            }
        }
    }
}
