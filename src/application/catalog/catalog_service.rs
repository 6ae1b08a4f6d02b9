use crate::domain::{self, Book, BookBorrowed, BookId, BookReturned, commands::*};
use crate::ports::*;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::errors::{CatalogApplicationError, Result};
use super::query::{self, BookPage, BookQuery};

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞いは持たず、純粋な関数に依存関係を渡す。
///
/// `write_lock` はすべての更新系操作で保持される唯一の書き込みロック。
/// 「確認してから更新」の一連の処理（ISBN重複確認→採番→追加など）が
/// 他の更新と交錯しないことを保証する。参照系はロックを取らない。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub catalog_store: Arc<dyn CatalogStore>,
    pub write_lock: Arc<Mutex<()>>,
}

impl ServiceDependencies {
    pub fn new(catalog_store: Arc<dyn CatalogStore>) -> Self {
        Self {
            catalog_store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// ストアから書籍を取得するヘルパー関数
///
/// # エラー
/// - StoreError: 読み込み失敗
/// - BookNotFound: 該当IDの書籍が存在しない
async fn load_book(catalog_store: &Arc<dyn CatalogStore>, book_id: BookId) -> Result<Book> {
    catalog_store
        .find_by_id(book_id)
        .await
        .map_err(CatalogApplicationError::StoreError)?
        .ok_or(CatalogApplicationError::BookNotFound)
}

/// 書籍一覧を取得する
///
/// 絞り込み（available → genre → search）の後にページ分割する。
pub async fn list_books(deps: &ServiceDependencies, query: BookQuery) -> Result<BookPage> {
    let books = deps
        .catalog_store
        .list()
        .await
        .map_err(CatalogApplicationError::StoreError)?;

    let filtered = query::filter_books(books, &query);
    Ok(query::paginate(filtered, query.page, query.limit))
}

/// 書籍をIDで取得する
pub async fn get_book(deps: &ServiceDependencies, book_id: BookId) -> Result<Book> {
    load_book(&deps.catalog_store, book_id).await
}

/// 書籍を登録する
///
/// ビジネスルール：
/// - title, author, isbn が必須（最初に検証）
/// - ISBNは既存の書籍と重複しないこと
/// - IDは既存の最大値 + 1
///
/// # 戻り値
/// 登録された書籍
pub async fn add_book(deps: &ServiceDependencies, cmd: AddBook) -> Result<Book> {
    // 1. 必須項目の検証（ストアに触れる前に行う）
    let draft = domain::book::validate_new_book(cmd)?;

    let _guard = deps.write_lock.lock().await;

    // 2. ISBNの重複確認
    let duplicate = deps
        .catalog_store
        .isbn_exists(&draft.isbn)
        .await
        .map_err(CatalogApplicationError::StoreError)?;

    if duplicate {
        return Err(CatalogApplicationError::DuplicateIsbn(draft.isbn));
    }

    // 3. 採番してドメイン層の純粋関数を呼び出し
    let book_id = deps
        .catalog_store
        .next_id()
        .await
        .map_err(CatalogApplicationError::StoreError)?;

    let book = domain::book::new_book(book_id, draft);

    // 4. ストアに追加
    deps.catalog_store
        .insert(book.clone())
        .await
        .map_err(CatalogApplicationError::StoreError)?;

    tracing::debug!(book_id = %book.id, isbn = %book.isbn, "book added");

    Ok(book)
}

/// 書籍情報を部分更新する
///
/// 指定された項目のみ上書きする。ISBNの一意性は検証しない。
pub async fn update_book(deps: &ServiceDependencies, cmd: UpdateBook) -> Result<Book> {
    let _guard = deps.write_lock.lock().await;

    let book = load_book(&deps.catalog_store, cmd.book_id).await?;
    let updated = domain::book::apply_changes(&book, cmd.changes, cmd.updated_at);

    deps.catalog_store
        .save(updated.clone())
        .await
        .map_err(CatalogApplicationError::StoreError)?;

    Ok(updated)
}

/// 書籍を削除する
///
/// 貸出中の書籍も削除できる。
///
/// # 戻り値
/// 削除された書籍
pub async fn remove_book(deps: &ServiceDependencies, book_id: BookId) -> Result<Book> {
    let _guard = deps.write_lock.lock().await;

    deps.catalog_store
        .remove_by_id(book_id)
        .await
        .map_err(CatalogApplicationError::StoreError)?
        .ok_or(CatalogApplicationError::BookNotFound)
}

/// 書籍を貸し出す
///
/// ビジネスルール：
/// - 書籍が存在すること
/// - 書籍が貸出可能であること
/// - 利用者IDが指定されていること
///
/// 失敗した場合は状態を変更しない。
pub async fn borrow_book(deps: &ServiceDependencies, cmd: BorrowBook) -> Result<BookBorrowed> {
    let _guard = deps.write_lock.lock().await;

    let book = load_book(&deps.catalog_store, cmd.book_id).await?;
    let (borrowed, event) = domain::book::borrow_book(&book, cmd.user_id, cmd.borrowed_at)?;

    deps.catalog_store
        .save(borrowed)
        .await
        .map_err(CatalogApplicationError::StoreError)?;

    tracing::info!(
        book_id = %event.book_id,
        borrowed_by = %event.borrowed_by,
        "book borrowed"
    );

    Ok(event)
}

/// 書籍を返却する
///
/// ビジネスルール：
/// - 書籍が存在すること
/// - 書籍が貸出中であること
///
/// 失敗した場合は状態を変更しない。
pub async fn return_book(deps: &ServiceDependencies, cmd: ReturnBook) -> Result<BookReturned> {
    let _guard = deps.write_lock.lock().await;

    let book = load_book(&deps.catalog_store, cmd.book_id).await?;
    let (returned, event) = domain::book::return_book(&book, cmd.returned_at)?;

    deps.catalog_store
        .save(returned)
        .await
        .map_err(CatalogApplicationError::StoreError)?;

    tracing::info!(
        book_id = %event.book_id,
        returned_by = ?event.returned_by.as_ref().map(|user| user.as_str()),
        "book returned"
    );

    Ok(event)
}
