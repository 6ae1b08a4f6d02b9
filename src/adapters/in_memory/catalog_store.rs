use crate::domain::{Book, BookId};
use crate::ports::catalog_store::{CatalogStore as CatalogStoreTrait, Result};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// インメモリストアのエラー
#[derive(Debug, Error)]
pub enum InMemoryStoreError {
    #[error("catalog store lock poisoned")]
    Poisoned,

    #[error("book {0} is not in the catalog")]
    BookNotFound(BookId),
}

struct Catalog {
    books: Vec<Book>,
    /// これまでに保持した最大のID（削除された書籍のIDは再発行しない）
    high_water: Option<BookId>,
}

/// CatalogStoreのインメモリ実装
///
/// 書籍を登録順に1つのMutexの内側で保持する。
/// 再起動すると内容は失われる。
pub struct CatalogStore {
    catalog: Mutex<Catalog>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::with_books(Vec::new())
    }

    /// 指定した書籍で初期化したストアを作成
    pub fn with_books(books: Vec<Book>) -> Self {
        let high_water = books.iter().map(|book| book.id).max();
        Self {
            catalog: Mutex::new(Catalog { books, high_water }),
        }
    }

    fn lock(&self) -> std::result::Result<MutexGuard<'_, Catalog>, InMemoryStoreError> {
        self.catalog.lock().map_err(|_| InMemoryStoreError::Poisoned)
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStoreTrait for CatalogStore {
    async fn list(&self) -> Result<Vec<Book>> {
        Ok(self.lock()?.books.clone())
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>> {
        let catalog = self.lock()?;
        Ok(catalog.books.iter().find(|book| book.id == id).cloned())
    }

    async fn isbn_exists(&self, isbn: &str) -> Result<bool> {
        let catalog = self.lock()?;
        Ok(catalog.books.iter().any(|book| book.isbn == isbn))
    }

    async fn next_id(&self) -> Result<BookId> {
        let catalog = self.lock()?;
        let current_max = catalog.books.iter().map(|book| book.id).max();
        Ok(current_max
            .max(catalog.high_water)
            .map_or(BookId::FIRST, |id| id.next()))
    }

    async fn insert(&self, book: Book) -> Result<()> {
        let mut catalog = self.lock()?;
        catalog.high_water = catalog.high_water.max(Some(book.id));
        catalog.books.push(book);
        Ok(())
    }

    async fn save(&self, book: Book) -> Result<()> {
        let mut catalog = self.lock()?;
        let slot = catalog
            .books
            .iter_mut()
            .find(|existing| existing.id == book.id)
            .ok_or(InMemoryStoreError::BookNotFound(book.id))?;
        *slot = book;
        Ok(())
    }

    async fn remove_by_id(&self, id: BookId) -> Result<Option<Book>> {
        let mut catalog = self.lock()?;
        let position = catalog.books.iter().position(|book| book.id == id);
        Ok(position.map(|index| catalog.books.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::in_memory::sample_books;

    fn book(id: u64, isbn: &str) -> Book {
        let mut book = sample_books().remove(0);
        book.id = BookId::new(id);
        book.isbn = isbn.to_string();
        book
    }

    #[tokio::test]
    async fn test_next_id_is_one_when_empty() {
        let store = CatalogStore::new();
        assert_eq!(store.next_id().await.unwrap(), BookId::FIRST);
    }

    #[tokio::test]
    async fn test_next_id_is_max_plus_one() {
        let store = CatalogStore::with_books(vec![book(5, "a"), book(2, "b")]);
        assert_eq!(store.next_id().await.unwrap(), BookId::new(6));
    }

    #[tokio::test]
    async fn test_next_id_does_not_reuse_deleted_id() {
        let store = CatalogStore::with_books(vec![book(1, "a"), book(2, "b")]);
        store.remove_by_id(BookId::new(2)).await.unwrap();

        assert_eq!(store.next_id().await.unwrap(), BookId::new(3));
    }

    #[tokio::test]
    async fn test_insert_preserves_order() {
        let store = CatalogStore::new();
        store.insert(book(2, "a")).await.unwrap();
        store.insert(book(1, "b")).await.unwrap();

        let ids: Vec<u64> = store
            .list()
            .await
            .unwrap()
            .iter()
            .map(|b| b.id.value())
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_isbn_exists() {
        let store = CatalogStore::with_books(vec![book(1, "978")]);
        assert!(store.isbn_exists("978").await.unwrap());
        assert!(!store.isbn_exists("979").await.unwrap());
    }

    #[tokio::test]
    async fn test_save_replaces_in_place() {
        let store = CatalogStore::with_books(vec![book(1, "a"), book(2, "b")]);
        let mut changed = book(1, "a");
        changed.title = "Changed".to_string();

        store.save(changed).await.unwrap();

        let books = store.list().await.unwrap();
        assert_eq!(books[0].title, "Changed");
        assert_eq!(books[1].id, BookId::new(2));
    }

    #[tokio::test]
    async fn test_save_unknown_id_fails() {
        let store = CatalogStore::new();
        assert!(store.save(book(9, "a")).await.is_err());
    }

    #[tokio::test]
    async fn test_remove_by_id_returns_removed_book() {
        let store = CatalogStore::with_books(vec![book(1, "a")]);

        let removed = store.remove_by_id(BookId::new(1)).await.unwrap();
        assert_eq!(removed.map(|b| b.id), Some(BookId::new(1)));
        assert!(store.find_by_id(BookId::new(1)).await.unwrap().is_none());
        assert!(store.remove_by_id(BookId::new(1)).await.unwrap().is_none());
    }
}
