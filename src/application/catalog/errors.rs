use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{BorrowBookError, NewBookError, RequiredField, ReturnBookError, UserId};

/// カタログ管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum CatalogApplicationError {
    /// 書籍が見つからない
    #[error("Book not found")]
    BookNotFound,

    /// 登録時の必須項目が欠けている
    #[error("Missing required fields: {0:?}")]
    MissingRequiredFields(Vec<RequiredField>),

    /// 同じISBNの書籍が既に登録されている
    #[error("Book with ISBN {0} already exists")]
    DuplicateIsbn(String),

    /// 貸出中のため貸出不可
    #[error("Book is not available")]
    BookNotAvailable {
        borrowed_by: Option<UserId>,
        expected_return: Option<DateTime<Utc>>,
    },

    /// 貸出時に利用者IDが指定されていない
    #[error("User ID required")]
    UserIdRequired,

    /// 貸出中でない書籍を返却しようとした
    #[error("Book is already available")]
    BookAlreadyAvailable,

    /// CatalogStoreのエラー
    #[error("Catalog store error")]
    StoreError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<NewBookError> for CatalogApplicationError {
    fn from(err: NewBookError) -> Self {
        match err {
            NewBookError::MissingRequiredFields(missing) => {
                CatalogApplicationError::MissingRequiredFields(missing)
            }
        }
    }
}

impl From<BorrowBookError> for CatalogApplicationError {
    fn from(err: BorrowBookError) -> Self {
        match err {
            BorrowBookError::NotAvailable {
                borrowed_by,
                expected_return,
            } => CatalogApplicationError::BookNotAvailable {
                borrowed_by,
                expected_return,
            },
            BorrowBookError::UserIdRequired => CatalogApplicationError::UserIdRequired,
        }
    }
}

impl From<ReturnBookError> for CatalogApplicationError {
    fn from(err: ReturnBookError) -> Self {
        match err {
            ReturnBookError::AlreadyAvailable => CatalogApplicationError::BookAlreadyAvailable,
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, CatalogApplicationError>;
