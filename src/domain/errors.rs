use chrono::{DateTime, Utc};

use super::{RequiredField, UserId};

/// 書籍登録のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewBookError {
    /// 必須項目が欠けている（欠けている項目を列挙順に保持）
    MissingRequiredFields(Vec<RequiredField>),
}

/// 貸出のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BorrowBookError {
    /// 貸出中のため貸出不可
    NotAvailable {
        borrowed_by: Option<UserId>,
        expected_return: Option<DateTime<Utc>>,
    },
    /// 利用者IDが指定されていない
    UserIdRequired,
}

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnBookError {
    /// 貸出中ではない
    AlreadyAvailable,
}
