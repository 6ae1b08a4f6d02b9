use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{BookId, UserId, timestamp};

/// イベント：書籍が貸し出された
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookBorrowed {
    pub book_id: BookId,
    pub title: String,
    pub borrowed_by: UserId,
    #[serde(with = "timestamp::iso_millis")]
    pub borrow_date: DateTime<Utc>,
    #[serde(with = "timestamp::iso_millis")]
    pub return_date: DateTime<Utc>,
}

/// イベント：書籍が返却された
///
/// 貸出記録のない書籍（更新で貸出不可にされたもの）の返却では
/// `returned_by` は `None` になる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookReturned {
    pub book_id: BookId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returned_by: Option<UserId>,
    #[serde(rename = "returnDate", with = "timestamp::iso_millis")]
    pub returned_at: DateTime<Utc>,
}
