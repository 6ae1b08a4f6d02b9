use chrono::{DateTime, Utc};

use super::{BookId, UserId};

/// コマンド：書籍を登録する
///
/// 値はリクエスト境界で正規化済み（空文字列・0は `None`）。
/// 必須項目の検証はドメイン層の `validate_new_book` で行う。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub published_year: Option<i64>,
    pub genre: Option<String>,
    pub location: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// 部分更新で変更する項目
///
/// `None` の項目は変更しない。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub published_year: Option<i64>,
    pub genre: Option<String>,
    pub available: Option<bool>,
    pub location: Option<String>,
}

/// コマンド：書籍情報を部分更新する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBook {
    pub book_id: BookId,
    pub changes: BookChanges,
    pub updated_at: DateTime<Utc>,
}

/// コマンド：書籍を貸し出す
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowBook {
    pub book_id: BookId,
    pub user_id: Option<UserId>,
    pub borrowed_at: DateTime<Utc>,
}

/// コマンド：書籍を返却する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnBook {
    pub book_id: BookId,
    pub returned_at: DateTime<Utc>,
}
