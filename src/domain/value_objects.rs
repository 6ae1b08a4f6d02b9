use serde::{Deserialize, Serialize};
use std::fmt;

/// 書籍ID - カタログ集約のID
///
/// 正の整数。ストアが採番し、プロセスの生存期間中は再利用されない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BookId(u64);

impl BookId {
    /// 最初に採番されるID
    pub const FIRST: BookId = BookId(1);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// 次のID
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 利用者ID - 会員管理コンテキストへの参照
///
/// 会員の存在確認は行わない。空文字列は「指定なし」として扱われ、
/// このコンテキストには到達しない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 書籍登録時の必須項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Title,
    Author,
    Isbn,
}

impl RequiredField {
    /// 必須項目の一覧（レスポンスに列挙される順序）
    pub const ALL: [RequiredField; 3] = [
        RequiredField::Title,
        RequiredField::Author,
        RequiredField::Isbn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredField::Title => "title",
            RequiredField::Author => "author",
            RequiredField::Isbn => "isbn",
        }
    }
}
