use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::catalog::{BookQuery, DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::domain::{
    Book, BookId, UserId,
    commands::{AddBook, BookChanges, BorrowBook, UpdateBook},
};

// ============================================================================
// Request parsing
// ============================================================================

/// 整数の先頭部分をパースする
///
/// 先頭の空白・符号を許容し、続く数字列だけを読む（`"2abc"` → 2）。
/// 数字が1つもない場合は `None`。
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let value = rest[..digits_len].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

/// パスパラメータの書籍IDをパースする
///
/// 正の整数として読めない値はどの書籍にも一致しない（`None`）。
pub fn parse_book_id(raw: &str) -> Option<BookId> {
    parse_int_prefix(raw)
        .and_then(|value| u64::try_from(value).ok())
        .filter(|value| *value > 0)
        .map(BookId::new)
}

/// ページ番号・件数のパース（1未満や不正値は既定値）
fn parse_positive_or(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(parse_int_prefix)
        .and_then(|value| usize::try_from(value).ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

/// 空文字列は未指定として扱う
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// 書籍一覧取得のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct ListBooksQuery {
    /// `"true"` なら貸出可能、それ以外の値なら貸出中でフィルタリング
    pub available: Option<String>,
    pub genre: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListBooksQuery {
    pub fn to_query(&self) -> BookQuery {
        BookQuery {
            available: self
                .available
                .as_deref()
                .filter(|value| !value.is_empty())
                .map(|value| value == "true"),
            genre: non_empty(self.genre.clone()),
            search: non_empty(self.search.clone()),
            page: parse_positive_or(self.page.as_deref(), DEFAULT_PAGE),
            limit: parse_positive_or(self.limit.as_deref(), DEFAULT_LIMIT),
        }
    }
}

/// 書籍登録リクエスト（POST /books）
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub published_year: Option<i64>,
    pub genre: Option<String>,
    pub location: Option<String>,
}

impl CreateBookRequest {
    /// 空文字列・0を未指定に正規化してコマンドに変換する
    pub fn to_command(self, added_at: DateTime<Utc>) -> AddBook {
        AddBook {
            title: non_empty(self.title),
            author: non_empty(self.author),
            isbn: non_empty(self.isbn),
            published_year: self.published_year.filter(|year| *year != 0),
            genre: non_empty(self.genre),
            location: non_empty(self.location),
            added_at,
        }
    }
}

/// 書籍更新リクエスト（PUT /books/:id）
///
/// `available` だけは `false` も含めて値があれば反映する。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub published_year: Option<i64>,
    pub genre: Option<String>,
    pub available: Option<bool>,
    pub location: Option<String>,
}

impl UpdateBookRequest {
    pub fn to_command(self, book_id: BookId, updated_at: DateTime<Utc>) -> UpdateBook {
        UpdateBook {
            book_id,
            changes: BookChanges {
                title: non_empty(self.title),
                author: non_empty(self.author),
                isbn: non_empty(self.isbn),
                published_year: self.published_year.filter(|year| *year != 0),
                genre: non_empty(self.genre),
                available: self.available,
                location: non_empty(self.location),
            },
            updated_at,
        }
    }
}

/// 貸出リクエスト（POST /books/:id/borrow）
///
/// `userId` は文字列に限らず数値なども受け付ける。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowBookRequest {
    pub user_id: Option<Value>,
}

impl BorrowBookRequest {
    pub fn to_command(self, book_id: BookId, borrowed_at: DateTime<Utc>) -> BorrowBook {
        BorrowBook {
            book_id,
            user_id: self.user_id.and_then(user_id_from_value),
            borrowed_at,
        }
    }
}

/// JSONの値を利用者IDに変換する
///
/// `null`・`false`・空文字列・0 は未指定。数値は文字列表現に、
/// それ以外の値はJSON表現になる。
fn user_id_from_value(value: Value) -> Option<UserId> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => non_empty(Some(s)).map(UserId::new),
        Value::Number(n) => number_to_user_id(&n),
        other => Some(UserId::new(other.to_string())),
    }
}

fn number_to_user_id(n: &serde_json::Number) -> Option<UserId> {
    if let Some(i) = n.as_i64() {
        return (i != 0).then(|| UserId::new(i.to_string()));
    }
    if let Some(u) = n.as_u64() {
        return Some(UserId::new(u.to_string()));
    }

    let f = n.as_f64().filter(|f| *f != 0.0)?;
    // 整数値の浮動小数点数は小数部なしで表す（42.0 → "42"）
    if f.fract() == 0.0 && f.abs() < 1e15 {
        Some(UserId::new((f as i64).to_string()))
    } else {
        Some(UserId::new(f.to_string()))
    }
}

// ============================================================================
// Responses
// ============================================================================

/// 成功レスポンス（メッセージ付き）
#[derive(Debug, Serialize)]
pub struct MessageResponse<T> {
    pub success: bool,
    pub message: &'static str,
    pub data: T,
}

impl<T> MessageResponse<T> {
    pub fn new(message: &'static str, data: T) -> Self {
        Self {
            success: true,
            message,
            data,
        }
    }
}

/// 書籍の操作へのリンク
#[derive(Debug, Serialize)]
pub struct BookLinks {
    pub borrow: String,
    #[serde(rename = "return")]
    pub return_: String,
}

/// 書籍詳細レスポンス（GET /books/:id）
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub success: bool,
    pub data: Book,
    pub links: BookLinks,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        let links = BookLinks {
            borrow: format!("/books/{}/borrow", book.id),
            return_: format!("/books/{}/return", book.id),
        };
        Self {
            success: true,
            data: book,
            links,
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_return: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: None,
            required: None,
            missing: None,
            expected_return: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// 内部エラー用の汎用レスポンス（詳細は含めない）
    pub fn internal() -> Self {
        Self::new("Internal Server Error").with_message("Something went wrong on our end")
    }
}
