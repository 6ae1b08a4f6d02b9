use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{
    BookBorrowed, BookId, BookReturned, BorrowBookError, NewBookError, RequiredField,
    ReturnBookError, UserId,
    commands::{AddBook, BookChanges},
    timestamp,
};

/// 貸出期間（日数）
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// ジャンル未指定時の値
pub const DEFAULT_GENRE: &str = "Unknown";

/// 配架場所未指定時の値
pub const DEFAULT_LOCATION: &str = "Unassigned";

/// 貸出記録
///
/// 貸出中の書籍にのみ存在する。3つの項目は常に揃って存在し、
/// 返却時にまとめて取り除かれる（`null` にはならない）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub borrowed_by: UserId,
    #[serde(with = "timestamp::iso_millis")]
    pub borrow_date: DateTime<Utc>,
    #[serde(with = "timestamp::iso_millis")]
    pub return_date: DateTime<Utc>,
}

/// Book集約 - カタログの1エントリ
///
/// 不変条件：
/// - `id` は不変
/// - `available == true` なら `loan` は存在しない
/// - 貸出操作で `available == false` になった場合は必ず `loan` が存在する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    // 識別子
    pub id: BookId,

    // 書誌情報
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_year: Option<i64>,
    pub genre: String,

    // 所蔵・貸出状態
    pub available: bool,
    pub location: String,
    #[serde(default, with = "timestamp::iso_millis_option")]
    pub last_borrowed: Option<DateTime<Utc>>,

    // 監査情報
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::iso_millis_option"
    )]
    pub added_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timestamp::iso_millis_option"
    )]
    pub last_updated: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub loan: Option<Loan>,
}

/// 検証済みの登録内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_year: Option<i64>,
    pub genre: String,
    pub location: String,
    pub added_at: DateTime<Utc>,
}

/// 純粋関数：登録コマンドを検証する
///
/// ビジネスルール：
/// - title, author, isbn は必須
/// - genre, location は未指定ならデフォルト値
///
/// ISBNの重複確認はストアを必要とするため、アプリケーション層で行う。
pub fn validate_new_book(cmd: AddBook) -> Result<BookDraft, NewBookError> {
    let AddBook {
        title,
        author,
        isbn,
        published_year,
        genre,
        location,
        added_at,
    } = cmd;

    match (title, author, isbn) {
        (Some(title), Some(author), Some(isbn)) => Ok(BookDraft {
            title,
            author,
            isbn,
            published_year,
            genre: genre.unwrap_or_else(|| DEFAULT_GENRE.to_string()),
            location: location.unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            added_at,
        }),
        (title, author, isbn) => {
            let present = [title.is_some(), author.is_some(), isbn.is_some()];
            let missing = RequiredField::ALL
                .into_iter()
                .zip(present)
                .filter(|(_, present)| !present)
                .map(|(field, _)| field)
                .collect();
            Err(NewBookError::MissingRequiredFields(missing))
        }
    }
}

/// 純粋関数：新しい書籍を作成する
///
/// 登録直後の書籍は貸出可能で、貸出履歴を持たない。
pub fn new_book(id: BookId, draft: BookDraft) -> Book {
    Book {
        id,
        title: draft.title,
        author: draft.author,
        isbn: draft.isbn,
        published_year: draft.published_year,
        genre: draft.genre,
        available: true,
        location: draft.location,
        last_borrowed: None,
        added_date: Some(draft.added_at),
        last_updated: None,
        loan: None,
    }
}

/// 純粋関数：部分更新を適用する
///
/// 指定された項目のみ上書きし、`last_updated` は常に更新する。
/// 一意性などの検証は行わない。
///
/// `available` を `true` にした場合は貸出記録を取り除く。
pub fn apply_changes(book: &Book, changes: BookChanges, updated_at: DateTime<Utc>) -> Book {
    let mut updated = book.clone();

    if let Some(title) = changes.title {
        updated.title = title;
    }
    if let Some(author) = changes.author {
        updated.author = author;
    }
    if let Some(isbn) = changes.isbn {
        updated.isbn = isbn;
    }
    if let Some(year) = changes.published_year {
        updated.published_year = Some(year);
    }
    if let Some(genre) = changes.genre {
        updated.genre = genre;
    }
    if let Some(available) = changes.available {
        updated.available = available;
        if available {
            updated.loan = None;
        }
    }
    if let Some(location) = changes.location {
        updated.location = location;
    }

    updated.last_updated = Some(updated_at);
    updated
}

/// 純粋関数：書籍を貸し出す
///
/// ビジネスルール：
/// - 貸出中の書籍は貸し出せない（利用者IDの確認より先に判定する）
/// - 利用者IDは必須
/// - 返却期限は貸出日 + 14日間
///
/// 副作用なし。新しいBookとイベントを返す。
pub fn borrow_book(
    book: &Book,
    user_id: Option<UserId>,
    borrowed_at: DateTime<Utc>,
) -> Result<(Book, BookBorrowed), BorrowBookError> {
    if !book.available {
        return Err(BorrowBookError::NotAvailable {
            borrowed_by: book.loan.as_ref().map(|loan| loan.borrowed_by.clone()),
            expected_return: book.loan.as_ref().map(|loan| loan.return_date),
        });
    }

    let user_id = user_id.ok_or(BorrowBookError::UserIdRequired)?;
    let return_date = borrowed_at + Duration::days(LOAN_PERIOD_DAYS);

    let mut borrowed = book.clone();
    borrowed.available = false;
    borrowed.last_borrowed = Some(borrowed_at);
    borrowed.loan = Some(Loan {
        borrowed_by: user_id.clone(),
        borrow_date: borrowed_at,
        return_date,
    });

    let event = BookBorrowed {
        book_id: book.id,
        title: book.title.clone(),
        borrowed_by: user_id,
        borrow_date: borrowed_at,
        return_date,
    };

    Ok((borrowed, event))
}

/// 純粋関数：書籍を返却する
///
/// ビジネスルール：
/// - 貸出中でない書籍は返却できない
/// - 返却時に貸出記録を取り除き、`last_borrowed` を返却日時にする
///
/// 副作用なし。新しいBookとイベントを返す。
pub fn return_book(
    book: &Book,
    returned_at: DateTime<Utc>,
) -> Result<(Book, BookReturned), ReturnBookError> {
    if book.available {
        return Err(ReturnBookError::AlreadyAvailable);
    }

    let mut returned = book.clone();
    let loan = returned.loan.take();
    returned.available = true;
    returned.last_borrowed = Some(returned_at);

    let event = BookReturned {
        book_id: book.id,
        title: book.title.clone(),
        returned_by: loan.map(|loan| loan.borrowed_by),
        returned_at,
    };

    Ok((returned, event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::timestamp;

    fn add_book_command() -> AddBook {
        AddBook {
            title: Some("Dune".to_string()),
            author: Some("Frank Herbert".to_string()),
            isbn: Some("9780441172719".to_string()),
            published_year: Some(1965),
            genre: None,
            location: None,
            added_at: timestamp::now(),
        }
    }

    fn available_book() -> Book {
        let draft = validate_new_book(add_book_command()).unwrap();
        new_book(BookId::new(1), draft)
    }

    // TDD: validate_new_book() / new_book() のテスト
    #[test]
    fn test_new_book_applies_defaults() {
        let cmd = add_book_command();
        let added_at = cmd.added_at;
        let book = new_book(BookId::new(4), validate_new_book(cmd).unwrap());

        assert_eq!(book.id, BookId::new(4));
        assert!(book.available);
        assert_eq!(book.genre, DEFAULT_GENRE);
        assert_eq!(book.location, DEFAULT_LOCATION);
        assert_eq!(book.last_borrowed, None);
        assert_eq!(book.added_date, Some(added_at));
        assert_eq!(book.last_updated, None);
        assert!(book.loan.is_none());
    }

    #[test]
    fn test_validate_new_book_reports_missing_fields_in_order() {
        let cmd = AddBook {
            title: None,
            isbn: None,
            ..add_book_command()
        };

        let result = validate_new_book(cmd);
        assert_eq!(
            result.unwrap_err(),
            NewBookError::MissingRequiredFields(vec![RequiredField::Title, RequiredField::Isbn])
        );
    }

    #[test]
    fn test_validate_new_book_all_missing() {
        let result = validate_new_book(AddBook::default());
        assert_eq!(
            result.unwrap_err(),
            NewBookError::MissingRequiredFields(RequiredField::ALL.to_vec())
        );
    }

    // TDD: apply_changes() のテスト
    #[test]
    fn test_apply_changes_overwrites_only_given_fields() {
        let book = available_book();
        let updated_at = book.added_date.unwrap() + Duration::hours(1);
        let changes = BookChanges {
            genre: Some("Science Fiction".to_string()),
            ..Default::default()
        };

        let updated = apply_changes(&book, changes, updated_at);

        assert_eq!(updated.genre, "Science Fiction");
        assert_eq!(updated.title, book.title);
        assert_eq!(updated.isbn, book.isbn);
        assert_eq!(updated.last_updated, Some(updated_at));
    }

    #[test]
    fn test_apply_changes_sets_last_updated_without_changes() {
        let book = available_book();
        let updated_at = timestamp::now();

        let updated = apply_changes(&book, BookChanges::default(), updated_at);

        assert_eq!(updated.last_updated, Some(updated_at));
        assert_eq!(updated.title, book.title);
    }

    #[test]
    fn test_apply_changes_available_true_drops_loan() {
        let book = available_book();
        let now = timestamp::now();
        let (borrowed, _) = borrow_book(&book, Some(UserId::new("u1")), now).unwrap();

        let changes = BookChanges {
            available: Some(true),
            ..Default::default()
        };
        let updated = apply_changes(&borrowed, changes, now);

        assert!(updated.available);
        assert!(updated.loan.is_none());
    }

    #[test]
    fn test_apply_changes_available_false_without_loan() {
        let book = available_book();
        let changes = BookChanges {
            available: Some(false),
            ..Default::default()
        };

        let updated = apply_changes(&book, changes, timestamp::now());

        assert!(!updated.available);
        assert!(updated.loan.is_none());
    }

    // TDD: borrow_book() のテスト
    #[test]
    fn test_borrow_book_sets_return_date_14_days_later() {
        let book = available_book();
        let borrowed_at = timestamp::now();

        let (borrowed, event) = borrow_book(&book, Some(UserId::new("u1")), borrowed_at).unwrap();

        assert!(!borrowed.available);
        assert_eq!(borrowed.last_borrowed, Some(borrowed_at));
        let loan = borrowed.loan.unwrap();
        assert_eq!(loan.borrowed_by, UserId::new("u1"));
        assert_eq!(loan.borrow_date, borrowed_at);
        assert_eq!(loan.return_date - loan.borrow_date, Duration::days(14));

        assert_eq!(event.book_id, book.id);
        assert_eq!(event.title, book.title);
        assert_eq!(event.return_date, loan.return_date);
    }

    #[test]
    fn test_borrow_book_fails_when_not_available() {
        let book = available_book();
        let now = timestamp::now();
        let (borrowed, _) = borrow_book(&book, Some(UserId::new("u1")), now).unwrap();

        let result = borrow_book(&borrowed, Some(UserId::new("u2")), now);

        assert_eq!(
            result.unwrap_err(),
            BorrowBookError::NotAvailable {
                borrowed_by: Some(UserId::new("u1")),
                expected_return: Some(now + Duration::days(LOAN_PERIOD_DAYS)),
            }
        );
    }

    #[test]
    fn test_borrow_book_checks_availability_before_user_id() {
        let mut book = available_book();
        book.available = false;

        let result = borrow_book(&book, None, timestamp::now());

        assert_eq!(
            result.unwrap_err(),
            BorrowBookError::NotAvailable {
                borrowed_by: None,
                expected_return: None,
            }
        );
    }

    #[test]
    fn test_borrow_book_requires_user_id() {
        let book = available_book();
        let result = borrow_book(&book, None, timestamp::now());
        assert_eq!(result.unwrap_err(), BorrowBookError::UserIdRequired);
    }

    // TDD: return_book() のテスト
    #[test]
    fn test_return_book_removes_loan() {
        let book = available_book();
        let borrowed_at = timestamp::now();
        let (borrowed, _) = borrow_book(&book, Some(UserId::new("u1")), borrowed_at).unwrap();
        let returned_at = borrowed_at + Duration::days(3);

        let (returned, event) = return_book(&borrowed, returned_at).unwrap();

        assert!(returned.available);
        assert!(returned.loan.is_none());
        assert_eq!(returned.last_borrowed, Some(returned_at));
        assert_eq!(event.returned_by, Some(UserId::new("u1")));
        assert_eq!(event.returned_at, returned_at);
    }

    #[test]
    fn test_return_book_fails_when_available() {
        let book = available_book();
        let result = return_book(&book, timestamp::now());
        assert_eq!(result.unwrap_err(), ReturnBookError::AlreadyAvailable);
    }

    // シリアライズ形式のテスト
    #[test]
    fn test_serialized_book_omits_loan_fields_when_available() {
        let book = available_book();
        let json = serde_json::to_value(&book).unwrap();

        assert_eq!(json["available"], true);
        assert_eq!(json["lastBorrowed"], serde_json::Value::Null);
        assert_eq!(json["publishedYear"], 1965);
        assert!(json.get("borrowedBy").is_none());
        assert!(json.get("borrowDate").is_none());
        assert!(json.get("returnDate").is_none());
        assert!(json.get("lastUpdated").is_none());
        assert!(json.get("addedDate").is_some());
    }

    #[test]
    fn test_serialized_book_flattens_loan_fields() {
        let book = available_book();
        let (borrowed, _) =
            borrow_book(&book, Some(UserId::new("u1")), timestamp::now()).unwrap();
        let json = serde_json::to_value(&borrowed).unwrap();

        assert_eq!(json["borrowedBy"], "u1");
        assert!(json["borrowDate"].is_string());
        assert!(json["returnDate"].is_string());
        assert!(json.get("loan").is_none());
    }
}
