use crate::domain::{Book, BookId, Loan, UserId, book::LOAN_PERIOD_DAYS};
use chrono::{DateTime, Duration, NaiveDate, Utc};

fn midnight(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

/// 起動時に読み込むサンプル蔵書
///
/// 2番の書籍は `user123` に貸出中。
pub fn sample_books() -> Vec<Book> {
    let gatsby_borrowed = midnight(2023, 5, 15);
    let mockingbird_borrowed = midnight(2023, 6, 10);
    let habits_borrowed = midnight(2023, 4, 22);

    vec![
        Book {
            id: BookId::new(1),
            title: "The Great Gatsby".to_string(),
            author: "F. Scott Fitzgerald".to_string(),
            isbn: "9780743273565".to_string(),
            published_year: Some(1925),
            genre: "Classic".to_string(),
            available: true,
            location: "Fiction A1".to_string(),
            last_borrowed: gatsby_borrowed,
            added_date: None,
            last_updated: None,
            loan: None,
        },
        Book {
            id: BookId::new(2),
            title: "To Kill a Mockingbird".to_string(),
            author: "Harper Lee".to_string(),
            isbn: "9780061120084".to_string(),
            published_year: Some(1960),
            genre: "Fiction".to_string(),
            available: false,
            location: "Fiction B2".to_string(),
            last_borrowed: mockingbird_borrowed,
            added_date: None,
            last_updated: None,
            loan: mockingbird_borrowed.map(|borrow_date| Loan {
                borrowed_by: UserId::new("user123"),
                borrow_date,
                return_date: borrow_date + Duration::days(LOAN_PERIOD_DAYS),
            }),
        },
        Book {
            id: BookId::new(3),
            title: "Atomic Habits".to_string(),
            author: "James Clear".to_string(),
            isbn: "9780735211292".to_string(),
            published_year: Some(2018),
            genre: "Self-Help".to_string(),
            available: true,
            location: "Non-Fiction C3".to_string(),
            last_borrowed: habits_borrowed,
            added_date: None,
            last_updated: None,
            loan: None,
        },
    ]
}
