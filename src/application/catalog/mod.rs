mod catalog_service;
mod errors;
mod query;

pub use catalog_service::{
    ServiceDependencies, add_book, borrow_book, get_book, list_books, remove_book, return_book,
    update_book,
};
pub use errors::{CatalogApplicationError, Result};
pub use query::{BookPage, BookQuery, DEFAULT_LIMIT, DEFAULT_PAGE};
