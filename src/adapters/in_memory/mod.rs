pub mod catalog_store;
pub mod seed;

pub use catalog_store::CatalogStore;
pub use seed::sample_books;
