use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower::Layer;
use tower_http::{
    catch_panic::CatchPanicLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::TraceLayer,
};

use super::error::handle_panic;
use super::handlers::{
    AppState, borrow_book, create_book, delete_book, endpoint_not_found, get_book, list_books,
    return_book, update_book,
};

/// Routes served by the catalog, as `(method, path)` pairs
///
/// Logged at startup.
pub const ENDPOINTS: [(&str, &str); 7] = [
    ("GET", "/books"),
    ("GET", "/books/:id"),
    ("POST", "/books"),
    ("PUT", "/books/:id"),
    ("DELETE", "/books/:id"),
    ("POST", "/books/:id/borrow"),
    ("POST", "/books/:id/return"),
];

/// Creates the API router with all catalog endpoints
///
/// Query endpoints (Read operations):
/// - GET /books - List books with filters and pagination
/// - GET /books/:id - Get book details
///
/// Command endpoints (Write operations):
/// - POST /books - Add a book
/// - PUT /books/:id - Partially update a book
/// - DELETE /books/:id - Delete a book
/// - POST /books/:id/borrow - Borrow a book
/// - POST /books/:id/return - Return a book
///
/// Unknown paths and unsupported methods on known paths both answer 404.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/books",
            get(list_books)
                .post(create_book)
                .fallback(endpoint_not_found),
        )
        .route(
            "/books/:id",
            get(get_book)
                .put(update_book)
                .delete(delete_book)
                .fallback(endpoint_not_found),
        )
        .route(
            "/books/:id/borrow",
            post(borrow_book).fallback(endpoint_not_found),
        )
        .route(
            "/books/:id/return",
            post(return_book).fallback(endpoint_not_found),
        )
        .fallback(endpoint_not_found)
        // Turn handler panics into the generic 500 body
        .layer(CatchPanicLayer::custom(handle_panic))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Creates the HTTP service served by the binary
///
/// Wraps the router so a trailing slash is ignored (`/books/1/` is `/books/1`).
/// The layer wraps the `Router` from outside; the path is rewritten before routing.
pub fn create_app(state: Arc<AppState>) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(create_router(state))
}
