pub mod book;
pub mod commands;
pub mod errors;
pub mod events;
pub mod timestamp;
pub mod value_objects;

pub use book::{Book, Loan};
pub use errors::*;
pub use events::*;
pub use value_objects::*;
