//! Data models for Biblioteca

pub mod author;
pub mod book;
pub mod copy;
pub mod edition;
pub mod loan;
pub mod patron;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookDetail, CreateBookResult, DetailBookInput};
pub use copy::{Copy, RemovalCheck};
pub use edition::{Edition, EditionWithCopies};
pub use loan::Loan;
pub use patron::Patron;
