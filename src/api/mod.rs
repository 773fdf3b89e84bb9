//! API handlers for Biblioteca REST endpoints

pub mod authors;
pub mod books;
pub mod copies;
pub mod editions;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod patrons;
