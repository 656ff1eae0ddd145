pub mod accounts;
pub mod books;
