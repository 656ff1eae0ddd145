pub mod book;
pub mod session;

pub use book::{BookRecord, ShelfEntry};
pub use session::Session;
