pub mod adapter;
pub mod covers;
pub mod genre;
pub mod transport;

pub use adapter::CatalogAdapter;
pub use covers::{cover_url, CoverSize};
pub use genre::Genre;
pub use transport::{CatalogTransport, HttpCatalogTransport};
