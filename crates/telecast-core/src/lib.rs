pub mod config;
pub mod error;
pub mod store;

pub use error::TelecastError;
pub use store::CatalogStore;
