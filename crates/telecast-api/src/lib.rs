//! Typed client layer for the TVmaze-style show-catalog API.
//!
//! [`TvMazeClient`] is the real HTTP client; [`CatalogService`] is the seam
//! the catalog store is generic over, so tests can substitute a scripted
//! service without touching the network.

pub mod error;
pub mod traits;
pub mod tvmaze;
pub mod types;

pub use error::ApiError;
pub use traits::CatalogService;
pub use tvmaze::TvMazeClient;
