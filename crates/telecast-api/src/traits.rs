//! Trait definition for the show-catalog service.
//!
//! The catalog store is generic over [`CatalogService`], so the real
//! [`TvMazeClient`](crate::TvMazeClient) and scripted test doubles are
//! interchangeable.

use std::future::Future;

use crate::error::ApiError;
use crate::types::{CastMember, Episode, SearchResultItem, Show};

/// A paginated show-catalog service.
///
/// All five operations map one-to-one onto upstream GET endpoints and return
/// the parsed body, with failures normalized into [`ApiError`].
pub trait CatalogService: Send + Sync {
    /// Fetch one page of the show index.
    fn index_page(&self, page: u32) -> impl Future<Output = Result<Vec<Show>, ApiError>> + Send;

    /// Search shows by name.
    fn search_shows(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SearchResultItem>, ApiError>> + Send;

    /// Fetch a single show by id.
    fn show(&self, id: u64) -> impl Future<Output = Result<Show, ApiError>> + Send;

    /// Fetch all episodes of a show.
    fn episodes(&self, show_id: u64)
        -> impl Future<Output = Result<Vec<Episode>, ApiError>> + Send;

    /// Fetch the cast of a show.
    fn cast(&self, show_id: u64)
        -> impl Future<Output = Result<Vec<CastMember>, ApiError>> + Send;
}
