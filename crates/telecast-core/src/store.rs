//! The catalog cache/store: a single authoritative in-memory cache of fetched
//! catalog data, with deduplicated fetches and sorted/grouped derived views.
//!
//! Commands mutate state; queries are pure reads over a snapshot. State lives
//! behind a mutex that is never held across an await, so one store instance
//! can be shared behind an `Arc` across tasks.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use telecast_api::types::{CastMember, Episode, Show};
use telecast_api::{ApiError, CatalogService};

/// Genre bucket for shows that declare no genre of their own.
pub const OTHER_GENRE: &str = "Other";

/// Episodes without a number sort to the end of their season.
const EPISODE_NUMBER_SENTINEL: i64 = 9999;

#[derive(Debug, Default)]
struct SearchState {
    query: String,
    results: Vec<Show>,
    is_loading: bool,
    error: Option<String>,
    /// Token of the most recent search call; completions carrying an older
    /// token are stale and discarded.
    latest_token: u64,
}

#[derive(Debug, Default)]
struct CatalogState {
    shows_by_id: HashMap<u64, Show>,
    genre_to_show_ids: HashMap<String, Vec<u64>>,
    loaded_index_pages: HashSet<u32>,
    is_loading: bool,
    error: Option<String>,

    search: SearchState,

    episodes_by_show_id: HashMap<u64, Vec<Episode>>,
    episodes_in_flight: HashSet<u64>,
    episodes_error: Option<String>,

    cast_by_show_id: HashMap<u64, Vec<CastMember>>,
    cast_in_flight: HashSet<u64>,
    cast_error: Option<String>,
}

impl CatalogState {
    /// Merge a show into the cache and file its id under every genre bucket.
    /// Shows without genres (and empty genre names) go under [`OTHER_GENRE`].
    /// An id appears at most once per bucket.
    fn file_show(&mut self, show: Show) {
        let id = show.id;
        let genres: Vec<String> = if show.genres.is_empty() {
            vec![OTHER_GENRE.to_string()]
        } else {
            show.genres
                .iter()
                .map(|g| {
                    if g.is_empty() {
                        OTHER_GENRE.to_string()
                    } else {
                        g.clone()
                    }
                })
                .collect()
        };

        self.shows_by_id.insert(id, show);

        for genre in genres {
            let bucket = self.genre_to_show_ids.entry(genre).or_default();
            if !bucket.contains(&id) {
                bucket.push(id);
            }
        }
    }
}

/// Client-side cache of the show catalog.
///
/// One store is constructed per application session and owns all fetched
/// domain data. `shows_by_id` is the single source of truth for show fields;
/// genre buckets hold ids that the derived views resolve through it.
pub struct CatalogStore<S> {
    service: S,
    state: Mutex<CatalogState>,
    search_seq: AtomicU64,
}

impl<S: CatalogService> CatalogStore<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: Mutex::new(CatalogState::default()),
            search_seq: AtomicU64::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, CatalogState> {
        // A poisoned lock still holds valid state; keep going.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ── Commands ────────────────────────────────────────────────

    /// Load the given index pages, skipping any page already loaded (each
    /// page is fetched at most once per store lifetime).
    ///
    /// Pages are fetched sequentially. A 404 means the index ran out of pages
    /// and ends the loop cleanly; any other failure aborts the call and lands
    /// in [`error`](Self::error). Pages committed before the failure are kept.
    pub async fn load_index_pages(&self, pages: &[u32]) {
        {
            let mut st = self.state();
            st.is_loading = true;
            st.error = None;
        }

        for &page in pages {
            if self.state().loaded_index_pages.contains(&page) {
                continue;
            }

            match self.service.index_page(page).await {
                Ok(shows) => {
                    debug!(page, count = shows.len(), "Loaded index page");
                    let mut st = self.state();
                    for show in shows {
                        st.file_show(show);
                    }
                    st.loaded_index_pages.insert(page);
                }
                Err(e) if e.is_not_found() => {
                    debug!(page, "Index page not found, end of pagination");
                    break;
                }
                Err(e) => {
                    warn!(page, error = %e, "Index page load failed");
                    self.state().error = Some(e.to_string());
                    break;
                }
            }
        }

        self.state().is_loading = false;
    }

    /// Get a show by id, fetching at most once per id: a cached show is
    /// returned without touching the network.
    ///
    /// On failure the global error is set and the error is re-raised.
    pub async fn fetch_show_details(&self, id: u64) -> Result<Show, ApiError> {
        if let Some(show) = self.state().shows_by_id.get(&id) {
            return Ok(show.clone());
        }

        {
            let mut st = self.state();
            st.is_loading = true;
            st.error = None;
        }

        let result = self.service.show(id).await;

        let mut st = self.state();
        st.is_loading = false;
        match result {
            Ok(show) => {
                st.shows_by_id.insert(show.id, show.clone());
                Ok(show)
            }
            Err(e) => {
                st.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Search shows by name. The most recent call wins: a response arriving
    /// for a superseded query is discarded wholesale, and a blank query
    /// clears results and error without touching the network.
    ///
    /// Matched shows are also merged into the show cache. Failures land in
    /// [`search_error`](Self::search_error) rather than being re-raised.
    pub async fn search(&self, query: &str) {
        let token = self.search_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let trimmed = query.trim();

        {
            let mut st = self.state();
            st.search.query = query.to_string();
            st.search.latest_token = token;
            if trimmed.is_empty() {
                st.search.results.clear();
                st.search.error = None;
                st.search.is_loading = false;
                return;
            }
            st.search.is_loading = true;
            st.search.error = None;
        }

        let result = self.service.search_shows(trimmed).await;

        let mut st = self.state();
        if st.search.latest_token != token {
            debug!(query = trimmed, "Discarding stale search response");
            return;
        }
        st.search.is_loading = false;
        match result {
            Ok(items) => {
                let found: Vec<Show> = items.into_iter().map(|item| item.show).collect();
                for show in &found {
                    st.shows_by_id.insert(show.id, show.clone());
                }
                st.search.results = found;
            }
            Err(e) => {
                warn!(query = trimmed, error = %e, "Show search failed");
                st.search.error = Some(e.to_string());
            }
        }
    }

    /// Episodes for a show, fetched once per show id. If a fetch for the same
    /// show is already in flight the call returns an empty sequence instead
    /// of issuing a duplicate request; fetches for other shows proceed
    /// independently.
    ///
    /// On failure the episodes error is set and the error re-raised.
    pub async fn fetch_episodes(&self, show_id: u64) -> Result<Vec<Episode>, ApiError> {
        {
            let mut st = self.state();
            if let Some(episodes) = st.episodes_by_show_id.get(&show_id) {
                if !episodes.is_empty() {
                    return Ok(episodes.clone());
                }
            }
            if !st.episodes_in_flight.insert(show_id) {
                return Ok(Vec::new());
            }
            st.episodes_error = None;
        }

        let result = self.service.episodes(show_id).await;

        let mut st = self.state();
        st.episodes_in_flight.remove(&show_id);
        match result {
            Ok(episodes) => {
                st.episodes_by_show_id.insert(show_id, episodes.clone());
                Ok(episodes)
            }
            Err(e) => {
                st.episodes_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Cast for a show; same caching and in-flight rules as
    /// [`fetch_episodes`](Self::fetch_episodes).
    pub async fn fetch_cast(&self, show_id: u64) -> Result<Vec<CastMember>, ApiError> {
        {
            let mut st = self.state();
            if let Some(cast) = st.cast_by_show_id.get(&show_id) {
                if !cast.is_empty() {
                    return Ok(cast.clone());
                }
            }
            if !st.cast_in_flight.insert(show_id) {
                return Ok(Vec::new());
            }
            st.cast_error = None;
        }

        let result = self.service.cast(show_id).await;

        let mut st = self.state();
        st.cast_in_flight.remove(&show_id);
        match result {
            Ok(cast) => {
                st.cast_by_show_id.insert(show_id, cast.clone());
                Ok(cast)
            }
            Err(e) => {
                st.cast_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    /// All genre buckets resolved to shows, each sorted descending by rating
    /// (shows without a rating last). Ids that no longer resolve are dropped,
    /// and genres left with zero shows are omitted.
    pub fn grouped_by_genre(&self) -> BTreeMap<String, Vec<Show>> {
        let st = self.state();
        let mut grouped = BTreeMap::new();
        for (genre, ids) in &st.genre_to_show_ids {
            let shows = resolve_sorted(&st.shows_by_id, ids);
            if !shows.is_empty() {
                grouped.insert(genre.clone(), shows);
            }
        }
        grouped
    }

    /// Shows for one genre, rating-sorted. Unknown genres yield an empty
    /// list, never an error.
    pub fn shows_for_genre(&self, name: &str) -> Vec<Show> {
        let st = self.state();
        st.genre_to_show_ids
            .get(name)
            .map(|ids| resolve_sorted(&st.shows_by_id, ids))
            .unwrap_or_default()
    }

    /// A show's episodes grouped by season, each season ascending by episode
    /// number. Seasons may arrive as numeric strings and are coerced;
    /// episodes whose season does not coerce to a number are dropped from
    /// the grouping (but stay in the raw per-show list).
    pub fn episodes_by_season(&self, show_id: u64) -> BTreeMap<i64, Vec<Episode>> {
        let st = self.state();
        let mut by_season: BTreeMap<i64, Vec<Episode>> = BTreeMap::new();
        let Some(episodes) = st.episodes_by_show_id.get(&show_id) else {
            return by_season;
        };

        for episode in episodes {
            let Some(season) = episode.season.as_ref().and_then(|s| s.as_season()) else {
                continue;
            };
            by_season.entry(season).or_default().push(episode.clone());
        }

        for episodes in by_season.values_mut() {
            episodes.sort_by_key(|e| e.number.unwrap_or(EPISODE_NUMBER_SENTINEL));
        }

        by_season
    }

    // ── State accessors ─────────────────────────────────────────

    pub fn show(&self, id: u64) -> Option<Show> {
        self.state().shows_by_id.get(&id).cloned()
    }

    pub fn cast_for(&self, show_id: u64) -> Vec<CastMember> {
        self.state()
            .cast_by_show_id
            .get(&show_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    pub fn search_query(&self) -> String {
        self.state().search.query.clone()
    }

    pub fn search_results(&self) -> Vec<Show> {
        self.state().search.results.clone()
    }

    pub fn is_search_loading(&self) -> bool {
        self.state().search.is_loading
    }

    pub fn search_error(&self) -> Option<String> {
        self.state().search.error.clone()
    }

    pub fn is_episodes_loading(&self) -> bool {
        !self.state().episodes_in_flight.is_empty()
    }

    pub fn episodes_error(&self) -> Option<String> {
        self.state().episodes_error.clone()
    }

    pub fn is_cast_loading(&self) -> bool {
        !self.state().cast_in_flight.is_empty()
    }

    pub fn cast_error(&self) -> Option<String> {
        self.state().cast_error.clone()
    }
}

/// Resolve ids through the show cache, dropping ids that no longer resolve,
/// then sort descending by rating. The sort is stable, so equal ratings keep
/// their discovery order.
fn resolve_sorted(shows_by_id: &HashMap<u64, Show>, ids: &[u64]) -> Vec<Show> {
    let mut shows: Vec<Show> = ids
        .iter()
        .filter_map(|id| shows_by_id.get(id).cloned())
        .collect();
    shows.sort_by(|a, b| {
        b.rating_key()
            .partial_cmp(&a.rating_key())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    shows
}
