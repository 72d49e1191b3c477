//!
//! src/catalog.rs  Andrew Belles  Oct 19th, 2026
//!
//! Walks the paginated track collection one page at a time, bounded
//! by a page limit and guarded against cyclic `next` links
//!

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::fetch::PlaylistApi;
use crate::types::{Page, Track};
use crate::AdminError;

#[derive(Debug)]
pub struct TrackPager {
    cursor: Option<String>,
    seen: HashSet<String>,
    fetched: usize,
    max_pages: usize,
    done: bool
}

impl TrackPager {
    pub fn new(max_pages: usize) -> Self {
        Self {
            cursor: None,
            seen: HashSet::new(),
            fetched: 0,
            max_pages,
            done: false
        }
    }

    /// Fetches the next page in the chain. `None` once the chain is
    /// exhausted, after an error, or when a `next` link repeats or leads
    /// back to the first page
    pub async fn next_page<A>(&mut self, api: &A) -> Option<Result<Page<Track>, AdminError>>
    where
        A: PlaylistApi + ?Sized
    {
        if self.done {
            return None;
        }
        if self.fetched >= self.max_pages {
            self.done = true;
            return Some(Err(AdminError::Pagination(
                format!("track listing exceeded {} pages", self.max_pages)
            )));
        }

        let page = match api.track_page(self.cursor.as_deref()).await {
            Ok(page) => page,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        // a page without `previous` is the head of the chain; meeting it
        // again means a `next` link looped back to the first page
        if self.fetched > 0 && page.previous.is_none() {
            warn!(cursor = self.cursor.as_deref().unwrap_or_default(), "tracks.page.restart");
            self.done = true;
            return None;
        }
        self.fetched += 1;
        debug!(
            page = self.fetched, results = page.results.len(),
            has_next = page.next.is_some(), "tracks.page"
        );

        match page.next.as_deref() {
            None => self.done = true,
            Some(next) if !self.seen.insert(next.to_string()) => {
                warn!(next = next, "tracks.page.cycle");
                self.done = true;
            }
            Some(next) => self.cursor = Some(next.to_string())
        }
        Some(Ok(page))
    }
}

/// Loads every track the server lists, in server order
pub async fn fetch_catalog<A>(api: &A, max_pages: usize) -> Result<Vec<Track>, AdminError>
where
    A: PlaylistApi + ?Sized
{
    let mut pager = TrackPager::new(max_pages);
    let mut tracks = Vec::new();
    while let Some(page) = pager.next_page(api).await {
        tracks.extend(page?.results);
    }
    Ok(tracks)
}
