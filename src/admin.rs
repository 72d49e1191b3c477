//!
//! src/admin.rs  Andrew Belles  Oct 19th, 2026
//!
//! Defines the admin controller. Every user action runs its requests,
//! folds the typed result into the view state and decides how a failure
//! is surfaced: inline for the playlist table, an alert for track
//! loading, a log line for mutations
//!

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::catalog::{fetch_catalog, TrackPager};
use crate::fetch::PlaylistApi;
use crate::types::PlaylistId;
use crate::view::{
    self, CreateForm, EditForm, EditModal, PlaylistTable, TrackRow, ViewState, TRACKS_ALERT
};
use crate::AdminError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOpen {
    Opened,
    Cancelled
}

fn log_failure(event: &'static str, e: &AdminError) {
    match e {
        AdminError::Status { status, body } =>
            error!(status = *status, body = %body, kind = ?e.kind(), "{event}"),
        _ => error!(error = %e, kind = ?e.kind(), "{event}")
    }
}

pub struct PlaylistAdmin<A> {
    api: A,
    state: ViewState,
    max_track_pages: usize,
    edit_cancel: CancellationToken
}

impl<A: PlaylistApi> PlaylistAdmin<A> {
    pub fn new(api: A, max_track_pages: usize) -> Self {
        Self {
            api,
            state: ViewState::default(),
            max_track_pages,
            edit_cancel: CancellationToken::new()
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn render(&self) -> String {
        view::render_page(&self.state)
    }

    /// Token that aborts an in-flight `open_edit`, i.e. the user closed
    /// the modal before it finished loading
    pub fn edit_cancel_token(&self) -> CancellationToken {
        self.edit_cancel.clone()
    }

    /// GET /playlists, replacing the whole table either way
    pub async fn refresh_playlists(&mut self) -> Result<usize, AdminError> {
        match self.api.list_playlists().await {
            Ok(page) => {
                let count = page.results.len();
                info!(playlists = count, "playlists.list");
                self.state.table = PlaylistTable::Loaded(page.results);
                Ok(count)
            }
            Err(e) => {
                log_failure("playlists.list.failed", &e);
                self.state.table = PlaylistTable::Failed;
                Err(e)
            }
        }
    }

    /// Walks every track page into the option list. Pages that arrived
    /// before a failure stay applied
    pub async fn load_tracks(&mut self) -> Result<usize, AdminError> {
        let mut pager = TrackPager::new(self.max_track_pages);
        while let Some(page) = pager.next_page(&self.api).await {
            match page {
                Ok(page) => self.state.apply_track_page(page),
                Err(e) => {
                    log_failure("tracks.load.failed", &e);
                    self.state.alert = Some(TRACKS_ALERT.to_string());
                    return Err(e);
                }
            }
        }
        info!(tracks = self.state.track_options.len(), "tracks.load");
        Ok(self.state.track_options.len())
    }

    pub fn dismiss_alert(&mut self) {
        self.state.alert = None;
    }

    /// Fetches the playlist and the full catalog concurrently and only
    /// populates the modal once both are in
    pub async fn open_edit(&mut self, id: &PlaylistId) -> Result<EditOpen, AdminError> {
        let token = self.edit_cancel.clone();
        let api = &self.api;
        let max_pages = self.max_track_pages;

        let fetched = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            joined = async {
                tokio::join!(api.get_playlist(id), fetch_catalog(api, max_pages))
            } => Some(joined)
        };

        let Some((playlist, catalog)) = fetched else {
            info!(playlist = %id, "edit.open.cancelled");
            self.edit_cancel = CancellationToken::new();
            self.state.edit = EditModal::Closed;
            return Ok(EditOpen::Cancelled);
        };

        let playlist = match playlist {
            Ok(p) => p,
            Err(e) => {
                log_failure("edit.open.failed", &e);
                return Err(e);
            }
        };
        let catalog = match catalog {
            Ok(tracks) => Some(tracks),
            Err(e) => {
                warn!(playlist = %id, error = %e, "edit.open.catalog_failed");
                None
            }
        };

        info!(playlist = %id, rows = playlist.tracks.len(), "edit.open");
        self.state.edit = EditModal::Open(EditForm::from_playlist(&playlist, catalog.as_deref()));
        Ok(EditOpen::Opened)
    }

    pub fn cancel_edit(&mut self) {
        self.edit_cancel.cancel();
        self.edit_cancel = CancellationToken::new();
        self.state.edit = EditModal::Closed;
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut EditForm> {
        self.state.edit.form_mut()
    }

    /// PUT the modal's contents. On success the modal closes and the table
    /// is re-fetched in place, on failure the modal is left as it was
    pub async fn save_edit(&mut self) -> Result<(), AdminError> {
        let Some(form) = self.state.edit.form() else {
            return Err(AdminError::State("edit modal is closed".to_string()));
        };
        let id = form.playlist.clone();
        let payload = form.payload();

        if let Err(e) = self.api.update_playlist(&id, &payload).await {
            log_failure("playlists.update.failed", &e);
            return Err(e);
        }
        info!(playlist = %id, tracks = payload.tracks.len(), "playlists.update");
        self.state.edit = EditModal::Closed;
        let _ = self.refresh_playlists().await;
        Ok(())
    }

    pub async fn delete_playlist(&mut self, id: &PlaylistId) -> Result<(), AdminError> {
        if let Err(e) = self.api.delete_playlist(id).await {
            log_failure("playlists.delete.failed", &e);
            return Err(e);
        }
        info!(playlist = %id, "playlists.delete");
        let _ = self.refresh_playlists().await;
        Ok(())
    }

    pub fn open_create(&mut self) {
        self.state.create.visible = true;
    }

    pub fn close_create(&mut self) {
        self.state.create.visible = false;
    }

    pub fn create_form_mut(&mut self) -> &mut CreateForm {
        &mut self.state.create
    }

    /// POST the create form. Success resets the form to one empty row
    pub async fn create_playlist(&mut self) -> Result<(), AdminError> {
        let payload = self.state.create.payload();
        match self.api.create_playlist(&payload).await {
            Ok(created) => {
                info!(playlist = %created.uuid, tracks = payload.tracks.len(), "playlists.create");
                self.state.create.reset(&self.state.track_options);
                self.state.create.visible = false;
                let _ = self.refresh_playlists().await;
                Ok(())
            }
            Err(e) => {
                log_failure("playlists.create.failed", &e);
                Err(e)
            }
        }
    }

    /// New create row offering whatever tracks are loaded right now
    pub fn add_create_row(&mut self) {
        let options = self.state.track_options.clone();
        self.state.create.rows.push(TrackRow::with_options(options));
    }

    /// Appends an empty edit row, then fills only that row's selector
    /// from a fresh catalog fetch
    pub async fn add_edit_row(&mut self) -> Result<(), AdminError> {
        let Some(form) = self.state.edit.form_mut() else {
            return Err(AdminError::State("edit modal is closed".to_string()));
        };
        form.rows.push(TrackRow::default());

        let catalog = match fetch_catalog(&self.api, self.max_track_pages).await {
            Ok(tracks) => tracks,
            Err(e) => {
                log_failure("edit.row.tracks_failed", &e);
                return Err(e);
            }
        };
        if let Some(last) = self.state.edit.form_mut().and_then(|f| f.rows.last_mut()) {
            last.options = catalog;
        }
        Ok(())
    }
}
