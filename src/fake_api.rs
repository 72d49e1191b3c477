//!
//! In-memory `PlaylistApi` for tests. Replies are scripted up front
//! and every call is recorded
//!

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::fetch::PlaylistApi;
use crate::types::{Page, Playlist, PlaylistId, PlaylistPayload, Track};
use crate::AdminError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Get(String),
    Create(PlaylistPayload),
    Update(String, PlaylistPayload),
    Delete(String),
    Tracks(Option<String>)
}

#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Status(u16),
    Transport
}

impl<T: Clone> Reply<T> {
    fn into_result(self) -> Result<T, AdminError> {
        match self {
            Reply::Ok(v) => Ok(v),
            Reply::Status(status) => Err(AdminError::Status {
                status,
                body: format!("{{\"detail\": \"status {status}\"}}")
            }),
            Reply::Transport => Err(AdminError::Transport("connection refused".to_string()))
        }
    }
}

pub struct FakeApi {
    list: Mutex<Reply<Vec<Playlist>>>,
    playlists: Mutex<HashMap<String, Playlist>>,
    track_pages: Mutex<HashMap<Option<String>, Reply<Page<Track>>>>,
    mutation_status: Mutex<Option<u16>>,
    track_delay: Option<Duration>,
    calls: Mutex<Vec<Call>>
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            list: Mutex::new(Reply::Ok(Vec::new())),
            playlists: Mutex::new(HashMap::new()),
            track_pages: Mutex::new(HashMap::new()),
            mutation_status: Mutex::new(None),
            track_delay: None,
            calls: Mutex::new(Vec::new())
        }
    }
}

impl FakeApi {
    pub fn with_list(self, reply: Reply<Vec<Playlist>>) -> Self {
        *self.list.lock().unwrap() = reply;
        self
    }

    pub fn with_playlist(self, playlist: Playlist) -> Self {
        self.playlists.lock().unwrap().insert(playlist.uuid.0.clone(), playlist);
        self
    }

    pub fn with_track_page(self, cursor: Option<&str>, reply: Reply<Page<Track>>) -> Self {
        self.track_pages.lock().unwrap().insert(cursor.map(str::to_string), reply);
        self
    }

    pub fn with_track_delay(mut self, delay: Duration) -> Self {
        self.track_delay = Some(delay);
        self
    }

    pub fn failing_mutations(self, status: u16) -> Self {
        *self.mutation_status.lock().unwrap() = Some(status);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn list_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::List))
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn mutation(&self) -> Result<(), AdminError> {
        match *self.mutation_status.lock().unwrap() {
            Some(status) => Reply::<()>::Status(status).into_result(),
            None => Ok(())
        }
    }
}

#[async_trait]
impl PlaylistApi for FakeApi {
    async fn list_playlists(&self) -> Result<Page<Playlist>, AdminError> {
        self.record(Call::List);
        let reply = self.list.lock().unwrap().clone();
        reply.into_result().map(|results| Page { results, next: None, previous: None })
    }

    async fn get_playlist(&self, id: &PlaylistId) -> Result<Playlist, AdminError> {
        self.record(Call::Get(id.0.clone()));
        let found = self.playlists.lock().unwrap().get(&id.0).cloned();
        match found {
            Some(p) => Ok(p),
            None => Reply::<Playlist>::Status(404).into_result()
        }
    }

    async fn create_playlist(&self, payload: &PlaylistPayload) -> Result<Playlist, AdminError> {
        self.record(Call::Create(payload.clone()));
        self.mutation()?;
        Ok(Playlist {
            uuid: PlaylistId::from("created"),
            name: payload.name.clone(),
            tracks: Vec::new()
        })
    }

    async fn update_playlist(&self, id: &PlaylistId, payload: &PlaylistPayload) ->
        Result<Playlist, AdminError> {
        self.record(Call::Update(id.0.clone(), payload.clone()));
        self.mutation()?;
        Ok(Playlist { uuid: id.clone(), name: payload.name.clone(), tracks: Vec::new() })
    }

    async fn delete_playlist(&self, id: &PlaylistId) -> Result<(), AdminError> {
        self.record(Call::Delete(id.0.clone()));
        self.mutation()
    }

    async fn track_page(&self, cursor: Option<&str>) -> Result<Page<Track>, AdminError> {
        self.record(Call::Tracks(cursor.map(str::to_string)));
        if let Some(delay) = self.track_delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self.track_pages.lock().unwrap()
            .get(&cursor.map(str::to_string))
            .cloned()
            .unwrap_or(Reply::Status(404));
        reply.into_result()
    }
}

// fixtures

pub fn track(id: &str, name: &str) -> Track {
    Track { uuid: id.into(), name: name.to_string() }
}

pub fn assignment(id: &str, order: i64, name: &str) -> crate::types::TrackAssignment {
    crate::types::TrackAssignment {
        track: Some(id.into()),
        uuid: Some(id.into()),
        order: Some(order),
        track_name: name.to_string()
    }
}

pub fn playlist(id: &str, name: &str, tracks: Vec<crate::types::TrackAssignment>) -> Playlist {
    Playlist { uuid: id.into(), name: name.to_string(), tracks }
}

pub fn page(results: Vec<Track>, next: Option<&str>, previous: Option<&str>) -> Page<Track> {
    Page {
        results,
        next: next.map(str::to_string),
        previous: previous.map(str::to_string)
    }
}
