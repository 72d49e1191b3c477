//!
//! src/fetch.rs  Andrew Belles  Oct 19th, 2026
//!
//! Defines methods for hitting the playlist api endpoints and
//! decoding their responses into typed results
//!

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, header, redirect, RequestBuilder, Response};
use reqwest::cookie::{CookieStore, Jar};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::config::{ApiConfig, HttpConfig, CSRF_COOKIE, CSRF_HEADER};
use crate::csrf;
use crate::types::{Page, Playlist, PlaylistId, PlaylistPayload, Track};
use crate::AdminError;

/// Client building functionality
fn client_helper(http: &HttpConfig) -> reqwest::ClientBuilder {
    Client::builder()
        .timeout(http.timeout)
        .connect_timeout(http.connect_timeout)
        .pool_max_idle_per_host(http.pool_max_idle_per_host)
        .pool_idle_timeout(Some(http.pool_idle_timeout))
        .redirect(redirect::Policy::limited(http.max_redirects as usize))
}

pub fn admin_client(http: &HttpConfig, jar: Arc<Jar>) -> Result<Client, AdminError> {
    let mut h = header::HeaderMap::new();
    h.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
    client_helper(http)
        .default_headers(h)
        .cookie_provider(jar)
        .build()
        .map_err(|e| AdminError::Config(format!("build client: {e}")))
}

///
/// Everything the admin page needs from the server. Each call is a
/// single request and reports its own typed failure
///
#[async_trait]
pub trait PlaylistApi: Send + Sync {
    async fn list_playlists(&self) -> Result<Page<Playlist>, AdminError>;
    async fn get_playlist(&self, id: &PlaylistId) -> Result<Playlist, AdminError>;
    async fn create_playlist(&self, payload: &PlaylistPayload) -> Result<Playlist, AdminError>;
    async fn update_playlist(&self, id: &PlaylistId, payload: &PlaylistPayload) ->
        Result<Playlist, AdminError>;
    async fn delete_playlist(&self, id: &PlaylistId) -> Result<(), AdminError>;

    /// `cursor` is a `next` link from a previous page, `None` for the first page
    async fn track_page(&self, cursor: Option<&str>) -> Result<Page<Track>, AdminError>;
}

#[async_trait]
impl<T: PlaylistApi + ?Sized> PlaylistApi for Arc<T> {
    async fn list_playlists(&self) -> Result<Page<Playlist>, AdminError> {
        (**self).list_playlists().await
    }

    async fn get_playlist(&self, id: &PlaylistId) -> Result<Playlist, AdminError> {
        (**self).get_playlist(id).await
    }

    async fn create_playlist(&self, payload: &PlaylistPayload) -> Result<Playlist, AdminError> {
        (**self).create_playlist(payload).await
    }

    async fn update_playlist(&self, id: &PlaylistId, payload: &PlaylistPayload) ->
        Result<Playlist, AdminError> {
        (**self).update_playlist(id, payload).await
    }

    async fn delete_playlist(&self, id: &PlaylistId) -> Result<(), AdminError> {
        (**self).delete_playlist(id).await
    }

    async fn track_page(&self, cursor: Option<&str>) -> Result<Page<Track>, AdminError> {
        (**self).track_page(cursor).await
    }
}

#[derive(Clone, Debug)]
pub struct AdminClient {
    pub http: Client,
    pub base: Url,
    jar: Arc<Jar>
}

impl AdminClient {
    pub fn new(http_config: &HttpConfig, cfg: &ApiConfig) -> Result<Self, AdminError> {
        let jar = Arc::new(Jar::default());
        if let Some(seed) = cfg.cookie.as_deref() {
            seed.split(';')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .for_each(|c| jar.add_cookie_str(c, &cfg.base_url));
        }

        let http = admin_client(http_config, jar.clone())?;
        Ok( Self {
            http,
            base: cfg.base_url.clone(),
            jar
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Current csrftoken cookie, URL-decoded. Read from the jar on every
    /// call so tokens rotated by the server are picked up
    pub fn csrf_token(&self) -> Option<String> {
        let cookies = self.jar.cookies(&self.base)?;
        let cookies = cookies.to_str().ok()?;
        csrf::cookie_value(cookies, CSRF_COOKIE)
    }

    fn with_csrf(&self, request: RequestBuilder) -> RequestBuilder {
        match self.csrf_token() {
            Some(token) => request.header(CSRF_HEADER, token),
            None => {
                warn!(cookie = CSRF_COOKIE, "csrf.missing");
                request
            }
        }
    }

    /// GET /playlists
    pub fn playlists(&self) -> RequestBuilder {
        self.http.get(self.endpoint(&["playlists"]))
    }

    /// GET /playlists/{uuid}
    pub fn playlist(&self, id: &PlaylistId) -> RequestBuilder {
        self.http.get(self.endpoint(&["playlists", &id.0]))
    }

    /// POST /playlists
    pub fn create(&self, payload: &PlaylistPayload) -> RequestBuilder {
        let request = self.http.post(self.endpoint(&["playlists"])).json(payload);
        self.with_csrf(request)
    }

    /// PUT /playlists/{uuid}
    pub fn update(&self, id: &PlaylistId, payload: &PlaylistPayload) -> RequestBuilder {
        let request = self.http.put(self.endpoint(&["playlists", &id.0])).json(payload);
        self.with_csrf(request)
    }

    /// DELETE /playlists/{uuid}
    pub fn delete(&self, id: &PlaylistId) -> RequestBuilder {
        let request = self.http.delete(self.endpoint(&["playlists", &id.0]));
        self.with_csrf(request)
    }

    /// GET /tracks, or the server provided `next` link
    pub fn tracks(&self, cursor: Option<&str>) -> Result<RequestBuilder, AdminError> {
        let url = match cursor {
            Some(next) => self.base.join(next)?,
            None => self.endpoint(&["tracks"])
        };
        Ok(self.http.get(url))
    }
}

async fn expect_success(response: Response) -> Result<Response, AdminError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AdminError::Status { status: status.as_u16(), body })
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, AdminError> {
    let response = expect_success(request.send().await?).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl PlaylistApi for AdminClient {
    async fn list_playlists(&self) -> Result<Page<Playlist>, AdminError> {
        debug!("api.playlists.list");
        send_json(self.playlists()).await
    }

    async fn get_playlist(&self, id: &PlaylistId) -> Result<Playlist, AdminError> {
        debug!(playlist = %id, "api.playlists.get");
        send_json(self.playlist(id)).await
    }

    async fn create_playlist(&self, payload: &PlaylistPayload) -> Result<Playlist, AdminError> {
        debug!(name = %payload.name, tracks = payload.tracks.len(), "api.playlists.create");
        send_json(self.create(payload)).await
    }

    async fn update_playlist(&self, id: &PlaylistId, payload: &PlaylistPayload) ->
        Result<Playlist, AdminError> {
        debug!(playlist = %id, tracks = payload.tracks.len(), "api.playlists.update");
        send_json(self.update(id, payload)).await
    }

    async fn delete_playlist(&self, id: &PlaylistId) -> Result<(), AdminError> {
        debug!(playlist = %id, "api.playlists.delete");
        expect_success(self.delete(id).send().await?).await?;
        Ok(())
    }

    async fn track_page(&self, cursor: Option<&str>) -> Result<Page<Track>, AdminError> {
        debug!(cursor = cursor.unwrap_or("<first>"), "api.tracks.page");
        send_json(self.tracks(cursor)?).await
    }
}
