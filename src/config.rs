use url::Url;
use std::path::PathBuf;
use std::time;
use crate::AdminError;

/// Constants for HTTP Config
pub const HTTP_TIMEOUT: u64 = 8000;
pub const HTTP_CONNECT_TIMEOUT: u64 = 2000;
pub const HTTP_POOL_MAX_IDLE: usize = 16;
pub const HTTP_POOL_IDLE_TIMEOUT: u64 = 90000;
pub const HTTP_MAX_REDIRECTS: u8 = 4;

/// Constants for the admin api
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api/v1/";
pub const DEFAULT_MAX_TRACK_PAGES: usize = 100;
pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Reads an optional variable, treating blank values as unset
fn env_optional(s: &str) -> Option<String> {
    match std::env::var(s) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None
    }
}

fn env_to_usize(s: &str, default: usize) -> Result<usize, AdminError> {
    match env_optional(s) {
        Some(v) => v.trim().parse::<usize>()
            .map_err(|_| AdminError::Config(format!("{s} must be an unsigned integer"))),
        None => Ok(default)
    }
}

/// Ensures that url is http(s)
fn ensure_http(url: &Url) -> Result<(), String> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("URL must be http or https (got {other}): {url}"))
    }
}

/// Parses the api root, requires a host and forces a trailing slash so
/// relative joins stay under it
pub fn parse_api_base(raw: &str) -> Result<Url, AdminError> {
    let mut base = Url::parse(raw.trim())
        .map_err(|e| AdminError::Config(format!("PLAYLIST_API_BASE invalid {e}")))?;

    ensure_http(&base).map_err(AdminError::Config)?;
    if base.host_str().is_none() {
        return Err(AdminError::Config(format!("URL missing host: {base}")));
    }

    if !base.path().ends_with('/') {
        let mut path = base.path().to_string();
        path.push('/');
        base.set_path(&path);
    }
    base.set_query(None);
    base.set_fragment(None);
    Ok(base)
}

///
/// Configuration for the playlist api
///
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,              // http://localhost:8000/api/v1/
    pub cookie: Option<String>,     // seed for the cookie jar
    pub max_track_pages: usize      // default 100
}

fn build_api() -> Result<ApiConfig, AdminError> {
    let base_url = env_optional("PLAYLIST_API_BASE")
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    let base_url = parse_api_base(&base_url)?;

    let cookie = env_optional("PLAYLIST_ADMIN_COOKIE");
    let max_track_pages = env_to_usize("PLAYLIST_MAX_TRACK_PAGES", DEFAULT_MAX_TRACK_PAGES)?;
    if max_track_pages == 0 {
        return Err(AdminError::Config("PLAYLIST_MAX_TRACK_PAGES must be > 0".to_string()));
    }

    Ok( ApiConfig { base_url, cookie, max_track_pages } )
}

///
/// Configuration for Http timeouts, pooling, etc.
///
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: time::Duration,
    pub connect_timeout: time::Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: time::Duration,
    pub max_redirects: u8
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: time::Duration::from_millis(HTTP_TIMEOUT),
            connect_timeout: time::Duration::from_millis(HTTP_CONNECT_TIMEOUT),
            pool_max_idle_per_host: HTTP_POOL_MAX_IDLE,
            pool_idle_timeout: time::Duration::from_millis(HTTP_POOL_IDLE_TIMEOUT),
            max_redirects: HTTP_MAX_REDIRECTS
        }
    }
}

fn build_http() -> Result<HttpConfig, AdminError> {
    let default = HttpConfig::default();
    let timeout = env_to_usize("PLAYLIST_HTTP_TIMEOUT_MS", HTTP_TIMEOUT as usize)?;
    Ok( HttpConfig {
        timeout: time::Duration::from_millis(timeout as u64),
        ..default
    })
}

///
/// Configuration for Logger
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Compact
}

impl LogFormat {
    pub fn parse(raw: &str) -> Result<Self, AdminError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "compact" | "pretty" => Ok(LogFormat::Compact),
            other => Err(AdminError::Config(
                format!("PLAYLIST_LOG_FORMAT must be json or compact (got {other})")
            ))
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter_directives: String,
    pub include_file_line: bool,
    pub include_target: bool,
    pub format: LogFormat,
    pub file: Option<PathBuf>      // stderr when unset
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter_directives: "info,playlist_admin=debug,reqwest=warn".to_string(),
            include_file_line: true,
            include_target: true,
            format: LogFormat::Json,
            file: None
        }
    }
}

fn build_logging() -> Result<LoggingConfig, AdminError> {
    let format = match env_optional("PLAYLIST_LOG_FORMAT") {
        Some(raw) => LogFormat::parse(&raw)?,
        None => LogFormat::default()
    };
    let file = env_optional("PLAYLIST_LOG_FILE").map(PathBuf::from);
    Ok( LoggingConfig { format, file, ..LoggingConfig::default() } )
}

///
/// AppConfig which holds everything the client and logger need
///
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig
}

///
/// Return all environment variables to caller at program start.
///
pub fn load_config() -> Result<AppConfig, AdminError> {
    dotenvy::dotenv().ok();

    let api     = build_api()?;
    let http    = build_http()?;
    let logging = build_logging()?;

    Ok( AppConfig { api, http, logging } )
}
