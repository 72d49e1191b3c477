use std::fmt;
use serde::{Deserialize, Deserializer, Serialize};

/// Server issued playlist identifier, treated as opaque
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(pub String);

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub String);

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for PlaylistId {
    fn from(s: &str) -> Self { PlaylistId(s.to_string()) }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self { TrackId(s.to_string()) }
}

// null and missing both collapse to the default value
fn null_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    #[serde(alias = "id", default, deserialize_with = "null_default")]
    pub uuid: TrackId,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String
}

/// One track's position within a playlist. The server echoes the
/// track uuid both as `track` and `uuid`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackAssignment {
    #[serde(default)]
    pub track: Option<TrackId>,
    #[serde(default)]
    pub uuid: Option<TrackId>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default, deserialize_with = "null_default")]
    pub track_name: String
}

impl TrackAssignment {
    pub fn track_id(&self) -> Option<&TrackId> {
        self.track.as_ref().or(self.uuid.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(default, deserialize_with = "null_default")]
    pub uuid: PlaylistId,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub tracks: Vec<TrackAssignment>
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default, deserialize_with = "null_default")]
    pub results: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>
}

/// Body of create and update requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackOrder {
    pub track: TrackId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistPayload {
    pub name: String,
    pub tracks: Vec<TrackOrder>
}
