//!
//! src/view.rs  Andrew Belles  Oct 19th, 2026
//!
//! View state of the admin page and pure render functions that turn
//! it into markup. Nothing in here touches the network
//!

use std::fmt::Write;

use crate::types::{
    Page, Playlist, PlaylistId, PlaylistPayload, Track, TrackId, TrackOrder
};

pub const LIST_ERROR: &str = "Error fetching data";
pub const TRACKS_ALERT: &str = "Failed to load tracks.";

/// Sentinel some selectors report when nothing was ever loaded into them
const UNDEFINED_TRACK: &str = "undefined";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlaylistTable {
    #[default]
    Loading,
    Loaded(Vec<Playlist>),
    Failed
}

/// A track selector plus its order input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackRow {
    pub options: Vec<Track>,
    pub selected: Option<String>,   // None: behaves like an untouched <select>
    pub order: String
}

impl TrackRow {
    pub fn with_options(options: Vec<Track>) -> Self {
        Self { options, selected: None, order: String::new() }
    }

    /// Explicit selection, else the first option like a browser select
    pub fn value(&self) -> Option<&str> {
        match &self.selected {
            Some(s) => Some(s.as_str()),
            None => self.options.first().map(|t| t.uuid.0.as_str())
        }
    }

    pub fn select(&mut self, track: impl Into<String>) {
        self.selected = Some(track.into());
    }

    pub fn set_order(&mut self, order: impl Into<String>) {
        self.order = order.into();
    }

    fn track(&self) -> Option<TrackId> {
        self.value()
            .filter(|v| !v.is_empty() && *v != UNDEFINED_TRACK)
            .map(TrackId::from)
    }

    fn parsed_order(&self) -> Option<i64> {
        self.order.trim().parse::<i64>().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateForm {
    pub visible: bool,
    pub name: String,
    pub rows: Vec<TrackRow>
}

impl Default for CreateForm {
    fn default() -> Self {
        Self { visible: false, name: String::new(), rows: vec![TrackRow::default()] }
    }
}

impl CreateForm {
    /// Rows without a selected track are dropped, order is sent as given
    pub fn payload(&self) -> PlaylistPayload {
        let tracks = self.rows.iter()
            .filter_map(|row| row.track().map(|track| TrackOrder {
                track,
                order: row.parsed_order()
            }))
            .collect();
        PlaylistPayload { name: self.name.clone(), tracks }
    }

    /// Back to a single row with nothing selected
    pub fn reset(&mut self, options: &[Track]) {
        self.name.clear();
        self.rows = vec![TrackRow {
            options: options.to_vec(),
            selected: Some(String::new()),
            order: String::new()
        }];
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub playlist: PlaylistId,
    pub name: String,
    pub rows: Vec<TrackRow>
}

impl EditForm {
    /// One row per assignment, preselected to the assigned track. Without
    /// a catalog each row only offers its own track
    pub fn from_playlist(playlist: &Playlist, catalog: Option<&[Track]>) -> Self {
        let rows = playlist.tracks.iter()
            .map(|assignment| {
                let id = assignment.track_id().cloned();
                let options = match (catalog, &id) {
                    (Some(all), _) => all.to_vec(),
                    (None, Some(id)) => vec![Track {
                        uuid: id.clone(),
                        name: assignment.track_name.clone()
                    }],
                    (None, None) => Vec::new()
                };
                TrackRow {
                    options,
                    selected: id.map(|t| t.0),
                    order: assignment.order.map(|o| o.to_string()).unwrap_or_default()
                }
            })
            .collect();

        Self { playlist: playlist.uuid.clone(), name: playlist.name.clone(), rows }
    }

    /// Only rows with both a track and a numeric order are sent; the
    /// server replaces the playlist's assignments with exactly these
    pub fn payload(&self) -> PlaylistPayload {
        let tracks = self.rows.iter()
            .filter_map(|row| {
                let track = row.track()?;
                let order = row.parsed_order()?;
                Some(TrackOrder { track, order: Some(order) })
            })
            .collect();
        PlaylistPayload { name: self.name.clone(), tracks }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditModal {
    #[default]
    Closed,
    Open(EditForm)
}

impl EditModal {
    pub fn form(&self) -> Option<&EditForm> {
        match self {
            EditModal::Open(form) => Some(form),
            EditModal::Closed => None
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut EditForm> {
        match self {
            EditModal::Open(form) => Some(form),
            EditModal::Closed => None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub table: PlaylistTable,
    pub track_options: Vec<Track>,
    pub create: CreateForm,
    pub edit: EditModal,
    pub alert: Option<String>
}

impl ViewState {
    /// A page without a `previous` link starts the option list over
    pub fn apply_track_page(&mut self, page: Page<Track>) {
        if page.previous.is_none() {
            self.track_options.clear();
        }
        self.track_options.extend(page.results);
        if let Some(first) = self.create.rows.first_mut() {
            first.options = self.track_options.clone();
        }
    }
}

///
/// Render functions
///

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c)
        }
    }
    out
}

pub fn render_table_rows(table: &PlaylistTable) -> String {
    match table {
        PlaylistTable::Loading => String::new(),
        PlaylistTable::Failed => format!("<tr><td colspan=\"3\">{LIST_ERROR}</td></tr>"),
        PlaylistTable::Loaded(playlists) => playlists.iter()
            .map(render_playlist_row)
            .collect()
    }
}

fn render_playlist_row(playlist: &Playlist) -> String {
    let id = escape(&playlist.uuid.0);
    let items: String = playlist.tracks.iter()
        .map(|a| format!(
            "<li>Order: {} - {}</li>",
            a.order.map(|o| o.to_string()).unwrap_or_default(),
            escape(&a.track_name)
        ))
        .collect();

    format!(
        "<tr>\
<td class=\"playlist-name\" data-id=\"{id}\">{name}<ul>{items}</ul></td>\
<td><a href=\"#\" class=\"edit-btn\" data-id=\"{id}\"><i class=\"bi bi-pencil-square\"></i></a></td>\
<td><a href=\"#\" class=\"delete-btn\" data-id=\"{id}\"><i class=\"bi bi-trash\"></i></a></td>\
</tr>\n",
        name = escape(&playlist.name)
    )
}

/// Options for one selector. A selected value that is not among the
/// options gets a placeholder so the selection survives a re-render
pub fn render_options(options: &[Track], value: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(v) = value.filter(|v| !options.iter().any(|t| t.uuid.0 == *v)) {
        let _ = write!(out, "<option value=\"{0}\" selected>{0}</option>", escape(v));
    }
    for track in options {
        let selected = if value == Some(track.uuid.0.as_str()) { " selected" } else { "" };
        let _ = write!(
            out, "<option value=\"{}\"{selected}>{}</option>",
            escape(&track.uuid.0), escape(&track.name)
        );
    }
    out
}

fn render_row(row: &TrackRow, select_class: &str, order_class: &str) -> String {
    format!(
        "<div class=\"trackOrderItem\">\
<div class=\"form-group\"><label>Track</label>\
<select class=\"form-control {select_class}\" name=\"track\">{options}</select></div>\
<div class=\"form-group\"><label>Order</label>\
<input type=\"number\" class=\"form-control {order_class}\" name=\"order\" value=\"{order}\" \
placeholder=\"Enter order number\"></div>\
</div>\n",
        options = render_options(&row.options, row.value()),
        order = escape(&row.order)
    )
}

fn modal_class(visible: bool) -> &'static str {
    if visible { "modal show" } else { "modal" }
}

pub fn render_create_modal(form: &CreateForm) -> String {
    let rows: String = form.rows.iter()
        .map(|r| render_row(r, "trackSelect", "orderInput"))
        .collect();
    format!(
        "<div class=\"{class}\" id=\"exampleModal\">\
<input type=\"text\" class=\"form-control playlistNameInput\" value=\"{name}\">\
<div id=\"trackOrderList\">\n{rows}</div>\
<button class=\"btn addTrackOrderButton\">Add track</button>\
<button class=\"btn playlist_save\">Save</button>\
</div>\n",
        class = modal_class(form.visible),
        name = escape(&form.name)
    )
}

pub fn render_edit_modal(modal: &EditModal) -> String {
    let Some(form) = modal.form() else {
        return format!("<div class=\"{}\" id=\"editPlaylistModal\"></div>\n", modal_class(false));
    };
    let rows: String = form.rows.iter()
        .map(|r| render_row(r, "editTrackSelect", "editOrderInput"))
        .collect();
    format!(
        "<div class=\"{class}\" id=\"editPlaylistModal\">\
<input type=\"hidden\" id=\"editPlaylistId\" value=\"{id}\">\
<input type=\"text\" class=\"form-control\" id=\"editPlaylistNameInput\" value=\"{name}\">\
<div id=\"editTrackOrderList\">\n{rows}</div>\
<button class=\"btn addEditTrackOrderButton\">Add track</button>\
<button class=\"btn saveEditPlaylist\">Save</button>\
</div>\n",
        class = modal_class(true),
        id = escape(&form.playlist.0),
        name = escape(&form.name)
    )
}

pub fn render_alert(alert: Option<&str>) -> String {
    alert
        .map(|msg| format!("<div class=\"alert alert-danger\" role=\"alert\">{}</div>\n", escape(msg)))
        .unwrap_or_default()
}

pub fn render_page(state: &ViewState) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Playlists</title></head>\n<body>\n\
{alert}<table class=\"table\">\n<tbody id=\"result\">\n{rows}</tbody>\n</table>\n\
<select id=\"track_data\" class=\"form-control\">{options}</select>\n\
{create}{edit}</body>\n</html>\n",
        alert = render_alert(state.alert.as_deref()),
        rows = render_table_rows(&state.table),
        options = render_options(&state.track_options, None),
        create = render_create_modal(&state.create),
        edit = render_edit_modal(&state.edit)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrackAssignment;

    fn track(id: &str, name: &str) -> Track {
        Track { uuid: TrackId::from(id), name: name.to_string() }
    }

    fn assignment(id: &str, order: i64, name: &str) -> TrackAssignment {
        TrackAssignment {
            track: Some(TrackId::from(id)),
            uuid: Some(TrackId::from(id)),
            order: Some(order),
            track_name: name.to_string()
        }
    }

    fn playlist(id: &str, name: &str, tracks: Vec<TrackAssignment>) -> Playlist {
        Playlist { uuid: PlaylistId::from(id), name: name.to_string(), tracks }
    }

    fn row(selected: &str, order: &str) -> TrackRow {
        TrackRow {
            options: vec![track("t1", "Lithium"), track("t2", "Alive")],
            selected: Some(selected.to_string()),
            order: order.to_string()
        }
    }

    #[test]
    fn table_has_one_row_per_playlist_and_ordered_tracks() {
        let table = PlaylistTable::Loaded(vec![
            playlist("p1", "Seattle", vec![
                assignment("t2", 1, "Alive"),
                assignment("t1", 2, "Lithium"),
            ]),
            playlist("p2", "Empty", vec![]),
        ]);
        let html = render_table_rows(&table);

        assert_eq!(html.matches("<tr>").count(), 2);
        assert_eq!(html.matches("<li>").count(), 2);
        let alive = html.find("<li>Order: 1 - Alive</li>").unwrap();
        let lithium = html.find("<li>Order: 2 - Lithium</li>").unwrap();
        assert!(alive < lithium);
        assert!(html.contains("class=\"delete-btn\" data-id=\"p2\""));
    }

    #[test]
    fn failed_table_is_a_single_error_row() {
        let html = render_table_rows(&PlaylistTable::Failed);
        assert_eq!(html.matches("<tr>").count(), 1);
        assert_eq!(html, "<tr><td colspan=\"3\">Error fetching data</td></tr>");
    }

    #[test]
    fn names_are_escaped() {
        let table = PlaylistTable::Loaded(vec![
            playlist("p1", "<b>Rock & Roll</b>", vec![assignment("t1", 1, "\"Quoted\"")]),
        ]);
        let html = render_table_rows(&table);
        assert!(html.contains("&lt;b&gt;Rock &amp; Roll&lt;/b&gt;"));
        assert!(html.contains("&quot;Quoted&quot;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn create_payload_skips_rows_without_track() {
        let form = CreateForm {
            visible: true,
            name: "Grunge".to_string(),
            rows: vec![row("t1", "1"), row("", "2"), row("undefined", "3")]
        };
        let payload = form.payload();
        assert_eq!(payload.name, "Grunge");
        assert_eq!(payload.tracks, vec![
            TrackOrder { track: TrackId::from("t1"), order: Some(1) }
        ]);
    }

    #[test]
    fn untouched_row_takes_first_option() {
        let form = CreateForm {
            visible: true,
            name: "x".to_string(),
            rows: vec![TrackRow::with_options(vec![track("t2", "Alive")])]
        };
        assert_eq!(form.payload().tracks, vec![
            TrackOrder { track: TrackId::from("t2"), order: None }
        ]);

        let empty = CreateForm::default();
        assert!(empty.payload().tracks.is_empty());
    }

    #[test]
    fn edit_payload_needs_track_and_order() {
        let form = EditForm {
            playlist: PlaylistId::from("p1"),
            name: "Seattle".to_string(),
            rows: vec![row("t1", "1"), row("t2", ""), row("", "3"), row("t2", "x"), row("t2", " 4 ")]
        };
        let payload = form.payload();
        assert_eq!(payload.tracks.len(), 2);
        assert_eq!(payload.tracks[1], TrackOrder { track: TrackId::from("t2"), order: Some(4) });
    }

    #[test]
    fn edit_form_preselects_assignments() {
        let p = playlist("p1", "Seattle", vec![assignment("t2", 3, "Alive")]);
        let catalog = vec![track("t1", "Lithium"), track("t2", "Alive")];
        let form = EditForm::from_playlist(&p, Some(&catalog));

        assert_eq!(form.rows.len(), 1);
        assert_eq!(form.rows[0].value(), Some("t2"));
        assert_eq!(form.rows[0].order, "3");
        assert_eq!(form.rows[0].options.len(), 2);

        let html = render_edit_modal(&EditModal::Open(form));
        assert!(html.contains("<option value=\"t2\" selected>Alive</option>"));
        assert!(html.contains("<option value=\"t1\">Lithium</option>"));
    }

    #[test]
    fn edit_form_without_catalog_keeps_assigned_track() {
        let p = playlist("p1", "Seattle", vec![assignment("t2", 3, "Alive")]);
        let form = EditForm::from_playlist(&p, None);
        assert_eq!(form.rows[0].options, vec![track("t2", "Alive")]);
        assert_eq!(form.payload().tracks.len(), 1);
    }

    #[test]
    fn first_page_clears_options() {
        let mut state = ViewState::default();
        state.track_options = vec![track("stale", "Stale")];

        state.apply_track_page(Page {
            results: vec![track("t1", "Lithium")],
            next: Some("p2".to_string()),
            previous: None
        });
        state.apply_track_page(Page {
            results: vec![track("t2", "Alive")],
            next: None,
            previous: Some("p1".to_string())
        });

        assert_eq!(state.track_options, vec![track("t1", "Lithium"), track("t2", "Alive")]);
        assert_eq!(state.create.rows[0].options, state.track_options);
    }

    #[test]
    fn reset_create_form_leaves_one_empty_row() {
        let mut form = CreateForm {
            visible: true,
            name: "Grunge".to_string(),
            rows: vec![row("t1", "1"), row("t2", "2")]
        };
        let options = vec![track("t1", "Lithium")];
        form.reset(&options);

        assert!(form.name.is_empty());
        assert_eq!(form.rows.len(), 1);
        assert_eq!(form.rows[0].value(), Some(""));
        assert!(form.payload().tracks.is_empty());
    }

    #[test]
    fn page_renders_alert_and_modals() {
        let state = ViewState {
            alert: Some(TRACKS_ALERT.to_string()),
            table: PlaylistTable::Failed,
            ..ViewState::default()
        };
        let html = render_page(&state);
        assert!(html.contains("Failed to load tracks."));
        assert!(html.contains(LIST_ERROR));
        assert!(html.contains("<div class=\"modal\" id=\"exampleModal\">"));
        assert!(html.contains("<div class=\"modal\" id=\"editPlaylistModal\"></div>"));
    }
}
