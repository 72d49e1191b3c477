//!
//! src/main.rs  Andrew Belles  Oct 19th, 2026
//!
//! Command line front end of the playlist admin client. Each command
//! drives the same controller operations the admin page exposes and
//! prints the resulting markup
//!
//!

mod config;
mod errors;
mod logging;

mod admin;
mod catalog;
mod csrf;
mod fetch;
mod types;
mod view;

#[cfg(test)]
mod fake_api;

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::admin::{EditOpen, PlaylistAdmin};
use crate::errors::AdminError;
use crate::fetch::{AdminClient, PlaylistApi};
use crate::types::PlaylistId;
use crate::view::TrackRow;

#[derive(Debug, Parser)]
#[clap(
name = "playlist-admin",
about = "Manage playlists through the playlist api",
version)]
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the full admin page
    Page,
    /// Print the playlist table rows
    List,
    /// Print the edit modal for one playlist
    Show { uuid: String },
    Create(CreateArgs),
    Update(UpdateArgs),
    /// Delete a playlist
    Delete { uuid: String },
}

/// `<track>:<order>`, order may be left empty
#[derive(Debug, Clone, PartialEq, Eq)]
struct TrackArg {
    track: String,
    order: String
}

fn parse_track_arg(s: &str) -> Result<TrackArg, String> {
    let (track, order) = s.split_once(':').unwrap_or((s, ""));
    if track.trim().is_empty() {
        return Err(format!("missing track in {s:?}"));
    }
    let order = order.trim();
    if !order.is_empty() && order.parse::<i64>().is_err() {
        return Err(format!("order must be an integer in {s:?}"));
    }
    Ok(TrackArg { track: track.trim().to_string(), order: order.to_string() })
}

fn rows_from(args: &[TrackArg], options: &[types::Track]) -> Vec<TrackRow> {
    args.iter()
        .map(|arg| {
            let mut row = TrackRow::with_options(options.to_vec());
            row.select(arg.track.clone());
            row.set_order(arg.order.clone());
            row
        })
        .collect()
}

#[derive(Debug, Clone, Args)]
#[command(long_about = r"

Create a playlist.
Examples:

playlist-admin create --name Grunge --track 1f0e...:1 --track 9ab2...:2

")]
struct CreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long = "track", value_parser = parse_track_arg)]
    tracks: Vec<TrackArg>,
}

impl CreateArgs {
    async fn run<A: PlaylistApi>(&self, admin: &mut PlaylistAdmin<A>) -> Result<(), AdminError> {
        admin.open_create();
        let options = admin.state().track_options.clone();
        let form = admin.create_form_mut();
        form.name = self.name.clone();
        if !self.tracks.is_empty() {
            form.rows = rows_from(&self.tracks, &options);
        }
        if let Err(e) = admin.create_playlist().await {
            admin.close_create();
            return Err(e);
        }
        println!("{}", view::render_table_rows(&admin.state().table));
        Ok(())
    }
}

#[derive(Debug, Clone, Args)]
#[command(long_about = r"

Update a playlist. Given tracks replace the playlist's whole track list.
Examples:

playlist-admin update 5c1d... --name 'Seattle 91' --track 1f0e...:1

")]
struct UpdateArgs {
    uuid: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long = "track", value_parser = parse_track_arg)]
    tracks: Vec<TrackArg>,
}

impl UpdateArgs {
    async fn run<A: PlaylistApi>(&self, admin: &mut PlaylistAdmin<A>) -> Result<(), AdminError> {
        let id = PlaylistId(self.uuid.clone());
        ensure_opened(admin.open_edit(&id).await?)?;
        if let Some(form) = admin.edit_form_mut() {
            if let Some(name) = &self.name {
                form.name = name.clone();
            }
            if !self.tracks.is_empty() {
                // the modal's selectors already hold the catalog
                let options = form.rows.first()
                    .map(|row| row.options.clone())
                    .unwrap_or_default();
                form.rows = rows_from(&self.tracks, &options);
            }
        }
        if let Err(e) = admin.save_edit().await {
            admin.cancel_edit();
            return Err(e);
        }
        println!("{}", view::render_table_rows(&admin.state().table));
        Ok(())
    }
}

/// Time a command gets to unwind after an interrupt before it is dropped
const INTERRUPT_GRACE: Duration = Duration::from_millis(250);

///
/// Runs one command until it finishes or `interrupt` fires. An interrupt
/// abandons any edit still loading, then gives the command a short grace
/// period to settle before giving up on it
///
async fn run_until<A, F>(
    commands: &Commands,
    admin: &mut PlaylistAdmin<A>,
    interrupt: F
) -> Result<(), AdminError>
where
    A: PlaylistApi,
    F: Future<Output = ()>
{
    let cancel = admin.edit_cancel_token();
    let run = commands.run(admin);
    tokio::pin!(run);

    tokio::select! {
        done = &mut run => return done,
        _ = interrupt => {}
    }

    tracing::warn!(msg = "interrupted", "admin.signal");
    cancel.cancel();
    match tokio::time::timeout(INTERRUPT_GRACE, run).await {
        Ok(done) => done,
        Err(_) => Err(AdminError::State("interrupted".to_string()))
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "admin.signal.unavailable");
        std::future::pending::<()>().await;
    }
}

fn ensure_opened(opened: EditOpen) -> Result<(), AdminError> {
    match opened {
        EditOpen::Opened => Ok(()),
        EditOpen::Cancelled => Err(AdminError::State("edit cancelled".to_string()))
    }
}

impl Commands {
    async fn run<A: PlaylistApi>(&self, admin: &mut PlaylistAdmin<A>) -> Result<(), AdminError> {
        match self {
            Commands::Page => {
                // both failures are already folded into the page
                let _ = admin.refresh_playlists().await;
                let _ = admin.load_tracks().await;
                println!("{}", admin.render());
            }
            Commands::List => {
                let listed = admin.refresh_playlists().await;
                println!("{}", view::render_table_rows(&admin.state().table));
                listed?;
            }
            Commands::Show { uuid } => {
                ensure_opened(admin.open_edit(&PlaylistId(uuid.clone())).await?)?;
                println!("{}", view::render_edit_modal(&admin.state().edit));
            }
            Commands::Create(args) => {
                // explicit tracks don't need the catalog
                if let Err(e) = admin.load_tracks().await {
                    if args.tracks.is_empty() {
                        return Err(e);
                    }
                    tracing::warn!(error = %e, "create.catalog.skipped");
                }
                args.run(admin).await?;
            }
            Commands::Update(args) => args.run(admin).await?,
            Commands::Delete { uuid } => {
                admin.delete_playlist(&PlaylistId(uuid.clone())).await?;
                println!("{}", view::render_table_rows(&admin.state().table));
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), AdminError> {
    let cli  = Cli::parse();
    let cfgs = config::load_config()?;
    let _log = logging::init_logging(&cfgs.logging)?;

    tracing::info!(
        service = "playlist-admin",
        version = %env!("CARGO_PKG_VERSION"),
        api = %cfgs.api.base_url,
        "starting"
    );

    let client = AdminClient::new(&cfgs.http, &cfgs.api)?;
    let mut admin = PlaylistAdmin::new(client, cfgs.api.max_track_pages);
    run_until(&cli.commands, &mut admin, ctrl_c()).await
}
