/// Nothing Player - headless command-line host
use clap::{Parser, Subcommand, ValueEnum};
use nothing_core::{format_time, TrackId};
use nothing_player::{AppContext, PlayerConfig};
use nothing_playback::PlaybackEvent;
use nothing_sync::{Direction, MutationOutcome};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "nothing-player")]
#[command(about = "Offline-capable music player", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "NOTHING_CONFIG")]
    config: Option<PathBuf>,

    /// Start offline regardless of configuration
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the track catalog
    Tracks,
    /// Show the play queue
    Queue,
    /// Play a track (or the first queued track) and show the player state
    Play {
        /// Track id
        track: Option<String>,
        /// Skip forward this many tracks after starting
        #[arg(long, default_value_t = 0)]
        skip: usize,
    },
    /// Show or set up the profile
    Profile {
        /// Display name to save
        name: Option<String>,
    },
    /// Toggle a track in favorites
    Favorite {
        /// Track id
        track: String,
    },
    /// List playlists
    Playlists,
    /// Create an empty playlist
    Create {
        /// Playlist name
        name: String,
    },
    /// Rename a playlist
    Rename {
        /// Current name
        from: String,
        /// New name
        to: String,
    },
    /// Delete a playlist
    Delete {
        /// Playlist name
        name: String,
    },
    /// Make a playlist active
    Switch {
        /// Playlist name
        name: String,
    },
    /// Append a track to the active playlist
    Add {
        /// Track id
        track: String,
    },
    /// Remove a track from the active playlist
    Remove {
        /// Track id
        track: String,
    },
    /// Move a queue entry up or down
    Move {
        /// Queue position (0-based)
        index: usize,
        /// Direction to move in
        #[arg(value_enum)]
        direction: MoveDirection,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MoveDirection {
    Up,
    Down,
}

impl From<MoveDirection> for Direction {
    fn from(direction: MoveDirection) -> Self {
        match direction {
            MoveDirection::Up => Direction::Up,
            MoveDirection::Down => Direction::Down,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nothing_player=info,nothing_sync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = PlayerConfig::load(cli.config.as_deref())?;
    if cli.offline {
        config.network.start_online = false;
    }
    config.validate()?;

    let mut ctx = AppContext::new(&config)?;
    let signed_in = ctx.connect(&config).await?;
    tracing::debug!(signed_in, online = ctx.network.is_online(), "Player ready");

    match cli.command {
        Commands::Tracks => list_tracks(&ctx),
        Commands::Queue => show_queue(&ctx),
        Commands::Play { track, skip } => play(&mut ctx, track.as_deref(), skip)?,
        Commands::Profile { name } => profile(&mut ctx, name.as_deref()).await?,
        Commands::Favorite { track } => {
            let outcome = ctx
                .library_mut()
                .toggle_favorite(&TrackId::new(track.as_str()))
                .await?;
            report(outcome, "Favorites updated");
            println!("Favorites: {}", join_ids(ctx.library().favorites()));
        }
        Commands::Playlists => list_playlists(&ctx),
        Commands::Create { name } => {
            let outcome = ctx.library_mut().create_playlist(&name).await?;
            report(outcome, "Playlist created");
        }
        Commands::Rename { from, to } => {
            let outcome = ctx.library_mut().rename_playlist(&from, &to).await?;
            report(outcome, "Playlist renamed");
        }
        Commands::Delete { name } => {
            let outcome = ctx.library_mut().delete_playlist(&name).await?;
            report(outcome, "Playlist deleted");
        }
        Commands::Switch { name } => {
            let outcome = ctx.library_mut().switch_playlist(&name).await?;
            ctx.sync_queue();
            report(outcome, "Active playlist changed");
            show_queue(&ctx);
        }
        Commands::Add { track } => {
            let outcome = ctx
                .library_mut()
                .add_to_playlist(&TrackId::new(track.as_str()))
                .await?;
            ctx.sync_queue();
            report(outcome, "Track added");
            show_queue(&ctx);
        }
        Commands::Remove { track } => {
            let outcome = ctx
                .library_mut()
                .remove_from_playlist(&TrackId::new(track.as_str()))
                .await?;
            ctx.sync_queue();
            report(outcome, "Track removed");
            show_queue(&ctx);
        }
        Commands::Move { index, direction } => {
            let outcome = ctx.library_mut().move_track(index, direction.into()).await?;
            ctx.sync_queue();
            report(outcome, "Queue reordered");
            show_queue(&ctx);
        }
    }

    Ok(())
}

fn list_tracks(ctx: &AppContext) {
    println!("Tracks:");
    for track in ctx.catalog.tracks() {
        let favorite = if ctx.library().is_favorite(&track.id) {
            "*"
        } else {
            " "
        };
        println!(
            " {} {:<10} {} - {} ({})",
            favorite,
            track.id.as_str(),
            track.title,
            track.artist,
            format_time(track.duration)
        );
    }
}

fn show_queue(ctx: &AppContext) {
    match ctx.library().active_playlist_name() {
        Some(name) => println!("Queue ({}):", name),
        None => println!("Queue:"),
    }
    for (index, track) in ctx.controller.queue().iter().enumerate() {
        println!("  {}. {} - {}", index, track.title, track.artist);
    }
}

fn play(ctx: &mut AppContext, track: Option<&str>, skip: usize) -> anyhow::Result<()> {
    ctx.controller.play(track)?;
    ctx.settle_media();
    for _ in 0..skip {
        ctx.controller.play_next();
        ctx.settle_media();
    }

    for event in ctx.controller.drain_events() {
        if let PlaybackEvent::Error { message } = event {
            eprintln!("{}", message);
        }
    }

    let state = ctx.controller.state();
    match ctx.controller.current_track() {
        Some(current) => println!(
            "{:?}: {} - {} [{} / {}] volume {:.0}%{}",
            state.status(),
            current.title,
            current.artist,
            format_time(state.current_time),
            format_time(current.duration),
            state.volume * 100.0,
            if state.is_muted { " (muted)" } else { "" }
        ),
        None => println!("Nothing to play"),
    }
    Ok(())
}

async fn profile(ctx: &mut AppContext, name: Option<&str>) -> anyhow::Result<()> {
    if let Some(name) = name {
        let outcome = ctx.library_mut().save_profile(name).await?;
        report(outcome, "Profile saved");
    }

    let library = ctx.library();
    match library.profile() {
        Some(profile) => println!("Signed in as {}", profile.name),
        None if library.needs_profile_setup() => {
            println!("No profile yet. Run `nothing-player profile <name>` to set one up.");
        }
        None if !library.is_authenticated() => println!("Not signed in"),
        None => println!("Profile unavailable"),
    }
    Ok(())
}

fn list_playlists(ctx: &AppContext) {
    let library = ctx.library();
    if !library.is_authenticated() {
        println!("Sign in to use playlists & favorites");
        return;
    }

    println!("Playlists:");
    for name in library.playlist_names() {
        let marker = if library.active_playlist_name() == Some(name.as_str()) {
            ">"
        } else {
            " "
        };
        println!(" {} {}", marker, name);
    }
}

fn report(outcome: MutationOutcome, applied: &str) {
    match outcome {
        MutationOutcome::Applied => println!("{}", applied),
        MutationOutcome::Skipped => println!("Nothing to do"),
    }
}

fn join_ids(ids: &[TrackId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
