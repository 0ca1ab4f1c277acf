use clap::{Parser, ValueEnum};
use eyre::Context;
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use youtubei::{DirClient, Playlist, PlaylistCompact, VideoCompact};

/// Hydrate a raw YouTube web API fragment and print it as a typed entity.
#[derive(Debug, Parser)]
#[command(name = "youtubei-cli", version)]
struct Args {
    /// JSON file holding the raw fragment (`-` for stdin).
    fragment: PathBuf,

    /// What kind of entity the fragment describes.
    #[arg(long, value_enum, default_value_t = Kind::PlaylistCompact)]
    kind: Kind,

    /// Directory of saved playlist browse responses, named `<playlist id>.json`.
    #[arg(long, env = "YOUTUBEI_PLAYLISTS", default_value = ".")]
    playlists: PathBuf,

    /// For compact playlists, also resolve the full playlist from `--playlists`.
    #[arg(long)]
    resolve: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Kind {
    PlaylistCompact,
    Playlist,
    VideoCompact,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let args = Args::parse();

    let contents = if args.fragment.as_os_str() == "-" {
        tokio::task::spawn_blocking(|| std::io::read_to_string(std::io::stdin()))
            .await
            .context("join stdin reader")?
            .context("read fragment from stdin")?
    } else {
        tokio::fs::read_to_string(&args.fragment)
            .await
            .with_context(|| format!("read {}", args.fragment.display()))?
    };
    let raw: serde_json::Value = serde_json::from_str(&contents).context("parse fragment as JSON")?;

    let client = DirClient::new(&args.playlists);
    let handle = client.handle();

    match args.kind {
        Kind::PlaylistCompact => {
            let compact =
                PlaylistCompact::from_raw(&raw, handle).context("hydrate compact playlist")?;
            print_json(&compact)?;

            if args.resolve {
                match compact.get_playlist().await? {
                    Some(playlist) => print_json(&playlist)?,
                    None => tracing::warn!(
                        dir = %args.playlists.display(),
                        "no saved browse response for this playlist"
                    ),
                }
            }
        }
        Kind::Playlist => {
            let playlist = Playlist::from_raw(&raw, handle).context("hydrate playlist")?;
            print_json(&playlist)?;
        }
        Kind::VideoCompact => {
            let video = VideoCompact::from_raw(&raw, handle).context("hydrate video")?;
            print_json(&video)?;
        }
    }

    if args.resolve && args.kind != Kind::PlaylistCompact {
        tracing::warn!(kind = ?args.kind, "--resolve only applies to compact playlists");
    }

    Ok(())
}

fn print_json(entity: &impl Serialize) -> eyre::Result<()> {
    let json = serde_json::to_string_pretty(entity).context("serialize entity")?;
    println!("{json}");
    Ok(())
}
