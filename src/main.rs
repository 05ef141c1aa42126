//! Glass Player - terminal music player with synchronized lyrics
//! and an offline asset cache

mod app;
mod audio;
mod cache;
mod commands;
mod features;
mod ui;
mod utils;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use reqwest::Url;
use tracing::info;

use crate::app::RunOptions;
use crate::cache::{
    CacheStorage, DiskStorage, HttpFetcher, MemoryStorage, OfflineCache, STATIC_ASSETS,
};
use crate::commands::{Cli, Commands, FetchCommand, LyricsCommand, PlayCommand};
use crate::features::lyrics::{LyricsSource, parse_lyrics_file, resolve_active_cue, stringify_lrc};
use crate::features::{Playlist, PreferencesFile};
use crate::utils::format_time;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they don't interleave with player output
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(cmd) => play(cmd).await?,
        Commands::Fetch(cmd) => fetch(cmd).await?,
        Commands::Lyrics(cmd) => show_lyrics(cmd)?,
    }

    Ok(())
}

async fn play(cmd: PlayCommand) -> Result<()> {
    let playlist = Playlist::load(&cmd.playlist)?;
    info!("Loaded playlist with {} tracks", playlist.len());

    let store = if cmd.no_save {
        PreferencesFile::ephemeral()
    } else {
        PreferencesFile::open_default()
    };

    let lyrics = match &cmd.origin {
        Some(origin) => {
            let cache = open_cache(origin, cmd.memory_cache)?;
            activate(&cache)?;
            LyricsSource::Remote(Arc::new(cache))
        }
        None => {
            let base = cmd
                .playlist
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            LyricsSource::Local(base)
        }
    };

    let options = RunOptions {
        track_length: cmd.track_length,
        tick: Duration::from_millis(cmd.tick_ms.max(10)),
    };

    app::run(playlist, Arc::new(lyrics), store, options).await
}

async fn fetch(cmd: FetchCommand) -> Result<()> {
    let cache = open_cache(&cmd.origin, cmd.memory_cache)?;

    if cmd.precache {
        let count = cache
            .install(STATIC_ASSETS)
            .await
            .context("Failed to precache app shell")?;
        println!("Precached {} app shell assets", count);
    }
    activate(&cache)?;

    for path in &cmd.urls {
        let url = cache.resolve(path)?;
        let policy = match cache.route(&url) {
            Some(class) => format!("{:?}, {:?} -> {}", class, class.strategy(), class.bucket()),
            None => "cross-origin".to_string(),
        };

        match cache.handle_fetch(&url).await {
            Ok(served) => {
                let response = &served.response;
                println!(
                    "{} {} [{}] ({}) {} bytes {}",
                    response.status,
                    url,
                    served.source,
                    policy,
                    response.body.len(),
                    response.header("content-type").unwrap_or("")
                );
            }
            Err(e) => println!("ERR {} ({}): {}", url, policy, e),
        }
    }

    Ok(())
}

fn show_lyrics(cmd: LyricsCommand) -> Result<()> {
    let cues = parse_lyrics_file(&cmd.file)
        .with_context(|| format!("Failed to read lyrics {:?}", cmd.file))?;

    if cmd.lrc {
        print!("{}", stringify_lrc(&cues));
        return Ok(());
    }

    if cues.is_empty() {
        println!("No timed lyrics in {:?}", cmd.file);
        return Ok(());
    }

    let active = cmd.at.and_then(|t| resolve_active_cue(&cues, t));
    for (i, cue) in cues.iter().enumerate() {
        let marker = if Some(i) == active { ">" } else { " " };
        println!("{} {:>6} {}", marker, format_time(cue.time), cue.text);
    }

    Ok(())
}

fn open_cache(origin: &str, in_memory: bool) -> Result<OfflineCache<HttpFetcher>> {
    let origin = Url::parse(origin).with_context(|| format!("Invalid origin {}", origin))?;

    let storage: Arc<dyn CacheStorage> = if in_memory {
        Arc::new(MemoryStorage::new())
    } else {
        let disk = DiskStorage::in_user_cache();
        info!("Offline cache at {:?}", disk.root());
        Arc::new(disk)
    };

    Ok(OfflineCache::new(origin, HttpFetcher::new()?, storage))
}

fn activate(cache: &OfflineCache<HttpFetcher>) -> Result<()> {
    let deleted = cache.activate()?;
    if !deleted.is_empty() {
        info!("Removed old cache buckets: {}", deleted.join(", "));
    }
    info!(
        "Offline cache for {} active (controlling: {})",
        cache.origin(),
        cache.is_controlling()
    );
    Ok(())
}
