//! Terminal event loop
//!
//! One task owns the controller and drains a channel fed by three producers:
//! the stdin reader thread, the media clock and finished lyric loads.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info};

use crate::audio::{SimulatedAudio, run_media_clock};
use crate::cache::Fetcher;
use crate::features::lyrics::{LyricRequest, LyricsSource};
use crate::features::{Action, KeyBindings, Playlist, PreferenceStore};
use crate::ui::ConsoleRenderer;

use super::controller::PlayerController;
use super::message::Message;

/// Player loop settings
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Assumed length of every track in seconds
    pub track_length: f64,
    /// Media clock interval
    pub tick: Duration,
}

/// Anything that reaches the event loop
#[derive(Debug)]
enum Event {
    Player(Message),
    Help,
    Quit,
}

/// Run the player until `quit` or end of input
pub async fn run<F, S>(
    playlist: Playlist,
    lyrics: Arc<LyricsSource<F>>,
    store: S,
    options: RunOptions,
) -> Result<()>
where
    F: Fetcher + 'static,
    S: PreferenceStore,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let bindings = KeyBindings::default();

    let audio = SimulatedAudio::new(options.track_length);
    let mut controller =
        PlayerController::new(playlist, audio.clone(), ConsoleRenderer::stdout(), store);

    spawn_input_reader(tx.clone(), bindings.clone());

    let clock_tx = tx.clone();
    let clock = tokio::spawn(run_media_clock(audio, options.tick, move |event| {
        clock_tx.send(Event::Player(event.into())).is_ok()
    }));

    print_help(&bindings);
    let request = controller.start();
    spawn_lyrics_load(&lyrics, request, &tx);

    while let Some(event) = rx.recv().await {
        match event {
            Event::Player(message) => {
                if let Some(request) = controller.handle(message) {
                    spawn_lyrics_load(&lyrics, request, &tx);
                }
            }
            Event::Help => print_help(&bindings),
            Event::Quit => break,
        }
    }

    clock.abort();
    info!(
        "Player stopped on track {}",
        controller.state().current_track_index + 1
    );
    Ok(())
}

/// Load lyrics in the background and report back as `LyricsLoaded`
fn spawn_lyrics_load<F: Fetcher + 'static>(
    lyrics: &Arc<LyricsSource<F>>,
    request: LyricRequest,
    tx: &UnboundedSender<Event>,
) {
    let lyrics = lyrics.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        debug!("Loading lyrics {}", request.path);
        let result = lyrics.load(&request.path).await;
        let _ = tx.send(Event::Player(Message::LyricsLoaded {
            ticket: request.ticket,
            result,
        }));
    });
}

/// Read commands from stdin on a plain thread
///
/// Blocking stdin reads would otherwise hold up runtime shutdown.
fn spawn_input_reader(tx: UnboundedSender<Event>, bindings: KeyBindings) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            let Some(event) = parse_command(&line, &bindings) else {
                if !line.trim().is_empty() {
                    println!("Unknown command: {} (type 'help')", line.trim());
                }
                continue;
            };
            if tx.send(event).is_err() {
                return;
            }
        }
        // End of input
        let _ = tx.send(Event::Quit);
    });
}

/// Parse one input line
///
/// Besides bound keys and action names this accepts `play`, `pause`,
/// `seek SECS`, `track N`, `line N` and `volume PERCENT` (`N` is 1-based).
fn parse_command(line: &str, bindings: &KeyBindings) -> Option<Event> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?.to_lowercase();
    let arg = parts.next();

    let message = match (command.as_str(), arg) {
        ("q" | "quit" | "exit", _) => return Some(Event::Quit),
        ("h" | "help" | "?", _) => return Some(Event::Help),
        ("play", None) => Message::SetPlaying(true),
        ("pause", None) => Message::SetPlaying(false),
        ("seek", Some(secs)) => Message::Seek(secs.parse().ok()?),
        ("track", Some(n)) => Message::SelectTrack(one_based(n)?),
        ("line", Some(n)) => Message::SeekToCue(one_based(n)?),
        ("volume" | "vol", Some(percent)) => {
            Message::SetVolume(percent.parse::<f32>().ok()? / 100.0)
        }
        (name, None) => Message::from(bindings.resolve(name)?),
        _ => return None,
    };
    Some(Event::Player(message))
}

fn one_based(n: &str) -> Option<usize> {
    n.parse::<usize>().ok()?.checked_sub(1)
}

fn print_help(bindings: &KeyBindings) {
    println!("Commands:");
    for action in Action::all() {
        let keys: Vec<&str> = bindings
            .keys_for(*action)
            .iter()
            .map(|key| key.display())
            .collect();
        println!("  {:<16} {}", action.display_name(), keys.join(", "));
    }
    println!("  play | pause | seek SECS | track N | line N | volume PERCENT | help | quit");
}
