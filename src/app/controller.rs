//! Unified player controller for all playback operations
//!
//! Owns the playback state, the current cue sequence and the collaborators
//! (audio output, renderer, preference store). Every external event is
//! delivered through `handle`; lyric loads leave the controller as
//! `LyricRequest`s and come back as `Message::LyricsLoaded`.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::audio::{AudioEvent, AudioOutput, SourceId};
use crate::features::lyrics::{Cues, LyricRequest, LyricsTicket, no_cues, parse_lyrics};
use crate::features::settings::DEFAULT_VOLUME;
use crate::features::{Playlist, PreferenceStore};
use crate::ui::Renderer;

use super::message::{Direction, Message};
use super::queue_navigator::{EndAction, QueueNavigator};
use super::state::PlaybackState;

pub struct PlayerController<A, R, S> {
    playlist: Playlist,
    state: PlaybackState,
    cues: Cues,
    /// Bumped on every track load
    generation: u64,
    /// Ticket of the lyric load still expected
    pending: Option<LyricsTicket>,
    volume: f32,
    /// Source returned by the last `AudioOutput::load`
    audio_source: SourceId,
    audio: A,
    renderer: R,
    store: S,
}

impl<A: AudioOutput, R: Renderer, S: PreferenceStore> PlayerController<A, R, S> {
    /// Build a controller from saved preferences
    ///
    /// Nothing is loaded or rendered until `start`.
    pub fn new(playlist: Playlist, mut audio: A, renderer: R, store: S) -> Self {
        let prefs = store.load();

        let volume = if prefs.volume.is_finite() {
            prefs.volume.clamp(0.0, 1.0)
        } else {
            DEFAULT_VOLUME
        };
        audio.set_volume(volume);

        let index = match prefs.last_song_index {
            Some(i) if i > playlist.last_index() => {
                warn!("Saved track index {} out of range, using last track", i);
                playlist.last_index()
            }
            Some(i) => i,
            None => 0,
        };

        Self {
            playlist,
            state: PlaybackState::new(index),
            cues: no_cues(),
            generation: 0,
            pending: None,
            volume,
            audio_source: 0,
            audio,
            renderer,
            store,
        }
    }

    /// Render the initial controls and load the restored track
    pub fn start(&mut self) -> LyricRequest {
        self.renderer
            .render_controls(self.state.is_shuffle, self.state.repeat_mode);
        self.renderer.render_volume(self.volume);
        self.load_track(self.state.current_track_index)
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    // ============ Dispatch ============

    /// Single entry point for external events
    ///
    /// Returns a lyric request when the event changed the track.
    pub fn handle(&mut self, message: Message) -> Option<LyricRequest> {
        match message {
            Message::TogglePlay => self.toggle_play(None),
            Message::SetPlaying(playing) => self.toggle_play(Some(playing)),
            Message::Advance(direction) => return Some(self.advance(direction)),
            Message::ToggleShuffle => self.toggle_shuffle(),
            Message::CycleRepeat => self.cycle_repeat(),
            Message::SelectTrack(index) => return self.select_track(index),
            Message::Seek(time) => self.seek(time),
            Message::SeekBy(delta) => self.seek_by(delta),
            Message::SeekToCue(index) => self.seek_to_cue(index),
            Message::SetVolume(volume) => self.set_volume(volume),
            Message::AdjustVolume(delta) => self.adjust_volume(delta),
            Message::Audio(event) if event.source() != self.audio_source => {
                debug!(
                    "Dropping audio event for replaced source {} (current {}): {:?}",
                    event.source(),
                    self.audio_source,
                    event
                );
            }
            Message::Audio(event) => match event {
                AudioEvent::MetadataLoaded { duration, .. } => self.on_metadata_loaded(duration),
                AudioEvent::TimeUpdate { position, .. } => self.on_time_tick(position),
                AudioEvent::Ended { .. } => return self.on_track_ended(),
                AudioEvent::PlaybackFailed { reason, .. } => self.on_playback_failed(&reason),
            },
            Message::LyricsLoaded { ticket, result } => self.apply_lyrics(ticket, result),
        }
        None
    }

    // ============ Track loading ============

    /// Switch to the track at `index` (clamped) and request its lyrics
    ///
    /// Playback is left paused; any lyric load still in flight becomes stale.
    pub fn load_track(&mut self, index: usize) -> LyricRequest {
        let index = if index > self.playlist.last_index() {
            warn!("Track index {} out of range, clamping", index);
            self.playlist.last_index()
        } else {
            index
        };

        self.state.current_track_index = index;
        self.state.is_playing = false;
        self.state.lyric_sync.reset();
        self.store.save_last_song_index(index);

        let track = self.playlist.track(index);
        info!("Loading track {}: {}", index, track.display_name());
        self.audio_source = self.audio.load(&track.audio_path);

        self.cues = no_cues();
        self.generation += 1;
        let ticket = LyricsTicket {
            track_index: index,
            generation: self.generation,
        };
        self.pending = Some(ticket);

        self.renderer.render_track(index, track, &self.playlist);
        self.renderer.render_play_state(false);
        self.renderer.render_progress(0.0, None);
        self.renderer.render_lyrics_loading();

        LyricRequest {
            ticket,
            path: track.lyrics_path.clone(),
        }
    }

    /// Install the result of a lyric load, unless it has gone stale
    pub fn apply_lyrics(&mut self, ticket: LyricsTicket, result: anyhow::Result<String>) {
        if self.pending != Some(ticket) || ticket.track_index != self.state.current_track_index {
            debug!(
                "Discarding stale lyrics for track {} (generation {}, current {})",
                ticket.track_index, ticket.generation, self.generation
            );
            return;
        }
        self.pending = None;

        match result {
            Ok(text) => {
                self.cues = Arc::from(parse_lyrics(&text));
                debug!("Loaded {} lyric lines", self.cues.len());
                self.renderer.render_lyrics(&self.cues);
                self.state.lyric_sync.reset();
                self.sync_lyrics(self.audio.position());
            }
            Err(e) => {
                warn!("Failed to load lyrics: {:#}", e);
                self.cues = no_cues();
                self.renderer.render_lyrics_unavailable();
            }
        }
    }

    // ============ Playback ============

    /// Flip play/pause, or force it with `Some`
    ///
    /// A refused start is logged; `is_playing` keeps the requested value.
    pub fn toggle_play(&mut self, force: Option<bool>) {
        let playing = force.unwrap_or(!self.state.is_playing);
        self.state.is_playing = playing;

        if playing {
            if let Err(e) = self.audio.play() {
                warn!("Playback failed to start: {}", e);
            }
        } else {
            self.audio.pause();
        }

        self.renderer.render_play_state(playing);
    }

    /// Move to the next/previous track and start playing it
    pub fn advance(&mut self, direction: Direction) -> LyricRequest {
        let next = self.navigator().step(direction);
        let request = self.load_track(next);
        self.toggle_play(Some(true));
        request
    }

    /// Natural end of stream
    pub fn on_track_ended(&mut self) -> Option<LyricRequest> {
        match self.navigator().on_ended(self.state.repeat_mode) {
            EndAction::Restart => {
                self.seek(0.0);
                self.toggle_play(Some(true));
                None
            }
            EndAction::Stop => {
                info!("End of playlist");
                self.state.is_playing = false;
                self.renderer.render_play_state(false);
                None
            }
            EndAction::Advance => Some(self.advance(Direction::Next)),
        }
    }

    /// Playlist entry chosen; re-selecting the current track does nothing
    pub fn select_track(&mut self, index: usize) -> Option<LyricRequest> {
        if index > self.playlist.last_index() {
            warn!("No track at index {}", index);
            return None;
        }
        if index == self.state.current_track_index {
            return None;
        }
        let request = self.load_track(index);
        self.toggle_play(Some(true));
        Some(request)
    }

    pub fn toggle_shuffle(&mut self) {
        self.state.is_shuffle = !self.state.is_shuffle;
        self.render_controls();
    }

    pub fn cycle_repeat(&mut self) {
        self.state.repeat_mode = self.state.repeat_mode.next();
        self.render_controls();
    }

    // ============ Position ============

    /// Jump to `time` seconds and re-sync lyrics immediately
    pub fn seek(&mut self, time: f64) {
        if !time.is_finite() {
            debug!("Ignoring seek to {}", time);
            return;
        }
        let duration = self.audio.duration();
        let time = match duration {
            Some(d) => time.clamp(0.0, d),
            None => time.max(0.0),
        };

        self.audio.seek(time);
        self.renderer.render_progress(time, duration);
        self.sync_lyrics(time);
    }

    pub fn seek_by(&mut self, delta: f64) {
        self.seek(self.audio.position() + delta);
    }

    /// Lyric line chosen: jump to it and play
    pub fn seek_to_cue(&mut self, index: usize) {
        let Some(time) = self.cues.get(index).map(|cue| cue.time) else {
            warn!("No lyric line at index {}", index);
            return;
        };
        self.seek(time);
        self.toggle_play(Some(true));
    }

    pub fn on_time_tick(&mut self, time: f64) {
        self.renderer.render_progress(time, self.audio.duration());
        self.sync_lyrics(time);
    }

    pub fn on_metadata_loaded(&mut self, duration: f64) {
        self.renderer.render_duration(duration);
    }

    pub fn on_playback_failed(&mut self, reason: &str) {
        warn!("Playback error: {}", reason);
    }

    // ============ Volume ============

    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        self.audio.set_volume(self.volume);
        self.store.save_volume(self.volume);
        self.renderer.render_volume(self.volume);
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        self.set_volume(self.volume + delta);
    }

    // ============ Helpers ============

    fn navigator(&self) -> QueueNavigator {
        QueueNavigator::new(
            self.playlist.len(),
            self.state.current_track_index,
            self.state.is_shuffle,
        )
    }

    fn render_controls(&mut self) {
        self.renderer
            .render_controls(self.state.is_shuffle, self.state.repeat_mode);
    }

    /// Resolve the active cue and highlight it if it changed
    fn sync_lyrics(&mut self, time: f64) {
        if let Some(change) = self.state.lyric_sync.update(&self.cues, time) {
            self.renderer.highlight_cue(change, &self.cues);
        }
    }
}
