//! Keyboard shortcuts
//!
//! Maps key codes to player actions. Defaults follow the web player:
//! space toggles playback, left/right seek and up/down change volume.

use std::collections::HashMap;

/// All bindable actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    PlayPause,
    NextTrack,
    PrevTrack,
    VolumeUp,
    VolumeDown,
    SeekForward,
    SeekBackward,
    ToggleShuffle,
    CycleRepeat,
}

impl Action {
    /// Get all available actions
    pub fn all() -> &'static [Action] {
        &[
            Action::PlayPause,
            Action::NextTrack,
            Action::PrevTrack,
            Action::VolumeUp,
            Action::VolumeDown,
            Action::SeekForward,
            Action::SeekBackward,
            Action::ToggleShuffle,
            Action::CycleRepeat,
        ]
    }

    /// Get human-readable name for the action
    pub fn display_name(&self) -> &'static str {
        match self {
            Action::PlayPause => "Play/Pause",
            Action::NextTrack => "Next track",
            Action::PrevTrack => "Previous track",
            Action::VolumeUp => "Volume up",
            Action::VolumeDown => "Volume down",
            Action::SeekForward => "Seek forward",
            Action::SeekBackward => "Seek backward",
            Action::ToggleShuffle => "Shuffle",
            Action::CycleRepeat => "Repeat mode",
        }
    }

    /// Parse a snake_case action name such as `next_track`
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "play_pause" => Some(Action::PlayPause),
            "next_track" => Some(Action::NextTrack),
            "prev_track" => Some(Action::PrevTrack),
            "volume_up" => Some(Action::VolumeUp),
            "volume_down" => Some(Action::VolumeDown),
            "seek_forward" => Some(Action::SeekForward),
            "seek_backward" => Some(Action::SeekBackward),
            "toggle_shuffle" => Some(Action::ToggleShuffle),
            "cycle_repeat" => Some(Action::CycleRepeat),
            _ => None,
        }
    }
}

/// Supported key codes for binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Space,
    Up,
    Down,
    Left,
    Right,
    N,
    P,
    S,
    R,
}

impl KeyCode {
    /// Parse a key name. Accepts DOM `KeyboardEvent.code` values
    /// (`ArrowLeft`, `KeyN`) as well as short names (`left`, `n`).
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        let name = name
            .strip_prefix("arrow")
            .or_else(|| name.strip_prefix("key"))
            .unwrap_or(&name);

        match name {
            "space" => Some(KeyCode::Space),
            "up" => Some(KeyCode::Up),
            "down" => Some(KeyCode::Down),
            "left" => Some(KeyCode::Left),
            "right" => Some(KeyCode::Right),
            "n" => Some(KeyCode::N),
            "p" => Some(KeyCode::P),
            "s" => Some(KeyCode::S),
            "r" => Some(KeyCode::R),
            _ => None,
        }
    }

    /// Get display name for the key
    pub fn display(&self) -> &'static str {
        match self {
            KeyCode::Space => "Space",
            KeyCode::Up => "↑",
            KeyCode::Down => "↓",
            KeyCode::Left => "←",
            KeyCode::Right => "→",
            KeyCode::N => "N",
            KeyCode::P => "P",
            KeyCode::S => "S",
            KeyCode::R => "R",
        }
    }
}

/// Key to action table
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyCode, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            (KeyCode::Space, Action::PlayPause),
            (KeyCode::Right, Action::SeekForward),
            (KeyCode::Left, Action::SeekBackward),
            (KeyCode::Up, Action::VolumeUp),
            (KeyCode::Down, Action::VolumeDown),
            (KeyCode::N, Action::NextTrack),
            (KeyCode::P, Action::PrevTrack),
            (KeyCode::S, Action::ToggleShuffle),
            (KeyCode::R, Action::CycleRepeat),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Action bound to a key
    pub fn action_for(&self, key: KeyCode) -> Option<Action> {
        self.bindings.get(&key).copied()
    }

    /// Keys bound to an action, for help output
    pub fn keys_for(&self, action: Action) -> Vec<KeyCode> {
        let mut keys: Vec<KeyCode> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| *k)
            .collect();
        keys.sort_by_key(|k| k.display());
        keys
    }

    /// Resolve a key name or action name to an action
    pub fn resolve(&self, input: &str) -> Option<Action> {
        KeyCode::parse(input)
            .and_then(|key| self.action_for(key))
            .or_else(|| Action::from_name(input.trim()))
    }
}
