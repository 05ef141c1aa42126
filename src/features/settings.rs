//! Persisted player preferences
//!
//! Read once at startup and written back on every change.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Volume used when nothing has been saved yet
pub const DEFAULT_VOLUME: f32 = 0.8;

/// User preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Volume level (0.0 to 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// Index of the track that was loaded last
    #[serde(default)]
    pub last_song_index: Option<usize>,
}

fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            last_song_index: None,
        }
    }
}

/// Key-value persistence used by the player
pub trait PreferenceStore {
    /// Current preferences
    fn load(&self) -> Preferences;

    fn save_volume(&mut self, volume: f32);

    fn save_last_song_index(&mut self, index: usize);
}

/// JSON file backed preferences
///
/// Without a path the store only keeps values in memory.
#[derive(Debug, Clone, Default)]
pub struct PreferencesFile {
    path: Option<PathBuf>,
    current: Preferences,
}

impl PreferencesFile {
    /// Get the preferences file path
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "glass-player", "GlassPlayer")
            .map(|dirs| dirs.config_dir().join("preferences.json"))
    }

    /// Open the default preferences file
    pub fn open_default() -> Self {
        match Self::default_path() {
            Some(path) => Self::open(path),
            None => {
                warn!("Could not determine config directory, preferences will not persist");
                Self::ephemeral()
            }
        }
    }

    /// Open a preferences file, falling back to defaults when it is missing
    /// or unreadable
    pub fn open(path: PathBuf) -> Self {
        let current = match Self::load_from_file(&path) {
            Ok(prefs) => prefs,
            // First run
            Err(PreferencesError::NotFound) => Preferences::default(),
            Err(e) => {
                warn!("Ignoring preferences at {:?}: {}", path, e);
                Preferences::default()
            }
        };
        Self {
            path: Some(path),
            current,
        }
    }

    /// In-memory store that never touches disk
    pub fn ephemeral() -> Self {
        Self::default()
    }

    /// Load preferences from a specific file
    pub fn load_from_file(path: &Path) -> Result<Preferences, PreferencesError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PreferencesError::NotFound,
            _ => PreferencesError::Io(e.to_string()),
        })?;
        serde_json::from_str(&content).map_err(|e| PreferencesError::Parse(e.to_string()))
    }

    /// Save preferences to a specific file
    pub fn save_to_file(prefs: &Preferences, path: &Path) -> Result<(), PreferencesError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PreferencesError::Io(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(prefs)
            .map_err(|e| PreferencesError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| PreferencesError::Io(e.to_string()))?;
        Ok(())
    }

    fn persist(&self) {
        if let Some(path) = &self.path {
            if let Err(e) = Self::save_to_file(&self.current, path) {
                warn!("Failed to save preferences to {:?}: {}", path, e);
            }
        }
    }
}

impl PreferenceStore for PreferencesFile {
    fn load(&self) -> Preferences {
        self.current.clone()
    }

    fn save_volume(&mut self, volume: f32) {
        self.current.volume = volume;
        self.persist();
    }

    fn save_last_song_index(&mut self, index: usize) {
        self.current.last_song_index = Some(index);
        self.persist();
    }
}

/// Errors that can occur with preferences
#[derive(Debug, Clone)]
pub enum PreferencesError {
    NotFound,
    Io(String),
    Parse(String),
}

impl std::fmt::Display for PreferencesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreferencesError::NotFound => write!(f, "Preferences file not found"),
            PreferencesError::Io(e) => write!(f, "IO error: {}", e),
            PreferencesError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for PreferencesError {}
