//! Feature modules - player logic separated from rendering
//!
//! Each feature module contains the core logic for a specific functionality.
//! Features should not depend on UI components directly.

pub mod keybindings;
pub mod lyrics;
pub mod playlist;
pub mod settings;

pub use keybindings::{Action, KeyBindings};
pub use playlist::{Playlist, Track};
pub use settings::{PreferenceStore, PreferencesFile};
