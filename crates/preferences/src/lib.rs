//! Session-only view preferences.

pub mod preferences;

pub use preferences::{PreferenceChange, PreferencesStore, ThemeMode, ViewMode};
