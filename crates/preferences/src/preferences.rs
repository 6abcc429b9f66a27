use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use storefront_core::SubscriptionId;
use storefront_events::{ChangeBus, InMemoryChangeBus, Subscription};

/// Product list layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }
}

/// Color scheme; `System` follows the platform setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceChange {
    ViewMode(ViewMode),
    ThemeMode(ThemeMode),
}

#[derive(Debug, Default)]
struct Preferences {
    view_mode: ViewMode,
    theme_mode: ThemeMode,
}

/// Two independent settings; setters notify only when the value changes.
#[derive(Debug, Default)]
pub struct PreferencesStore {
    state: RwLock<Preferences>,
    bus: InMemoryChangeBus<PreferenceChange>,
}

impl PreferencesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.read_state().view_mode
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.read_state().theme_mode
    }

    pub fn set_view_mode(&self, mode: ViewMode) {
        {
            let mut state = self.write_state();
            if state.view_mode == mode {
                return;
            }
            state.view_mode = mode;
        }
        tracing::debug!(?mode, "view mode changed");
        self.notify(PreferenceChange::ViewMode(mode));
    }

    pub fn toggle_view_mode(&self) -> ViewMode {
        let mode = self.view_mode().toggled();
        self.set_view_mode(mode);
        mode
    }

    pub fn set_theme_mode(&self, mode: ThemeMode) {
        {
            let mut state = self.write_state();
            if state.theme_mode == mode {
                return;
            }
            state.theme_mode = mode;
        }
        tracing::debug!(?mode, "theme mode changed");
        self.notify(PreferenceChange::ThemeMode(mode));
    }

    pub fn subscribe(&self) -> Subscription<PreferenceChange> {
        self.bus.subscribe()
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn close_subscriptions(&self) {
        self.bus.close();
    }

    fn notify(&self, change: PreferenceChange) {
        if let Err(err) = self.bus.publish(change) {
            tracing::warn!(?err, "failed to notify preference subscribers");
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, Preferences> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Preferences> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
