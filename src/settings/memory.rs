//! In-memory settings backend.

use std::sync::Mutex;

use secrecy::SecretString;

use super::{ChangeListener, DateStyle, SavedFilters, SettingsChange, SettingsStore};
use crate::error::{Result, UpBankError};

/// The mutable settings state behind the store's mutex.
#[derive(Debug, Default)]
struct State {
    /// Access token.
    token: Option<SecretString>,
    /// Date rendering preference.
    date_style: DateStyle,
    /// Last-used transaction filters.
    saved_filters: SavedFilters,
}

/// Settings store holding everything in process memory.
///
/// Useful for tests and ephemeral sessions; nothing survives the
/// process.
#[derive(Default)]
pub struct InMemorySettings {
    /// Current values.
    state: Mutex<State>,
    /// Subscribed change listeners.
    listeners: Mutex<Vec<ChangeListener>>,
}

impl core::fmt::Debug for InMemorySettings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemorySettings")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl InMemorySettings {
    /// Creates an empty store with default preferences.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Invokes every subscribed listener.
    fn notify(&self, change: SettingsChange) {
        if let Ok(listeners) = self.listeners.lock() {
            for listener in listeners.iter() {
                listener(change);
            }
        }
    }
}

/// Maps a poisoned-lock failure into the crate error type.
fn lock_poison_error() -> UpBankError {
    UpBankError::Settings("settings lock poisoned".into())
}

impl SettingsStore for InMemorySettings {
    fn token(&self) -> Result<Option<SecretString>> {
        let state = self.state.lock().map_err(|_| lock_poison_error())?;
        Ok(state.token.clone())
    }

    fn set_token(&self, token: Option<SecretString>) -> Result<()> {
        {
            let mut state = self.state.lock().map_err(|_| lock_poison_error())?;
            state.token = token;
        }
        self.notify(SettingsChange::Token);
        Ok(())
    }

    fn date_style(&self) -> Result<DateStyle> {
        let state = self.state.lock().map_err(|_| lock_poison_error())?;
        Ok(state.date_style)
    }

    fn set_date_style(&self, style: DateStyle) -> Result<()> {
        {
            let mut state = self.state.lock().map_err(|_| lock_poison_error())?;
            state.date_style = style;
        }
        self.notify(SettingsChange::DateStyle);
        Ok(())
    }

    fn saved_filters(&self) -> Result<SavedFilters> {
        let state = self.state.lock().map_err(|_| lock_poison_error())?;
        Ok(state.saved_filters.clone())
    }

    fn set_saved_filters(&self, filters: SavedFilters) -> Result<()> {
        {
            let mut state = self.state.lock().map_err(|_| lock_poison_error())?;
            state.saved_filters = filters;
        }
        self.notify(SettingsChange::SavedFilters);
        Ok(())
    }

    fn subscribe(&self, listener: ChangeListener) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(listener);
        }
    }
}
