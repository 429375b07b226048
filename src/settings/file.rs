//! JSON-file settings backend.
//!
//! Persists the token and preferences as a single `settings.json` under
//! a configurable directory (default: the XDG data dir).

use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};

use super::{ChangeListener, DateStyle, SavedFilters, SettingsChange, SettingsStore};
use crate::error::{Result, UpBankError};

/// Application name used for the XDG data directory.
const APP_NAME: &str = "upbank-rs";

/// Settings file name.
const SETTINGS_FILE: &str = "settings.json";

/// On-disk representation of the settings.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Persisted {
    /// Access token, stored in the clear; the settings directory is the
    /// trust boundary, matching how the token is provisioned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    /// Date rendering preference.
    #[serde(default)]
    date_style: DateStyle,
    /// Last-used transaction filters.
    #[serde(default)]
    saved_filters: SavedFilters,
}

/// File-backed settings store.
///
/// Reads and writes go through an in-process [`Mutex`]; each write
/// rewrites the whole file. Listeners run after the file is on disk.
pub struct FileSettings {
    /// Full path of `settings.json`.
    path: PathBuf,
    /// Serializes concurrent in-process access.
    lock: Mutex<()>,
    /// Subscribed change listeners.
    listeners: Mutex<Vec<ChangeListener>>,
}

impl core::fmt::Debug for FileSettings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FileSettings")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl FileSettings {
    /// Creates a file store rooted at the given directory.
    ///
    /// The directory (and parents) are created if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    #[inline]
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).map_err(settings_io_error)?;
        Ok(Self {
            path: dir.join(SETTINGS_FILE),
            lock: Mutex::new(()),
            listeners: Mutex::new(Vec::new()),
        })
    }

    /// Creates a file store under the platform data directory
    /// (`$XDG_DATA_HOME/upbank-rs/` or the OS equivalent).
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory is available or it cannot
    /// be created.
    #[inline]
    pub fn new_default() -> Result<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| UpBankError::Settings("no platform data directory".into()))?;
        Self::new(base.join(APP_NAME))
    }

    /// Reads the persisted settings, defaulting when no file exists.
    fn load(&self) -> Result<Persisted> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(UpBankError::from),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Persisted::default()),
            Err(err) => Err(settings_io_error(err)),
        }
    }

    /// Writes the persisted settings.
    fn store(&self, persisted: &Persisted) -> Result<()> {
        let contents = serde_json::to_string_pretty(persisted)?;
        fs::write(&self.path, contents).map_err(settings_io_error)
    }

    /// Loads, mutates, and stores under the lock, then notifies.
    fn update<F: FnOnce(&mut Persisted)>(&self, change: SettingsChange, apply: F) -> Result<()> {
        {
            let _guard: MutexGuard<'_, ()> =
                self.lock.lock().map_err(|_| lock_poison_error())?;
            let mut persisted = self.load()?;
            apply(&mut persisted);
            self.store(&persisted)?;
        }
        self.notify(change);
        Ok(())
    }

    /// Reads one value under the lock.
    fn read<T, F: FnOnce(Persisted) -> T>(&self, select: F) -> Result<T> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|_| lock_poison_error())?;
        Ok(select(self.load()?))
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

/// Maps an I/O failure into the crate error type.
fn settings_io_error(err: std::io::Error) -> UpBankError {
    UpBankError::Settings(Box::new(err))
}

/// Maps a poisoned-lock failure into the crate error type.
fn lock_poison_error() -> UpBankError {
    UpBankError::Settings("settings lock poisoned".into())
}

impl SettingsStore for FileSettings {
    fn token(&self) -> Result<Option<SecretString>> {
        self.read(|persisted| persisted.token.map(SecretString::from))
    }

    fn set_token(&self, token: Option<SecretString>) -> Result<()> {
        self.update(SettingsChange::Token, |persisted| {
            persisted.token = token.map(|secret| secret.expose_secret().to_owned());
        })
    }

    fn date_style(&self) -> Result<DateStyle> {
        self.read(|persisted| persisted.date_style)
    }

    fn set_date_style(&self, style: DateStyle) -> Result<()> {
        self.update(SettingsChange::DateStyle, |persisted| {
            persisted.date_style = style;
        })
    }

    fn saved_filters(&self) -> Result<SavedFilters> {
        self.read(|persisted| persisted.saved_filters)
    }

    fn set_saved_filters(&self, filters: SavedFilters) -> Result<()> {
        self.update(SettingsChange::SavedFilters, |persisted| {
            persisted.saved_filters = filters;
        })
    }

    fn subscribe(&self, listener: ChangeListener) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(listener);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::models::CategoryId;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettings::new(dir.path().to_path_buf()).unwrap();
        assert!(store.token().unwrap().is_none());
        assert_eq!(store.date_style().unwrap(), DateStyle::Absolute);
        assert_eq!(store.saved_filters().unwrap(), SavedFilters::default());
    }

    #[test]
    fn values_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileSettings::new(dir.path().to_path_buf()).unwrap();
            store
                .set_token(Some(SecretString::from("up:yeah:token".to_owned())))
                .unwrap();
            store.set_date_style(DateStyle::Relative).unwrap();
            store
                .set_saved_filters(SavedFilters {
                    category: Some(CategoryId::new("takeaway".to_owned())),
                    settled_only: true,
                })
                .unwrap();
        }

        let reopened = FileSettings::new(dir.path().to_path_buf()).unwrap();
        let token = reopened.token().unwrap().unwrap();
        assert_eq!(token.expose_secret(), "up:yeah:token");
        assert_eq!(reopened.date_style().unwrap(), DateStyle::Relative);
        let filters = reopened.saved_filters().unwrap();
        assert_eq!(
            filters.category,
            Some(CategoryId::new("takeaway".to_owned()))
        );
        assert!(filters.settled_only);
    }

    #[test]
    fn clearing_the_token_removes_it_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettings::new(dir.path().to_path_buf()).unwrap();
        store
            .set_token(Some(SecretString::from("transient".to_owned())))
            .unwrap();
        store.set_token(None).unwrap();

        let contents = fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap();
        assert!(!contents.contains("transient"));
        assert!(!contents.contains("token"));
    }

    #[test]
    fn listeners_observe_writes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettings::new(dir.path().to_path_buf()).unwrap();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        store.subscribe(Box::new(move |change| {
            assert_eq!(change, SettingsChange::Token);
            let _prev = seen.fetch_add(1, Ordering::SeqCst);
        }));

        store
            .set_token(Some(SecretString::from("tok".to_owned())))
            .unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn corrupt_file_reports_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettings::new(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "not json").unwrap();
        assert!(matches!(store.token(), Err(UpBankError::Decode(_))));
    }
}
