use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::PrefsError;
use crate::types::Theme;

pub const THEME_KEY: &str = "vitrine-theme";
const PREFS_FILE: &str = "prefs.json";

/// Small durable key-value store backed by a JSON file.
#[derive(Debug)]
pub struct PrefsStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl PrefsStore {
    /// Opens `<dir>/prefs.json`; a missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or is not a
    /// JSON object of strings.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, PrefsError> {
        let path = dir.as_ref().join(PREFS_FILE);
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(PrefsError::Io { path, source }),
        };
        Ok(Self {
            path: Some(path),
            values,
        })
    }

    /// Store that never touches the disk.
    pub const fn ephemeral() -> Self {
        Self {
            path: None,
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn flush(&self) -> Result<(), PrefsError> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        let io_err = |source| PrefsError::Io {
            path: path.clone(),
            source,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let payload = serde_json::to_string_pretty(&self.values)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, payload).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;
        debug!(path = %path.display(), "preferences saved");
        Ok(())
    }
}

/// Active theme, restored from and saved to the preference store.
#[derive(Debug)]
pub struct ThemeController {
    store: PrefsStore,
    current: Theme,
}

impl ThemeController {
    pub fn load(store: PrefsStore, default: Theme) -> Self {
        let current = match store.get(THEME_KEY) {
            None => default,
            Some(raw) => Theme::from_str(raw).unwrap_or_else(|err| {
                warn!(error = %err, "ignoring stored theme");
                default
            }),
        };
        Self { store, current }
    }

    pub const fn current(&self) -> Theme {
        self.current
    }

    /// # Errors
    ///
    /// Returns an error when the choice cannot be persisted; the theme is
    /// applied for the session regardless.
    pub fn set(&mut self, theme: Theme) -> Result<Theme, PrefsError> {
        self.current = theme;
        self.store.set(THEME_KEY, theme.as_str())?;
        Ok(theme)
    }

    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub fn cycle(&mut self) -> Result<Theme, PrefsError> {
        self.set(self.current.next())
    }
}

#[cfg(test)]
mod tests {
    use super::{PrefsStore, THEME_KEY, ThemeController};
    use crate::types::Theme;
    use std::path::PathBuf;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("vitrine-prefs-{}", uuid::Uuid::now_v7()))
    }

    #[test]
    fn theme_survives_reopen() {
        let dir = scratch_dir();
        let store = match PrefsStore::open(&dir) {
            Ok(store) => store,
            Err(err) => panic!("open failed: {err}"),
        };
        let mut themes = ThemeController::load(store, Theme::Cyber);
        assert_eq!(themes.current(), Theme::Cyber);
        assert!(matches!(themes.cycle(), Ok(Theme::Dark)));

        let reopened = match PrefsStore::open(&dir) {
            Ok(store) => store,
            Err(err) => panic!("reopen failed: {err}"),
        };
        assert_eq!(reopened.get(THEME_KEY), Some("dark"));
        assert_eq!(ThemeController::load(reopened, Theme::Cyber).current(), Theme::Dark);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn unknown_stored_theme_falls_back() {
        let mut store = PrefsStore::ephemeral();
        assert!(store.set(THEME_KEY, "sepia").is_ok());
        let themes = ThemeController::load(store, Theme::Light);
        assert_eq!(themes.current(), Theme::Light);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = scratch_dir();
        assert!(std::fs::create_dir_all(&dir).is_ok());
        assert!(std::fs::write(dir.join("prefs.json"), "[1, 2").is_ok());
        assert!(PrefsStore::open(&dir).is_err());
        let _ = std::fs::remove_dir_all(dir);
    }
}
