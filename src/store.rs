//! Flat key-value save file: API key, roster text and recent winners.

use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roster::Roster;

const STORE_FILE: &str = "store.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed store {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Saved {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    roster: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    history: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    saved: Saved,
}

impl Store {
    /// `store.json` in the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "wheel-of-names").map(|dirs| dirs.config_dir().join(STORE_FILE))
    }

    /// Loads the store at `path`. A missing file is an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Store, StoreError> {
        let path = path.into();
        let saved = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Saved::default(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        log::debug!("Loaded store from {}", path.display());
        Ok(Store { path, saved })
    }

    /// Like [`Store::load`], but an unreadable file is logged and replaced by
    /// an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Store {
        let path = path.into();
        match Store::load(&path) {
            Ok(store) => store,
            Err(e) => {
                log::warn!("{e}; starting from an empty store");
                Store {
                    path,
                    saved: Saved::default(),
                }
            }
        }
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&self.saved).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        // Write beside the target, then swap in
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        log::info!("Saved {}", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn api_key(&self) -> Option<&str> {
        self.saved.api_key.as_deref()
    }

    /// Stores a trimmed key; a blank key removes it.
    pub fn set_api_key(&mut self, key: &str) {
        let key = key.trim();
        self.saved.api_key = (!key.is_empty()).then(|| key.to_string());
    }

    pub fn clear_api_key(&mut self) {
        self.saved.api_key = None;
    }

    /// Saved roster, or the default class if none was saved.
    pub fn roster(&self) -> Roster {
        match &self.saved.roster {
            Some(text) => Roster::from_text(text),
            None => Roster::with_defaults(),
        }
    }

    pub fn set_roster(&mut self, roster: &Roster) {
        self.saved.roster = Some(roster.to_text());
    }

    pub fn reset_roster(&mut self) {
        self.saved.roster = None;
    }

    /// Recent winners, most recent first.
    pub fn history(&self) -> &[String] {
        &self.saved.history
    }

    pub fn set_history(&mut self, history: Vec<String>) {
        self.saved.history = history;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::DEFAULT_NAMES;

    #[test]
    fn missing_file_is_empty_store_with_default_roster() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::load(dir.path().join("store.json")).unwrap();
        assert_eq!(store.api_key(), None);
        assert_eq!(store.roster().len(), DEFAULT_NAMES.len());
        assert!(store.history().is_empty());
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let mut store = Store::load(&path).unwrap();
        store.set_api_key("  secret-key ");
        store.set_roster(&Roster::from_text("An\nBình"));
        store.set_history(vec!["Bình".into(), "An".into()]);
        store.save().unwrap();

        let reloaded = Store::load(&path).unwrap();
        assert_eq!(reloaded.api_key(), Some("secret-key"));
        assert_eq!(reloaded.roster().to_text(), "An\nBình");
        assert_eq!(reloaded.history(), ["Bình".to_string(), "An".to_string()]);
    }

    #[test]
    fn blank_key_removes_it() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::load(dir.path().join("s.json")).unwrap();
        store.set_api_key("abc");
        store.set_api_key("   ");
        assert_eq!(store.api_key(), None);
        store.set_api_key("abc");
        store.clear_api_key();
        assert_eq!(store.api_key(), None);
    }

    #[test]
    fn empty_saved_roster_stays_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::load(dir.path().join("s.json")).unwrap();
        store.set_roster(&Roster::new());
        assert!(store.roster().is_empty());
        store.reset_roster();
        assert_eq!(store.roster().len(), DEFAULT_NAMES.len());
    }

    #[test]
    fn corrupt_file_is_an_error_for_load_but_not_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Store::load(&path), Err(StoreError::Json { .. })));
        let store = Store::open(&path);
        assert_eq!(store.api_key(), None);
    }

    #[test]
    fn unknown_keys_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, r#"{"api_key":"k","theme":"dark"}"#).unwrap();
        assert_eq!(Store::load(&path).unwrap().api_key(), Some("k"));
    }
}
