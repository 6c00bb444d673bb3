//! File-backed key-value store for the persisted session.
//!
//! The token and user id live under fixed keys in a small JSON object on
//! disk, so a login survives process restarts.

use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

use crate::types::{AppError, Result};

/// A flat string-to-string key-value file.
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Key holding the bearer token.
    pub const TOKEN_KEY: &'static str = "token";
    /// Key holding the logged-in user's id.
    pub const USER_ID_KEY: &'static str = "user_id";

    /// A store backed by the given file. Nothing is read until first use.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Reads a value. A missing file yields `None`; a corrupt file is an
    /// error so callers can decide whether to degrade.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self.read_map()?;
        Ok(map
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()))
    }

    /// Writes a value, creating the file and parent directory on first use.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.read_map().unwrap_or_default();
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.write_map(&map)
    }

    /// Removes a key. Removing from a missing file is a no-op.
    pub fn remove(&self, key: &str) -> Result<()> {
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(_) => return Ok(()),
        };
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }

    fn read_map(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let contents = fs::read_to_string(&self.path)
            .map_err(|e| AppError::Store(format!("read {}: {}", self.path.display(), e)))?;
        let value: Value = serde_json::from_str(&contents)
            .map_err(|e| AppError::Store(format!("parse {}: {}", self.path.display(), e)))?;
        match value {
            Value::Object(map) => Ok(map),
            _ => Err(AppError::Store(format!(
                "{} is not a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Store(format!("create {}: {}", parent.display(), e)))?;
        }
        let contents = serde_json::to_string_pretty(&Value::Object(map.clone()))
            .map_err(|e| AppError::Store(e.to_string()))?;
        fs::write(&self.path, contents)
            .map_err(|e| AppError::Store(format!("write {}: {}", self.path.display(), e)))
    }
}
