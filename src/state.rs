//! `KEY=VALUE` state file for persisting CLI settings between runs.

use anyhow::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key-value persistence backed by one flat file.
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load a single value by key, None when the file or key is missing.
    pub fn load_value(&self, key: &str) -> Option<String> {
        self.load_all().remove(key)
    }

    /// Save one key, preserving the rest of the file.
    pub fn save_value(&self, key: &str, value: &str) -> Result<()> {
        let mut state = self.load_all();
        state.insert(key.to_string(), value.to_string());
        self.save_all(&state)
    }

    /// All key-value pairs currently in the file.
    pub fn load_all(&self) -> BTreeMap<String, String> {
        fs::read_to_string(&self.path)
            .map(|contents| {
                contents
                    .lines()
                    .filter_map(|line| line.split_once('='))
                    .map(|(k, v)| (k.to_string(), v.trim().to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Write the full map, sorted by key for stable diffs.
    pub fn save_all(&self, state: &BTreeMap<String, String>) -> Result<()> {
        let mut content = String::new();
        for (key, value) in state {
            content.push_str(&format!("{key}={value}\n"));
        }
        fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}
