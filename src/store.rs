//! Persistence for the profile collection.
//!
//! Profiles live under a single key of a JSON settings document. Other keys in
//! the document belong to whoever else edits it and are carried through saves
//! unchanged.

use chrono::Utc;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::error::{GitProfError, Result};
use crate::profile::Profile;

/// Settings key holding the ordered profile array
pub const PROFILES_KEY: &str = "gitprof.profiles";
/// Settings key stamped on every save
pub const UPDATED_AT_KEY: &str = "gitprof.updatedAt";

#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored profiles, empty if the document or key doesn't exist
    pub fn load(&self) -> Result<Vec<Profile>> {
        let mut document = self.read_document()?;
        let Some(raw) = document.remove(PROFILES_KEY) else {
            log::debug!("no profiles stored in {:?}", self.path);
            return Ok(Vec::new());
        };

        let profiles: Vec<Profile> = serde_json::from_value(raw)
            .map_err(|e| GitProfError::persistence("parse", &self.path, e))?;
        log::debug!("loaded {} profile(s) from {:?}", profiles.len(), self.path);
        Ok(profiles)
    }

    /// Replace the whole stored collection.
    ///
    /// Writes to a sibling temp file and renames it over the document, so a
    /// reader never sees a half-written file.
    pub fn save(&self, profiles: &[Profile]) -> Result<()> {
        let mut document = self.read_document()?;

        let value = serde_json::to_value(profiles)
            .map_err(|e| GitProfError::persistence("serialize", &self.path, e))?;
        document.insert(PROFILES_KEY.to_string(), value);
        document.insert(
            UPDATED_AT_KEY.to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| GitProfError::persistence("create directory for", &self.path, e))?;
        }

        let content = serde_json::to_string_pretty(&Value::Object(document))
            .map_err(|e| GitProfError::persistence("serialize", &self.path, e))?;

        write_atomic(&self.path, &content)?;
        log::debug!("saved {} profile(s) to {:?}", profiles.len(), self.path);
        Ok(())
    }

    fn read_document(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| GitProfError::persistence("read", &self.path, e))?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(GitProfError::persistence(
                "parse",
                &self.path,
                "settings document is not a JSON object",
            )),
            Err(e) => Err(GitProfError::persistence("parse", &self.path, e)),
        }
    }
}

/// Write to a `.json.tmp` sibling, then rename over `path`
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, content)
        .map_err(|e| GitProfError::persistence("write", &temp_path, e))?;

    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(GitProfError::persistence("write", path, e));
    }
    Ok(())
}
