use anyhow::{Context, Result};
use directories::BaseDirs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the base directory
pub const HOME_ENV: &str = "GITPROF_HOME";

/// All computed paths used by gitprof
#[derive(Debug, Clone)]
pub struct Paths {
    /// ~/.gitprof (or $GITPROF_HOME)
    pub base_dir: PathBuf,
    /// ~/.gitprof/settings.json
    pub settings_file: PathBuf,
}

impl Paths {
    pub fn new() -> Result<Self> {
        let base_dir = match std::env::var_os(HOME_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => {
                let base_dirs = BaseDirs::new().context("Failed to determine home directory")?;
                base_dirs.home_dir().join(".gitprof")
            }
        };

        Ok(Self::from_base(base_dir))
    }

    pub fn from_base(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let settings_file = base_dir.join("settings.json");
        Self {
            base_dir,
            settings_file,
        }
    }

    /// Point the store at an explicit settings document (`--store`)
    pub fn with_settings_file(mut self, path: &Path) -> Self {
        self.settings_file = path.to_path_buf();
        self
    }
}
