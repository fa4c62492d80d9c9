//! Applying a profile to the global git configuration.
//!
//! Values are always handed to `git` as separate arguments; nothing goes
//! through a shell, so names and emails with quotes or `$` are written as-is.

use std::ffi::OsString;
use std::process::Command;

use crate::error::{ApplyStage, GitProfError, Result};
use crate::profile::Profile;

/// Environment variable naming the git executable
pub const GIT_ENV: &str = "GITPROF_GIT";

/// Access to `git config --global`
pub trait GitConfig {
    /// Set a global key. `Err` carries the raw error output.
    fn set_global(&mut self, key: &str, value: &str) -> std::result::Result<(), String>;

    /// Read a global key, `None` if unset
    fn get_global(&mut self, key: &str) -> std::result::Result<Option<String>, String>;

    /// `git --version` output
    fn version(&mut self) -> std::result::Result<String, String>;
}

/// The real `git` binary
#[derive(Debug, Clone)]
pub struct GitCli {
    program: OsString,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new(None)
    }
}

impl GitCli {
    /// Use `program`, else `$GITPROF_GIT`, else `git` from `PATH`
    pub fn new(program: Option<OsString>) -> Self {
        let program = program
            .or_else(|| std::env::var_os(GIT_ENV).filter(|p| !p.is_empty()))
            .unwrap_or_else(|| OsString::from("git"));
        Self { program }
    }
}

impl GitConfig for GitCli {
    fn set_global(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        log::debug!("git config --global {} {:?}", key, value);
        let output = Command::new(&self.program)
            .args(["config", "--global", key, value])
            .output()
            .map_err(|e| format!("Failed to run {:?}: {}", self.program, e))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        log::debug!("git config --global {} failed: {}", key, stderr);
        if stderr.is_empty() {
            Err(format!("git exited with {}", output.status))
        } else {
            Err(stderr)
        }
    }

    fn get_global(&mut self, key: &str) -> std::result::Result<Option<String>, String> {
        let output = Command::new(&self.program)
            .args(["config", "--global", "--get", key])
            .output()
            .map_err(|e| format!("Failed to run {:?}: {}", self.program, e))?;

        // Exit code 1 means the key is not set
        match output.status.code() {
            Some(0) => Ok(Some(
                String::from_utf8_lossy(&output.stdout).trim_end().to_string(),
            )),
            Some(1) => Ok(None),
            _ => Err(String::from_utf8_lossy(&output.stderr).trim().to_string()),
        }
    }

    fn version(&mut self) -> std::result::Result<String, String> {
        let output = Command::new(&self.program)
            .arg("--version")
            .output()
            .map_err(|e| format!("Failed to run {:?}: {}", self.program, e))?;
        if !output.status.success() {
            return Err(String::from_utf8_lossy(&output.stderr).trim().to_string());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Pushes identity fields into global git config, one stage at a time
pub struct IdentityApplier<G> {
    git: G,
}

impl<G: GitConfig> IdentityApplier<G> {
    pub fn new(git: G) -> Self {
        Self { git }
    }

    pub fn git(&self) -> &G {
        &self.git
    }

    pub fn git_mut(&mut self) -> &mut G {
        &mut self.git
    }

    /// Set name, email and (if non-empty) signing key, stopping at the first
    /// failure. Stages that already ran are not undone.
    pub fn apply(&mut self, user_name: &str, email: &str, signing_key: &str) -> Result<()> {
        let mut stages = vec![(ApplyStage::Name, user_name), (ApplyStage::Email, email)];
        if !signing_key.is_empty() {
            stages.push((ApplyStage::SigningKey, signing_key));
        }

        for (stage, value) in stages {
            self.git
                .set_global(stage.config_key(), value)
                .map_err(|message| GitProfError::Apply { stage, message })?;
        }

        log::info!("git global user set to {} <{}>", user_name, email);
        Ok(())
    }

    pub fn apply_profile(&mut self, profile: &Profile) -> Result<()> {
        self.apply(&profile.user_name, &profile.email, &profile.signing_key)
    }
}
