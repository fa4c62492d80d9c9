use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GitProfError>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Which `git config` call failed while applying an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStage {
    Name,
    Email,
    SigningKey,
}

impl ApplyStage {
    /// The git configuration key this stage writes
    pub fn config_key(&self) -> &'static str {
        match self {
            ApplyStage::Name => "user.name",
            ApplyStage::Email => "user.email",
            ApplyStage::SigningKey => "user.signingkey",
        }
    }
}

impl fmt::Display for ApplyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApplyStage::Name => "user.name",
            ApplyStage::Email => "user.email",
            ApplyStage::SigningKey => "signing key",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum GitProfError {
    #[error("Failed to {action} profile store {path:?}")]
    Persistence {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("Failed to set {stage}: {message}")]
    Apply { stage: ApplyStage, message: String },
    /// The terminal could not be prompted (no TTY, I/O failure)
    #[error("Failed to prompt for input: {0}")]
    Prompt(String),
}

impl GitProfError {
    pub(crate) fn persistence(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Persistence {
            action,
            path: path.into(),
            source: source.into(),
        }
    }

    /// The stage at which application failed, if this is an apply error
    pub fn apply_stage(&self) -> Option<ApplyStage> {
        match self {
            Self::Apply { stage, .. } => Some(*stage),
            Self::Persistence { .. } | Self::Prompt(_) => None,
        }
    }
}
