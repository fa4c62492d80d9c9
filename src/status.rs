use crate::error::Result;
use crate::profile::{self, Profile};
use crate::store::ProfileStore;

/// Label shown when no profile is selected
pub const UNSET_LABEL: &str = "Set Git User";

/// One-line indicator of the active git identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub tooltip: String,
    pub active: Option<Profile>,
}

impl StatusLine {
    pub fn render(profiles: &[Profile]) -> Self {
        match profile::active(profiles) {
            Some(active) => {
                let identity = active.identity();
                Self {
                    tooltip: format!("Git User: {}", identity),
                    text: identity,
                    active: Some(active.clone()),
                }
            }
            None => Self {
                text: UNSET_LABEL.to_string(),
                tooltip: UNSET_LABEL.to_string(),
                active: None,
            },
        }
    }

    pub fn is_set(&self) -> bool {
        self.active.is_some()
    }
}

/// Re-read the store and render the indicator. Never writes.
pub fn refresh(store: &ProfileStore) -> Result<StatusLine> {
    Ok(StatusLine::render(&store.load()?))
}
