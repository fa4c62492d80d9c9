//! Create and select flows.
//!
//! Each flow loads the whole collection, derives the next one, persists it and
//! only then pushes the chosen identity into git. A missing answer at any
//! required prompt ends the flow before anything is written.

use crate::apply::{GitConfig, IdentityApplier};
use crate::error::Result;
use crate::profile::{self, Profile};
use crate::prompt::Prompter;
use crate::store::ProfileStore;

/// How a flow ended, when it didn't fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(Profile),
    Selected(Profile),
    /// Select was requested but nothing is stored yet
    NoProfiles,
    /// No profile matched the given id or label
    NotFound(String),
    /// The user gave no answer to a prompt
    Cancelled,
}

/// Field values supplied up front; `None` fields are prompted for
#[derive(Debug, Clone, Default)]
pub struct NewProfile {
    pub label: Option<String>,
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub signing_key: Option<String>,
}

pub struct ProfileController<'a, G> {
    store: &'a ProfileStore,
    applier: IdentityApplier<G>,
}

impl<'a, G: GitConfig> ProfileController<'a, G> {
    pub fn new(store: &'a ProfileStore, git: G) -> Self {
        Self {
            store,
            applier: IdentityApplier::new(git),
        }
    }

    pub fn applier(&self) -> &IdentityApplier<G> {
        &self.applier
    }

    /// Collect a new profile, make it the only selected one, persist and apply
    pub fn create(&mut self, prompter: &mut dyn Prompter, preset: NewProfile) -> Result<Outcome> {
        let Some(label) = required(prompter, preset.label, "Profile label (e.g. \"Work\" or \"Personal\"):")? else {
            return Ok(Outcome::Cancelled);
        };
        let Some(user_name) = required(prompter, preset.user_name, "Git user name:")? else {
            return Ok(Outcome::Cancelled);
        };
        let Some(email) = required(prompter, preset.email, "Git email:")? else {
            return Ok(Outcome::Cancelled);
        };
        let signing_key = match preset.signing_key {
            Some(key) => key,
            None => prompter.text("Signing key (optional):")?.unwrap_or_default(),
        };

        let new = Profile::new(label, user_name, email, Some(signing_key.trim().to_string()));
        let profiles = profile::with_new_selected(self.store.load()?, new.clone());
        self.store.save(&profiles)?;
        log::debug!("created profile {} ({})", new.label, new.id);

        self.applier.apply_profile(&new)?;
        Ok(Outcome::Created(new))
    }

    /// Offer the stored profiles as a single choice and activate the pick
    pub fn select(&mut self, prompter: &mut dyn Prompter) -> Result<Outcome> {
        let profiles = self.store.load()?;
        if profiles.is_empty() {
            return Ok(Outcome::NoProfiles);
        }

        let options: Vec<String> = profiles
            .iter()
            .map(|p| format!("{} ({})", p.label, p.identity()))
            .collect();
        let Some(index) = prompter.select("Select a Git profile", &options)? else {
            return Ok(Outcome::Cancelled);
        };
        let Some(chosen) = profiles.get(index) else {
            return Ok(Outcome::Cancelled);
        };

        self.activate(&profiles, &chosen.id)
    }

    /// Activate the profile whose id (or, failing that, label) is `key`
    pub fn select_by_key(&mut self, key: &str) -> Result<Outcome> {
        let profiles = self.store.load()?;
        if profiles.is_empty() {
            return Ok(Outcome::NoProfiles);
        }

        match profile::find(&profiles, key) {
            Some(found) => {
                let id = found.id.clone();
                self.activate(&profiles, &id)
            }
            None => Ok(Outcome::NotFound(key.to_string())),
        }
    }

    /// Re-apply the selected profile without touching the store
    pub fn sync(&mut self) -> Result<Option<Profile>> {
        let profiles = self.store.load()?;
        let Some(active) = profile::active(&profiles).cloned() else {
            return Ok(None);
        };
        self.applier.apply_profile(&active)?;
        Ok(Some(active))
    }

    fn activate(&mut self, profiles: &[Profile], id: &str) -> Result<Outcome> {
        let Some(updated) = profile::select_only(profiles, id) else {
            log::debug!("profile {} not found, nothing selected", id);
            return Ok(Outcome::NotFound(id.to_string()));
        };
        self.store.save(&updated)?;

        let Some(chosen) = updated.into_iter().find(|p| p.id == id) else {
            return Ok(Outcome::NotFound(id.to_string()));
        };
        log::debug!("selected profile {} ({})", chosen.label, chosen.id);

        self.applier.apply_profile(&chosen)?;
        Ok(Outcome::Selected(chosen))
    }
}

/// A preset value or a prompted one; blank counts as no answer
fn required(
    prompter: &mut dyn Prompter,
    preset: Option<String>,
    message: &str,
) -> Result<Option<String>> {
    let answer = match preset {
        Some(value) => Some(value),
        None => prompter.text(message)?,
    };
    Ok(answer
        .map(|answer| answer.trim().to_string())
        .filter(|answer| !answer.is_empty()))
}
