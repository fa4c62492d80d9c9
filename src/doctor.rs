//! Diagnostic tool for gitprof.
//!
//! Implements `gitprof doctor`, which checks:
//! - that the settings document is readable and holds a valid profile list,
//! - that at most one profile is selected and ids are unique,
//! - that git can be run,
//! - that `git config --global` matches the selected profile.

use anstyle::AnsiColor;
use std::collections::HashSet;

use crate::apply::GitConfig;
use crate::error::ApplyStage;
use crate::profile::{self, Profile};
use crate::store::ProfileStore;
use crate::ui::Ui;

/// Run the doctor diagnostics. Returns `true` when no issues were found.
pub fn run_doctor<G: GitConfig>(store: &ProfileStore, mut git: G, ui: &Ui) -> bool {
    ui.section("gitprof Doctor");
    ui.newline();

    let mut healthy = true;
    let mut profiles: Vec<Profile> = Vec::new();

    healthy &= check_step(ui, "Profile Store", || match store.load() {
        Ok(loaded) => {
            if store.path().exists() {
                ui.println(format!(
                    "  {} Store readable: {}",
                    ui.icon_ok(),
                    store.path().display()
                ));
            } else {
                ui.println(format!(
                    "  {} Store missing (no profiles yet): {}",
                    ui.icon_info(),
                    store.path().display()
                ));
            }
            profiles = loaded;
            true
        }
        Err(e) => {
            ui.println(format!("  {} {}", ui.icon_err(), e));
            false
        }
    });

    healthy &= check_step(ui, "Profiles", || {
        if profiles.is_empty() {
            ui.println(format!("  {} No profiles found", ui.icon_warn()));
            return true;
        }
        ui.println(format!("  Found {} profile(s)", profiles.len()));

        let issues = collection_issues(&profiles);
        if issues.is_empty() {
            ui.println(format!("  {} At most one profile selected", ui.icon_ok()));
            ui.println(format!("  {} Profile ids are unique", ui.icon_ok()));
        }
        for issue in &issues {
            ui.println(format!("  {} {}", ui.icon_err(), issue));
        }
        issues.is_empty()
    });

    healthy &= check_step(ui, "Git", || match git.version() {
        Ok(version) => {
            ui.println(format!("  {} {}", ui.icon_ok(), version));
            true
        }
        Err(e) => {
            ui.println(format!("  {} git is not runnable: {}", ui.icon_err(), e));
            false
        }
    });

    healthy &= check_step(ui, "Git Identity", || {
        let Some(active) = profile::active(&profiles) else {
            ui.println(format!("  {} No profile selected", ui.icon_info()));
            return true;
        };

        let mut ok = true;
        let mut expected = vec![
            (ApplyStage::Name, active.user_name.as_str()),
            (ApplyStage::Email, active.email.as_str()),
        ];
        if active.has_signing_key() {
            expected.push((ApplyStage::SigningKey, active.signing_key.as_str()));
        }

        for (stage, want) in expected {
            match git.get_global(stage.config_key()) {
                Ok(Some(actual)) if actual == want => {
                    ui.println(format!("  {} {} = {}", ui.icon_ok(), stage.config_key(), actual));
                }
                Ok(Some(actual)) => {
                    ui.println(format!(
                        "  {} {} is '{}', profile '{}' expects '{}'",
                        ui.icon_warn(),
                        stage.config_key(),
                        actual,
                        active.label,
                        want
                    ));
                    ok = false;
                }
                Ok(None) => {
                    ui.println(format!("  {} {} is not set", ui.icon_warn(), stage.config_key()));
                    ok = false;
                }
                Err(e) => {
                    ui.println(format!("  {} Failed to read {}: {}", ui.icon_err(), stage.config_key(), e));
                    ok = false;
                }
            }
        }

        if !ok {
            ui.println(format!("  Run {} to re-apply it", ui.bold("gitprof sync")));
        }
        ok
    });

    healthy
}

/// Problems with the stored collection that the flows would never produce
pub fn collection_issues(profiles: &[Profile]) -> Vec<String> {
    let mut issues = Vec::new();

    let selected: Vec<&str> = profiles
        .iter()
        .filter(|p| p.selected)
        .map(|p| p.label.as_str())
        .collect();
    if selected.len() > 1 {
        issues.push(format!(
            "{} profiles are selected ({}); the first one wins",
            selected.len(),
            selected.join(", ")
        ));
    }

    let mut seen = HashSet::new();
    for p in profiles {
        if !seen.insert(p.id.as_str()) {
            issues.push(format!("Duplicate profile id {}", p.id));
        }
    }

    issues
}

fn check_step<F>(ui: &Ui, name: &str, check_fn: F) -> bool
where
    F: FnOnce() -> bool,
{
    ui.println(ui.bold(format!("Checking {}...", name)));
    let success = check_fn();
    if !success {
        ui.println(ui.colored("  Issues detected!", AnsiColor::Red));
    }
    ui.newline();
    success
}
