//! High-level command orchestration for the CLI.
//!
//! Each handler corresponds to a subcommand in `main.rs`. Handlers drive the
//! `ProfileController`, turn its outcome into notifications, and refresh the
//! status line after anything that may have changed the store.

use anstyle::AnsiColor;
use anyhow::{Result, bail};

use crate::apply::GitConfig;
use crate::controller::{NewProfile, Outcome, ProfileController};
use crate::doctor::run_doctor;
use crate::error::GitProfError;
use crate::prompt::Prompter;
use crate::status::{self, StatusLine};
use crate::store::ProfileStore;
use crate::ui::Ui;

const MENU_ADD: &str = "Add New Git Profile";
const MENU_SELECT: &str = "Select Existing Git Profile";

/// Show the status line, then offer add/select
pub fn manage<G: GitConfig>(
    store: &ProfileStore,
    git: G,
    prompter: &mut dyn Prompter,
    ui: &Ui,
) -> Result<()> {
    refresh_status(store, ui);

    let options = vec![MENU_ADD.to_string(), MENU_SELECT.to_string()];
    match prompter.select("Manage Git Profiles", &options)? {
        Some(0) => add(store, git, prompter, ui, NewProfile::default()),
        Some(1) => select(store, git, prompter, ui),
        _ => Ok(()),
    }
}

/// Create a profile and make it the global git identity
pub fn add<G: GitConfig>(
    store: &ProfileStore,
    git: G,
    prompter: &mut dyn Prompter,
    ui: &Ui,
    preset: NewProfile,
) -> Result<()> {
    let mut controller = ProfileController::new(store, git);
    let outcome = controller.create(prompter, preset);
    report(store, ui, outcome)
}

/// Pick a stored profile interactively
pub fn select<G: GitConfig>(
    store: &ProfileStore,
    git: G,
    prompter: &mut dyn Prompter,
    ui: &Ui,
) -> Result<()> {
    let mut controller = ProfileController::new(store, git);
    let outcome = controller.select(prompter);
    report(store, ui, outcome)
}

/// Activate a profile by id or label
pub fn use_profile<G: GitConfig>(store: &ProfileStore, git: G, key: &str, ui: &Ui) -> Result<()> {
    let mut controller = ProfileController::new(store, git);

    let spinner = ui.spinner(format!("Switching to '{}'...", key));
    let outcome = controller.select_by_key(key);
    ui.spinner_clear(&spinner);

    report(store, ui, outcome)
}

/// Re-apply the selected profile to git
pub fn sync<G: GitConfig>(store: &ProfileStore, git: G, ui: &Ui) -> Result<()> {
    let mut controller = ProfileController::new(store, git);

    let spinner = ui.spinner("Configuring git...");
    let synced = controller.sync();
    ui.spinner_clear(&spinner);

    match synced? {
        Some(profile) => ui.ok(format!("Git global user set to: {}", profile.identity())),
        None => {
            ui.warn("No profile selected.");
            ui.println(format!("Select one with:  {} select", ui.bold("gitprof")));
        }
    }
    Ok(())
}

/// List all stored profiles in insertion order
pub fn list(store: &ProfileStore, ui: &Ui) -> Result<()> {
    let profiles = store.load()?;

    if profiles.is_empty() {
        ui.warn("No profiles found.");
        ui.newline();
        ui.println("Create one with:");
        ui.println(format!("  {} add", ui.bold("gitprof")));
        return Ok(());
    }

    let mut table = ui.simple_table();
    table.set_header(vec![
        ui.header_cell(""),
        ui.header_cell("Label"),
        ui.header_cell("User"),
        ui.header_cell("Email"),
        ui.header_cell("Signing key"),
        ui.header_cell("Id"),
    ]);

    for profile in &profiles {
        let icon = if profile.selected { ui.icon_ok() } else { " " };
        let label = if profile.selected {
            ui.colored_cell(&profile.label, AnsiColor::Green)
        } else {
            ui.cell(&profile.label)
        };
        let key = if profile.has_signing_key() {
            profile.signing_key.as_str()
        } else {
            "-"
        };

        table.add_row(vec![
            ui.cell(icon),
            label,
            ui.cell(&profile.user_name),
            ui.cell(&profile.email),
            ui.cell(key),
            ui.cell(short_id(&profile.id)),
        ]);
    }

    ui.section("Git Profiles");
    ui.println(table.to_string());
    Ok(())
}

/// Show the active identity
pub fn current(store: &ProfileStore, ui: &Ui) -> Result<()> {
    let line = status::refresh(store)?;

    ui.section("Current Git Profile");
    ui.newline();

    let mut table = ui.simple_table();
    match &line.active {
        Some(profile) => {
            table.add_row(vec![ui.cell("Profile:"), ui.header_cell(&profile.label)]);
            table.add_row(vec![ui.cell("Identity:"), ui.cell(profile.identity())]);
            let key = if profile.has_signing_key() {
                ui.cell(&profile.signing_key)
            } else {
                ui.colored_cell("(not set)", AnsiColor::Yellow)
            };
            table.add_row(vec![ui.cell("Signing key:"), key]);
        }
        None => {
            table.add_row(vec![ui.cell("Profile:"), ui.cell("(none)")]);
        }
    }
    table.add_row(vec![ui.cell("Status:"), ui.cell(&line.tooltip)]);
    table.add_row(vec![
        ui.cell("Store:"),
        ui.cell(store.path().display().to_string()),
    ]);

    ui.println(table.to_string());
    ui.newline();
    ui.status(&line);
    Ok(())
}

/// Run diagnostics; fails when any check reported issues
pub fn doctor<G: GitConfig>(store: &ProfileStore, git: G, ui: &Ui) -> Result<()> {
    if !run_doctor(store, git, ui) {
        bail!("Doctor found issues");
    }
    ui.ok("No issues found");
    Ok(())
}

/// Render an error with its cause chain, one level per `: `
pub fn render_error(e: &anyhow::Error) -> String {
    format!("{:#}", e)
}

/// Notify the user of a flow's outcome and refresh the status line.
///
/// Errors are handed back to the caller, which prints them; the status line is
/// still refreshed since a failed apply can follow a successful save.
fn report(
    store: &ProfileStore,
    ui: &Ui,
    outcome: std::result::Result<Outcome, GitProfError>,
) -> Result<()> {
    let profile = match outcome {
        Ok(Outcome::Created(profile)) => {
            ui.ok(format!("Added and set Git profile: {}", profile.label));
            profile
        }
        Ok(Outcome::Selected(profile)) => {
            ui.ok(format!("Selected Git profile: {}", profile.label));
            profile
        }
        Ok(Outcome::NoProfiles) => {
            ui.info("No profiles available. Please add one first.");
            return Ok(());
        }
        Ok(Outcome::NotFound(key)) => {
            ui.warn(format!("No profile matches '{}'", key));
            ui.println(format!("See available profiles with:  {} list", ui.bold("gitprof")));
            return Ok(());
        }
        Ok(Outcome::Cancelled) => return Ok(()),
        Err(e) => {
            if matches!(e, GitProfError::Apply { .. }) {
                refresh_status(store, ui);
            }
            return Err(e.into());
        }
    };

    ui.info(format!("Git global user set to: {}", profile.identity()));
    refresh_status(store, ui);
    Ok(())
}

fn refresh_status(store: &ProfileStore, ui: &Ui) {
    match status::refresh(store) {
        Ok(line) => ui.status(&line),
        Err(e) => {
            log::debug!("status refresh failed: {}", e);
            ui.status(&StatusLine::render(&[]));
        }
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::fixture;
    use crate::test_utils::{RecordingGit, ScriptedPrompter, setup_test_store};
    use crate::ui::ColorMode;
    use tempfile::TempDir;

    fn test_ui() -> Ui {
        Ui::new(ColorMode::Never, false)
    }

    #[test]
    fn test_list_and_current_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = setup_test_store(&temp_dir);
        let ui = test_ui();
        assert!(list(&store, &ui).is_ok());
        assert!(current(&store, &ui).is_ok());
    }

    #[test]
    fn test_list_with_profiles() {
        let temp_dir = TempDir::new().unwrap();
        let store = setup_test_store(&temp_dir);
        let mut signed = fixture("Work", "0123456789abcdef", true);
        signed.signing_key = "ABCD1234".to_string();
        store.save(&[signed, fixture("Home", "2", false)]).unwrap();

        let ui = test_ui();
        assert!(list(&store, &ui).is_ok());
        assert!(current(&store, &ui).is_ok());
    }

    #[test]
    fn test_manage_add_via_menu() {
        let temp_dir = TempDir::new().unwrap();
        let store = setup_test_store(&temp_dir);
        let mut prompter =
            ScriptedPrompter::texts(&[Some("Work"), Some("Alice"), Some("a@x.com"), Some("")]);
        prompter.choices.push_back(Some(0));

        manage(&store, RecordingGit::default(), &mut prompter, &test_ui()).unwrap();

        let stored = store.load().unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].selected);
    }

    #[test]
    fn test_manage_dismissed() {
        let temp_dir = TempDir::new().unwrap();
        let store = setup_test_store(&temp_dir);
        let mut prompter = ScriptedPrompter::choice(None);

        manage(&store, RecordingGit::default(), &mut prompter, &test_ui()).unwrap();
        assert_eq!(prompter.text_prompts, 0);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_select_empty_reports_no_profiles() {
        let temp_dir = TempDir::new().unwrap();
        let store = setup_test_store(&temp_dir);
        let mut prompter = ScriptedPrompter::choice(Some(0));

        assert!(select(&store, RecordingGit::default(), &mut prompter, &test_ui()).is_ok());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_use_unknown_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = setup_test_store(&temp_dir);
        store.save(&[fixture("Work", "1", true)]).unwrap();

        assert!(use_profile(&store, RecordingGit::default(), "Home", &test_ui()).is_ok());
        assert!(store.load().unwrap()[0].selected);
    }

    #[test]
    fn test_apply_failure_propagates() {
        let temp_dir = TempDir::new().unwrap();
        let store = setup_test_store(&temp_dir);
        store
            .save(&[fixture("Work", "1", true), fixture("Home", "2", false)])
            .unwrap();

        let result = use_profile(&store, RecordingGit::failing_on("user.name"), "Home", &test_ui());
        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("Failed to set user.name"));
        // The store was already updated before git failed
        assert!(store.load().unwrap()[1].selected);
    }

    #[test]
    fn test_sync_without_selection() {
        let temp_dir = TempDir::new().unwrap();
        let store = setup_test_store(&temp_dir);
        assert!(sync(&store, RecordingGit::default(), &test_ui()).is_ok());
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_persistence_error_rendered_once() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("settings.json");
        let store = ProfileStore::new(&path);
        let os_error = std::fs::create_dir_all(&blocker).unwrap_err().to_string();

        let preset = NewProfile {
            label: Some("Work".to_string()),
            user_name: Some("Alice".to_string()),
            email: Some("a@x.com".to_string()),
            signing_key: None,
        };
        let err = add(
            &store,
            RecordingGit::default(),
            &mut ScriptedPrompter::default(),
            &test_ui(),
            preset,
        )
        .unwrap_err();

        assert_eq!(
            render_error(&err),
            format!(
                "Failed to create directory for profile store {:?}: {}",
                path, os_error
            )
        );
    }

    #[test]
    fn test_doctor_fails_when_unhealthy() {
        let temp_dir = TempDir::new().unwrap();
        let store = setup_test_store(&temp_dir);
        store.save(&[fixture("Bob", "1", true)]).unwrap();

        // git was never configured for Bob
        let err = doctor(&store, RecordingGit::default(), &test_ui()).unwrap_err();
        assert!(err.to_string().starts_with("Doctor found issues"));
    }

    #[test]
    fn test_doctor_passes_on_fresh_install() {
        let temp_dir = TempDir::new().unwrap();
        let store = setup_test_store(&temp_dir);
        assert!(doctor(&store, RecordingGit::default(), &test_ui()).is_ok());
    }

    #[test]
    fn test_manage_without_terminal_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = setup_test_store(&temp_dir);
        let mut prompter = ScriptedPrompter {
            no_tty: true,
            ..ScriptedPrompter::default()
        };

        assert!(manage(&store, RecordingGit::default(), &mut prompter, &test_ui()).is_err());
        assert!(!store.path().exists());
    }
}
