use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use gitprof::{
    apply::GitCli,
    commands,
    controller::NewProfile,
    paths::Paths,
    prompt::InquirePrompter,
    store::ProfileStore,
    ui::{ColorMode, Ui},
};

#[derive(Parser)]
#[command(name = "gitprof")]
#[command(about = "Git Profile Switcher - manage multiple global git identities")]
#[command(version)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// When to use colors: always, auto, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Print debug logs (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings document holding the profiles [default: ~/.gitprof/settings.json]
    #[arg(long, global = true, value_name = "FILE")]
    store: Option<PathBuf>,

    /// git executable to run [env: GITPROF_GIT, default: git]
    #[arg(long, global = true, value_name = "PROGRAM")]
    git: Option<OsString>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the active identity, then add or select a profile (default)
    Manage,

    /// Add a new profile and make it the global git identity
    Add {
        /// Display label, e.g. "Work"
        #[arg(long)]
        label: Option<String>,

        /// Value for user.name
        #[arg(long)]
        name: Option<String>,

        /// Value for user.email
        #[arg(long)]
        email: Option<String>,

        /// Value for user.signingkey
        #[arg(long)]
        signing_key: Option<String>,
    },

    /// Choose an existing profile interactively
    Select,

    /// Switch to a profile by id or label
    Use {
        /// Profile id or label
        profile: String,
    },

    /// List all profiles
    List,

    /// Show the active profile
    Current,

    /// Re-apply the selected profile to the global git config
    Sync,

    /// Run diagnostics on the gitprof setup
    Doctor,

    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let ui = Ui::new(cli.color, cli.no_color);

    match run(cli, &ui) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui.err(commands::render_error(&e));
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(cli: Cli, ui: &Ui) -> Result<()> {
    let mut paths = Paths::new()?;
    if let Some(store) = &cli.store {
        paths = paths.with_settings_file(store);
    }
    log::debug!("using store {:?}", paths.settings_file);

    let store = ProfileStore::new(&paths.settings_file);
    let git = GitCli::new(cli.git);
    let mut prompter = InquirePrompter;

    match cli.command.unwrap_or(Commands::Manage) {
        Commands::Manage => commands::manage(&store, git, &mut prompter, ui),
        Commands::Add {
            label,
            name,
            email,
            signing_key,
        } => {
            let preset = NewProfile {
                label,
                user_name: name,
                email,
                signing_key,
            };
            commands::add(&store, git, &mut prompter, ui, preset)
        }
        Commands::Select => commands::select(&store, git, &mut prompter, ui),
        Commands::Use { profile } => commands::use_profile(&store, git, &profile, ui),
        Commands::List => commands::list(&store, ui),
        Commands::Current => commands::current(&store, ui),
        Commands::Sync => commands::sync(&store, git, ui),
        Commands::Doctor => commands::doctor(&store, git, ui),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "gitprof", &mut std::io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_invocation_manages() {
        let cli = Cli::parse_from(["gitprof"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.color, ColorMode::Auto);
    }

    #[test]
    fn test_add_flags() {
        let cli = Cli::parse_from([
            "gitprof",
            "add",
            "--label",
            "Work",
            "--name",
            "Alice",
            "--email",
            "a@x.com",
            "--signing-key",
            "ABCD1234",
        ]);
        let Some(Commands::Add { label, signing_key, .. }) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(label.as_deref(), Some("Work"));
        assert_eq!(signing_key.as_deref(), Some("ABCD1234"));
    }

    #[test]
    fn test_global_store_flag() {
        let cli = Cli::parse_from(["gitprof", "list", "--store", "/tmp/p.json", "--color", "never"]);
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/p.json")));
        assert_eq!(cli.color, ColorMode::Never);
    }
}
