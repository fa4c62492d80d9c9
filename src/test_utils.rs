//! Test utilities shared across test modules
//!
//! Fakes for the two external seams (git and the interactive prompter) plus a
//! temp-dir backed store.

use std::collections::VecDeque;

use tempfile::TempDir;

use crate::apply::GitConfig;
use crate::error::GitProfError;
use crate::paths::Paths;
use crate::prompt::Prompter;
use crate::store::ProfileStore;

/// Create a store rooted in a temporary directory
pub fn setup_test_store(temp_dir: &TempDir) -> ProfileStore {
    let paths = Paths::from_base(temp_dir.path().join(".gitprof"));
    ProfileStore::new(&paths.settings_file)
}

/// Records every `git config --global` write and can fail on a chosen key
#[derive(Debug, Default)]
pub struct RecordingGit {
    pub calls: Vec<(String, String)>,
    pub fail_on: Option<&'static str>,
    pub current: Vec<(String, String)>,
}

impl RecordingGit {
    pub fn failing_on(key: &'static str) -> Self {
        Self {
            fail_on: Some(key),
            ..Self::default()
        }
    }

    pub fn keys(&self) -> Vec<&str> {
        self.calls.iter().map(|(k, _)| k.as_str()).collect()
    }
}

impl GitConfig for RecordingGit {
    fn set_global(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.calls.push((key.to_string(), value.to_string()));
        if self.fail_on == Some(key) {
            return Err(format!("error: could not set {key}"));
        }
        self.current.retain(|(k, _)| k != key);
        self.current.push((key.to_string(), value.to_string()));
        Ok(())
    }

    fn get_global(&mut self, key: &str) -> Result<Option<String>, String> {
        Ok(self
            .current
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone()))
    }

    fn version(&mut self) -> Result<String, String> {
        Ok("git version 2.45.0".to_string())
    }
}

/// Answers prompts from a script; `None` simulates the user cancelling
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    pub texts: VecDeque<Option<String>>,
    pub choices: VecDeque<Option<usize>>,
    pub text_prompts: usize,
    pub select_prompts: usize,
    /// Fail once the script runs out, like a terminal without a TTY
    pub no_tty: bool,
}

impl ScriptedPrompter {
    pub fn texts(answers: &[Option<&str>]) -> Self {
        Self {
            texts: answers.iter().map(|a| a.map(str::to_string)).collect(),
            ..Self::default()
        }
    }

    pub fn choice(index: Option<usize>) -> Self {
        Self {
            choices: VecDeque::from([index]),
            ..Self::default()
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn text(&mut self, _message: &str) -> crate::error::Result<Option<String>> {
        self.text_prompts += 1;
        match self.texts.pop_front() {
            Some(answer) => Ok(answer),
            None if self.no_tty => Err(GitProfError::Prompt("not a TTY".to_string())),
            None => Ok(None),
        }
    }

    fn select(&mut self, _message: &str, _options: &[String]) -> crate::error::Result<Option<usize>> {
        self.select_prompts += 1;
        match self.choices.pop_front() {
            Some(answer) => Ok(answer),
            None if self.no_tty => Err(GitProfError::Prompt("not a TTY".to_string())),
            None => Ok(None),
        }
    }
}
