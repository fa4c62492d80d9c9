pub mod apply;
pub mod commands;
pub mod controller;
pub mod doctor;
pub mod error;
pub mod paths;
pub mod profile;
pub mod prompt;
pub mod status;
pub mod store;
pub mod ui;

pub use error::{ApplyStage, GitProfError};
pub use profile::Profile;

#[cfg(test)]
pub mod test_utils;
