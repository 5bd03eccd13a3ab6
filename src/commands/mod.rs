mod config_cmd;
mod recipe;
mod shell;

pub use config_cmd::ConfigCommand;
pub use recipe::RecipeSubcommand;
pub use shell::ShellCommand;

use clap::ValueEnum;
use recipesync::sync::{ErrorKind, RecipeForm, SyncError};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Message shown to the user for a failed operation.
///
/// Starts from the form's error region and adds detail depending on what
/// kind of failure it was.
pub fn describe_failure<A>(form: &RecipeForm<A>, err: &SyncError) -> String {
    let headline = form
        .error()
        .map(|e| e.message().to_string())
        .unwrap_or_else(|| err.to_string());

    match err.kind() {
        ErrorKind::Validation => headline,
        ErrorKind::Transport => format!(
            "{} ({}). Check that the server is reachable and try again.",
            headline, err
        ),
        ErrorKind::Rejected | ErrorKind::Malformed => format!("{} ({})", headline, err),
        ErrorKind::Busy | ErrorKind::NotFound => err.to_string(),
    }
}
