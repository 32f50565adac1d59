use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, shells};

use crate::cli::{Cli, CompletionShell};
use crate::error::CliError;

/// Completion script for `shell`, generated from the clap definition.
pub fn completion_script(shell: CompletionShell) -> Vec<u8> {
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();
    let mut script = Vec::new();
    match shell {
        CompletionShell::Bash => generate(shells::Bash, &mut command, bin_name, &mut script),
        CompletionShell::Zsh => generate(shells::Zsh, &mut command, bin_name, &mut script),
        CompletionShell::Fish => generate(shells::Fish, &mut command, bin_name, &mut script),
    }
    script
}

pub fn run_completions(shell: CompletionShell, output_path: Option<&Path>) -> Result<(), CliError> {
    let script = completion_script(shell);
    match output_path {
        Some(path) => {
            std::fs::write(path, &script)?;
            tracing::info!("Wrote {:?} completions to {}", shell, path.display());
        }
        None => io::stdout().write_all(&script)?,
    }
    Ok(())
}
