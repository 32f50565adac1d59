use std::path::Path;

use lss_core::{read_run, Run};

use crate::error::CliError;

pub fn read_bytes(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and bind a splits file, tagging errors with its path.
pub fn load_run(path: &Path) -> Result<Run, CliError> {
    let bytes = read_bytes(path)?;
    let run = read_run(&bytes).map_err(|source| CliError::InvalidSplits {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Loaded {}", path.display());
    Ok(run)
}

/// Write to `output_path` and print its path, or print to stdout.
pub fn emit_output(rendered: &str, output_path: Option<&Path>) -> Result<(), CliError> {
    if let Some(path) = output_path {
        std::fs::write(path, rendered)?;
        println!("{}", path.display());
    } else {
        print!("{rendered}");
        if !rendered.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

/// Byte offset of the first difference between two strings.
pub fn first_difference(left: &str, right: &str) -> Option<usize> {
    let mismatch = left
        .bytes()
        .zip(right.bytes())
        .position(|(a, b)| a != b);
    mismatch.or_else(|| (left.len() != right.len()).then(|| left.len().min(right.len())))
}
