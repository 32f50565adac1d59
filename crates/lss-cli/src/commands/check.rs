use std::path::{Path, PathBuf};

use lss_core::codec::unbind;
use lss_core::xml::{canonicalize, serialize};
use lss_core::{read_run, Emit};

use crate::commands::common::{first_difference, read_bytes};
use crate::error::CliError;

/// Result of round-tripping one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Identical,
    /// Canonical texts first differ at this byte offset.
    Differs(usize),
    Invalid(String),
}

pub fn check_file(path: &Path) -> CheckOutcome {
    let bytes = match read_bytes(path) {
        Ok(bytes) => bytes,
        Err(error) => return CheckOutcome::Invalid(error.to_string()),
    };
    let expected = match canonicalize(&bytes) {
        Ok(canonical) => canonical,
        Err(error) => return CheckOutcome::Invalid(error.to_string()),
    };
    let run = match read_run(&bytes) {
        Ok(run) => run,
        Err(error) => return CheckOutcome::Invalid(error.to_string()),
    };

    let written = match serialize(&unbind(&run, Emit::ExcludeUnset)) {
        Ok(written) => written,
        Err(error) => return CheckOutcome::Invalid(error.to_string()),
    };
    first_difference(&expected, &written).map_or(CheckOutcome::Identical, CheckOutcome::Differs)
}

pub fn run_check(files: &[PathBuf]) -> Result<(), CliError> {
    let mut failed = 0;
    for path in files {
        match check_file(path) {
            CheckOutcome::Identical => println!("ok      {}", path.display()),
            CheckOutcome::Differs(offset) => {
                failed += 1;
                println!("differs {} (at byte {offset})", path.display());
            }
            CheckOutcome::Invalid(message) => {
                failed += 1;
                println!("invalid {}: {message}", path.display());
            }
        }
    }

    if failed > 0 {
        return Err(CliError::RoundTripFailed {
            failed,
            total: files.len(),
        });
    }
    Ok(())
}
