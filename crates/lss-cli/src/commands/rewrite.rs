use std::path::Path;

use lss_core::{write_run, Emit};

use crate::commands::common::{emit_output, load_run};
use crate::error::CliError;

pub fn run_rewrite(file: &Path, output_path: Option<&Path>, emit: Emit) -> Result<(), CliError> {
    let run = load_run(file)?;
    emit_output(&write_run(&run, emit)?, output_path)
}
