use std::path::Path;

use lss_core::export::render_table;
use lss_core::projection::project;
use lss_core::Run;

use crate::commands::common::{emit_output, load_run};
use crate::config::TableSettings;
use crate::error::CliError;

pub fn render_run_table(run: &Run, settings: &TableSettings) -> Result<String, CliError> {
    let table = project(run, &settings.projection);
    if table.attempts().is_empty() {
        tracing::warn!("No attempts left after filtering; try --allow-partial");
    }
    Ok(render_table(
        &table.to_text(settings.include_fraction),
        settings.format,
    )?)
}

pub fn run_table(
    file: &Path,
    settings: &TableSettings,
    output_path: Option<&Path>,
) -> Result<(), CliError> {
    let run = load_run(file)?;
    let rendered = render_run_table(&run, settings)?;
    emit_output(&rendered, output_path)
}
