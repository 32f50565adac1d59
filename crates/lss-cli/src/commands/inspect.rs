use std::path::Path;

use lss_core::Run;
use serde::Serialize;

use crate::commands::common::load_run;
use crate::error::CliError;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RunOverview {
    pub version: Option<String>,
    pub game_name: String,
    pub category_name: String,
    pub attempt_count: u32,
    pub recorded_attempts: usize,
    pub offset: String,
    pub segments: Vec<String>,
}

pub fn run_overview(run: &Run) -> RunOverview {
    RunOverview {
        version: run.version().map(str::to_string),
        game_name: run.game_name().to_string(),
        category_name: run.category_name().to_string(),
        attempt_count: run.attempt_count(),
        recorded_attempts: run.attempt_ids().len(),
        offset: lss_core::scalar::encode_offset(run.offset()),
        segments: run
            .segments()
            .iter()
            .map(|segment| segment.name().to_string())
            .collect(),
    }
}

pub fn format_overview_lines(overview: &RunOverview) -> Vec<String> {
    let mut lines = vec![
        format!("{} - {}", overview.game_name, overview.category_name),
        format!(
            "Version:  {}",
            overview.version.as_deref().unwrap_or("unknown")
        ),
        format!(
            "Attempts: {} ({} recorded)",
            overview.attempt_count, overview.recorded_attempts
        ),
        format!("Offset:   {}", overview.offset),
        format!("Segments: {}", overview.segments.len()),
    ];
    lines.extend(
        overview
            .segments
            .iter()
            .enumerate()
            .map(|(index, name)| format!("  {:>3}. {name}", index + 1)),
    );
    lines
}

pub fn run_inspect(file: &Path, as_json: bool) -> Result<(), CliError> {
    let run = load_run(file)?;
    let overview = run_overview(&run);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&overview)?);
    } else {
        for line in format_overview_lines(&overview) {
            println!("{line}");
        }
    }

    Ok(())
}
