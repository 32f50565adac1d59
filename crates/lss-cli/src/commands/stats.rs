use std::path::Path;

use lss_core::export::{render_stats_json, render_stats_text, StatsReport};
use lss_core::projection::{project, ProjectionOptions};
use lss_core::stats::{resets_per_segment, segment_stats, RunSummary};
use lss_core::{Run, TimeKind};

use crate::commands::common::load_run;
use crate::error::CliError;

pub fn render_run_stats(run: &Run, time_kind: TimeKind, as_json: bool) -> Result<String, CliError> {
    let table = project(
        run,
        &ProjectionOptions {
            time_kind,
            allow_partial: true,
            ..ProjectionOptions::default()
        },
    );
    let summary = RunSummary::from_run(run, time_kind);
    let segments = segment_stats(&table);
    let resets = resets_per_segment(&table);
    let report = StatsReport {
        summary: &summary,
        segments: &segments,
        resets: &resets,
    };

    if as_json {
        Ok(render_stats_json(&report)?)
    } else {
        Ok(render_stats_text(&report))
    }
}

pub fn run_stats(file: &Path, time_kind: TimeKind, as_json: bool) -> Result<(), CliError> {
    let run = load_run(file)?;
    println!("{}", render_run_stats(&run, time_kind, as_json)?.trim_end());
    Ok(())
}
