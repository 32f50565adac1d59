//! Text renderings of tables and statistics shared by every front end.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::projection::TextTable;
use crate::scalar::TimeSpan;
use crate::stats::{ResetCount, RunSummary, SegmentStats};

/// Table output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    #[default]
    Csv,
    Json,
}

impl TableFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Render a table as CSV.
///
/// The header row is `segment` followed by the attempt ids. Missing cells
/// are empty fields.
pub fn render_csv(table: &TextTable) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(
        std::iter::once("segment").chain(table.attempts.iter().map(String::as_str)),
    )?;
    for (segment, row) in table.segments.iter().zip(&table.cells) {
        writer.write_record(
            std::iter::once(segment.as_str())
                .chain(row.iter().map(|cell| cell.as_deref().unwrap_or_default())),
        )?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| csv::Error::from(error.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Render a table as pretty-printed JSON; missing cells are `null`.
pub fn render_json(table: &TextTable) -> Result<String> {
    Ok(serde_json::to_string_pretty(table)?)
}

/// Render a table in the selected format.
pub fn render_table(table: &TextTable, format: TableFormat) -> Result<String> {
    match format {
        TableFormat::Csv => render_csv(table),
        TableFormat::Json => render_json(table),
    }
}

/// Everything `stats` reports about a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsReport<'a> {
    pub summary: &'a RunSummary,
    pub segments: &'a [SegmentStats],
    pub resets: &'a [ResetCount],
}

/// Render run statistics as pretty-printed JSON.
pub fn render_stats_json(report: &StatsReport<'_>) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render run statistics as aligned plain text.
#[must_use]
pub fn render_stats_text(report: &StatsReport<'_>) -> String {
    let summary = report.summary;
    let shown = |time: Option<TimeSpan>| {
        time.map_or_else(|| "-".to_string(), |time| time.to_string())
    };

    let mut output = String::new();
    let _ = writeln!(output, "{} - {}", summary.game_name, summary.category_name);
    let _ = writeln!(output, "Attempts:          {}", summary.attempt_count);
    let _ = writeln!(output, "Completed:         {}", summary.completed_attempts);
    let _ = writeln!(output, "Best run:          {}", shown(summary.best_run));
    let _ = writeln!(output, "Sum of best:       {}", shown(summary.sum_of_best));
    let _ = writeln!(output, "Possible timesave: {}", shown(summary.possible_timesave));
    let _ = writeln!(output, "Total playtime:    {}", summary.total_playtime);

    let width = report
        .segments
        .iter()
        .map(|stats| stats.segment.chars().count())
        .max()
        .unwrap_or(0)
        .max("Segment".len());
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "{:<width$}  {:>5}  {:>16}  {:>16}  {:>16}  {:>6}",
        "Segment", "Count", "Best", "Mean", "Median", "Resets"
    );
    for (stats, resets) in report.segments.iter().zip(report.resets) {
        let _ = writeln!(
            output,
            "{:<width$}  {:>5}  {:>16}  {:>16}  {:>16}  {:>6}",
            stats.segment,
            stats.count,
            shown(stats.best),
            shown(stats.mean),
            shown(stats.median),
            resets.count
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeKind;
    use pretty_assertions::assert_eq;

    fn table() -> TextTable {
        TextTable {
            segments: vec!["Intro".to_string(), "Boss, Final".to_string()],
            attempts: vec!["1".to_string(), "2".to_string()],
            cells: vec![
                vec![Some("00:00:05".to_string()), Some("00:00:06".to_string())],
                vec![Some("00:01:00".to_string()), None],
            ],
        }
    }

    #[test]
    fn csv_quotes_and_leaves_gaps() {
        assert_eq!(
            render_csv(&table()).unwrap(),
            "segment,1,2\nIntro,00:00:05,00:00:06\n\"Boss, Final\",00:01:00,\n"
        );
    }

    #[test]
    fn csv_escapes_quotes() {
        let table = TextTable {
            segments: vec!["say \"hi\"".to_string()],
            attempts: vec!["1".to_string()],
            cells: vec![vec![None]],
        };
        assert_eq!(
            render_csv(&table).unwrap(),
            "segment,1\n\"say \"\"hi\"\"\",\n"
        );
    }

    #[test]
    fn render_table_dispatches_on_format() {
        let csv = render_table(&table(), TableFormat::Csv).unwrap();
        assert!(csv.starts_with("segment,1,2\n"));
        let json = render_table(&table(), TableFormat::Json).unwrap();
        assert!(json.trim_start().starts_with('{'));
    }

    #[test]
    fn json_uses_null_for_missing_cells() {
        let rendered = render_json(&table()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["attempts"], serde_json::json!(["1", "2"]));
        assert_eq!(value["cells"][1][1], serde_json::Value::Null);
        assert_eq!(value["cells"][1][0], "00:01:00");
    }

    #[test]
    fn table_format_extension() {
        assert_eq!(TableFormat::Csv.extension(), "csv");
        assert_eq!(TableFormat::Json.extension(), "json");
    }

    fn summary() -> RunSummary {
        RunSummary {
            game_name: "Game".to_string(),
            category_name: "Any%".to_string(),
            time_kind: TimeKind::RealTime,
            attempt_count: 3,
            completed_attempts: 1,
            best_run: Some(TimeSpan::from_secs(65)),
            best_run_id: Some("2".to_string()),
            sum_of_best: Some(TimeSpan::from_secs(60)),
            possible_timesave: Some(TimeSpan::from_secs(5)),
            total_playtime: TimeSpan::from_secs(200),
        }
    }

    #[test]
    fn stats_json_nests_sections() {
        let summary = summary();
        let segments = vec![SegmentStats {
            segment: "Intro".to_string(),
            count: 2,
            best: Some(TimeSpan::from_secs(5)),
            worst: Some(TimeSpan::from_secs(6)),
            mean: Some(TimeSpan::from_millis(5500)),
            median: Some(TimeSpan::from_millis(5500)),
            std_dev: None,
        }];
        let resets = vec![ResetCount {
            segment: "Intro".to_string(),
            count: 1,
        }];
        let report = StatsReport {
            summary: &summary,
            segments: &segments,
            resets: &resets,
        };

        let value: serde_json::Value =
            serde_json::from_str(&render_stats_json(&report).unwrap()).unwrap();
        assert_eq!(value["summary"]["best_run"], "00:01:05.0000000");
        assert_eq!(value["summary"]["time_kind"], "real_time");
        assert_eq!(value["segments"][0]["std_dev"], serde_json::Value::Null);
        assert_eq!(value["resets"][0]["count"], 1);

        let text = render_stats_text(&report);
        assert!(text.starts_with("Game - Any%\n"));
        assert!(text.contains("Sum of best:       00:01:00.0000000"));
        assert!(text.contains("Intro"));
    }
}
