//! Segment × attempt tables built from a run's segment history.

use serde::{Deserialize, Serialize};

use crate::models::{Run, TimeKind, Timed};
use crate::scalar::{encode_time, TimeSpan};

/// How [`project`] shapes its table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionOptions {
    /// Timing method read from each history entry.
    pub time_kind: TimeKind,
    /// Keep attempts that are missing a time for some segment.
    pub allow_partial: bool,
    /// Keep attempts that have no time for any segment.
    pub allow_empty: bool,
    /// Replace segment durations with running totals per attempt.
    pub cumulative: bool,
}

/// Durations indexed by segment (rows, in run order) and attempt id
/// (columns). Missing cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SplitTable {
    segments: Vec<String>,
    attempts: Vec<String>,
    cells: Vec<Vec<Option<TimeSpan>>>,
}

impl SplitTable {
    /// Row labels; rows are addressed by position, so repeated names are fine.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Column labels (attempt ids).
    #[must_use]
    pub fn attempts(&self) -> &[String] {
        &self.attempts
    }

    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<TimeSpan> {
        self.cells.get(row)?.get(column).copied().flatten()
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &[Option<TimeSpan>] {
        self.cells.get(row).map_or(&[], Vec::as_slice)
    }

    /// Cells of one attempt, top to bottom.
    pub fn column(&self, column: usize) -> impl Iterator<Item = Option<TimeSpan>> + '_ {
        self.cells.iter().map(move |row| row[column])
    }

    /// Position of an attempt id among the columns.
    #[must_use]
    pub fn column_of(&self, attempt_id: &str) -> Option<usize> {
        self.attempts.iter().position(|id| id == attempt_id)
    }

    #[must_use]
    pub fn is_complete(&self, column: usize) -> bool {
        self.column(column).all(|cell| cell.is_some())
    }

    /// Format every present cell as duration text.
    #[must_use]
    pub fn to_text(&self, include_fraction: bool) -> TextTable {
        TextTable {
            segments: self.segments.clone(),
            attempts: self.attempts.clone(),
            cells: self
                .cells
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| cell.map(|span| encode_time(span, include_fraction)))
                        .collect()
                })
                .collect(),
        }
    }

    fn retain_columns(&mut self, keep: impl Fn(&Self, usize) -> bool) {
        let kept: Vec<usize> = (0..self.attempts.len())
            .filter(|&column| keep(self, column))
            .collect();
        if kept.len() == self.attempts.len() {
            return;
        }
        self.attempts = kept.iter().map(|&column| self.attempts[column].clone()).collect();
        for row in &mut self.cells {
            *row = kept.iter().map(|&column| row[column]).collect();
        }
    }

    fn accumulate(&mut self) {
        for column in 0..self.attempts.len() {
            let mut total = Some(TimeSpan::ZERO);
            for row in &mut self.cells {
                total = total.zip(row[column]).map(|(sum, value)| sum + value);
                row[column] = total;
            }
        }
    }
}

/// A [`SplitTable`] with its durations rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextTable {
    pub segments: Vec<String>,
    pub attempts: Vec<String>,
    pub cells: Vec<Vec<Option<String>>>,
}

/// Build the segment × attempt table of a run.
///
/// Columns are [`Run::attempt_ids`]; each segment history entry fills its
/// own cell. Filtering happens before accumulation, so a cumulative column
/// stops at its first missing segment and stays missing below it.
#[must_use]
pub fn project(run: &Run, options: &ProjectionOptions) -> SplitTable {
    let attempts = run.attempt_ids();
    let mut cells = vec![vec![None; attempts.len()]; run.segments().len()];

    for (row, segment) in run.segments().iter().enumerate() {
        for entry in segment.segment_history() {
            let Some(column) = attempts.iter().position(|id| id == entry.id()) else {
                continue;
            };
            cells[row][column] = entry.time(options.time_kind);
        }
    }

    let mut table = SplitTable {
        segments: run
            .segments()
            .iter()
            .map(|segment| segment.name().to_string())
            .collect(),
        attempts,
        cells,
    };

    if !options.allow_partial {
        table.retain_columns(SplitTable::is_complete);
    }
    if !options.allow_empty {
        table.retain_columns(|table, column| table.column(column).any(|cell| cell.is_some()));
    }
    if options.cumulative {
        table.accumulate();
    }

    tracing::debug!(
        "Projected {} segments x {} attempts ({:?})",
        table.segments.len(),
        table.attempts.len(),
        options.time_kind
    );
    table
}
