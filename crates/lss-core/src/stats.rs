//! Reductions over projected split tables.

use serde::Serialize;

use crate::models::{Run, TimeKind};
use crate::projection::{project, ProjectionOptions, SplitTable};
use crate::scalar::TimeSpan;

/// Distribution of one segment's recorded durations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentStats {
    pub segment: String,
    /// Number of attempts with a time for this segment.
    pub count: usize,
    pub best: Option<TimeSpan>,
    pub worst: Option<TimeSpan>,
    pub mean: Option<TimeSpan>,
    pub median: Option<TimeSpan>,
    /// Sample standard deviation; needs at least two times.
    pub std_dev: Option<TimeSpan>,
}

/// Per-segment statistics, one entry per table row.
#[must_use]
pub fn segment_stats(table: &SplitTable) -> Vec<SegmentStats> {
    table
        .segments()
        .iter()
        .enumerate()
        .map(|(row, name)| {
            let mut times: Vec<TimeSpan> = table.row(row).iter().flatten().copied().collect();
            times.sort_unstable();
            SegmentStats {
                segment: name.clone(),
                count: times.len(),
                best: times.first().copied(),
                worst: times.last().copied(),
                mean: mean(&times),
                median: median(&times),
                std_dev: std_dev(&times),
            }
        })
        .collect()
}

fn mean(times: &[TimeSpan]) -> Option<TimeSpan> {
    if times.is_empty() {
        return None;
    }
    let total: i128 = times.iter().map(|time| i128::from(time.as_nanos())).sum();
    let count = i128::try_from(times.len()).ok()?;
    i64::try_from(total / count).ok().map(TimeSpan::from_nanos)
}

/// Median of sorted times; the mean of the two middle values for even counts.
fn median(sorted: &[TimeSpan]) -> Option<TimeSpan> {
    let middle = sorted.len() / 2;
    match sorted.len() {
        0 => None,
        len if len % 2 == 1 => Some(sorted[middle]),
        _ => mean(&sorted[middle - 1..=middle]),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn std_dev(times: &[TimeSpan]) -> Option<TimeSpan> {
    if times.len() < 2 {
        return None;
    }
    let average = mean(times)?.as_nanos() as f64;
    let squares: f64 = times
        .iter()
        .map(|time| (time.as_nanos() as f64 - average).powi(2))
        .sum();
    let variance = squares / (times.len() - 1) as f64;
    Some(TimeSpan::from_nanos(variance.sqrt().round() as i64))
}

/// Headline numbers for a run, read from its partial-attempt table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub game_name: String,
    pub category_name: String,
    pub time_kind: TimeKind,
    /// Attempt counter recorded in the file.
    pub attempt_count: u32,
    /// Attempts with a time for every segment.
    pub completed_attempts: usize,
    /// Fastest complete attempt and its id.
    pub best_run: Option<TimeSpan>,
    pub best_run_id: Option<String>,
    /// Sum of every segment's fastest time; missing if any segment never
    /// got a time.
    pub sum_of_best: Option<TimeSpan>,
    /// `best_run - sum_of_best`
    pub possible_timesave: Option<TimeSpan>,
    /// Every recorded segment time added up.
    pub total_playtime: TimeSpan,
}

impl RunSummary {
    #[must_use]
    pub fn from_run(run: &Run, time_kind: TimeKind) -> Self {
        let table = project(
            run,
            &ProjectionOptions {
                time_kind,
                allow_partial: true,
                allow_empty: false,
                cumulative: false,
            },
        );

        let complete: Vec<(usize, TimeSpan)> = (0..table.attempts().len())
            .filter(|&column| table.is_complete(column))
            .map(|column| (column, table.column(column).flatten().sum()))
            .collect();
        // first minimum wins on ties, like file order
        let best = complete
            .iter()
            .copied()
            .reduce(|best, candidate| if candidate.1 < best.1 { candidate } else { best });

        let row_bests: Option<Vec<TimeSpan>> = (0..table.segments().len())
            .map(|row| table.row(row).iter().flatten().min().copied())
            .collect();
        let sum_of_best = row_bests.map(|bests| bests.into_iter().sum::<TimeSpan>());

        let total_playtime = (0..table.attempts().len())
            .flat_map(|column| table.column(column).flatten())
            .sum();

        Self {
            game_name: run.game_name().to_string(),
            category_name: run.category_name().to_string(),
            time_kind,
            attempt_count: run.attempt_count(),
            completed_attempts: complete.len(),
            best_run: best.map(|(_, time)| time),
            best_run_id: best.map(|(column, _)| table.attempts()[column].clone()),
            possible_timesave: best
                .zip(sum_of_best)
                .map(|((_, best_time), sum)| best_time - sum),
            sum_of_best,
            total_playtime,
        }
    }
}

/// Number of attempts that stopped at a segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetCount {
    pub segment: String,
    pub count: usize,
}

/// Count, per segment, the attempts whose first missing time is that segment.
///
/// Complete attempts are not counted. Every row is reported, in table order,
/// including segments nobody reset at.
#[must_use]
pub fn resets_per_segment(table: &SplitTable) -> Vec<ResetCount> {
    let mut counts = vec![0; table.segments().len()];
    for column in 0..table.attempts().len() {
        if let Some(row) = table.column(column).position(|cell| cell.is_none()) {
            counts[row] += 1;
        }
    }
    table
        .segments()
        .iter()
        .zip(counts)
        .map(|(segment, count)| ResetCount {
            segment: segment.clone(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attempt, Segment, Time};
    use pretty_assertions::assert_eq;

    fn secs(value: i64) -> TimeSpan {
        TimeSpan::from_secs(value)
    }

    fn segment(name: &str, history: &[(&str, i64)]) -> Segment {
        history.iter().fold(Segment::new(name), |segment, (id, real)| {
            segment.with_history_entry(Time::new(*id).with_real_time(secs(*real)))
        })
    }

    /// Attempt 1: 5+10+3 = 18, attempt 2: 6+9+4 = 19, attempt 3 resets in
    /// B, attempt 4 resets in C.
    fn sample_run() -> Run {
        let segments = vec![
            segment("A", &[("1", 5), ("2", 6), ("3", 7), ("4", 4)]),
            segment("B", &[("1", 10), ("2", 9), ("4", 12)]),
            segment("C", &[("1", 3), ("2", 4)]),
        ];
        ["1", "2", "3", "4"]
            .into_iter()
            .fold(Run::new("Game", "Any%", segments), |run, id| {
                run.with_attempt(Attempt::new(id))
            })
            .with_attempt_count(4)
    }

    fn partial_table(run: &Run) -> SplitTable {
        project(
            run,
            &ProjectionOptions {
                allow_partial: true,
                ..ProjectionOptions::default()
            },
        )
    }

    #[test]
    fn segment_stats_describe_each_row() {
        let stats = segment_stats(&partial_table(&sample_run()));

        assert_eq!(stats.len(), 3);
        let first = &stats[0];
        assert_eq!(first.segment, "A");
        assert_eq!(first.count, 4);
        assert_eq!(first.best, Some(secs(4)));
        assert_eq!(first.worst, Some(secs(7)));
        assert_eq!(first.mean, Some(TimeSpan::from_millis(5500)));
        assert_eq!(first.median, Some(TimeSpan::from_millis(5500)));
        // sample variance of 4,5,6,7 is 5/3
        assert_eq!(
            first.std_dev,
            Some(TimeSpan::from_nanos(1_290_994_449))
        );

        let third = &stats[2];
        assert_eq!(third.count, 2);
        assert_eq!(third.median, Some(TimeSpan::from_millis(3500)));
    }

    #[test]
    fn single_time_has_no_deviation() {
        let run = Run::new("Game", "Any%", vec![segment("Only", &[("1", 30)])]);
        let stats = segment_stats(&partial_table(&run));

        assert_eq!(stats[0].median, Some(secs(30)));
        assert_eq!(stats[0].std_dev, None);
    }

    #[test]
    fn empty_segment_has_no_stats() {
        let run = Run::new(
            "Game",
            "Any%",
            vec![segment("A", &[("1", 1)]), Segment::new("Never")],
        );
        let stats = segment_stats(&partial_table(&run));

        assert_eq!(stats[1].count, 0);
        assert_eq!(stats[1].best, None);
        assert_eq!(stats[1].mean, None);
    }

    #[test]
    fn run_summary_metrics() {
        let summary = RunSummary::from_run(&sample_run(), TimeKind::RealTime);

        assert_eq!(summary.attempt_count, 4);
        assert_eq!(summary.completed_attempts, 2);
        assert_eq!(summary.best_run, Some(secs(18)));
        assert_eq!(summary.best_run_id.as_deref(), Some("1"));
        // 4 + 9 + 3
        assert_eq!(summary.sum_of_best, Some(secs(16)));
        assert_eq!(summary.possible_timesave, Some(secs(2)));
        assert_eq!(summary.total_playtime, secs(18 + 19 + 7 + 16));
    }

    #[test]
    fn summary_without_complete_attempts() {
        let run = Run::new(
            "Game",
            "Any%",
            vec![segment("A", &[("1", 1)]), segment("B", &[("2", 2)])],
        );
        let summary = RunSummary::from_run(&run, TimeKind::RealTime);

        assert_eq!(summary.completed_attempts, 0);
        assert_eq!(summary.best_run, None);
        assert_eq!(summary.sum_of_best, Some(secs(3)));
        assert_eq!(summary.possible_timesave, None);
    }

    #[test]
    fn game_time_summary_ignores_real_times() {
        let summary = RunSummary::from_run(&sample_run(), TimeKind::GameTime);

        assert_eq!(summary.completed_attempts, 0);
        assert_eq!(summary.sum_of_best, None);
        assert_eq!(summary.total_playtime, TimeSpan::ZERO);
    }

    #[test]
    fn resets_are_counted_at_first_missing_segment() {
        let resets = resets_per_segment(&partial_table(&sample_run()));

        assert_eq!(
            resets,
            vec![
                ResetCount {
                    segment: "A".to_string(),
                    count: 0
                },
                ResetCount {
                    segment: "B".to_string(),
                    count: 1
                },
                ResetCount {
                    segment: "C".to_string(),
                    count: 1
                },
            ]
        );
    }
}
