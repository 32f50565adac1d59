//! Fixture-driven checks for reading and writing whole splits files.

use std::fs;
use std::path::{Path, PathBuf};

use lss_core::codec::{bind, unbind};
use lss_core::models::{Run, TimeKind, Timed};
use lss_core::projection::{project, ProjectionOptions};
use lss_core::scalar::TimeSpan;
use lss_core::xml::{canonicalize, parse, serialize};
use lss_core::{read_run, write_run, Emit};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn valid_fixtures() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = fs::read_dir(fixture("valid"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|extension| extension == "lss"))
        .collect();
    paths.sort();
    assert!(!paths.is_empty());
    paths
}

fn read_fixture(name: &str) -> Run {
    read_run(&fs::read(fixture(name)).unwrap()).unwrap()
}

#[test]
fn every_valid_fixture_round_trips() {
    for path in valid_fixtures() {
        let bytes = fs::read(&path).unwrap();
        let run: Run = bind(&parse(&bytes).unwrap()).unwrap();
        assert_eq!(
            serialize(&unbind(&run, Emit::ExcludeUnset)).unwrap(),
            canonicalize(&bytes).unwrap(),
            "{}",
            path.display()
        );
    }
}

#[test]
fn pretty_output_reads_back_identically() {
    for path in valid_fixtures() {
        let bytes = fs::read(&path).unwrap();
        let run = read_run(&bytes).unwrap();
        let written = write_run(&run, Emit::ExcludeUnset).unwrap();
        assert_eq!(
            canonicalize(written.as_bytes()).unwrap(),
            canonicalize(&bytes).unwrap(),
            "{}",
            path.display()
        );
    }
}

#[test]
fn output_with_defaults_still_binds() {
    for path in valid_fixtures() {
        let run = read_run(&fs::read(&path).unwrap()).unwrap();
        let written = write_run(&run, Emit::ExcludeNone).unwrap();
        let reread = read_run(written.as_bytes()).unwrap();
        assert_eq!(reread.game_name(), run.game_name());
        assert_eq!(reread.segments().len(), run.segments().len());
        assert_eq!(reread.attempt_ids(), run.attempt_ids());
    }
}

#[test]
fn include_all_writes_every_declared_element() {
    let run = read_fixture("valid/legacy_inline.lss");
    let written = serialize(&unbind(&run, Emit::IncludeAll)).unwrap();

    for tag in ["<LayoutPath />", "<Metadata />", "<AttemptHistory />", "<AutoSplitterSettings />"] {
        assert!(written.contains(tag), "{tag}");
    }
    // attributes without a value are left out
    assert!(written.contains("<Run><GameIcon />"));
}

#[test]
fn reformatted_empty_times_still_bind() {
    let bytes = b"<Run>\n  <GameName>Celeste</GameName>\n  <CategoryName>Any%</CategoryName>\n  <Segments>\n    <Segment>\n      <Name>Prologue</Name>\n      <SplitTimes>\n        <SplitTime name=\"Personal Best\">\n        </SplitTime>\n      </SplitTimes>\n      <BestSegmentTime>\n      </BestSegmentTime>\n      <SegmentHistory>\n        <Time id=\"1\">\n        </Time>\n      </SegmentHistory>\n    </Segment>\n  </Segments>\n</Run>\n";
    let run = read_run(bytes).unwrap();

    let segment = &run.segments()[0];
    assert_eq!(segment.best_segment_time().real_time(), None);
    assert_eq!(segment.split_time("Personal Best").unwrap().real_time(), None);
    assert_eq!(segment.segment_history()[0].id(), "1");
    assert_eq!(segment.segment_history()[0].real_time(), None);
}

#[test]
fn modern_file_fields() {
    let run = read_fixture("valid/celeste_any.lss");

    assert_eq!(run.version(), Some("1.7.0"));
    assert_eq!(run.game_name(), "Celeste");
    assert_eq!(run.category_name(), "Any%");
    assert_eq!(run.attempt_count(), 5);
    assert_eq!(run.offset(), TimeSpan::ZERO);
    assert_eq!(run.metadata().unwrap().run_id(), Some(""));
    assert_eq!(run.metadata().unwrap().variable("Version"), Some("1.4.0.0"));

    let attempts = run.attempt_history();
    assert_eq!(attempts.len(), 5);
    assert_eq!(attempts[2].pause_time(), Some(TimeSpan::from_secs(10)));
    assert_eq!(attempts[1].real_time(), None);
    // recorded end before start; kept as written
    assert!(attempts[3].ended() < attempts[3].started());

    let names: Vec<&str> = run.segments().iter().map(|segment| segment.name()).collect();
    assert_eq!(names, vec!["Prologue", "Forsaken City", "Old Site"]);
    assert_eq!(
        run.auto_splitter_settings().unwrap().version(),
        Some("1.5")
    );
}

#[test]
fn modern_file_projection() {
    let run = read_fixture("valid/celeste_any.lss");

    let complete = project(&run, &ProjectionOptions::default());
    assert_eq!(complete.attempts(), ["1", "3"]);

    let cumulative = project(
        &run,
        &ProjectionOptions {
            cumulative: true,
            ..ProjectionOptions::default()
        },
    );
    let column = cumulative.column_of("3").unwrap();
    assert_eq!(
        cumulative.cell(2, column),
        run.attempt_history()[2].real_time()
    );

    let partial = project(
        &run,
        &ProjectionOptions {
            allow_partial: true,
            ..ProjectionOptions::default()
        },
    );
    assert_eq!(partial.attempts(), ["1", "2", "3"]);

    let everything = project(
        &run,
        &ProjectionOptions {
            allow_partial: true,
            allow_empty: true,
            ..ProjectionOptions::default()
        },
    );
    assert_eq!(everything.attempts(), ["1", "2", "3", "4", "5"]);
}

#[test]
fn legacy_inline_times() {
    let run = read_fixture("valid/legacy_inline.lss");

    assert_eq!(run.version(), None);
    assert_eq!(run.offset(), TimeSpan::from_millis(-1500));
    let first = &run.segments()[0];
    assert_eq!(
        first.best_segment_time().real_time(),
        Some(TimeSpan::from_secs(158))
    );
    assert_eq!(first.best_segment_time().game_time(), None);
    assert_eq!(
        first.split_time("Personal Best").unwrap().real_time(),
        Some(TimeSpan::from_secs(160))
    );

    let table = project(&run, &ProjectionOptions::default());
    assert_eq!(table.attempts(), ["1"]);
    assert_eq!(table.cell(1, 0), Some(TimeSpan::from_secs(440)));
}

#[test]
fn game_time_only_file_with_negative_ids() {
    let run = read_fixture("valid/portal_game_time.lss");

    assert_eq!(run.attempt_ids(), vec!["-1", "1", "2", "3"]);
    assert!(run.metadata().unwrap().variables().is_empty());

    let real = project(&run, &ProjectionOptions::default());
    assert!(real.attempts().is_empty());

    let game = project(
        &run,
        &ProjectionOptions {
            time_kind: TimeKind::GameTime,
            ..ProjectionOptions::default()
        },
    );
    assert_eq!(game.attempts(), ["-1", "1", "3"]);
}

#[test]
fn comparable_fixtures() {
    let celeste = read_fixture("valid/celeste_any.lss");
    let portal = read_fixture("valid/portal_game_time.lss");

    assert!(celeste.is_comparable(&celeste, true));
    assert!(!celeste.is_comparable(&portal, false));
}
