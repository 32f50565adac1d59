//! The run root record and its auto splitter payload

use std::collections::HashSet;

use super::attempt::Attempt;
use super::metadata::Metadata;
use super::segment::Segment;
use super::time::Time;
use crate::codec::unbind;
use crate::scalar::TimeSpan;
use crate::schema::{bind_all, unbind_all, FieldSpec, Location, Origins, Presence, Record};
use crate::xml::Node;

/// A complete splits file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    version: Option<String>,
    game_icon: Option<String>,
    game_name: String,
    category_name: String,
    layout_path: Option<String>,
    metadata: Option<Metadata>,
    offset: TimeSpan,
    attempt_count: u32,
    attempt_history: Option<Vec<Attempt>>,
    segments: Vec<Segment>,
    auto_splitter_settings: Option<AutoSplitterSettings>,
    origins: Origins,
}

static RUN_FIELDS: [FieldSpec<Run>; 11] = [
    FieldSpec::text(
        "version",
        Location::Attribute("version"),
        Presence::Optional,
        |run| run.version.clone(),
        |run, value| run.version = Some(value),
    ),
    FieldSpec::text(
        "game_icon",
        Location::Element("GameIcon"),
        Presence::Optional,
        |run| run.game_icon.clone(),
        |run, value| run.game_icon = Some(value),
    ),
    FieldSpec::text(
        "game_name",
        Location::Element("GameName"),
        Presence::Required,
        |run| Some(run.game_name.clone()),
        |run, value| run.game_name = value,
    ),
    FieldSpec::text(
        "category_name",
        Location::Element("CategoryName"),
        Presence::Required,
        |run| Some(run.category_name.clone()),
        |run, value| run.category_name = value,
    ),
    FieldSpec::text(
        "layout_path",
        Location::Element("LayoutPath"),
        Presence::Optional,
        |run| run.layout_path.clone(),
        |run, value| run.layout_path = Some(value),
    ),
    FieldSpec::record(
        "metadata",
        Location::Element("Metadata"),
        Presence::Optional,
        |run, nested| {
            run.metadata = Some(nested.bind()?);
            Ok(())
        },
        |run, emit| run.metadata.as_ref().map(|metadata| unbind(metadata, emit)),
    ),
    FieldSpec::offset(
        "offset",
        Location::Element("Offset"),
        |run| Some(run.offset),
        |run, value| run.offset = value,
    ),
    FieldSpec::count(
        "attempt_count",
        Location::Element("AttemptCount"),
        |run| Some(run.attempt_count),
        |run, value| run.attempt_count = value,
    ),
    FieldSpec::records(
        "attempt_history",
        Location::Wrapped {
            wrapper: "AttemptHistory",
            item: "Attempt",
        },
        Presence::Optional,
        |run, items| {
            run.attempt_history = Some(bind_all(items)?);
            Ok(())
        },
        |run, emit| {
            run.attempt_history
                .as_deref()
                .map(|attempts| unbind_all(attempts, emit))
        },
    ),
    FieldSpec::records(
        "segments",
        Location::Wrapped {
            wrapper: "Segments",
            item: "Segment",
        },
        Presence::Required,
        |run, items| {
            run.segments = bind_all(items)?;
            Ok(())
        },
        |run, emit| Some(unbind_all(&run.segments, emit)),
    ),
    FieldSpec::record(
        "auto_splitter_settings",
        Location::Element("AutoSplitterSettings"),
        Presence::Optional,
        |run, nested| {
            run.auto_splitter_settings = Some(nested.bind()?);
            Ok(())
        },
        |run, emit| {
            run.auto_splitter_settings
                .as_ref()
                .map(|settings| unbind(settings, emit))
        },
    ),
];

impl Record for Run {
    const TAG: &'static str = "Run";

    fn fields() -> &'static [FieldSpec<Self>] {
        &RUN_FIELDS
    }

    fn origins(&self) -> &Origins {
        &self.origins
    }

    fn origins_mut(&mut self) -> &mut Origins {
        &mut self.origins
    }

    fn validate(&self) -> Result<(), String> {
        if self.segments.is_empty() {
            return Err("<Segments> must contain at least one <Segment>".to_string());
        }
        Ok(())
    }
}

impl Run {
    /// Create a run from its identity and segments.
    ///
    /// Offset and attempt count keep their defaults and are not written
    /// unless set through a builder.
    #[must_use]
    pub fn new(
        game_name: impl Into<String>,
        category_name: impl Into<String>,
        segments: Vec<Segment>,
    ) -> Self {
        let mut run = Self {
            game_name: game_name.into(),
            category_name: category_name.into(),
            segments,
            ..Self::default()
        };
        run.mark_explicit("game_name");
        run.mark_explicit("category_name");
        run.mark_explicit("segments");
        run
    }

    /// Format version written by the timer (e.g. `1.7.0`)
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[must_use]
    pub fn game_icon(&self) -> Option<&str> {
        self.game_icon.as_deref()
    }

    #[must_use]
    pub fn game_name(&self) -> &str {
        &self.game_name
    }

    #[must_use]
    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    #[must_use]
    pub fn layout_path(&self) -> Option<&str> {
        self.layout_path.as_deref()
    }

    #[must_use]
    pub const fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// Timer start offset; zero when the file has none
    #[must_use]
    pub const fn offset(&self) -> TimeSpan {
        self.offset
    }

    /// Attempt counter as recorded by the timer
    #[must_use]
    pub const fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    /// Attempts in file order; empty when the history is missing
    #[must_use]
    pub fn attempt_history(&self) -> &[Attempt] {
        self.attempt_history.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub const fn auto_splitter_settings(&self) -> Option<&AutoSplitterSettings> {
        self.auto_splitter_settings.as_ref()
    }

    /// Every attempt id referenced by the run.
    ///
    /// The union of attempt history ids and segment history ids. When every
    /// id is a canonical integer the ids are sorted numerically; otherwise
    /// they keep first-seen order, attempt history first.
    #[must_use]
    pub fn attempt_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut ids: Vec<String> = Vec::new();
        let history = self.attempt_history().iter().map(Attempt::id);
        let segments = self
            .segments
            .iter()
            .flat_map(|segment| segment.segment_history().iter().map(Time::id));
        for id in history.chain(segments) {
            if seen.insert(id) {
                ids.push(id.to_string());
            }
        }

        let numeric: Option<Vec<i64>> = ids.iter().map(|id| canonical_integer(id)).collect();
        if let Some(keys) = numeric {
            let mut keyed: Vec<(i64, String)> = keys.into_iter().zip(ids).collect();
            keyed.sort_by_key(|(key, _)| *key);
            ids = keyed.into_iter().map(|(_, id)| id).collect();
        }
        ids
    }

    /// Whether two runs describe the same game, category and segment layout.
    ///
    /// Loose comparison checks game, category and segment count; strict
    /// comparison also requires identical segment names in order.
    #[must_use]
    pub fn is_comparable(&self, other: &Self, strict: bool) -> bool {
        let same_layout = self.game_name == other.game_name
            && self.category_name == other.category_name
            && self.segments.len() == other.segments.len();
        if !same_layout || !strict {
            return same_layout;
        }
        self.segments
            .iter()
            .zip(&other.segments)
            .all(|(left, right)| left.name() == right.name())
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self.mark_explicit("version");
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: TimeSpan) -> Self {
        self.offset = offset;
        self.mark_explicit("offset");
        self
    }

    #[must_use]
    pub fn with_attempt_count(mut self, count: u32) -> Self {
        self.attempt_count = count;
        self.mark_explicit("attempt_count");
        self
    }

    #[must_use]
    pub fn with_attempt(mut self, attempt: Attempt) -> Self {
        self.attempt_history.get_or_insert_with(Vec::new).push(attempt);
        self.mark_explicit("attempt_history");
        self
    }
}

fn canonical_integer(id: &str) -> Option<i64> {
    let value: i64 = id.parse().ok()?;
    (value.to_string() == id).then_some(value)
}

/// Auto splitter configuration. Only the version is modelled; every other
/// child is carried through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoSplitterSettings {
    version: Option<String>,
    payload: Option<Vec<Node>>,
    origins: Origins,
}

static AUTO_SPLITTER_FIELDS: [FieldSpec<AutoSplitterSettings>; 2] = [
    FieldSpec::text(
        "version",
        Location::Element("Version"),
        Presence::Optional,
        |settings| settings.version.clone(),
        |settings, value| settings.version = Some(value),
    ),
    FieldSpec::raw(
        "payload",
        Location::Remainder,
        |settings| settings.payload.clone(),
        |settings, nodes| settings.payload = Some(nodes),
    ),
];

impl Record for AutoSplitterSettings {
    const TAG: &'static str = "AutoSplitterSettings";

    fn fields() -> &'static [FieldSpec<Self>] {
        &AUTO_SPLITTER_FIELDS
    }

    fn origins(&self) -> &Origins {
        &self.origins
    }

    fn origins_mut(&mut self) -> &mut Origins {
        &mut self.origins
    }
}

impl AutoSplitterSettings {
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Unmodelled settings nodes in document order
    #[must_use]
    pub fn payload(&self) -> &[Node] {
        self.payload.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::bind;
    use crate::error::Error;
    use crate::models::Timed;
    use crate::schema::{Emit, Origin};
    use crate::xml::{parse, serialize, Element};
    use pretty_assertions::assert_eq;

    fn run_with(body: &str) -> Vec<u8> {
        format!(
            "<Run version=\"1.7.0\"><GameName>Celeste</GameName><CategoryName>Any%</CategoryName>{body}</Run>"
        )
        .into_bytes()
    }

    const ONE_SEGMENT: &str = "<Segments><Segment><Name>Prologue</Name><BestSegmentTime /></Segment></Segments>";

    #[test]
    fn binds_minimal_run_with_defaults() {
        let run: Run = bind(&parse(&run_with(ONE_SEGMENT)).unwrap()).unwrap();

        assert_eq!(run.version(), Some("1.7.0"));
        assert_eq!(run.game_name(), "Celeste");
        assert_eq!(run.category_name(), "Any%");
        assert_eq!(run.offset(), TimeSpan::ZERO);
        assert_eq!(run.attempt_count(), 0);
        assert_eq!(run.origin("offset"), Origin::Defaulted);
        assert_eq!(run.origin("attempt_count"), Origin::Defaulted);
        assert_eq!(run.origin("attempt_history"), Origin::Absent);
        assert!(run.attempt_history().is_empty());
        assert_eq!(run.segments().len(), 1);
    }

    #[test]
    fn defaults_are_only_written_when_asked() {
        let root = parse(&run_with(ONE_SEGMENT)).unwrap();
        let run: Run = bind(&root).unwrap();

        assert_eq!(
            serialize(&unbind(&run, Emit::ExcludeUnset)).unwrap(),
            serialize(&root).unwrap()
        );
        let with_defaults = serialize(&unbind(&run, Emit::ExcludeNone)).unwrap();
        assert!(with_defaults.contains("<Offset>00:00:00</Offset><AttemptCount>0</AttemptCount>"));
    }

    #[test]
    fn offset_keeps_its_sign_and_short_form() {
        let root = parse(&run_with(&format!(
            "<Offset>-00:00:01.5000000</Offset><AttemptCount>12</AttemptCount>{ONE_SEGMENT}"
        )))
        .unwrap();
        let run: Run = bind(&root).unwrap();

        assert_eq!(run.offset(), TimeSpan::from_millis(-1500));
        assert_eq!(run.attempt_count(), 12);
        assert_eq!(
            serialize(&unbind(&run, Emit::ExcludeUnset)).unwrap(),
            serialize(&root).unwrap()
        );
    }

    #[test]
    fn empty_segments_are_rejected() {
        let root = parse(&run_with("<Segments />")).unwrap();
        let error = bind::<Run>(&root).unwrap_err();
        match error {
            Error::Schema { path, message } => {
                assert_eq!(path, "Run");
                assert!(message.contains("at least one"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_category_is_rejected() {
        let root = parse(
            format!("<Run><GameName>Celeste</GameName>{ONE_SEGMENT}</Run>").as_bytes(),
        )
        .unwrap();
        let error = bind::<Run>(&root).unwrap_err();
        assert!(error.to_string().contains("<CategoryName>"));
    }

    #[test]
    fn wrong_root_is_rejected() {
        let root = parse(b"<Layout />").unwrap();
        assert!(matches!(bind::<Run>(&root), Err(Error::Schema { .. })));
    }

    #[test]
    fn segment_errors_carry_their_position() {
        let root = parse(&run_with(
            "<Segments><Segment><Name>A</Name><BestSegmentTime /></Segment><Segment><Name>B</Name><BestSegmentTime><RealTime>nope</RealTime></BestSegmentTime></Segment></Segments>",
        ))
        .unwrap();
        let error = bind::<Run>(&root).unwrap_err();
        match error {
            Error::Format { path, field, .. } => {
                assert_eq!(path, "Run/Segments/Segment[2]/BestSegmentTime");
                assert_eq!(field, "real_time");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_content_is_ignored() {
        let root = parse(&run_with(&format!(
            "<Unknown><Nested /></Unknown>{ONE_SEGMENT}"
        )))
        .unwrap();
        let run: Run = bind(&root).unwrap();
        let written = serialize(&unbind(&run, Emit::ExcludeUnset)).unwrap();
        assert!(!written.contains("Unknown"));
    }

    #[test]
    fn auto_splitter_payload_passes_through() {
        let root = parse(&run_with(&format!(
            "{ONE_SEGMENT}<AutoSplitterSettings><Version>1.5</Version><CustomSettings><Setting id=\"start\" type=\"bool\">True</Setting></CustomSettings><Reset>True</Reset></AutoSplitterSettings>"
        )))
        .unwrap();
        let run: Run = bind(&root).unwrap();

        let settings = run.auto_splitter_settings().unwrap();
        assert_eq!(settings.version(), Some("1.5"));
        let tags: Vec<&str> = settings
            .payload()
            .iter()
            .filter_map(|node| match node {
                Node::Element(Element { tag, .. }) => Some(tag.as_str()),
                Node::Text(_) => None,
            })
            .collect();
        assert_eq!(tags, vec!["CustomSettings", "Reset"]);
        assert_eq!(
            serialize(&unbind(&run, Emit::ExcludeUnset)).unwrap(),
            serialize(&root).unwrap()
        );
    }

    #[test]
    fn empty_auto_splitter_settings_round_trip() {
        let root = parse(&run_with(&format!(
            "{ONE_SEGMENT}<AutoSplitterSettings />"
        )))
        .unwrap();
        let run: Run = bind(&root).unwrap();

        assert!(run.auto_splitter_settings().unwrap().payload().is_empty());
        assert_eq!(
            serialize(&unbind(&run, Emit::ExcludeUnset)).unwrap(),
            serialize(&root).unwrap()
        );
    }

    fn run_with_ids(history: &[&str], segment_ids: &[&str]) -> Run {
        let mut segment = Segment::new("Only");
        for id in segment_ids {
            segment = segment.with_history_entry(Time::new(*id).with_real_time(TimeSpan::from_secs(1)));
        }
        history
            .iter()
            .fold(Run::new("Game", "Any%", vec![segment]), |run, id| {
                run.with_attempt(Attempt::new(*id))
            })
    }

    #[test]
    fn attempt_ids_are_a_numeric_union() {
        let run = run_with_ids(&["3", "1", "2"], &["4", "1", "-1"]);
        assert_eq!(run.attempt_ids(), vec!["-1", "1", "2", "3", "4"]);
    }

    #[test]
    fn non_canonical_ids_keep_first_seen_order() {
        let run = run_with_ids(&["10", "02"], &["1", "10"]);
        assert_eq!(run.attempt_ids(), vec!["10", "02", "1"]);

        let named = run_with_ids(&[], &["b", "a"]);
        assert_eq!(named.attempt_ids(), vec!["b", "a"]);
    }

    #[test]
    fn comparability_modes() {
        let base = Run::new("Game", "Any%", vec![Segment::new("A"), Segment::new("B")]);
        let renamed = Run::new("Game", "Any%", vec![Segment::new("A"), Segment::new("C")]);
        let shorter = Run::new("Game", "Any%", vec![Segment::new("A")]);
        let other_category = Run::new("Game", "100%", vec![Segment::new("A"), Segment::new("B")]);

        assert!(base.is_comparable(&base, true));
        assert!(base.is_comparable(&renamed, false));
        assert!(!base.is_comparable(&renamed, true));
        assert!(!base.is_comparable(&shorter, false));
        assert!(!base.is_comparable(&other_category, false));
    }

    #[test]
    fn built_run_serializes_in_schema_order() {
        let run = Run::new(
            "Game",
            "Any%",
            vec![Segment::new("A").with_best_segment_time(
                crate::models::BaseTime::new().with_real_time(TimeSpan::from_secs(5)),
            )],
        )
        .with_attempt_count(1)
        .with_version("1.7.0")
        .with_attempt(Attempt::new("1").with_real_time(TimeSpan::from_secs(5)));

        assert_eq!(
            serialize(&unbind(&run, Emit::ExcludeUnset)).unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Run version=\"1.7.0\"><GameName>Game</GameName><CategoryName>Any%</CategoryName><AttemptCount>1</AttemptCount><AttemptHistory><Attempt id=\"1\"><RealTime>00:00:05.0000000</RealTime></Attempt></AttemptHistory><Segments><Segment><Name>A</Name><BestSegmentTime><RealTime>00:00:05.0000000</RealTime></BestSegmentTime></Segment></Segments></Run>"
        );
        assert_eq!(
            run.segments()[0].best_segment_time().real_time(),
            Some(TimeSpan::from_secs(5))
        );
    }
}
