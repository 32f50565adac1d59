//! Segment model

use super::time::{BaseTime, SplitTime, Time};
use crate::codec::unbind;
use crate::schema::{bind_all, unbind_all, FieldSpec, Location, Origins, Presence, Record};

/// One named split point of the run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segment {
    name: String,
    icon: Option<String>,
    split_times: Vec<SplitTime>,
    best_segment_time: BaseTime,
    segment_history: Option<Vec<Time>>,
    origins: Origins,
}

static SEGMENT_FIELDS: [FieldSpec<Segment>; 5] = [
    FieldSpec::text(
        "name",
        Location::Element("Name"),
        Presence::Required,
        |segment| Some(segment.name.clone()),
        |segment, value| segment.name = value,
    ),
    FieldSpec::text(
        "icon",
        Location::Element("Icon"),
        Presence::Optional,
        |segment| segment.icon.clone(),
        |segment, value| segment.icon = Some(value),
    ),
    FieldSpec::records(
        "split_times",
        Location::Wrapped {
            wrapper: "SplitTimes",
            item: "SplitTime",
        },
        Presence::Defaulted,
        |segment, items| {
            segment.split_times = bind_all(items)?;
            Ok(())
        },
        |segment, emit| Some(unbind_all(&segment.split_times, emit)),
    ),
    FieldSpec::record(
        "best_segment_time",
        Location::Element("BestSegmentTime"),
        Presence::Required,
        |segment, nested| {
            segment.best_segment_time = nested.bind()?;
            Ok(())
        },
        |segment, emit| Some(unbind(&segment.best_segment_time, emit)),
    ),
    FieldSpec::records(
        "segment_history",
        Location::Wrapped {
            wrapper: "SegmentHistory",
            item: "Time",
        },
        Presence::Optional,
        |segment, items| {
            segment.segment_history = Some(bind_all(items)?);
            Ok(())
        },
        |segment, emit| {
            segment
                .segment_history
                .as_deref()
                .map(|history| unbind_all(history, emit))
        },
    ),
];

impl Record for Segment {
    const TAG: &'static str = "Segment";

    fn fields() -> &'static [FieldSpec<Self>] {
        &SEGMENT_FIELDS
    }

    fn origins(&self) -> &Origins {
        &self.origins
    }

    fn origins_mut(&mut self) -> &mut Origins {
        &mut self.origins
    }
}

impl Segment {
    /// Create a segment with an empty best segment time
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let mut segment = Self {
            name: name.into(),
            ..Self::default()
        };
        segment.mark_explicit("name");
        segment.mark_explicit("best_segment_time");
        segment
    }

    /// Segment name, unique within a run in practice
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base64 icon blob, kept opaque
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Comparison times (cumulative time to reach this split)
    #[must_use]
    pub fn split_times(&self) -> &[SplitTime] {
        &self.split_times
    }

    /// Comparison time by name, e.g. `Personal Best`
    #[must_use]
    pub fn split_time(&self, name: &str) -> Option<&SplitTime> {
        self.split_times.iter().find(|split| split.name() == name)
    }

    #[must_use]
    pub const fn best_segment_time(&self) -> &BaseTime {
        &self.best_segment_time
    }

    /// Isolated per-attempt durations; empty when the history is missing
    #[must_use]
    pub fn segment_history(&self) -> &[Time] {
        self.segment_history.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self.mark_explicit("icon");
        self
    }

    #[must_use]
    pub fn with_split_time(mut self, split: SplitTime) -> Self {
        self.split_times.push(split);
        self.mark_explicit("split_times");
        self
    }

    #[must_use]
    pub fn with_best_segment_time(mut self, best: BaseTime) -> Self {
        self.best_segment_time = best;
        self.mark_explicit("best_segment_time");
        self
    }

    #[must_use]
    pub fn with_history_entry(mut self, entry: Time) -> Self {
        self.segment_history.get_or_insert_with(Vec::new).push(entry);
        self.mark_explicit("segment_history");
        self
    }
}
