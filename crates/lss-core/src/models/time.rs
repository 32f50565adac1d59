//! Real-time / game-time pairs and the records built on them

use serde::{Deserialize, Serialize};

use crate::scalar::TimeSpan;
use crate::schema::{FieldSpec, Location, Origins, Presence, Record};

/// Which timing method to read from a time record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeKind {
    #[default]
    RealTime,
    GameTime,
}

/// The pair of optional durations shared by every time record.
///
/// Real time and game time are independent: either, both or neither may be
/// present. `inline` holds the bare real time legacy files write as the
/// element's own text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Times {
    pub(crate) real_time: Option<TimeSpan>,
    pub(crate) game_time: Option<TimeSpan>,
    pub(crate) inline: Option<TimeSpan>,
}

/// Records that carry a [`Times`] pair.
pub trait Timed {
    fn times(&self) -> &Times;

    fn times_mut(&mut self) -> &mut Times;

    fn real_time(&self) -> Option<TimeSpan> {
        let times = self.times();
        times.real_time.or(times.inline)
    }

    fn game_time(&self) -> Option<TimeSpan> {
        self.times().game_time
    }

    fn time(&self, kind: TimeKind) -> Option<TimeSpan> {
        match kind {
            TimeKind::RealTime => self.real_time(),
            TimeKind::GameTime => self.game_time(),
        }
    }
}

pub(crate) const fn real_time_field<R: Timed>() -> FieldSpec<R> {
    FieldSpec::time(
        "real_time",
        Location::Element("RealTime"),
        |record| record.times().real_time,
        |record, value| record.times_mut().real_time = Some(value),
    )
}

pub(crate) const fn game_time_field<R: Timed>() -> FieldSpec<R> {
    FieldSpec::time(
        "game_time",
        Location::Element("GameTime"),
        |record| record.times().game_time,
        |record, value| record.times_mut().game_time = Some(value),
    )
}

pub(crate) const fn inline_time_field<R: Timed>() -> FieldSpec<R> {
    FieldSpec::time(
        "inline_real_time",
        Location::Text,
        |record| record.times().inline,
        |record, value| record.times_mut().inline = Some(value),
    )
}

/// A bare real-time/game-time pair (`BestSegmentTime`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseTime {
    times: Times,
    origins: Origins,
}

static BASE_TIME_FIELDS: [FieldSpec<BaseTime>; 3] = [
    real_time_field(),
    game_time_field(),
    inline_time_field(),
];

impl Record for BaseTime {
    const TAG: &'static str = "BestSegmentTime";

    fn fields() -> &'static [FieldSpec<Self>] {
        &BASE_TIME_FIELDS
    }

    fn origins(&self) -> &Origins {
        &self.origins
    }

    fn origins_mut(&mut self) -> &mut Origins {
        &mut self.origins
    }
}

impl Timed for BaseTime {
    fn times(&self) -> &Times {
        &self.times
    }

    fn times_mut(&mut self) -> &mut Times {
        &mut self.times
    }
}

impl BaseTime {
    /// An empty pair; emits as an empty element.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_real_time(mut self, value: TimeSpan) -> Self {
        self.times.real_time = Some(value);
        self.mark_explicit("real_time");
        self
    }

    #[must_use]
    pub fn with_game_time(mut self, value: TimeSpan) -> Self {
        self.times.game_time = Some(value);
        self.mark_explicit("game_time");
        self
    }
}

/// A named comparison time for a segment (e.g. `Personal Best`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitTime {
    name: String,
    times: Times,
    origins: Origins,
}

static SPLIT_TIME_FIELDS: [FieldSpec<SplitTime>; 4] = [
    FieldSpec::text(
        "name",
        Location::Attribute("name"),
        Presence::Required,
        |split| Some(split.name.clone()),
        |split, value| split.name = value,
    ),
    real_time_field(),
    game_time_field(),
    inline_time_field(),
];

impl Record for SplitTime {
    const TAG: &'static str = "SplitTime";

    fn fields() -> &'static [FieldSpec<Self>] {
        &SPLIT_TIME_FIELDS
    }

    fn origins(&self) -> &Origins {
        &self.origins
    }

    fn origins_mut(&mut self) -> &mut Origins {
        &mut self.origins
    }
}

impl Timed for SplitTime {
    fn times(&self) -> &Times {
        &self.times
    }

    fn times_mut(&mut self) -> &mut Times {
        &mut self.times
    }
}

impl SplitTime {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let mut split = Self {
            name: name.into(),
            ..Self::default()
        };
        split.mark_explicit("name");
        split
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn with_real_time(mut self, value: TimeSpan) -> Self {
        self.times.real_time = Some(value);
        self.mark_explicit("real_time");
        self
    }

    #[must_use]
    pub fn with_game_time(mut self, value: TimeSpan) -> Self {
        self.times.game_time = Some(value);
        self.mark_explicit("game_time");
        self
    }
}

/// One attempt's isolated duration for a segment (`SegmentHistory/Time`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Time {
    id: String,
    times: Times,
    origins: Origins,
}

static TIME_FIELDS: [FieldSpec<Time>; 4] = [
    FieldSpec::text(
        "id",
        Location::Attribute("id"),
        Presence::Required,
        |time| Some(time.id.clone()),
        |time, value| time.id = value,
    ),
    real_time_field(),
    game_time_field(),
    inline_time_field(),
];

impl Record for Time {
    const TAG: &'static str = "Time";

    fn fields() -> &'static [FieldSpec<Self>] {
        &TIME_FIELDS
    }

    fn origins(&self) -> &Origins {
        &self.origins
    }

    fn origins_mut(&mut self) -> &mut Origins {
        &mut self.origins
    }
}

impl Timed for Time {
    fn times(&self) -> &Times {
        &self.times
    }

    fn times_mut(&mut self) -> &mut Times {
        &mut self.times
    }
}

impl Time {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let mut time = Self {
            id: id.into(),
            ..Self::default()
        };
        time.mark_explicit("id");
        time
    }

    /// Attempt id this entry belongs to
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn with_real_time(mut self, value: TimeSpan) -> Self {
        self.times.real_time = Some(value);
        self.mark_explicit("real_time");
        self
    }

    #[must_use]
    pub fn with_game_time(mut self, value: TimeSpan) -> Self {
        self.times.game_time = Some(value);
        self.mark_explicit("game_time");
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{bind, unbind};
    use crate::schema::{Emit, Origin};
    use crate::xml::{parse, serialize};

    #[test]
    fn real_and_game_time_are_independent() {
        let root = parse(b"<Time id=\"3\"><GameTime>00:00:02.5000000</GameTime></Time>").unwrap();
        let time: Time = bind(&root).unwrap();

        assert_eq!(time.id(), "3");
        assert_eq!(time.real_time(), None);
        assert_eq!(time.game_time(), Some(TimeSpan::from_millis(2500)));
        assert_eq!(time.time(TimeKind::RealTime), None);
        assert_eq!(time.origin("real_time"), Origin::Absent);
        assert_eq!(time.origin("game_time"), Origin::Explicit);
    }

    #[test]
    fn legacy_inline_time_reads_as_real_time() {
        let root = parse(b"<Time id=\"1\">00:01:00.0000000</Time>").unwrap();
        let time: Time = bind(&root).unwrap();

        assert_eq!(time.real_time(), Some(TimeSpan::from_secs(60)));
        assert_eq!(
            serialize(&unbind(&time, Emit::ExcludeUnset)).unwrap(),
            serialize(&root).unwrap()
        );
    }

    #[test]
    fn whitespace_only_times_are_empty() {
        let best: BaseTime =
            bind(&parse(b"<BestSegmentTime>\n      </BestSegmentTime>").unwrap()).unwrap();
        assert_eq!(best.real_time(), None);
        assert_eq!(best.origin("inline_real_time"), Origin::Absent);

        let split: SplitTime =
            bind(&parse(b"<SplitTime name=\"Personal Best\">\n  </SplitTime>").unwrap()).unwrap();
        assert_eq!(split.name(), "Personal Best");
        assert_eq!(split.real_time(), None);

        let time: Time = bind(&parse(b"<Time id=\"7\">\t \n</Time>").unwrap()).unwrap();
        assert_eq!(time.id(), "7");
        assert_eq!(time.time(TimeKind::RealTime), None);
        assert_eq!(time.game_time(), None);
    }

    #[test]
    fn time_requires_id() {
        let root = parse(b"<Time><RealTime>00:00:01.0000000</RealTime></Time>").unwrap();
        let error = bind::<Time>(&root).unwrap_err();
        assert!(error.to_string().contains("attribute `id`"));
    }

    #[test]
    fn builder_marks_fields_explicit() {
        let split = SplitTime::new("Personal Best").with_real_time(TimeSpan::from_secs(61));
        let element = unbind(&split, Emit::ExcludeUnset);

        assert_eq!(
            serialize(&element).unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><SplitTime name=\"Personal Best\"><RealTime>00:01:01.0000000</RealTime></SplitTime>"
        );
    }
}
