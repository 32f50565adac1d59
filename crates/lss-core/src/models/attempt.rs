//! Attempt history entries

use chrono::NaiveDateTime;

use super::time::{game_time_field, real_time_field, Timed, Times};
use crate::scalar::TimeSpan;
use crate::schema::{FieldSpec, Location, Origins, Presence, Record};

/// One historical attempt at the run, complete or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attempt {
    id: String,
    started: Option<NaiveDateTime>,
    is_started_synced: Option<bool>,
    ended: Option<NaiveDateTime>,
    is_ended_synced: Option<bool>,
    times: Times,
    pause_time: Option<TimeSpan>,
    origins: Origins,
}

static ATTEMPT_FIELDS: [FieldSpec<Attempt>; 8] = [
    FieldSpec::text(
        "id",
        Location::Attribute("id"),
        Presence::Required,
        |attempt| Some(attempt.id.clone()),
        |attempt, value| attempt.id = value,
    ),
    FieldSpec::datetime(
        "started",
        Location::Attribute("started"),
        |attempt| attempt.started,
        |attempt, value| attempt.started = Some(value),
    ),
    FieldSpec::flag(
        "is_started_synced",
        Location::Attribute("isStartedSynced"),
        |attempt| attempt.is_started_synced,
        |attempt, value| attempt.is_started_synced = Some(value),
    ),
    FieldSpec::datetime(
        "ended",
        Location::Attribute("ended"),
        |attempt| attempt.ended,
        |attempt, value| attempt.ended = Some(value),
    ),
    FieldSpec::flag(
        "is_ended_synced",
        Location::Attribute("isEndedSynced"),
        |attempt| attempt.is_ended_synced,
        |attempt, value| attempt.is_ended_synced = Some(value),
    ),
    real_time_field(),
    game_time_field(),
    FieldSpec::time(
        "pause_time",
        Location::Element("PauseTime"),
        |attempt| attempt.pause_time,
        |attempt, value| attempt.pause_time = Some(value),
    ),
];

impl Record for Attempt {
    const TAG: &'static str = "Attempt";

    fn fields() -> &'static [FieldSpec<Self>] {
        &ATTEMPT_FIELDS
    }

    fn origins(&self) -> &Origins {
        &self.origins
    }

    fn origins_mut(&mut self) -> &mut Origins {
        &mut self.origins
    }
}

impl Timed for Attempt {
    fn times(&self) -> &Times {
        &self.times
    }

    fn times_mut(&mut self) -> &mut Times {
        &mut self.times
    }
}

impl Attempt {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let mut attempt = Self {
            id: id.into(),
            ..Self::default()
        };
        attempt.mark_explicit("id");
        attempt
    }

    /// Stable attempt identifier (numeric in practice)
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub const fn started(&self) -> Option<NaiveDateTime> {
        self.started
    }

    #[must_use]
    pub const fn is_started_synced(&self) -> Option<bool> {
        self.is_started_synced
    }

    /// End timestamp as recorded. Some writers record nonsensical values
    /// here; they are returned unchanged.
    #[must_use]
    pub const fn ended(&self) -> Option<NaiveDateTime> {
        self.ended
    }

    #[must_use]
    pub const fn is_ended_synced(&self) -> Option<bool> {
        self.is_ended_synced
    }

    #[must_use]
    pub const fn pause_time(&self) -> Option<TimeSpan> {
        self.pause_time
    }

    #[must_use]
    pub fn with_started(mut self, started: NaiveDateTime, synced: bool) -> Self {
        self.started = Some(started);
        self.is_started_synced = Some(synced);
        self.mark_explicit("started");
        self.mark_explicit("is_started_synced");
        self
    }

    #[must_use]
    pub fn with_ended(mut self, ended: NaiveDateTime, synced: bool) -> Self {
        self.ended = Some(ended);
        self.is_ended_synced = Some(synced);
        self.mark_explicit("ended");
        self.mark_explicit("is_ended_synced");
        self
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
