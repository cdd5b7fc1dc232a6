//! Core types for the biathlon race processor
//!
//! This module defines the event record produced by the parser and consumed by
//! the competitor state machine, the closed set of event kinds, and the error
//! types shared by every stage of processing.

use chrono::NaiveTime;
use std::fmt;
use std::num::ParseIntError;

/// Race-clock time of day (millisecond precision, no date)
pub type Timestamp = NaiveTime;

/// Signed span between two race-clock values
pub type Duration = chrono::Duration;

/// Competitor identifier as it appears in the event log
pub type CompetitorId = i64;

/// Result type for race processing operations
pub type Result<T> = std::result::Result<T, RaceError>;

/// Errors from the race-clock codec
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    #[error("invalid time format: {0:?}")]
    InvalidTimeFormat(String),
}

/// Errors that reject a single event line
///
/// These are recoverable: the processor skips the offending line and moves on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventLineError {
    #[error("invalid event line: {0:?}")]
    InvalidEventLine(String),

    #[error("time parsing error: {0}")]
    TimeParsingError(#[source] TimeError),

    #[error("event ID parsing error: {0}")]
    EventIdParsingError(#[source] ParseIntError),

    #[error("competitor ID parsing error: {0}")]
    CompetitorIdParsingError(#[source] ParseIntError),
}

/// Errors that abort a race processing run
#[derive(Debug, thiserror::Error)]
pub enum RaceError {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Time(#[from] TimeError),

    #[error(transparent)]
    EventLine(#[from] EventLineError),

    #[error("competitor({competitor}) ended a lap at {time} with no open lap")]
    NoOpenLap {
        competitor: CompetitorId,
        time: Timestamp,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Event kinds, keyed by their numeric code in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// 1: competitor registered
    Registered,
    /// 2: start time assigned by draw, `params[0]` is the start time
    StartTimeDrawn,
    /// 3: competitor is on the start line
    OnStartLine,
    /// 4: competitor has started
    Started,
    /// 5: competitor is on the firing range, `params[0]` is the range
    OnFiringRange,
    /// 6: target hit, `params[0]` is the target
    TargetHit,
    /// 7: competitor left the firing range
    LeftFiringRange,
    /// 8: competitor entered the penalty laps
    EnteredPenaltyLaps,
    /// 9: competitor left the penalty laps
    LeftPenaltyLaps,
    /// 10: competitor ended a main lap
    LapCompleted,
    /// 11: competitor can't continue, params hold the reason
    CannotContinue,
    /// 32: derived, competitor is disqualified
    Disqualified,
    /// 33: derived, competitor has finished
    Finished,
    /// Any other code; passed through untouched
    Unknown(i64),
}

impl EventKind {
    /// Map a numeric code from the log to a kind
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => EventKind::Registered,
            2 => EventKind::StartTimeDrawn,
            3 => EventKind::OnStartLine,
            4 => EventKind::Started,
            5 => EventKind::OnFiringRange,
            6 => EventKind::TargetHit,
            7 => EventKind::LeftFiringRange,
            8 => EventKind::EnteredPenaltyLaps,
            9 => EventKind::LeftPenaltyLaps,
            10 => EventKind::LapCompleted,
            11 => EventKind::CannotContinue,
            32 => EventKind::Disqualified,
            33 => EventKind::Finished,
            other => EventKind::Unknown(other),
        }
    }

    /// Numeric code of this kind
    pub fn code(&self) -> i64 {
        match self {
            EventKind::Registered => 1,
            EventKind::StartTimeDrawn => 2,
            EventKind::OnStartLine => 3,
            EventKind::Started => 4,
            EventKind::OnFiringRange => 5,
            EventKind::TargetHit => 6,
            EventKind::LeftFiringRange => 7,
            EventKind::EnteredPenaltyLaps => 8,
            EventKind::LeftPenaltyLaps => 9,
            EventKind::LapCompleted => 10,
            EventKind::CannotContinue => 11,
            EventKind::Disqualified => 32,
            EventKind::Finished => 33,
            EventKind::Unknown(code) => *code,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One race event, either parsed from the log or derived by the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Race-clock time of the event
    pub time: Timestamp,
    /// What happened
    pub kind: EventKind,
    /// Which competitor it happened to
    pub competitor_id: CompetitorId,
    /// Extra tokens after the competitor ID, in order
    pub params: Vec<String>,
}

impl Event {
    /// Create an event without params
    pub fn new(time: Timestamp, kind: EventKind, competitor_id: CompetitorId) -> Self {
        Self {
            time,
            kind,
            competitor_id,
            params: Vec::new(),
        }
    }

    /// Builder method: attach params
    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    /// First param, if present
    pub fn first_param(&self) -> Option<&str> {
        self.params.first().map(String::as_str)
    }

    /// All params joined by single spaces
    pub fn joined_params(&self) -> String {
        self.params.join(" ")
    }
}
