//! Competitor race state and the per-event state machine
//!
//! [`Competitor::apply`] folds one event into a competitor's state and returns
//! the derived events (disqualification, finish) that must be narrated right
//! after the triggering event.

use crate::config::RaceConfig;
use crate::time::{duration_secs, parse_timestamp};
use crate::types::{CompetitorId, Duration, Event, EventKind, RaceError, Result, Timestamp};
use std::fmt;

/// Shots fired on every firing range visit
pub const SHOTS_PER_RANGE: u32 = 5;

/// Race outcome recorded on a competitor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompetitorStatus {
    /// Still racing, or finished normally
    #[default]
    Racing,
    /// Started too late (or never started)
    NotStarted,
    /// Left the course
    NotFinished,
}

impl fmt::Display for CompetitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompetitorStatus::Racing => write!(f, "Racing"),
            CompetitorStatus::NotStarted => write!(f, "NotStarted"),
            CompetitorStatus::NotFinished => write!(f, "NotFinished"),
        }
    }
}

/// One main lap
#[derive(Debug, Clone, PartialEq)]
pub struct Lap {
    /// When the lap began
    pub start: Timestamp,
    /// Lap time, set when the lap ends
    pub duration: Option<Duration>,
    /// Meters per second over the lap, set when the lap ends
    pub average_speed: Option<f64>,
}

impl Lap {
    /// An open lap starting at `start`
    pub fn open(start: Timestamp) -> Self {
        Self {
            start,
            duration: None,
            average_speed: None,
        }
    }

    /// True until the lap's end event arrives
    pub fn is_open(&self) -> bool {
        self.duration.is_none()
    }
}

/// Penalty loop bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct PenaltyStats {
    /// Entry time of the most recent penalty loop visit
    pub start: Option<Timestamp>,
    /// Total time spent in the penalty loop
    pub total_duration: Duration,
    /// Penalty laps owed, one per missed shot
    pub miss_count: u32,
}

impl Default for PenaltyStats {
    fn default() -> Self {
        Self {
            start: None,
            total_duration: Duration::zero(),
            miss_count: 0,
        }
    }
}

/// Everything known about one competitor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Competitor {
    pub id: CompetitorId,
    pub registered_at: Option<Timestamp>,
    pub start_planned: Option<Timestamp>,
    pub start_line_time: Option<Timestamp>,
    pub start_actual: Option<Timestamp>,
    pub finish_time: Option<Timestamp>,
    pub laps: Vec<Lap>,
    pub penalty: PenaltyStats,
    /// Hits since the competitor last left a firing range
    pub current_range_hits: u32,
    pub total_hits: u32,
    pub shots_taken: u32,
    pub status: CompetitorStatus,
    /// Reason given when the competitor couldn't continue
    pub comment: String,
}

impl Competitor {
    /// Create an empty record for `id`
    pub fn new(id: CompetitorId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Apply one event and return the derived events it triggers
    ///
    /// # Errors
    /// Returns [`RaceError::NoOpenLap`] when a lap ends before any start time
    /// was drawn for the competitor.
    pub fn apply(&mut self, event: &Event, config: &RaceConfig) -> Result<Vec<Event>> {
        log::trace!(
            "Applying event {} at {} to competitor({})",
            event.kind,
            event.time,
            self.id
        );

        let mut derived = Vec::new();

        match event.kind {
            EventKind::Registered => {
                self.registered_at = Some(event.time);
            }
            EventKind::StartTimeDrawn => {
                let drawn = event.first_param().map(parse_timestamp);
                let lap_start = match drawn {
                    Some(Ok(start)) => {
                        self.start_planned = Some(start);
                        start
                    }
                    _ => {
                        // The lap is still opened, anchored at the zero clock value
                        log::warn!(
                            "Ignoring malformed start time {:?} for competitor({})",
                            event.first_param(),
                            self.id
                        );
                        Timestamp::default()
                    }
                };
                self.laps.push(Lap::open(lap_start));
            }
            EventKind::OnStartLine => {
                self.start_line_time = Some(event.time);
            }
            EventKind::Started => {
                self.start_actual = Some(event.time);

                if let Some(planned) = self.start_planned {
                    if event.time.signed_duration_since(planned) > config.start_delta {
                        log::debug!("Competitor({}) started late at {}", self.id, event.time);
                        self.status = CompetitorStatus::NotStarted;
                        derived.push(Event::new(event.time, EventKind::Disqualified, self.id));
                    }
                }
            }
            EventKind::OnFiringRange => {
                self.shots_taken += SHOTS_PER_RANGE;
            }
            EventKind::TargetHit => {
                self.current_range_hits += 1;
            }
            EventKind::LeftFiringRange => {
                self.total_hits += self.current_range_hits;
                self.penalty.miss_count += SHOTS_PER_RANGE.saturating_sub(self.current_range_hits);
                self.current_range_hits = 0;
            }
            EventKind::EnteredPenaltyLaps => {
                self.penalty.start = Some(event.time);
            }
            EventKind::LeftPenaltyLaps => {
                if let Some(entered) = self.penalty.start {
                    self.penalty.total_duration = self.penalty.total_duration + (event.time - entered);
                }
            }
            EventKind::LapCompleted => {
                let lap = self.laps.last_mut().ok_or(RaceError::NoOpenLap {
                    competitor: self.id,
                    time: event.time,
                })?;

                let duration = event.time - lap.start;
                lap.duration = Some(duration);
                lap.average_speed = Some(f64::from(config.lap_length) / duration_secs(duration));

                if self.laps.len() < config.laps as usize {
                    self.laps.push(Lap::open(event.time));
                } else {
                    self.finish_time = Some(event.time);
                    derived.push(Event::new(event.time, EventKind::Finished, self.id));
                }
            }
            EventKind::CannotContinue => {
                self.status = CompetitorStatus::NotFinished;
                self.comment = event.joined_params();
                self.finish_time = Some(event.time);
                // Narrated with the disqualification code, there is no separate one
                derived.push(Event::new(event.time, EventKind::Disqualified, self.id));
            }
            EventKind::Disqualified | EventKind::Finished => {}
            EventKind::Unknown(code) => {
                log::debug!("No transition for event {} on competitor({})", code, self.id);
            }
        }

        Ok(derived)
    }

    /// Planned start to finish, for competitors who finished normally
    pub fn net_time(&self) -> Option<Duration> {
        if self.status != CompetitorStatus::Racing {
            return None;
        }
        match (self.start_planned, self.finish_time) {
            (Some(planned), Some(finish)) => Some(finish - planned),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Timestamp {
        parse_timestamp(s).unwrap()
    }

    fn ev(time: &str, kind: EventKind) -> Event {
        Event::new(t(time), kind, 1)
    }

    #[test]
    fn test_register_and_draw() {
        let config = RaceConfig::new().with_laps(2).with_lap_length(3000);
        let mut comp = Competitor::new(1);

        let out = comp.apply(&ev("10:00:00.000", EventKind::Registered), &config).unwrap();
        assert!(out.is_empty());
        assert_eq!(comp.registered_at, Some(t("10:00:00.000")));

        let draw = ev("10:00:30.000", EventKind::StartTimeDrawn).with_params(["10:01:00.000"]);
        let out = comp.apply(&draw, &config).unwrap();
        assert!(out.is_empty());
        assert_eq!(comp.start_planned, Some(t("10:01:00.000")));
        assert_eq!(comp.laps, vec![Lap::open(t("10:01:00.000"))]);
    }

    #[test]
    fn test_malformed_draw_still_opens_lap() {
        let config = RaceConfig::new();
        let mut comp = Competitor::new(1);

        let draw = ev("10:00:30.000", EventKind::StartTimeDrawn).with_params(["soon"]);
        comp.apply(&draw, &config).unwrap();
        assert_eq!(comp.start_planned, None);
        assert_eq!(comp.laps.len(), 1);
        assert_eq!(comp.laps[0].start, Timestamp::default());

        // No params at all behaves the same way
        comp.apply(&ev("10:00:31.000", EventKind::StartTimeDrawn), &config).unwrap();
        assert_eq!(comp.laps.len(), 2);
    }

    #[test]
    fn test_repeated_draw_appends_lap() {
        let config = RaceConfig::new();
        let mut comp = Competitor::new(1);

        for _ in 0..2 {
            let draw = ev("10:00:30.000", EventKind::StartTimeDrawn).with_params(["10:01:00.000"]);
            comp.apply(&draw, &config).unwrap();
        }
        assert_eq!(comp.laps.len(), 2);
    }

    #[test]
    fn test_start_within_delta() {
        let config = RaceConfig::new().with_start_delta(Duration::seconds(90));
        let mut comp = Competitor::new(1);
        comp.start_planned = Some(t("10:01:00.000"));

        // Exactly on the limit is still a valid start
        let out = comp.apply(&ev("10:02:30.000", EventKind::Started), &config).unwrap();
        assert!(out.is_empty());
        assert_eq!(comp.status, CompetitorStatus::Racing);
        assert_eq!(comp.start_actual, Some(t("10:02:30.000")));
    }

    #[test]
    fn test_late_start_disqualifies() {
        let config = RaceConfig::new().with_start_delta(Duration::seconds(90));
        let mut comp = Competitor::new(1);
        comp.start_planned = Some(t("10:01:00.000"));

        let out = comp.apply(&ev("10:02:30.001", EventKind::Started), &config).unwrap();
        assert_eq!(out, vec![Event::new(t("10:02:30.001"), EventKind::Disqualified, 1)]);
        assert_eq!(comp.status, CompetitorStatus::NotStarted);
    }

    #[test]
    fn test_start_without_draw() {
        let config = RaceConfig::new();
        let mut comp = Competitor::new(1);

        let out = comp.apply(&ev("11:00:00.000", EventKind::Started), &config).unwrap();
        assert!(out.is_empty());
        assert_eq!(comp.status, CompetitorStatus::Racing);
    }

    #[test]
    fn test_firing_range() {
        let config = RaceConfig::new();
        let mut comp = Competitor::new(1);

        let range = ev("10:10:00.000", EventKind::OnFiringRange).with_params(["1"]);
        comp.apply(&range, &config).unwrap();
        for target in ["1", "2", "4"] {
            let hit = ev("10:10:01.000", EventKind::TargetHit).with_params([target]);
            comp.apply(&hit, &config).unwrap();
        }
        assert_eq!(comp.shots_taken, 5);
        assert_eq!(comp.current_range_hits, 3);

        let out = comp.apply(&ev("10:10:10.000", EventKind::LeftFiringRange), &config).unwrap();
        assert!(out.is_empty());
        assert_eq!(comp.total_hits, 3);
        assert_eq!(comp.penalty.miss_count, 2);
        assert_eq!(comp.current_range_hits, 0);
    }

    #[test]
    fn test_left_range_with_preset_hits() {
        let config = RaceConfig::new();
        let mut comp = Competitor::new(1);
        comp.current_range_hits = 3;

        let out = comp.apply(&ev("10:10:10.000", EventKind::LeftFiringRange), &config).unwrap();
        assert!(out.is_empty());
        assert_eq!(comp.penalty.miss_count, 2);
        assert_eq!(comp.total_hits, 3);
        assert_eq!(comp.current_range_hits, 0);
    }

    #[test]
    fn test_penalty_loop_time() {
        let config = RaceConfig::new();
        let mut comp = Competitor::new(1);

        // Leaving without entering adds nothing
        comp.apply(&ev("10:11:00.000", EventKind::LeftPenaltyLaps), &config).unwrap();
        assert_eq!(comp.penalty.total_duration, Duration::zero());

        comp.apply(&ev("10:12:00.000", EventKind::EnteredPenaltyLaps), &config).unwrap();
        comp.apply(&ev("10:12:45.500", EventKind::LeftPenaltyLaps), &config).unwrap();
        comp.apply(&ev("10:30:00.000", EventKind::EnteredPenaltyLaps), &config).unwrap();
        comp.apply(&ev("10:30:20.000", EventKind::LeftPenaltyLaps), &config).unwrap();

        assert_eq!(comp.penalty.total_duration, Duration::milliseconds(65_500));
    }

    #[test]
    fn test_single_lap_finish() {
        let config = RaceConfig::new().with_laps(1).with_lap_length(3000);
        let mut comp = Competitor::new(1);
        comp.laps.push(Lap::open(t("10:00:00.000")));

        let out = comp.apply(&ev("10:02:00.000", EventKind::LapCompleted), &config).unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, EventKind::Finished);
        assert_eq!(comp.finish_time, Some(t("10:02:00.000")));
        assert_eq!(comp.laps[0].duration, Some(Duration::minutes(2)));
        assert_eq!(comp.laps[0].average_speed, Some(25.0));
    }

    #[test]
    fn test_lap_opens_next_lap() {
        let config = RaceConfig::new().with_laps(2).with_lap_length(3500);
        let mut comp = Competitor::new(1);
        comp.laps.push(Lap::open(t("10:01:00.000")));

        let out = comp.apply(&ev("10:31:00.000", EventKind::LapCompleted), &config).unwrap();
        assert!(out.is_empty());
        assert_eq!(comp.laps.len(), 2);
        assert_eq!(comp.laps[1], Lap::open(t("10:31:00.000")));
        assert!(!comp.laps[0].is_open());
        assert_eq!(comp.finish_time, None);
    }

    #[test]
    fn test_lap_without_draw_is_fault() {
        let config = RaceConfig::new();
        let mut comp = Competitor::new(7);

        let err = comp
            .apply(&Event::new(t("10:31:00.000"), EventKind::LapCompleted, 7), &config)
            .unwrap_err();
        assert!(matches!(err, RaceError::NoOpenLap { competitor: 7, .. }));
    }

    #[test]
    fn test_cannot_continue() {
        let config = RaceConfig::new();
        let mut comp = Competitor::new(1);

        let event = ev("10:40:00.000", EventKind::CannotContinue).with_params(["Lost", "in", "the", "forest"]);
        let out = comp.apply(&event, &config).unwrap();

        assert_eq!(out, vec![Event::new(t("10:40:00.000"), EventKind::Disqualified, 1)]);
        assert_eq!(comp.status, CompetitorStatus::NotFinished);
        assert_eq!(comp.comment, "Lost in the forest");
        assert_eq!(comp.finish_time, Some(t("10:40:00.000")));
        assert_eq!(comp.net_time(), None);
    }

    #[test]
    fn test_last_status_wins() {
        let config = RaceConfig::new();
        let mut comp = Competitor::new(1);
        comp.start_planned = Some(t("10:00:00.000"));

        let out = comp.apply(&ev("10:05:00.000", EventKind::Started), &config).unwrap();
        assert_eq!(out.len(), 1);
        let out = comp.apply(&ev("10:06:00.000", EventKind::CannotContinue), &config).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(comp.status, CompetitorStatus::NotFinished);
        assert_eq!(comp.comment, "");
    }

    #[test]
    fn test_marker_and_unknown_events_are_inert() {
        let config = RaceConfig::new();
        let mut comp = Competitor::new(1);
        let before = comp.clone();

        for kind in [EventKind::Disqualified, EventKind::Finished, EventKind::Unknown(42)] {
            let out = comp.apply(&ev("10:00:00.000", kind), &config).unwrap();
            assert!(out.is_empty());
        }
        assert_eq!(comp, before);
    }

    #[test]
    fn test_net_time() {
        let mut comp = Competitor::new(1);
        assert_eq!(comp.net_time(), None);

        comp.start_planned = Some(t("10:01:00.000"));
        comp.finish_time = Some(t("11:01:00.000"));
        assert_eq!(comp.net_time(), Some(Duration::hours(1)));

        comp.status = CompetitorStatus::NotStarted;
        assert_eq!(comp.net_time(), None);
    }
}
