//! Human-readable narration of race events
//!
//! Every event, parsed or derived, renders as `[HH:MM:SS.mmm] <message>`.

use crate::time::format_timestamp;
use crate::types::{Event, EventKind};
use std::fmt;

/// Render one event as a log line
pub fn narrate(event: &Event) -> String {
    event.to_string()
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = format_timestamp(self.time);
        let id = self.competitor_id;

        match self.kind {
            EventKind::Registered => write!(f, "[{}] The competitor({}) registered", time, id),
            EventKind::StartTimeDrawn => match self.first_param() {
                Some(start) => write!(
                    f,
                    "[{}] The start time for the competitor({}) was set by a draw to {}",
                    time, id, start
                ),
                None => write!(f, "[{}] Invalid start event", time),
            },
            EventKind::OnStartLine => write!(f, "[{}] The competitor({}) is on the start line", time, id),
            EventKind::Started => write!(f, "[{}] The competitor({}) has started", time, id),
            EventKind::OnFiringRange => match self.first_param() {
                Some(range) => write!(f, "[{}] The competitor({}) is on the firing range({})", time, id, range),
                None => write!(f, "[{}] Invalid firing range event", time),
            },
            EventKind::TargetHit => match self.first_param() {
                Some(target) => write!(f, "[{}] The target({}) has been hit by competitor({})", time, target, id),
                None => write!(f, "[{}] Invalid target event", time),
            },
            EventKind::LeftFiringRange => write!(f, "[{}] The competitor({}) left the firing range", time, id),
            EventKind::EnteredPenaltyLaps => {
                write!(f, "[{}] The competitor({}) entered the penalty laps", time, id)
            }
            EventKind::LeftPenaltyLaps => write!(f, "[{}] The competitor({}) left the penalty laps", time, id),
            EventKind::LapCompleted => write!(f, "[{}] The competitor({}) ended the main lap", time, id),
            EventKind::CannotContinue => write!(
                f,
                "[{}] The competitor({}) can`t continue: {}",
                time,
                id,
                self.joined_params()
            ),
            EventKind::Disqualified => write!(f, "[{}] The competitor({}) is disqualified", time, id),
            EventKind::Finished => write!(f, "[{}] The competitor({}) has finished", time, id),
            EventKind::Unknown(code) => {
                write!(f, "[{}] Unknown event({}) for competitor({})", time, code, id)
            }
        }
    }
}
