//! Event log line parser
//!
//! Each line has the shape `[HH:MM:SS.mmm] <kind> <competitor> [params...]`.
//! Unknown kind codes are accepted here and passed through as
//! [`EventKind::Unknown`].

use crate::time::parse_timestamp;
use crate::types::{Event, EventKind, EventLineError};
use std::str::FromStr;

/// Parse one event line
pub fn parse_event(line: &str) -> Result<Event, EventLineError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(EventLineError::InvalidEventLine(line.to_string()));
    }

    let time = parse_timestamp(fields[0].trim_matches(|c: char| c == '[' || c == ']'))
        .map_err(EventLineError::TimeParsingError)?;

    let code: i64 = fields[1]
        .parse()
        .map_err(EventLineError::EventIdParsingError)?;

    let competitor_id = fields[2]
        .parse()
        .map_err(EventLineError::CompetitorIdParsingError)?;

    Ok(Event {
        time,
        kind: EventKind::from_code(code),
        competitor_id,
        params: fields[3..].iter().map(|s| s.to_string()).collect(),
    })
}

impl FromStr for Event {
    type Err = EventLineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_event(s)
    }
}
