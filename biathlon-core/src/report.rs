//! Final standings report
//!
//! Competitors who finished normally are ranked by net race time (planned
//! start to finish). Everyone else sorts after them, by competitor ID.
//!
//! Each line reads
//! `[<status or net time>] <id> [<lap cells>] <penalty cell> <hits>/<shots>`.

use crate::competitor::{Competitor, CompetitorStatus, Lap, PenaltyStats};
use crate::config::RaceConfig;
use crate::time::{duration_secs, format_duration};
use crate::types::Duration;
use rayon::prelude::*;
use std::fmt;
use std::io::{self, Write};

/// Ranking time given to competitors without a net race time
pub const UNRANKED_HOURS: i64 = 9999;

const EMPTY_CELL: &str = "{,}";

/// Ordered report lines, best competitor first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Standings {
    lines: Vec<String>,
}

impl Standings {
    /// Rank competitors and render one line for each
    pub fn build<'a, I>(competitors: I, config: &RaceConfig) -> Self
    where
        I: IntoIterator<Item = &'a Competitor>,
    {
        let mut ranked: Vec<&Competitor> = competitors.into_iter().collect();
        ranked.sort_by_key(|c| (ranking_time(c), c.id));

        let lines = ranked
            .par_iter()
            .map(|c| report_line(c, config))
            .collect();

        Self { lines }
    }

    /// Report lines in ranking order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Write every line, newline-terminated, to `sink`
    pub fn write_to<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        for line in &self.lines {
            writeln!(sink, "{}", line)?;
        }
        sink.flush()
    }
}

impl fmt::Display for Standings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines.join("\n"))
    }
}

/// Sort key: net race time, or a sentinel past any real race
fn ranking_time(comp: &Competitor) -> Duration {
    comp.net_time()
        .unwrap_or_else(|| Duration::hours(UNRANKED_HOURS))
}

/// Render the report line for one competitor
pub fn report_line(comp: &Competitor, config: &RaceConfig) -> String {
    let laps: Vec<String> = comp.laps.iter().map(lap_cell).collect();

    format!(
        "{} {} [{}] {} {}/{}",
        status_cell(comp),
        comp.id,
        laps.join(", "),
        penalty_cell(&comp.penalty, config),
        comp.total_hits,
        comp.shots_taken
    )
}

fn status_cell(comp: &Competitor) -> String {
    if comp.status == CompetitorStatus::NotStarted || comp.start_actual.is_none() {
        return "[NotStarted]".to_string();
    }

    match comp.net_time() {
        Some(net) => format!("[{}]", format_duration(net)),
        // Still on course counts as not finished
        None => "[NotFinished]".to_string(),
    }
}

fn lap_cell(lap: &Lap) -> String {
    match (lap.duration, lap.average_speed) {
        (Some(duration), Some(speed)) if duration > Duration::zero() => {
            format!("{{{}, {:.3}}}", format_duration(duration), speed)
        }
        _ => EMPTY_CELL.to_string(),
    }
}

fn penalty_cell(penalty: &PenaltyStats, config: &RaceConfig) -> String {
    if penalty.total_duration <= Duration::zero() || penalty.miss_count == 0 {
        return EMPTY_CELL.to_string();
    }

    let meters = f64::from(penalty.miss_count) * f64::from(config.penalty_length);
    let speed = meters / duration_secs(penalty.total_duration);

    format!("{{{}, {:.3}}}", format_duration(penalty.total_duration), speed)
}
