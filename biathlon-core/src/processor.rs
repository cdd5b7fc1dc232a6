//! Race processor API
//!
//! [`RaceProcessor`] owns the competitor table and drives every log line
//! through the parse → narrate → apply → narrate-derived cycle.

use crate::competitor::Competitor;
use crate::config::RaceConfig;
use crate::narration::narrate;
use crate::parser::parse_event;
use crate::report::Standings;
use crate::types::{CompetitorId, Event, Result};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// Counters collected while processing an event log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingStats {
    /// Lines read from the log, including skipped ones
    pub lines_read: usize,
    /// Events applied to a competitor
    pub events_applied: usize,
    /// Malformed lines that were skipped
    pub lines_skipped: usize,
    /// Disqualification and finish events produced by the state machine
    pub derived_events: usize,
    /// Distinct competitors seen
    pub competitors: usize,
}

/// The main processor - entry point for a race run
pub struct RaceProcessor {
    config: RaceConfig,
    competitors: BTreeMap<CompetitorId, Competitor>,
    stats: ProcessingStats,
}

impl RaceProcessor {
    /// Create a processor with an empty competitor table
    pub fn new(config: RaceConfig) -> Self {
        Self {
            config,
            competitors: BTreeMap::new(),
            stats: ProcessingStats::default(),
        }
    }

    /// Apply one event, creating its competitor on first reference
    ///
    /// Returns the derived events in the order they must be narrated.
    pub fn handle_event(&mut self, event: &Event) -> Result<Vec<Event>> {
        let competitor = self
            .competitors
            .entry(event.competitor_id)
            .or_insert_with(|| {
                log::debug!("New competitor({})", event.competitor_id);
                Competitor::new(event.competitor_id)
            });

        let derived = competitor.apply(event, &self.config)?;

        self.stats.events_applied += 1;
        self.stats.derived_events += derived.len();
        self.stats.competitors = self.competitors.len();

        Ok(derived)
    }

    /// Process an event log, writing narration lines to `narration`
    ///
    /// Malformed lines are logged and skipped; bytes that are not valid UTF-8
    /// are replaced rather than rejected. A lap ending with no open lap, or a
    /// failure reading the log or writing narration, aborts the run.
    pub fn process_log<R, W>(&mut self, mut reader: R, narration: &mut W) -> Result<ProcessingStats>
    where
        R: BufRead,
        W: Write,
    {
        let mut buf = Vec::new();
        let mut line_no = 0usize;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;
            self.stats.lines_read += 1;

            let line = String::from_utf8_lossy(&buf);
            if line.trim().is_empty() {
                log::trace!("Skipping blank line {}", line_no);
                continue;
            }

            let event = match parse_event(&line) {
                Ok(event) => event,
                Err(e) => {
                    log::warn!("Skipping line {}: {}", line_no, e);
                    self.stats.lines_skipped += 1;
                    continue;
                }
            };

            writeln!(narration, "{}", narrate(&event))?;

            for derived in self.handle_event(&event)? {
                writeln!(narration, "{}", narrate(&derived))?;
            }
        }

        narration.flush()?;

        log::info!(
            "Processed {} lines: {} events applied, {} skipped, {} derived, {} competitors",
            self.stats.lines_read,
            self.stats.events_applied,
            self.stats.lines_skipped,
            self.stats.derived_events,
            self.stats.competitors
        );

        Ok(self.stats)
    }

    /// Build the final standings from the current competitor table
    pub fn standings(&self) -> Standings {
        Standings::build(self.competitors.values(), &self.config)
    }

    /// Competitor records keyed by ID
    pub fn competitors(&self) -> &BTreeMap<CompetitorId, Competitor> {
        &self.competitors
    }

    /// Look up one competitor
    pub fn competitor(&self, id: CompetitorId) -> Option<&Competitor> {
        self.competitors.get(&id)
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    /// Statistics gathered so far
    pub fn stats(&self) -> ProcessingStats {
        self.stats
    }
}
