//! Biathlon Race Processing Library
//!
//! Turns a flat log of timestamped race events into per-competitor race state,
//! a narrated event log, and final standings.
//!
//! # Architecture
//!
//! - [`time`]: race-clock codec (`HH:MM:SS.mmm`)
//! - [`parser`]: one log line → one [`Event`]
//! - [`competitor`]: per-event state machine over a [`Competitor`]
//! - [`narration`]: human-readable line for any event
//! - [`report`]: ranked [`Standings`]
//! - [`processor`]: [`RaceProcessor`], which ties the above together
//!
//! The library does NOT:
//! - Parse command-line flags
//! - Open or create files
//! - Initialise a logger
//!
//! Those live in the application layer (biathlon-cli).
//!
//! # Example Usage
//!
//! ```
//! use biathlon_core::{RaceConfig, RaceProcessor};
//! use std::io::Cursor;
//!
//! let log = "[09:05:59.867] 1 1\n[09:15:00.841] 2 1 09:30:00.000\n";
//!
//! let mut processor = RaceProcessor::new(RaceConfig::new());
//! let mut narration = Vec::new();
//! processor.process_log(Cursor::new(log), &mut narration).unwrap();
//!
//! for line in processor.standings().lines() {
//!     println!("{}", line);
//! }
//! ```

// Public modules
pub mod competitor;
pub mod config;
pub mod narration;
pub mod parser;
pub mod processor;
pub mod report;
pub mod time;
pub mod types;

// Re-export main types for convenience
pub use competitor::{Competitor, CompetitorStatus, Lap, PenaltyStats};
pub use config::{RaceConfig, RaceConfigFile};
pub use narration::narrate;
pub use parser::parse_event;
pub use processor::{ProcessingStats, RaceProcessor};
pub use report::Standings;
pub use types::{
    CompetitorId, Duration, Event, EventKind, EventLineError, RaceError, Result, TimeError,
    Timestamp,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
