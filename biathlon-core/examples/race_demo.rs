//! Standalone race demo
//!
//! Runs a short built-in race through the processor, printing the narrated
//! log followed by the standings.
//!
//! Usage:
//!   cargo run --example race_demo
//!   RUST_LOG=debug cargo run --example race_demo

use biathlon_core::time::parse_duration;
use biathlon_core::{RaceConfig, RaceProcessor};
use std::io::{self, Cursor};

const EVENTS: &str = "\
[09:05:59.867] 1 1
[09:15:00.841] 2 1 09:30:00.000
[09:15:01.000] 1 2
[09:15:02.000] 2 2 09:31:00.000
[09:29:45.734] 3 1
[09:30:01.005] 4 1
[09:32:15.000] 4 2
[09:49:31.659] 5 1 1
[09:49:33.123] 6 1 1
[09:49:34.650] 6 1 2
[09:49:35.937] 6 1 4
[09:49:37.364] 6 1 5
[09:49:38.339] 7 1
[09:49:55.915] 8 1
[09:51:48.391] 9 1
[09:59:03.872] 10 1
[10:29:00.000] 10 1
";

fn main() -> biathlon_core::Result<()> {
    env_logger::init();

    let config = RaceConfig::new()
        .with_laps(2)
        .with_lap_length(3651)
        .with_penalty_length(50)
        .with_start_delta(parse_duration("00:00:30")?);

    let mut processor = RaceProcessor::new(config);

    println!("=== NARRATION ===");
    let stats = processor.process_log(Cursor::new(EVENTS), &mut io::stdout())?;

    println!("\n=== STANDINGS ===");
    processor.standings().write_to(&mut io::stdout())?;

    println!("\n=== SUMMARY ===");
    println!("Lines read:      {}", stats.lines_read);
    println!("Events applied:  {}", stats.events_applied);
    println!("Derived events:  {}", stats.derived_events);
    println!("Competitors:     {}", stats.competitors);

    Ok(())
}
