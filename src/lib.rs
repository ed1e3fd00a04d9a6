pub mod error;
pub mod fetch;
pub mod moon;
pub mod report;
pub mod schedule;
pub mod sheet;

use chrono::{DateTime, Utc};
use tracing::warn;

pub use error::{Error, Result};
pub use moon::{Moon, Pop};
pub use report::{NoPause, Pacer, Report, StdinPacer};
pub use schedule::{DayCursor, DayGroup};
pub use sheet::{parse_sheet, Sheet, Skipped};

/// How pops from all moons are merged into one sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Walk day by day from yesterday, ties ordered by system then location.
    Streaming,
    /// Unroll a fixed number of cycles inside a time window, ties kept in sheet order.
    Bounded { cycles: usize, window_days: i64 },
}

/// Day groups for `moons` under `strategy`. `days` limits how many calendar
/// days from yesterday are covered; without it the streaming walk runs for as
/// long as any moon keeps popping.
pub fn day_groups(
    moons: Vec<Moon>,
    now: DateTime<Utc>,
    strategy: Strategy,
    days: Option<usize>,
) -> Box<dyn Iterator<Item = DayGroup>> {
    if moons.is_empty() {
        warn!("no moon with a known pop time, nothing to report");
        return Box::new(std::iter::empty());
    }

    let groups: Box<dyn Iterator<Item = DayGroup>> = match strategy {
        Strategy::Streaming => Box::new(DayCursor::new(moons, now)),
        Strategy::Bounded {
            cycles,
            window_days,
        } => Box::new(schedule::bounded(&moons, now, cycles, window_days).into_iter()),
    };

    match days {
        Some(days) => {
            let first = schedule::first_day(now);
            let days = i64::try_from(days).unwrap_or(i64::MAX);
            Box::new(
                groups.take_while(move |g| g.day.signed_duration_since(first).num_days() < days),
            )
        }
        None => groups,
    }
}
