//! Merging many moon cycles into one day-by-day sequence of pops.
//!
//! Two strategies are kept, and they break ties differently:
//!
//! * [`DayCursor`] walks forward one day at a time while any moon still pops,
//!   ordering each day by time, then system name, then location name.
//! * [`bounded`] unrolls a fixed number of cycles per moon, keeps a time window
//!   and orders by time alone, leaving same-time pops in sheet order.

use chrono::prelude::*;
use chrono::{Duration, Utc};
use tracing::debug;

use crate::moon::{Moon, Pop};

pub const DEFAULT_CYCLES: usize = 50;
pub const DEFAULT_WINDOW_DAYS: i64 = 200;

/// All pops falling on one calendar day (UTC).
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    pub day: NaiveDate,
    pub pops: Vec<Pop>,
}

/// Yesterday's date in UTC, where both strategies start.
pub fn first_day(now: DateTime<Utc>) -> NaiveDate {
    now.checked_sub_signed(Duration::days(1))
        .unwrap_or(now)
        .date_naive()
}

/// The instant `window_days` after `now`, clamped to the representable range.
pub fn window_end(now: DateTime<Utc>, window_days: i64) -> DateTime<Utc> {
    match Duration::try_days(window_days).and_then(|window| now.checked_add_signed(window)) {
        Some(end) => end,
        None if window_days < 0 => DateTime::<Utc>::MIN_UTC,
        None => DateTime::<Utc>::MAX_UTC,
    }
}

/// Lazily yields one [`DayGroup`] per calendar day, starting yesterday.
///
/// The cursor owns the moons and pops them forward as days are pulled. Every
/// day is yielded, including days without pops, so callers bound the walk
/// with `take`. The walk ends once no moon can reach the current day, which
/// is immediately when there are no moons at all.
#[derive(Debug)]
pub struct DayCursor {
    moons: Vec<Moon>,
    day: NaiveDate,
}

impl DayCursor {
    pub fn new(moons: Vec<Moon>, now: DateTime<Utc>) -> DayCursor {
        DayCursor::starting_at(moons, first_day(now))
    }

    pub fn starting_at(moons: Vec<Moon>, day: NaiveDate) -> DayCursor {
        DayCursor { moons, day }
    }

    /// The day the next call to `next` will produce.
    pub fn day(&self) -> NaiveDate {
        self.day
    }
}

impl Iterator for DayCursor {
    type Item = DayGroup;

    fn next(&mut self) -> Option<DayGroup> {
        let day = self.day;
        let mut pops: Vec<Pop> = self
            .moons
            .iter_mut()
            .filter_map(|moon| {
                moon.project_until(day);
                if moon.pop_day() == day {
                    Some(moon.snapshot())
                } else {
                    None
                }
            })
            .collect();
        if self.moons.iter().all(|moon| moon.pop_day() < day) {
            debug!(%day, "no moon pops on or after this day");
            return None;
        }
        pops.sort_by(|a, b| {
            a.time
                .cmp(&b.time)
                .then_with(|| a.system_name.cmp(&b.system_name))
                .then_with(|| a.location_name.cmp(&b.location_name))
        });

        self.day = day.succ_opt()?;
        Some(DayGroup { day, pops })
    }
}

/// Unrolls `cycles` pops per moon and keeps those between the start of
/// yesterday and `window_days` from now, ordered by time only.
pub fn bounded(
    moons: &[Moon],
    now: DateTime<Utc>,
    cycles: usize,
    window_days: i64,
) -> Vec<DayGroup> {
    let start = Utc.from_utc_datetime(&first_day(now).and_time(NaiveTime::MIN));
    let end = window_end(now, window_days);

    let mut pops: Vec<Pop> = moons
        .iter()
        .flat_map(|moon| moon.unroll(cycles))
        .filter(|pop| pop.time >= start && pop.time <= end)
        .collect();
    // Stable, so equal times keep sheet order.
    pops.sort_by_key(|pop| pop.time);
    debug!(count = pops.len(), %start, %end, "unrolled pops in window");

    group_by_day(pops)
}

/// Groups consecutive pops sharing a day. Input must already be time ordered.
pub fn group_by_day(pops: Vec<Pop>) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();
    for pop in pops {
        match groups.last_mut() {
            Some(group) if group.day == pop.day() => group.pops.push(pop),
            _ => groups.push(DayGroup {
                day: pop.day(),
                pops: vec![pop],
            }),
        }
    }
    groups
}
