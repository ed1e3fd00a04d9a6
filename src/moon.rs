use chrono::prelude::*;
use chrono::{Duration, Utc};

/// A moon's extraction cycle, as read from one sheet row.
#[derive(Debug, Clone, PartialEq)]
pub struct Moon {
    pub system_name: String,
    pub location_name: String,
    pub period_weeks: u32,
    pub not_later_than: String,
    pub next_pop: DateTime<Utc>,
}

/// An immutable snapshot of a single pop.
#[derive(Debug, Clone, PartialEq)]
pub struct Pop {
    pub system_name: String,
    pub location_name: String,
    pub time: DateTime<Utc>,
    pub period_weeks: u32,
    pub not_later_than: String,
}

impl Pop {
    pub fn day(&self) -> NaiveDate {
        self.time.date_naive()
    }
}

impl Moon {
    pub fn period(&self) -> Duration {
        Duration::weeks(i64::from(self.period_weeks))
    }

    pub fn pop_day(&self) -> NaiveDate {
        self.next_pop.date_naive()
    }

    /// Advances the next pop by one period. Returns `false`, leaving the pop
    /// where it was, when the period is zero or the result is out of range.
    pub fn pop(&mut self) -> bool {
        match self.next_pop.checked_add_signed(self.period()) {
            Some(next) if next > self.next_pop => {
                self.next_pop = next;
                true
            }
            _ => false,
        }
    }

    /// Pops until the next pop falls on or after `day`, or until it cannot
    /// advance any further.
    pub fn project_until(&mut self, day: NaiveDate) {
        while self.pop_day() < day {
            if !self.pop() {
                break;
            }
        }
    }

    pub fn snapshot(&self) -> Pop {
        Pop {
            system_name: self.system_name.clone(),
            location_name: self.location_name.clone(),
            time: self.next_pop,
            period_weeks: self.period_weeks,
            not_later_than: self.not_later_than.clone(),
        }
    }

    /// Returns `count + 1` pops starting at the current one, one period apart.
    /// Stops early if the next pop would be out of range.
    pub fn unroll(&self, count: usize) -> Vec<Pop> {
        let mut moon = self.clone();
        let mut pops = vec![moon.snapshot()];
        for _ in 0..count {
            if !moon.pop() {
                break;
            }
            pops.push(moon.snapshot());
        }
        pops
    }
}

#[cfg(test)]
pub(crate) fn moon(
    system: &str,
    location: &str,
    period_weeks: u32,
    next_pop: DateTime<Utc>,
) -> Moon {
    Moon {
        system_name: String::from(system),
        location_name: String::from(location),
        period_weeks,
        not_later_than: String::new(),
        next_pop,
    }
}
