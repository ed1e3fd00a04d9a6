use std::io::{self, BufRead, Write};

use chrono::prelude::*;
use chrono::Utc;
use colored::Colorize;

use crate::error::{Error, Result};
use crate::moon::Pop;
use crate::schedule::DayGroup;

pub const SYSTEM_WIDTH: usize = 15;
pub const LOCATION_WIDTH: usize = 25;
pub const PERIOD_WIDTH: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Default,
    DarkRed,
    Red,
    Yellow,
    Green,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub style: Style,
}

impl Segment {
    fn new(text: String, style: Style) -> Segment {
        Segment { text, style }
    }
}

/// Called before each day of pops is written.
pub trait Pacer {
    fn pause(&mut self) -> io::Result<()>;
}

impl<P: Pacer + ?Sized> Pacer for Box<P> {
    fn pause(&mut self) -> io::Result<()> {
        (**self).pause()
    }
}

/// Waits for a line on stdin.
#[derive(Debug, Default)]
pub struct StdinPacer;

impl Pacer for StdinPacer {
    fn pause(&mut self) -> io::Result<()> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct NoPause;

impl Pacer for NoPause {
    fn pause(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn system_style(system_name: &str) -> Style {
    match system_name {
        "Slays" => Style::DarkRed,
        "Tarta" => Style::Yellow,
        "Inder" => Style::Green,
        _ => Style::Default,
    }
}

pub fn period_label(period_weeks: u32) -> Result<(&'static str, Style)> {
    match period_weeks {
        1 => Ok(("Puny (1 week)", Style::Default)),
        2 => Ok(("Normal (2 weeks)", Style::Default)),
        4 => Ok(("FAT (4 weeks)", Style::Green)),
        8 => Ok(("EXTRA FAT (8 weeks)", Style::Red)),
        other => Err(Error::UnknownPeriod(other)),
    }
}

/// Month and day, then either the hint (midnight means the hour is unknown)
/// or the exact time.
pub fn format_time(time: DateTime<Utc>, not_later_than: &str) -> String {
    let mut text = time.format("%B %d").to_string();
    if time.time() == NaiveTime::MIN {
        if !not_later_than.is_empty() {
            text.push_str(&format!(" (not later than {})", not_later_than));
        }
    } else {
        text.push_str(&time.format(", %-H:%M:%S").to_string());
    }
    text
}

pub fn render_pop(pop: &Pop) -> Result<Vec<Segment>> {
    let (period, period_style) = period_label(pop.period_weeks)?;
    Ok(vec![
        Segment::new(
            format!("{:<width$}", pop.system_name, width = SYSTEM_WIDTH),
            system_style(&pop.system_name),
        ),
        Segment::new(
            format!("{:<width$}", pop.location_name, width = LOCATION_WIDTH),
            Style::Default,
        ),
        Segment::new(format!("{:<width$}", period, width = PERIOD_WIDTH), period_style),
        Segment::new(format_time(pop.time, &pop.not_later_than), Style::Default),
    ])
}

pub fn paint(segment: &Segment) -> String {
    let text = segment.text.as_str();
    match segment.style {
        Style::Default => text.white().to_string(),
        Style::DarkRed => text.red().to_string(),
        Style::Red => text.bright_red().to_string(),
        Style::Yellow => text.bright_yellow().to_string(),
        Style::Green => text.bright_green().to_string(),
    }
}

/// Writes day groups to `out`, pausing before each day that has pops and
/// once more after the last one.
pub struct Report<W, P> {
    out: W,
    pacer: P,
}

impl<W: Write, P: Pacer> Report<W, P> {
    pub fn new(out: W, pacer: P) -> Report<W, P> {
        Report { out, pacer }
    }

    pub fn header(&mut self) -> Result<()> {
        writeln!(self.out, "========== New Eden Moons ==========")?;
        writeln!(self.out)?;
        Ok(())
    }

    pub fn write_groups<I>(&mut self, groups: I) -> Result<()>
    where
        I: IntoIterator<Item = DayGroup>,
    {
        for group in groups {
            if group.pops.is_empty() {
                continue;
            }
            self.out.flush()?;
            self.pacer.pause()?;
            for pop in &group.pops {
                self.write_pop(pop)?;
            }
        }
        self.out.flush()?;
        self.pacer.pause()?;
        Ok(())
    }

    fn write_pop(&mut self, pop: &Pop) -> Result<()> {
        for segment in render_pop(pop)? {
            write!(self.out, "{}", paint(&segment))?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    pub fn into_parts(self) -> (W, P) {
        (self.out, self.pacer)
    }
}
