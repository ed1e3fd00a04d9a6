use chrono::prelude::*;
use chrono::Utc;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::moon::Moon;

/// Year assumed for every date in the sheet, which only lists day and month.
pub const REFERENCE_YEAR: i32 = 2023;

const HEADER_ROWS: usize = 3;

/// A row that was left out of the schedule because its pop time is unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    pub line: usize,
    pub system_name: String,
    pub location_name: String,
}

#[derive(Debug, Default, PartialEq)]
pub struct Sheet {
    pub moons: Vec<Moon>,
    pub skipped: Vec<Skipped>,
}

pub fn parse_sheet(content: &str, year: i32) -> Result<Sheet> {
    let mut sheet = Sheet::default();

    for (index, row) in content.split('\n').enumerate().skip(HEADER_ROWS) {
        let line = index + 1;
        let columns: Vec<&str> = row.trim_end_matches('\r').split(',').collect();
        if columns.iter().all(|c| c.is_empty()) {
            continue;
        }

        let column = |i: usize| columns.get(i).copied().unwrap_or("");
        let (system_name, location_name) = (column(1), column(2));
        let (date, period, time) = (column(3), column(4), column(5));

        if date.is_empty() || period.is_empty() || period.contains('?') {
            warn!("Unknown time for {} - {} moon.", system_name, location_name);
            sheet.skipped.push(Skipped {
                line,
                system_name: system_name.to_string(),
                location_name: location_name.to_string(),
            });
            continue;
        }

        let period_weeks = period.trim().parse::<u32>().map_err(|_| Error::InvalidPeriod {
            line,
            text: period.to_string(),
        })?;

        let moon = Moon {
            system_name: system_name.to_string(),
            location_name: location_name.to_string(),
            period_weeks,
            not_later_than: column(6).to_string(),
            next_pop: parse_pop_time(line, year, date, time)?,
        };
        debug!(
            line,
            system = %moon.system_name,
            location = %moon.location_name,
            pop = %moon.next_pop,
            "parsed moon"
        );
        sheet.moons.push(moon);
    }

    Ok(sheet)
}

fn parse_pop_time(line: usize, year: i32, date: &str, time: &str) -> Result<DateTime<Utc>> {
    let invalid_date = || Error::InvalidDate {
        line,
        text: date.to_string(),
    };

    let mut parts = date.split_whitespace();
    let day = parts
        .next()
        .and_then(|d| d.parse::<u32>().ok())
        .ok_or_else(invalid_date)?;
    let month_text = parts.next().ok_or_else(invalid_date)?;
    let month = parse_month(month_text).ok_or_else(|| Error::UnknownMonth {
        line,
        month: month_text.to_string(),
    })?;

    let time = time.trim();
    let hour = if time.is_empty() {
        0
    } else {
        parse_hour(time).ok_or_else(|| Error::InvalidTime {
            line,
            text: time.to_string(),
        })?
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
        .ok_or_else(invalid_date)
}

/// Only the first two characters of the time text carry the hour.
fn parse_hour(time: &str) -> Option<u32> {
    time.get(..2)?.parse::<u32>().ok().filter(|h| *h < 24)
}

pub fn parse_month(month: &str) -> Option<u32> {
    let number = match month {
        "Jan" | "January" => 1,
        "Feb" | "February" => 2,
        "Mar" | "March" => 3,
        "Apr" | "April" => 4,
        "May" => 5,
        "Jun" | "June" => 6,
        "Jul" | "July" => 7,
        "Aug" | "August" => 8,
        "Sep" | "Sept" | "September" => 9,
        "Oct" | "October" => 10,
        "Nov" | "November" => 11,
        "Dec" | "December" => 12,
        _ => return None,
    };
    Some(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const HEADER: &str = "Moon schedule\r\n,System,Athanor,Date,Period,Time,NLT\r\n,,,,,,\r\n";

    fn sheet(rows: &str) -> Result<Sheet> {
        parse_sheet(&format!("{}{}", HEADER, rows), REFERENCE_YEAR)
    }

    #[test]
    fn parses_full_row() {
        let parsed = sheet(",Slays,Athanor-1,15 Jan,4,14:30,\r\n").unwrap();
        assert_eq!(
            parsed.moons,
            vec![Moon {
                system_name: String::from("Slays"),
                location_name: String::from("Athanor-1"),
                period_weeks: 4,
                not_later_than: String::new(),
                next_pop: Utc.with_ymd_and_hms(2023, 1, 15, 14, 0, 0).unwrap(),
            }]
        );
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn empty_time_is_midnight_with_hint() {
        let parsed = sheet(",Tarta,Refinery,3 March,2,,18:00\n").unwrap();
        assert_eq!(
            parsed.moons[0].next_pop,
            Utc.with_ymd_and_hms(2023, 3, 3, 0, 0, 0).unwrap()
        );
        assert_eq!(parsed.moons[0].not_later_than, "18:00");
    }

    #[test]
    fn header_rows_are_skipped_regardless_of_content() {
        let content = "\
,Slays,A,1 Jan,1,10:00,
,Slays,B,1 Jan,1,10:00,
,Slays,C,1 Jan,1,10:00,
,Inder,D,2 Jan,2,,
";
        let parsed = parse_sheet(content, REFERENCE_YEAR).unwrap();
        assert_eq!(parsed.moons.len(), 1);
        assert_eq!(parsed.moons[0].location_name, "D");
    }

    #[test]
    fn blank_rows_are_ignored_silently() {
        let parsed = sheet(",,,,,,\r\n\r\n").unwrap();
        assert_eq!(parsed, Sheet::default());
    }

    #[test]
    fn questionable_period_is_skipped() {
        let parsed = sheet(",Inder,Athanor-2,15 Jan,2?,14:30,\n").unwrap();
        assert!(parsed.moons.is_empty());
        assert_eq!(
            parsed.skipped,
            vec![Skipped {
                line: 4,
                system_name: String::from("Inder"),
                location_name: String::from("Athanor-2"),
            }]
        );
    }

    #[test]
    fn missing_date_or_period_is_skipped() {
        let parsed = sheet(",Inder,A,,2,14:30,\n,Inder,B,15 Jan,,14:30,\n,Inder,C\n").unwrap();
        assert!(parsed.moons.is_empty());
        assert_eq!(parsed.skipped.len(), 3);
    }

    #[test]
    fn numbers_tolerate_surrounding_spaces() {
        let parsed = sheet(",Slays,Athanor-1, 15  Jan , 4 , 14:30,\n").unwrap();
        assert_eq!(parsed.moons[0].period_weeks, 4);
        assert_eq!(
            parsed.moons[0].next_pop,
            Utc.with_ymd_and_hms(2023, 1, 15, 14, 0, 0).unwrap()
        );
    }

    #[test]
    fn month_names() {
        assert_eq!(parse_month("Sept"), Some(9));
        assert_eq!(parse_month("Sep"), Some(9));
        assert_eq!(parse_month("December"), Some(12));
        assert_eq!(parse_month("may"), None);
        assert_eq!(parse_month("Xyz"), None);
    }

    #[test]
    fn unknown_month_is_fatal() {
        match sheet(",Slays,A,1 Xyz,2,,\n") {
            Err(Error::UnknownMonth { line, month }) => {
                assert_eq!(line, 4);
                assert_eq!(month, "Xyz");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn malformed_values_are_fatal() {
        assert!(matches!(
            sheet(",Slays,A,1 Jan,two,,\n"),
            Err(Error::InvalidPeriod { .. })
        ));
        assert!(matches!(
            sheet(",Slays,A,31 Feb,2,,\n"),
            Err(Error::InvalidDate { .. })
        ));
        assert!(matches!(
            sheet(",Slays,A,1 Jan,2,9,\n"),
            Err(Error::InvalidTime { .. })
        ));
    }

    #[test]
    fn unlisted_period_is_accepted_at_parse_time() {
        let parsed = sheet(",Slays,A,1 Jan,3,,\n").unwrap();
        assert_eq!(parsed.moons[0].period_weeks, 3);
    }

    #[test]
    fn year_is_configurable() {
        let content = format!("{}{}", HEADER, ",Slays,A,1 Jan,2,05:00,\n");
        let parsed = parse_sheet(&content, 2025).unwrap();
        assert_eq!(
            parsed.moons[0].next_pop,
            Utc.with_ymd_and_hms(2025, 1, 1, 5, 0, 0).unwrap()
        );
    }
}
