use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{
    Datelike,
    Days,
    Month,
    NaiveDate,
    Weekday
};
use regex::{Captures, Regex};
use thiserror::Error;

use crate::time::utility::days_of_month;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateTextError {
    #[error("unrecognised date text '{0}'")]
    Unparsable(String),
    #[error("'{text}' names no date in {year}")]
    NoSuchDate {
        text: String,
        year: i32
    }
}

fn iso_regex() -> &'static Regex {
    static ISO: OnceLock<Regex> = OnceLock::new();
    ISO.get_or_init(|| {
        Regex::new(r"^(?P<year>\d{4})-(?P<month>\d{1,2})-(?P<day>\d{1,2})$").unwrap()
    })
}

fn nth_weekday_regex() -> &'static Regex {
    static NTH_WEEKDAY: OnceLock<Regex> = OnceLock::new();
    NTH_WEEKDAY.get_or_init(|| {
        Regex::new(
            r"(?i)^(?P<ordinal>first|second|third|fourth|fifth|last|1st|2nd|3rd|4th|5th) (?P<weekday>[a-z]+) of (?P<month>[a-z]+)(?: (?P<year>\d{4}))?$"
        )
        .unwrap()
    })
}

fn month_day_regex() -> &'static Regex {
    static MONTH_DAY: OnceLock<Regex> = OnceLock::new();
    MONTH_DAY.get_or_init(|| {
        Regex::new(
            r"(?i)^(?P<month>[a-z]+)\.? (?P<day>\d{1,2})(?:st|nd|rd|th)?,?(?: (?P<year>\d{4}))?$"
        )
        .unwrap()
    })
}

fn day_month_regex() -> &'static Regex {
    static DAY_MONTH: OnceLock<Regex> = OnceLock::new();
    DAY_MONTH.get_or_init(|| {
        Regex::new(r"(?i)^(?P<day>\d{1,2})(?:st|nd|rd|th)? (?P<month>[a-z]+)(?: (?P<year>\d{4}))?$")
            .unwrap()
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Occurrence {
    Nth(u8),
    Last
}

impl FromStr for Occurrence {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" | "1st" => Ok(Occurrence::Nth(1)),
            "second" | "2nd" => Ok(Occurrence::Nth(2)),
            "third" | "3rd" => Ok(Occurrence::Nth(3)),
            "fourth" | "4th" => Ok(Occurrence::Nth(4)),
            "fifth" | "5th" => Ok(Occurrence::Nth(5)),
            "last" => Ok(Occurrence::Last),
            _ => Err(())
        }
    }
}

/// Last `weekday` of the month, counted back from the month end.
pub fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let eom = NaiveDate::from_ymd_opt(year, month, days_of_month(year, month))?;
    let days_back = (eom.weekday().num_days_from_monday() + 7 - weekday.num_days_from_monday()) % 7;
    eom.checked_sub_days(Days::new(days_back as u64))
}

/// Parses a free-text calendar date.
///
/// Accepted forms (case-insensitive, any amount of whitespace):
/// - `2018-04-17`
/// - `third Monday of January [2018]`, `last Monday of May [2018]`
/// - `July 4[th][,] [2018]`
/// - `4[th] July [2018]`
///
/// Forms without a year resolve within `default_year`.
pub fn parse_date_text(text: &str, default_year: i32) -> Result<NaiveDate, DateTextError> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let unparsable = || DateTextError::Unparsable(text.to_owned());

    if let Some(caps) = iso_regex().captures(&normalized) {
        let year = number(&caps, "year").ok_or_else(unparsable)?;
        let month = number(&caps, "month").ok_or_else(unparsable)? as u32;
        let day = number(&caps, "day").ok_or_else(unparsable)? as u32;
        return NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| DateTextError::NoSuchDate { text: text.to_owned(), year });
    }

    if let Some(caps) = nth_weekday_regex().captures(&normalized) {
        let occurrence = Occurrence::from_str(&caps["ordinal"]).map_err(|_| unparsable())?;
        let weekday = Weekday::from_str(&caps["weekday"]).map_err(|_| unparsable())?;
        let month = month_number(&caps).ok_or_else(unparsable)?;
        let year = number(&caps, "year").unwrap_or(default_year);
        let date = match occurrence {
            Occurrence::Nth(n) => NaiveDate::from_weekday_of_month_opt(year, month, weekday, n),
            Occurrence::Last => last_weekday_of_month(year, month, weekday)
        };
        return date.ok_or_else(|| DateTextError::NoSuchDate { text: text.to_owned(), year });
    }

    let caps = month_day_regex()
        .captures(&normalized)
        .or_else(|| day_month_regex().captures(&normalized))
        .ok_or_else(unparsable)?;
    let month = month_number(&caps).ok_or_else(unparsable)?;
    let day = number(&caps, "day").ok_or_else(unparsable)? as u32;
    let year = number(&caps, "year").unwrap_or(default_year);
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DateTextError::NoSuchDate { text: text.to_owned(), year })
}

fn number(caps: &Captures, group: &str) -> Option<i32> {
    caps.name(group).and_then(|m| m.as_str().parse::<i32>().ok())
}

fn month_number(caps: &Captures) -> Option<u32> {
    Month::from_str(&caps["month"]).ok().map(|month| month.number_from_month())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("third Monday of January 2018", 1999, ymd(2018, 1, 15))]
    #[case("third Monday of January 2019", 1999, ymd(2019, 1, 21))]
    #[case("third Monday of January", 2020, ymd(2020, 1, 20))]
    #[case("fourth Thursday of November", 2018, ymd(2018, 11, 22))]
    #[case("First  monday of SEPTEMBER", 2018, ymd(2018, 9, 3))]
    #[case("1st Mon of Sep", 2018, ymd(2018, 9, 3))]
    #[case("last Monday of May", 2018, ymd(2018, 5, 28))]
    #[case("last Monday of May", 2021, ymd(2021, 5, 31))]
    #[case("last Friday of December 2021", 1999, ymd(2021, 12, 31))]
    #[case("2018-04-17", 1999, ymd(2018, 4, 17))]
    #[case("July 4", 2021, ymd(2021, 7, 4))]
    #[case("July 4th, 2032", 1999, ymd(2032, 7, 4))]
    #[case("25 December", 2016, ymd(2016, 12, 25))]
    #[case("26th Dec 2020", 1999, ymd(2020, 12, 26))]
    fn test_parse_date_text(#[case] text: &str, #[case] default_year: i32, #[case] expected: NaiveDate) {
        assert_eq!(parse_date_text(text, default_year), Ok(expected));
    }

    #[rstest]
    #[case("whenever")]
    #[case("third Funday of January")]
    #[case("third Monday of Smarch")]
    #[case("sixth Monday of January")]
    #[case("third Monday of January 2018 2019")]
    #[case("")]
    fn test_rejects_unrecognised_text(#[case] text: &str) {
        assert!(matches!(parse_date_text(text, 2018), Err(DateTextError::Unparsable(_))));
    }

    #[rstest]
    #[case("fifth Monday of February", 2018)]
    #[case("February 30", 2018)]
    #[case("2019-02-29", 2018)]
    fn test_reports_nonexistent_dates(#[case] text: &str, #[case] year: i32) {
        assert!(matches!(parse_date_text(text, year), Err(DateTextError::NoSuchDate { .. })));
    }

    #[test]
    fn test_last_weekday_of_month_when_month_ends_on_that_weekday() {
        // 2018-08-31 is a Friday.
        assert_eq!(last_weekday_of_month(2018, 8, Weekday::Fri), Some(ymd(2018, 8, 31)));
        assert_eq!(last_weekday_of_month(2018, 8, Weekday::Sat), Some(ymd(2018, 8, 25)));
        assert_eq!(last_weekday_of_month(2018, 13, Weekday::Sat), None);
    }
}
