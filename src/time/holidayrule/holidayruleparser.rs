use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{
    Datelike,
    Days,
    NaiveDate,
    TimeDelta,
    Weekday
};
use regex::Regex;

use super::datetext::{parse_date_text, DateTextError};
use super::easter::easter_date;
use super::holidayruleerror::HolidayRuleError;
use super::holidayspec::{HolidayRule, HolidaySpec};

fn following_easter_regex() -> &'static Regex {
    static FOLLOWING_EASTER: OnceLock<Regex> = OnceLock::new();
    FOLLOWING_EASTER.get_or_init(|| {
        Regex::new(r"(?i)^(?P<weekday>[a-z]+) following (?P<days>[+-]?\d+) days? after easter$").unwrap()
    })
}

fn following_date_regex() -> &'static Regex {
    static FOLLOWING_DATE: OnceLock<Regex> = OnceLock::new();
    FOLLOWING_DATE.get_or_init(|| {
        Regex::new(r"(?i)^(?P<weekday>[a-z]+) following (?P<date>.+)$").unwrap()
    })
}

fn before_easter_regex() -> &'static Regex {
    static BEFORE_EASTER: OnceLock<Regex> = OnceLock::new();
    BEFORE_EASTER.get_or_init(|| {
        Regex::new(r"(?i)^(?P<weekday>thursday|friday) before easter$").unwrap()
    })
}

/// Next occurrence of `weekday` strictly after `d`.
pub fn next_weekday_after(d: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let ahead = (weekday.num_days_from_monday() + 7 - d.weekday().num_days_from_monday()) % 7;
    let ahead = if ahead == 0 { 7 } else { ahead };
    d.checked_add_days(Days::new(ahead as u64))
}

/// Resolves holiday specs to concrete dates.
pub struct HolidayRuleParser;

impl HolidayRuleParser {
    /// Date of `spec` in `year`.
    ///
    /// Floating rules are tried against the sub-grammars in a fixed order and
    /// the first match wins:
    /// 1. `<Weekday> following <N> days after Easter`
    /// 2. `<Weekday> following <date text>`
    /// 3. `<Thursday|Friday> before Easter`
    /// 4. `<date text> <year>`
    pub fn resolve(spec: &HolidaySpec, year: i32) -> Result<NaiveDate, HolidayRuleError> {
        match spec.rule() {
            HolidayRule::FixedDate(month_day) => Self::resolve_fixed_date(spec, month_day, year),
            HolidayRule::FloatingRule(text) => Self::resolve_floating_rule(spec, text.trim(), year)
        }
    }

    fn resolve_fixed_date(spec: &HolidaySpec, month_day: &str, year: i32) -> Result<NaiveDate, HolidayRuleError> {
        let iso = format!("{}-{}", year, month_day.trim());
        NaiveDate::parse_from_str(&iso, "%Y-%m-%d").map_err(|error| match error.kind() {
            chrono::format::ParseErrorKind::OutOfRange => HolidayRuleError::NoSuchDate {
                name: spec.name().to_owned(),
                text: month_day.to_owned(),
                year
            },
            _ => HolidayRuleError::UnparsableRuleText {
                name: spec.name().to_owned(),
                text: month_day.to_owned()
            }
        })
    }

    fn resolve_floating_rule(spec: &HolidaySpec, text: &str, year: i32) -> Result<NaiveDate, HolidayRuleError> {
        let unparsable = || HolidayRuleError::UnparsableRuleText {
            name: spec.name().to_owned(),
            text: text.to_owned()
        };
        let no_such_date = || HolidayRuleError::NoSuchDate {
            name: spec.name().to_owned(),
            text: text.to_owned(),
            year
        };
        let weekday = |name: &str| Weekday::from_str(name).map_err(|_| unparsable());

        if let Some(caps) = following_easter_regex().captures(text) {
            let target = weekday(&caps["weekday"])?;
            let days: i64 = caps["days"].parse().map_err(|_| unparsable())?;
            let shifted = easter_date(year)
                .zip(TimeDelta::try_days(days))
                .and_then(|(easter, offset)| easter.checked_add_signed(offset))
                .ok_or_else(no_such_date)?;
            return next_weekday_after(shifted, target).ok_or_else(no_such_date);
        }

        if let Some(caps) = following_date_regex().captures(text) {
            let target = weekday(&caps["weekday"])?;
            let anchor = parse_date_text(&caps["date"], year)
                .map_err(|error| Self::date_text_error(spec, text, error))?;
            return next_weekday_after(anchor, target).ok_or_else(no_such_date);
        }

        if let Some(caps) = before_easter_regex().captures(text) {
            let days_before = match weekday(&caps["weekday"])? {
                Weekday::Thu => 3,
                _ => 2
            };
            return easter_date(year)
                .and_then(|easter| easter.checked_sub_days(Days::new(days_before)))
                .ok_or_else(no_such_date);
        }

        match parse_date_text(&format!("{} {}", text, year), year) {
            Ok(d) => Ok(d),
            // The text may carry its own year.
            Err(DateTextError::Unparsable(_)) => {
                parse_date_text(text, year).map_err(|error| Self::date_text_error(spec, text, error))
            }
            Err(error) => Err(Self::date_text_error(spec, text, error))
        }
    }

    fn date_text_error(spec: &HolidaySpec, text: &str, error: DateTextError) -> HolidayRuleError {
        match error {
            DateTextError::Unparsable(_) => HolidayRuleError::UnparsableRuleText {
                name: spec.name().to_owned(),
                text: text.to_owned()
            },
            DateTextError::NoSuchDate { year, .. } => HolidayRuleError::NoSuchDate {
                name: spec.name().to_owned(),
                text: text.to_owned(),
                year
            }
        }
    }
}
