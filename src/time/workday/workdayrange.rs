use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use thiserror::Error;
use tracing::debug;

use crate::time::calendar::holidaycalendar::{HolidayCalendar, HolidayCalendarError};
use crate::time::calendar::holidayspecsource::HolidaySpecSource;
use crate::time::rangeofdates::RangeOfDates;
use crate::time::utility::parse_iso_date_overflowing;
use crate::time::workday::workdayclassifier::{WorkdayCalendar, WorkdayClassifier};

const ISO_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum WorkdayRangeError {
    #[error("the start date needs to be before the end date ({start} >= {end})")]
    InvalidRange {
        start: NaiveDate,
        end: NaiveDate
    },

    #[error("'{0}' is not a YYYY-MM-DD date")]
    InvalidDate(String),

    #[error("manually adding workdays is not allowed")]
    ImmutableInsertion,

    #[error(transparent)]
    Calendar(#[from] HolidayCalendarError)
}

/// Addresses a workday either by its position at construction time or by
/// its date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkdayKey {
    Position(usize),
    Date(NaiveDate)
}

impl From<usize> for WorkdayKey {
    fn from(position: usize) -> Self {
        WorkdayKey::Position(position)
    }
}

impl From<NaiveDate> for WorkdayKey {
    fn from(d: NaiveDate) -> Self {
        WorkdayKey::Date(d)
    }
}

impl WorkdayKey {
    /// Key for a zero-padded `YYYY-MM-DD` string; `None` for anything else,
    /// including unpadded forms such as `2018-8-3`.
    pub fn parse(iso_date: &str) -> Option<WorkdayKey> {
        NaiveDate::parse_from_str(iso_date, ISO_FORMAT)
            .ok()
            .filter(|d| d.format(ISO_FORMAT).to_string() == iso_date)
            .map(WorkdayKey::Date)
    }
}

/// The workdays between two dates, both included, in ascending order.
///
/// Entries are reachable by position and by date. Positions are fixed at
/// construction; removing an entry never renumbers the others. Entries can
/// be removed but never added.
#[derive(Clone, Debug)]
pub struct WorkdayRange {
    start_date: NaiveDate,
    end_date: NaiveDate,
    country: String,
    workdays: BTreeMap<usize, NaiveDate>,
    positions_by_date: HashMap<NaiveDate, usize>
}

impl WorkdayRange {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        country: &str,
        source: &dyn HolidaySpecSource
    ) -> Result<WorkdayRange, WorkdayRangeError> {
        if start_date >= end_date {
            return Err(WorkdayRangeError::InvalidRange { start: start_date, end: end_date });
        }
        let calendar = HolidayCalendar::with_year(country, source, start_date.year())?;
        WorkdayRange::with_classifier(start_date, end_date, &WorkdayClassifier::new(calendar))
    }

    /// Same as [`WorkdayRange::new`] for `YYYY-MM-DD` bounds; a day past the
    /// end of its month rolls into the next month.
    pub fn from_iso_strs(
        start_date: &str,
        end_date: &str,
        country: &str,
        source: &dyn HolidaySpecSource
    ) -> Result<WorkdayRange, WorkdayRangeError> {
        let parse = |s: &str| parse_iso_date_overflowing(s).ok_or_else(|| WorkdayRangeError::InvalidDate(s.to_owned()));
        WorkdayRange::new(parse(start_date)?, parse(end_date)?, country, source)
    }

    pub fn with_classifier(
        start_date: NaiveDate,
        end_date: NaiveDate,
        classifier: &WorkdayClassifier
    ) -> Result<WorkdayRange, WorkdayRangeError> {
        let days = match RangeOfDates::new(start_date, end_date) {
            Some(days) if start_date < end_date => days,
            _ => return Err(WorkdayRangeError::InvalidRange { start: start_date, end: end_date })
        };

        let mut workdays = BTreeMap::new();
        let mut positions_by_date = HashMap::new();
        for d in days.iter() {
            if classifier.is_workday(d).map_err(HolidayCalendarError::from)? {
                let position = workdays.len();
                workdays.insert(position, d);
                positions_by_date.insert(d, position);
            }
        }
        debug!(
            country = classifier.country(),
            start = %start_date,
            end = %end_date,
            workdays = workdays.len(),
            "planned workdays"
        );

        Ok(WorkdayRange {
            start_date,
            end_date,
            country: classifier.country().to_owned(),
            workdays,
            positions_by_date
        })
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn count(&self) -> usize {
        self.workdays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workdays.is_empty()
    }

    fn position_of(&self, key: WorkdayKey) -> Option<usize> {
        match key {
            WorkdayKey::Position(position) => self.workdays.contains_key(&position).then_some(position),
            WorkdayKey::Date(d) => self.positions_by_date.get(&d).copied()
        }
    }

    pub fn get(&self, key: impl Into<WorkdayKey>) -> Option<NaiveDate> {
        let position = self.position_of(key.into())?;
        self.workdays.get(&position).copied()
    }

    /// Lookup by `YYYY-MM-DD` string.
    pub fn get_iso(&self, iso_date: &str) -> Option<NaiveDate> {
        self.get(WorkdayKey::parse(iso_date)?)
    }

    pub fn contains(&self, key: impl Into<WorkdayKey>) -> bool {
        self.position_of(key.into()).is_some()
    }

    pub fn contains_iso(&self, iso_date: &str) -> bool {
        WorkdayKey::parse(iso_date).is_some_and(|key| self.contains(key))
    }

    /// Removes an entry from both indices. Returns the removed date, or
    /// `None` if nothing was stored under `key`.
    pub fn remove(&mut self, key: impl Into<WorkdayKey>) -> Option<NaiveDate> {
        let position = self.position_of(key.into())?;
        let d = self.workdays.remove(&position)?;
        self.positions_by_date.remove(&d);
        Some(d)
    }

    pub fn remove_iso(&mut self, iso_date: &str) -> Option<NaiveDate> {
        self.remove(WorkdayKey::parse(iso_date)?)
    }

    /// Always rejected: membership comes only from classifying the range.
    pub fn set(&mut self, _key: impl Into<WorkdayKey>, _value: NaiveDate) -> Result<(), WorkdayRangeError> {
        Err(WorkdayRangeError::ImmutableInsertion)
    }

    /// Remaining workdays in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.workdays.values().copied()
    }

    /// Remaining workdays with their positions.
    pub fn entries(&self) -> impl Iterator<Item = (usize, NaiveDate)> + '_ {
        self.workdays.iter().map(|(&position, &d)| (position, d))
    }

    /// Remaining workdays rendered with a chrono format string.
    pub fn workdays(&self, format: &str) -> Vec<String> {
        self.iter().map(|d| d.format(format).to_string()).collect()
    }

    pub fn iso_workdays(&self) -> Vec<String> {
        self.workdays(ISO_FORMAT)
    }
}

impl<'a> IntoIterator for &'a WorkdayRange {
    type Item = NaiveDate;
    type IntoIter = std::iter::Copied<std::collections::btree_map::Values<'a, usize, NaiveDate>>;

    fn into_iter(self) -> Self::IntoIter {
        self.workdays.values().copied()
    }
}
