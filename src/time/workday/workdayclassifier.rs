use chrono::{
    Datelike,
    Days,
    NaiveDate
};

use crate::time::calendar::holidaycalendar::{HolidayCalendar, HolidayCalendarError};
use crate::time::calendar::holidayspecsource::HolidaySpecSource;
use crate::time::holidayrule::holidayruleerror::HolidayRuleError;

const ONE_DAY: Days = Days::new(1);

#[inline]
pub fn is_weekend(d: NaiveDate) -> bool {
    d.weekday().number_from_monday() >= 6
}

/// Whether `d` is a Monday to Friday that is not a holiday in `country`.
///
/// Loads a fresh calendar for every call; hold a [`WorkdayClassifier`] to
/// classify many dates.
pub fn is_workday(d: NaiveDate, country: &str, source: &dyn HolidaySpecSource) -> Result<bool, HolidayCalendarError> {
    let classifier = WorkdayClassifier::new(HolidayCalendar::with_year(country, source, d.year())?);
    Ok(classifier.is_workday(d)?)
}

pub trait WorkdayCalendar {
    fn is_workday(&self, d: NaiveDate) -> Result<bool, HolidayRuleError>;

    /// Moves `n` workdays away from `horizon` (backwards when `n` is
    /// negative). `horizon` itself is never counted.
    fn shift_n_workdays(&self, horizon: NaiveDate, n: i32) -> Result<NaiveDate, HolidayRuleError> {
        let shift_one_day = if n >= 0 {
            |d: NaiveDate| d.checked_add_days(ONE_DAY)
        } else {
            |d: NaiveDate| d.checked_sub_days(ONE_DAY)
        };

        let mut m = n.unsigned_abs();
        let mut d = horizon;
        while m > 0 {
            d = shift_one_day(d).ok_or(HolidayRuleError::DateOutOfRange { horizon, n })?;
            m -= self.is_workday(d)? as u32;
        }
        Ok(d)
    }

    fn next_workday(&self, d: NaiveDate) -> Result<NaiveDate, HolidayRuleError> {
        self.shift_n_workdays(d, 1)
    }

    fn previous_workday(&self, d: NaiveDate) -> Result<NaiveDate, HolidayRuleError> {
        self.shift_n_workdays(d, -1)
    }
}

/// Classifies dates against one country's holidays, reusing its calendar.
pub struct WorkdayClassifier {
    calendar: HolidayCalendar
}

impl WorkdayClassifier {
    pub fn new(calendar: HolidayCalendar) -> WorkdayClassifier {
        WorkdayClassifier { calendar }
    }

    pub fn for_country(country: &str, source: &dyn HolidaySpecSource) -> Result<WorkdayClassifier, HolidayCalendarError> {
        Ok(WorkdayClassifier::new(HolidayCalendar::new(country, source)?))
    }

    pub fn calendar(&self) -> &HolidayCalendar {
        &self.calendar
    }

    pub fn country(&self) -> &str {
        self.calendar.country()
    }
}

impl WorkdayCalendar for WorkdayClassifier {
    fn is_workday(&self, d: NaiveDate) -> Result<bool, HolidayRuleError> {
        if is_weekend(d) {
            return Ok(false);
        }
        Ok(!self.calendar.is_holiday(d)?)
    }
}
