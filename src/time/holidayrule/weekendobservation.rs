use chrono::{
    Datelike,
    Days,
    NaiveDate,
    Weekday
};

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum WeekendObservation {
    Unadjusted = 0,
    NextWeekday = 1,
    PreviousWeekday = -1
}

/// Maps the weekday a holiday lands on to the day it is observed.
///
/// Indexed by `Weekday::num_days_from_monday()`. Saturday holidays are
/// observed on the preceding Friday and Sunday holidays on the following
/// Monday; every other weekday is left alone.
#[derive(Clone, Copy, Debug)]
pub struct WeekendObservationPolicy {
    rule: [WeekendObservation; 7]
}

impl Default for WeekendObservationPolicy {
    fn default() -> Self {
        let mut rule = [WeekendObservation::Unadjusted; 7];
        rule[Weekday::Sat.num_days_from_monday() as usize] = WeekendObservation::PreviousWeekday;
        rule[Weekday::Sun.num_days_from_monday() as usize] = WeekendObservation::NextWeekday;
        WeekendObservationPolicy { rule }
    }
}

impl WeekendObservationPolicy {
    pub fn observation(&self, weekday: Weekday) -> WeekendObservation {
        self.rule[weekday.num_days_from_monday() as usize]
    }

    #[inline]
    pub fn observed_date(&self, actual: NaiveDate) -> NaiveDate {
        match self.observation(actual.weekday()) {
            WeekendObservation::Unadjusted => actual,
            WeekendObservation::NextWeekday => actual.checked_add_days(Days::new(1)).unwrap_or(actual),
            WeekendObservation::PreviousWeekday => actual.checked_sub_days(Days::new(1)).unwrap_or(actual)
        }
    }
}

/// Observed date of a holiday under the default weekend policy.
pub fn observed_date(actual: NaiveDate) -> NaiveDate {
    WeekendObservationPolicy::default().observed_date(actual)
}
