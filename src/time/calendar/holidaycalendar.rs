use std::cell::RefCell;
use std::collections::HashMap;

use chrono::{Datelike, Local, NaiveDate};
use thiserror::Error;
use tracing::debug;

use crate::time::calendar::holidayspecsource::{HolidaySpecSource, SpecSourceError};
use crate::time::holidayrule::holidayruleerror::HolidayRuleError;
use crate::time::holidayrule::holidayruleparser::HolidayRuleParser;
use crate::time::holidayrule::holidayspec::HolidaySpec;
use crate::time::holidayrule::weekendobservation::WeekendObservationPolicy;

#[derive(Debug, Error)]
pub enum HolidayCalendarError {
    #[error(transparent)]
    Source(#[from] SpecSourceError),
    #[error(transparent)]
    Rule(#[from] HolidayRuleError)
}

/// A holiday pinned to one year.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedHoliday {
    name: String,
    actual_date: NaiveDate,
    observed_date: NaiveDate
}

impl ResolvedHoliday {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn actual_date(&self) -> NaiveDate {
        self.actual_date
    }

    pub fn observed_date(&self) -> NaiveDate {
        self.observed_date
    }

    pub fn is_shifted(&self) -> bool {
        self.actual_date != self.observed_date
    }

    pub fn observed_name(&self) -> String {
        format!("{} (Observed)", self.name)
    }
}

#[derive(Clone, Debug)]
struct YearCache {
    year: i32,
    resolved: HashMap<String, ResolvedHoliday>,
    holidays_by_date: HashMap<NaiveDate, Vec<String>>,
    holidays_by_name: HashMap<String, NaiveDate>
}

impl YearCache {
    fn empty(year: i32) -> YearCache {
        YearCache {
            year,
            resolved: HashMap::new(),
            holidays_by_date: HashMap::new(),
            holidays_by_name: HashMap::new()
        }
    }

    fn build<'a>(
        year: i32,
        specs: impl Iterator<Item = &'a HolidaySpec>,
        policy: &WeekendObservationPolicy
    ) -> Result<YearCache, HolidayRuleError> {
        let mut cache = YearCache::empty(year);
        for spec in specs {
            cache.insert(resolve(spec, year, policy)?);
        }
        Ok(cache)
    }

    fn insert(&mut self, holiday: ResolvedHoliday) {
        if let Some(previous) = self.resolved.remove(&holiday.name) {
            self.unlink(&previous);
        }

        self.link(holiday.actual_date, &holiday.name);
        self.holidays_by_name.insert(holiday.name.clone(), holiday.actual_date);
        if holiday.is_shifted() {
            self.link(holiday.observed_date, &holiday.name);
            self.holidays_by_name.insert(holiday.observed_name(), holiday.observed_date);
        }
        self.resolved.insert(holiday.name.clone(), holiday);
    }

    fn link(&mut self, d: NaiveDate, name: &str) {
        let names = self.holidays_by_date.entry(d).or_default();
        if !names.iter().any(|n| n == name) {
            names.push(name.to_owned());
        }
    }

    // Drops only `previous`'s own names; other holidays on the same dates stay.
    fn unlink(&mut self, previous: &ResolvedHoliday) {
        for d in [previous.actual_date, previous.observed_date] {
            if let Some(names) = self.holidays_by_date.get_mut(&d) {
                names.retain(|n| *n != previous.name);
                if names.is_empty() {
                    self.holidays_by_date.remove(&d);
                }
            }
        }
        self.holidays_by_name.remove(&previous.name);
        self.holidays_by_name.remove(&previous.observed_name());
    }

    fn holidays_on(&self, d: NaiveDate) -> Vec<ResolvedHoliday> {
        self.holidays_by_date
            .get(&d)
            .map(|names| names.iter().filter_map(|name| self.resolved.get(name)).cloned().collect())
            .unwrap_or_default()
    }
}

fn resolve(spec: &HolidaySpec, year: i32, policy: &WeekendObservationPolicy) -> Result<ResolvedHoliday, HolidayRuleError> {
    let actual_date = HolidayRuleParser::resolve(spec, year)?;
    Ok(ResolvedHoliday {
        name: spec.name().to_owned(),
        actual_date,
        observed_date: policy.observed_date(actual_date)
    })
}

/// The holidays of one country, resolved for one year at a time.
///
/// Lookups by date move the cache to the date's year on demand. A year switch
/// rebuilds the cache aside and swaps it in whole, so a failed switch leaves
/// the previous year in place. Lookups by name only see the cached year.
///
/// The cache sits in a `RefCell`; share across threads only behind a lock.
#[derive(Clone, Debug)]
pub struct HolidayCalendar {
    country: String,
    specs: Vec<HolidaySpec>,
    added_specs: Vec<HolidaySpec>,
    policy: WeekendObservationPolicy,
    cache: RefCell<YearCache>
}

impl HolidayCalendar {
    /// Calendar for `country`, initialised for the current local year.
    pub fn new(country: &str, source: &dyn HolidaySpecSource) -> Result<HolidayCalendar, HolidayCalendarError> {
        HolidayCalendar::with_year(country, source, Local::now().year())
    }

    pub fn with_year(country: &str, source: &dyn HolidaySpecSource, year: i32) -> Result<HolidayCalendar, HolidayCalendarError> {
        let specs = source.fetch(country)?;
        let policy = WeekendObservationPolicy::default();
        let cache = YearCache::build(year, specs.iter(), &policy)?;
        debug!(country, year, holidays = cache.resolved.len(), "resolved holidays");
        Ok(HolidayCalendar {
            country: country.to_owned(),
            specs,
            added_specs: Vec::new(),
            policy,
            cache: RefCell::new(cache)
        })
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn year(&self) -> i32 {
        self.cache.borrow().year
    }

    /// Loaded specs followed by added ones. A loaded spec whose name was
    /// added again is left out.
    pub fn specs(&self) -> impl Iterator<Item = &HolidaySpec> {
        self.specs
            .iter()
            .filter(move |spec| !self.added_specs.iter().any(|added| added.name() == spec.name()))
            .chain(self.added_specs.iter())
    }

    /// Re-resolves every holiday for `year`. Does nothing if `year` is
    /// already cached.
    pub fn change_year(&self, year: i32) -> Result<(), HolidayRuleError> {
        if self.cache.borrow().year == year {
            return Ok(());
        }
        let cache = YearCache::build(year, self.specs(), &self.policy)?;
        debug!(country = %self.country, year, holidays = cache.resolved.len(), "resolved holidays");
        *self.cache.borrow_mut() = cache;
        Ok(())
    }

    /// Resolves `spec` for the cached year and registers it under its name
    /// and, when the weekend shifts it, under `"<name> (Observed)"`.
    ///
    /// The spec is kept and re-resolved on later year switches. Adding a
    /// spec whose name is already registered replaces the earlier entries.
    pub fn add_holiday(&mut self, spec: HolidaySpec) -> Result<ResolvedHoliday, HolidayRuleError> {
        let holiday = resolve(&spec, self.year(), &self.policy)?;
        debug!(
            country = %self.country,
            name = spec.name(),
            actual = %holiday.actual_date,
            observed = %holiday.observed_date,
            "added holiday"
        );
        self.cache.get_mut().insert(holiday.clone());
        self.added_specs.retain(|added| added.name() != spec.name());
        self.added_specs.push(spec);
        Ok(holiday)
    }

    /// `add_holiday` for an undecoded `{name, type, when}` record.
    pub fn add_holiday_json(&mut self, json_value: serde_json::Value) -> Result<ResolvedHoliday, HolidayRuleError> {
        let spec = HolidaySpec::from_json(json_value)?;
        self.add_holiday(spec)
    }

    /// Whether `d` is a holiday, either on its actual or its observed date.
    pub fn is_holiday(&self, d: NaiveDate) -> Result<bool, HolidayRuleError> {
        self.change_year(d.year())?;
        Ok(self.cache.borrow().holidays_by_date.contains_key(&d))
    }

    /// Every holiday falling (or observed) on `d`, in registration order.
    pub fn holiday_on(&self, d: NaiveDate) -> Result<Vec<ResolvedHoliday>, HolidayRuleError> {
        self.change_year(d.year())?;
        Ok(self.cache.borrow().holidays_on(d))
    }

    /// Date registered under `name` in the cached year.
    pub fn get_holiday(&self, name: &str) -> Option<NaiveDate> {
        self.cache.borrow().holidays_by_name.get(name).copied()
    }

    /// Holidays of the cached year, ordered by actual date.
    pub fn holidays(&self) -> Vec<ResolvedHoliday> {
        let mut holidays: Vec<ResolvedHoliday> = self.cache.borrow().resolved.values().cloned().collect();
        holidays.sort_by(|h1, h2| h1.actual_date.cmp(&h2.actual_date).then_with(|| h1.name.cmp(&h2.name)));
        holidays
    }
}
