use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::time::calendar::holidaycalendar::{HolidayCalendar, HolidayCalendarError};
use crate::time::calendar::holidayspecsource::{
    BundledSpecSource,
    DirectorySpecSource,
    HolidaySpecSource
};
use crate::time::workday::workdayrange::{WorkdayRange, WorkdayRangeError};

const DEFAULT_COUNTRY: &str = "us";

fn default_country() -> String {
    DEFAULT_COUNTRY.to_owned()
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error)
}

/// Where holiday data comes from and which country applies when none is
/// given.
///
/// ```json
/// { "holiday_data_dir": "data/holidays", "default_country": "us" }
/// ```
///
/// Without `holiday_data_dir` the data compiled into the crate is used.
#[derive(Clone, Debug, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    holiday_data_dir: Option<PathBuf>,
    #[serde(default = "default_country")]
    default_country: String
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            holiday_data_dir: None,
            default_country: default_country()
        }
    }
}

impl Configuration {
    pub fn new(holiday_data_dir: Option<PathBuf>, default_country: impl Into<String>) -> Configuration {
        Configuration {
            holiday_data_dir,
            default_country: default_country.into()
        }
    }

    pub fn from_reader(file_path: impl AsRef<Path>) -> Result<Configuration, ConfigurationError> {
        let file = File::open(file_path.as_ref())?;
        let reader = BufReader::new(file);
        let config: Configuration = serde_json::from_reader(reader)?;
        info!(
            path = %file_path.as_ref().display(),
            default_country = %config.default_country,
            "loaded configuration"
        );
        Ok(config)
    }

    pub fn holiday_data_dir(&self) -> Option<&Path> {
        self.holiday_data_dir.as_deref()
    }

    pub fn default_country(&self) -> &str {
        &self.default_country
    }

    pub fn spec_source(&self) -> Box<dyn HolidaySpecSource> {
        match &self.holiday_data_dir {
            Some(dir) => Box::new(DirectorySpecSource::new(dir)),
            None => Box::new(BundledSpecSource::new())
        }
    }

    /// Calendar of the default country for the current year.
    pub fn holiday_calendar(&self) -> Result<HolidayCalendar, HolidayCalendarError> {
        HolidayCalendar::new(&self.default_country, self.spec_source().as_ref())
    }

    /// Workdays of the default country between two dates, both included.
    pub fn workday_range(&self, start_date: NaiveDate, end_date: NaiveDate) -> Result<WorkdayRange, WorkdayRangeError> {
        WorkdayRange::new(start_date, end_date, &self.default_country, self.spec_source().as_ref())
    }
}
