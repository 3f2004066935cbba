use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::time::holidayrule::holidayspec::HolidaySpec;

const US_HOLIDAYS: &str = include_str!("../../../data/holidays/us.json");
const GB_HOLIDAYS: &str = include_str!("../../../data/holidays/gb.json");

#[derive(Debug, Error)]
pub enum SpecSourceError {
    #[error("no accessible holiday data for '{country}'")]
    UnknownCountry {
        country: String
    },

    #[error("invalid holiday data for '{country}': {message}")]
    MalformedSpecData {
        country: String,
        message: String
    }
}

/// Supplies the declared holidays of a country.
pub trait HolidaySpecSource {
    fn fetch(&self, country: &str) -> Result<Vec<HolidaySpec>, SpecSourceError>;
}

fn is_country_code(country: &str) -> bool {
    !country.is_empty()
        && country
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

fn validate(country: &str, specs: Vec<HolidaySpec>) -> Result<Vec<HolidaySpec>, SpecSourceError> {
    if specs.is_empty() {
        return Err(SpecSourceError::MalformedSpecData {
            country: country.to_owned(),
            message: "no holidays declared".to_owned()
        });
    }
    info!(country, holidays = specs.len(), "loaded holiday specs");
    Ok(specs)
}

fn malformed(country: &str, error: serde_json::Error) -> SpecSourceError {
    warn!(country, %error, "rejected holiday data");
    SpecSourceError::MalformedSpecData {
        country: country.to_owned(),
        message: error.to_string()
    }
}

fn unknown(country: &str) -> SpecSourceError {
    warn!(country, "no holiday data for country");
    SpecSourceError::UnknownCountry { country: country.to_owned() }
}

/// Reads `<dir>/<country>.json`.
pub struct DirectorySpecSource {
    dir: PathBuf
}

impl DirectorySpecSource {
    pub fn new(dir: impl Into<PathBuf>) -> DirectorySpecSource {
        DirectorySpecSource { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl HolidaySpecSource for DirectorySpecSource {
    fn fetch(&self, country: &str) -> Result<Vec<HolidaySpec>, SpecSourceError> {
        if !is_country_code(country) {
            return Err(unknown(country));
        }
        let file_path = self.dir.join(format!("{}.json", country));
        let file = File::open(&file_path).map_err(|_| unknown(country))?;
        let reader = BufReader::new(file);
        let specs: Vec<HolidaySpec> = serde_json::from_reader(reader).map_err(|error| malformed(country, error))?;
        validate(country, specs)
    }
}

/// Holiday data compiled into the crate, plus any documents registered at
/// runtime.
#[derive(Clone)]
pub struct BundledSpecSource {
    documents: HashMap<String, String>
}

impl Default for BundledSpecSource {
    fn default() -> Self {
        BundledSpecSource::new()
    }
}

impl BundledSpecSource {
    pub fn new() -> BundledSpecSource {
        let mut documents = HashMap::new();
        documents.insert("us".to_owned(), US_HOLIDAYS.to_owned());
        documents.insert("gb".to_owned(), GB_HOLIDAYS.to_owned());
        BundledSpecSource { documents }
    }

    /// Registers (or replaces) the JSON document served for `country`.
    pub fn with_country(mut self, country: impl Into<String>, json: impl Into<String>) -> BundledSpecSource {
        self.documents.insert(country.into(), json.into());
        self
    }

    pub fn countries(&self) -> Vec<&str> {
        let mut countries: Vec<&str> = self.documents.keys().map(String::as_str).collect();
        countries.sort_unstable();
        countries
    }
}

impl HolidaySpecSource for BundledSpecSource {
    fn fetch(&self, country: &str) -> Result<Vec<HolidaySpec>, SpecSourceError> {
        let document = self.documents.get(country).ok_or_else(|| unknown(country))?;
        let specs: Vec<HolidaySpec> = serde_json::from_str(document).map_err(|error| malformed(country, error))?;
        validate(country, specs)
    }
}
