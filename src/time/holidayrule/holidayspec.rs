use serde::Deserialize;

use super::holidayruleerror::HolidayRuleError;

/// How a holiday's date is derived for a given year.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HolidayRule {
    /// Month-day fragment such as `"07-04"`, combined with the active year.
    FixedDate(String),
    /// Weekday / month pattern or Easter-relative text such as
    /// `"third Monday of January"`.
    FloatingRule(String)
}

impl HolidayRule {
    pub fn when(&self) -> &str {
        match self {
            HolidayRule::FixedDate(when) | HolidayRule::FloatingRule(when) => when
        }
    }
}

/// One declared holiday of a country.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "HolidaySpecJsonProp")]
pub struct HolidaySpec {
    name: String,
    rule: HolidayRule
}

#[derive(Deserialize)]
struct HolidaySpecJsonProp {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    when: String
}

impl TryFrom<HolidaySpecJsonProp> for HolidaySpec {
    type Error = HolidayRuleError;

    fn try_from(json_prop: HolidaySpecJsonProp) -> Result<Self, Self::Error> {
        let rule = match json_prop.kind.as_str() {
            "date" => HolidayRule::FixedDate(json_prop.when),
            "day" => HolidayRule::FloatingRule(json_prop.when),
            _ => {
                return Err(HolidayRuleError::UnsupportedRuleKind {
                    name: json_prop.name,
                    kind: json_prop.kind
                })
            }
        };
        Ok(HolidaySpec { name: json_prop.name, rule })
    }
}

impl HolidaySpec {
    pub fn new(name: impl Into<String>, rule: HolidayRule) -> HolidaySpec {
        HolidaySpec { name: name.into(), rule }
    }

    pub fn fixed_date(name: impl Into<String>, month_day: impl Into<String>) -> HolidaySpec {
        HolidaySpec::new(name, HolidayRule::FixedDate(month_day.into()))
    }

    pub fn floating(name: impl Into<String>, text: impl Into<String>) -> HolidaySpec {
        HolidaySpec::new(name, HolidayRule::FloatingRule(text.into()))
    }

    /// Decodes a single `{name, type, when}` record.
    ///
    /// An unknown `type` is reported as `UnsupportedRuleKind`, any other
    /// shape problem as `InvalidSpec`.
    pub fn from_json(json_value: serde_json::Value) -> Result<HolidaySpec, HolidayRuleError> {
        let json_prop: HolidaySpecJsonProp = serde_json::from_value(json_value)?;
        HolidaySpec::try_from(json_prop)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rule(&self) -> &HolidayRule {
        &self.rule
    }

    pub fn observed_name(&self) -> String {
        format!("{} (Observed)", self.name)
    }
}
