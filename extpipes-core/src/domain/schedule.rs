//! Pipeline schedule grammar
//!
//! A schedule is either one of the literals `On trigger` / `Continuous` or a
//! cron expression. An absent schedule is modelled as `Option::None` by callers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

pub const ON_TRIGGER: &str = "On trigger";
pub const CONTINUOUS: &str = "Continuous";

const MACROS: [&str; 6] = ["yearly", "annually", "monthly", "weekly", "daily", "hourly"];

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];
const DAYS: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

struct FieldSpec {
    name: &'static str,
    min: u32,
    max: u32,
    names: &'static [&'static str],
    name_offset: u32,
}

const FIELDS: [FieldSpec; 5] = [
    FieldSpec { name: "minute", min: 0, max: 59, names: &[], name_offset: 0 },
    FieldSpec { name: "hour", min: 0, max: 23, names: &[], name_offset: 0 },
    FieldSpec { name: "day-of-month", min: 1, max: 31, names: &[], name_offset: 0 },
    FieldSpec { name: "month", min: 1, max: 12, names: &MONTHS, name_offset: 1 },
    // 7 is accepted as an alias for Sunday
    FieldSpec { name: "day-of-week", min: 0, max: 7, names: &DAYS, name_offset: 0 },
];

/// Run schedule of an extraction pipeline
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Schedule {
    OnTrigger,
    Continuous,
    Cron(String),
}

impl Schedule {
    /// Parse and validate a schedule value
    pub fn parse(value: &str) -> Result<Self, ScheduleError> {
        match value {
            ON_TRIGGER => Ok(Schedule::OnTrigger),
            CONTINUOUS => Ok(Schedule::Continuous),
            expression => {
                validate_cron(expression).map_err(|reason| ScheduleError {
                    value: expression.to_string(),
                    reason,
                })?;
                Ok(Schedule::Cron(expression.to_string()))
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Schedule::OnTrigger => ON_TRIGGER,
            Schedule::Continuous => CONTINUOUS,
            Schedule::Cron(expression) => expression,
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Schedule {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Schedule::parse(&value)
    }
}

impl From<Schedule> for String {
    fn from(schedule: Schedule) -> Self {
        schedule.as_str().to_string()
    }
}

/// Validate a five-field cron expression or an `@macro`
///
/// Returns a human readable reason on failure.
pub fn validate_cron(expression: &str) -> Result<(), String> {
    let expression = expression.trim();
    if expression.is_empty() {
        return Err("empty expression".to_string());
    }

    if let Some(name) = expression.strip_prefix('@') {
        return if MACROS.contains(&name) {
            Ok(())
        } else {
            Err(format!("unknown macro '@{}'", name))
        };
    }

    let fields: Vec<&str> = expression.split_whitespace().collect();
    if fields.len() != FIELDS.len() {
        return Err(format!(
            "expected {} cron fields, found {}",
            FIELDS.len(),
            fields.len()
        ));
    }

    for (field, spec) in fields.iter().zip(FIELDS.iter()) {
        validate_field(field, spec)?;
    }

    Ok(())
}

fn validate_field(field: &str, spec: &FieldSpec) -> Result<(), String> {
    for item in field.split(',') {
        if item.is_empty() {
            return Err(format!("empty list item in {} field", spec.name));
        }

        let (base, step) = match item.split_once('/') {
            Some((base, step)) => (base, Some(step)),
            None => (item, None),
        };

        if let Some(step) = step {
            match step.parse::<u32>() {
                Ok(n) if n > 0 => {}
                _ => return Err(format!("invalid step '{}' in {} field", step, spec.name)),
            }
        }

        if base == "*" {
            continue;
        }

        match base.split_once('-') {
            Some((start, end)) => {
                let start = parse_value(start, spec)?;
                let end = parse_value(end, spec)?;
                if start > end {
                    return Err(format!(
                        "range '{}' is reversed in {} field",
                        base, spec.name
                    ));
                }
            }
            None => {
                parse_value(base, spec)?;
            }
        }
    }

    Ok(())
}

fn parse_value(token: &str, spec: &FieldSpec) -> Result<u32, String> {
    let value = match token.parse::<u32>() {
        Ok(n) => n,
        Err(_) => spec
            .names
            .iter()
            .position(|name| name.eq_ignore_ascii_case(token))
            .map(|index| index as u32 + spec.name_offset)
            .ok_or_else(|| format!("invalid value '{}' in {} field", token, spec.name))?,
    };

    if value < spec.min || value > spec.max {
        return Err(format!(
            "value {} out of range {}-{} in {} field",
            value, spec.min, spec.max, spec.name
        ));
    }

    Ok(value)
}
