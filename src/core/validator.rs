use crate::domain::model::{Coordinates, NewSchool, SchoolSubmission};
use crate::domain::ports::DuplicateLookup;
use crate::utils::error::{Result, SchoolError};
use crate::utils::validation::printable_char_count;
use serde_json::Value;

pub const MIN_NAME_LEN: usize = 3;
pub const MIN_ADDRESS_LEN: usize = 5;

const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Absent, JSON null and blank text all count as missing.
fn require<'a>(field: &str, value: Option<&'a Value>) -> Result<&'a Value> {
    match value {
        None | Some(Value::Null) => Err(SchoolError::MissingField {
            field: field.to_string(),
        }),
        Some(Value::String(s)) if s.trim().is_empty() => Err(SchoolError::MissingField {
            field: field.to_string(),
        }),
        Some(v) => Ok(v),
    }
}

/// Parses a numeric or numeric-text value. Callers check presence first.
fn parse_number(field: &str, value: &Value) -> Result<f64> {
    let not_a_number = || SchoolError::NotANumber {
        field: field.to_string(),
        value: value.to_string(),
    };

    let parsed = match value {
        // Keeps the literal text, so 1e400 becomes inf rather than a parse failure.
        Value::Number(n) => n.to_string().parse::<f64>().map_err(|_| not_a_number())?,
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| not_a_number())?,
        _ => return Err(not_a_number()),
    };

    if parsed.is_nan() {
        return Err(not_a_number());
    }
    Ok(parsed)
}

/// Like [`parse_number`], but a missing value is `None` instead of an error.
pub(crate) fn optional_number(field: &str, value: Option<&Value>) -> Result<Option<f64>> {
    match require(field, value) {
        Ok(v) => parse_number(field, v).map(Some),
        Err(SchoolError::MissingField { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

fn check_range(field: &str, value: f64, (min, max): (f64, f64)) -> Result<f64> {
    if !value.is_finite() || value < min || value > max {
        return Err(SchoolError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            min,
            max,
        });
    }
    Ok(value)
}

pub fn validate_coordinates(
    latitude: Option<&Value>,
    longitude: Option<&Value>,
) -> Result<Coordinates> {
    let latitude = require("latitude", latitude)?;
    let longitude = require("longitude", longitude)?;

    let latitude = check_range(
        "latitude",
        parse_number("latitude", latitude)?,
        LATITUDE_RANGE,
    )?;
    let longitude = check_range(
        "longitude",
        parse_number("longitude", longitude)?,
        LONGITUDE_RANGE,
    )?;

    Ok(Coordinates::new(latitude, longitude))
}

fn text_with_min_len(value: Option<&Value>, min_len: usize) -> Option<String> {
    let text = value?.as_str()?;
    (printable_char_count(text) >= min_len).then(|| text.trim().to_string())
}

fn describe(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Validates a create-school submission and returns it normalized.
///
/// Checks run name, address, coordinates, duplicate; the first failure wins.
/// The duplicate check is the only step that touches storage.
pub async fn validate_school<L>(submission: &SchoolSubmission, lookup: &L) -> Result<NewSchool>
where
    L: DuplicateLookup + ?Sized,
{
    let name = text_with_min_len(submission.name.as_ref(), MIN_NAME_LEN).ok_or_else(|| {
        SchoolError::InvalidName {
            value: describe(submission.name.as_ref()),
        }
    })?;

    let address = text_with_min_len(submission.address.as_ref(), MIN_ADDRESS_LEN).ok_or_else(
        || SchoolError::InvalidAddress {
            value: describe(submission.address.as_ref()),
        },
    )?;

    let coordinates =
        validate_coordinates(submission.latitude.as_ref(), submission.longitude.as_ref())?;

    tracing::debug!("Checking for existing school '{}' at '{}'", name, address);
    let exists = lookup
        .exists_by_name_address(&name, &address)
        .await
        .map_err(|e| SchoolError::StoreUnavailable {
            message: e.to_string(),
        })?;

    if exists {
        return Err(SchoolError::DuplicateRecord { name, address });
    }

    Ok(NewSchool {
        name,
        address,
        coordinates,
    })
}
