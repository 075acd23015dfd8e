//! Decoding of attribute values.

use std::str::FromStr;

use chrono::DateTime;
use osmflow_core::Position;

use crate::{Location, ReadError};

fn invalid(attribute: &str, value: &str, at: Location) -> ReadError {
    ReadError::InvalidValue {
        attribute: attribute.to_owned(),
        value: value.to_owned(),
        line: at.line,
        column: at.column,
    }
}

/// Parse a numeric attribute.
pub(super) fn number<T: FromStr>(attribute: &str, value: &str, at: Location) -> Result<T, ReadError> {
    value.trim().parse().map_err(|_| invalid(attribute, value, at))
}

/// Parse a coordinate in degrees, rejecting values a [`Position`] cannot hold.
pub(super) fn coordinate(attribute: &str, value: &str, at: Location) -> Result<f64, ReadError> {
    let degrees: f64 = number(attribute, value, at)?;
    if Position::representable(degrees) {
        Ok(degrees)
    } else {
        Err(invalid(attribute, value, at))
    }
}

/// Parse `true` or `false`.
pub(super) fn boolean(attribute: &str, value: &str, at: Location) -> Result<bool, ReadError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid(attribute, value, at)),
    }
}

/// Parse an RFC 3339 timestamp into seconds since the Unix epoch.
pub(super) fn timestamp(attribute: &str, value: &str, at: Location) -> Result<i64, ReadError> {
    DateTime::parse_from_rfc3339(value)
        .map(|time| time.timestamp())
        .map_err(|_| invalid(attribute, value, at))
}
