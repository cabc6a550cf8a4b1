//! Wire representations of tours and their conversions to and from storage
//! entities. Every conversion is written out per variant.

pub mod creation;
pub mod show;
pub mod tour;
pub mod update;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use tourmgmt_core::types::ManagerId;
use uuid::Uuid;
use validator::ValidationError;

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// A tour may not end before it starts.
pub(crate) fn check_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if end < start {
        return Err(validation_error(
            "startDateBeforeEndDate",
            "startDateBeforeEndDate|The start date should be before the end date.",
        ));
    }
    Ok(())
}

pub(crate) fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(validation_error(
            "range",
            "range|Estimated profits cannot be negative.",
        ));
    }
    Ok(())
}

/// Read an optional manager id, treating `null` and blank strings as absent.
pub(crate) fn optional_manager_id<'de, D>(deserializer: D) -> Result<Option<ManagerId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(id) => Uuid::parse_str(id)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
