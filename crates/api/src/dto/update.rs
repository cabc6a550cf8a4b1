use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tourmgmt_db::models::tour::Tour;
use validator::{Validate, ValidationError};

use super::check_date_range;

/// The patchable view of a tour.
///
/// Patch documents are applied to this shape, never to the entity, so only
/// these fields can change through `PATCH`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[validate(schema(function = "tour_for_update_dates", skip_on_field_errors = false))]
pub struct TourForUpdate {
    #[validate(
        required(message = "required|A tour name is required."),
        length(min = 1, max = 200, message = "length|A tour name must be between 1 and 200 characters.")
    )]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "maxLength|A description has a maximum of 2000 characters."))]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl TourForUpdate {
    pub const OBJECT_KEY: &'static str = "tourForUpdate";

    /// Copy the patched fields onto `tour`.
    pub fn apply_to(self, tour: &mut Tour) {
        tour.name = self.name.unwrap_or_default();
        tour.description = self.description;
        tour.start_date = self.start_date;
        tour.end_date = self.end_date;
        tour.updated_at = Utc::now();
    }
}

impl From<&Tour> for TourForUpdate {
    fn from(tour: &Tour) -> Self {
        Self {
            name: Some(tour.name.clone()),
            description: tour.description.clone(),
            start_date: tour.start_date,
            end_date: tour.end_date,
        }
    }
}

fn tour_for_update_dates(tour: &TourForUpdate) -> Result<(), ValidationError> {
    check_date_range(tour.start_date, tour.end_date)
}
