use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tourmgmt_core::types::{ShowId, TourId};
use tourmgmt_db::models::tour::Show;
use uuid::Uuid;
use validator::Validate;

/// Show summary embedded in tour read representations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowDto {
    pub show_id: ShowId,
    pub date: NaiveDate,
    pub venue: String,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl From<&Show> for ShowDto {
    fn from(show: &Show) -> Self {
        Self {
            show_id: show.id,
            date: show.date,
            venue: show.venue.clone(),
            city: show.city.clone(),
            country: show.country.clone(),
        }
    }
}

/// A show supplied inline when creating a tour.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShowForCreation {
    pub date: NaiveDate,
    #[validate(
        required(message = "required|A venue is required."),
        length(min = 1, max = 200, message = "length|A venue must be between 1 and 200 characters.")
    )]
    pub venue: Option<String>,
    #[validate(length(max = 100, message = "maxLength|A city has a maximum of 100 characters."))]
    pub city: Option<String>,
    #[validate(length(max = 100, message = "maxLength|A country has a maximum of 100 characters."))]
    pub country: Option<String>,
}

impl ShowForCreation {
    /// Convert a validated show into its entity.
    pub fn into_show(self, tour_id: TourId) -> Show {
        Show {
            id: Uuid::new_v4(),
            tour_id,
            date: self.date,
            venue: self.venue.unwrap_or_default(),
            city: self.city,
            country: self.country,
        }
    }
}
