//! Creation payloads, one per `Content-Type` variant.
//!
//! All four shapes map onto the same [`Tour`] entity. A tour created without
//! a manager (or with the nil id) is assigned the fallback manager.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tourmgmt_core::types::{manager_or_fallback, ManagerId};
use tourmgmt_db::models::tour::Tour;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::show::ShowForCreation;
use super::{check_date_range, optional_manager_id, validate_non_negative};

/// A payload that can be validated and turned into a new tour entity.
pub trait TourCreation: DeserializeOwned + Validate {
    /// Key under which struct-level validation errors are reported.
    const OBJECT_KEY: &'static str;

    /// Convert a validated payload into the entity to insert.
    fn into_tour(self) -> Tour;
}

/// Access to the date range every creation payload carries.
trait TourDates {
    fn dates(&self) -> (NaiveDate, NaiveDate);
}

impl<T: TourDates + ?Sized> TourDates for &T {
    fn dates(&self) -> (NaiveDate, NaiveDate) {
        (**self).dates()
    }
}

fn tour_dates<T: TourDates>(tour: &T) -> Result<(), ValidationError> {
    let (start, end) = tour.dates();
    check_date_range(start, end)
}

/// Declares a creation payload with the fields and constraints shared by
/// every variant, plus an optional manager and show list.
macro_rules! creation_payload {
    (
        $(#[$doc:meta])*
        $name:ident {
            $(manager: $manager:ident,)?
            $(shows: $shows:ident,)?
        }
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Deserialize, Validate)]
        #[serde(rename_all = "camelCase")]
        #[validate(schema(function = "tour_dates", skip_on_field_errors = false))]
        pub struct $name {
            #[validate(
                required(message = "required|A tour name is required."),
                length(min = 1, max = 200, message = "length|A tour name must be between 1 and 200 characters.")
            )]
            pub name: Option<String>,
            #[validate(length(max = 2000, message = "maxLength|A description has a maximum of 2000 characters."))]
            pub description: Option<String>,
            pub start_date: NaiveDate,
            pub end_date: NaiveDate,
            // Validation error keys ignore `rename_all`.
            #[serde(default, rename = "estimatedProfits")]
            #[validate(custom(function = "validate_non_negative"))]
            pub estimated_profits: Decimal,
            $(
                #[serde(default, deserialize_with = "optional_manager_id")]
                pub $manager: Option<ManagerId>,
            )?
            $(
                #[serde(default)]
                #[validate(nested)]
                pub $shows: Vec<ShowForCreation>,
            )?
        }

        impl TourDates for $name {
            fn dates(&self) -> (NaiveDate, NaiveDate) {
                (self.start_date, self.end_date)
            }
        }
    };
}

creation_payload! {
    /// `application/vnd.marvin.tourforcreation+json`
    TourForCreation {}
}

creation_payload! {
    /// `application/vnd.marvin.tourwithmanagerforcreation+json`
    TourWithManagerForCreation {
        manager: manager_id,
    }
}

creation_payload! {
    /// `application/vnd.marvin.tourwithshowsforcreation+json`
    TourWithShowsForCreation {
        shows: shows,
    }
}

creation_payload! {
    /// `application/vnd.marvin.tourwithmanagerandshowsforcreation+json`
    TourWithManagerAndShowsForCreation {
        manager: manager_id,
        shows: shows,
    }
}

/// Fields shared by every creation payload.
struct NewTour {
    name: Option<String>,
    description: Option<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    estimated_profits: Decimal,
}

impl NewTour {
    fn into_tour(self, manager_id: Option<ManagerId>, shows: Vec<ShowForCreation>) -> Tour {
        let id = Uuid::new_v4();
        let now = Utc::now();
        Tour {
            id,
            manager_id: manager_or_fallback(manager_id),
            name: self.name.unwrap_or_default(),
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            estimated_profits: self.estimated_profits,
            shows: shows.into_iter().map(|show| show.into_show(id)).collect(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl TourCreation for TourForCreation {
    const OBJECT_KEY: &'static str = "tourForCreation";

    fn into_tour(self) -> Tour {
        NewTour {
            name: self.name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            estimated_profits: self.estimated_profits,
        }
        .into_tour(None, Vec::new())
    }
}

impl TourCreation for TourWithManagerForCreation {
    const OBJECT_KEY: &'static str = "tourWithManagerForCreation";

    fn into_tour(self) -> Tour {
        NewTour {
            name: self.name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            estimated_profits: self.estimated_profits,
        }
        .into_tour(self.manager_id, Vec::new())
    }
}

impl TourCreation for TourWithShowsForCreation {
    const OBJECT_KEY: &'static str = "tourWithShowsForCreation";

    fn into_tour(self) -> Tour {
        NewTour {
            name: self.name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            estimated_profits: self.estimated_profits,
        }
        .into_tour(None, self.shows)
    }
}

impl TourCreation for TourWithManagerAndShowsForCreation {
    const OBJECT_KEY: &'static str = "tourWithManagerAndShowsForCreation";

    fn into_tour(self) -> Tour {
        NewTour {
            name: self.name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            estimated_profits: self.estimated_profits,
        }
        .into_tour(self.manager_id, self.shows)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tourmgmt_core::types::FALLBACK_MANAGER_ID;
    use tourmgmt_core::validation::ValidationResult;

    use super::*;

    fn parse<T: TourCreation>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    fn errors_of<T: TourCreation>(payload: &T) -> ValidationResult {
        let errors = payload.validate().unwrap_err();
        ValidationResult::from_validation_errors(&errors, T::OBJECT_KEY)
    }

    #[test]
    fn minimal_payload_gets_fallback_manager() {
        let payload: TourForCreation = parse(json!({
            "name": "Winter Leg",
            "startDate": "2025-01-10",
            "endDate": "2025-01-20",
        }));
        assert!(payload.validate().is_ok());

        let tour = payload.into_tour();
        assert_eq!(tour.manager_id, FALLBACK_MANAGER_ID);
        assert_eq!(tour.name, "Winter Leg");
        assert_eq!(tour.estimated_profits, Decimal::ZERO);
        assert!(tour.shows.is_empty());
    }

    #[test]
    fn supplied_manager_is_preserved() {
        let manager = Uuid::new_v4();
        let payload: TourWithManagerForCreation = parse(json!({
            "name": "Managed",
            "startDate": "2025-01-10",
            "endDate": "2025-01-20",
            "managerId": manager,
        }));
        assert_eq!(payload.into_tour().manager_id, manager);
    }

    #[test]
    fn nil_manager_gets_fallback() {
        let payload: TourWithManagerForCreation = parse(json!({
            "name": "Nil",
            "startDate": "2025-01-10",
            "endDate": "2025-01-20",
            "managerId": Uuid::nil(),
        }));
        assert_eq!(payload.into_tour().manager_id, FALLBACK_MANAGER_ID);
    }

    #[test]
    fn absent_or_blank_manager_gets_fallback() {
        let absent: TourWithManagerAndShowsForCreation = parse(json!({
            "name": "Unmanaged",
            "startDate": "2025-01-10",
            "endDate": "2025-01-20",
        }));
        assert_eq!(absent.manager_id, None);
        assert_eq!(absent.into_tour().manager_id, FALLBACK_MANAGER_ID);

        let blank: TourWithManagerForCreation = parse(json!({
            "name": "Blank",
            "startDate": "2025-01-10",
            "endDate": "2025-01-20",
            "managerId": "",
        }));
        assert_eq!(blank.into_tour().manager_id, FALLBACK_MANAGER_ID);
    }

    #[test]
    fn date_check_runs_for_every_variant() {
        let body = json!({
            "name": "Backwards",
            "startDate": "2025-01-20",
            "endDate": "2025-01-10",
        });
        let manager: TourWithManagerForCreation = parse(body.clone());
        assert!(errors_of(&manager).contains_key("tourWithManagerForCreation"));
        let shows: TourWithShowsForCreation = parse(body.clone());
        assert!(errors_of(&shows).contains_key("tourWithShowsForCreation"));
        let both: TourWithManagerAndShowsForCreation = parse(body);
        assert!(errors_of(&both).contains_key("tourWithManagerAndShowsForCreation"));
    }

    #[test]
    fn shows_are_attached_to_new_tour() {
        let payload: TourWithManagerAndShowsForCreation = parse(json!({
            "name": "With Shows",
            "startDate": "2025-03-01",
            "endDate": "2025-03-05",
            "managerId": Uuid::new_v4(),
            "shows": [
                { "date": "2025-03-01", "venue": "Vega", "city": "Copenhagen" },
                { "date": "2025-03-03", "venue": "Tivoli" },
            ],
        }));
        assert!(payload.validate().is_ok());

        let tour = payload.into_tour();
        assert_eq!(tour.shows.len(), 2);
        assert!(tour.shows.iter().all(|show| show.tour_id == tour.id));
        assert_eq!(tour.shows[1].venue, "Tivoli");
    }

    #[test]
    fn missing_name_is_a_required_error() {
        let payload: TourForCreation = parse(json!({
            "startDate": "2025-01-10",
            "endDate": "2025-01-20",
        }));
        let result = errors_of(&payload);
        let name = result.get("name").unwrap();
        assert_eq!(name[0].validator_key.as_deref(), Some("required"));
        assert_eq!(name[0].message, "A tour name is required.");
    }

    #[test]
    fn reversed_dates_are_reported_on_the_payload() {
        let payload: TourForCreation = parse(json!({
            "name": "Backwards",
            "startDate": "2025-01-20",
            "endDate": "2025-01-10",
        }));
        let result = errors_of(&payload);
        let dates = result.get("tourForCreation").unwrap();
        assert_eq!(dates[0].validator_key.as_deref(), Some("startDateBeforeEndDate"));
    }

    #[test]
    fn negative_profits_are_rejected() {
        let payload: TourForCreation = parse(json!({
            "name": "Loss",
            "startDate": "2025-01-10",
            "endDate": "2025-01-20",
            "estimatedProfits": "-10.00",
        }));
        let result = errors_of(&payload);
        assert!(result.contains_key("estimatedProfits"));
    }

    #[test]
    fn invalid_show_is_keyed_by_index() {
        let payload: TourWithShowsForCreation = parse(json!({
            "name": "Bad Show",
            "startDate": "2025-03-01",
            "endDate": "2025-03-05",
            "shows": [
                { "date": "2025-03-01", "venue": "Fine" },
                { "date": "2025-03-02" },
            ],
        }));
        let result = errors_of(&payload);
        let venue = result.get("shows[1].venue").unwrap();
        assert_eq!(venue[0].validator_key.as_deref(), Some("required"));
        assert!(!result.contains_key("shows[0].venue"));
    }
}
