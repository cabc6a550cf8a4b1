//! Media-type routing for tour representations.
//!
//! Reads pick a representation from the `Accept` header, creation picks a
//! payload shape from `Content-Type`. Both are explicit [`VariantTable`]s
//! built once at startup.

use axum::http::{HeaderMap, HeaderName};
use tourmgmt_core::error::CoreError;
use tourmgmt_core::negotiation::VariantTable;

/// Media types understood by the tour endpoints.
pub mod media_types {
    pub const JSON: &str = "application/json";

    pub const TOUR: &str = "application/vnd.marvin.tour+json";
    pub const TOUR_WITH_ESTIMATED_PROFITS: &str =
        "application/vnd.marvin.tourwithestimatedprofits+json";
    pub const TOUR_WITH_SHOWS: &str = "application/vnd.marvin.tourwithshows+json";
    pub const TOUR_WITH_ESTIMATED_PROFITS_AND_SHOWS: &str =
        "application/vnd.marvin.tourwithestimatedprofitsandshows+json";

    pub const TOUR_FOR_CREATION: &str = "application/vnd.marvin.tourforcreation+json";
    pub const TOUR_WITH_MANAGER_FOR_CREATION: &str =
        "application/vnd.marvin.tourwithmanagerforcreation+json";
    pub const TOUR_WITH_SHOWS_FOR_CREATION: &str =
        "application/vnd.marvin.tourwithshowsforcreation+json";
    pub const TOUR_WITH_MANAGER_AND_SHOWS_FOR_CREATION: &str =
        "application/vnd.marvin.tourwithmanagerandshowsforcreation+json";
}

/// Read representation of a single tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadVariant {
    Tour,
    TourWithEstimatedProfits,
    TourWithShows,
    TourWithEstimatedProfitsAndShows,
}

impl ReadVariant {
    /// Whether the tour must be fetched with its shows.
    pub fn includes_shows(self) -> bool {
        matches!(
            self,
            Self::TourWithShows | Self::TourWithEstimatedProfitsAndShows
        )
    }
}

/// Accepted payload shape for tour creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateVariant {
    Tour,
    TourWithManager,
    TourWithShows,
    TourWithManagerAndShows,
}

/// The routing tables used by the tour handlers.
#[derive(Debug)]
pub struct TourMediaTypes {
    pub read: VariantTable<ReadVariant>,
    pub create: VariantTable<CreateVariant>,
}

impl TourMediaTypes {
    pub fn build() -> Result<Self, CoreError> {
        use media_types::*;

        let read = VariantTable::builder()
            .variant(&[TOUR], ReadVariant::Tour)
            .variant(
                &[TOUR_WITH_ESTIMATED_PROFITS],
                ReadVariant::TourWithEstimatedProfits,
            )
            .variant(&[TOUR_WITH_SHOWS], ReadVariant::TourWithShows)
            .variant(
                &[TOUR_WITH_ESTIMATED_PROFITS_AND_SHOWS],
                ReadVariant::TourWithEstimatedProfitsAndShows,
            )
            .fallback(ReadVariant::Tour)
            .build()?;

        let create = VariantTable::builder()
            .variant(&[JSON, TOUR_FOR_CREATION], CreateVariant::Tour)
            .variant(
                &[TOUR_WITH_MANAGER_FOR_CREATION],
                CreateVariant::TourWithManager,
            )
            .variant(&[TOUR_WITH_SHOWS_FOR_CREATION], CreateVariant::TourWithShows)
            .variant(
                &[TOUR_WITH_MANAGER_AND_SHOWS_FOR_CREATION],
                CreateVariant::TourWithManagerAndShows,
            )
            .build()?;

        Ok(Self { read, create })
    }
}

/// Every value of `name` in `headers` that is valid visible ASCII.
pub fn header_values<'h>(
    headers: &'h HeaderMap,
    name: &HeaderName,
) -> impl Iterator<Item = &'h str> {
    headers
        .get_all(name)
        .into_iter()
        .filter_map(|value| value.to_str().ok())
}
