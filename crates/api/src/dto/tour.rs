//! Read representations of a tour, one per `Accept` variant.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tourmgmt_core::types::{ManagerId, TourId};
use tourmgmt_db::models::tour::Tour;

use super::show::ShowDto;

/// Base representation returned by list, default read and create.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourDto {
    pub tour_id: TourId,
    pub manager_id: ManagerId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Inclusive number of days between start and end.
    pub duration_days: i64,
}

impl From<&Tour> for TourDto {
    fn from(tour: &Tour) -> Self {
        Self {
            tour_id: tour.id,
            manager_id: tour.manager_id,
            name: tour.name.clone(),
            description: tour.description.clone(),
            start_date: tour.start_date,
            end_date: tour.end_date,
            duration_days: (tour.end_date - tour.start_date).num_days() + 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourWithEstimatedProfitsDto {
    #[serde(flatten)]
    pub tour: TourDto,
    pub estimated_profits: Decimal,
}

impl From<&Tour> for TourWithEstimatedProfitsDto {
    fn from(tour: &Tour) -> Self {
        Self {
            tour: TourDto::from(tour),
            estimated_profits: tour.estimated_profits,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourWithShowsDto {
    #[serde(flatten)]
    pub tour: TourDto,
    pub shows: Vec<ShowDto>,
}

impl From<&Tour> for TourWithShowsDto {
    fn from(tour: &Tour) -> Self {
        Self {
            tour: TourDto::from(tour),
            shows: tour.shows.iter().map(ShowDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourWithEstimatedProfitsAndShowsDto {
    #[serde(flatten)]
    pub tour: TourDto,
    pub estimated_profits: Decimal,
    pub shows: Vec<ShowDto>,
}

impl From<&Tour> for TourWithEstimatedProfitsAndShowsDto {
    fn from(tour: &Tour) -> Self {
        Self {
            tour: TourDto::from(tour),
            estimated_profits: tour.estimated_profits,
            shows: tour.shows.iter().map(ShowDto::from).collect(),
        }
    }
}
