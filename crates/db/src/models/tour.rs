//! Tour and show entities as stored.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;
use tourmgmt_core::types::{ManagerId, ShowId, Timestamp, TourId};

/// A row from the `tours` table, optionally with its shows loaded.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Tour {
    pub id: TourId,
    pub manager_id: ManagerId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub estimated_profits: Decimal,
    /// Empty unless the tour was fetched with shows included.
    #[sqlx(skip)]
    pub shows: Vec<Show>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `shows` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Show {
    pub id: ShowId,
    pub tour_id: TourId,
    pub date: NaiveDate,
    pub venue: String,
    pub city: Option<String>,
    pub country: Option<String>,
}
