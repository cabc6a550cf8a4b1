use std::sync::Arc;

use tourmgmt_db::repositories::TourRepository;

use crate::negotiation::TourMediaTypes;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Tour storage.
    pub repo: Arc<dyn TourRepository>,
    /// Media-type routing tables for tour representations.
    pub media_types: Arc<TourMediaTypes>,
}
