//! Tour storage behind a unit-of-work style interface.
//!
//! Reads go straight through [`TourRepository`]. Writes are staged on a
//! [`TourUnitOfWork`] obtained from [`TourRepository::begin`] and only become
//! visible once [`TourUnitOfWork::save`] succeeds.

use async_trait::async_trait;
use tourmgmt_core::types::TourId;

use crate::models::tour::Tour;

pub mod in_memory;
pub mod tour_repo;

pub use in_memory::InMemoryTourRepository;
pub use tour_repo::PgTourRepository;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),
}

pub type RepoResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait TourRepository: Send + Sync {
    /// All tours without shows, ordered by start date then name.
    async fn get_tours(&self) -> RepoResult<Vec<Tour>>;

    /// One tour. Shows are loaded, ordered by date, only when `include_shows`.
    async fn get_tour(&self, id: TourId, include_shows: bool) -> RepoResult<Option<Tour>>;

    /// Start a unit of work for staged writes.
    async fn begin(&self) -> RepoResult<Box<dyn TourUnitOfWork>>;

    /// Confirm the backing store is reachable.
    async fn health_check(&self) -> RepoResult<()>;
}

#[async_trait]
pub trait TourUnitOfWork: Send {
    /// Stage a new tour together with its shows.
    async fn add_tour(&mut self, tour: &Tour) -> RepoResult<()>;

    /// Stage an update of the tour's scalar fields. Shows are left untouched.
    async fn update_tour(&mut self, tour: &Tour) -> RepoResult<()>;

    /// Commit staged work. Returns `Ok(false)` when nothing was written.
    async fn save(self: Box<Self>) -> RepoResult<bool>;
}
