//! PostgreSQL implementation of [`TourRepository`].

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tourmgmt_core::types::TourId;

use super::{RepoResult, TourRepository, TourUnitOfWork};
use crate::models::tour::{Show, Tour};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, manager_id, name, description, start_date, end_date, \
     estimated_profits, created_at, updated_at";

const SHOW_COLUMNS: &str = "id, tour_id, date, venue, city, country";

/// Tour storage on a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgTourRepository {
    pool: PgPool,
}

impl PgTourRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn shows_for(&self, tour_id: TourId) -> Result<Vec<Show>, sqlx::Error> {
        let query =
            format!("SELECT {SHOW_COLUMNS} FROM shows WHERE tour_id = $1 ORDER BY date, id");
        sqlx::query_as::<_, Show>(&query)
            .bind(tour_id)
            .fetch_all(&self.pool)
            .await
    }
}

#[async_trait]
impl TourRepository for PgTourRepository {
    async fn get_tours(&self) -> RepoResult<Vec<Tour>> {
        let query = format!("SELECT {COLUMNS} FROM tours ORDER BY start_date, name");
        let tours = sqlx::query_as::<_, Tour>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(tours)
    }

    async fn get_tour(&self, id: TourId, include_shows: bool) -> RepoResult<Option<Tour>> {
        let query = format!("SELECT {COLUMNS} FROM tours WHERE id = $1");
        let tour = sqlx::query_as::<_, Tour>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match tour {
            Some(mut tour) if include_shows => {
                tour.shows = self.shows_for(id).await?;
                Ok(Some(tour))
            }
            other => Ok(other),
        }
    }

    async fn begin(&self) -> RepoResult<Box<dyn TourUnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTourUnitOfWork {
            tx,
            rows_written: 0,
        }))
    }

    async fn health_check(&self) -> RepoResult<()> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}

/// Writes staged inside one database transaction.
struct PgTourUnitOfWork {
    tx: Transaction<'static, Postgres>,
    rows_written: u64,
}

#[async_trait]
impl TourUnitOfWork for PgTourUnitOfWork {
    async fn add_tour(&mut self, tour: &Tour) -> RepoResult<()> {
        let result = sqlx::query(
            "INSERT INTO tours (id, manager_id, name, description, start_date, end_date,
                                estimated_profits, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(tour.id)
        .bind(tour.manager_id)
        .bind(&tour.name)
        .bind(&tour.description)
        .bind(tour.start_date)
        .bind(tour.end_date)
        .bind(tour.estimated_profits)
        .bind(tour.created_at)
        .bind(tour.updated_at)
        .execute(&mut *self.tx)
        .await?;
        self.rows_written += result.rows_affected();

        for show in &tour.shows {
            let result = sqlx::query(
                "INSERT INTO shows (id, tour_id, date, venue, city, country)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(show.id)
            .bind(tour.id)
            .bind(show.date)
            .bind(&show.venue)
            .bind(&show.city)
            .bind(&show.country)
            .execute(&mut *self.tx)
            .await?;
            self.rows_written += result.rows_affected();
        }

        tracing::debug!(tour_id = %tour.id, shows = tour.shows.len(), "Staged tour insert");
        Ok(())
    }

    async fn update_tour(&mut self, tour: &Tour) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE tours SET
                manager_id = $2,
                name = $3,
                description = $4,
                start_date = $5,
                end_date = $6,
                estimated_profits = $7,
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(tour.id)
        .bind(tour.manager_id)
        .bind(&tour.name)
        .bind(&tour.description)
        .bind(tour.start_date)
        .bind(tour.end_date)
        .bind(tour.estimated_profits)
        .execute(&mut *self.tx)
        .await?;
        self.rows_written += result.rows_affected();

        tracing::debug!(tour_id = %tour.id, "Staged tour update");
        Ok(())
    }

    async fn save(self: Box<Self>) -> RepoResult<bool> {
        let this = *self;
        if this.rows_written == 0 {
            this.tx.rollback().await?;
            return Ok(false);
        }
        this.tx.commit().await?;
        Ok(true)
    }
}
