//! Process-local [`TourRepository`] used by tests and database-less runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tourmgmt_core::types::TourId;

use super::{RepoResult, RepositoryError, TourRepository, TourUnitOfWork};
use crate::models::tour::Tour;

#[derive(Debug, Default)]
struct Store {
    tours: RwLock<Vec<Tour>>,
    fail_saves: AtomicBool,
}

/// Tours held in memory. Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTourRepository {
    store: Arc<Store>,
}

impl InMemoryTourRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository pre-populated with `tours`.
    pub fn with_tours(tours: Vec<Tour>) -> Self {
        let store = Store {
            tours: RwLock::new(tours),
            fail_saves: AtomicBool::new(false),
        };
        Self {
            store: Arc::new(store),
        }
    }

    /// Make every subsequent [`TourUnitOfWork::save`] report failure.
    pub fn set_fail_saves(&self, fail: bool) {
        self.store.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Every stored tour including its shows, in insertion order.
    pub async fn snapshot(&self) -> Vec<Tour> {
        self.store.tours.read().await.clone()
    }
}

fn without_shows(tour: &Tour) -> Tour {
    Tour {
        shows: Vec::new(),
        ..tour.clone()
    }
}

#[async_trait]
impl TourRepository for InMemoryTourRepository {
    async fn get_tours(&self) -> RepoResult<Vec<Tour>> {
        let mut tours: Vec<Tour> = self
            .store
            .tours
            .read()
            .await
            .iter()
            .map(without_shows)
            .collect();
        tours.sort_by(|a, b| (a.start_date, &a.name).cmp(&(b.start_date, &b.name)));
        Ok(tours)
    }

    async fn get_tour(&self, id: TourId, include_shows: bool) -> RepoResult<Option<Tour>> {
        let tours = self.store.tours.read().await;
        let tour = tours.iter().find(|tour| tour.id == id).map(|tour| {
            if include_shows {
                let mut tour = tour.clone();
                tour.shows.sort_by(|a, b| (a.date, a.id).cmp(&(b.date, b.id)));
                tour
            } else {
                without_shows(tour)
            }
        });
        Ok(tour)
    }

    async fn begin(&self) -> RepoResult<Box<dyn TourUnitOfWork>> {
        Ok(Box::new(InMemoryUnitOfWork {
            store: Arc::clone(&self.store),
            staged: Vec::new(),
        }))
    }

    async fn health_check(&self) -> RepoResult<()> {
        Ok(())
    }
}

#[derive(Debug)]
enum Staged {
    Insert(Tour),
    Update(Tour),
}

struct InMemoryUnitOfWork {
    store: Arc<Store>,
    staged: Vec<Staged>,
}

#[async_trait]
impl TourUnitOfWork for InMemoryUnitOfWork {
    async fn add_tour(&mut self, tour: &Tour) -> RepoResult<()> {
        self.staged.push(Staged::Insert(tour.clone()));
        Ok(())
    }

    async fn update_tour(&mut self, tour: &Tour) -> RepoResult<()> {
        self.staged.push(Staged::Update(tour.clone()));
        Ok(())
    }

    async fn save(self: Box<Self>) -> RepoResult<bool> {
        let this = *self;
        if this.store.fail_saves.load(Ordering::SeqCst) {
            return Ok(false);
        }

        let mut tours = this.store.tours.write().await;

        // Reject the whole batch before touching the store.
        for staged in &this.staged {
            if let Staged::Insert(tour) = staged {
                if tours.iter().any(|existing| existing.id == tour.id) {
                    return Err(RepositoryError::Conflict(format!(
                        "tour {} already exists",
                        tour.id
                    )));
                }
            }
        }

        let mut written = 0usize;
        for staged in this.staged {
            match staged {
                Staged::Insert(tour) => {
                    tours.push(tour);
                    written += 1;
                }
                Staged::Update(tour) => {
                    if let Some(existing) = tours.iter_mut().find(|t| t.id == tour.id) {
                        let shows = std::mem::take(&mut existing.shows);
                        *existing = Tour {
                            shows,
                            updated_at: chrono::Utc::now(),
                            ..tour
                        };
                        written += 1;
                    }
                }
            }
        }

        Ok(written > 0)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use tourmgmt_core::types::FALLBACK_MANAGER_ID;
    use uuid::Uuid;

    use super::*;
    use crate::models::tour::Show;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tour(name: &str, start: NaiveDate) -> Tour {
        let id = Uuid::new_v4();
        Tour {
            id,
            manager_id: FALLBACK_MANAGER_ID,
            name: name.to_string(),
            description: None,
            start_date: start,
            end_date: start,
            estimated_profits: Decimal::ZERO,
            shows: vec![
                Show {
                    id: Uuid::new_v4(),
                    tour_id: id,
                    date: date(2025, 3, 2),
                    venue: "Second".into(),
                    city: None,
                    country: None,
                },
                Show {
                    id: Uuid::new_v4(),
                    tour_id: id,
                    date: date(2025, 3, 1),
                    venue: "First".into(),
                    city: None,
                    country: None,
                },
            ],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn insert(repo: &InMemoryTourRepository, tour: &Tour) -> bool {
        let mut uow = repo.begin().await.unwrap();
        uow.add_tour(tour).await.unwrap();
        uow.save().await.unwrap()
    }

    #[tokio::test]
    async fn staged_insert_is_invisible_until_saved() {
        let repo = InMemoryTourRepository::new();
        let t = tour("Staged", date(2025, 1, 1));

        let mut uow = repo.begin().await.unwrap();
        uow.add_tour(&t).await.unwrap();
        assert!(repo.get_tour(t.id, false).await.unwrap().is_none());

        assert!(uow.save().await.unwrap());
        assert!(repo.get_tour(t.id, false).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn shows_are_loaded_only_on_request() {
        let repo = InMemoryTourRepository::new();
        let t = tour("Shows", date(2025, 1, 1));
        insert(&repo, &t).await;

        let plain = repo.get_tour(t.id, false).await.unwrap().unwrap();
        assert!(plain.shows.is_empty());

        let full = repo.get_tour(t.id, true).await.unwrap().unwrap();
        assert_eq!(full.shows.len(), 2);
        assert_eq!(full.shows[0].venue, "First");
    }

    #[tokio::test]
    async fn list_is_ordered_by_start_date() {
        let repo = InMemoryTourRepository::new();
        insert(&repo, &tour("Later", date(2025, 6, 1))).await;
        insert(&repo, &tour("Sooner", date(2025, 2, 1))).await;

        let names: Vec<_> = repo
            .get_tours()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Sooner", "Later"]);
    }

    #[tokio::test]
    async fn update_keeps_shows() {
        let repo = InMemoryTourRepository::new();
        let t = tour("Before", date(2025, 1, 1));
        insert(&repo, &t).await;

        let mut changed = repo.get_tour(t.id, false).await.unwrap().unwrap();
        changed.name = "After".into();
        let mut uow = repo.begin().await.unwrap();
        uow.update_tour(&changed).await.unwrap();
        assert!(uow.save().await.unwrap());

        let stored = repo.get_tour(t.id, true).await.unwrap().unwrap();
        assert_eq!(stored.name, "After");
        assert_eq!(stored.shows.len(), 2);
    }

    #[tokio::test]
    async fn update_of_missing_tour_writes_nothing() {
        let repo = InMemoryTourRepository::new();
        let mut uow = repo.begin().await.unwrap();
        uow.update_tour(&tour("Ghost", date(2025, 1, 1))).await.unwrap();
        assert!(!uow.save().await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_insert_conflicts() {
        let repo = InMemoryTourRepository::new();
        let t = tour("Twice", date(2025, 1, 1));
        insert(&repo, &t).await;

        let mut uow = repo.begin().await.unwrap();
        uow.add_tour(&t).await.unwrap();
        assert_matches!(uow.save().await, Err(RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn failing_saves_report_false_and_store_nothing() {
        let repo = InMemoryTourRepository::new();
        repo.set_fail_saves(true);
        assert!(!insert(&repo, &tour("Lost", date(2025, 1, 1))).await);
        assert!(repo.snapshot().await.is_empty());
    }
}
