use crate::types::TourId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: TourId },

    #[error("Configuration error: {0}")]
    Configuration(String),
}
