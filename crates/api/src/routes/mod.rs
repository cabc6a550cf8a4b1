pub mod health;
pub mod tours;

use axum::Router;

use crate::state::AppState;

/// Prefix under which the API routes are nested.
pub const API_PREFIX: &str = "/api";

/// Build the `/api` route tree.
///
/// ```text
/// /tours          list, create
/// /tours/{id}     get_by_id, partially_update
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/tours", tours::router())
}
