//! Route definitions for the `/tours` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::tours;
use crate::state::AppState;

/// Routes mounted at `/tours`.
///
/// ```text
/// GET    /         -> list
/// POST   /         -> create            (payload chosen by Content-Type)
/// GET    /{id}     -> get_by_id         (representation chosen by Accept)
/// PATCH  /{id}     -> partially_update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tours::list).post(tours::create))
        .route("/{id}", get(tours::get_by_id).patch(tours::partially_update))
}
