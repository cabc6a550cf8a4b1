//! Handlers for the `/tours` resource.

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header::{ACCEPT, CONTENT_TYPE, LOCATION};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tourmgmt_core::error::CoreError;
use tourmgmt_core::negotiation::Selection;
use tourmgmt_core::patch::{self, PatchDocument};
use tourmgmt_core::types::TourId;
use tourmgmt_core::validation::ValidationResult;
use tourmgmt_db::models::tour::Tour;
use validator::Validate;

use crate::dto::creation::{
    TourCreation, TourForCreation, TourWithManagerAndShowsForCreation,
    TourWithManagerForCreation, TourWithShowsForCreation,
};
use crate::dto::tour::{
    TourDto, TourWithEstimatedProfitsAndShowsDto, TourWithEstimatedProfitsDto, TourWithShowsDto,
};
use crate::dto::update::TourForUpdate;
use crate::error::{AppError, AppResult};
use crate::negotiation::{header_values, media_types, CreateVariant, ReadVariant};
use crate::routes::API_PREFIX;
use crate::state::AppState;

/// GET /api/tours
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<TourDto>>> {
    let tours = state.repo.get_tours().await?;
    Ok(Json(tours.iter().map(TourDto::from).collect()))
}

/// GET /api/tours/{id}
///
/// The representation is chosen from `Accept`; unrecognised or missing
/// values get the base [`TourDto`] as `application/json`.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<TourId>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let (variant, media_type) = match state.media_types.read.select(header_values(&headers, &ACCEPT))
    {
        Selection::Matched {
            variant,
            media_type,
        } => (*variant, media_type),
        Selection::Fallback(variant) => {
            let accept: Vec<&str> = header_values(&headers, &ACCEPT).collect();
            tracing::debug!(?accept, "No tour representation requested, using default");
            (*variant, media_types::JSON)
        }
        Selection::Ambiguous => {
            return Err(AppError::BadRequest(
                "Accept header names more than one tour representation".into(),
            ));
        }
        Selection::NoMatch => {
            return Err(AppError::Core(CoreError::Configuration(
                "No default tour representation is registered".into(),
            )));
        }
    };

    let tour = find_tour(&state, id, variant.includes_shows()).await?;

    let response = match variant {
        ReadVariant::Tour => represent(media_type, TourDto::from(&tour)),
        ReadVariant::TourWithEstimatedProfits => {
            represent(media_type, TourWithEstimatedProfitsDto::from(&tour))
        }
        ReadVariant::TourWithShows => represent(media_type, TourWithShowsDto::from(&tour)),
        ReadVariant::TourWithEstimatedProfitsAndShows => {
            represent(media_type, TourWithEstimatedProfitsAndShowsDto::from(&tour))
        }
    };
    Ok(response)
}

/// POST /api/tours
///
/// The payload shape is chosen from `Content-Type`. Responds with the base
/// representation of the stored tour and its location.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<(StatusCode, [(HeaderName, String); 1], Json<TourDto>)> {
    let variant = match state
        .media_types
        .create
        .select(header_values(&headers, &CONTENT_TYPE))
    {
        Selection::Matched { variant, .. } | Selection::Fallback(variant) => *variant,
        Selection::Ambiguous => {
            return Err(AppError::BadRequest(
                "Content-Type names more than one tour payload".into(),
            ));
        }
        Selection::NoMatch => {
            let content_type: Vec<&str> = header_values(&headers, &CONTENT_TYPE).collect();
            return Err(AppError::UnsupportedMediaType(format!(
                "Cannot create a tour from {content_type:?}"
            )));
        }
    };

    let tour = match variant {
        CreateVariant::Tour => parse_creation::<TourForCreation>(&body)?,
        CreateVariant::TourWithManager => parse_creation::<TourWithManagerForCreation>(&body)?,
        CreateVariant::TourWithShows => parse_creation::<TourWithShowsForCreation>(&body)?,
        CreateVariant::TourWithManagerAndShows => {
            parse_creation::<TourWithManagerAndShowsForCreation>(&body)?
        }
    };

    let mut uow = state.repo.begin().await?;
    uow.add_tour(&tour).await?;
    if !uow.save().await? {
        return Err(AppError::SaveFailed("Adding a tour failed on save."));
    }

    tracing::info!(
        tour_id = %tour.id,
        manager_id = %tour.manager_id,
        shows = tour.shows.len(),
        ?variant,
        "Tour created"
    );

    let location = format!("{API_PREFIX}/tours/{}", tour.id);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(TourDto::from(&tour)),
    ))
}

/// PATCH /api/tours/{id}
///
/// Applies a JSON Patch document to the tour's updatable fields. Operation
/// failures and validation failures are reported together as 422 and nothing
/// is stored.
pub async fn partially_update(
    State(state): State<AppState>,
    Path(id): Path<TourId>,
    payload: Result<Json<PatchDocument>, JsonRejection>,
) -> AppResult<StatusCode> {
    let Json(document) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let mut tour = find_tour(&state, id, false).await?;

    let patched = patch::apply_to(
        &TourForUpdate::from(&tour),
        &document,
        TourForUpdate::OBJECT_KEY,
    )
    .map_err(|err| AppError::InternalError(err.to_string()))?;

    let mut errors = patched.errors;
    if let Err(invalid) = patched.value.validate() {
        errors.merge(ValidationResult::from_validation_errors(
            &invalid,
            TourForUpdate::OBJECT_KEY,
        ));
    }
    if !errors.is_empty() {
        tracing::debug!(tour_id = %id, fields = ?errors.keys().collect::<Vec<_>>(), "Tour patch rejected");
        return Err(AppError::Unprocessable(errors));
    }

    patched.value.apply_to(&mut tour);

    let mut uow = state.repo.begin().await?;
    uow.update_tour(&tour).await?;
    if !uow.save().await? {
        return Err(AppError::SaveFailed("Updating a tour failed on save."));
    }

    tracing::info!(tour_id = %id, operations = document.operations().len(), "Tour updated");
    Ok(StatusCode::NO_CONTENT)
}

async fn find_tour(state: &AppState, id: TourId, include_shows: bool) -> AppResult<Tour> {
    state
        .repo
        .get_tour(id, include_shows)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Tour", id }))
}

/// Deserialize and validate a creation payload, then build the entity.
fn parse_creation<T: TourCreation>(body: &[u8]) -> AppResult<Tour> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::BadRequest("A tour payload is required".into()));
    }

    let payload: T = serde_json::from_slice(body)
        .map_err(|err| AppError::BadRequest(format!("Malformed tour payload: {err}")))?;

    payload.validate().map_err(|invalid| {
        AppError::Unprocessable(ValidationResult::from_validation_errors(
            &invalid,
            T::OBJECT_KEY,
        ))
    })?;

    Ok(payload.into_tour())
}

fn represent<T: Serialize>(media_type: &'static str, dto: T) -> Response {
    ([(CONTENT_TYPE, media_type)], Json(dto)).into_response()
}
