//! Request handlers for the API endpoints.

use std::sync::{Arc, MutexGuard};

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, SizingRequest};
use crate::error::SizingError;
use crate::profile::{self, HourlyProfile};
use crate::sim::cache::SizingCache;
use crate::sim::engine::simulate;
use crate::sim::sizing::SizingResult;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(err: &SizingError) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: err.to_string(),
            field: err.field().map(str::to_string),
        }),
    )
}

/// Validates the request configuration and returns its sizing result.
///
/// Runs against the server profile are memoized; the simulation itself runs
/// without holding the cache lock.
///
/// `POST /sizing` → 200 + `SizingResult` JSON
/// invalid profile or config → 400 + `ErrorResponse`
pub async fn post_sizing(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SizingRequest>,
) -> Result<Json<SizingResult>, ApiError> {
    let custom = match (request.profile, request.profile_csv) {
        (Some(_), Some(_)) => {
            return Err(bad_request(&SizingError::InvalidProfile(
                "`profile` and `profile_csv` are mutually exclusive".to_string(),
            )));
        }
        (Some(values), None) if values.is_empty() => {
            return Err(bad_request(&SizingError::InvalidProfile(
                "`profile` is empty".to_string(),
            )));
        }
        (Some(values), None) => Some(HourlyProfile::new(values).map_err(|e| bad_request(&e))?),
        (None, Some(text)) => Some(profile::parse(&text).map_err(|e| bad_request(&e))?),
        (None, None) => None,
    };
    request.config.validate().map_err(|e| bad_request(&e))?;

    // request-supplied profiles are one-off and bypass the cache
    if let Some(profile) = &custom {
        return Ok(Json(simulate(profile, &request.config)));
    }

    let cached = lock_cache(&state)?.get(&state.profile, &request.config);
    if let Some(result) = cached {
        return Ok(Json(result));
    }
    let result = simulate(&state.profile, &request.config);
    lock_cache(&state)?.insert(&state.profile, &request.config, result.clone());
    Ok(Json(result))
}

fn lock_cache(state: &AppState) -> Result<MutexGuard<'_, SizingCache>, ApiError> {
    state.cache.lock().map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "result cache is unavailable".to_string(),
                field: None,
            }),
        )
    })
}

/// Returns the server's profile as one value per line.
///
/// `GET /profile/template` → 200 + `text/csv`
pub async fn get_template(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        profile::serialize(&state.profile),
    )
}
