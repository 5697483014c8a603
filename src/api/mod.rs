pub mod envelope;
pub mod extract;

use axum::extract::{DefaultBodyLimit, State};
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::AppError;
use crate::models::{Course, NewCourseRequest, UpdateCourseRequest};
use crate::state::AppState;
use crate::validator::Validator;

use envelope::Envelope;
use extract::CourseId;

/// Optional header on PATCH carrying the version the client last read.
pub const EXPECTED_VERSION_HEADER: &str = "x-expected-version";

pub const MAX_BODY_BYTES: usize = 1_048_576;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/healthcheck", get(healthcheck))
        .route("/v1/courses", post(create_course))
        .route(
            "/v1/courses/{id}",
            get(show_course).patch(update_course).delete(delete_course),
        )
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

#[derive(Serialize)]
struct SystemInfo {
    environment: String,
    version: &'static str,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    system_info: SystemInfo,
}

async fn healthcheck(State(state): State<AppState>) -> Result<Envelope<Health>, AppError> {
    state.store.ping().await?;
    Ok(Envelope::ok(
        "health",
        Health {
            status: "available",
            system_info: SystemInfo {
                environment: state.environment.clone(),
                version: env!("CARGO_PKG_VERSION"),
            },
        },
    ))
}

async fn create_course(
    State(state): State<AppState>,
    body: Result<Json<NewCourseRequest>, JsonRejection>,
) -> Result<Envelope<Course>, AppError> {
    let Json(req) = body?;

    let mut v = Validator::new();
    req.validate(&mut v);
    if !v.is_valid() {
        return Err(AppError::Validation(v.into_errors()));
    }

    let course = state.store.insert(req).await?;
    info!("created course {} ({})", course.id, course.code);

    let location = HeaderValue::from_str(&format!("/v1/courses/{}", course.id))
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Envelope::new(StatusCode::CREATED, "course", course).with_header(header::LOCATION, location))
}

async fn show_course(
    State(state): State<AppState>,
    CourseId(id): CourseId,
) -> Result<Envelope<Course>, AppError> {
    let course = state.store.get(id).await?;
    Ok(Envelope::ok("course", course))
}

async fn update_course(
    State(state): State<AppState>,
    CourseId(id): CourseId,
    headers: HeaderMap,
    body: Result<Json<UpdateCourseRequest>, JsonRejection>,
) -> Result<Envelope<Course>, AppError> {
    let mut course = state.store.get(id).await?;

    if let Some(expected) = expected_version(&headers)? {
        if expected != course.version {
            debug!(
                "course {} is at version {}, client expected {}",
                id, course.version, expected
            );
            return Err(AppError::EditConflict);
        }
    }

    let Json(req) = body?;
    course.apply(req);

    let mut v = Validator::new();
    course.validate(&mut v);
    if !v.is_valid() {
        return Err(AppError::Validation(v.into_errors()));
    }

    state.store.update(&mut course).await?;
    info!("updated course {} to version {}", course.id, course.version);

    Ok(Envelope::ok("course", course))
}

async fn delete_course(
    State(state): State<AppState>,
    CourseId(id): CourseId,
) -> Result<Envelope<&'static str>, AppError> {
    state.store.delete(id).await?;
    info!("deleted course {}", id);
    Ok(Envelope::ok("message", "course successfully deleted"))
}

async fn not_found() -> AppError {
    AppError::NotFound
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

fn expected_version(headers: &HeaderMap) -> Result<Option<i64>, AppError> {
    let Some(raw) = headers.get(EXPECTED_VERSION_HEADER) else {
        return Ok(None);
    };

    raw.to_str()
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .map(Some)
        .ok_or_else(|| {
            AppError::BadRequest(format!("{} must be an integer", EXPECTED_VERSION_HEADER))
        })
}
