use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{AddProgressRequest, AssignProgramRequest, Assignment, UpdateAssignmentRequest},
    error::Result,
};

pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(request): Json<AssignProgramRequest>,
) -> Result<(StatusCode, Json<Vec<Assignment>>)> {
    let assignments = state
        .service_context
        .program_service
        .assign(&current_user.user, request)
        .await?;
    Ok((StatusCode::CREATED, Json(assignments)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateAssignmentRequest>,
) -> Result<Json<Assignment>> {
    let assignment = state
        .service_context
        .program_service
        .update_assignment(&id, request)
        .await?;
    Ok(Json(assignment))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.service_context.program_service.delete_assignment(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Log a training session against the assignment.
pub async fn add_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AddProgressRequest>,
) -> Result<Json<Assignment>> {
    let assignment = state
        .service_context
        .program_service
        .add_progress(&id, request)
        .await?;
    Ok(Json(assignment))
}
