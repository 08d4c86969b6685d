use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{CreateProgramRequest, UpdateProgramRequest, WorkoutProgram},
    error::Result,
};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<WorkoutProgram>>> {
    let programs = state.service_context.program_service.list_programs().await?;
    Ok(Json(programs))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(request): Json<CreateProgramRequest>,
) -> Result<(StatusCode, Json<WorkoutProgram>)> {
    let program = state
        .service_context
        .program_service
        .create_program(&current_user.user, request)
        .await?;
    Ok((StatusCode::CREATED, Json(program)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkoutProgram>> {
    let program = state.service_context.program_service.get_program(&id).await?;
    Ok(Json(program))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateProgramRequest>,
) -> Result<Json<WorkoutProgram>> {
    let program = state
        .service_context
        .program_service
        .update_program(&id, request)
        .await?;
    Ok(Json(program))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.service_context.program_service.delete_program(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
