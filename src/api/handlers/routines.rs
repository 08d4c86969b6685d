use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::state::AppState,
    domain::{CreateRoutineRequest, Routine, UpdateRoutineRequest},
    error::Result,
};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Routine>>> {
    let routines = state.service_context.catalog_service.list_routines().await?;
    Ok(Json(routines))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Routine>> {
    let routine = state.service_context.catalog_service.get_routine(&id).await?;
    Ok(Json(routine))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateRoutineRequest>,
) -> Result<(StatusCode, Json<Routine>)> {
    let routine = state.service_context.catalog_service.create_routine(request).await?;
    Ok((StatusCode::CREATED, Json(routine)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRoutineRequest>,
) -> Result<Json<Routine>> {
    let routine = state
        .service_context
        .catalog_service
        .update_routine(&id, request)
        .await?;
    Ok(Json(routine))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.service_context.catalog_service.delete_routine(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
