use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::state::AppState,
    domain::{AssignmentWithProgram, ClientPayments, CreateUserRequest, UpdateUserRequest, User},
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    search: Option<String>,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    offset: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    users: Vec<User>,
    total: usize,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>> {
    let users = state
        .service_context
        .user_service
        .list_users(params.search.as_deref(), params.limit, params.offset)
        .await?;

    let total = users.len();
    Ok(Json(ListResponse { users, total }))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let user = state.service_context.user_service.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>> {
    let user = state.service_context.user_service.get_user(&id).await?;
    Ok(Json(user))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>> {
    let user = state.service_context.user_service.update_user(&id, request).await?;
    Ok(Json(user))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.service_context.user_service.delete_user(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The client's payments, split by whether they grant access today.
pub async fn payments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClientPayments>> {
    let payments = state
        .service_context
        .payment_service
        .client_payments(&id, state.today())
        .await?;
    Ok(Json(payments))
}

pub async fn assignments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<AssignmentWithProgram>>> {
    let assignments = state
        .service_context
        .program_service
        .client_assignments(&id)
        .await?;
    Ok(Json(assignments))
}
