use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::state::AppState,
    domain::{CreatePriceRequest, Price, UpdatePriceRequest},
    error::Result,
};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Price>>> {
    let prices = state.service_context.catalog_service.list_prices().await?;
    Ok(Json(prices))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Price>> {
    let price = state.service_context.catalog_service.get_price(&id).await?;
    Ok(Json(price))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreatePriceRequest>,
) -> Result<(StatusCode, Json<Price>)> {
    let price = state.service_context.catalog_service.create_price(request).await?;
    Ok((StatusCode::CREATED, Json(price)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePriceRequest>,
) -> Result<Json<Price>> {
    let price = state
        .service_context
        .catalog_service
        .update_price(&id, request)
        .await?;
    Ok(Json(price))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.service_context.catalog_service.delete_price(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
