use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{CreatePaymentRequest, Payment, PaymentView, UpdatePaymentRequest},
    error::{AppError, Result},
    service::{credential_service::IssuedCredential, payment_service::PaymentFilter},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    search: Option<String>,
    year: Option<i32>,
    month: Option<u32>,
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
    payments: Vec<PaymentView>,
    total: usize,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>> {
    if matches!(params.month, Some(m) if !(1..=12).contains(&m)) {
        return Err(AppError::BadRequest("month must be between 1 and 12".to_string()));
    }

    let filter = PaymentFilter {
        search: params.search,
        year: params.year,
        month: params.month,
        limit: params.limit.clamp(1, 1000),
        offset: params.offset.max(0),
    };

    let payments = state
        .service_context
        .payment_service
        .list_payments(filter, state.today())
        .await?;

    let total = payments.len();
    Ok(Json(ListResponse { payments, total }))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<Payment>)> {
    let payment = state
        .service_context
        .payment_service
        .record_payment(&current_user.user, request)
        .await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PaymentView>> {
    let payment = state
        .service_context
        .payment_service
        .get_payment(&id, state.today())
        .await?;
    Ok(Json(payment))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePaymentRequest>,
) -> Result<Json<Payment>> {
    let payment = state
        .service_context
        .payment_service
        .update_payment(&id, request)
        .await?;
    Ok(Json(payment))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.service_context.payment_service.delete_payment(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Credential payload and QR code for the "show my QR" action.
pub async fn credential(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<IssuedCredential>> {
    let issued = state
        .service_context
        .credential_service
        .issue_for_payment(&id, state.today())
        .await?;
    Ok(Json(issued))
}
