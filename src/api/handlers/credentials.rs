use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    api::state::AppState,
    domain::{dates::deserialize_opt_date, VerificationResult},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// Scanned text. Scanners that already decoded the JSON may send the
    /// object itself.
    payload: Value,
    /// Evaluate coverage on this date instead of today.
    #[serde(default, deserialize_with = "deserialize_opt_date")]
    as_of: Option<NaiveDate>,
}

pub async fn verify(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> (StatusCode, Json<VerificationResult>) {
    let raw = match request.payload {
        Value::String(text) => text,
        other => other.to_string(),
    };
    let as_of = request.as_of.unwrap_or_else(|| state.today());

    let result = state
        .service_context
        .credential_service
        .verify(&raw, as_of)
        .await;

    let status = if result.is_store_failure() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (status, Json(result))
}
