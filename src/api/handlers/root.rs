use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::api::state::AppState;

pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": state.settings.gym.name,
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Gym payments, programs and QR entry verification",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "users": "/api/users",
            "payments": "/api/payments",
            "verify": "/api/credentials/verify",
            "programs": "/api/programs",
            "prices": "/api/prices",
            "routines": "/api/routines",
            "assignments": "/api/assignments"
        }
    }))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "today": state.today(),
        "signedCredentials": state.service_context.credential_service.signs_credentials()
    })))
}
