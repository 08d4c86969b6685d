use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    api::state::AppState,
    domain::{User, VerificationError, VerificationResult},
    error::AppError,
};

/// Header naming the acting staff member.
pub const ACTOR_HEADER: &str = "x-actor-id";

#[derive(Clone)]
pub struct CurrentUser {
    pub user: User,
}

pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = resolve_admin(&state, request.headers()).await?;
    request.extensions_mut().insert(CurrentUser { user });

    Ok(next.run(request).await)
}

/// Admin gate for the scanner endpoint. An outage while checking the actor
/// is answered in the verification result shape, so scanners see the same
/// `store_unavailable` body whichever lookup failed.
pub async fn require_admin_for_verification(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match resolve_admin(&state, request.headers()).await {
        Ok(user) => {
            request.extensions_mut().insert(CurrentUser { user });
            next.run(request).await
        }
        Err(AppError::StoreUnavailable(reason)) => {
            tracing::error!("User store unavailable while authorizing verification: {}", reason);
            let result = VerificationResult::rejected(VerificationError::StoreUnavailable { reason });
            (StatusCode::SERVICE_UNAVAILABLE, Json(result)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

async fn resolve_admin(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let actor_id = headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let user = state
        .service_context
        .user_repo
        .find_by_id(actor_id)
        .await
        .map_err(AppError::into_store_unavailable)?
        .ok_or(AppError::Unauthorized)?;

    if !user.is_admin() {
        tracing::debug!("User {} attempted an admin-only route", user.id);
        return Err(AppError::Forbidden);
    }

    Ok(user)
}
