pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    settings: Arc<Settings>,
) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        // API routes
        .nest("/api", api_routes(app_state.clone()))

        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

// Open and admin-only methods may share a path; merging keeps them on one
// method router while the admin layer only wraps its own methods.
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(open_routes())
        .merge(admin_routes(state.clone()))
        .merge(verification_routes(state))
}

fn open_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:id/payments", get(handlers::users::payments))
        .route("/users/:id/assignments", get(handlers::users::assignments))
        .route("/payments/:id", get(handlers::payments::get))
        .route("/payments/:id/credential", get(handlers::payments::credential))
        .route("/prices", get(handlers::prices::list))
        .route("/prices/:id", get(handlers::prices::get))
        .route("/routines", get(handlers::routines::list))
        .route("/routines/:id", get(handlers::routines::get))
        .route("/programs", get(handlers::programs::list))
        .route("/programs/:id", get(handlers::programs::get))
        .route("/assignments/:id/progress", post(handlers::assignments::add_progress))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::users::list).post(handlers::users::create))
        .route(
            "/users/:id",
            get(handlers::users::get)
                .put(handlers::users::update)
                .delete(handlers::users::delete),
        )
        .route("/payments", get(handlers::payments::list).post(handlers::payments::create))
        .route(
            "/payments/:id",
            put(handlers::payments::update).delete(handlers::payments::delete),
        )
        .route("/prices", post(handlers::prices::create))
        .route(
            "/prices/:id",
            put(handlers::prices::update).delete(handlers::prices::delete),
        )
        .route("/routines", post(handlers::routines::create))
        .route(
            "/routines/:id",
            put(handlers::routines::update).delete(handlers::routines::delete),
        )
        .route("/programs", post(handlers::programs::create))
        .route(
            "/programs/:id",
            put(handlers::programs::update).delete(handlers::programs::delete),
        )
        .route("/assignments", post(handlers::assignments::create))
        .route(
            "/assignments/:id",
            put(handlers::assignments::update).delete(handlers::assignments::delete),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_admin,
        ))
}

// Scanners get verification-shaped bodies even when the admin check itself
// cannot reach the store.
fn verification_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/credentials/verify", post(handlers::credentials::verify))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_admin_for_verification,
        ))
}
