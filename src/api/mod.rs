mod handlers;

pub use handlers::{AppState, ErrorBody};

use axum::{
    routing::{get, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Router with permissive CORS, for local use and tests.
pub fn create_router(service: AppState) -> Router {
    create_router_with_config(service, &ServerConfig::default())
}

pub fn create_router_with_config(service: AppState, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route(
            "/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/tasks/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/tasks/{id}/status", put(handlers::change_task_status))
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(config.cors_layer()),
        )
        .with_state(service)
}
