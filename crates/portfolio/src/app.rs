use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    routing::{get, put},
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use portfolio_auth::auth_routes;

use crate::{
    handlers::{
        health::{banner, health},
        projects::{create_project, delete_project, get_project, list_projects, update_project},
        users::{change_password, delete_user, get_user, list_users, update_user},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState, cors_origin: HeaderValue) -> Router {
    // Browsers send the token cookie, so credentials must be allowed
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("token"),
        ]);

    let api_routes = Router::new()
        // User routes
        .route("/users", get(list_users))
        .route(
            "/users/{key}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/{key}/password", put(change_password))
        // Project routes
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .merge(auth_routes())
        .layer(cors);

    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}
