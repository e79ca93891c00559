use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use psephos_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route("/api/navigation", get(handlers::navigation::navigation_handler))
        .route(
            "/api/security/sidebar-permissions",
            get(handlers::security::sidebar_permissions_handler),
        )
        .route(
            "/api/security/sidebar-permissions/editor",
            get(handlers::security::sidebar_editor_view_handler),
        )
        .route(
            "/api/security/sidebar-permissions/toggle",
            post(handlers::security::toggle_sidebar_path_handler),
        )
        .route(
            "/api/security/sidebar-permissions/save",
            post(handlers::security::save_sidebar_permissions_handler),
        )
        .route(
            "/api/security/roles",
            get(handlers::security::list_roles_handler),
        )
        .route_layer(from_fn(middleware::require_claims));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}
