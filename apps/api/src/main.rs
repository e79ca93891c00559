//! Psephos API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;
use std::time::Duration;

use psephos_application::{NavigationService, SidebarPolicyService};
use psephos_core::AppError;
use psephos_domain::standard_menu;
use psephos_infrastructure::HttpRbacGateway;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.upstream_timeout_ms))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let rbac_gateway = Arc::new(HttpRbacGateway::new(
        http_client,
        config.rbac_base_url.clone(),
    ));

    let navigation_service = NavigationService::new(standard_menu()?);
    let sidebar_policy_service = SidebarPolicyService::new(
        rbac_gateway.clone(),
        rbac_gateway,
        navigation_service.clone(),
    );

    // Warm load; a failure falls back to the builtin map.
    let snapshot = sidebar_policy_service.load().await;
    info!(
        source = snapshot.source.as_str(),
        "sidebar permission map loaded"
    );

    let app_state = AppState {
        navigation_service,
        sidebar_policy_service,
        frontend_url: config.frontend_url.clone(),
    };

    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "psephos-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
