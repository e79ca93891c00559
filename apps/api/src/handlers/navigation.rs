use axum::Json;
use axum::extract::{Extension, State};
use psephos_core::UserClaims;

use crate::dto::NavigationResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Returns the sidebar pruned to the entries visible to the caller.
pub async fn navigation_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
) -> ApiResult<Json<NavigationResponse>> {
    let snapshot = state.sidebar_policy_service.snapshot().await;
    let visible = state
        .navigation_service
        .visible_menu(&claims, &snapshot.access_map);

    Ok(Json(NavigationResponse::from(visible)))
}
