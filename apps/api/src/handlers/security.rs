use axum::Json;
use axum::extract::{Extension, Query, State};
use psephos_core::UserClaims;
use psephos_domain::parse_role_name;
use serde::Deserialize;

use crate::dto::{
    RoleResponse, SidebarEditorViewResponse, SidebarPermissionsResponse, TogglePathRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SidebarPermissionsQuery {
    #[serde(default)]
    reload: bool,
}

#[derive(Debug, Deserialize)]
pub struct EditorViewQuery {
    #[serde(default)]
    role: String,
}

pub async fn sidebar_permissions_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    Query(query): Query<SidebarPermissionsQuery>,
) -> ApiResult<Json<SidebarPermissionsResponse>> {
    let snapshot = state
        .sidebar_policy_service
        .inspect(&claims, query.reload)
        .await?;

    Ok(Json(SidebarPermissionsResponse::from(snapshot)))
}

pub async fn sidebar_editor_view_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    Query(query): Query<EditorViewQuery>,
) -> ApiResult<Json<SidebarEditorViewResponse>> {
    let role = parse_role_name(&query.role)?;
    let view = state
        .sidebar_policy_service
        .editor_view(&claims, &role)
        .await?;

    Ok(Json(SidebarEditorViewResponse::from(view)))
}

pub async fn toggle_sidebar_path_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    Json(payload): Json<TogglePathRequest>,
) -> ApiResult<Json<SidebarPermissionsResponse>> {
    let role = parse_role_name(&payload.role)?;
    let snapshot = state
        .sidebar_policy_service
        .toggle_path(&claims, &role, &payload.path)
        .await?;

    Ok(Json(SidebarPermissionsResponse::from(snapshot)))
}

pub async fn save_sidebar_permissions_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
) -> ApiResult<Json<SidebarPermissionsResponse>> {
    let snapshot = state.sidebar_policy_service.save(&claims).await?;

    Ok(Json(SidebarPermissionsResponse::from(snapshot)))
}

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .sidebar_policy_service
        .list_roles(&claims)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}
