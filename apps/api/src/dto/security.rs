use std::collections::BTreeMap;

use psephos_application::{PolicySnapshot, SidebarEditorRow, SidebarEditorView};
use psephos_domain::RoleRecord;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for toggling one path grant.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/toggle-path-request.ts"
)]
pub struct TogglePathRequest {
    pub role: String,
    pub path: String,
}

/// API representation of the in-memory sidebar permission map.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/sidebar-permissions-response.ts"
)]
pub struct SidebarPermissionsResponse {
    pub access_map: BTreeMap<String, Vec<String>>,
    pub source: String,
    pub loaded_at: String,
    pub dirty: bool,
    pub version: u64,
}

/// API representation of one permission-editor row.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/sidebar-editor-row-response.ts"
)]
pub struct SidebarEditorRowResponse {
    pub name: String,
    pub path: String,
    pub granted: bool,
    pub locked: bool,
}

/// API representation of the permission editor for a selected role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/sidebar-editor-view-response.ts"
)]
pub struct SidebarEditorViewResponse {
    pub role: String,
    pub rows: Vec<SidebarEditorRowResponse>,
    pub read_only: bool,
    pub notice: Option<String>,
}

/// API representation of an RBAC role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub role_id: String,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
}

impl From<PolicySnapshot> for SidebarPermissionsResponse {
    fn from(value: PolicySnapshot) -> Self {
        Self {
            access_map: value
                .access_map
                .entries()
                .map(|(role, grants)| (role.as_str().to_owned(), grants.paths().to_vec()))
                .collect(),
            source: value.source.as_str().to_owned(),
            loaded_at: value.loaded_at,
            dirty: value.dirty,
            version: value.version,
        }
    }
}

impl From<SidebarEditorRow> for SidebarEditorRowResponse {
    fn from(value: SidebarEditorRow) -> Self {
        Self {
            name: value.name,
            path: value.path,
            granted: value.granted,
            locked: value.locked,
        }
    }
}

impl From<SidebarEditorView> for SidebarEditorViewResponse {
    fn from(value: SidebarEditorView) -> Self {
        Self {
            role: value.role.as_str().to_owned(),
            rows: value
                .rows
                .into_iter()
                .map(SidebarEditorRowResponse::from)
                .collect(),
            read_only: value.read_only,
            notice: value.notice,
        }
    }
}

impl From<RoleRecord> for RoleResponse {
    fn from(value: RoleRecord) -> Self {
        Self {
            role_id: value.role_id,
            name: value.name.as_str().to_owned(),
            display_name: value.display_name,
            description: value.description,
        }
    }
}
