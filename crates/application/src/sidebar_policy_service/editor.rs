use psephos_core::{AppResult, UserClaims};
use psephos_domain::{RoleName, flatten_routes};

use super::SidebarPolicyService;

/// One toggleable row in the permission editor table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEditorRow {
    /// Display key of the route node.
    pub name: String,
    /// Route identifier toggled by this row.
    pub path: String,
    /// Whether the selected role currently grants the path.
    pub granted: bool,
    /// Whether the row may not be toggled.
    pub locked: bool,
}

/// Permission-editor projection of the menu for one selected role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEditorView {
    /// The selected role.
    pub role: RoleName,
    /// Route rows in menu pre-order.
    pub rows: Vec<SidebarEditorRow>,
    /// Whether every mutation, including save, is disabled for this role.
    pub read_only: bool,
    /// Informational message shown when the view is read-only.
    pub notice: Option<String>,
}

impl SidebarPolicyService {
    /// Builds the permission-editor view for a selected role.
    ///
    /// The menu is flattened to its route entries in pre-order; each row
    /// reflects whether the role's override entry grants the path. Selecting
    /// the superadmin role forces every row to a checked, locked state and
    /// disables saving, mirroring the invariant that its grants are never
    /// editable.
    pub async fn editor_view(
        &self,
        actor: &UserClaims,
        role: &RoleName,
    ) -> AppResult<SidebarEditorView> {
        self.require_editor_access(actor).await?;

        let snapshot = self.snapshot().await;
        let superadmin_selected = role.is_superadmin();

        let rows = flatten_routes(self.navigation_service.menu())
            .into_iter()
            .map(|entry| SidebarEditorRow {
                granted: superadmin_selected || snapshot.access_map.grants(role, &entry.path),
                locked: superadmin_selected,
                name: entry.name,
                path: entry.path,
            })
            .collect();

        Ok(SidebarEditorView {
            role: role.clone(),
            rows,
            read_only: superadmin_selected,
            notice: superadmin_selected.then(|| {
                "the superadmin role always sees every entry; its sidebar permissions cannot be edited"
                    .to_owned()
            }),
        })
    }
}
