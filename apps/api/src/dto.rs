mod common;
mod navigation;
mod security;

pub use common::HealthResponse;
pub use navigation::{MenuNodeResponse, NavigationResponse};
pub use security::{
    RoleResponse, SidebarEditorRowResponse, SidebarEditorViewResponse, SidebarPermissionsResponse,
    TogglePathRequest,
};
