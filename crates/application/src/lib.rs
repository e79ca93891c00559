//! Application services and ports.

#![forbid(unsafe_code)]

mod navigation_service;
mod sidebar_policy_service;

pub use navigation_service::NavigationService;
pub use sidebar_policy_service::{
    PolicySnapshot, PolicySource, RoleDirectory, SidebarEditorRow, SidebarEditorView,
    SidebarPermissionsGateway, SidebarPolicyService,
};
