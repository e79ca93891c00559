use psephos_application::{NavigationService, SidebarPolicyService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub navigation_service: NavigationService,
    pub sidebar_policy_service: SidebarPolicyService,
    pub frontend_url: String,
}
