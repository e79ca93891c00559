//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod menu;
mod navigation;
mod security;
mod sidebar;

pub use menu::{MenuEntry, MenuNode, flatten_routes};
pub use navigation::{SIDEBAR_PERMISSIONS_PATH, standard_menu};
pub use security::{Restriction, RoleName, RoleRecord, SystemRole, parse_role_name};
pub use sidebar::{AccessMap, PathGrants, WILDCARD_PATH};
