use psephos_core::AppResult;

use crate::menu::MenuNode;
use crate::security::Restriction;

/// Route identifier of the sidebar permission editor screen.
pub const SIDEBAR_PERMISSIONS_PATH: &str = "/settings/sidebar-permissions";

/// Builds the console navigation tree.
///
/// Defined once at process start and held immutable for the process
/// lifetime. Ordering here is the ordering the sidebar renders.
pub fn standard_menu() -> AppResult<Vec<MenuNode>> {
    Ok(vec![
        MenuNode::route("menu.dashboard", "/dashboard")?.with_icon("dashboard"),
        MenuNode::group(
            "menu.geography",
            vec![
                MenuNode::route("menu.states", "/geography/states")?
                    .with_allowed_permissions(Restriction::of(["manage_states"])),
                MenuNode::route("menu.divisions", "/geography/divisions")?
                    .with_allowed_permissions(Restriction::of(["manage_divisions"])),
                MenuNode::route("menu.districts", "/geography/districts")?
                    .with_allowed_permissions(Restriction::of(["manage_districts"])),
                MenuNode::route("menu.assemblies", "/geography/assemblies")?
                    .with_allowed_permissions(Restriction::of(["manage_assemblies"])),
                MenuNode::route("menu.blocks", "/geography/blocks")?
                    .with_allowed_permissions(Restriction::of(["manage_blocks"])),
                MenuNode::route("menu.booths", "/geography/booths")?
                    .with_allowed_permissions(Restriction::of(["manage_booths"])),
            ],
        )?
        .with_icon("map"),
        MenuNode::route("menu.records", "/records")?
            .with_icon("folder")
            .with_allowed_permissions(Restriction::of(["manage_records"])),
        MenuNode::route("menu.users", "/users")?
            .with_icon("people")
            .with_allowed_permissions(Restriction::of(["manage_users"])),
        MenuNode::route("menu.roles", "/roles")?
            .with_icon("badge")
            .with_allowed_permissions(Restriction::of(["manage_roles"])),
        MenuNode::group(
            "menu.settings",
            vec![
                MenuNode::route("menu.sidebar_permissions", SIDEBAR_PERMISSIONS_PATH)?
                    .with_allowed_roles(Restriction::of(["admin"]))
                    .with_allowed_permissions(Restriction::of(["manage_roles"])),
            ],
        )?
        .with_icon("settings"),
    ])
}
