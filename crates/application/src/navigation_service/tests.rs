use psephos_core::UserClaims;
use psephos_domain::{AccessMap, MenuNode, PathGrants, Restriction, RoleName};

use super::NavigationService;

fn claims(roles: &[&str], permissions: &[&str]) -> UserClaims {
    UserClaims::new(
        "test-subject",
        "Test Subject",
        roles.iter().map(|value| (*value).to_owned()).collect(),
        permissions.iter().map(|value| (*value).to_owned()).collect(),
    )
}

fn role(name: &str) -> RoleName {
    RoleName::new(name).unwrap_or_else(|_| RoleName::superadmin())
}

fn roles_node() -> MenuNode {
    MenuNode::route("Roles", "/roles")
        .map(|node| node.with_allowed_permissions(Restriction::of(["manage_roles"])))
        .unwrap_or_else(|_| unreachable_node())
}

fn settings_tree() -> Vec<MenuNode> {
    let billing = MenuNode::route("Billing", "/billing")
        .map(|node| node.with_allowed_roles(Restriction::of(["admin"])))
        .unwrap_or_else(|_| unreachable_node());

    vec![MenuNode::group("Settings", vec![billing]).unwrap_or_else(|_| unreachable_node())]
}

fn unreachable_node() -> MenuNode {
    // Only reached if a literal-built fixture fails validation.
    panic!("test fixture menu node is invalid")
}

#[test]
fn permission_match_makes_node_visible() {
    let node = roles_node();
    let map = AccessMap::new();

    assert!(NavigationService::can_access(
        &node,
        &claims(&["viewer"], &["manage_roles"]),
        &map
    ));
}

#[test]
fn missing_permission_hides_node_unless_overridden() {
    let node = roles_node();

    let empty_map = AccessMap::new();
    assert!(!NavigationService::can_access(
        &node,
        &claims(&["viewer"], &[]),
        &empty_map
    ));

    let override_map = AccessMap::from_entries([(role("viewer"), PathGrants::of(["/roles"]))]);
    assert!(NavigationService::can_access(
        &node,
        &claims(&["viewer"], &[]),
        &override_map
    ));
}

#[test]
fn group_is_pruned_with_its_denied_child() {
    let tree = settings_tree();
    let filtered =
        NavigationService::filter_tree(&tree, &claims(&["viewer"], &[]), &AccessMap::new());

    assert!(filtered.is_empty());
}

#[test]
fn override_revives_child_and_its_group() {
    let tree = settings_tree();
    let map = AccessMap::from_entries([(role("viewer"), PathGrants::of(["/billing"]))]);

    let filtered = NavigationService::filter_tree(&tree, &claims(&["viewer"], &[]), &map);

    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name(), "Settings");
    assert_eq!(filtered[0].children().len(), 1);
    assert_eq!(filtered[0].children()[0].name(), "Billing");
}

#[test]
fn unrestricted_node_is_visible_to_everyone() {
    let node = MenuNode::route("Dashboard", "/dashboard").unwrap_or_else(|_| unreachable_node());

    assert!(NavigationService::can_access(
        &node,
        &claims(&[], &[]),
        &AccessMap::new()
    ));
}

#[test]
fn role_and_permission_restrictions_are_conjunctive() {
    let node = MenuNode::route("Editor", "/editor")
        .map(|node| {
            node.with_allowed_roles(Restriction::of(["admin"]))
                .with_allowed_permissions(Restriction::of(["manage_roles"]))
        })
        .unwrap_or_else(|_| unreachable_node());
    let map = AccessMap::new();

    assert!(!NavigationService::can_access(
        &node,
        &claims(&["admin"], &[]),
        &map
    ));
    assert!(!NavigationService::can_access(
        &node,
        &claims(&["viewer"], &["manage_roles"]),
        &map
    ));
    assert!(NavigationService::can_access(
        &node,
        &claims(&["admin"], &["manage_roles"]),
        &map
    ));
}

#[test]
fn superadmin_sees_the_entire_tree() {
    let tree = settings_tree();
    let filtered =
        NavigationService::filter_tree(&tree, &claims(&["superadmin"], &[]), &AccessMap::new());

    assert_eq!(filtered, tree);
}

#[test]
fn filtered_children_preserve_original_order() {
    let children = ["/a", "/b", "/c"]
        .into_iter()
        .map(|path| {
            MenuNode::route(path.trim_start_matches('/'), path)
                .map(|node| node.with_allowed_roles(Restriction::of(["admin"])))
                .unwrap_or_else(|_| unreachable_node())
        })
        .collect();
    let tree = vec![MenuNode::group("Group", children).unwrap_or_else(|_| unreachable_node())];

    let map = AccessMap::from_entries([(role("viewer"), PathGrants::of(["/c", "/a"]))]);
    let filtered = NavigationService::filter_tree(&tree, &claims(&["viewer"], &[]), &map);

    let paths: Vec<_> = filtered[0]
        .children()
        .iter()
        .filter_map(MenuNode::path)
        .collect();
    assert_eq!(paths, ["/a", "/c"]);
}

#[test]
fn can_access_route_is_false_for_unknown_paths() {
    let service = NavigationService::new(settings_tree());

    assert!(!service.can_access_route(&claims(&["superadmin"], &[]), &AccessMap::new(), "/nope"));
    assert!(service.can_access_route(&claims(&["superadmin"], &[]), &AccessMap::new(), "/billing"));
}

mod properties {
    use proptest::prelude::*;

    use psephos_core::UserClaims;
    use psephos_domain::{AccessMap, MenuNode, PathGrants, Restriction, RoleName};

    use super::super::NavigationService;

    const PATHS: [&str; 6] = ["/p0", "/p1", "/p2", "/p3", "/p4", "/p5"];
    const ROLES: [&str; 3] = ["admin", "manager", "viewer"];
    const PERMISSIONS: [&str; 3] = ["perm_a", "perm_b", "perm_c"];

    fn subset(pool: &'static [&'static str]) -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(0..pool.len(), 0..=pool.len())
            .prop_map(|indices| {
                let mut values: Vec<String> =
                    indices.into_iter().map(|index| pool[index].to_owned()).collect();
                values.sort_unstable();
                values.dedup();
                values
            })
    }

    fn arb_node() -> impl Strategy<Value = MenuNode> {
        let leaf = (0..PATHS.len(), subset(&ROLES), subset(&PERMISSIONS)).prop_filter_map(
            "leaf route must validate",
            |(path_index, roles, permissions)| {
                MenuNode::new(
                    format!("route {path_index}"),
                    Some(PATHS[path_index].to_owned()),
                    None,
                    Restriction::of(roles),
                    Restriction::of(permissions),
                    Vec::new(),
                )
                .ok()
            },
        );

        leaf.prop_recursive(3, 24, 4, |inner| {
            (
                prop::option::of(0..PATHS.len()),
                subset(&ROLES),
                subset(&PERMISSIONS),
                prop::collection::vec(inner, 1..4),
            )
                .prop_filter_map(
                    "group node must validate",
                    |(path_index, roles, permissions, children)| {
                        MenuNode::new(
                            "group",
                            path_index.map(|index| PATHS[index].to_owned()),
                            None,
                            Restriction::of(roles),
                            Restriction::of(permissions),
                            children,
                        )
                        .ok()
                    },
                )
        })
    }

    fn arb_tree() -> impl Strategy<Value = Vec<MenuNode>> {
        prop::collection::vec(arb_node(), 0..4)
    }

    fn arb_claims() -> impl Strategy<Value = UserClaims> {
        (subset(&ROLES), subset(&PERMISSIONS)).prop_map(|(roles, permissions)| {
            UserClaims::new("prop-subject", "Prop Subject", roles, permissions)
        })
    }

    fn arb_access_map() -> impl Strategy<Value = AccessMap> {
        prop::collection::vec((0..ROLES.len(), subset(&PATHS)), 0..=ROLES.len()).prop_map(
            |entries| {
                AccessMap::from_entries(entries.into_iter().filter_map(|(role_index, paths)| {
                    RoleName::new(ROLES[role_index])
                        .ok()
                        .map(|role| (role, PathGrants::of(paths)))
                }))
            },
        )
    }

    fn contains_forest(bigger: &[MenuNode], smaller: &[MenuNode]) -> bool {
        smaller.iter().all(|small| {
            bigger.iter().any(|big| {
                big.name() == small.name()
                    && big.path() == small.path()
                    && contains_forest(big.children(), small.children())
            })
        })
    }

    proptest! {
        #[test]
        fn filtering_is_idempotent(
            tree in arb_tree(),
            claims in arb_claims(),
            map in arb_access_map(),
        ) {
            let once = NavigationService::filter_tree(&tree, &claims, &map);
            let twice = NavigationService::filter_tree(&once, &claims, &map);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn widening_the_access_map_never_hides_nodes(
            tree in arb_tree(),
            claims in arb_claims(),
            map in arb_access_map(),
            role_index in 0..ROLES.len(),
            path_index in 0..PATHS.len(),
        ) {
            let role = RoleName::new(ROLES[role_index]).ok();
            prop_assume!(role.is_some());
            let Some(role) = role else { return Ok(()); };
            prop_assume!(!map.grants(&role, PATHS[path_index]));

            let widened = map.clone().toggled(&role, PATHS[path_index]);
            prop_assert!(widened.is_ok());
            let Ok(widened) = widened else { return Ok(()); };

            let before = NavigationService::filter_tree(&tree, &claims, &map);
            let after = NavigationService::filter_tree(&tree, &claims, &widened);
            prop_assert!(contains_forest(&after, &before));
        }

        #[test]
        fn superadmin_bypasses_every_rule(tree in arb_tree(), map in arb_access_map()) {
            let claims = UserClaims::new(
                "root",
                "Root",
                vec!["superadmin".to_owned()],
                Vec::new(),
            );
            let filtered = NavigationService::filter_tree(&tree, &claims, &map);
            prop_assert_eq!(filtered, tree);
        }
    }
}
