use std::sync::Arc;

use psephos_core::UserClaims;
use psephos_domain::{AccessMap, MenuNode, SystemRole};

#[cfg(test)]
mod tests;

/// Resolves which navigation entries a user may see.
///
/// Visibility is a pure function of the static menu tree, the user's claims,
/// and the sidebar access map; re-evaluating with the same inputs always
/// yields the same pruned tree, so results may be memoized keyed on the
/// policy snapshot version.
#[derive(Clone)]
pub struct NavigationService {
    menu: Arc<Vec<MenuNode>>,
}

impl NavigationService {
    /// Creates a navigation service over the process-wide menu tree.
    #[must_use]
    pub fn new(menu: Vec<MenuNode>) -> Self {
        Self {
            menu: Arc::new(menu),
        }
    }

    /// Returns the unfiltered menu tree.
    #[must_use]
    pub fn menu(&self) -> &[MenuNode] {
        self.menu.as_slice()
    }

    /// Returns the menu pruned to the entries visible to the user.
    #[must_use]
    pub fn visible_menu(&self, claims: &UserClaims, access_map: &AccessMap) -> Vec<MenuNode> {
        Self::filter_tree(&self.menu, claims, access_map)
    }

    /// Returns whether the user may access the route at `path`.
    ///
    /// False for paths that are not part of the menu.
    #[must_use]
    pub fn can_access_route(&self, claims: &UserClaims, access_map: &AccessMap, path: &str) -> bool {
        find_route(&self.menu, path)
            .map(|node| Self::can_access(node, claims, access_map))
            .unwrap_or(false)
    }

    /// Decides whether one node is directly accessible to the user.
    ///
    /// Precedence: the superadmin role bypasses everything; otherwise an
    /// explicit per-path override grant is OR-ed with the conjunction of the
    /// node's role and permission restrictions. An override can only widen
    /// access, never narrow it below the restrictions' intersection.
    #[must_use]
    pub fn can_access(node: &MenuNode, claims: &UserClaims, access_map: &AccessMap) -> bool {
        if claims.holds_role(SystemRole::Superadmin.as_str()) {
            return true;
        }

        let role_allowed = node
            .allowed_roles()
            .permits_any(claims.roles().iter().map(String::as_str));
        let permission_allowed = node
            .allowed_permissions()
            .permits_any(claims.permissions().iter().map(String::as_str));
        let override_allowed = node
            .path()
            .map(|path| access_map.grants_any(claims.roles().iter().map(String::as_str), path))
            .unwrap_or(false);

        override_allowed || (role_allowed && permission_allowed)
    }

    /// Prunes a menu tree to the nodes visible to the user.
    ///
    /// Children are filtered first. A node survives iff its filtered children
    /// are non-empty, or it carries a route path and `can_access` holds; a
    /// grouping node is therefore present exactly when at least one
    /// descendant is. Surviving nodes keep every attribute unchanged except
    /// `children`, which is always the filtered subset in original order.
    #[must_use]
    pub fn filter_tree(
        nodes: &[MenuNode],
        claims: &UserClaims,
        access_map: &AccessMap,
    ) -> Vec<MenuNode> {
        let mut visible = Vec::new();
        for node in nodes {
            let children = Self::filter_tree(node.children(), claims, access_map);
            let directly_accessible =
                node.path().is_some() && Self::can_access(node, claims, access_map);

            if !children.is_empty() || directly_accessible {
                visible.push(node.with_children(children));
            }
        }

        visible
    }
}

fn find_route<'tree>(nodes: &'tree [MenuNode], path: &str) -> Option<&'tree MenuNode> {
    for node in nodes {
        if node.path() == Some(path) {
            return Some(node);
        }
        if let Some(found) = find_route(node.children(), path) {
            return Some(found);
        }
    }

    None
}
