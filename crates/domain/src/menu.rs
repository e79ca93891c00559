use psephos_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::security::Restriction;

/// A navigation entry in the console sidebar tree.
///
/// Plain recursive tree: every child has exactly one parent by construction,
/// so no arena or index is needed. A node is structurally a leaf route iff it
/// carries a `path`; nodes without a path exist purely for grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    name: NonEmptyString,
    path: Option<String>,
    icon: Option<String>,
    allowed_roles: Restriction,
    allowed_permissions: Restriction,
    children: Vec<MenuNode>,
}

impl MenuNode {
    /// Creates a validated menu node.
    ///
    /// A node must carry a route path or at least one child; a pathless
    /// childless entry could never be rendered or granted.
    pub fn new(
        name: impl Into<String>,
        path: Option<String>,
        icon: Option<String>,
        allowed_roles: Restriction,
        allowed_permissions: Restriction,
        children: Vec<MenuNode>,
    ) -> AppResult<Self> {
        let name = NonEmptyString::new(name)?;
        let path = path.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });

        if path.is_none() && children.is_empty() {
            return Err(AppError::Validation(format!(
                "menu entry '{}' requires a route path or at least one child",
                name.as_str()
            )));
        }

        Ok(Self {
            name,
            path,
            icon,
            allowed_roles,
            allowed_permissions,
            children,
        })
    }

    /// Creates an unrestricted leaf route.
    pub fn route(name: impl Into<String>, path: impl Into<String>) -> AppResult<Self> {
        Self::new(
            name,
            Some(path.into()),
            None,
            Restriction::unrestricted(),
            Restriction::unrestricted(),
            Vec::new(),
        )
    }

    /// Creates an unrestricted grouping node.
    pub fn group(name: impl Into<String>, children: Vec<MenuNode>) -> AppResult<Self> {
        Self::new(
            name,
            None,
            None,
            Restriction::unrestricted(),
            Restriction::unrestricted(),
            children,
        )
    }

    /// Attaches a presentational icon key.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Restricts the node to the given role names.
    #[must_use]
    pub fn with_allowed_roles(mut self, roles: Restriction) -> Self {
        self.allowed_roles = roles;
        self
    }

    /// Restricts the node to the given permission strings.
    #[must_use]
    pub fn with_allowed_permissions(mut self, permissions: Restriction) -> Self {
        self.allowed_permissions = permissions;
        self
    }

    /// Returns the display key used for translation lookup.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the route identifier, if this node is a leaf route.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the presentational icon key, irrelevant to authorization.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Returns the role restriction for this node.
    #[must_use]
    pub fn allowed_roles(&self) -> &Restriction {
        &self.allowed_roles
    }

    /// Returns the permission restriction for this node.
    #[must_use]
    pub fn allowed_permissions(&self) -> &Restriction {
        &self.allowed_permissions
    }

    /// Returns the ordered child entries.
    #[must_use]
    pub fn children(&self) -> &[MenuNode] {
        self.children.as_slice()
    }

    /// Returns a copy of this node carrying the given children instead.
    ///
    /// Used by tree filtering: every attribute except `children` is preserved.
    #[must_use]
    pub fn with_children(&self, children: Vec<MenuNode>) -> Self {
        Self {
            children,
            ..self.clone()
        }
    }
}

/// Flattened route entry used by the permission editor table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// Display key of the route node.
    pub name: String,
    /// Route identifier.
    pub path: String,
}

/// Flattens a menu tree into its route entries in pre-order.
///
/// Exactly the nodes with a defined path appear, parents before children;
/// grouping nodes without a path are skipped but their children are visited.
#[must_use]
pub fn flatten_routes(nodes: &[MenuNode]) -> Vec<MenuEntry> {
    let mut entries = Vec::new();
    collect_routes(nodes, &mut entries);
    entries
}

fn collect_routes(nodes: &[MenuNode], entries: &mut Vec<MenuEntry>) {
    for node in nodes {
        if let Some(path) = node.path() {
            entries.push(MenuEntry {
                name: node.name().to_owned(),
                path: path.to_owned(),
            });
        }
        collect_routes(node.children(), entries);
    }
}
