use std::collections::BTreeMap;

use psephos_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::security::RoleName;

/// Sentinel path granting every route; the stored form of the superadmin entry.
pub const WILDCARD_PATH: &str = "*";

/// Ordered, duplicate-free list of route paths granted to one role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathGrants(Vec<String>);

impl PathGrants {
    /// Creates an empty grant list.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates a grant list from paths, deduplicating while preserving order.
    pub fn of<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut grants = Self::new();
        for path in paths {
            grants.insert(path.into());
        }
        grants
    }

    /// Creates the wildcard grant list.
    #[must_use]
    pub fn wildcard() -> Self {
        Self(vec![WILDCARD_PATH.to_owned()])
    }

    /// Returns whether the list grants the given path.
    ///
    /// A wildcard entry grants every path.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.0
            .iter()
            .any(|granted| granted == path || granted == WILDCARD_PATH)
    }

    /// Returns whether the list grants the path literally, ignoring wildcards.
    #[must_use]
    pub fn contains_exact(&self, path: &str) -> bool {
        self.0.iter().any(|granted| granted == path)
    }

    /// Returns whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the granted paths in insertion order.
    #[must_use]
    pub fn paths(&self) -> &[String] {
        self.0.as_slice()
    }

    fn insert(&mut self, path: String) {
        if !self.contains_exact(&path) {
            self.0.push(path);
        }
    }

    fn remove(&mut self, path: &str) {
        self.0.retain(|granted| granted != path);
    }
}

/// Per-role override map of explicitly granted navigation paths.
///
/// Independent of the tree's role/permission restrictions: an entry can only
/// widen access, never narrow it. Mutations produce a new map; the in-memory
/// copy held by an editing session is replaced wholesale, never aliased.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessMap(BTreeMap<RoleName, PathGrants>);

impl AccessMap {
    /// Creates an empty access map.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Creates a map from role entries.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (RoleName, PathGrants)>,
    {
        Self(entries.into_iter().collect())
    }

    /// The built-in fallback map used when the backend copy cannot be loaded.
    #[must_use]
    pub fn builtin_default() -> Self {
        Self::from_entries([
            (RoleName::superadmin(), PathGrants::wildcard()),
            (
                RoleName::from_static("admin"),
                PathGrants::of([
                    "/dashboard",
                    "/geography/states",
                    "/geography/divisions",
                    "/geography/districts",
                    "/geography/assemblies",
                    "/geography/blocks",
                    "/geography/booths",
                    "/records",
                    "/users",
                    "/roles",
                    "/settings/sidebar-permissions",
                ]),
            ),
            (
                RoleName::from_static("state_admin"),
                PathGrants::of([
                    "/dashboard",
                    "/geography/districts",
                    "/geography/assemblies",
                    "/geography/blocks",
                    "/geography/booths",
                ]),
            ),
            (
                RoleName::from_static("viewer"),
                PathGrants::of(["/dashboard"]),
            ),
        ])
    }

    /// Returns a map with the superadmin entry forced to the wildcard.
    ///
    /// Applied unconditionally after every load and before every save:
    /// backend data for the superadmin key is never trusted.
    #[must_use]
    pub fn with_superadmin_wildcard(mut self) -> Self {
        self.0
            .insert(RoleName::superadmin(), PathGrants::wildcard());
        self
    }

    /// Returns whether the role's entry grants the path.
    #[must_use]
    pub fn grants(&self, role: &RoleName, path: &str) -> bool {
        self.0
            .get(role)
            .map(|grants| grants.contains(path))
            .unwrap_or(false)
    }

    /// Returns whether any of the held role names grants the path.
    ///
    /// Override lookup unions across all of a user's roles.
    pub fn grants_any<'a, I>(&self, held_roles: I, path: &str) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        held_roles.into_iter().any(|held| {
            self.0
                .get(held)
                .map(|grants| grants.contains(path))
                .unwrap_or(false)
        })
    }

    /// Returns the grant list for a role, if present.
    #[must_use]
    pub fn paths_for(&self, role: &RoleName) -> Option<&PathGrants> {
        self.0.get(role)
    }

    /// Iterates role entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&RoleName, &PathGrants)> {
        self.0.iter()
    }

    /// Returns a map with the path toggled for the role: removed when
    /// present, added when absent.
    ///
    /// Rejected without any state change when the role is superadmin (its
    /// grants are never user-editable) or when the path is blank or the
    /// wildcard sentinel.
    pub fn toggled(mut self, role: &RoleName, path: &str) -> AppResult<Self> {
        if role.is_superadmin() {
            return Err(AppError::Validation(
                "sidebar permissions for 'superadmin' cannot be edited".to_owned(),
            ));
        }
        if path.trim().is_empty() {
            return Err(AppError::Validation(
                "a route path is required to toggle sidebar permissions".to_owned(),
            ));
        }
        if path == WILDCARD_PATH {
            return Err(AppError::Validation(
                "the wildcard grant cannot be toggled directly".to_owned(),
            ));
        }

        let grants = self.0.entry(role.clone()).or_default();
        if grants.contains_exact(path) {
            grants.remove(path);
        } else {
            grants.insert(path.to_owned());
        }

        Ok(self)
    }
}
