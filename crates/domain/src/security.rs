use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use psephos_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Roles with behavior hard-wired into policy evaluation.
///
/// Membership checks against these names must go through this enumeration so
/// the special-casing lives in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemRole {
    /// Bypasses every visibility rule and owns the wildcard grant.
    Superadmin,
}

impl SystemRole {
    /// Returns the stable role key for this system role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Superadmin => "superadmin",
        }
    }

    /// Resolves a role name to a system role, if it is one.
    #[must_use]
    pub fn from_name(value: &str) -> Option<Self> {
        match value {
            "superadmin" => Some(Self::Superadmin),
            _ => None,
        }
    }
}

/// Validated role name used as the stable key for override-map entries and
/// route matching.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleName(String);

impl RoleName {
    /// Creates a validated role name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        Ok(Self(NonEmptyString::new(value)?.into()))
    }

    /// Returns the well-known superadmin role name.
    #[must_use]
    pub fn superadmin() -> Self {
        Self(SystemRole::Superadmin.as_str().to_owned())
    }

    /// Crate-internal constructor for built-in role keys known to be valid.
    pub(crate) fn from_static(value: &'static str) -> Self {
        Self(value.to_owned())
    }

    /// Returns the underlying role key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether this name identifies the superadmin system role.
    #[must_use]
    pub fn is_superadmin(&self) -> bool {
        SystemRole::from_name(self.as_str()) == Some(SystemRole::Superadmin)
    }
}

impl std::borrow::Borrow<str> for RoleName {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RoleName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.as_str())
    }
}

/// Role record as served by the RBAC backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecord {
    /// Backend-assigned record identifier.
    pub role_id: String,
    /// Stable system key used for override-map entries.
    pub name: RoleName,
    /// Human-readable role label.
    pub display_name: String,
    /// Optional role description.
    pub description: Option<String>,
}

/// Allow-list restriction attached to a menu node.
///
/// An empty restriction places no constraint at all: every subject passes.
/// A non-empty restriction passes when at least one held value intersects it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction(BTreeSet<String>);

impl Restriction {
    /// Creates a restriction that allows every subject.
    #[must_use]
    pub fn unrestricted() -> Self {
        Self(BTreeSet::new())
    }

    /// Creates a restriction from an allow-list of values.
    pub fn of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(values.into_iter().map(Into::into).collect())
    }

    /// Returns whether the restriction allows every subject.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns whether any held value satisfies the restriction.
    ///
    /// Vacuously true when the restriction is empty.
    pub fn permits_any<'a, I>(&self, held: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        if self.is_unrestricted() {
            return true;
        }

        held.into_iter().any(|value| self.0.contains(value))
    }

    /// Iterates the allow-list values in sorted order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Parses a role name, rejecting blank input with a caller-facing message.
pub fn parse_role_name(value: &str) -> AppResult<RoleName> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(
            "a role must be selected before editing sidebar permissions".to_owned(),
        ));
    }

    RoleName::new(value)
}

#[cfg(test)]
mod tests {
    use super::{Restriction, RoleName, SystemRole, parse_role_name};

    #[test]
    fn system_role_roundtrip() {
        assert_eq!(SystemRole::from_name("superadmin"), Some(SystemRole::Superadmin));
        assert_eq!(SystemRole::from_name("admin"), None);
        assert_eq!(SystemRole::Superadmin.as_str(), "superadmin");
    }

    #[test]
    fn role_name_detects_superadmin() {
        let role = RoleName::superadmin();
        assert!(role.is_superadmin());

        let other = RoleName::new("admin");
        assert!(!other.map(|role| role.is_superadmin()).unwrap_or(true));
    }

    #[test]
    fn role_name_rejects_blank_values() {
        assert!(RoleName::new("  ").is_err());
    }

    #[test]
    fn empty_restriction_permits_everyone() {
        let restriction = Restriction::unrestricted();
        assert!(restriction.permits_any(std::iter::empty()));
        assert!(restriction.permits_any(["viewer"]));
    }

    #[test]
    fn restriction_requires_intersection() {
        let restriction = Restriction::of(["admin", "manager"]);
        assert!(restriction.permits_any(["viewer", "manager"]));
        assert!(!restriction.permits_any(["viewer"]));
        assert!(!restriction.permits_any(std::iter::empty()));
    }

    #[test]
    fn parse_role_name_rejects_missing_selection() {
        assert!(parse_role_name("").is_err());
        assert!(parse_role_name("viewer").is_ok());
    }
}
