use serde::{Deserialize, Serialize};

/// Session claims established at login by the external auth layer.
///
/// Claims are read-only input to this service: roles and permissions are
/// deduplicated at construction and never change without re-authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    subject: String,
    display_name: String,
    roles: Vec<String>,
    permissions: Vec<String>,
}

impl UserClaims {
    /// Creates session claims from authentication data.
    ///
    /// Role and permission sets are deduplicated preserving first-seen order;
    /// the permission input is expected to already be the union of direct
    /// grants and any permissions attached to user metadata.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        display_name: impl Into<String>,
        roles: Vec<String>,
        permissions: Vec<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            display_name: display_name.into(),
            roles: dedup_preserving_order(roles),
            permissions: dedup_preserving_order(permissions),
        }
    }

    /// Returns the stable subject claim from the identity provider.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the deduplicated role names held by the user.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        self.roles.as_slice()
    }

    /// Returns the deduplicated permission strings held by the user.
    #[must_use]
    pub fn permissions(&self) -> &[String] {
        self.permissions.as_slice()
    }

    /// Returns whether the user holds the given role name.
    #[must_use]
    pub fn holds_role(&self, role_name: &str) -> bool {
        self.roles.iter().any(|held| held == role_name)
    }
}

fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut deduplicated = Vec::with_capacity(values.len());
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !deduplicated.iter().any(|seen: &String| seen == trimmed) {
            deduplicated.push(trimmed.to_owned());
        }
    }

    deduplicated
}
