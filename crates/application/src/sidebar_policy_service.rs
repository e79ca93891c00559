use std::sync::Arc;

use async_trait::async_trait;

use psephos_core::{AppError, AppResult, UserClaims};
use psephos_domain::{AccessMap, RoleName, RoleRecord, SIDEBAR_PERMISSIONS_PATH};
use tokio::sync::{Mutex, RwLock};

use crate::NavigationService;

mod editor;

pub use editor::{SidebarEditorRow, SidebarEditorView};

/// Origin of the active access map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicySource {
    /// Loaded from the RBAC backend.
    Backend,
    /// Built-in default substituted after a load failure.
    BuiltinFallback,
}

impl PolicySource {
    /// Returns a stable transport value for this source.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::BuiltinFallback => "builtin_fallback",
        }
    }
}

/// Immutable view of the in-memory sidebar policy state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicySnapshot {
    /// The active per-role override map.
    pub access_map: AccessMap,
    /// Where the map came from.
    pub source: PolicySource,
    /// RFC3339 timestamp of the install.
    pub loaded_at: String,
    /// Whether the map carries edits not yet pushed to the backend.
    pub dirty: bool,
    /// Monotonically increasing state version; usable as a memoization key
    /// for visibility resolution.
    pub version: u64,
}

/// Gateway port for the backend copy of the sidebar permission map.
#[async_trait]
pub trait SidebarPermissionsGateway: Send + Sync {
    /// Fetches the full access map from the backend.
    async fn fetch_access_map(&self) -> AppResult<AccessMap>;

    /// Replaces the backend copy with the given map.
    async fn store_access_map(&self, access_map: &AccessMap) -> AppResult<()>;
}

/// Directory port listing the roles known to the backend.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// Lists all role records.
    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>>;
}

struct PolicyState {
    snapshot: Option<PolicySnapshot>,
    version: u64,
    load_generation: u64,
}

/// Application service owning the sidebar permission map for an editing
/// session.
///
/// The map is explicit state held here and replaced wholesale on every
/// mutation; visibility resolution itself stays pure. Edits are local until
/// an explicit save pushes the full map to the backend.
#[derive(Clone)]
pub struct SidebarPolicyService {
    gateway: Arc<dyn SidebarPermissionsGateway>,
    role_directory: Arc<dyn RoleDirectory>,
    navigation_service: NavigationService,
    state: Arc<RwLock<PolicyState>>,
    save_guard: Arc<Mutex<()>>,
}

impl SidebarPolicyService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn SidebarPermissionsGateway>,
        role_directory: Arc<dyn RoleDirectory>,
        navigation_service: NavigationService,
    ) -> Self {
        Self {
            gateway,
            role_directory,
            navigation_service,
            state: Arc::new(RwLock::new(PolicyState {
                snapshot: None,
                version: 0,
                load_generation: 0,
            })),
            save_guard: Arc::new(Mutex::new(())),
        }
    }

    /// Fetches the access map from the backend and installs it.
    ///
    /// Any load failure is recovered locally by substituting the built-in
    /// default map, so this never blocks rendering. Whatever the payload
    /// contained, the superadmin entry is overwritten with the wildcard
    /// before the map is installed. A result that lost a race against a
    /// newer load is discarded.
    pub async fn load(&self) -> PolicySnapshot {
        let ticket = {
            let mut state = self.state.write().await;
            state.load_generation += 1;
            state.load_generation
        };

        let (access_map, source) = match self.gateway.fetch_access_map().await {
            Ok(map) => (map, PolicySource::Backend),
            Err(error) => {
                tracing::warn!(
                    %error,
                    "failed to load sidebar permissions, falling back to builtin defaults"
                );
                (AccessMap::builtin_default(), PolicySource::BuiltinFallback)
            }
        };
        let access_map = access_map.with_superadmin_wildcard();

        let mut state = self.state.write().await;
        if state.load_generation == ticket || state.snapshot.is_none() {
            state.version += 1;
            state.snapshot = Some(PolicySnapshot {
                access_map,
                source,
                loaded_at: chrono::Utc::now().to_rfc3339(),
                dirty: false,
                version: state.version,
            });
        }

        current_snapshot(&state)
    }

    /// Returns the current snapshot, loading it on first use.
    pub async fn snapshot(&self) -> PolicySnapshot {
        {
            let state = self.state.read().await;
            if let Some(snapshot) = state.snapshot.clone() {
                return snapshot;
            }
        }

        self.load().await
    }

    /// Returns the current snapshot for administrative inspection,
    /// optionally forcing a fresh load from the backend.
    pub async fn inspect(&self, actor: &UserClaims, reload: bool) -> AppResult<PolicySnapshot> {
        self.require_editor_access(actor).await?;

        if reload {
            Ok(self.load().await)
        } else {
            Ok(self.snapshot().await)
        }
    }

    /// Toggles a path grant for a role in the in-memory map.
    ///
    /// Invalid mutations (superadmin target, blank or wildcard path) are
    /// rejected synchronously with no state change and no network call.
    pub async fn toggle_path(
        &self,
        actor: &UserClaims,
        role: &RoleName,
        path: &str,
    ) -> AppResult<PolicySnapshot> {
        self.require_editor_access(actor).await?;
        self.snapshot().await;

        let mut state = self.state.write().await;
        let Some(previous) = state.snapshot.clone() else {
            return Err(AppError::Internal(
                "sidebar permission state is not initialized".to_owned(),
            ));
        };

        let toggled = previous.access_map.clone().toggled(role, path)?;
        state.version += 1;
        let next = PolicySnapshot {
            access_map: toggled,
            dirty: true,
            version: state.version,
            ..previous
        };
        state.snapshot = Some(next.clone());

        Ok(next)
    }

    /// Pushes the full in-memory map to the backend.
    ///
    /// Saves are serialized: a second save for the same session waits for
    /// the first to finish so it cannot overwrite from a stale map. On
    /// failure the in-memory state is left exactly as it was, edits
    /// included.
    pub async fn save(&self, actor: &UserClaims) -> AppResult<PolicySnapshot> {
        self.require_editor_access(actor).await?;
        let _guard = self.save_guard.lock().await;

        let submitted = self.snapshot().await;
        self.gateway.store_access_map(&submitted.access_map).await?;

        let mut state = self.state.write().await;
        if let Some(snapshot) = state.snapshot.as_mut() {
            // Edits racing the PUT keep the dirty flag for the next save.
            if snapshot.version == submitted.version {
                snapshot.dirty = false;
                snapshot.source = PolicySource::Backend;
            }
        }

        Ok(current_snapshot(&state))
    }

    /// Lists the roles available to the permission editor.
    pub async fn list_roles(&self, actor: &UserClaims) -> AppResult<Vec<RoleRecord>> {
        self.require_editor_access(actor).await?;
        self.role_directory.list_roles().await
    }

    async fn require_editor_access(&self, actor: &UserClaims) -> AppResult<()> {
        let snapshot = self.snapshot().await;
        if self.navigation_service.can_access_route(
            actor,
            &snapshot.access_map,
            SIDEBAR_PERMISSIONS_PATH,
        ) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "subject '{}' may not manage sidebar permissions",
            actor.subject()
        )))
    }
}

fn current_snapshot(state: &PolicyState) -> PolicySnapshot {
    state.snapshot.clone().unwrap_or_else(|| PolicySnapshot {
        access_map: AccessMap::builtin_default().with_superadmin_wildcard(),
        source: PolicySource::BuiltinFallback,
        loaded_at: chrono::Utc::now().to_rfc3339(),
        dirty: false,
        version: 0,
    })
}
