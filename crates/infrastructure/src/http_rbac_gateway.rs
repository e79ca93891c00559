use async_trait::async_trait;
use psephos_application::{RoleDirectory, SidebarPermissionsGateway};
use psephos_core::{AppError, AppResult};
use psephos_domain::{AccessMap, PathGrants, RoleName, RoleRecord};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// HTTP client for the external RBAC backend.
///
/// Responses arrive either as bare JSON payloads or wrapped in the backend's
/// `{success, data}` envelope; both shapes are accepted. Requests are made
/// once, without retries.
pub struct HttpRbacGateway {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpRbacGateway {
    /// Creates a gateway against the given backend base URL.
    #[must_use]
    pub fn new(http_client: reqwest::Client, mut base_url: Url) -> Self {
        // Url::join drops the last path segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            http_client,
            base_url,
        }
    }

    fn endpoint(&self, relative: &str) -> AppResult<Url> {
        self.base_url.join(relative).map_err(|error| {
            AppError::Internal(format!("invalid RBAC endpoint '{relative}': {error}"))
        })
    }

    async fn get_payload(&self, relative: &str) -> AppResult<Value> {
        let url = self.endpoint(relative)?;
        let response = self.http_client.get(url).send().await.map_err(|error| {
            AppError::Upstream(format!("RBAC backend request failed: {error}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "RBAC backend returned status {status} for '{relative}'"
            )));
        }

        response.json::<Value>().await.map_err(|error| {
            AppError::Upstream(format!("RBAC backend returned malformed JSON: {error}"))
        })
    }
}

#[async_trait]
impl SidebarPermissionsGateway for HttpRbacGateway {
    async fn fetch_access_map(&self) -> AppResult<AccessMap> {
        let payload = self.get_payload("rbac/sidebar-permissions").await?;
        decode_access_map(payload)
    }

    async fn store_access_map(&self, access_map: &AccessMap) -> AppResult<()> {
        let url = self.endpoint("rbac/sidebar-permissions")?;
        let response = self
            .http_client
            .put(url)
            .json(access_map)
            .send()
            .await
            .map_err(|error| {
                AppError::Upstream(format!("RBAC backend request failed: {error}"))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<response body unavailable>".to_owned());

        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "saving sidebar permissions failed with status {status}: {body}"
            )));
        }

        if let Ok(Value::Object(envelope)) = serde_json::from_str::<Value>(&body) {
            if envelope.get("success").and_then(Value::as_bool) == Some(false) {
                let message = envelope
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("request was not successful");
                return Err(AppError::Upstream(format!(
                    "saving sidebar permissions failed: {message}"
                )));
            }
        }

        tracing::debug!("sidebar permission map saved to RBAC backend");
        Ok(())
    }
}

#[async_trait]
impl RoleDirectory for HttpRbacGateway {
    async fn list_roles(&self) -> AppResult<Vec<RoleRecord>> {
        let payload = self.get_payload("rbac/roles").await?;
        decode_roles(payload)
    }
}

fn unwrap_envelope(value: Value, context: &str) -> AppResult<Value> {
    let Value::Object(object) = value else {
        return Ok(value);
    };

    if !object.contains_key("success") {
        return Ok(Value::Object(object));
    }

    if object.get("success").and_then(Value::as_bool) != Some(true) {
        let message = object
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("request was not successful");
        return Err(AppError::Upstream(format!("{context}: {message}")));
    }

    object
        .get("data")
        .cloned()
        .ok_or_else(|| AppError::Upstream(format!("{context}: envelope is missing 'data'")))
}

fn decode_access_map(payload: Value) -> AppResult<AccessMap> {
    let payload = unwrap_envelope(payload, "loading sidebar permissions failed")?;
    let Value::Object(object) = payload else {
        return Err(AppError::Upstream(
            "sidebar permission payload is not a JSON object".to_owned(),
        ));
    };

    let mut entries = Vec::with_capacity(object.len());
    for (key, grants) in object {
        let role = RoleName::new(key).map_err(|error| {
            AppError::Upstream(format!(
                "sidebar permission payload contains an invalid role key: {error}"
            ))
        })?;

        let Value::Array(paths) = grants else {
            return Err(AppError::Upstream(format!(
                "grant list for role '{role}' is not an array"
            )));
        };
        let paths = paths
            .into_iter()
            .map(|path| match path {
                Value::String(path) => Ok(path),
                other => Err(AppError::Upstream(format!(
                    "grant list for role '{role}' contains a non-string entry: {other}"
                ))),
            })
            .collect::<AppResult<Vec<String>>>()?;

        entries.push((role, PathGrants::of(paths)));
    }

    Ok(AccessMap::from_entries(entries))
}

#[derive(Debug, Deserialize)]
struct RoleDto {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(rename = "displayName", default)]
    display_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

fn decode_roles(payload: Value) -> AppResult<Vec<RoleRecord>> {
    let payload = unwrap_envelope(payload, "loading roles failed")?;
    let records: Vec<RoleDto> = serde_json::from_value(payload).map_err(|error| {
        AppError::Upstream(format!("role payload is not an array of role records: {error}"))
    })?;

    records
        .into_iter()
        .map(|record| {
            let name = RoleName::new(record.name).map_err(|error| {
                AppError::Upstream(format!("role record '{}' has an invalid name: {error}", record.id))
            })?;
            Ok(RoleRecord {
                role_id: record.id,
                display_name: record.display_name.unwrap_or_else(|| name.as_str().to_owned()),
                name,
                description: record.description,
            })
        })
        .collect()
}
