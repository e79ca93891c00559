use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use psephos_core::{AppError, UserClaims};

use crate::error::ApiResult;
use crate::state::AppState;

const SUBJECT_HEADER: &str = "x-auth-subject";
const NAME_HEADER: &str = "x-auth-name";
const ROLES_HEADER: &str = "x-auth-roles";
const PERMISSIONS_HEADER: &str = "x-auth-permissions";

/// Extracts session claims forwarded by the auth layer in front of this
/// service and attaches them to the request.
pub async fn require_claims(mut request: Request, next: Next) -> ApiResult<Response> {
    let claims = claims_from_headers(request.headers())?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if let Some(fetch_site) = headers.get("sec-fetch-site") {
            if fetch_site == HeaderValue::from_static("cross-site") {
                return Err(AppError::Unauthorized("cross-site request blocked".to_owned()).into());
            }
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let referer = headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        let allowed_origin = state.frontend_url;
        let origin_is_allowed = origin == allowed_origin;
        let referer_is_allowed = referer.starts_with(&allowed_origin);

        if !origin_is_allowed && !referer_is_allowed {
            return Err(AppError::Unauthorized("origin validation failed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

fn claims_from_headers(headers: &HeaderMap) -> Result<UserClaims, AppError> {
    let subject = header_value(headers, SUBJECT_HEADER)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let display_name = header_value(headers, NAME_HEADER).unwrap_or_else(|| subject.clone());
    let roles = split_csv(header_value(headers, ROLES_HEADER).as_deref().unwrap_or_default());
    let permissions = split_csv(
        header_value(headers, PERMISSIONS_HEADER)
            .as_deref()
            .unwrap_or_default(),
    );

    Ok(UserClaims::new(subject, display_name, roles, permissions))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned)
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue};

    use super::{claims_from_headers, split_csv};

    #[test]
    fn split_csv_trims_and_drops_empties() {
        assert_eq!(split_csv("admin, viewer ,,"), ["admin", "viewer"]);
        assert!(split_csv("").is_empty());
    }

    #[test]
    fn claims_require_a_subject() {
        let headers = HeaderMap::new();
        assert!(claims_from_headers(&headers).is_err());
    }

    #[test]
    fn claims_are_assembled_from_forwarded_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-auth-subject", HeaderValue::from_static("alice"));
        headers.insert("x-auth-roles", HeaderValue::from_static("admin,admin,viewer"));
        headers.insert(
            "x-auth-permissions",
            HeaderValue::from_static("manage_roles, manage_users"),
        );

        let claims = claims_from_headers(&headers);
        let Ok(claims) = claims else {
            panic!("claims should parse");
        };
        assert_eq!(claims.subject(), "alice");
        assert_eq!(claims.display_name(), "alice");
        assert_eq!(claims.roles(), ["admin", "viewer"]);
        assert_eq!(claims.permissions(), ["manage_roles", "manage_users"]);
    }
}
