//! Gateway-injected identity headers extractor.

use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use uuid::Uuid;

/// Identity injected by the gateway via `x-registry-user-id`,
/// `x-registry-user-role` and (for regional reviewers) `x-registry-region-id`
/// headers.
///
/// Returns 401 if the user id or role is absent or malformed. Role and
/// region enforcement (403) is done by handlers after extraction.
#[derive(Debug, Clone)]
pub struct IdentityHeaders {
    pub user_id: Uuid,
    pub user_role: u8,
    pub region_id: Option<Uuid>,
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get("x-registry-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok());

        let user_role = parts
            .headers
            .get("x-registry-user-role")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u8>().ok());

        let region_id = parts
            .headers
            .get("x-registry-region-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok());

        async move {
            let user_id = user_id.ok_or(StatusCode::UNAUTHORIZED)?;
            let user_role = user_role.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self {
                user_id,
                user_role,
                region_id,
            })
        }
    }
}

/// Role levels injected by the gateway.
pub const ROLE_REGIONAL_REVIEWER: u8 = 1;
pub const ROLE_CENTRAL_ADMIN: u8 = 2;
