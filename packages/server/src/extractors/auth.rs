use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::config::AuthConfig;
use crate::error::AppError;
use crate::utils::jwt;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication.
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub role: String,
    pub permissions: Vec<String>,
}

impl AuthUser {
    /// Returns `Ok(())` if the user has the given permission, `Err(PermissionDenied)` otherwise.
    pub fn require_permission(&self, permission: &str) -> Result<(), AppError> {
        if self.permissions.iter().any(|p| p == permission) {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let auth = AuthConfig::from_ref(state);
        let claims = jwt::verify(token, &auth.jwt_secret).map_err(|_| AppError::TokenInvalid)?;

        Ok(AuthUser {
            user_id: claims.uid,
            username: claims.sub,
            role: claims.role,
            permissions: claims.permissions,
        })
    }
}

/// State of the [`require_permission`] middleware: the permission a route demands.
#[derive(Clone)]
pub struct PermissionGate {
    pub auth: AuthConfig,
    pub permission: &'static str,
}

impl PermissionGate {
    pub fn new(auth: &AuthConfig, permission: &'static str) -> Self {
        Self {
            auth: auth.clone(),
            permission,
        }
    }
}

impl FromRef<PermissionGate> for AuthConfig {
    fn from_ref(gate: &PermissionGate) -> Self {
        gate.auth.clone()
    }
}

/// Rejects the request before dispatch unless the caller's token carries
/// the gate's permission.
///
/// Attach with `route_layer(middleware::from_fn_with_state(gate, require_permission))`.
pub async fn require_permission(
    State(gate): State<PermissionGate>,
    auth_user: AuthUser,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Err(e) = auth_user.require_permission(gate.permission) {
        tracing::debug!(
            user_id = auth_user.user_id,
            permission = gate.permission,
            "Permission denied"
        );
        return Err(e);
    }
    Ok(next.run(request).await)
}
