use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{decode_jwt, Claims};
use crate::error::ApiError;

/// Requester identity attached to every `/api` request
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub email: String,
    pub name: Option<String>,
    /// No bearer token was sent; `email` is the configured default user
    pub anonymous: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.sub.trim().to_lowercase(),
            name: claims.name,
            anonymous: false,
        }
    }
}

impl AuthUser {
    pub fn anonymous(default_email: &str) -> Self {
        Self {
            email: default_email.trim().to_lowercase(),
            name: None,
            anonymous: true,
        }
    }

    /// Endpoints that act on the caller's own account refuse the default user
    pub fn signed_in(&self) -> Result<&str, ApiError> {
        if self.anonymous {
            return Err(ApiError::unauthorized("Sign in required"));
        }
        Ok(&self.email)
    }
}

/// Validates a bearer token when one is present and falls back to the
/// default user otherwise. A malformed or expired token is rejected rather
/// than downgraded.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = match extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)? {
        Some(token) => {
            let claims = decode_jwt(&token, &state.config.security.jwt_secret).map_err(|e| {
                tracing::debug!("Rejected bearer token: {}", e);
                ApiError::unauthorized(e.to_string())
            })?;
            tracing::debug!(jti = ?claims.jti, "Authenticated {}", claims.sub);
            AuthUser::from(claims)
        }
        None => AuthUser::anonymous(&state.config.access.default_user_email),
    };

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

/// Bearer token from the Authorization header, `None` when the header is absent
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<Option<String>, String> {
    let Some(auth_header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        Some(_) => Err("Empty JWT token".to_string()),
        None => Err("Authorization header must use Bearer token format".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn missing_header_means_anonymous() {
        assert_eq!(extract_jwt_from_headers(&HeaderMap::new()), Ok(None));
    }

    #[test]
    fn bearer_scheme_is_required() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert!(extract_jwt_from_headers(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_jwt_from_headers(&headers), Ok(Some("abc.def".to_string())));
    }

    #[test]
    fn anonymous_users_cannot_act_on_their_account() {
        let user = AuthUser::anonymous("TestUser@niviaq.com");
        assert_eq!(user.email, "testuser@niviaq.com");
        assert!(user.signed_in().is_err());
    }
}
