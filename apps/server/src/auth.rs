//! Caller authentication.
//!
//! Tokens are RS256 JWTs signed by the identity service. The `sub` claim is
//! the user whose client domain scopes every listing.

use axum::{
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderMap},
    response::{IntoResponse, Response},
};
use base64::Engine;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{config::AuthConfig, state::AppState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub subject: String,
}

#[derive(Debug, Clone)]
pub enum AuthError {
    MissingToken,
    InvalidToken(String),
    Misconfigured(String),
}

impl AuthError {
    fn diagnostics(&self) -> String {
        match self {
            Self::MissingToken => "Missing bearer token".to_string(),
            Self::InvalidToken(msg) => format!("Invalid bearer token: {msg}"),
            Self::Misconfigured(msg) => format!("Authentication misconfigured: {msg}"),
        }
    }
}

impl From<AuthError> for crate::Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Misconfigured(_) => crate::Error::Internal(err.diagnostics()),
            _ => crate::Error::Unauthorized(err.diagnostics()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        crate::Error::from(self).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

/// Verifies tokens against the configured public key.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
    cookie_name: String,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let encoded = config
            .public_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AuthError::Misconfigured("auth.public_key is not set".to_string()))?;

        let pem = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| AuthError::Misconfigured(format!("public key is not base64: {e}")))?;
        let key = DecodingKey::from_rsa_pem(&pem)
            .map_err(|e| AuthError::Misconfigured(format!("public key is not an RSA PEM: {e}")))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = config.leeway_seconds;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            key,
            validation,
            cookie_name: config.cookie_name.clone(),
        })
    }

    pub fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::InvalidToken("token has an empty subject".to_string()));
        }
        Ok(Principal {
            subject: data.claims.sub,
        })
    }

    /// Authenticate from the session cookie, falling back to `Authorization`.
    pub fn authenticate_headers(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        let token = cookie_value(headers, &self.cookie_name)
            .map(Ok)
            .or_else(|| bearer_token(headers))
            .ok_or(AuthError::MissingToken)??;
        self.verify(token)
    }
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<Result<&str, AuthError>> {
    let authz = headers.get(header::AUTHORIZATION)?;
    let parsed = authz
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Authorization header is not valid UTF-8".to_string()))
        .and_then(|authz| {
            authz
                .strip_prefix("Bearer ")
                .or_else(|| authz.strip_prefix("bearer "))
                .map(str::trim)
                .ok_or_else(|| {
                    AuthError::InvalidToken(
                        "Authorization header must be 'Bearer <token>'".to_string(),
                    )
                })
        });
    Some(parsed)
}

/// Extractor for the principal attached by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal(pub Principal);

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedPrincipal
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthenticatedPrincipal)
            .ok_or_else(|| AuthError::MissingToken.into_response())
    }
}

/// Rejects unauthenticated requests to the API routes.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    if req.method() == axum::http::Method::OPTIONS {
        return next.run(req).await;
    }

    match state.auth.authenticate_headers(req.headers()) {
        Ok(principal) => {
            req.extensions_mut().insert::<Principal>(principal);
            next.run(req).await
        }
        Err(err) => {
            tracing::info!(
                reason = %err.diagnostics(),
                path = %req.uri().path(),
                "request rejected"
            );
            err.into_response()
        }
    }
}
