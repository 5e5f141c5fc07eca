pub mod fakes;
pub mod fixtures;

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use base64::Engine as _;
use findings_server::{api::create_router, state::Stores, AppState, Config};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt as _;

pub use fakes::*;
pub use fixtures::*;

const PRIVATE_KEY: &str = include_str!("keys/private.pem");
const PUBLIC_KEY: &str = include_str!("keys/public.pem");

/// Subject whose client owns `example.com`.
pub const USER: &str = "user-1";
/// Subject whose client owns `other.test`.
pub const OTHER_USER: &str = "user-2";
/// Subject with no registered client.
pub const ORPHAN_USER: &str = "user-without-client";

pub const DOMAIN: &str = "example.com";
pub const OTHER_DOMAIN: &str = "other.test";

pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub fn new(
        findings: Vec<findings_server::models::FindingRow>,
        checklist: Vec<Doc>,
    ) -> anyhow::Result<Self> {
        Self::new_with_config(findings, checklist, |_| {})
    }

    pub fn new_with_config(
        findings: Vec<findings_server::models::FindingRow>,
        checklist: Vec<Doc>,
        configure: impl FnOnce(&mut Config),
    ) -> anyhow::Result<Self> {
        let mut config = Config::default();
        config.auth.public_key =
            Some(base64::engine::general_purpose::STANDARD.encode(PUBLIC_KEY));
        configure(&mut config);

        let stores = Stores {
            findings: Arc::new(FakeFindingStore::new(findings)),
            checklist: Arc::new(FakeChecklistStore::new(checklist)),
            domains: Arc::new(FakeDomains::new([(USER, DOMAIN), (OTHER_USER, OTHER_DOMAIN)])),
        };
        let state = AppState::from_parts(config, stores)?;

        Ok(Self {
            router: create_router(state),
        })
    }

    pub async fn request(
        &self,
        path_and_query: &str,
        extra_headers: &[(header::HeaderName, String)],
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let mut builder = Request::builder().method(Method::GET).uri(path_and_query);
        for (name, value) in extra_headers {
            builder = builder.header(name, value);
        }
        let req = builder.body(Body::empty())?;

        let response = self.router.clone().oneshot(req).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, headers, body))
    }

    /// GET as `subject` with a bearer token.
    pub async fn get_as(
        &self,
        subject: &str,
        path_and_query: &str,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let authz = format!("Bearer {}", token(subject)?);
        self.request(path_and_query, &[(header::AUTHORIZATION, authz)])
            .await
    }

    pub async fn get_json(
        &self,
        subject: &str,
        path_and_query: &str,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let (status, _, body) = self.get_as(subject, path_and_query).await?;
        Ok((status, serde_json::from_slice(&body)?))
    }
}

/// RS256 token for `subject`, valid for an hour.
pub fn token(subject: &str) -> anyhow::Result<String> {
    let exp = chrono::Utc::now().timestamp() + 3600;
    sign(json!({ "sub": subject, "exp": exp }))
}

pub fn sign(claims: Value) -> anyhow::Result<String> {
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY.as_bytes())?;
    Ok(encode(&Header::new(Algorithm::RS256), &claims, &key)?)
}

/// Ids of the `data` array in a list response.
pub fn ids(body: &Value) -> Vec<Value> {
    body["data"]
        .as_array()
        .map(|rows| rows.iter().map(|r| r["id"].clone()).collect())
        .unwrap_or_default()
}

pub fn flags(body: &Value) -> (bool, bool) {
    (
        body["pagination"]["has_next"].as_bool().unwrap_or_default(),
        body["pagination"]["has_previous"].as_bool().unwrap_or_default(),
    )
}
