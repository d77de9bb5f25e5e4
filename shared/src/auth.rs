//! Session resolution and CORS for the API lambda.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use lambda_http::http::header::{HeaderMap, HeaderValue, AUTHORIZATION, COOKIE, VARY};
use lambda_http::{Body, Response};

use driverdesk_atoms::error::{AtomError, AtomResult};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Resolves an access token to the id of the signed-in user.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self, access_token: &str) -> AtomResult<String>;
}

/// Verifies tokens against the Cognito user pool. The user id is the `sub`
/// attribute, falling back to the username.
pub struct CognitoVerifier {
    client: CognitoClient,
}

impl CognitoVerifier {
    pub fn new(client: CognitoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SessionVerifier for CognitoVerifier {
    async fn verify(&self, access_token: &str) -> AtomResult<String> {
        let user = self
            .client
            .get_user()
            .access_token(access_token)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("access token rejected: {}", e);
                AtomError::Unauthorized
            })?;

        let sub = user
            .user_attributes()
            .iter()
            .find(|a| a.name() == "sub")
            .and_then(|a| a.value())
            .map(str::to_string);
        Ok(sub.unwrap_or_else(|| user.username().to_string()))
    }
}

/// Fixed token table, for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct StaticVerifier {
    tokens: HashMap<String, String>,
}

impl StaticVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), user_id.into());
        self
    }
}

#[async_trait]
impl SessionVerifier for StaticVerifier {
    async fn verify(&self, access_token: &str) -> AtomResult<String> {
        self.tokens.get(access_token).cloned().ok_or(AtomError::Unauthorized)
    }
}

/// Reads one cookie out of a `Cookie` header.
pub fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name && !value.is_empty()).then(|| value.to_string())
    })
}

/// Access token from the `access_token` cookie, else from a bearer header.
pub fn access_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|h| get_cookie(h, ACCESS_TOKEN_COOKIE));

    from_cookie.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    })
}

/// User id of the request. No token or a rejected token is `Unauthorized`.
pub async fn authenticate(verifier: &dyn SessionVerifier, headers: &HeaderMap) -> AtomResult<String> {
    let token = access_token(headers).ok_or(AtomError::Unauthorized)?;
    verifier.verify(&token).await
}

/// User id when the request carries a valid session; public routes use this.
///
/// A stale token is treated as anonymous rather than rejected.
pub async fn optional_session(verifier: &dyn SessionVerifier, headers: &HeaderMap) -> Option<String> {
    let token = access_token(headers)?;
    match verifier.verify(&token).await {
        Ok(user_id) => Some(user_id),
        Err(_) => {
            tracing::debug!("ignoring invalid session on public route");
            None
        }
    }
}

/// The request origin when it is allowed, otherwise the first allowed origin.
pub fn get_cors_origin(allowed: &[String], request_origin: Option<&str>) -> String {
    match request_origin {
        Some(origin) if allowed.iter().any(|a| a == origin) => origin.to_string(),
        _ => allowed.first().cloned().unwrap_or_default(),
    }
}

pub fn with_cors_headers(mut resp: Response<Body>, allowed: &[String], request_origin: Option<&str>) -> Response<Body> {
    let cors_origin = get_cors_origin(allowed, request_origin);

    let headers = resp.headers_mut();
    if let Ok(origin) = HeaderValue::from_str(&cors_origin) {
        headers.insert("Access-Control-Allow-Origin", origin);
    }
    headers.insert("Access-Control-Allow-Credentials", HeaderValue::from_static("true"));
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET,POST,PUT,PATCH,DELETE,OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type,Authorization,Cookie"),
    );
    headers.append(VARY, HeaderValue::from_static("Origin"));

    resp
}
