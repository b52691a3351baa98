//! Demo session middleware for Axum
//!
//! The login is a placeholder: a fixed token cookie marks the browser as
//! signed in and a second cookie carries the email shown on the dashboard.
//! It is not a security boundary.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::domain::DomainError;
use crate::interfaces::http::common::error_response;

/// Value stored in the token cookie after a demo login
pub const SESSION_TOKEN_VALUE: &str = "ok";

/// Cookie names and lifetime
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub email_cookie_name: String,
    pub max_age_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "tokenDemo".to_string(),
            email_cookie_name: "userEmail".to_string(),
            max_age_secs: 2 * 60 * 60,
        }
    }
}

impl SessionConfig {
    pub fn token_cookie(&self) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.cookie_name, SESSION_TOKEN_VALUE, self.max_age_secs
        )
    }

    /// Characters that cannot appear in a cookie value are dropped.
    pub fn email_cookie(&self, email: &str) -> String {
        let value: String = email
            .chars()
            .filter(|c| c.is_ascii_graphic() && !matches!(c, ';' | ',' | '"' | '\\'))
            .collect();
        format!(
            "{}={}; Path=/; SameSite=Lax; Max-Age={}",
            self.email_cookie_name, value, self.max_age_secs
        )
    }

    /// Expired copies of both cookies, for logout
    pub fn clearing_cookies(&self) -> [String; 2] {
        [
            format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", self.cookie_name),
            format!("{}=; Path=/; SameSite=Lax; Max-Age=0", self.email_cookie_name),
        ]
    }
}

/// Session found on a request, inserted into request extensions
#[derive(Clone, Debug)]
pub struct DemoSession {
    pub email: Option<String>,
}

/// Look up a cookie value across all `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// Reject requests without the session token cookie with 401.
pub async fn require_session(
    State(config): State<SessionConfig>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let headers = request.headers();
    match cookie_value(headers, &config.cookie_name) {
        Some(token) if !token.is_empty() => {
            let email = cookie_value(headers, &config.email_cookie_name).filter(|e| !e.is_empty());
            request.extensions_mut().insert(DemoSession { email });
            next.run(request).await
        }
        _ => {
            let err = DomainError::Unauthorized("Login required".into());
            error_response::<()>(err).into_response()
        }
    }
}
