//! REST backend over `reqwest`.
//!
//! Thin HTTP wrapper for `/{resource}/` and `/{resource}/{id}/`. Status
//! classification lives in the pure `classify` function for testability.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::{Value, json};

use super::backend::Backend;
use super::envelope;
use crate::config::ClientConfig;
use crate::error::RegistryError;
use crate::model::entity::EntityId;
use crate::session::{Session, SessionContext};

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    session: SessionContext,
}

impl HttpBackend {
    /// Build the HTTP client with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Config`] when the TLS/HTTP stack cannot be
    /// initialized.
    pub fn new(config: &ClientConfig, session: SessionContext) -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| RegistryError::Config(format!("http client: {e}")))?;
        Ok(Self { http, base_url: config.base_url.clone(), session })
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Exchange credentials for a session and make it current.
    ///
    /// # Errors
    ///
    /// Returns `Server { status: 401, .. }` for bad credentials, `Network` on
    /// transport failure, `Decode` for a malformed success body.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, RegistryError> {
        let url = format!("{}/login/", self.base_url);
        let body = json!({ "email": email, "password": password });
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RegistryError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RegistryError::Network(e.to_string()))?;
        let body = parse_body(&text);

        if status == StatusCode::UNAUTHORIZED {
            let message = envelope::detail_message(&body).unwrap_or_else(|| "Invalid credentials".to_owned());
            return Err(RegistryError::Server { status: status.as_u16(), message });
        }
        if !status.is_success() {
            return Err(classify(status.as_u16(), &body));
        }

        let session = Session::from_login_response(&body)?;
        self.session.begin(session.clone()).await;
        Ok(session)
    }

    /// Drop the current session.
    pub async fn logout(&self) {
        self.session.clear().await;
    }

    async fn send(&self, method: Method, url: String, body: Option<&Value>) -> Result<Value, RegistryError> {
        let mut request = self.http.request(method.clone(), &url);
        if let Some(bearer) = self.session.bearer().await {
            request = request.header(reqwest::header::AUTHORIZATION, bearer);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "backend request failed");
            RegistryError::Network(e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RegistryError::Network(e.to_string()))?;
        let body = parse_body(&text);

        if !status.is_success() {
            tracing::debug!(%method, %url, status = status.as_u16(), "backend rejected request");
            return Err(classify(status.as_u16(), &body));
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn list(&self, resource: &str) -> Result<Value, RegistryError> {
        self.send(Method::GET, collection_url(&self.base_url, resource), None)
            .await
    }

    async fn create(&self, resource: &str, body: &Value) -> Result<Value, RegistryError> {
        self.send(Method::POST, collection_url(&self.base_url, resource), Some(body))
            .await
    }

    async fn update(&self, resource: &str, id: EntityId, body: &Value) -> Result<Value, RegistryError> {
        self.send(Method::PUT, item_url(&self.base_url, resource, id), Some(body))
            .await
    }

    async fn patch(&self, resource: &str, id: EntityId, body: &Value) -> Result<Value, RegistryError> {
        self.send(Method::PATCH, item_url(&self.base_url, resource, id), Some(body))
            .await
    }

    async fn delete(&self, resource: &str, id: EntityId) -> Result<(), RegistryError> {
        self.send(Method::DELETE, item_url(&self.base_url, resource, id), None)
            .await
            .map(|_| ())
    }
}

// =============================================================================
// PURE HELPERS
// =============================================================================

fn collection_url(base_url: &str, resource: &str) -> String {
    format!("{base_url}/{resource}/")
}

fn item_url(base_url: &str, resource: &str, id: EntityId) -> String {
    format!("{base_url}/{resource}/{id}/")
}

/// Empty bodies (204, bare 201) read as `null`; non-JSON text is kept as a
/// string so it can still surface in error messages.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.trim().to_owned()))
}

/// Map a non-2xx response to the error taxonomy.
///
/// 409 is always a conflict. A 400 carrying a field-to-messages payload is a
/// conflict with the first offending field's first message. Everything else
/// is a server error with the best available detail.
fn classify(status: u16, body: &Value) -> RegistryError {
    match status {
        409 => RegistryError::Conflict(envelope::rejection_message(body)),
        400 => match envelope::field_rejection(body) {
            Some(message) => RegistryError::Conflict(message),
            None => RegistryError::Server { status, message: envelope::rejection_message(body) },
        },
        _ => RegistryError::Server { status, message: envelope::rejection_message(body) },
    }
}
