//! Explicit session context for authenticated backends.
//!
//! DESIGN
//! ======
//! The login response (`access`, `refresh`, `role`) lives in one shared
//! handle with a defined lifecycle: `begin` at login, `clear` at logout.
//! Anything that needs the bearer token is handed the context explicitly.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::RegistryError;

// =============================================================================
// ROLE
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Trainer,
    #[default]
    Trainee,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Trainer => "trainer",
            Self::Trainee => "trainee",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "admin" => Some(Self::Admin),
            "trainer" => Some(Self::Trainer),
            "trainee" => Some(Self::Trainee),
            _ => None,
        }
    }

    /// Master data is only editable from the admin dashboard.
    #[must_use]
    pub fn can_manage_masters(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SESSION
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub role: Role,
}

impl Session {
    /// A session from a pre-issued access token (e.g. `REGISTRY_ACCESS_TOKEN`).
    #[must_use]
    pub fn from_token(access_token: impl Into<String>, role: Role) -> Self {
        Self { access_token: access_token.into(), refresh_token: None, role }
    }

    /// Parse the login response body `{access, refresh, role}`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Decode`] when `access` is missing or the
    /// role is not one of admin/trainer/trainee.
    pub fn from_login_response(body: &Value) -> Result<Self, RegistryError> {
        let access_token = body
            .get("access")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| RegistryError::Decode("login response without access token".to_owned()))?
            .to_owned();
        let refresh_token = body.get("refresh").and_then(Value::as_str).map(str::to_owned);
        let role = match body.get("role").and_then(Value::as_str) {
            None => Role::default(),
            Some(raw) => {
                Role::parse(raw).ok_or_else(|| RegistryError::Decode(format!("unknown role `{raw}`")))?
            }
        };
        Ok(Self { access_token, refresh_token, role })
    }
}

// =============================================================================
// CONTEXT
// =============================================================================

/// Shared session handle. Clone is cheap; all clones see the same session.
#[derive(Clone, Debug, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session, replacing any previous one.
    pub async fn begin(&self, session: Session) {
        tracing::info!(role = %session.role, "session started");
        *self.inner.write().await = Some(session);
    }

    /// End the current session.
    pub async fn clear(&self) {
        if self.inner.write().await.take().is_some() {
            tracing::info!("session cleared");
        }
    }

    pub async fn current(&self) -> Option<Session> {
        self.inner.read().await.clone()
    }

    pub async fn bearer(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|session| format!("Bearer {}", session.access_token))
    }

    pub async fn role(&self) -> Option<Role> {
        self.inner.read().await.as_ref().map(|session| session.role)
    }
}
