//! Client configuration parsed from environment variables.

use crate::error::RegistryError;
use crate::session::Role;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeouts: Timeouts,
    pub page_size: usize,
    pub access_token: Option<String>,
    /// Role assumed for `access_token`; a login response carries its own.
    pub token_role: Role,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeouts: Timeouts::default(),
            page_size: DEFAULT_PAGE_SIZE,
            access_token: None,
            token_role: Role::Admin,
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `REGISTRY_BASE_URL`: API root, default `http://127.0.0.1:8000/api`
    /// - `REGISTRY_REQUEST_TIMEOUT_SECS`: default 30
    /// - `REGISTRY_CONNECT_TIMEOUT_SECS`: default 10
    /// - `REGISTRY_PAGE_SIZE`: rows per listed page, default 50
    /// - `REGISTRY_ACCESS_TOKEN`: pre-issued bearer token
    /// - `REGISTRY_ROLE`: role of that token (`admin`, `trainer`, `trainee`),
    ///   default `admin`
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Config`] for a non-http(s) base URL, a zero
    /// page size, or an unknown role.
    pub fn from_env() -> Result<Self, RegistryError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Same as [`ClientConfig::from_env`] over an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RegistryError> {
        let base_url = parse_base_url(lookup("REGISTRY_BASE_URL").as_deref())?;
        let timeouts = Timeouts {
            request_secs: parse_or(&lookup, "REGISTRY_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_or(&lookup, "REGISTRY_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let page_size = parse_or(&lookup, "REGISTRY_PAGE_SIZE", DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(RegistryError::Config("REGISTRY_PAGE_SIZE must be greater than zero".into()));
        }
        let access_token = lookup("REGISTRY_ACCESS_TOKEN")
            .map(|token| token.trim().to_owned())
            .filter(|token| !token.is_empty());
        let token_role = match lookup("REGISTRY_ROLE") {
            None => Role::Admin,
            Some(raw) => Role::parse(raw.trim())
                .ok_or_else(|| RegistryError::Config(format!("REGISTRY_ROLE is not a known role: {raw}")))?,
        };

        Ok(Self { base_url, timeouts, page_size, access_token, token_role })
    }

    /// Replace the base URL, validated like `REGISTRY_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Config`] for a non-http(s) URL.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, RegistryError> {
        self.base_url = parse_base_url(Some(raw))?;
        Ok(self)
    }
}

/// Unset or unparseable values fall back to `default`.
fn parse_or<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key).map(|raw| raw.trim().parse::<T>()) {
        Some(Ok(value)) => value,
        _ => default,
    }
}

fn parse_base_url(raw: Option<&str>) -> Result<String, RegistryError> {
    let url = raw.unwrap_or(DEFAULT_BASE_URL).trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(RegistryError::Config(format!("REGISTRY_BASE_URL must be http(s): {url}")));
    }
    Ok(url.to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
