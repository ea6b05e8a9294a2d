use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn from_lookup_uses_defaults_when_unset() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg, ClientConfig::default());
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(
        cfg.timeouts,
        Timeouts { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    );
    assert!(cfg.access_token.is_none());
    assert_eq!(cfg.token_role, Role::Admin);
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("REGISTRY_BASE_URL", "https://masters.example.test/api/"),
        ("REGISTRY_REQUEST_TIMEOUT_SECS", "42"),
        ("REGISTRY_CONNECT_TIMEOUT_SECS", "7"),
        ("REGISTRY_PAGE_SIZE", "25"),
        ("REGISTRY_ACCESS_TOKEN", " tok-1 "),
        ("REGISTRY_ROLE", "trainer"),
    ]))
    .unwrap();
    assert_eq!(cfg.base_url, "https://masters.example.test/api");
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 42, connect_secs: 7 });
    assert_eq!(cfg.page_size, 25);
    assert_eq!(cfg.access_token.as_deref(), Some("tok-1"));
    assert_eq!(cfg.token_role, Role::Trainer);
}

#[test]
fn invalid_numbers_fall_back_to_defaults() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("REGISTRY_REQUEST_TIMEOUT_SECS", "soon"),
        ("REGISTRY_PAGE_SIZE", "-3"),
    ]))
    .unwrap();
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    assert_eq!(cfg.page_size, DEFAULT_PAGE_SIZE);
}

#[test]
fn blank_access_token_is_ignored() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("REGISTRY_ACCESS_TOKEN", "   ")])).unwrap();
    assert!(cfg.access_token.is_none());
}

#[test]
fn zero_page_size_is_rejected() {
    let err = ClientConfig::from_lookup(lookup_from(&[("REGISTRY_PAGE_SIZE", "0")])).unwrap_err();
    assert!(matches!(err, RegistryError::Config(_)));
}

#[test]
fn non_http_base_url_is_rejected() {
    let err = ClientConfig::from_lookup(lookup_from(&[("REGISTRY_BASE_URL", "ftp://files.test")])).unwrap_err();
    assert!(matches!(err, RegistryError::Config(ref msg) if msg.contains("ftp://files.test")));
}

#[test]
fn unknown_role_is_rejected() {
    let err = ClientConfig::from_lookup(lookup_from(&[("REGISTRY_ROLE", "root")])).unwrap_err();
    assert!(matches!(err, RegistryError::Config(ref msg) if msg.contains("root")));
}

#[test]
fn base_url_override_is_validated() {
    let cfg = ClientConfig::default().with_base_url("https://other.test/api/").unwrap();
    assert_eq!(cfg.base_url, "https://other.test/api");

    let err = ClientConfig::default().with_base_url("masters.test").unwrap_err();
    assert!(matches!(err, RegistryError::Config(_)));
}
