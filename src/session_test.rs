use super::*;
use serde_json::json;

#[test]
fn role_roundtrip_str() {
    for role in [Role::Admin, Role::Trainer, Role::Trainee] {
        assert_eq!(Role::parse(role.as_str()), Some(role));
    }
}

#[test]
fn role_parse_invalid_returns_none() {
    assert_eq!(Role::parse("owner"), None);
    assert_eq!(Role::parse("ADMIN"), None);
    assert_eq!(Role::parse(""), None);
}

#[test]
fn only_admin_manages_masters() {
    assert!(Role::Admin.can_manage_masters());
    assert!(!Role::Trainer.can_manage_masters());
    assert!(!Role::Trainee.can_manage_masters());
}

#[test]
fn login_response_parses_tokens_and_role() {
    let session = Session::from_login_response(&json!({"access": "a-1", "refresh": "r-1", "role": "admin"})).unwrap();
    assert_eq!(session.access_token, "a-1");
    assert_eq!(session.refresh_token.as_deref(), Some("r-1"));
    assert_eq!(session.role, Role::Admin);
}

#[test]
fn login_response_defaults_role_to_trainee() {
    let session = Session::from_login_response(&json!({"access": "a-1"})).unwrap();
    assert_eq!(session.role, Role::Trainee);
    assert!(session.refresh_token.is_none());
}

#[test]
fn login_response_without_access_errors() {
    assert!(matches!(
        Session::from_login_response(&json!({"error": "Invalid credentials"})),
        Err(RegistryError::Decode(_))
    ));
    assert!(matches!(
        Session::from_login_response(&json!({"access": "a", "role": "root"})),
        Err(RegistryError::Decode(_))
    ));
}

#[tokio::test]
async fn context_lifecycle_begin_then_clear() {
    let ctx = SessionContext::new();
    assert!(ctx.current().await.is_none());
    assert!(ctx.bearer().await.is_none());

    ctx.begin(Session::from_token("tok", Role::Admin)).await;
    assert_eq!(ctx.bearer().await.as_deref(), Some("Bearer tok"));
    assert_eq!(ctx.role().await, Some(Role::Admin));

    ctx.clear().await;
    assert!(ctx.current().await.is_none());
    assert!(ctx.role().await.is_none());
}

#[tokio::test]
async fn context_clones_share_state() {
    let ctx = SessionContext::new();
    let other = ctx.clone();
    ctx.begin(Session::from_token("shared", Role::Trainer)).await;
    assert_eq!(other.role().await, Some(Role::Trainer));
}
