//! End-to-end translation tests
//!
//! Profiles are loaded from JSON files the way the command line does it and
//! evaluated against realistic input snapshots.

use fedpolicy_core::{Attribute, GroupPath, Identity};
use fedpolicy_engine::context::AuthenticationContext;
use fedpolicy_engine::translation::ActionKind;
use fedpolicy_engine::{
    EngineConfig, EngineError, InMemoryProfileRepository, ProfileRepository, TranslationEngine,
    TranslationInput, TranslationProfile, TranslationRule,
};
use std::io::Write;
use std::sync::Arc;

const PROFILES: &str = r#"[
    {
        "name": "sys:default",
        "description": "Default output profile",
        "rules": [
            {"condition": "true", "action": {"action": "includeProfile", "profile": "sys:common"}},
            {"condition": "requester == 'https://blocked.example.com'", "action": {"action": "executionBreak"}},
            {"condition": "mfa", "action": {"action": "createAttribute", "name": "assurance", "expression": "'high'"}},
            {"condition": "true", "action": {"action": "filterAttribute", "pattern": "internal.*"}}
        ]
    },
    {
        "name": "sys:common",
        "rules": [
            {"condition": "'user1' in idsByType['userName']", "action": {"action": "createIdentity", "identityType": "email", "expression": "attr['email']"}},
            {"condition": "true", "action": {"action": "createAttribute", "name": "org", "expression": "'ACME'", "displayName": "Organization"}}
        ]
    }
]"#;

fn load_repository() -> InMemoryProfileRepository {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PROFILES.as_bytes()).unwrap();
    InMemoryProfileRepository::from_file(file.path()).unwrap()
}

fn input(requester: &str) -> TranslationInput {
    TranslationInput::new("saml", requester)
        .with_identity(Identity::new("userName", "user1"))
        .with_attribute(Attribute::string("email", GroupPath::root(), ["user1@example.com"]))
        .with_attribute(Attribute::string("internalId", GroupPath::root(), ["42"]))
        .with_group(GroupPath::root())
}

// ============================================================================
// PROFILES LOADED FROM FILES
// ============================================================================

#[test]
fn test_profiles_from_file() {
    let repository = load_repository();
    assert_eq!(repository.list(), vec!["sys:common", "sys:default"]);
    assert_eq!(repository.get("sys:common").unwrap().rules.len(), 2);
}

#[test]
fn test_missing_profile_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = InMemoryProfileRepository::from_file(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, EngineError::Io(_)));
}

#[test]
fn test_malformed_profile_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"[{"name": "p", "rules": [{"action": {"action": "noSuchAction"}}]}]"#)
        .unwrap();
    let err = InMemoryProfileRepository::from_file(file.path()).unwrap_err();
    assert!(matches!(err, EngineError::Serialization(_)));
}

// ============================================================================
// FULL TRANSLATIONS
// ============================================================================

#[test]
fn test_default_profile_single_factor() {
    let engine = TranslationEngine::new(Arc::new(load_repository()));
    let result = engine
        .translate_named("sys:default", &input("https://sp.example.com"))
        .unwrap();

    let names: Vec<&str> = result.attributes().map(|a| a.name()).collect();
    assert_eq!(names, vec!["email", "org"]);
    assert_eq!(
        result.attribute("org").unwrap().display_name.as_deref(),
        Some("Organization")
    );
    assert!(result.has_identity(&Identity::new("email", "user1@example.com")));
    assert!(result.has_identity(&Identity::new("userName", "user1")));
    assert_eq!(result.attributes_to_persist().count(), 0);
}

#[test]
fn test_default_profile_multi_factor() {
    let engine = TranslationEngine::new(Arc::new(load_repository()));
    let session = AuthenticationContext::local(["user1"])
        .with_authenticator("pwd")
        .with_authenticator("otp");
    let result = engine
        .translate_named(
            "sys:default",
            &input("https://sp.example.com").with_authentication(session),
        )
        .unwrap();

    assert_eq!(result.attribute("assurance").unwrap().attribute.values, vec!["high"]);
}

#[test]
fn test_break_keeps_included_work() {
    let engine = TranslationEngine::new(Arc::new(load_repository()));
    let result = engine
        .translate_named("sys:default", &input("https://blocked.example.com"))
        .unwrap();

    // Included rules ran, the filter after the break did not
    assert!(result.attribute("org").is_some());
    assert!(result.attribute("internalId").is_some());
}

#[test]
fn test_result_json_shape() {
    let engine = TranslationEngine::new(Arc::new(load_repository()));
    let result = engine
        .translate_named("sys:default", &input("https://sp.example.com"))
        .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["attributes"].as_array().unwrap().len(), 2);
    assert_eq!(json["attributesToPersist"], serde_json::json!([]));
    assert_eq!(json["identities"].as_array().unwrap().len(), 2);
    assert_eq!(json["identitiesToPersist"], serde_json::json!([]));
}

#[test]
fn test_input_from_json() {
    let raw = r#"{
        "protocol": "oidc",
        "requester": "client-1",
        "identities": [{"typeId": "userName", "value": "user1"}],
        "attributes": [{"name": "email", "groupPath": "/", "values": ["user1@example.com"]}],
        "groups": ["/", "/staff"],
        "authentication": {"authenticatedWith": ["user1"], "remoteIdp": "https://idp.example.com"}
    }"#;
    let input: TranslationInput = serde_json::from_str(raw).unwrap();

    let engine = TranslationEngine::builder().build();
    let profile = TranslationProfile::new(
        "p",
        vec![
            TranslationRule::new(
                "protocol == 'oidc' && '/staff' in groups",
                ActionKind::create_attribute("staff", "'yes'"),
            ),
            TranslationRule::new(
                "idp == 'https://idp.example.com'",
                ActionKind::create_attribute("federated", "true"),
            ),
        ],
    );

    let result = engine.translate(&profile, &input).unwrap();
    assert_eq!(result.attribute("staff").unwrap().attribute.values, vec!["yes"]);
    assert_eq!(result.attribute("federated").unwrap().attribute.values, vec!["true"]);
}

// ============================================================================
// CONFIGURATION ERRORS
// ============================================================================

#[test]
fn test_cycle_through_repository() {
    let json = r#"[
        {"name": "a", "rules": [{"action": {"action": "includeProfile", "profile": "b"}}]},
        {"name": "b", "rules": [{"action": {"action": "includeProfile", "profile": "a"}}]}
    ]"#;
    let engine = TranslationEngine::new(Arc::new(InMemoryProfileRepository::from_json(json).unwrap()));

    let err = engine.translate_named("a", &input("sp")).unwrap_err();
    assert_eq!(err.to_string(), "Translation profile inclusion cycle: a -> b -> a");
    assert!(err.is_configuration());
}

#[test]
fn test_missing_included_profile_names_rule() {
    let json = r#"[
        {"name": "a", "rules": [
            {"action": {"action": "createAttribute", "name": "x", "expression": "'1'"}},
            {"action": {"action": "includeProfile", "profile": "ghost"}}
        ]}
    ]"#;
    let engine = TranslationEngine::new(Arc::new(InMemoryProfileRepository::from_json(json).unwrap()));

    let err = engine.translate_named("a", &input("sp")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The translation profile 'ghost' included in profile 'a' (rule 2) does not exist"
    );
}

#[test]
fn test_shallow_depth_limit() {
    let json = r#"[
        {"name": "a", "rules": [{"action": {"action": "includeProfile", "profile": "b"}}]},
        {"name": "b", "rules": [{"action": {"action": "includeProfile", "profile": "c"}}]},
        {"name": "c", "rules": []}
    ]"#;
    let repository = Arc::new(InMemoryProfileRepository::from_json(json).unwrap());

    let engine = TranslationEngine::builder()
        .repository(repository.clone())
        .config(EngineConfig {
            max_inclusion_depth: 2,
            ..Default::default()
        })
        .build();
    assert!(engine.translate_named("a", &input("sp")).unwrap_err().is_configuration());
    assert!(engine.translate_named("b", &input("sp")).is_ok());

    let engine = TranslationEngine::new(repository);
    assert!(engine.translate_named("a", &input("sp")).is_ok());
}
