//! Configuration parsing.

use acore::{ErrorKind, RepositoryRef};
use amadeus::config::{AmadeusConfig, expand_env_vars};

#[test]
fn empty_config_uses_defaults() {
    let config = AmadeusConfig::parse("").unwrap();
    assert_eq!(config.forge.api_url, "https://api.github.com");
    assert_eq!(config.forge.timeout_secs, 30);
    assert_eq!(config.models.default, "gpt-5.2");
    assert_eq!(config.models.max_tokens, 16384);
    assert_eq!(config.pipeline.branch_prefix, "amadeus");
    assert_eq!(config.pipeline.tree_context_limit, 100);
    assert_eq!(config.user.id, "local");
}

#[test]
fn env_references_are_expanded() {
    // SAFETY: the variable name is unique to this test.
    unsafe { std::env::set_var("AMADEUS_TEST_TOKEN", "ghp_from_env") };
    let text = r#"
[user]
repository = "https://github.com/octo/svc"
repo_token = "${AMADEUS_TEST_TOKEN}"
anthropic_key = "${AMADEUS_TEST_UNSET_KEY}"

[models]
timeout_secs = 60
"#;
    let config = AmadeusConfig::parse(text).unwrap();
    assert_eq!(config.models.timeout_secs, 60);
    assert_eq!(config.models.slow_timeout_secs, 300);

    let user = config.user.to_user().unwrap();
    assert_eq!(user.repository, Some(RepositoryRef::new("octo", "svc")));
    assert_eq!(user.credentials.repo_token(), Some("ghp_from_env"));
    assert_eq!(user.credentials.anthropic_key(), None);
    assert!(!user.credentials.has_model_key());
}

#[test]
fn bad_repository_is_a_configuration_error() {
    let config = AmadeusConfig::parse("[user]\nrepository = \"nope\"\n").unwrap();
    let err = config.user.to_user().unwrap_err();
    let err = err.downcast::<acore::Error>().unwrap();
    assert_eq!(err.kind, ErrorKind::Configuration);
}

#[test]
fn unknown_variables_expand_to_nothing() {
    assert_eq!(expand_env_vars("a${AMADEUS_TEST_NOPE}b"), "ab");
    assert_eq!(expand_env_vars("cost: $5 {x}"), "cost: $5 {x}");
}
