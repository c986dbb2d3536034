//! Configuration loading and validation tests
//!
//! Tests focus on BEHAVIOR of configuration loading, validation, and error handling.


use image_workflow::config::{ConfigError, RoutingStrategy, WorkflowConfig};
use image_workflow::routing::RoutingTable;
use image_workflow::task::TaskLabel;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use test_helpers::write_config;

#[test]
fn test_config_loads_successfully_from_valid_toml() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(
        temp_file,
        r#"
[workflow]
max_iterations = 8

[routing]
strategy = "classifier"

[routing.classifier]
provider = "openai"
model = "gpt-4o"
api_key_env = "MY_OPENAI_KEY"
temperature = 0.3
max_tokens = 16
base_url = "http://localhost:9999/v1"
timeout_secs = 30
"#
    )
    .unwrap();

    let config = WorkflowConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.workflow.max_iterations, 8);
    assert_eq!(config.routing.strategy, RoutingStrategy::Classifier);
    let classifier = config.routing.classifier.unwrap();
    assert_eq!(classifier.model, "gpt-4o");
    assert_eq!(classifier.api_key_env, "MY_OPENAI_KEY");
    assert_eq!(classifier.max_tokens, Some(16));
    assert_eq!(classifier.base_url.as_deref(), Some("http://localhost:9999/v1"));
    assert_eq!(classifier.timeout_secs, Some(30));
    assert!(classifier.system_prompt.is_none());
}

#[test]
fn test_empty_file_yields_defaults() {
    let (_dir, path) = write_config("");

    let config = WorkflowConfig::load_from_file(&path).unwrap();

    assert_eq!(config, WorkflowConfig::default());
    assert_eq!(config.routing.routing_table().unwrap(), RoutingTable::default());
}

#[test]
fn test_config_fails_when_file_not_found() {
    let result = WorkflowConfig::load_from_file(Path::new("/nonexistent/image-workflow.toml"));
    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}

#[test]
fn test_config_fails_with_malformed_toml() {
    let (_dir, path) = write_config("[workflow\nmax_iterations = ");

    let result = WorkflowConfig::load_from_file(&path);
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_config_fails_with_wrong_field_type() {
    let (_dir, path) = write_config("[workflow]\nmax_iterations = \"ten\"\n");

    let result = WorkflowConfig::load_from_file(&path);
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_custom_routing_table_loads() {
    let (_dir, path) = write_config(
        r#"
[routing.table]
none = "image_generation"
image_generation = "end"
text_overlay = "end"
background_removal = "end"
"#,
    );

    let config = WorkflowConfig::load_from_file(&path).unwrap();
    let table = config.routing.routing_table().unwrap();

    assert_eq!(table.next(None), TaskLabel::ImageGeneration);
    assert_eq!(table.next(Some(TaskLabel::ImageGeneration)), TaskLabel::End);
}

#[test]
fn test_cyclic_routing_table_rejected() {
    let (_dir, path) = write_config(
        r#"
[routing.table]
none = "image_generation"
image_generation = "text_overlay"
text_overlay = "image_generation"
background_removal = "end"
"#,
    );

    let result = WorkflowConfig::load_from_file(&path);
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}

#[test]
fn test_routing_table_with_unknown_label_rejected() {
    let (_dir, path) = write_config(
        r#"
[routing.table]
none = "upscale"
image_generation = "end"
text_overlay = "end"
background_removal = "end"
"#,
    );

    let result = WorkflowConfig::load_from_file(&path);
    match result {
        Err(ConfigError::InvalidConfig(msg)) => assert!(msg.contains("upscale")),
        other => panic!("Expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn test_api_key_read_from_configured_env_var() {
    let (_dir, path) = write_config(
        r#"
[routing]
strategy = "classifier"

[routing.classifier]
api_key_env = "IMAGE_WORKFLOW_CONFIG_TEST_KEY"
"#,
    );
    std::env::set_var("IMAGE_WORKFLOW_CONFIG_TEST_KEY", "sk-test");

    let config = WorkflowConfig::load_from_file(&path).unwrap();
    assert_eq!(config.get_classifier_api_key().unwrap(), "sk-test");

    std::env::remove_var("IMAGE_WORKFLOW_CONFIG_TEST_KEY");
}

#[test]
fn test_deterministic_config_has_no_api_key() {
    let config = WorkflowConfig::default();
    assert!(matches!(
        config.get_classifier_api_key(),
        Err(ConfigError::InvalidConfig(_))
    ));
}

#[test]
fn test_config_round_trips_through_toml() {
    let (_dir, path) = write_config(
        r#"
[workflow]
max_iterations = 4

[routing.classifier]
model = "gpt-4o-mini"
"#,
    );

    let config = WorkflowConfig::load_from_file(&path).unwrap();
    let rendered = toml::to_string_pretty(&config).unwrap();
    let reparsed = WorkflowConfig::from_toml_str(&rendered).unwrap();

    assert_eq!(config, reparsed);
}
