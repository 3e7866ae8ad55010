//! # Configuration Loading Tests

use rfpnav_server::config::get_config;
use std::io::Write;
use tempfile::tempdir;

fn write_config(contents: &str) -> (tempfile::TempDir, String) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    let path = path.to_str().unwrap().to_string();
    (dir, path)
}

#[test]
fn loads_yaml_with_defaults() {
    let (_dir, path) = write_config(
        r#"
completion:
  provider: "openai"
  api_url: "http://localhost:1234/v1/chat/completions"
  api_key: "k"
  model: "gpt-4o-mini"
"#,
    );

    let config = get_config(Some(&path)).unwrap();
    assert_eq!(config.request_timeout_secs, 60);
    assert_eq!(config.max_prompt_words, 6000);
    assert_eq!(config.max_context_words, 2000);
    assert!(config.include_page_markers);
    assert!(config.log_sink.is_none());
    assert_eq!(config.completion.model, "gpt-4o-mini");
}

#[test]
fn sampling_overrides_merge_with_library_defaults() {
    let (_dir, path) = write_config(
        r#"
completion:
  provider: "openai"
  api_key: "k"
  model: "custom-model"
sampling:
  temperature: 0.7
  max_tokens: 512
"#,
    );

    let config = get_config(Some(&path)).unwrap();
    let sampling = config.sampling_config();
    assert_eq!(sampling.model, "custom-model");
    assert_eq!(sampling.temperature, 0.7);
    assert_eq!(sampling.max_tokens, 512);
    // Untouched fields keep the library defaults.
    assert_eq!(sampling.top_p, 1.0);
    assert_eq!(sampling.frequency_penalty, 0.0);
}

#[test]
fn env_var_substitution_and_empty_normalization() {
    // RFPNAV_TEST_KEY is set; RFPNAV_TEST_UNSET_SINK is not, so the sink URL
    // collapses to empty and the sink is treated as absent.
    std::env::set_var("RFPNAV_TEST_KEY", "secret-from-env");
    let (_dir, path) = write_config(
        r#"
completion:
  provider: "openai"
  api_key: "${RFPNAV_TEST_KEY}"
  model: "gpt-4o-mini"
log_sink:
  api_url: "${RFPNAV_TEST_UNSET_SINK}"
"#,
    );

    let config = get_config(Some(&path)).unwrap();
    assert_eq!(config.completion.api_key.as_deref(), Some("secret-from-env"));
    assert!(config.log_sink.is_none());
}

#[test]
fn missing_file_is_a_not_found_error() {
    let err = get_config(Some("/nonexistent/config.yml")).unwrap_err();
    assert!(err.to_string().contains("not found"));
}
