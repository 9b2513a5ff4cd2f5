use super::*;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_aniko_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("ANIKO_CATALOG_PATH");
        env::remove_var("ANIKO_MODEL_PATH");
        env::remove_var("ANIKO_TOKENIZER_PATH");
        env::remove_var("ANIKO_GENERATION_MODEL");
        env::remove_var("ANIKO_GENERATION_TIMEOUT_SECS");
        env::remove_var("ANIKO_TOP_K");
        env::remove_var("ANIKO_TOP_N");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.catalog_path, PathBuf::from("./catalog.json"));
    assert!(config.model_path.is_none());
    assert!(config.tokenizer_path.is_none());
    assert!(config.generation_model.is_none());
    assert_eq!(config.generation_timeout_secs, 30);
    assert_eq!(config.top_k, 15);
    assert_eq!(config.top_n, 3);
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_aniko_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.catalog_path, PathBuf::from("./catalog.json"));
    assert_eq!(config.top_k, 15);
    assert_eq!(config.top_n, 3);
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_aniko_env();

    let config = with_env_vars(
        &[
            ("ANIKO_CATALOG_PATH", "/data/catalog.json"),
            ("ANIKO_GENERATION_MODEL", "gpt-4o-mini"),
            ("ANIKO_GENERATION_TIMEOUT_SECS", "5"),
            ("ANIKO_TOP_K", "20"),
            ("ANIKO_TOP_N", "5"),
        ],
        || Config::from_env().expect("should parse overrides"),
    );

    assert_eq!(config.catalog_path, PathBuf::from("/data/catalog.json"));
    assert_eq!(config.generation_model.as_deref(), Some("gpt-4o-mini"));
    assert_eq!(config.generation_timeout_secs, 5);
    assert_eq!(config.top_k, 20);
    assert_eq!(config.top_n, 5);
}

#[test]
#[serial]
fn test_from_env_rejects_non_numeric_top_k() {
    clear_aniko_env();

    let result = with_env_vars(&[("ANIKO_TOP_K", "lots")], Config::from_env);

    assert!(matches!(
        result,
        Err(ConfigError::InvalidNumber { name, .. }) if name == "ANIKO_TOP_K"
    ));
}

#[test]
#[serial]
fn test_from_env_rejects_zero_top_n() {
    clear_aniko_env();

    let result = with_env_vars(&[("ANIKO_TOP_N", "0")], Config::from_env);

    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}

#[test]
#[serial]
fn test_from_env_rejects_top_k_below_top_n() {
    clear_aniko_env();

    let result = with_env_vars(&[("ANIKO_TOP_K", "2")], Config::from_env);

    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue { name, .. }) if name == "ANIKO_TOP_K"
    ));
}

#[test]
#[serial]
fn test_from_env_ignores_blank_optional_paths() {
    clear_aniko_env();

    let config = with_env_vars(&[("ANIKO_MODEL_PATH", "  ")], || {
        Config::from_env().expect("blank value should fall back to None")
    });

    assert!(config.model_path.is_none());
}

#[test]
fn test_validate_missing_model_path() {
    let config = Config {
        model_path: Some(PathBuf::from("/nonexistent/model.safetensors")),
        ..Default::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::PathNotFound { .. })
    ));
}

#[test]
fn test_validate_model_path_must_be_file() {
    let dir = tempfile::tempdir().expect("tempdir");

    let config = Config {
        model_path: Some(dir.path().to_path_buf()),
        ..Default::default()
    };

    assert!(matches!(config.validate(), Err(ConfigError::NotAFile { .. })));
}

#[test]
fn test_generation_timeout_duration() {
    let config = Config {
        generation_timeout_secs: 7,
        ..Default::default()
    };

    assert_eq!(config.generation_timeout(), std::time::Duration::from_secs(7));
}
