//! Config file loading and layering.

use std::io::Write;

use fal_pipe::config::PipeConfig;
use fal_pipe::error::PipeError;
use pretty_assertions::assert_eq;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn loads_valves_from_file() {
    let file = write_config(
        r#"
        fal_key = "fal-file-key"
        width = 1024
        height = 768
        aspect_ratio = "4:3"
        enable_safety_checker = true
        max_attempts = 2
        "#,
    );

    let config = PipeConfig::from_file(file.path()).unwrap();

    assert_eq!(config.fal_key, "fal-file-key");
    assert_eq!((config.width, config.height), (1024, 768));
    assert_eq!(config.aspect_ratio, "4:3");
    assert!(config.enable_safety_checker);
    assert_eq!(config.max_attempts, 2);
    assert_eq!(config.tag_model, "qwen/qwen-3-vl-32b-instruct");
    let base = config.base_dimensions().unwrap();
    assert_eq!((base.width(), base.height()), (1024, 768));
}

#[test]
fn environment_overrides_file_values() {
    let file = write_config("fal_key = \"from-file\"\nwidth = 1024\n");

    let config = PipeConfig::from_file(file.path())
        .unwrap()
        .with_env(|key| match key {
            "FAL_KEY" => Some("from-env".to_string()),
            _ => None,
        })
        .unwrap();

    assert_eq!(config.fal_key, "from-env");
    assert_eq!(config.width, 1024);
}

#[test]
fn custom_models_extend_registry() {
    let file = write_config(
        r#"
        [[models]]
        id = "falai-imagen4"
        name = "Imagen 4"
        path = "fal-ai/imagen4/preview"

        [[models.tag_rules]]
        tag = "seed"
        parameter = "seed"
        "#,
    );

    let config = PipeConfig::from_file(file.path()).unwrap();
    let registry = config.registry().unwrap();

    let imagen = registry.get("falai-imagen4").unwrap();
    assert_eq!(imagen.parameter_for("seed"), Some("seed"));
    assert_eq!(imagen.parameter_for("ar"), None);
    assert!(registry.get("falai-flux-2").is_some());
}

#[test]
fn invalid_toml_is_config_file_error() {
    let file = write_config("width = \"wide\"");
    let err = PipeConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, PipeError::ConfigFile(_)));
}

#[test]
fn missing_explicit_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = PipeConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, PipeError::Io(_)));
}

#[test]
fn zero_attempts_fail_validation() {
    let file = write_config("max_attempts = 0");
    let config = PipeConfig::from_file(file.path()).unwrap();
    assert!(matches!(config.validate(), Err(PipeError::Configuration(_))));
}
