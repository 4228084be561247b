// Tests for layered configuration resolution: defaults, file, env, flags

use std::path::PathBuf;

use docqa::cli::ConfigArgs;
use docqa::PipelineError;

fn args() -> ConfigArgs {
    ConfigArgs {
        config: None,
        data_dir: None,
        chunk_size: None,
        chunk_overlap: None,
        top_k: None,
        offline: false,
    }
}

#[test]
fn test_flags_override_defaults() {
    let mut a = args();
    a.data_dir = Some(PathBuf::from("corpus"));
    a.chunk_size = Some(321);
    a.chunk_overlap = Some(5);
    a.top_k = Some(9);

    let config = a.load().unwrap();

    assert_eq!(config.data_dir, PathBuf::from("corpus"));
    assert_eq!(config.chunk_size, 321);
    assert_eq!(config.chunk_overlap, 5);
    assert_eq!(config.top_k, 9);
}

#[test]
fn test_flags_override_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("docqa.toml");
    std::fs::write(
        &path,
        "chunk_size = 500\n\n[synthesis]\nmodel = \"llama-3.1-8b-instant\"\n",
    )
    .unwrap();

    let mut a = args();
    a.config = Some(path.to_string_lossy().into_owned());
    a.chunk_size = Some(640);

    let config = a.load().unwrap();

    // The flag wins over the file; untouched file values survive
    assert_eq!(config.chunk_size, 640);
    assert_eq!(config.synthesis.model, "llama-3.1-8b-instant");
}

#[test]
fn test_invalid_flag_combination_rejected() {
    let mut a = args();
    a.chunk_size = Some(100);
    a.chunk_overlap = Some(100);

    let err = a.load().unwrap_err();
    let err = err.downcast_ref::<PipelineError>().unwrap();
    assert_eq!(err.error_code(), "CONFIG_INVALID");
}

#[test]
fn test_missing_config_file_rejected() {
    let mut a = args();
    a.config = Some("/nonexistent/docqa.toml".to_string());

    assert!(a.load().is_err());
}
