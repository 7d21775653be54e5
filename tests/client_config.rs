use std::sync::Mutex;

use tempfile::NamedTempFile;

use nirlens::ClientConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "NIRLENS_CONFIG",
        "NIRLENS_BASE_URL",
        "NIRLENS_TIMEOUT_SECS",
        "NIRLENS_OUTPUT_DIR",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn defaults_apply_without_file_or_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = ClientConfig::load().expect("load config");

    assert_eq!(cfg.base_url, "http://127.0.0.1:8000");
    assert!(cfg.request_timeout.is_none());
    assert_eq!(cfg.output_dir.to_string_lossy(), ".");

    clear_env();
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "base_url": "http://detector.lab:9000/",
        "request_timeout_secs": 30,
        "output_dir": "/tmp/nirlens-out"
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("NIRLENS_CONFIG", file.path());
    std::env::set_var("NIRLENS_TIMEOUT_SECS", "45");

    let cfg = ClientConfig::load().expect("load config");

    // File value, trailing slash trimmed.
    assert_eq!(cfg.base_url, "http://detector.lab:9000");
    // Environment wins over the file.
    assert_eq!(cfg.request_timeout.map(|t| t.as_secs()), Some(45));
    assert_eq!(cfg.output_dir.to_string_lossy(), "/tmp/nirlens-out");

    clear_env();
}

#[test]
fn zero_timeout_means_no_timeout() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("NIRLENS_TIMEOUT_SECS", "0");
    let cfg = ClientConfig::load().expect("load config");
    assert!(cfg.request_timeout.is_none());

    clear_env();
}

#[test]
fn rejects_non_http_base_url() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("NIRLENS_BASE_URL", "ftp://detector.lab");
    let err = ClientConfig::load().unwrap_err();
    assert!(err.to_string().contains("scheme"), "{err}");

    clear_env();
}

#[test]
fn cli_override_is_validated_too() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut cfg = ClientConfig::load().expect("load config");
    cfg.set_base_url("http://10.0.0.5:8000/").expect("override");
    assert_eq!(cfg.base_url, "http://10.0.0.5:8000");
    assert!(cfg.set_base_url("not a url").is_err());

    clear_env();
}
