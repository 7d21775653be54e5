use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Deserialize, Default)]
struct ClientConfigFile {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    output_dir: Option<PathBuf>,
}

/// Resolved client configuration.
///
/// Precedence: defaults, then the JSON file named by `NIRLENS_CONFIG`,
/// then environment overrides.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the inference service; the `/predict` path is appended
    /// per request.
    pub base_url: String,
    /// Whole-request timeout. `None` (the default) waits indefinitely,
    /// matching the service's documented contract.
    pub request_timeout: Option<Duration>,
    /// Directory the annotated image is saved under.
    pub output_dir: PathBuf,
}

impl ClientConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("NIRLENS_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: ClientConfigFile) -> Self {
        Self {
            base_url: file
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout: file
                .request_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            output_dir: file.output_dir.unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(base_url) = std::env::var("NIRLENS_BASE_URL") {
            if !base_url.trim().is_empty() {
                self.base_url = base_url;
            }
        }
        if let Ok(secs) = std::env::var("NIRLENS_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                anyhow!("NIRLENS_TIMEOUT_SECS must be an integer number of seconds")
            })?;
            self.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Ok(dir) = std::env::var("NIRLENS_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                self.output_dir = PathBuf::from(dir);
            }
        }
        Ok(())
    }

    /// Replace the base URL (CLI override) and re-check it.
    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        self.base_url = base_url.to_string();
        self.validate()
    }

    fn validate(&mut self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| anyhow!("invalid base url '{}': {}", self.base_url, e))?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(anyhow!(
                    "unsupported base url scheme '{}'; expected http or https",
                    other
                ))
            }
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<ClientConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
