//! HTTP transport to the inference service.
//!
//! One request shape: `POST {base}/predict` with a single multipart part
//! named `file` carrying the staged image bytes. Non-2xx statuses and
//! malformed bodies are transport failures; the workflow decides what to
//! do with them.

use anyhow::{anyhow, Context, Result};
use rand::RngCore;
use serde::Deserialize;
use std::io::Read;
use std::time::Duration;

use crate::media;
use crate::WorkflowError;

const PREDICT_PATH: &str = "/predict";
const FILE_PART_NAME: &str = "file";

/// One detection entry as the service reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct WireDetection {
    /// Class name, already resolved for display.
    pub class_name: String,

    /// Confidence in 0..1.
    pub confidence: f64,

    /// `[x1, y1, x2, y2]` corner box.
    pub bbox: [f64; 4],
    // The service also sends a numeric class_id per entry; the client has
    // no use for it and ignores it.
}

/// The `/predict` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub detections: Vec<WireDetection>,

    /// Either an inline `data:` URI or a service-relative path to fetch,
    /// depending on the service revision.
    #[serde(default)]
    pub annotated_image: Option<String>,
}

/// Blocking client for the detection endpoint.
pub struct PredictClient {
    agent: ureq::Agent,
    base_url: String,
}

impl PredictClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            agent: builder.build(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit one image for detection and parse the response payload.
    pub fn predict(
        &self,
        file_name: &str,
        media_type: &str,
        content: &[u8],
    ) -> Result<PredictResponse, WorkflowError> {
        let body = MultipartBody::single_file(FILE_PART_NAME, file_name, media_type, content);
        let url = format!("{}{}", self.base_url, PREDICT_PATH);
        log::debug!("POST {} ({} bytes)", url, body.bytes().len());

        let response = self
            .agent
            .post(&url)
            .set("Content-Type", &body.content_type())
            .send_bytes(body.bytes())
            .map_err(|err| WorkflowError::TransportFailure {
                message: transport_message(err),
            })?;

        let mut payload = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut payload)
            .map_err(|err| WorkflowError::TransportFailure {
                message: format!("failed to read response body: {}", err),
            })?;
        serde_json::from_slice(&payload).map_err(|err| WorkflowError::TransportFailure {
            message: format!("malformed detection payload: {}", err),
        })
    }

    /// Normalize the service's annotated-image reference to an inline data
    /// URI. The first service revision returned a relative path to fetch
    /// instead of inline data; a fetch failure only costs the
    /// visualization, never the detection result.
    pub fn resolve_annotated_image(&self, reference: &str) -> Option<String> {
        if reference.is_empty() {
            return None;
        }
        if reference.starts_with("data:") {
            return Some(reference.to_string());
        }
        match self.fetch_annotated(reference) {
            Ok(uri) => Some(uri),
            Err(err) => {
                log::warn!("failed to fetch annotated image '{}': {:#}", reference, err);
                None
            }
        }
    }

    fn fetch_annotated(&self, reference: &str) -> Result<String> {
        let url = if reference.starts_with("http://") || reference.starts_with("https://") {
            reference.to_string()
        } else {
            format!("{}/{}", self.base_url, reference.trim_start_matches('/'))
        };
        let response = self
            .agent
            .get(&url)
            .call()
            .with_context(|| format!("fetch annotated image from {}", url))?;
        let media_type = response.content_type().to_string();
        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .context("read annotated image")?;
        if bytes.is_empty() {
            return Err(anyhow!("empty annotated image"));
        }
        Ok(media::to_data_uri(&media_type, &bytes))
    }
}

fn transport_message(err: ureq::Error) -> String {
    match err {
        ureq::Error::Status(code, _) => format!("server returned HTTP {}", code),
        other => other.to_string(),
    }
}

/// A single-part `multipart/form-data` request body.
struct MultipartBody {
    boundary: String,
    bytes: Vec<u8>,
}

impl MultipartBody {
    fn single_file(name: &str, file_name: &str, media_type: &str, content: &[u8]) -> Self {
        let mut entropy = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut entropy);
        let boundary = format!("nirlens-{:032x}", u128::from_le_bytes(entropy));

        let mut bytes = Vec::with_capacity(content.len() + 256);
        bytes.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        bytes.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                name, file_name
            )
            .as_bytes(),
        );
        bytes.extend_from_slice(format!("Content-Type: {}\r\n\r\n", media_type).as_bytes());
        bytes.extend_from_slice(content);
        bytes.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        Self { boundary, bytes }
    }

    fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
