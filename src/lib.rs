//! nirlens - demo client for the NIR object-detection inference service.
//!
//! The crate models one user-driven analysis pass:
//!
//! 1. `intake`: validate and stage a locally chosen image, producing a
//!    displayable preview.
//! 2. `workflow`: submit the staged bytes to the remote `/predict` endpoint
//!    and track the request through `Idle`, `Submitting`, `Succeeded`, and
//!    `Failed`.
//! 3. `project`: map the raw detection payload into display-ready counts,
//!    confidences, and box origins.
//!
//! Everything else (`config`, `notify`, `theme`, `render`) is the plumbing
//! the demo binary needs around that pass.

use thiserror::Error;

pub mod client;
pub mod config;
pub mod intake;
pub mod media;
pub mod notify;
pub mod project;
pub mod render;
pub mod theme;
pub mod workflow;

pub use client::{PredictClient, PredictResponse, WireDetection};
pub use config::ClientConfig;
pub use intake::{IntakeSource, SelectedImage};
pub use notify::{Notice, NoticeKind, Notifier, NotifyMode};
pub use project::{project, BoxOrigin, DetectedObject, DetectionResult};
pub use theme::{Theme, ThemeMode, Tone};
pub use workflow::{RequestState, UploadWorkflow, ANNOTATED_IMAGE_FILENAME};

// -------------------- Failure Taxonomy --------------------

/// Failures the workflow can surface to the user.
///
/// Every failure is terminal for the operation that raised it, is reported
/// through a notice, and leaves the workflow in a well-defined state ready
/// for another attempt.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The candidate's declared media type is not `image/*`. The prior
    /// selection, if any, is left untouched.
    #[error("not an image: {path} ({media_type})")]
    InvalidFileType { path: String, media_type: String },

    /// The candidate passed the type check but could not be read.
    #[error("failed to read {path}: {source}")]
    FileUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Submit was attempted with nothing staged. No network call is made.
    #[error("no image selected")]
    NoFileSelected,

    /// Network failure, non-2xx status, or a malformed response body.
    #[error("detection request failed: {message}")]
    TransportFailure { message: String },

    /// Download was attempted with no annotated image present.
    #[error("no annotated image to download")]
    NoImageToDownload,

    /// The annotated image could not be written to disk.
    #[error("failed to save {path}: {source}")]
    SaveFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
