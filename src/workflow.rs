//! The detection submission workflow.
//!
//! One workflow instance owns the staged selection, the request state, and
//! the projected result of the most recent successful call. The state
//! machine:
//!
//! - `Idle | Succeeded | Failed` accept a new submit and move to
//!   `Submitting`.
//! - `Submitting` resolves to `Succeeded` on a 2xx response with a
//!   well-formed body, or to `Failed` otherwise.
//! - A new intake acceptance resets the state to `Idle` and clears the
//!   previous result.
//!
//! A `DetectionResult` is set only in `Succeeded`; a failed submit leaves
//! the previous successful result visible.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::client::PredictClient;
use crate::intake::{self, IntakeSource, SelectedImage};
use crate::media;
use crate::notify::{NoticeKind, Notifier};
use crate::project::{self, DetectionResult};
use crate::WorkflowError;

/// Fixed name of the saved annotated image.
pub const ANNOTATED_IMAGE_FILENAME: &str = "annotated_image.jpg";

/// Notice key shared by the in-progress, success, and failure notices of a
/// submission, so each one replaces the last.
const SUBMIT_NOTICE_KEY: &str = "processing";
const INTAKE_NOTICE_KEY: &str = "intake";
const DOWNLOAD_NOTICE_KEY: &str = "download";

#[derive(Clone, Debug, PartialEq)]
pub enum RequestState {
    Idle,
    Submitting,
    Succeeded,
    Failed { message: String },
}

pub struct UploadWorkflow {
    client: PredictClient,
    selected: Option<SelectedImage>,
    state: RequestState,
    result: Option<DetectionResult>,
    last_elapsed: Option<Duration>,
}

impl UploadWorkflow {
    pub fn new(client: PredictClient) -> Self {
        Self {
            client,
            selected: None,
            state: RequestState::Idle,
            result: None,
            last_elapsed: None,
        }
    }

    pub fn selected(&self) -> Option<&SelectedImage> {
        self.selected.as_ref()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Projected result of the last successful submission.
    pub fn result(&self) -> Option<&DetectionResult> {
        self.result.as_ref()
    }

    /// Wall-clock duration of the last submission round trip.
    pub fn last_elapsed(&self) -> Option<Duration> {
        self.last_elapsed
    }

    /// Whether the submit control should be enabled: an image is staged
    /// and no submission is in flight.
    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && self.state != RequestState::Submitting
    }

    /// Stage a file chosen through a picker.
    pub fn select_file(
        &mut self,
        path: &Path,
        notifier: &mut Notifier,
    ) -> Result<(), WorkflowError> {
        self.accept(path, IntakeSource::Picker, notifier)
    }

    /// Stage a dropped file.
    pub fn drop_file(&mut self, path: &Path, notifier: &mut Notifier) -> Result<(), WorkflowError> {
        self.accept(path, IntakeSource::Drop, notifier)
    }

    fn accept(
        &mut self,
        path: &Path,
        source: IntakeSource,
        notifier: &mut Notifier,
    ) -> Result<(), WorkflowError> {
        match intake::stage(path) {
            Ok(image) => {
                log::info!(
                    "staged {} ({}, {} bytes)",
                    image.path().display(),
                    image.media_type(),
                    image.bytes().len()
                );
                self.selected = Some(image);
                // A new image invalidates prior results.
                self.result = None;
                self.state = RequestState::Idle;
                notifier.notify(
                    INTAKE_NOTICE_KEY,
                    NoticeKind::Success,
                    "Image loaded successfully!",
                );
                Ok(())
            }
            Err(err) => {
                let message = match &err {
                    WorkflowError::InvalidFileType { .. } => {
                        source.rejection_message().to_string()
                    }
                    other => other.to_string(),
                };
                notifier.notify(INTAKE_NOTICE_KEY, NoticeKind::Error, &message);
                Err(err)
            }
        }
    }

    /// Submit the staged image for detection.
    ///
    /// Exactly one request per call; no retry. On success the projected
    /// result is available through [`UploadWorkflow::result`].
    pub fn submit(&mut self, notifier: &mut Notifier) -> Result<(), WorkflowError> {
        let image = match &self.selected {
            Some(image) => image,
            None => {
                notifier.notify(
                    SUBMIT_NOTICE_KEY,
                    NoticeKind::Error,
                    "Please select an image first",
                );
                return Err(WorkflowError::NoFileSelected);
            }
        };

        self.state = RequestState::Submitting;
        notifier.notify(SUBMIT_NOTICE_KEY, NoticeKind::Progress, "Processing image...");

        let started = Instant::now();
        let outcome = self
            .client
            .predict(&image.file_name(), image.media_type(), image.bytes());
        self.last_elapsed = Some(started.elapsed());

        match outcome {
            Ok(mut response) => {
                if let Some(reference) = response.annotated_image.take() {
                    response.annotated_image = self.client.resolve_annotated_image(&reference);
                }
                self.result = Some(project::project(&response));
                self.state = RequestState::Succeeded;
                notifier.notify(SUBMIT_NOTICE_KEY, NoticeKind::Success, "Detection complete!");
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                log::warn!("submission failed: {}", message);
                // The previous successful result, if any, stays visible.
                self.state = RequestState::Failed {
                    message: message.clone(),
                };
                notifier.notify(SUBMIT_NOTICE_KEY, NoticeKind::Error, &message);
                Err(err)
            }
        }
    }

    /// Save the annotated image under its fixed filename in `dir`.
    pub fn download(
        &self,
        dir: &Path,
        notifier: &mut Notifier,
    ) -> Result<PathBuf, WorkflowError> {
        let uri = match self
            .result
            .as_ref()
            .and_then(|result| result.annotated_image.as_deref())
        {
            Some(uri) => uri,
            None => {
                notifier.notify(
                    DOWNLOAD_NOTICE_KEY,
                    NoticeKind::Error,
                    "No annotated image to download",
                );
                return Err(WorkflowError::NoImageToDownload);
            }
        };
        let bytes = match media::decode_data_uri(uri) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("annotated image is not a decodable data uri: {:#}", err);
                notifier.notify(
                    DOWNLOAD_NOTICE_KEY,
                    NoticeKind::Error,
                    "No annotated image to download",
                );
                return Err(WorkflowError::NoImageToDownload);
            }
        };
        let path = dir.join(ANNOTATED_IMAGE_FILENAME);
        std::fs::write(&path, &bytes).map_err(|err| WorkflowError::SaveFailed {
            path: path.display().to_string(),
            source: err,
        })?;
        notifier.notify(DOWNLOAD_NOTICE_KEY, NoticeKind::Success, "Results downloaded!");
        Ok(path)
    }

    /// Discard the selection, result, and request state.
    pub fn reset(&mut self) {
        self.selected = None;
        self.result = None;
        self.state = RequestState::Idle;
        self.last_elapsed = None;
    }
}
