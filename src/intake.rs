//! Image intake.
//!
//! Validates and stages a user-chosen image ahead of submission. Intake is
//! responsible for:
//! - Applying the `image/*` acceptance predicate to a candidate file
//! - Reading accepted files and deriving a data-URI preview
//! - Leaving the caller's prior selection untouched on rejection
//!
//! Intake MUST NOT:
//! - Touch the network
//! - Keep a rejected candidate's bytes around

use std::path::{Path, PathBuf};

use crate::media;
use crate::WorkflowError;

/// How the candidate arrived. Only the rejection wording differs; the
/// acceptance predicate is the same for both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntakeSource {
    Picker,
    Drop,
}

impl IntakeSource {
    pub(crate) fn rejection_message(self) -> &'static str {
        match self {
            IntakeSource::Picker => "Please select a valid image file",
            IntakeSource::Drop => "Please drop a valid image file",
        }
    }
}

/// A staged image, owned by the workflow until submission or replacement.
#[derive(Clone, Debug)]
pub struct SelectedImage {
    path: PathBuf,
    media_type: &'static str,
    bytes: Vec<u8>,
    preview: String,
}

impl SelectedImage {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn media_type(&self) -> &str {
        self.media_type
    }

    /// Raw file content, submitted verbatim as the multipart `file` part.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// File name reported to the service in the multipart part.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string())
    }

    /// Data-URI preview of the staged bytes; read-only once produced.
    pub fn preview(&self) -> &str {
        &self.preview
    }
}

/// Validate and stage a candidate file.
///
/// The declared media type must begin with `image/`; otherwise the
/// candidate is rejected and the caller's prior selection stays as it was.
pub fn stage(path: &Path) -> Result<SelectedImage, WorkflowError> {
    let media_type = media::media_type_for_path(path);
    if !media::is_image_media_type(media_type) {
        return Err(WorkflowError::InvalidFileType {
            path: path.display().to_string(),
            media_type: media_type.to_string(),
        });
    }
    let bytes = std::fs::read(path).map_err(|err| WorkflowError::FileUnreadable {
        path: path.display().to_string(),
        source: err,
    })?;
    let preview = media::to_data_uri(media_type, &bytes);
    Ok(SelectedImage {
        path: path.to_path_buf(),
        media_type,
        bytes,
        preview,
    })
}
