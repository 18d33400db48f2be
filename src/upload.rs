use tracing::{debug, warn};

use crate::errors::ClientError;
use crate::models::Document;

/// 50 MB, the largest file the client will send.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

pub const NOT_A_PDF: &str = "Please upload a PDF file";
pub const TOO_LARGE: &str = "File size must be less than 50MB";
pub const ALREADY_UPLOADING: &str = "An upload is already in progress";
pub const UPLOAD_FAILED: &str = "Error uploading PDF. Please try again.";

/// What the client knows about a file before sending it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadCandidate {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl UploadCandidate {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self { name: name.into(), mime_type: mime_type.into(), size }
    }
}

/// Pre-flight checks; a rejected file never reaches the network.
pub fn validate(candidate: &UploadCandidate) -> Result<(), ClientError> {
    if !candidate.mime_type.to_ascii_lowercase().contains("pdf") {
        return Err(ClientError::validation(NOT_A_PDF));
    }
    if candidate.size > MAX_UPLOAD_BYTES {
        return Err(ClientError::validation(TOO_LARGE));
    }
    Ok(())
}

/// How an upload attempt ended, ready for the shell to act on.
#[derive(Clone, Debug, PartialEq)]
pub enum UploadOutcome {
    Uploaded(Document),
    Failed(String),
}

/// State behind the drag-and-drop / file-picker widget.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadControl {
    uploading: bool,
    drag_over: bool,
}

impl UploadControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn is_drag_over(&self) -> bool {
        self.drag_over
    }

    pub fn drag_enter(&mut self) {
        self.drag_over = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_over = false;
    }

    /// A file was dropped or picked. Clears the drag highlight, validates, and
    /// on success enters the uploading state. The caller sends the file only
    /// when this returns `Ok`.
    pub fn begin(&mut self, candidate: &UploadCandidate) -> Result<(), ClientError> {
        self.drag_over = false;
        if self.uploading {
            return Err(ClientError::validation(ALREADY_UPLOADING));
        }
        if let Err(e) = validate(candidate) {
            warn!(file = %candidate.name, size = candidate.size, "Rejected upload: {e}");
            return Err(e);
        }
        debug!(file = %candidate.name, size = candidate.size, "Uploading");
        self.uploading = true;
        Ok(())
    }

    /// The upload request settled, either way.
    pub fn finish(&mut self, result: Result<Document, ClientError>) -> UploadOutcome {
        self.uploading = false;
        self.drag_over = false;
        match result {
            Ok(doc) => {
                debug!(id = %doc.id, "Upload complete");
                UploadOutcome::Uploaded(doc)
            }
            Err(e) => {
                warn!("Upload failed: {e}");
                UploadOutcome::Failed(e.user_message(UPLOAD_FAILED))
            }
        }
    }
}
