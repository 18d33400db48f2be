use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::errors::ClientError;
use crate::models::DocumentId;

pub const CONFIRM_DELETE: &str = "Are you sure you want to delete this PDF and all its chat history?";
pub const DELETE_FAILED: &str = "Error deleting PDF. Please try again.";

/// Confirmation and in-flight tracking for deleting a document from the list.
///
/// Nothing is removed optimistically: the parent drops the document only
/// after [`DeleteFlow::finish`] reports [`DeleteOutcome::Removed`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DeleteFlow {
    #[default]
    Idle,
    Confirming(DocumentId),
    Deleting(DocumentId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed(DocumentId),
    Failed { id: DocumentId, message: String },
}

impl DeleteFlow {
    /// Ask the user to confirm deleting `id`. Ignored while another delete is
    /// being confirmed or sent.
    pub fn request(&mut self, id: DocumentId) -> bool {
        if *self != DeleteFlow::Idle {
            return false;
        }
        *self = DeleteFlow::Confirming(id);
        true
    }

    pub fn cancel(&mut self) {
        if matches!(self, DeleteFlow::Confirming(_)) {
            *self = DeleteFlow::Idle;
        }
    }

    /// The user agreed; returns the id to send a delete for.
    pub fn confirm(&mut self) -> Option<DocumentId> {
        let DeleteFlow::Confirming(id) = self else {
            return None;
        };
        let id = id.clone();
        debug!(%id, "Deleting document");
        *self = DeleteFlow::Deleting(id.clone());
        Some(id)
    }

    pub fn finish(&mut self, result: Result<(), ClientError>) -> Option<DeleteOutcome> {
        let DeleteFlow::Deleting(id) = std::mem::take(self) else {
            return None;
        };
        Some(match result {
            Ok(()) => DeleteOutcome::Removed(id),
            Err(e) => {
                warn!(%id, "Delete failed: {e}");
                DeleteOutcome::Failed { id, message: e.user_message(DELETE_FAILED) }
            }
        })
    }

    pub fn pending_confirmation(&self) -> Option<&DocumentId> {
        match self {
            DeleteFlow::Confirming(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_deleting(&self, id: &DocumentId) -> bool {
        matches!(self, DeleteFlow::Deleting(current) if current == id)
    }
}

/// Upload date as shown in the list, e.g. `Mar 1, 2024`.
pub fn format_upload_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}
