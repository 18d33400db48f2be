//! Client core for PDF-Lens.
//!
//! Everything here is independent of the browser: the wire models, the
//! [`PdfApi`](api::PdfApi) seam over the backend's five endpoints, and the
//! state machines the `frontend` crate renders.

pub mod api;
pub mod config;
pub mod errors;
pub mod library;
pub mod models;
pub mod session;
pub mod shell;
pub mod upload;

pub use api::PdfApi;
pub use config::ApiConfig;
pub use errors::ClientError;
pub use library::{DeleteFlow, DeleteOutcome};
pub use models::{Document, DocumentId, FileSize, Message};
pub use session::{AskTicket, ChatPhase, ChatSession, HistoryTicket};
pub use shell::Shell;
pub use upload::{UploadCandidate, UploadControl, UploadOutcome};
