use crate::errors::ClientError;
use crate::models::{Document, DocumentId, Message};

/// The five backend calls the client needs.
///
/// Futures are not required to be `Send`: the browser client runs them on a
/// single-threaded executor. Nothing here retries; every failure reaches the
/// caller as a [`ClientError`].
#[allow(async_fn_in_trait)]
pub trait PdfApi {
    /// Whatever the platform hands us for a picked or dropped file.
    type File;

    /// `GET /pdfs`
    async fn list_documents(&self) -> Result<Vec<Document>, ClientError>;

    /// `POST /upload-pdf` as multipart form data with a single `file` field.
    async fn upload_document(&self, file: Self::File) -> Result<Document, ClientError>;

    /// `GET /chat-history/{id}`, oldest first.
    async fn list_messages(&self, id: &DocumentId) -> Result<Vec<Message>, ClientError>;

    /// `POST /ask-question`. May take as long as the backend's inference does.
    async fn ask_question(&self, id: &DocumentId, question: &str) -> Result<Message, ClientError>;

    /// `DELETE /pdf/{id}`. Fails with [`ClientError::NotFound`] if already gone.
    async fn delete_document(&self, id: &DocumentId) -> Result<(), ClientError>;
}

/// Backend route paths, relative to the API base URL.
/// `encode` is applied to ids embedded in the path.
pub mod endpoints {
    use crate::models::DocumentId;

    pub const DOCUMENTS: &str = "/pdfs";
    pub const UPLOAD: &str = "/upload-pdf";
    pub const ASK: &str = "/ask-question";

    /// Multipart field name the upload endpoint reads.
    pub const UPLOAD_FIELD: &str = "file";

    pub fn chat_history(id: &DocumentId, encode: impl Fn(&str) -> String) -> String {
        format!("/chat-history/{}", encode(id.as_str()))
    }

    pub fn document(id: &DocumentId, encode: impl Fn(&str) -> String) -> String {
        format!("/pdf/{}", encode(id.as_str()))
    }
}
