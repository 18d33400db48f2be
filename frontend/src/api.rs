use gloo_net::http::{Request, Response};
use pdf_lens::api::endpoints;
use pdf_lens::models::AskRequest;
use pdf_lens::{ApiConfig, ClientError, Document, DocumentId, Message, PdfApi};
use serde::de::DeserializeOwned;
use web_sys::{File, FormData};

/// `PdfApi` over `fetch`, against the base URL fixed at build time.
#[derive(Clone, Debug)]
pub struct HttpApi {
    config: ApiConfig,
}

impl HttpApi {
    pub fn from_build_env() -> Self {
        let config = ApiConfig::from_build_env();
        log::info!("Using PDF backend at {:?}", config.base_url());
        Self { config }
    }

    fn url(&self, path: &str) -> String {
        self.config.url(path)
    }
}

fn encode(segment: &str) -> String {
    String::from(js_sys::encode_uri_component(segment))
}

fn network(e: gloo_net::Error) -> ClientError {
    ClientError::network(e.to_string())
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    resp.json::<T>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

/// Turns a non-2xx response into the matching `ClientError`.
async fn check(resp: Response) -> Result<Response, ClientError> {
    if resp.ok() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::from_response(status, &body))
}

impl PdfApi for HttpApi {
    type File = File;

    async fn list_documents(&self) -> Result<Vec<Document>, ClientError> {
        let resp = Request::get(&self.url(endpoints::DOCUMENTS))
            .send()
            .await
            .map_err(network)?;
        decode(check(resp).await?).await
    }

    async fn upload_document(&self, file: File) -> Result<Document, ClientError> {
        let form = FormData::new().map_err(|e| ClientError::network(format!("{e:?}")))?;
        form.append_with_blob_and_filename(endpoints::UPLOAD_FIELD, &file, &file.name())
            .map_err(|e| ClientError::network(format!("{e:?}")))?;

        let resp = Request::post(&self.url(endpoints::UPLOAD))
            .body(form)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        decode(check(resp).await?).await
    }

    async fn list_messages(&self, id: &DocumentId) -> Result<Vec<Message>, ClientError> {
        let resp = Request::get(&self.url(&endpoints::chat_history(id, encode)))
            .send()
            .await
            .map_err(network)?;
        decode(check(resp).await?).await
    }

    async fn ask_question(&self, id: &DocumentId, question: &str) -> Result<Message, ClientError> {
        let body = AskRequest { pdf_id: id, question };
        let resp = Request::post(&self.url(endpoints::ASK))
            .json(&body)
            .map_err(|e| ClientError::Decode(format!("Serialize error: {e}")))?
            .send()
            .await
            .map_err(network)?;
        decode(check(resp).await?).await
    }

    async fn delete_document(&self, id: &DocumentId) -> Result<(), ClientError> {
        let resp = Request::delete(&self.url(&endpoints::document(id, encode)))
            .send()
            .await
            .map_err(network)?;
        check(resp).await.map(|_| ())
    }
}
