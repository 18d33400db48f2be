use futures_util::future::{AbortHandle, abortable};
use leptos::prelude::*;
use leptos::task::spawn_local;
use pdf_lens::shell::NARROW_VIEWPORT_PX;
use pdf_lens::{
    ChatSession, DeleteFlow, DeleteOutcome, DocumentId, PdfApi, Shell, UploadCandidate,
    UploadControl, UploadOutcome,
};
use web_sys::File;

use crate::api::HttpApi;

/// Shared application state, provided via Leptos context.
///
/// Each piece is owned by one part of the page; components read it through
/// the signals and change it only through the methods below.
#[derive(Clone, Copy)]
pub struct AppState {
    pub shell: RwSignal<Shell>,
    pub chat: RwSignal<ChatSession>,
    pub upload: RwSignal<UploadControl>,
    pub delete: RwSignal<DeleteFlow>,
    /// Selected id, changing only when the selection does.
    pub selected_id: Memo<Option<DocumentId>>,
    api: StoredValue<HttpApi>,
    in_flight: StoredValue<InFlight>,
}

impl AppState {
    /// Create a new `AppState` and provide it in the current Leptos context.
    pub fn provide() -> Self {
        let shell = RwSignal::new(Shell::new());
        let selected_id = Memo::new(move |_| shell.with(|s| s.selected_id().cloned()));

        let state = Self {
            shell,
            chat: RwSignal::new(ChatSession::new()),
            upload: RwSignal::new(UploadControl::new()),
            delete: RwSignal::new(DeleteFlow::default()),
            selected_id,
            api: StoredValue::new(HttpApi::from_build_env()),
            in_flight: StoredValue::new(InFlight::default()),
        };

        provide_context(state);
        state
    }

    /// Load documents from the backend.
    pub fn load_documents(&self) {
        let state = *self;
        let api = self.api.get_value();
        self.shell.update(|s| s.begin_loading());
        spawn_local(async move {
            let result = api.list_documents().await;
            state.shell.update(|s| s.documents_loaded(result));
        });
    }

    pub fn select_document(&self, id: DocumentId) {
        self.shell.update(|s| {
            s.select(&id);
        });
    }

    /// Point the chat at `selected`, dropping whatever the previous
    /// selection still had in flight.
    pub fn open_chat(&self, selected: Option<DocumentId>) {
        self.in_flight.update_value(InFlight::abort_all);

        let mut ticket = None;
        self.chat.update(|c| ticket = c.select(selected));
        let Some(ticket) = ticket else {
            return;
        };

        let api = self.api.get_value();
        let chat = self.chat;
        let doc_id = ticket.document_id.clone();
        let (task, handle) = abortable(async move { api.list_messages(&doc_id).await });
        self.in_flight.update_value(|f| f.track_history(handle));

        spawn_local(async move {
            if let Ok(result) = task.await {
                chat.update(|c| {
                    c.history_loaded(&ticket, result);
                });
            }
        });
    }

    /// Send the chat draft as a question.
    pub fn ask(&self) {
        let mut ticket = None;
        self.chat.update(|c| ticket = c.submit());
        let Some(ticket) = ticket else {
            return;
        };

        let api = self.api.get_value();
        let chat = self.chat;
        let (doc_id, question) = (ticket.document_id.clone(), ticket.question.clone());
        let (task, handle) =
            abortable(async move { api.ask_question(&doc_id, &question).await });
        self.in_flight.update_value(|f| f.track_ask(handle));

        spawn_local(async move {
            match task.await {
                Ok(result) => chat.update(|c| {
                    c.answer_received(&ticket, result);
                }),
                Err(_) => log::debug!("Question for {} abandoned", ticket.document_id),
            }
        });
    }

    pub fn upload_file(&self, file: File) {
        let candidate = UploadCandidate::new(file.name(), file.type_(), file.size() as u64);
        let mut begun = Ok(());
        self.upload.update(|u| begun = u.begin(&candidate));
        if let Err(e) = begun {
            self.shell.update(|s| s.raise_alert(e.to_string()));
            return;
        }

        let state = *self;
        let api = self.api.get_value();
        spawn_local(async move {
            let result = api.upload_document(file).await;
            let mut outcome = None;
            state.upload.update(|u| outcome = Some(u.finish(result)));
            match outcome {
                Some(UploadOutcome::Uploaded(doc)) => {
                    state.shell.update(|s| s.upload_succeeded(doc, is_narrow_viewport()));
                }
                Some(UploadOutcome::Failed(message)) => {
                    state.shell.update(|s| s.raise_alert(message));
                }
                None => {}
            }
        });
    }

    pub fn request_delete(&self, id: DocumentId) {
        self.delete.update(|d| {
            d.request(id);
        });
    }

    pub fn cancel_delete(&self) {
        self.delete.update(|d| d.cancel());
    }

    pub fn confirm_delete(&self) {
        let mut target = None;
        self.delete.update(|d| target = d.confirm());
        let Some(id) = target else {
            return;
        };

        let state = *self;
        let api = self.api.get_value();
        spawn_local(async move {
            let result = api.delete_document(&id).await;
            let mut outcome = None;
            state.delete.update(|d| outcome = d.finish(result));
            match outcome {
                Some(DeleteOutcome::Removed(id)) => state.shell.update(|s| s.delete_succeeded(&id)),
                Some(DeleteOutcome::Failed { message, .. }) => {
                    state.shell.update(|s| s.raise_alert(message))
                }
                None => {}
            }
        });
    }
}

/// Requests issued on behalf of the current chat selection: at most one
/// history load and one question, so a newer request replaces the older handle.
#[derive(Debug, Default)]
struct InFlight {
    history: Option<AbortHandle>,
    ask: Option<AbortHandle>,
}

impl InFlight {
    fn track_history(&mut self, handle: AbortHandle) {
        self.history = Some(handle);
    }

    /// The previous question has settled by the time another can be asked.
    fn track_ask(&mut self, handle: AbortHandle) {
        self.ask = Some(handle);
    }

    fn abort_all(&mut self) {
        for handle in [self.history.take(), self.ask.take()].into_iter().flatten() {
            handle.abort();
        }
    }
}

/// Whether the sidebar covers the chat at the current window width.
pub fn is_narrow_viewport() -> bool {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|w| w.as_f64())
        .is_some_and(|w| w < NARROW_VIEWPORT_PX)
}
