//! End-to-end client flows against a recording in-memory backend.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use chrono::Utc;
use pdf_lens::session::ANSWER_ERROR;
use pdf_lens::upload::TOO_LARGE;
use pdf_lens::{
    ChatPhase, ChatSession, ClientError, DeleteFlow, DeleteOutcome, Document, DocumentId, Message, PdfApi,
    Shell, UploadCandidate, UploadControl, UploadOutcome,
};

#[derive(Clone, Debug, PartialEq)]
enum Call {
    ListDocuments,
    Upload(String),
    ListMessages(String),
    Ask(String, String),
    Delete(String),
}

#[derive(Default)]
struct FakeBackend {
    calls: RefCell<Vec<Call>>,
    documents: RefCell<Vec<Document>>,
    history: RefCell<HashMap<DocumentId, Vec<Message>>>,
    offline: Cell<bool>,
    next_id: Cell<u32>,
}

impl FakeBackend {
    fn with_documents(names: &[(&str, &str)]) -> Self {
        let backend = Self::default();
        for (id, filename) in names {
            backend.documents.borrow_mut().push(document(id, filename));
        }
        backend
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) -> Result<(), ClientError> {
        self.calls.borrow_mut().push(call);
        if self.offline.get() {
            return Err(ClientError::network("connection refused"));
        }
        Ok(())
    }
}

fn document(id: &str, filename: &str) -> Document {
    Document {
        id: DocumentId::new(id),
        filename: filename.to_string(),
        upload_date: Utc::now(),
        file_size: None,
        content_preview: None,
    }
}

impl PdfApi for FakeBackend {
    type File = UploadCandidate;

    async fn list_documents(&self) -> Result<Vec<Document>, ClientError> {
        self.record(Call::ListDocuments)?;
        Ok(self.documents.borrow().clone())
    }

    async fn upload_document(&self, file: UploadCandidate) -> Result<Document, ClientError> {
        self.record(Call::Upload(file.name.clone()))?;
        let n = self.next_id.get() + 100;
        self.next_id.set(n + 1);
        let doc = document(&n.to_string(), &file.name);
        self.documents.borrow_mut().push(doc.clone());
        Ok(doc)
    }

    async fn list_messages(&self, id: &DocumentId) -> Result<Vec<Message>, ClientError> {
        self.record(Call::ListMessages(id.to_string()))?;
        Ok(self.history.borrow().get(id).cloned().unwrap_or_default())
    }

    async fn ask_question(&self, id: &DocumentId, question: &str) -> Result<Message, ClientError> {
        self.record(Call::Ask(id.to_string(), question.to_string()))?;
        let answer = Message::local(question, format!("answer to {question}"));
        self.history.borrow_mut().entry(id.clone()).or_default().push(answer.clone());
        Ok(answer)
    }

    async fn delete_document(&self, id: &DocumentId) -> Result<(), ClientError> {
        self.record(Call::Delete(id.to_string()))?;
        let mut docs = self.documents.borrow_mut();
        let before = docs.len();
        docs.retain(|d| &d.id != id);
        if docs.len() == before {
            return Err(ClientError::from_response(404, r#"{"detail":"PDF not found"}"#));
        }
        Ok(())
    }
}

// ── Drivers: the same sequencing the browser components perform ──────────────

async fn mount(api: &FakeBackend, shell: &mut Shell, session: &mut ChatSession) {
    shell.begin_loading();
    shell.documents_loaded(api.list_documents().await);
    follow_selection(api, shell, session).await;
}

async fn follow_selection(api: &FakeBackend, shell: &Shell, session: &mut ChatSession) {
    if let Some(ticket) = session.select(shell.selected_id().cloned()) {
        let history = api.list_messages(&ticket.document_id).await;
        session.history_loaded(&ticket, history);
    }
}

async fn ask(api: &FakeBackend, session: &mut ChatSession, text: &str) {
    session.set_draft(text);
    if let Some(ticket) = session.submit() {
        let result = api.ask_question(&ticket.document_id, &ticket.question).await;
        session.answer_received(&ticket, result);
    }
}

async fn upload(
    api: &FakeBackend,
    shell: &mut Shell,
    control: &mut UploadControl,
    file: UploadCandidate,
) -> Option<UploadOutcome> {
    if let Err(e) = control.begin(&file) {
        shell.raise_alert(e.to_string());
        return None;
    }
    let outcome = control.finish(api.upload_document(file).await);
    match &outcome {
        UploadOutcome::Uploaded(doc) => shell.upload_succeeded(doc.clone(), true),
        UploadOutcome::Failed(message) => shell.raise_alert(message.clone()),
    }
    Some(outcome)
}

async fn delete(api: &FakeBackend, shell: &mut Shell, flow: &mut DeleteFlow, id: &str) -> Option<DeleteOutcome> {
    flow.request(DocumentId::new(id));
    let target = flow.confirm()?;
    let outcome = flow.finish(api.delete_document(&target).await)?;
    match &outcome {
        DeleteOutcome::Removed(id) => shell.delete_succeeded(id),
        DeleteOutcome::Failed { message, .. } => shell.raise_alert(message.clone()),
    }
    Some(outcome)
}

// ── Scenarios ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn mount_auto_selects_single_document_and_loads_history() {
    let api = FakeBackend::with_documents(&[("1", "a.pdf")]);
    let (mut shell, mut session) = (Shell::new(), ChatSession::new());

    mount(&api, &mut shell, &mut session).await;

    assert_eq!(shell.selected_id(), Some(&DocumentId::new("1")));
    assert_eq!(session.phase(), ChatPhase::Idle);
    assert_eq!(api.calls(), vec![Call::ListDocuments, Call::ListMessages("1".into())]);
}

#[tokio::test]
async fn oversized_upload_never_reaches_the_network() {
    let api = FakeBackend::with_documents(&[("1", "a.pdf")]);
    let (mut shell, mut control) = (Shell::new(), UploadControl::new());
    shell.documents_loaded(api.list_documents().await);
    let before = api.calls().len();

    let big = UploadCandidate::new("huge.pdf", "application/pdf", 60 * 1024 * 1024);
    assert!(upload(&api, &mut shell, &mut control, big).await.is_none());

    assert_eq!(api.calls().len(), before);
    assert_eq!(shell.documents().len(), 1);
    assert_eq!(shell.alert(), Some(TOO_LARGE));
    assert!(!control.is_uploading());
}

#[tokio::test]
async fn upload_selects_new_document_and_opens_empty_chat() {
    let api = FakeBackend::with_documents(&[("1", "a.pdf")]);
    let (mut shell, mut session, mut control) = (Shell::new(), ChatSession::new(), UploadControl::new());
    mount(&api, &mut shell, &mut session).await;
    ask(&api, &mut session, "about a?").await;

    let file = UploadCandidate::new("b.pdf", "application/pdf", 1024);
    let outcome = upload(&api, &mut shell, &mut control, file).await;
    assert!(matches!(outcome, Some(UploadOutcome::Uploaded(_))));
    follow_selection(&api, &shell, &mut session).await;

    assert_eq!(shell.selected().map(|d| d.filename.as_str()), Some("b.pdf"));
    assert!(!shell.is_sidebar_open());
    assert!(session.transcript().is_empty());
    assert_eq!(session.phase(), ChatPhase::Idle);
}

#[tokio::test]
async fn failed_upload_alerts_and_keeps_list() {
    let api = FakeBackend::with_documents(&[]);
    let (mut shell, mut control) = (Shell::new(), UploadControl::new());
    api.offline.set(true);

    let file = UploadCandidate::new("b.pdf", "application/pdf", 1024);
    let outcome = upload(&api, &mut shell, &mut control, file).await;

    assert!(matches!(outcome, Some(UploadOutcome::Failed(_))));
    assert!(shell.documents().is_empty());
    assert_eq!(shell.alert(), Some(pdf_lens::upload::UPLOAD_FAILED));
    assert!(!control.is_uploading());
}

#[tokio::test]
async fn successful_question_adds_exactly_one_settled_entry() {
    let api = FakeBackend::with_documents(&[("1", "a.pdf")]);
    let (mut shell, mut session) = (Shell::new(), ChatSession::new());
    mount(&api, &mut shell, &mut session).await;

    ask(&api, &mut session, "What is it?").await;

    let [entry] = session.transcript() else { panic!("expected one entry") };
    assert!(!entry.pending);
    assert_eq!(entry.answer, "answer to What is it?");
    assert_eq!(session.phase(), ChatPhase::Idle);
}

#[tokio::test]
async fn network_failure_on_question_leaves_fallback_answer() {
    let api = FakeBackend::with_documents(&[("1", "a.pdf")]);
    let (mut shell, mut session) = (Shell::new(), ChatSession::new());
    mount(&api, &mut shell, &mut session).await;
    api.offline.set(true);

    ask(&api, &mut session, "still there?").await;

    assert_eq!(session.transcript().len(), 1);
    let last = session.transcript().last().unwrap();
    assert_eq!(last.question, "still there?");
    assert_eq!(last.answer, ANSWER_ERROR);
    assert!(!last.pending);
}

#[tokio::test]
async fn blank_question_makes_no_call() {
    let api = FakeBackend::with_documents(&[("1", "a.pdf")]);
    let (mut shell, mut session) = (Shell::new(), ChatSession::new());
    mount(&api, &mut shell, &mut session).await;
    let before = api.calls().len();

    ask(&api, &mut session, "   ").await;

    assert_eq!(api.calls().len(), before);
    assert!(session.transcript().is_empty());
}

#[tokio::test]
async fn history_from_previous_selection_never_shows() {
    let api = FakeBackend::with_documents(&[("a", "a.pdf"), ("b", "b.pdf")]);
    api.history.borrow_mut().insert(DocumentId::new("a"), vec![Message::local("qa", "from a")]);
    let mut session = ChatSession::new();

    let ticket_a = session.select(Some(DocumentId::new("a"))).unwrap();
    let ticket_b = session.select(Some(DocumentId::new("b"))).unwrap();

    let late_a = api.list_messages(&ticket_a.document_id).await;
    assert!(!session.history_loaded(&ticket_a, late_a));
    assert_eq!(session.phase(), ChatPhase::HistoryLoading);
    assert!(session.transcript().is_empty());

    let b = api.list_messages(&ticket_b.document_id).await;
    assert!(session.history_loaded(&ticket_b, b));
    assert!(session.transcript().iter().all(|m| m.answer != "from a"));
}

#[tokio::test]
async fn deleting_selected_document_moves_chat_to_the_next_one() {
    let api = FakeBackend::with_documents(&[("1", "a.pdf"), ("2", "b.pdf")]);
    api.history.borrow_mut().insert(DocumentId::new("2"), vec![Message::local("q", "b history")]);
    let (mut shell, mut session, mut flow) = (Shell::new(), ChatSession::new(), DeleteFlow::default());
    mount(&api, &mut shell, &mut session).await;

    let outcome = delete(&api, &mut shell, &mut flow, "1").await;
    assert_eq!(outcome, Some(DeleteOutcome::Removed(DocumentId::new("1"))));
    follow_selection(&api, &shell, &mut session).await;

    assert_eq!(shell.selected_id(), Some(&DocumentId::new("2")));
    assert_eq!(session.document(), Some(&DocumentId::new("2")));
    assert_eq!(session.transcript()[0].answer, "b history");
}

#[tokio::test]
async fn failed_delete_keeps_document_visible() {
    let api = FakeBackend::with_documents(&[("1", "a.pdf")]);
    let (mut shell, mut session, mut flow) = (Shell::new(), ChatSession::new(), DeleteFlow::default());
    mount(&api, &mut shell, &mut session).await;
    api.documents.borrow_mut().clear();

    let outcome = delete(&api, &mut shell, &mut flow, "1").await;

    assert!(matches!(outcome, Some(DeleteOutcome::Failed { .. })));
    assert_eq!(shell.documents().len(), 1);
    assert_eq!(shell.selected_id(), Some(&DocumentId::new("1")));
    assert_eq!(shell.alert(), Some("PDF not found"));
}
