//! Per-document chat transcript and the question/answer lifecycle.
//!
//! ```text
//! NoSelection ─select─▶ HistoryLoading ─history─▶ Idle ─submit─▶ Submitting ─answer─▶ Idle
//!                              ▲                                                   │
//!                              └──────────────── select another document ──────────┘
//! ```
//!
//! Requests are handed out as tickets. Every selection change bumps a
//! generation counter, so a ticket issued for an earlier selection can never
//! touch the current transcript. The optimistic placeholder is found again by
//! its key, not by its position.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::ClientError;
use crate::models::{DocumentId, Message};

pub const HISTORY_ERROR_QUESTION: &str = "System";
pub const HISTORY_ERROR_ANSWER: &str = "Error loading chat history. Please try again.";
pub const ANSWER_ERROR: &str = "Sorry, there was an error processing your question. Please try again.";

/// Prompts offered when a document has no history yet.
pub const SUGGESTIONS: [&str; 3] = [
    "What is the main topic of this document?",
    "Can you summarize the key points?",
    "What are the most important findings?",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatPhase {
    NoSelection,
    HistoryLoading,
    Idle,
    Submitting,
}

/// Issued when a document is selected; redeem with [`ChatSession::history_loaded`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryTicket {
    pub generation: u64,
    pub document_id: DocumentId,
}

/// Issued on submit; redeem with [`ChatSession::answer_received`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AskTicket {
    pub generation: u64,
    pub document_id: DocumentId,
    pub placeholder: Uuid,
    pub question: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatSession {
    document: Option<DocumentId>,
    generation: u64,
    phase: ChatPhase,
    transcript: Vec<Message>,
    revision: u64,
    draft: String,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            document: None,
            generation: 0,
            phase: ChatPhase::NoSelection,
            transcript: Vec::new(),
            revision: 0,
            draft: String::new(),
        }
    }

    pub fn phase(&self) -> ChatPhase {
        self.phase
    }

    pub fn document(&self) -> Option<&DocumentId> {
        self.document.as_ref()
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Bumped on every change to the transcript, including an answer
    /// replacing its placeholder in place.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == ChatPhase::Submitting
    }

    /// True when pressing send would start a request.
    pub fn can_submit(&self) -> bool {
        self.phase == ChatPhase::Idle && self.document.is_some() && !self.draft.trim().is_empty()
    }

    /// Point the session at `document`. Returns a ticket when history must be
    /// fetched; re-selecting the current document is a no-op.
    pub fn select(&mut self, document: Option<DocumentId>) -> Option<HistoryTicket> {
        if document == self.document && self.phase != ChatPhase::NoSelection {
            return None;
        }
        if document.is_none() && self.document.is_none() {
            return None;
        }

        if self.phase == ChatPhase::Submitting {
            debug!(previous = ?self.document, "Abandoning in-flight question");
        }
        self.generation += 1;
        self.transcript.clear();
        self.revision += 1;
        self.document = document.clone();

        match document {
            Some(document_id) => {
                debug!(%document_id, generation = self.generation, "Loading chat history");
                self.phase = ChatPhase::HistoryLoading;
                Some(HistoryTicket { generation: self.generation, document_id })
            }
            None => {
                self.phase = ChatPhase::NoSelection;
                self.draft.clear();
                None
            }
        }
    }

    /// Apply a history response. Returns `false` for a stale ticket, which
    /// leaves the session untouched.
    pub fn history_loaded(
        &mut self,
        ticket: &HistoryTicket,
        result: Result<Vec<Message>, ClientError>,
    ) -> bool {
        if !self.is_current(ticket.generation, &ticket.document_id)
            || self.phase != ChatPhase::HistoryLoading
        {
            debug!(document_id = %ticket.document_id, "Ignoring stale chat history");
            return false;
        }

        self.transcript = match result {
            Ok(messages) => messages
                .into_iter()
                .map(|m| Message { pending: false, ..m })
                .collect(),
            Err(e) => {
                error_log(&ticket.document_id, "Failed to load chat history", &e);
                vec![Message::local(HISTORY_ERROR_QUESTION, HISTORY_ERROR_ANSWER)]
            }
        };
        self.revision += 1;
        self.phase = ChatPhase::Idle;
        true
    }

    /// Start asking the current draft. Blank drafts, a missing selection and a
    /// question already in flight all make this a no-op returning `None`.
    pub fn submit(&mut self) -> Option<AskTicket> {
        if !self.can_submit() {
            return None;
        }
        let document_id = self.document.clone()?;
        let question = std::mem::take(&mut self.draft);

        let placeholder = Message::placeholder(question.clone());
        let ticket = AskTicket {
            generation: self.generation,
            document_id,
            placeholder: placeholder.id,
            question,
        };
        self.transcript.push(placeholder);
        self.revision += 1;
        self.phase = ChatPhase::Submitting;
        debug!(document_id = %ticket.document_id, "Question submitted");
        Some(ticket)
    }

    /// Settle the placeholder created by `ticket`. Returns `false` when the
    /// ticket belongs to a previous selection.
    pub fn answer_received(&mut self, ticket: &AskTicket, result: Result<Message, ClientError>) -> bool {
        if !self.is_current(ticket.generation, &ticket.document_id) {
            debug!(document_id = %ticket.document_id, "Ignoring answer for a previous selection");
            return false;
        }
        let Some(entry) = self.transcript.iter_mut().find(|m| m.id == ticket.placeholder) else {
            warn!(document_id = %ticket.document_id, "Placeholder vanished before its answer arrived");
            self.phase = ChatPhase::Idle;
            return false;
        };

        match result {
            Ok(answer) => {
                *entry = Message { id: ticket.placeholder, pending: false, ..answer };
            }
            Err(e) => {
                error_log(&ticket.document_id, "Failed to get an answer", &e);
                entry.answer = ANSWER_ERROR.to_string();
                entry.pending = false;
            }
        }
        self.revision += 1;
        self.phase = ChatPhase::Idle;
        true
    }

    fn is_current(&self, generation: u64, document_id: &DocumentId) -> bool {
        generation == self.generation && self.document.as_ref() == Some(document_id)
    }
}

fn error_log(document_id: &DocumentId, what: &str, err: &ClientError) {
    tracing::error!(%document_id, "{what}: {err}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> DocumentId {
        DocumentId::new(s)
    }

    fn loaded(doc: &str, history: Vec<Message>) -> ChatSession {
        let mut session = ChatSession::new();
        let ticket = session.select(Some(id(doc))).unwrap();
        assert!(session.history_loaded(&ticket, Ok(history)));
        session
    }

    #[test]
    fn starts_without_selection() {
        let session = ChatSession::new();
        assert_eq!(session.phase(), ChatPhase::NoSelection);
        assert!(session.transcript().is_empty());
        assert!(!session.can_submit());
    }

    #[test]
    fn select_enters_history_loading_then_idle() {
        let mut session = ChatSession::new();
        let ticket = session.select(Some(id("a"))).unwrap();
        assert_eq!(session.phase(), ChatPhase::HistoryLoading);
        session.history_loaded(&ticket, Ok(vec![Message::local("q", "a")]));
        assert_eq!(session.phase(), ChatPhase::Idle);
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn reselecting_the_same_document_keeps_transcript() {
        let mut session = loaded("a", vec![Message::local("q", "a")]);
        assert!(session.select(Some(id("a"))).is_none());
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn history_failure_degrades_to_single_notice() {
        let mut session = ChatSession::new();
        let ticket = session.select(Some(id("a"))).unwrap();
        session.history_loaded(&ticket, Err(ClientError::network("offline")));
        assert_eq!(session.phase(), ChatPhase::Idle);
        let [notice] = session.transcript() else { panic!("expected one entry") };
        assert_eq!(notice.question, HISTORY_ERROR_QUESTION);
        assert_eq!(notice.answer, HISTORY_ERROR_ANSWER);
        assert!(!notice.pending);
    }

    #[test]
    fn submit_clears_draft_and_appends_placeholder() {
        let mut session = loaded("a", vec![]);
        session.set_draft("  What is it?  ");
        let ticket = session.submit().unwrap();
        assert_eq!(session.draft(), "");
        assert_eq!(session.phase(), ChatPhase::Submitting);
        let last = session.transcript().last().unwrap();
        assert!(last.pending);
        assert!(last.answer.is_empty());
        assert_eq!(last.id, ticket.placeholder);
        assert_eq!(ticket.question, "  What is it?  ");
    }

    #[test]
    fn blank_draft_is_ignored() {
        let mut session = loaded("a", vec![]);
        session.set_draft(" \t\n");
        assert!(session.submit().is_none());
        assert!(session.transcript().is_empty());
        assert_eq!(session.phase(), ChatPhase::Idle);
    }

    #[test]
    fn cannot_submit_while_history_loads() {
        let mut session = ChatSession::new();
        session.select(Some(id("a")));
        session.set_draft("hello");
        assert!(session.submit().is_none());
    }

    #[test]
    fn answer_replaces_placeholder_by_key() {
        let mut session = loaded("a", vec![Message::local("old", "answer")]);
        session.set_draft("new");
        let ticket = session.submit().unwrap();
        let answer = Message::local("new", "forty-two");
        assert!(session.answer_received(&ticket, Ok(answer)));
        assert_eq!(session.transcript().len(), 2);
        let last = session.transcript().last().unwrap();
        assert_eq!(last.answer, "forty-two");
        assert_eq!(last.id, ticket.placeholder);
        assert!(!last.pending);
        assert_eq!(session.phase(), ChatPhase::Idle);
    }

    #[test]
    fn failed_answer_keeps_question() {
        let mut session = loaded("a", vec![]);
        session.set_draft("why?");
        let ticket = session.submit().unwrap();
        session.answer_received(&ticket, Err(ClientError::Server { status: 500, detail: None }));
        let [entry] = session.transcript() else { panic!("expected one entry") };
        assert_eq!(entry.question, "why?");
        assert_eq!(entry.answer, ANSWER_ERROR);
        assert!(!entry.pending);
    }

    #[test]
    fn second_submit_while_pending_is_noop() {
        let mut session = loaded("a", vec![]);
        session.set_draft("one");
        session.submit().unwrap();
        session.set_draft("two");
        assert!(session.submit().is_none());
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.draft(), "two");
    }

    #[test]
    fn stale_history_is_ignored_after_switch() {
        let mut session = ChatSession::new();
        let first = session.select(Some(id("a"))).unwrap();
        let second = session.select(Some(id("b"))).unwrap();
        assert!(!session.history_loaded(&first, Ok(vec![Message::local("from a", "x")])));
        assert_eq!(session.phase(), ChatPhase::HistoryLoading);
        assert!(session.transcript().is_empty());
        assert!(session.history_loaded(&second, Ok(vec![])));
    }

    #[test]
    fn answer_after_switch_is_not_reconciled() {
        let mut session = loaded("a", vec![]);
        session.set_draft("q");
        let ticket = session.submit().unwrap();
        let history = session.select(Some(id("b"))).unwrap();
        session.history_loaded(&history, Ok(vec![Message::local("b's", "history")]));
        assert!(!session.answer_received(&ticket, Ok(Message::local("q", "a's answer"))));
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].question, "b's");
    }

    #[test]
    fn switching_away_and_back_still_rejects_old_tickets() {
        let mut session = loaded("a", vec![]);
        session.set_draft("q");
        let ticket = session.submit().unwrap();
        session.select(Some(id("b")));
        let back = session.select(Some(id("a"))).unwrap();
        session.history_loaded(&back, Ok(vec![]));
        assert!(!session.answer_received(&ticket, Ok(Message::local("q", "late"))));
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn clearing_selection_empties_transcript() {
        let mut session = loaded("a", vec![Message::local("q", "a")]);
        session.set_draft("unsent");
        assert!(session.select(None).is_none());
        assert_eq!(session.phase(), ChatPhase::NoSelection);
        assert!(session.transcript().is_empty());
        assert_eq!(session.draft(), "");
    }

    #[test]
    fn every_transcript_change_bumps_revision() {
        let mut session = ChatSession::new();
        let mut seen = session.revision();
        let mut bumped = |session: &ChatSession| {
            let changed = session.revision() > seen;
            seen = session.revision();
            changed
        };

        let history = session.select(Some(id("a"))).unwrap();
        assert!(bumped(&session));
        session.history_loaded(&history, Ok(vec![]));
        assert!(bumped(&session));

        session.set_draft("why?");
        assert!(!bumped(&session));

        let ask = session.submit().unwrap();
        assert!(bumped(&session));
        session.answer_received(&ask, Ok(Message::local("why?", "because")));
        assert_eq!(session.transcript().len(), 1);
        assert!(bumped(&session));

        assert!(!session.history_loaded(&history, Ok(vec![])));
        assert!(!bumped(&session));
    }
}
