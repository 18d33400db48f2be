use leptos::ev;
use leptos::prelude::*;
use pdf_lens::session::SUGGESTIONS;
use pdf_lens::{ChatPhase, Message};

use crate::state::AppState;

/// Chat for the selected document, or a welcome screen when there is none.
#[component]
pub fn ChatArea() -> impl IntoView {
    let state = expect_context::<AppState>();

    let filename = Memo::new(move |_| state.shell.with(|s| s.selected().map(|d| d.filename.clone())));
    // Memos keep typing in the draft from rebuilding the transcript.
    let phase = Memo::new(move |_| state.chat.with(|c| c.phase()));
    let empty = Memo::new(move |_| state.chat.with(|c| c.transcript().is_empty()));
    let revision = Memo::new(move |_| state.chat.with(|c| c.revision()));

    // Keep the newest exchange in view as history loads and answers land.
    let end_ref = NodeRef::<leptos::html::Div>::new();
    Effect::new(move |_| {
        revision.track();
        if let Some(end) = end_ref.get() {
            let options = web_sys::ScrollIntoViewOptions::new();
            options.set_behavior(web_sys::ScrollBehavior::Smooth);
            end.scroll_into_view_with_scroll_into_view_options(&options);
        }
    });

    view! {
        <div class="chat-interface">
            <Show when=move || filename.get().is_some() fallback=|| view! { <Welcome /> }>
                <div class="chat-header">
                    <div class="chat-title">
                        <div class="chat-icon">"💬"</div>
                        <div>
                            <h1>{move || filename.get().unwrap_or_default()}</h1>
                            <p>"Ask questions about this document"</p>
                        </div>
                    </div>
                </div>

                <div class="chat-messages">
                    {move || {
                        let empty = empty.get();
                        match phase.get() {
                            ChatPhase::HistoryLoading => view! {
                                <div class="loading-state">
                                    <div class="loading-spinner"></div>
                                    <span>"Loading conversation..."</span>
                                </div>
                            }.into_any(),
                            _ if empty => view! {
                                <Suggestions filename=filename.get().unwrap_or_default() />
                            }.into_any(),
                            _ => view! {
                                <For
                                    each=move || state.chat.with(|c| c.transcript().to_vec())
                                    key=|m| (m.id, m.pending)
                                    let:msg
                                >
                                    <Exchange msg=msg />
                                </For>
                            }.into_any(),
                        }
                    }}
                    <div class="chat-end" node_ref=end_ref></div>
                </div>

                <ChatInput />
            </Show>
        </div>
    }
}

/// Shown when no document is selected.
#[component]
fn Welcome() -> impl IntoView {
    view! {
        <div class="welcome-screen">
            <div class="welcome-content">
                <div class="welcome-icon">"📚"</div>
                <h1>"Welcome to PDF-Lens"</h1>
                <p>"Upload a PDF document to start chatting with AI"</p>
                <div class="welcome-features">
                    <div class="feature"><span>"🔍"</span>"Ask questions about your document"</div>
                    <div class="feature"><span>"📝"</span>"Get summaries and explanations"</div>
                    <div class="feature"><span>"💬"</span>"Interactive AI conversations"</div>
                </div>
            </div>
        </div>
    }
}

/// Starter questions for a document with no history yet.
#[component]
fn Suggestions(filename: String) -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <div class="welcome-message">
            <div class="welcome-icon">"💭"</div>
            <h2>{format!("Ask anything about \"{filename}\"")}</h2>
            <p>"I can help you understand and analyze this document."</p>
            <div class="suggestions">
                {SUGGESTIONS
                    .into_iter()
                    .map(|prompt| {
                        view! {
                            <div
                                class="suggestion-item"
                                on:click=move |_| state.chat.update(|c| c.set_draft(prompt))
                            >
                                {format!("\"{prompt}\"")}
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

/// One question and its answer, or a typing indicator while pending.
#[component]
fn Exchange(msg: Message) -> impl IntoView {
    let time = msg.clock_label(local_offset_minutes(&msg));

    view! {
        <div class="message-container">
            <div class="message user-message">
                <div class="message-avatar">"👤"</div>
                <div class="message-content">
                    <div class="message-text">{msg.question.clone()}</div>
                    <div class="message-time">{time.clone()}</div>
                </div>
            </div>
            <div class="message assistant-message">
                <div class="message-avatar">"🤖"</div>
                <div class="message-content">
                    {if msg.pending {
                        view! {
                            <div class="typing-indicator">
                                <div class="typing-dot"></div>
                                <div class="typing-dot"></div>
                                <div class="typing-dot"></div>
                            </div>
                        }.into_any()
                    } else {
                        view! { <div class="message-text">{msg.answer.clone()}</div> }.into_any()
                    }}
                    <div class="message-time">{time}</div>
                </div>
            </div>
        </div>
    }
}

/// Minutes east of UTC in the browser's zone on the day `msg` was sent.
fn local_offset_minutes(msg: &Message) -> i32 {
    let date = js_sys::Date::new_0();
    date.set_time(msg.timestamp.timestamp_millis() as f64);
    -(date.get_timezone_offset() as i32)
}

/// Question input; disabled while an answer is pending or history loads.
#[component]
fn ChatInput() -> impl IntoView {
    let state = expect_context::<AppState>();

    let busy = move || state.chat.with(|c| c.phase() != ChatPhase::Idle);
    let can_send = move || state.chat.with(|c| c.can_submit());
    let placeholder = move || {
        let name = state.shell.with(|s| s.selected().map(|d| d.filename.clone()).unwrap_or_default());
        format!("Ask about \"{name}\"...")
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        state.ask();
    };

    view! {
        <div class="chat-input-container">
            <form class="chat-input-form" on:submit=on_submit>
                <div class="input-wrapper">
                    <input
                        type="text"
                        placeholder=placeholder
                        prop:value=move || state.chat.with(|c| c.draft().to_string())
                        on:input=move |ev| {
                            let text = event_target_value(&ev);
                            state.chat.update(|c| c.set_draft(text));
                        }
                        disabled=busy
                        autofocus=true
                    />
                    <button type="submit" class="send-button" disabled=move || !can_send()>
                        {move || if state.chat.with(|c| c.is_submitting()) { "…" } else { "➤" }}
                    </button>
                </div>
            </form>
            <div class="chat-disclaimer">
                <p>"PDF-Lens can make mistakes. Consider checking important information."</p>
            </div>
        </div>
    }
}
