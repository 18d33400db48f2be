mod api;
mod components;
mod state;

use leptos::mount::mount_to_body;
use leptos::prelude::*;

use components::chat::ChatArea;
use components::dialog::Dialogs;
use components::sidebar::Sidebar;
use state::AppState;

/// Root application component.
#[component]
fn App() -> impl IntoView {
    let state = AppState::provide();

    // Load documents on mount
    state.load_documents();

    // The chat follows the selection; history is refetched whenever it changes.
    Effect::new(move |_| {
        let selected = state.selected_id.get();
        state.open_chat(selected);
    });

    let sidebar_open = move || state.shell.with(|s| s.is_sidebar_open());

    view! {
        <div class="app-container">
            <div class="mobile-header">
                <button class="sidebar-toggle" on:click=move |_| state.shell.update(|s| s.toggle_sidebar())>
                    "☰"
                </button>
                <div class="mobile-title">
                    <h1>"PDF-Lens"</h1>
                </div>
                <div class="header-actions">
                    {move || {
                        state.shell.with(|s| {
                            s.selected().map(|doc| {
                                view! { <span class="current-pdf">{doc.filename.clone()}</span> }
                            })
                        })
                    }}
                </div>
            </div>

            <Sidebar />

            <Show when=sidebar_open>
                <div class="sidebar-overlay" on:click=move |_| state.shell.update(|s| s.close_sidebar())></div>
            </Show>

            <main class="chat-main">
                <ChatArea />
            </main>

            <Dialogs />
        </div>
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
