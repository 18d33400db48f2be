use leptos::prelude::*;

use crate::components::document_list::DocumentList;
use crate::components::upload::UploadArea;
use crate::state::AppState;

/// Sidebar with the upload area and the document list.
#[component]
pub fn Sidebar() -> impl IntoView {
    let state = expect_context::<AppState>();

    let open = move || state.shell.with(|s| s.is_sidebar_open());
    let count = move || state.shell.with(|s| s.documents().len());

    view! {
        <aside class="sidebar" class:sidebar-open=open class:sidebar-closed=move || !open()>
            <div class="sidebar-header">
                <div class="logo-section">
                    <div class="logo">"📚"</div>
                    <div>
                        <h1>"PDF-Lens"</h1>
                        <p>"Chat with your PDFs"</p>
                    </div>
                </div>
                <button class="close-sidebar" on:click=move |_| state.shell.update(|s| s.close_sidebar())>
                    "×"
                </button>
            </div>

            <div class="sidebar-content">
                <div class="upload-section">
                    <UploadArea />
                </div>

                <div class="pdfs-section">
                    <div class="section-header">
                        <h3>"Your Documents"</h3>
                        <span class="pdf-count">{count}</span>
                    </div>
                    <Show
                        when=move || !state.shell.with(|s| s.is_loading())
                        fallback=|| view! {
                            <div class="loading-state">
                                <div class="loading-spinner"></div>
                                <span>"Loading PDFs..."</span>
                            </div>
                        }
                    >
                        <DocumentList />
                    </Show>
                </div>
            </div>
        </aside>
    }
}
