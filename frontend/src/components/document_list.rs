use leptos::prelude::*;
use pdf_lens::Document;
use pdf_lens::library::format_upload_date;

use crate::state::AppState;

/// The uploaded documents, with selection and a delete button per item.
#[component]
pub fn DocumentList() -> impl IntoView {
    let state = expect_context::<AppState>();

    move || {
        let is_empty = state.shell.with(|s| s.documents().is_empty());
        if is_empty {
            view! {
                <div class="pdf-list-empty">
                    <div class="empty-icon">"📚"</div>
                    <h3>"No documents"</h3>
                    <p>"Upload your first PDF to get started"</p>
                </div>
            }
            .into_any()
        } else {
            view! {
                <div class="pdf-items">
                    <For
                        each=move || state.shell.with(|s| s.documents().to_vec())
                        key=|doc| doc.id.clone()
                        let:doc
                    >
                        <DocumentItem doc=doc />
                    </For>
                </div>
            }
            .into_any()
        }
    }
}

#[component]
fn DocumentItem(doc: Document) -> impl IntoView {
    let state = expect_context::<AppState>();

    let id_active = doc.id.clone();
    let id_select = doc.id.clone();
    let id_delete = doc.id.clone();
    let id_busy = doc.id.clone();
    let size = doc.file_size.as_ref().map(|s| format!("• {s}"));

    view! {
        <div
            class="pdf-item"
            class:selected=move || state.selected_id.get().as_ref() == Some(&id_active)
            on:click=move |_| state.select_document(id_select.clone())
        >
            <div class="pdf-icon">"📄"</div>
            <div class="pdf-content">
                <div class="pdf-name">{doc.filename.clone()}</div>
                <div class="pdf-meta">
                    <span class="pdf-date">{format_upload_date(&doc.upload_date)}</span>
                    {size.map(|s| view! { <span class="pdf-size">{s}</span> })}
                </div>
                {doc.content_preview.clone().map(|p| view! { <div class="pdf-preview">{p}</div> })}
            </div>
            <button
                class="pdf-delete-btn"
                title="Delete PDF"
                disabled=move || state.delete.with(|d| d.is_deleting(&id_busy))
                on:click=move |ev| {
                    ev.stop_propagation();
                    state.request_delete(id_delete.clone());
                }
            >
                "🗑"
            </button>
        </div>
    }
}
