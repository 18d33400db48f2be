use leptos::ev;
use leptos::prelude::*;
use web_sys::HtmlInputElement;

use crate::state::AppState;

/// Drag-and-drop target with a hidden file picker behind its label.
#[component]
pub fn UploadArea() -> impl IntoView {
    let state = expect_context::<AppState>();

    let uploading = move || state.upload.with(|u| u.is_uploading());
    let drag_over = move || state.upload.with(|u| u.is_drag_over());

    let on_change = move |ev: ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            state.upload_file(file);
        }
        // Lets the same file be picked again.
        input.set_value("");
    };

    let on_drag_over = move |ev: ev::DragEvent| {
        ev.prevent_default();
        state.upload.update(|u| u.drag_enter());
    };

    let on_drag_leave = move |ev: ev::DragEvent| {
        ev.prevent_default();
        state.upload.update(|u| u.drag_leave());
    };

    let on_drop = move |ev: ev::DragEvent| {
        ev.prevent_default();
        state.upload.update(|u| u.drag_leave());
        let file = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0));
        if let Some(file) = file {
            state.upload_file(file);
        }
    };

    view! {
        <div class="pdf-upload">
            <div class="upload-header">
                <h3>"Upload PDF"</h3>
            </div>
            <div
                class="upload-area"
                class:drag-over=drag_over
                class:uploading=uploading
                on:dragover=on_drag_over
                on:dragleave=on_drag_leave
                on:drop=on_drop
            >
                <input
                    type="file"
                    id="pdf-upload"
                    accept=".pdf"
                    on:change=on_change
                    disabled=uploading
                />
                <Show
                    when=uploading
                    fallback=|| view! {
                        <label for="pdf-upload" class="upload-label">
                            <div class="upload-icon">"📄"</div>
                            <div class="upload-text">
                                <div class="upload-title">"Click to upload or drag and drop"</div>
                                <div class="upload-subtitle">"PDF files only (max 50MB)"</div>
                            </div>
                        </label>
                    }
                >
                    <div class="upload-state">
                        <div class="upload-spinner"></div>
                        <div class="upload-text">
                            <div class="upload-title">"Uploading PDF..."</div>
                            <div class="upload-subtitle">"Extracting text content"</div>
                        </div>
                    </div>
                </Show>
            </div>
        </div>
    }
}
