use leptos::prelude::*;
use pdf_lens::library::CONFIRM_DELETE;

use crate::state::AppState;

/// Modal alert and delete confirmation. At most one of each shows at a time.
#[component]
pub fn Dialogs() -> impl IntoView {
    let state = expect_context::<AppState>();

    let alert = move || state.shell.with(|s| s.alert().map(str::to_string));
    let confirming = move || state.delete.with(|d| d.pending_confirmation().is_some());

    view! {
        {move || {
            alert().map(|message| {
                view! {
                    <div class="modal-backdrop">
                        <div class="modal" role="alertdialog">
                            <p>{message}</p>
                            <div class="modal-actions">
                                <button class="modal-ok" on:click=move |_| state.shell.update(|s| s.dismiss_alert())>
                                    "OK"
                                </button>
                            </div>
                        </div>
                    </div>
                }
            })
        }}
        <Show when=confirming>
            <div class="modal-backdrop">
                <div class="modal" role="dialog">
                    <p>{CONFIRM_DELETE}</p>
                    <div class="modal-actions">
                        <button class="modal-cancel" on:click=move |_| state.cancel_delete()>
                            "Cancel"
                        </button>
                        <button class="modal-danger" on:click=move |_| state.confirm_delete()>
                            "Delete"
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
