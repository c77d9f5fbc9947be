//! Avisos flotantes (se cierran solos o con un clic)

use crate::app::use_app;
use leptos::prelude::*;

#[component]
pub fn Toasts() -> impl IntoView {
    let ctx = use_app();

    view! {
        <div class="toast-container position-fixed top-0 end-0 p-3">
            <For
                each=move || ctx.toasts.get().items().to_vec()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div
                            class=format!("toast show border-0 {}", toast.kind.class())
                            role="alert"
                            on:click=move |_| ctx.toasts.update(|q| q.dismiss(id))
                        >
                            <div class="toast-body">{toast.message}</div>
                        </div>
                    }
                }
            />
        </div>
    }
}
