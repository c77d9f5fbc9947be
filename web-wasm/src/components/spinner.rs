//! Indicador de carga global

use crate::app::use_app;
use leptos::prelude::*;

#[component]
pub fn Spinner() -> impl IntoView {
    let ctx = use_app();

    view! {
        <Show when=move || { ctx.pending.get() > 0 }>
            <div class="spinner-overlay">
                <div class="spinner-border text-primary" role="status">
                    <span class="visually-hidden">"Cargando..."</span>
                </div>
            </div>
        </Show>
    }
}
