//! Barra superior con el usuario y la navegación

use crate::app::{use_app, Page};
use leptos::prelude::*;

#[component]
pub fn Topbar() -> impl IntoView {
    let ctx = use_app();
    let banner = move || ctx.auth.get().map(|a| a.banner()).unwrap_or_default();
    let nav_class = move |page: Page| {
        if ctx.page.get() == page {
            "btn btn-light btn-sm"
        } else {
            "btn btn-outline-light btn-sm"
        }
    };

    view! {
        <nav class="navbar navbar-dark bg-dark px-3">
            <span class="navbar-brand">"Registro VI"</span>
            <div class="d-flex gap-2">
                <button class=move || nav_class(Page::Oi) on:click=move |_| ctx.navigate(Page::Oi)>
                    "OI actual"
                </button>
                <button class=move || nav_class(Page::OiList) on:click=move |_| ctx.navigate(Page::OiList)>
                    "Listado OI"
                </button>
            </div>
            <div class="d-flex align-items-center gap-3">
                <span class="text-light small">{banner}</span>
                <button class="btn btn-outline-warning btn-sm" on:click=move |_| ctx.sign_out()>
                    "Cerrar sesión"
                </button>
            </div>
        </nav>
    }
}
