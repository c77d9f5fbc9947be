//! Aplicación principal: estado global, navegación y avisos

use crate::api::Api;
use crate::components::{
    login_page::LoginPage, oi_list_page::OiListPage, oi_page::OiPage, spinner::Spinner,
    toast::Toasts, topbar::Topbar,
};
use crate::storage;
use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use std::future::Future;
use vi_common::AuthSession;

/// Duración de un aviso (ms)
pub const TOAST_MS: u32 = 3_500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Oi,
    OiList,
}

/// Página efectiva: sin sesión siempre Login; con sesión nunca Login
pub fn resolve_page(logged_in: bool, requested: Page) -> Page {
    match (logged_in, requested) {
        (false, _) => Page::Login,
        (true, Page::Login) => Page::Oi,
        (true, page) => page,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    pub fn class(&self) -> &'static str {
        match self {
            ToastKind::Success => "text-bg-success",
            ToastKind::Error => "text-bg-danger",
            ToastKind::Info => "text-bg-secondary",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Cola de avisos visibles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastQueue {
    next_id: u64,
    items: Vec<Toast>,
}

impl ToastQueue {
    pub fn push(&mut self, kind: ToastKind, message: String) -> u64 {
        self.next_id += 1;
        self.items.push(Toast {
            id: self.next_id,
            kind,
            message,
        });
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|t| t.id != id);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }
}

/// Estado global compartido por contexto
#[derive(Clone, Copy)]
pub struct AppContext {
    pub auth: RwSignal<Option<AuthSession>>,
    pub page: RwSignal<Page>,
    pub toasts: RwSignal<ToastQueue>,
    /// Llamadas en curso (spinner)
    pub pending: RwSignal<u32>,
}

impl AppContext {
    pub fn new(auth: Option<AuthSession>) -> Self {
        Self {
            auth: RwSignal::new(auth),
            page: RwSignal::new(Page::Oi),
            toasts: RwSignal::new(ToastQueue::default()),
            pending: RwSignal::new(0),
        }
    }

    /// Cliente con el token de la sesión actual
    pub fn api(&self) -> Api {
        Api::new(
            &storage::api_base_url(),
            self.auth.get_untracked().map(|a| a.token),
        )
    }

    pub fn navigate(&self, page: Page) {
        self.page.set(page);
    }

    pub fn notify(&self, kind: ToastKind, message: impl Into<String>) {
        let toasts = self.toasts;
        let mut id = 0;
        toasts.update(|q| id = q.push(kind, message.into()));
        Timeout::new(TOAST_MS, move || toasts.update(|q| q.dismiss(id))).forget();
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(ToastKind::Error, message);
    }

    /// Envuelve una llamada para mostrar el spinner mientras dura
    pub async fn busy<F: Future>(&self, fut: F) -> F::Output {
        self.pending.update(|n| *n += 1);
        let out = fut.await;
        self.pending.update(|n| *n = n.saturating_sub(1));
        out
    }

    pub fn sign_in(&self, auth: AuthSession) {
        if let Err(e) = storage::session().save_auth(&auth) {
            gloo::console::warn!(format!("No se pudo guardar la sesión: {}", e));
        }
        self.auth.set(Some(auth));
        self.navigate(Page::Oi);
    }

    pub fn sign_out(&self) {
        let session = storage::session();
        session.clear_auth();
        session.clear_current_oi();
        self.auth.set(None);
        self.navigate(Page::Login);
    }
}

pub fn use_app() -> AppContext {
    expect_context::<AppContext>()
}

#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new(storage::session().load_auth());
    provide_context(ctx);

    let current = move || resolve_page(ctx.auth.get().is_some(), ctx.page.get());

    view! {
        <Show when=move || ctx.auth.get().is_some()>
            <Topbar />
        </Show>

        <main class="container-fluid py-3">
            {move || match current() {
                Page::Login => view! { <LoginPage /> }.into_any(),
                Page::Oi => view! { <OiPage /> }.into_any(),
                Page::OiList => view! { <OiListPage /> }.into_any(),
            }}
        </main>

        <Toasts />
        <Spinner />
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_page_guard() {
        assert_eq!(resolve_page(false, Page::Oi), Page::Login);
        assert_eq!(resolve_page(false, Page::OiList), Page::Login);
        assert_eq!(resolve_page(true, Page::Login), Page::Oi);
        assert_eq!(resolve_page(true, Page::OiList), Page::OiList);
    }

    #[test]
    fn test_toast_queue() {
        let mut queue = ToastQueue::default();
        let a = queue.push(ToastKind::Success, "OI guardada".into());
        let b = queue.push(ToastKind::Error, "Fuga".into());
        assert_ne!(a, b);
        assert_eq!(queue.items().len(), 2);
        queue.dismiss(a);
        assert_eq!(queue.items()[0].message, "Fuga");
        queue.dismiss(99);
        assert_eq!(queue.items().len(), 1);
    }
}
