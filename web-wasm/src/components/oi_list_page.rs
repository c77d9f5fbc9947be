//! Listado de OIs del backend

use crate::app::{use_app, Page, ToastKind};
use crate::components::password_modal::PasswordModal;
use crate::download::download_excel;
use crate::storage;
use leptos::prelude::*;
use leptos::task::spawn_local;
use vi_common::{CurrentOi, OiRead};

#[component]
pub fn OiListPage() -> impl IntoView {
    let ctx = use_app();
    let ois = RwSignal::new(Vec::<OiRead>::new());
    // OI cuyo Excel se está pidiendo
    let excel_for = RwSignal::new(None::<i64>);
    let active = storage::session().load_current_oi().map(|c| c.id);

    spawn_local(async move {
        let api = ctx.api();
        match ctx.busy(api.list_oi()).await {
            Ok(list) => ois.set(list),
            Err(e) => ctx.error(e.message),
        }
    });

    let open = move |oi: OiRead| {
        let pointer = CurrentOi {
            id: oi.id,
            code: oi.code.clone(),
        };
        match storage::session().save_current_oi(&pointer) {
            Ok(()) => {
                ctx.notify(ToastKind::Info, format!("OI {} abierta", oi.code));
                ctx.navigate(Page::Oi);
            }
            Err(e) => ctx.error(e.to_string()),
        }
    };

    let on_excel = move |password: String| {
        let Some(oi_id) = excel_for.get_untracked() else {
            return;
        };
        excel_for.set(None);
        spawn_local(download_excel(ctx, oi_id, password));
    };

    view! {
        <div class="card">
            <div class="card-header"><strong>"Órdenes de inspección"</strong></div>
            <div class="card-body p-0">
                <table class="table table-sm table-hover mb-0">
                    <thead>
                        <tr>
                            <th>"Id"</th>
                            <th>"Código"</th>
                            <th>"Q3"</th>
                            <th>"Alcance"</th>
                            <th>"PMA"</th>
                            <th>"Presión"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || ois.get()
                            key=|oi| oi.id
                            children=move |oi| {
                                let target = oi.clone();
                                let oi_id = oi.id;
                                view! {
                                    <tr class:table-active={active == Some(oi.id)}>
                                        <td>{oi.id}</td>
                                        <td>{oi.code}</td>
                                        <td>{oi.q3}</td>
                                        <td>{oi.alcance}</td>
                                        <td>{oi.pma}</td>
                                        <td>{format!("{:.1}", oi.presion_bar)}</td>
                                        <td class="text-end">
                                            <button
                                                class="btn btn-outline-primary btn-sm"
                                                on:click=move |_| open(target.clone())
                                            >
                                                "Abrir"
                                            </button>
                                            <button
                                                class="btn btn-outline-secondary btn-sm ms-1"
                                                on:click=move |_| excel_for.set(Some(oi_id))
                                            >
                                                "Excel"
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
                <Show when=move || ois.with(|l| l.is_empty())>
                    <p class="text-muted p-3 mb-0">"Sin OIs registradas"</p>
                </Show>
            </div>
        </div>

        <Show when=move || excel_for.with(|id| id.is_some())>
            <PasswordModal on_confirm=on_excel on_cancel=move |_: ()| excel_for.set(None) />
        </Show>
    }
}
