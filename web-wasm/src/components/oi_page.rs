//! Página de la OI: cabecera, tabla de bancadas y exportación
//!
//! Sin OI activa el formulario está habilitado para crear una; con OI
//! activa los campos quedan bloqueados y se habilitan las bancadas.

use crate::app::{use_app, AppContext, ToastKind};
use crate::components::bancada_modal::BancadaModal;
use crate::components::password_modal::PasswordModal;
use crate::download::download_excel;
use crate::storage;
use leptos::ev::MouseEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use vi_common::rules::estado_label;
use vi_common::{meter_range_label, BancadaRead, BenchStatus, Catalogs, CurrentOi, OiForm, OiRead};

const NO_OI: &str = "Primero guarda el OI.";

#[derive(Debug, Clone, PartialEq)]
enum Modal {
    Bancada(Option<BancadaRead>),
    Password,
}

fn current_year() -> i32 {
    js_sys::Date::new_0().get_full_year() as i32
}

/// Formulario bloqueado con los datos de una OI existente
fn form_from(oi: &OiRead) -> OiForm {
    OiForm {
        code: oi.code.clone(),
        q3: oi.q3,
        alcance: oi.alcance,
        pma: oi.pma,
        estado: 0,
    }
}

fn badge_class(estado: u8) -> &'static str {
    BenchStatus::try_from(i64::from(estado))
        .map(|s| s.badge_class())
        .unwrap_or("bg-secondary")
}

/// Opciones de PMA: catálogo o la tabla fija
fn pma_options(catalogs: &Catalogs) -> Vec<i64> {
    if catalogs.pma.is_empty() {
        vec![10, 16]
    } else {
        catalogs.pma.clone()
    }
}

/// Celdas visibles de una fila de la tabla de bancadas
#[derive(Debug, Clone, Default, PartialEq)]
struct BenchCells {
    item: i64,
    meters: String,
    estado: &'static str,
    badge: &'static str,
    rows: u32,
}

impl BenchCells {
    fn of(bench: &BancadaRead) -> Self {
        Self {
            item: bench.item,
            meters: meter_range_label(
                bench.rows_data.as_deref().unwrap_or_default(),
                bench.medidor.as_deref(),
            ),
            estado: estado_label(bench.estado),
            badge: badge_class(bench.estado),
            rows: bench.rows,
        }
    }
}

/// Versión vigente de una bancada; la lista se reemplaza tras cada guardado
fn find_bench(list: &[BancadaRead], id: i64) -> Option<BancadaRead> {
    list.iter().find(|b| b.id == id).cloned()
}

async fn refresh_bancadas(ctx: AppContext, oi_id: i64, bancadas: RwSignal<Vec<BancadaRead>>) {
    let api = ctx.api();
    let list = ctx.busy(api.list_bancadas(oi_id)).await;
    bancadas.set(list);
}

#[component]
pub fn OiPage() -> impl IntoView {
    let ctx = use_app();
    let form = RwSignal::new(OiForm::with_defaults(current_year(), None));
    let catalogs = RwSignal::new(Catalogs::default());
    let current = RwSignal::new(None::<OiRead>);
    let bancadas = RwSignal::new(Vec::<BancadaRead>::new());
    let modal = RwSignal::new(None::<Modal>);
    let locked = move || current.with(|c| c.is_some());

    // Catálogos y OI activa guardada
    spawn_local(async move {
        let api = ctx.api();
        match api.catalogs().await {
            Ok(loaded) => {
                let defaults = OiForm::with_defaults(current_year(), Some(&loaded));
                form.update(|f| {
                    f.q3 = defaults.q3;
                    f.alcance = defaults.alcance;
                });
                catalogs.set(loaded);
            }
            Err(e) => ctx.error(e.message),
        }

        let session = storage::session();
        if let Some(pointer) = session.load_current_oi() {
            match ctx.busy(api.get_oi_full(pointer.id)).await {
                Ok(full) => {
                    form.set(form_from(&full.oi));
                    current.set(Some(full.oi));
                    bancadas.set(full.bancadas);
                }
                Err(e) => {
                    session.clear_current_oi();
                    ctx.error(e.message);
                }
            }
        }
    });

    let on_save = move |_: MouseEvent| {
        let Some(auth) = ctx.auth.get_untracked() else {
            return;
        };
        let payload = match form.with_untracked(|f| f.to_create(&auth)) {
            Ok(payload) => payload,
            Err(e) => {
                ctx.error(e.to_string());
                return;
            }
        };
        spawn_local(async move {
            let api = ctx.api();
            match ctx.busy(api.create_oi(&payload)).await {
                Ok(oi) => {
                    let pointer = CurrentOi {
                        id: oi.id,
                        code: oi.code.clone(),
                    };
                    if let Err(e) = storage::session().save_current_oi(&pointer) {
                        ctx.error(e.to_string());
                    }
                    ctx.notify(ToastKind::Success, format!("OI {} guardada", oi.code));
                    form.set(form_from(&oi));
                    current.set(Some(oi));
                    bancadas.set(Vec::new());
                }
                Err(e) => ctx.error(e.message),
            }
        });
    };

    let on_close_oi = move |_: MouseEvent| {
        storage::session().clear_current_oi();
        let code = current.get_untracked().map(|oi| oi.code).unwrap_or_default();
        current.set(None);
        bancadas.set(Vec::new());
        form.set(OiForm::with_defaults(
            current_year(),
            Some(&catalogs.get_untracked()),
        ));
        ctx.notify(ToastKind::Info, format!("OI {} cerrada", code));
    };

    let on_add = move |_: MouseEvent| {
        if locked() {
            modal.set(Some(Modal::Bancada(None)));
        } else {
            ctx.error(NO_OI);
        }
    };

    let on_excel_click = move |_: MouseEvent| {
        if locked() {
            modal.set(Some(Modal::Password));
        } else {
            ctx.error(NO_OI);
        }
    };

    let on_delete = move |bench: BancadaRead| {
        let confirmed = web_sys::window()
            .and_then(|w| {
                w.confirm_with_message(&format!("¿Eliminar bancada #{}?", bench.item))
                    .ok()
            })
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        let Some(oi_id) = current.get_untracked().map(|oi| oi.id) else {
            return;
        };
        spawn_local(async move {
            let api = ctx.api();
            match ctx.busy(api.delete_bancada(bench.id)).await {
                Ok(()) => {
                    ctx.notify(ToastKind::Success, format!("Bancada #{} eliminada", bench.item));
                    refresh_bancadas(ctx, oi_id, bancadas).await;
                }
                Err(e) => ctx.error(e.message),
            }
        });
    };

    let close_modal = move |_: ()| modal.set(None);

    let on_saved = move |saved: BancadaRead| {
        modal.set(None);
        ctx.notify(ToastKind::Success, format!("Bancada #{} guardada", saved.item));
        if let Some(oi_id) = current.get_untracked().map(|oi| oi.id) {
            spawn_local(refresh_bancadas(ctx, oi_id, bancadas));
        }
    };

    let on_excel = move |password: String| {
        modal.set(None);
        let Some(oi_id) = current.get_untracked().map(|oi| oi.id) else {
            return;
        };
        spawn_local(download_excel(ctx, oi_id, password));
    };

    view! {
        <div class="card mb-3">
            <div class="card-header d-flex justify-content-between align-items-center">
                <strong>
                    {move || match current.get() {
                        Some(oi) => format!("OI {} (#{})", oi.code, oi.id),
                        None => "Nueva OI".to_string(),
                    }}
                </strong>
                <Show when=locked>
                    <button class="btn btn-outline-secondary btn-sm" on:click=on_close_oi>
                        "Cerrar OI"
                    </button>
                </Show>
            </div>
            <div class="card-body">
                <div class="row g-3">
                    <div class="col-md-3">
                        <label class="form-label" for="oi-code">"Código OI"</label>
                        <input
                            id="oi-code"
                            class="form-control"
                            placeholder="OI-0001-2025"
                            disabled=locked
                            prop:value=move || form.with(|f| f.code.clone())
                            on:input=move |ev| form.update(|f| f.code = event_target_value(&ev))
                        />
                    </div>
                    <div class="col-md-2">
                        <label class="form-label" for="oi-q3">"Q3 (m³/h)"</label>
                        <select
                            id="oi-q3"
                            class="form-select"
                            disabled=locked
                            on:change=move |ev| {
                                if let Ok(q3) = event_target_value(&ev).parse::<f64>() {
                                    form.update(|f| f.q3 = q3);
                                }
                            }
                        >
                            {move || {
                                let selected = form.with(|f| f.q3);
                                catalogs
                                    .with(|c| c.q3.clone())
                                    .into_iter()
                                    .map(|q3| view! {
                                        <option value=q3.to_string() selected={q3 == selected}>{q3.to_string()}</option>
                                    })
                                    .collect_view()
                            }}
                        </select>
                    </div>
                    <div class="col-md-2">
                        <label class="form-label" for="oi-alcance">"Alcance Q3/Q1"</label>
                        <select
                            id="oi-alcance"
                            class="form-select"
                            disabled=locked
                            on:change=move |ev| {
                                if let Ok(alcance) = event_target_value(&ev).parse::<i64>() {
                                    form.update(|f| f.alcance = alcance);
                                }
                            }
                        >
                            {move || {
                                let selected = form.with(|f| f.alcance);
                                catalogs
                                    .with(|c| c.alcance.clone())
                                    .into_iter()
                                    .map(|a| view! {
                                        <option value=a.to_string() selected={a == selected}>{a.to_string()}</option>
                                    })
                                    .collect_view()
                            }}
                        </select>
                    </div>
                    <div class="col-md-2">
                        <label class="form-label" for="oi-pma">"PMA"</label>
                        <select
                            id="oi-pma"
                            class="form-select"
                            disabled=locked
                            on:change=move |ev| {
                                if let Ok(pma) = event_target_value(&ev).parse::<i64>() {
                                    form.update(|f| f.pma = pma);
                                }
                            }
                        >
                            {move || {
                                let selected = form.with(|f| f.pma);
                                catalogs
                                    .with(pma_options)
                                    .into_iter()
                                    .map(|p| view! {
                                        <option value=p.to_string() selected={p == selected}>{p.to_string()}</option>
                                    })
                                    .collect_view()
                            }}
                        </select>
                    </div>
                    <div class="col-md-2">
                        <label class="form-label" for="oi-presion">"Presión (bar)"</label>
                        <input
                            id="oi-presion"
                            class="form-control"
                            readonly=true
                            prop:value=move || {
                                form.with(|f| f.pressure().map(|p| format!("{:.1}", p)).unwrap_or_default())
                            }
                        />
                    </div>
                </div>
                <Show when=move || !locked()>
                    <button class="btn btn-primary mt-3" on:click=on_save>"Guardar OI"</button>
                </Show>
            </div>
        </div>

        <div class="card">
            <div class="card-header d-flex justify-content-between align-items-center">
                <strong>"Bancadas"</strong>
                <div class="d-flex gap-2">
                    <button class="btn btn-success btn-sm" on:click=on_add>"Agregar bancada"</button>
                    <button class="btn btn-outline-primary btn-sm" on:click=on_excel_click>"Generar Excel"</button>
                </div>
            </div>
            <div class="card-body p-0">
                <table class="table table-sm table-hover mb-0">
                    <thead>
                        <tr>
                            <th>"Item"</th>
                            <th>"# Medidor"</th>
                            <th>"Estado"</th>
                            <th>"Filas"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || bancadas.with(|list| list.iter().map(|b| b.id).collect::<Vec<_>>())
                            key=|id| *id
                            children=move |id| {
                                let cells = Memo::new(move |_| {
                                    bancadas
                                        .with(|list| list.iter().find(|b| b.id == id).map(BenchCells::of))
                                        .unwrap_or_default()
                                });
                                let latest = move || bancadas.with_untracked(|list| find_bench(list, id));
                                view! {
                                    <tr>
                                        <td>{move || cells.get().item}</td>
                                        <td>{move || cells.get().meters}</td>
                                        <td>
                                            <span class=move || format!("badge {}", cells.get().badge)>
                                                {move || cells.get().estado}
                                            </span>
                                        </td>
                                        <td>{move || cells.get().rows}</td>
                                        <td class="text-end">
                                            <button
                                                class="btn btn-outline-primary btn-sm me-1"
                                                on:click=move |_| {
                                                    if let Some(bench) = latest() {
                                                        modal.set(Some(Modal::Bancada(Some(bench))));
                                                    }
                                                }
                                            >
                                                "Editar"
                                            </button>
                                            <button
                                                class="btn btn-outline-danger btn-sm"
                                                on:click=move |_| {
                                                    if let Some(bench) = latest() {
                                                        on_delete(bench);
                                                    }
                                                }
                                            >
                                                "Eliminar"
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
                <Show when=move || bancadas.with(|b| b.is_empty())>
                    <p class="text-muted p-3 mb-0">"Sin bancadas"</p>
                </Show>
            </div>
        </div>

        {move || match modal.get() {
            Some(Modal::Bancada(initial)) => match current.get_untracked() {
                Some(oi) => view! {
                    <BancadaModal
                        oi_id=oi.id
                        initial=initial
                        on_close=close_modal
                        on_saved=on_saved
                    />
                }
                .into_any(),
                None => ().into_any(),
            },
            Some(Modal::Password) => view! {
                <PasswordModal on_confirm=on_excel on_cancel=close_modal />
            }
            .into_any(),
            None => ().into_any(),
        }}
    }
}
