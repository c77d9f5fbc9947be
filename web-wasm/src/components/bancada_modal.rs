//! Modal de bancada: mini-planilla con replicación desde la fila base

use crate::app::use_app;
use leptos::ev::{Event, MouseEvent};
use leptos::prelude::*;
use leptos::task::spawn_local;
use vi_common::metrics::format_metric;
use vi_common::rules::VERDICT_PLACEHOLDER;
use vi_common::{
    BancadaDraft, BancadaRead, BenchStatus, BlockField, Cell, FlowClass, RowMetrics,
};

/// Texto de una celda del borrador; vacío si no hay valor
pub fn cell_text(draft: &BancadaDraft, row: usize, cell: Cell) -> String {
    let Some(r) = draft.rows.get(row) else {
        return String::new();
    };
    match cell {
        Cell::Medidor => r.medidor.clone().unwrap_or_default(),
        Cell::Value(class, field) => r
            .value(class, field)
            .map(|v| v.to_string())
            .unwrap_or_default(),
    }
}

/// Caudal y error de Q3, Q2 y Q1 para la vista previa
pub fn preview_cells(metrics: &RowMetrics) -> Vec<String> {
    FlowClass::ALL
        .iter()
        .flat_map(|class| {
            let m = metrics.get(*class);
            [format_metric(m.flow, 3), format_metric(m.error, 2)]
        })
        .collect()
}

#[component]
fn CellInput(draft: RwSignal<BancadaDraft>, row: usize, cell: Cell) -> impl IntoView {
    let ctx = use_app();
    let base = row == 0;
    let class = match cell {
        Cell::Medidor => "form-control form-control-sm vi-meter",
        Cell::Value(..) => "form-control form-control-sm vi-num",
    };

    view! {
        <input
            class=class
            class:border-primary=base
            readonly=move || !draft.with(|d| d.is_editable(row, cell))
            class:bg-light=move || !draft.with(|d| d.is_editable(row, cell))
            prop:value=move || draft.with(|d| cell_text(d, row, cell))
            on:change=move |ev| {
                if !draft.with_untracked(|d| d.is_editable(row, cell)) {
                    return;
                }
                let value = event_target_value(&ev);
                let mut failed = None;
                draft.update(|d| {
                    if let Err(e) = d.set_cell(row, cell, &value) {
                        failed = Some(e.to_string());
                    }
                });
                if let Some(message) = failed {
                    ctx.error(message);
                }
            }
        />
    }
}

#[component]
pub fn BancadaModal<FC, FS>(
    oi_id: i64,
    /// Bancada a editar; `None` para una nueva
    initial: Option<BancadaRead>,
    on_close: FC,
    on_saved: FS,
) -> impl IntoView
where
    FC: Fn(()) + 'static + Clone + Send + Sync,
    FS: Fn(BancadaRead) + 'static + Clone + Send + Sync,
{
    let ctx = use_app();
    let editing = initial.as_ref().map(|b| (b.id, b.item));
    let draft = RwSignal::new(
        initial
            .as_ref()
            .map(BancadaDraft::from_read)
            .unwrap_or_default(),
    );
    let saving = RwSignal::new(false);

    let title = match editing {
        Some((_, item)) => format!("Editar bancada #{}", item),
        None => "Nueva bancada".to_string(),
    };

    let on_rows = move |ev: Event| {
        let result = event_target_value(&ev)
            .trim()
            .parse::<i64>()
            .map_err(|_| "Número de filas inválido".to_string())
            .and_then(|rows| {
                let mut next = draft.get_untracked();
                next.resize(rows).map_err(|e| e.to_string())?;
                Ok(next)
            });
        match result {
            Ok(next) => draft.set(next),
            Err(message) => {
                // Repinta el valor anterior
                draft.update(|_| {});
                ctx.error(message);
            }
        }
    };

    let on_save = {
        let on_saved = on_saved.clone();
        move |_: MouseEvent| {
            let payload = match draft.with_untracked(|d| d.to_payload()) {
                Ok(payload) => payload,
                Err(e) => {
                    ctx.error(e.to_string());
                    return;
                }
            };
            let on_saved = on_saved.clone();
            saving.set(true);
            spawn_local(async move {
                let api = ctx.api();
                let result = match editing {
                    Some((id, _)) => ctx.busy(api.update_bancada(id, &payload)).await,
                    None => ctx.busy(api.add_bancada(oi_id, &payload)).await,
                };
                saving.set(false);
                match result {
                    Ok(saved) => on_saved(saved),
                    Err(e) => ctx.error(e.message),
                }
            });
        }
    };

    let close_x = on_close.clone();
    let close_btn = on_close.clone();

    view! {
        <div class="modal d-block" tabindex="-1" role="dialog">
            <div class="modal-dialog modal-fullscreen-lg-down modal-xl modal-dialog-scrollable">
                <div class="modal-content">
                    <div class="modal-header">
                        <h5 class="modal-title">{title}</h5>
                        <button type="button" class="btn-close" on:click=move |_| close_x(())></button>
                    </div>
                    <div class="modal-body">
                        <div class="row g-3 mb-3">
                            <div class="col-md-3">
                                <label class="form-label" for="bench-estado">"Estado"</label>
                                <select
                                    id="bench-estado"
                                    class="form-select"
                                    on:change=move |ev| {
                                        if let Ok(code) = event_target_value(&ev).parse::<i64>() {
                                            draft.update(|d| {
                                                let _ = d.set_estado(code);
                                            });
                                        }
                                    }
                                >
                                    {BenchStatus::ALL
                                        .iter()
                                        .map(|s| {
                                            let code = s.code();
                                            view! {
                                                <option
                                                    value=code.to_string()
                                                    selected=move || draft.with(|d| d.estado == code)
                                                >
                                                    {s.option_label()}
                                                </option>
                                            }
                                        })
                                        .collect_view()}
                                </select>
                            </div>
                            <div class="col-md-2">
                                <label class="form-label" for="bench-rows">"Filas"</label>
                                <input
                                    id="bench-rows"
                                    type="number"
                                    min="1"
                                    class="form-control"
                                    prop:value=move || draft.with(|d| d.row_count().to_string())
                                    on:change=on_rows
                                />
                            </div>
                            <div class="col-md-7 d-flex align-items-end">
                                <span class="text-muted">
                                    "# Medidor: " {move || draft.with(|d| d.meter_range())}
                                </span>
                            </div>
                        </div>

                        <div class="table-responsive">
                            <table class="table table-sm table-bordered align-middle vi-grid">
                                <thead>
                                    <tr>
                                        <th rowspan="2">"#"</th>
                                        <th rowspan="2">"# Medidor"</th>
                                        {FlowClass::ALL
                                            .iter()
                                            .map(|c| view! { <th colspan="7" class="text-center">{c.as_str()}</th> })
                                            .collect_view()}
                                        <th colspan="6" class="text-center">"Caudal / Error %"</th>
                                        <th rowspan="2">"Veredicto"</th>
                                    </tr>
                                    <tr>
                                        {FlowClass::ALL
                                            .iter()
                                            .flat_map(|_| BlockField::ALL.iter())
                                            .map(|f| view! { <th>{f.label()}</th> })
                                            .collect_view()}
                                        {FlowClass::ALL
                                            .iter()
                                            .flat_map(|c| [format!("{} Q", c.as_str()), format!("{} E%", c.as_str())])
                                            .map(|h| view! { <th>{h}</th> })
                                            .collect_view()}
                                    </tr>
                                </thead>
                                <tbody>
                                    <For
                                        each=move || 0..draft.with(|d| d.row_count())
                                        key=|row| *row
                                        children=move |row| {
                                            let cells = FlowClass::ALL
                                                .iter()
                                                .flat_map(|class| {
                                                    BlockField::ALL.iter().map(move |field| Cell::Value(*class, *field))
                                                })
                                                .map(|cell| view! { <td><CellInput draft row cell /></td> })
                                                .collect_view();
                                            view! {
                                                <tr class:table-primary={row == 0}>
                                                    <td>{row + 1}</td>
                                                    <td><CellInput draft row cell=Cell::Medidor /></td>
                                                    {cells}
                                                    {move || {
                                                        draft
                                                            .with(|d| d.rows.get(row).map(RowMetrics::from_row))
                                                            .map(|m| preview_cells(&m))
                                                            .unwrap_or_default()
                                                            .into_iter()
                                                            .map(|v| view! { <td class="text-end">{v}</td> })
                                                            .collect_view()
                                                    }}
                                                    <td class="text-muted">{VERDICT_PLACEHOLDER}</td>
                                                </tr>
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                        </div>
                    </div>
                    <div class="modal-footer">
                        <button type="button" class="btn btn-secondary" on:click=move |_| close_btn(())>
                            "Cancelar"
                        </button>
                        <button
                            type="button"
                            class="btn btn-primary"
                            disabled=move || saving.get()
                            on:click=on_save
                        >
                            "Guardar bancada"
                        </button>
                    </div>
                </div>
            </div>
        </div>
        <div class="modal-backdrop show"></div>
    }
}
