use super::Context;
use crate::cli::BancadaInput;
use crate::error::{Result, ViError};
use crate::output::{render_table, with_spinner};
use dialoguer::{Confirm, Input};
use vi_common::metrics::format_metric;
use vi_common::rules::{estado_label, VERDICT_PLACEHOLDER};
use vi_common::{BancadaDraft, BancadaRead, BlockField, Cell, FlowClass, RowMetrics};

pub async fn add(ctx: &Context, input: BancadaInput) -> Result<()> {
    ctx.require_auth()?;
    let current = ctx.require_current_oi()?;

    let draft = build_draft(BancadaDraft::default(), &input)?;
    let payload = draft.to_payload()?;
    tracing::debug!("Nueva bancada con {} filas en OI #{}", payload.rows, current.id);

    let created = with_spinner(
        "Guardando bancada...",
        ctx.client.add_bancada(current.id, &payload),
    )
    .await?;
    println!(
        "✔ Bancada #{} agregada a {} (id {}, {})",
        created.item,
        current.code,
        created.id,
        draft.meter_range()
    );
    Ok(())
}

/// Reemplazo completo: la grilla guardada más los cambios pedidos
pub async fn edit(ctx: &Context, id: i64, input: BancadaInput) -> Result<()> {
    let bench = find_bancada(ctx, id).await?;
    let draft = build_draft(BancadaDraft::from_read(&bench), &input)?;
    let payload = draft.to_payload()?;

    let updated = with_spinner(
        "Guardando bancada...",
        ctx.client.update_bancada(id, &payload),
    )
    .await?;
    println!(
        "✔ Bancada #{} actualizada ({} filas, {})",
        updated.item,
        payload.rows,
        estado_label(updated.estado)
    );
    Ok(())
}

pub async fn delete(ctx: &Context, id: i64, yes: bool) -> Result<()> {
    let bench = find_bancada(ctx, id).await?;
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("¿Eliminar bancada #{}?", bench.item))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelado");
            return Ok(());
        }
    }

    with_spinner("Eliminando bancada...", ctx.client.delete_bancada(id)).await?;
    println!("✔ Bancada #{} eliminada", bench.item);
    Ok(())
}

pub async fn preview(ctx: &Context, id: i64, class: Option<FlowClass>) -> Result<()> {
    let bench = find_bancada(ctx, id).await?;
    let draft = BancadaDraft::from_read(&bench);
    println!(
        "Bancada #{} · {} · {} filas",
        bench.item,
        estado_label(draft.estado),
        draft.row_count()
    );
    println!();
    match class {
        Some(class) => println!("{}", render_block(&draft, class)),
        None => println!("{}", render_preview(&draft)),
    }
    Ok(())
}

/// Aplica archivo, filas, estado, medidor, modo interactivo y `--set` en ese orden
fn build_draft(mut draft: BancadaDraft, input: &BancadaInput) -> Result<BancadaDraft> {
    if let Some(path) = &input.file {
        if !path.exists() {
            return Err(ViError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        draft = BancadaDraft::from_json(&content)?;
    }
    if let Some(rows) = input.rows {
        draft.resize(rows)?;
    }
    if let Some(estado) = input.estado {
        draft.set_estado(estado)?;
    }
    if let Some(medidor) = &input.medidor {
        draft.set_cell(0, Cell::Medidor, medidor)?;
    }
    if input.interactive {
        prompt_base_row(&mut draft)?;
    }
    for edit in &input.set {
        draft.apply(edit)?;
    }
    Ok(draft)
}

/// Pide la fila base celda por celda; Enter conserva el valor
fn prompt_base_row(draft: &mut BancadaDraft) -> Result<()> {
    let medidor: String = Input::new()
        .with_prompt("# Medidor")
        .with_initial_text(draft.base().medidor.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;
    draft.set_cell(0, Cell::Medidor, &medidor)?;

    for class in FlowClass::ALL {
        for field in BlockField::ALL {
            let current = draft
                .base()
                .value(class, field)
                .map(|v| v.to_string())
                .unwrap_or_default();
            let value: String = Input::new()
                .with_prompt(format!("{} {}", class.as_str(), field.label()))
                .with_initial_text(current)
                .allow_empty(true)
                .interact_text()?;
            draft.set_cell(0, Cell::Value(class, field), &value)?;
        }
    }
    Ok(())
}

/// Busca la bancada en la OI activa
async fn find_bancada(ctx: &Context, id: i64) -> Result<BancadaRead> {
    ctx.require_auth()?;
    let current = ctx.require_current_oi()?;
    let full = with_spinner("Cargando OI...", ctx.client.get_oi_full(current.id)).await?;
    full.bancadas
        .into_iter()
        .find(|b| b.id == id)
        .ok_or_else(|| {
            vi_common::Error::Validation(format!(
                "Bancada {} no encontrada en la OI {}",
                id, current.code
            ))
            .into()
        })
}

/// Fila, medidor, caudal y error de cada bloque, veredicto
pub fn render_preview(draft: &BancadaDraft) -> String {
    let mut headers = vec!["Fila", "# Medidor"];
    for class in FlowClass::ALL {
        headers.push(match class {
            FlowClass::Q3 => "Q3 Caudal",
            FlowClass::Q2 => "Q2 Caudal",
            FlowClass::Q1 => "Q1 Caudal",
        });
        headers.push(match class {
            FlowClass::Q3 => "Q3 Error%",
            FlowClass::Q2 => "Q2 Error%",
            FlowClass::Q1 => "Q1 Error%",
        });
    }
    headers.push("Veredicto");

    let rows: Vec<Vec<String>> = draft
        .rows
        .iter()
        .zip(draft.metrics())
        .enumerate()
        .map(|(index, (row, metrics))| {
            let mut cells = vec![
                (index + 1).to_string(),
                row.meter_id().unwrap_or("—").to_string(),
            ];
            for class in FlowClass::ALL {
                let block = metrics.get(class);
                cells.push(format_metric(block.flow, 3));
                cells.push(format_metric(block.error, 2));
            }
            cells.push(VERDICT_PLACEHOLDER.to_string());
            cells
        })
        .collect();

    render_table(&headers, &rows)
}

/// Las 7 columnas de un bloque con sus derivados
pub fn render_block(draft: &BancadaDraft, class: FlowClass) -> String {
    let columns = class.columns();
    let labels: Vec<String> = BlockField::ALL
        .iter()
        .map(|f| format!("{} ({})", f.label(), columns[f.index()]))
        .collect();
    let mut headers = vec!["Fila"];
    headers.extend(labels.iter().map(String::as_str));
    headers.extend(["Horas", "Caudal", "Error%"]);

    let rows: Vec<Vec<String>> = draft
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let metrics = RowMetrics::from_row(row);
            let block = metrics.get(class);
            let mut cells = vec![(index + 1).to_string()];
            for field in BlockField::ALL {
                cells.push(
                    row.value(class, field)
                        .map(|v| v.to_string())
                        .unwrap_or_default(),
                );
            }
            cells.push(format_metric(block.hours, 4));
            cells.push(format_metric(block.flow, 3));
            cells.push(format_metric(block.error, 2));
            cells
        })
        .collect();

    render_table(&headers, &rows)
}
