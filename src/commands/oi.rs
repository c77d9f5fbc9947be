use super::Context;
use crate::error::{Result, ViError};
use crate::output::{render_table, with_spinner};
use chrono::Datelike;
use vi_common::rules::estado_label;
use vi_common::{CurrentOi, OiForm, OiRead, OiWithBancadas};

/// Valores opcionales de `vi oi new`
#[derive(Debug, Default)]
pub struct NewOiArgs {
    pub code: Option<String>,
    pub q3: Option<f64>,
    pub alcance: Option<i64>,
    pub pma: Option<i64>,
}

/// Crea la OI y la deja activa; no se permite con otra OI abierta
pub async fn create(ctx: &Context, args: NewOiArgs) -> Result<()> {
    let auth = ctx.require_auth()?;
    if let Some(current) = ctx.session.load_current_oi() {
        return Err(vi_common::Error::Validation(format!(
            "Ya hay una OI activa ({}). Ciérrela con `vi oi close`",
            current.code
        ))
        .into());
    }

    let catalogs = match with_spinner("Cargando catálogos...", ctx.client.catalogs()).await {
        Ok(c) => Some(c),
        Err(e) => {
            tracing::warn!("Catálogos no disponibles, se usan valores por defecto: {}", e);
            None
        }
    };

    let mut form = OiForm::with_defaults(chrono::Local::now().year(), catalogs.as_ref());
    if let Some(code) = args.code {
        form.code = code;
    }
    if let Some(q3) = args.q3 {
        form.q3 = q3;
    }
    if let Some(alcance) = args.alcance {
        form.alcance = alcance;
    }
    if let Some(pma) = args.pma {
        form.pma = pma;
    }

    let payload = form.to_create(&auth)?;
    tracing::debug!("Creando OI {}", payload.code);
    let created = with_spinner("Guardando OI...", ctx.client.create_oi(&payload)).await?;

    ctx.session.save_current_oi(&CurrentOi {
        id: created.id,
        code: created.code.clone(),
    })?;
    println!("✔ OI creada: {} (#{})", created.code, created.id);
    print_header(&created);
    Ok(())
}

pub async fn list(ctx: &Context) -> Result<()> {
    ctx.require_auth()?;
    let list = with_spinner("Cargando OIs...", ctx.client.list_oi()).await?;
    if list.is_empty() {
        println!("No hay OIs registradas");
        return Ok(());
    }

    let active = ctx.session.load_current_oi().map(|c| c.id);
    let rows: Vec<Vec<String>> = list
        .iter()
        .map(|oi| {
            vec![
                if Some(oi.id) == active { "*".into() } else { String::new() },
                oi.id.to_string(),
                oi.code.clone(),
                oi.q3.to_string(),
                oi.alcance.to_string(),
                oi.pma.to_string(),
                oi.banco_id.to_string(),
                oi.tech_number.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        render_table(
            &["", "Id", "Código", "Q3", "Alcance", "PMA", "Banco", "Técnico"],
            &rows
        )
    );
    Ok(())
}

/// Activa una OI existente
pub async fn open(ctx: &Context, id: i64) -> Result<()> {
    ctx.require_auth()?;
    let oi = with_spinner("Cargando OI...", ctx.client.get_oi(id)).await?;
    ctx.session.save_current_oi(&CurrentOi {
        id: oi.id,
        code: oi.code.clone(),
    })?;
    println!("✔ OI {} cargada", oi.code);
    Ok(())
}

/// Muestra cabecera y bancadas; si la OI activa ya no carga, se olvida
pub async fn show(ctx: &Context, id: Option<i64>) -> Result<()> {
    ctx.require_auth()?;
    let (id, from_pointer) = match id {
        Some(id) => (id, false),
        None => (ctx.require_current_oi()?.id, true),
    };

    let full = match with_spinner("Cargando OI...", ctx.client.get_oi_full(id)).await {
        Ok(full) => full,
        Err(e) => {
            if from_pointer {
                tracing::warn!("La OI activa #{} no se pudo cargar; se cierra", id);
                ctx.session.clear_current_oi();
            }
            return Err(e);
        }
    };

    print_header(&full.oi);
    println!();
    print_bancadas(&full);
    Ok(())
}

/// Solo borra el puntero local
pub fn close(ctx: &Context) -> Result<()> {
    match ctx.session.load_current_oi() {
        Some(current) => {
            ctx.session.clear_current_oi();
            println!("✔ OI {} cerrada", current.code);
            Ok(())
        }
        None => Err(ViError::NoActiveOi),
    }
}

fn print_header(oi: &OiRead) {
    println!("OI:       {} (#{})", oi.code, oi.id);
    println!("Q3:       {} m³/h", oi.q3);
    println!("Alcance:  {}", oi.alcance);
    println!("PMA:      {}", oi.pma);
    println!("Presión:  {:.1} bar", oi.presion_bar);
    println!("Banco:    {} · Técnico {}", oi.banco_id, oi.tech_number);
}

fn print_bancadas(full: &OiWithBancadas) {
    if full.bancadas.is_empty() {
        println!("Sin bancadas. Agregue una con `vi bancada add`");
        return;
    }
    let rows: Vec<Vec<String>> = full
        .bancadas
        .iter()
        .map(|b| {
            vec![
                b.item.to_string(),
                b.id.to_string(),
                vi_common::meter_range_label(
                    b.rows_data.as_deref().unwrap_or_default(),
                    b.medidor.as_deref(),
                ),
                estado_label(b.estado).to_string(),
                b.rows.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        render_table(&["Item", "Id", "# Medidor", "Estado", "Filas"], &rows)
    );
}
