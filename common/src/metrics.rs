//! Valores derivados para la vista previa (caudal y error %)
//!
//! Funciones puras; "sin valor" se modela como `None`.

use crate::types::{BancadaRow, BlockField, FlowClass, QBlock};

/// Tolerancia para truncar los dos decimales del tiempo
const SECONDS_EPSILON: f64 = 1e-9;

/// Decodifica `minutos.segundos` a segundos (1.30 ⇒ 90)
///
/// La parte entera son minutos y los dos primeros decimales son segundos;
/// los demás decimales se descartan.
pub fn decode_elapsed_seconds(value: Option<f64>) -> Option<f64> {
    let value = value.filter(|v| v.is_finite() && *v > 0.0)?;
    let minutes = value.trunc();
    let seconds = ((value - minutes) * 100.0 + SECONDS_EPSILON).floor();
    Some(minutes * 60.0 + seconds)
}

/// Tiempo transcurrido en horas: `(min*60 + seg) / 3600`
pub fn elapsed_hours(value: Option<f64>) -> Option<f64> {
    decode_elapsed_seconds(value).map(|s| s / 3600.0)
}

/// Caudal: `volumen / horas`; sin valor si algún operando es cero o falta
pub fn flow(volume: Option<f64>, hours: Option<f64>) -> Option<f64> {
    let volume = nonzero(volume)?;
    let hours = nonzero(hours)?;
    Some(volume / hours)
}

/// Error %: `((L.F. - L.I. - volumen) / volumen) * 100`
pub fn error_percent(lower: Option<f64>, upper: Option<f64>, volume: Option<f64>) -> Option<f64> {
    let volume = nonzero(volume)?;
    let lower = lower.filter(|v| v.is_finite())?;
    let upper = upper.filter(|v| v.is_finite())?;
    Some(((upper - lower - volume) / volume) * 100.0)
}

fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

/// Derivados de un bloque
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlockMetrics {
    pub hours: Option<f64>,
    pub flow: Option<f64>,
    pub error: Option<f64>,
}

impl BlockMetrics {
    pub fn from_block(block: &QBlock) -> Self {
        let hours = elapsed_hours(block.get(BlockField::Tiempo));
        let volume = block.get(BlockField::Volumen);
        Self {
            hours,
            flow: flow(volume, hours),
            error: error_percent(
                block.get(BlockField::LimiteInferior),
                block.get(BlockField::LimiteFinal),
                volume,
            ),
        }
    }
}

/// Derivados de una fila (Q3, Q2, Q1)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RowMetrics {
    pub q3: BlockMetrics,
    pub q2: BlockMetrics,
    pub q1: BlockMetrics,
}

impl RowMetrics {
    pub fn from_row(row: &BancadaRow) -> Self {
        let of = |class| {
            row.block(class)
                .map(BlockMetrics::from_block)
                .unwrap_or_default()
        };
        Self {
            q3: of(FlowClass::Q3),
            q2: of(FlowClass::Q2),
            q1: of(FlowClass::Q1),
        }
    }

    pub fn get(&self, class: FlowClass) -> &BlockMetrics {
        match class {
            FlowClass::Q3 => &self.q3,
            FlowClass::Q2 => &self.q2,
            FlowClass::Q1 => &self.q1,
        }
    }
}

/// Formato de celda para la vista previa; "—" sin valor
pub fn format_metric(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "—".to_string(),
    }
}
