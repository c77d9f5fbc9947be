//! Editor de bancadas (mini-planilla)
//!
//! La primera fila es la fila base. Al editarla se replica a las demás filas:
//! - todas las columnas numéricas se copian tal cual, salvo L.I. / L.F. (c4, c5)
//! - el medidor se recalcula incrementando el sufijo numérico del medidor base

use crate::error::{Error, Result};
use crate::metrics::RowMetrics;
use crate::rules::{validate_row_count, BenchStatus, DEFAULT_ROWS};
use crate::types::{BancadaCreate, BancadaRead, BancadaRow, BlockField, FlowClass};

/// Incrementa el sufijo numérico de `base` en `offset`, conservando el ancho
///
/// `("MED0099", 2)` ⇒ `"MED0101"`. Sin sufijo numérico devuelve `None`.
pub fn increment_meter_id(base: &str, offset: u64) -> Option<String> {
    let base = base.trim();
    let digits_start = base
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    let (prefix, digits) = base.split_at(digits_start);
    let number: u128 = digits.parse().ok()?;
    let next = number.checked_add(u128::from(offset))?;
    Some(format!("{}{:0width$}", prefix, next, width = digits.len()))
}

/// Texto de la columna medidor: "primero ... último" si difieren
pub fn meter_range_label(rows: &[BancadaRow], fallback: Option<&str>) -> String {
    let first = rows
        .first()
        .and_then(|r| r.meter_id())
        .or_else(|| fallback.map(str::trim).filter(|m| !m.is_empty()))
        .unwrap_or("");
    let last = rows.last().and_then(|r| r.meter_id()).unwrap_or("");
    if !first.is_empty() && !last.is_empty() && first != last {
        format!("{} ... {}", first, last)
    } else {
        first.to_string()
    }
}

/// Celda editable de una fila
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Medidor,
    Value(FlowClass, BlockField),
}

impl std::str::FromStr for Cell {
    type Err = String;

    /// `medidor`, `q3.c4`, `q2.vol`, ...
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("medidor") {
            return Ok(Cell::Medidor);
        }
        let (class, field) = s
            .split_once('.')
            .ok_or_else(|| format!("Celda inválida: {} (use medidor o q3.c1)", s))?;
        Ok(Cell::Value(class.parse()?, field.parse()?))
    }
}

/// Edición puntual `FILA:CELDA=VALOR` (fila desde 1; valor vacío borra)
#[derive(Debug, Clone, PartialEq)]
pub struct CellEdit {
    pub row: usize,
    pub cell: Cell,
    pub value: String,
}

impl std::str::FromStr for CellEdit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (target, value) = s
            .split_once('=')
            .ok_or_else(|| format!("Edición inválida: {} (use FILA:CELDA=VALOR)", s))?;
        let (row, cell) = target
            .split_once(':')
            .ok_or_else(|| format!("Edición inválida: {} (use FILA:CELDA=VALOR)", s))?;
        let row: usize = row
            .trim()
            .parse()
            .map_err(|_| format!("Fila inválida: {}", row))?;
        if row == 0 {
            return Err("Las filas se numeran desde 1".to_string());
        }
        Ok(CellEdit {
            row,
            cell: cell.parse()?,
            value: value.trim().to_string(),
        })
    }
}

/// Parsea un número de celda; acepta coma decimal y vacío = sin valor
pub fn parse_cell_number(value: &str) -> Result<Option<f64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| Error::Validation(format!("Número inválido: {}", value)))
}

/// Estado del formulario de una bancada
#[derive(Debug, Clone, PartialEq)]
pub struct BancadaDraft {
    pub estado: u8,
    pub rows: Vec<BancadaRow>,
}

impl Default for BancadaDraft {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS)
    }
}

impl BancadaDraft {
    /// Bancada nueva con `row_count` filas vacías (mínimo 1)
    pub fn new(row_count: u32) -> Self {
        Self {
            estado: BenchStatus::Conforme.code(),
            rows: vec![BancadaRow::default(); row_count.max(1) as usize],
        }
    }

    /// Carga una bancada existente.
    ///
    /// Las bancadas antiguas sin `rows_data` se reconstruyen con los
    /// bloques de cabecera en la fila base y filas vacías detrás.
    pub fn from_read(read: &BancadaRead) -> Self {
        let rows = match &read.rows_data {
            Some(rows) if !rows.is_empty() => rows.clone(),
            _ => {
                let count = read.rows.max(1) as usize;
                let mut rows = vec![BancadaRow::default(); count];
                rows[0] = BancadaRow {
                    medidor: read.medidor.clone(),
                    q3: read.q3.clone(),
                    q2: read.q2.clone(),
                    q1: read.q1.clone(),
                };
                rows
            }
        };
        Self {
            estado: read.estado,
            rows,
        }
    }

    /// Carga desde JSON: lista de filas o `{estado?, rows_data}`
    pub fn from_json(json: &str) -> Result<Self> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Input {
            Rows(Vec<BancadaRow>),
            Bench {
                #[serde(default)]
                estado: u8,
                #[serde(alias = "rowsData")]
                rows_data: Vec<BancadaRow>,
            },
        }

        let (estado, rows) = match serde_json::from_str::<Input>(json)? {
            Input::Rows(rows) => (BenchStatus::Conforme.code(), rows),
            Input::Bench { estado, rows_data } => (estado, rows_data),
        };
        if rows.is_empty() {
            return Err(Error::InvalidRowCount(0));
        }
        let mut draft = Self { estado: 0, rows };
        draft.set_estado(i64::from(estado))?;
        Ok(draft)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn base(&self) -> &BancadaRow {
        &self.rows[0]
    }

    pub fn set_estado(&mut self, estado: i64) -> Result<()> {
        self.estado = BenchStatus::try_from(estado)?.code();
        Ok(())
    }

    /// Cambia la cantidad de filas; las nuevas se rellenan desde la base
    pub fn resize(&mut self, row_count: i64) -> Result<()> {
        let target = validate_row_count(row_count)? as usize;
        let previous = self.rows.len();
        self.rows.resize(target, BancadaRow::default());
        for index in previous..target {
            self.replicate_into(index);
        }
        Ok(())
    }

    /// Escribe una celda; si es la fila base se replica
    pub fn set_cell(&mut self, row: usize, cell: Cell, value: &str) -> Result<()> {
        if row >= self.rows.len() {
            return Err(Error::Validation(format!(
                "Fila {} fuera de rango (1-{})",
                row + 1,
                self.rows.len()
            )));
        }
        match cell {
            Cell::Medidor => {
                let value = value.trim();
                self.rows[row].medidor = (!value.is_empty()).then(|| value.to_string());
            }
            Cell::Value(class, field) => {
                let number = parse_cell_number(value)?;
                self.rows[row].set_value(class, field, number);
            }
        }
        if row == 0 {
            self.replicate_base();
        }
        Ok(())
    }

    /// Celdas escribibles a mano: toda la fila base; en las demás solo
    /// L.I. / L.F., y el medidor cuando la base no tiene sufijo numérico
    pub fn is_editable(&self, row: usize, cell: Cell) -> bool {
        if row >= self.rows.len() {
            return false;
        }
        if row == 0 {
            return true;
        }
        match cell {
            Cell::Value(_, field) => field.is_limit(),
            Cell::Medidor => self
                .base()
                .meter_id()
                .and_then(|m| increment_meter_id(m, 1))
                .is_none(),
        }
    }

    /// Aplica una edición `FILA:CELDA=VALOR`
    pub fn apply(&mut self, edit: &CellEdit) -> Result<()> {
        let row = edit.row - 1;
        if row < self.rows.len() && !self.is_editable(row, edit.cell) {
            return Err(Error::Validation(format!(
                "La fila {} copia la fila base: solo L.I. y L.F. son editables",
                edit.row
            )));
        }
        self.set_cell(row, edit.cell, &edit.value)
    }

    /// Propaga la fila base a todas las filas hermanas
    pub fn replicate_base(&mut self) {
        for index in 1..self.rows.len() {
            self.replicate_into(index);
        }
    }

    fn replicate_into(&mut self, index: usize) {
        if index == 0 || index >= self.rows.len() {
            return;
        }
        let base = self.rows[0].clone();
        let target = &mut self.rows[index];

        if let Some(meter) = base
            .meter_id()
            .and_then(|m| increment_meter_id(m, index as u64))
        {
            target.medidor = Some(meter);
        }

        for class in FlowClass::ALL {
            for field in BlockField::ALL {
                if field.is_limit() {
                    continue;
                }
                let value = base.value(class, field);
                if value.is_none() && target.block(class).is_none() {
                    continue;
                }
                target.set_value(class, field, value);
            }
        }
    }

    /// Derivados de cada fila para la vista previa
    pub fn metrics(&self) -> Vec<RowMetrics> {
        self.rows.iter().map(RowMetrics::from_row).collect()
    }

    pub fn meter_range(&self) -> String {
        meter_range_label(&self.rows, None)
    }

    /// Payload de reemplazo completo
    pub fn to_payload(&self) -> Result<BancadaCreate> {
        BenchStatus::try_from(i64::from(self.estado))?;
        let rows = validate_row_count(self.rows.len() as i64)?;
        Ok(BancadaCreate {
            medidor: self.base().meter_id().map(str::to_string),
            estado: self.estado,
            rows,
            rows_data: self.rows.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QBlock;

    fn base_draft(rows: u32) -> BancadaDraft {
        let mut draft = BancadaDraft::new(rows);
        draft.set_cell(0, Cell::Medidor, "MED0098").unwrap();
        draft
            .set_cell(0, Cell::Value(FlowClass::Q3, BlockField::Temperatura), "21.5")
            .unwrap();
        draft
            .set_cell(0, Cell::Value(FlowClass::Q3, BlockField::Volumen), "100")
            .unwrap();
        draft
    }

    #[test]
    fn test_increment_meter_id_pads_to_width() {
        assert_eq!(increment_meter_id("MED0099", 1).as_deref(), Some("MED0100"));
        assert_eq!(increment_meter_id("A001", 9).as_deref(), Some("A010"));
        assert_eq!(increment_meter_id("000", 5).as_deref(), Some("005"));
        assert_eq!(increment_meter_id("2024-07", 3).as_deref(), Some("2024-10"));
    }

    #[test]
    fn test_increment_meter_id_overflow_widens() {
        assert_eq!(increment_meter_id("M99", 1).as_deref(), Some("M100"));
    }

    #[test]
    fn test_increment_meter_id_without_suffix() {
        assert_eq!(increment_meter_id("MEDIDOR", 1), None);
        assert_eq!(increment_meter_id("", 1), None);
        assert_eq!(increment_meter_id("12A", 1), None);
    }

    #[test]
    fn test_new_draft_has_default_rows() {
        let draft = BancadaDraft::default();
        assert_eq!(draft.row_count(), 15);
        assert_eq!(draft.estado, 0);
        assert_eq!(BancadaDraft::new(0).row_count(), 1);
    }

    #[test]
    fn test_base_edit_replicates_meter_and_values() {
        let draft = base_draft(3);
        assert_eq!(draft.rows[1].medidor.as_deref(), Some("MED0099"));
        assert_eq!(draft.rows[2].medidor.as_deref(), Some("MED0100"));
        for row in &draft.rows {
            assert_eq!(row.value(FlowClass::Q3, BlockField::Temperatura), Some(21.5));
            assert_eq!(row.value(FlowClass::Q3, BlockField::Volumen), Some(100.0));
        }
    }

    #[test]
    fn test_limits_stay_independent() {
        let mut draft = base_draft(3);
        let li = Cell::Value(FlowClass::Q3, BlockField::LimiteInferior);
        let lf = Cell::Value(FlowClass::Q3, BlockField::LimiteFinal);
        draft.set_cell(1, li, "10").unwrap();
        draft.set_cell(1, lf, "110.2").unwrap();
        draft.set_cell(0, li, "0").unwrap();
        draft.set_cell(0, lf, "100.4").unwrap();

        assert_eq!(draft.rows[1].value(FlowClass::Q3, BlockField::LimiteInferior), Some(10.0));
        assert_eq!(draft.rows[1].value(FlowClass::Q3, BlockField::LimiteFinal), Some(110.2));
        assert_eq!(draft.rows[2].value(FlowClass::Q3, BlockField::LimiteInferior), None);
    }

    #[test]
    fn test_base_edit_overwrites_sibling_values() {
        let mut draft = base_draft(2);
        let temp = Cell::Value(FlowClass::Q3, BlockField::Temperatura);
        draft.set_cell(1, temp, "30").unwrap();
        assert_eq!(draft.rows[1].value(FlowClass::Q3, BlockField::Temperatura), Some(30.0));

        draft.set_cell(0, Cell::Value(FlowClass::Q1, BlockField::Tiempo), "1.30").unwrap();
        assert_eq!(draft.rows[1].value(FlowClass::Q3, BlockField::Temperatura), Some(21.5));
        assert_eq!(draft.rows[1].value(FlowClass::Q1, BlockField::Tiempo), Some(1.30));
    }

    #[test]
    fn test_base_without_numeric_suffix_keeps_sibling_meters() {
        let mut draft = BancadaDraft::new(2);
        draft.set_cell(1, Cell::Medidor, "X-7").unwrap();
        draft.set_cell(0, Cell::Medidor, "SIN-NUMERO").unwrap();
        assert_eq!(draft.rows[1].medidor.as_deref(), Some("X-7"));
    }

    #[test]
    fn test_sibling_rows_only_accept_limits() {
        let draft = base_draft(3);
        let vol = Cell::Value(FlowClass::Q2, BlockField::Volumen);
        let lf = Cell::Value(FlowClass::Q2, BlockField::LimiteFinal);
        assert!(draft.is_editable(0, vol));
        assert!(draft.is_editable(0, Cell::Medidor));
        assert!(!draft.is_editable(2, vol));
        assert!(draft.is_editable(2, lf));
        // el medidor de la base termina en dígitos: se numera solo
        assert!(!draft.is_editable(1, Cell::Medidor));
        assert!(!draft.is_editable(3, lf));

        let mut plain = BancadaDraft::new(2);
        plain.set_cell(0, Cell::Medidor, "SIN-NUMERO").unwrap();
        assert!(plain.is_editable(1, Cell::Medidor));
    }

    #[test]
    fn test_apply_rejects_replicated_sibling_cells() {
        let mut draft = base_draft(3);
        let err = draft.apply(&"2:q1.vol=5".parse().unwrap()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(draft.rows[1].value(FlowClass::Q1, BlockField::Volumen), None);

        draft.apply(&"2:q1.li=5".parse().unwrap()).unwrap();
        assert_eq!(draft.rows[1].value(FlowClass::Q1, BlockField::LimiteInferior), Some(5.0));
        assert!(draft.apply(&"9:q1.li=5".parse().unwrap()).is_err());
    }

    #[test]
    fn test_resize_fills_new_rows_from_base() {
        let mut draft = base_draft(2);
        draft.resize(4).unwrap();
        assert_eq!(draft.row_count(), 4);
        assert_eq!(draft.rows[3].medidor.as_deref(), Some("MED0101"));
        assert_eq!(draft.rows[3].value(FlowClass::Q3, BlockField::Volumen), Some(100.0));

        draft.resize(1).unwrap();
        assert_eq!(draft.row_count(), 1);
        assert!(draft.resize(0).is_err());
    }

    #[test]
    fn test_set_cell_out_of_range() {
        let mut draft = BancadaDraft::new(2);
        assert!(draft.set_cell(5, Cell::Medidor, "A1").is_err());
        assert!(draft
            .set_cell(0, Cell::Value(FlowClass::Q3, BlockField::Volumen), "abc")
            .is_err());
    }

    #[test]
    fn test_from_read_legacy_bench() {
        let read = BancadaRead {
            id: 1,
            item: 1,
            medidor: Some("M1".into()),
            estado: 2,
            rows: 3,
            rows_data: None,
            q3: Some(QBlock { c1: Some(20.0), ..Default::default() }),
            q2: None,
            q1: None,
        };
        let draft = BancadaDraft::from_read(&read);
        assert_eq!(draft.row_count(), 3);
        assert_eq!(draft.estado, 2);
        assert_eq!(draft.rows[0].medidor.as_deref(), Some("M1"));
        assert_eq!(draft.rows[0].value(FlowClass::Q3, BlockField::Temperatura), Some(20.0));
        assert_eq!(draft.rows[1], BancadaRow::default());
    }

    #[test]
    fn test_to_payload() {
        let draft = base_draft(3);
        let payload = draft.to_payload().unwrap();
        assert_eq!(payload.rows, 3);
        assert_eq!(payload.rows_data.len(), 3);
        assert_eq!(payload.medidor.as_deref(), Some("MED0098"));

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("rows_data").is_some());
    }

    #[test]
    fn test_meter_range() {
        let draft = base_draft(3);
        assert_eq!(draft.meter_range(), "MED0098 ... MED0100");
        let single = base_draft(1);
        assert_eq!(single.meter_range(), "MED0098");
        assert_eq!(meter_range_label(&[], Some("LEG1")), "LEG1");
    }

    #[test]
    fn test_cell_edit_parse() {
        let edit: CellEdit = "2:q3.li=12,5".parse().unwrap();
        assert_eq!(edit.row, 2);
        assert_eq!(edit.cell, Cell::Value(FlowClass::Q3, BlockField::LimiteInferior));
        assert_eq!(parse_cell_number(&edit.value).unwrap(), Some(12.5));

        let meter: CellEdit = "1:medidor=A001".parse().unwrap();
        assert_eq!(meter.cell, Cell::Medidor);

        assert!("0:medidor=A".parse::<CellEdit>().is_err());
        assert!("1:q4.c1=2".parse::<CellEdit>().is_err());
        assert!("1-medidor".parse::<CellEdit>().is_err());
    }

    #[test]
    fn test_from_json_shapes() {
        let rows = BancadaDraft::from_json(r#"[{"medidor":"A1"},{"medidor":"A2"}]"#).unwrap();
        assert_eq!(rows.row_count(), 2);
        assert_eq!(rows.estado, 0);

        let bench =
            BancadaDraft::from_json(r#"{"estado":3,"rows_data":[{"medidor":"B1"}]}"#).unwrap();
        assert_eq!(bench.estado, 3);

        assert!(BancadaDraft::from_json("[]").is_err());
        assert!(BancadaDraft::from_json(r#"{"estado":9,"rows_data":[{}]}"#).is_err());
    }
}
