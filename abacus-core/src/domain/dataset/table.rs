// abacus-core/src/domain/dataset/table.rs

use serde::Serialize;
use std::collections::HashSet;

use crate::domain::dataset::rules::DatasetRules;
use crate::domain::error::DomainError;

/// A single value of the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Null or blank text. This is what "missing" means for required fields.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Textual form used by format checks and categorical encoding.
    pub fn render(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(v) => v.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Numeric,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            kind,
            cells,
        }
    }

    /// Text column, `None` becomes a null cell.
    pub fn text<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let cells = values
            .into_iter()
            .map(|v| v.map_or(Cell::Null, |s| Cell::Text(s.into())))
            .collect();
        Self::new(name, ColumnKind::Text, cells)
    }

    /// Numeric column, `None` becomes a null cell.
    pub fn numeric<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let cells = values
            .into_iter()
            .map(|v| v.map_or(Cell::Null, Cell::Number))
            .collect();
        Self::new(name, ColumnKind::Numeric, cells)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }
}

/// Untyped table as produced by an ingestion engine: a header and rows of
/// optional strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Column-major in-memory table. Row order is the ingest order and never
/// changes; rows are never removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Result<Self, DomainError> {
        let rows = columns.first().map(Column::len).unwrap_or(0);

        let mut names = HashSet::new();
        for column in &columns {
            if column.len() != rows {
                return Err(DomainError::InvalidInput(format!(
                    "column '{}' has {} cells, expected {}",
                    column.name(),
                    column.len(),
                    rows
                )));
            }
            if !names.insert(column.name()) {
                return Err(DomainError::InvalidInput(format!(
                    "duplicate column name '{}'",
                    column.name()
                )));
            }
        }

        Ok(Self { columns, rows })
    }

    /// Types a raw table. Key and formatted columns stay text, amount columns
    /// are numeric (unparseable cells are kept as raw text for the validator),
    /// other columns are numeric only if every non-null value is a finite
    /// decimal. Blank strings become nulls.
    pub fn from_raw(raw: RawTable, rules: &DatasetRules) -> Result<Self, DomainError> {
        let width = raw.columns.len();
        let mut values: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(raw.rows.len()); width];

        for (index, row) in raw.rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(DomainError::InvalidInput(format!(
                    "row {} has {} values, header has {}",
                    index + 1,
                    row.len(),
                    width
                )));
            }
            for (slot, value) in values.iter_mut().zip(row) {
                slot.push(value.filter(|v| !v.trim().is_empty()));
            }
        }

        let columns = raw
            .columns
            .into_iter()
            .zip(values)
            .map(|(name, cells)| {
                let numeric = if rules.is_text_column(&name) {
                    false
                } else if rules.is_amount_column(&name) {
                    true
                } else {
                    cells.iter().flatten().all(|v| parse_decimal(v).is_some())
                };
                type_column(name, cells, numeric)
            })
            .collect();

        Self::new(columns)
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Drops the named columns (missing names are ignored).
    pub fn without_columns(mut self, names: &[&str]) -> Self {
        self.columns.retain(|c| !names.contains(&c.name()));
        self
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }
}

fn type_column(name: String, cells: Vec<Option<String>>, numeric: bool) -> Column {
    if !numeric {
        return Column::text(name, cells);
    }
    let cells = cells
        .into_iter()
        .map(|value| match value {
            None => Cell::Null,
            Some(raw) => parse_decimal(&raw).map_or(Cell::Text(raw), Cell::Number),
        })
        .collect();
    Column::new(name, ColumnKind::Numeric, cells)
}

/// Finite decimals only: "NaN" and "inf" parse as f64 but are not amounts.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
