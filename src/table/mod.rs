//! Columnar table shared by Series and DataFrame

use std::collections::HashMap;
use std::fmt;

use crate::column::{Column, DataType};
use crate::error::{Error, Result};
use crate::index::Index;

/// Column label, one string per column level
///
/// Flat tables use single-level labels. An empty label is used for unnamed
/// Series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnLabel(Vec<String>);

impl ColumnLabel {
    /// Single-level label
    pub fn new(name: impl Into<String>) -> Self {
        ColumnLabel(vec![name.into()])
    }

    /// Multi-level label
    pub fn from_levels<S: Into<String>>(levels: Vec<S>) -> Self {
        ColumnLabel(levels.into_iter().map(Into::into).collect())
    }

    /// Label of an unnamed Series
    pub fn unnamed() -> Self {
        ColumnLabel(Vec::new())
    }

    pub fn is_unnamed(&self) -> bool {
        self.0.is_empty()
    }

    pub fn n_levels(&self) -> usize {
        self.0.len()
    }

    pub fn levels(&self) -> &[String] {
        &self.0
    }

    /// Level `i` of the label
    pub fn level(&self, i: usize) -> Option<&str> {
        self.0.get(i).map(String::as_str)
    }

    /// The name of a single-level label
    pub fn as_flat(&self) -> Option<&str> {
        match self.0.as_slice() {
            [name] => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [name] => write!(f, "{}", name),
            levels => write!(f, "({})", levels.join(", ")),
        }
    }
}

impl From<&str> for ColumnLabel {
    fn from(name: &str) -> Self {
        ColumnLabel::new(name)
    }
}

impl From<String> for ColumnLabel {
    fn from(name: String) -> Self {
        ColumnLabel::new(name)
    }
}

impl From<&String> for ColumnLabel {
    fn from(name: &String) -> Self {
        ColumnLabel::new(name.clone())
    }
}

impl<const N: usize> From<[&str; N]> for ColumnLabel {
    fn from(levels: [&str; N]) -> Self {
        ColumnLabel::from_levels(levels.to_vec())
    }
}

/// Ordered mapping from column label to column, plus the row index
///
/// All columns share the row count, which always equals the index length.
#[derive(Debug, Clone)]
pub struct Table {
    /// Column labels in table order
    labels: Vec<ColumnLabel>,

    /// Column data in table order
    columns: Vec<Column>,

    /// Label to position lookup
    column_indices: HashMap<ColumnLabel, usize>,

    /// Row labels
    index: Index,
}

impl Table {
    /// Table without columns over `index`
    pub fn empty(index: Index) -> Self {
        Table {
            labels: Vec::new(),
            columns: Vec::new(),
            column_indices: HashMap::new(),
            index,
        }
    }

    /// Build a table from labelled columns and an index
    pub fn from_parts(labels: Vec<ColumnLabel>, columns: Vec<Column>, index: Index) -> Result<Self> {
        if labels.len() != columns.len() {
            return Err(Error::LengthMismatch {
                expected: labels.len(),
                actual: columns.len(),
            });
        }

        let mut table = Table::empty(index);
        for (label, column) in labels.into_iter().zip(columns) {
            table.add_column(label, column)?;
        }
        Ok(table)
    }

    /// Append a column
    pub fn add_column(&mut self, label: impl Into<ColumnLabel>, column: Column) -> Result<()> {
        let label = label.into();

        if column.len() != self.n_rows() {
            return Err(Error::InconsistentRowCount {
                expected: self.n_rows(),
                found: column.len(),
            });
        }

        if self.column_indices.contains_key(&label) {
            return Err(Error::DuplicateColumnName(label.to_string()));
        }

        if let Some(first) = self.labels.first() {
            if first.n_levels() != label.n_levels() {
                return Err(Error::InvalidKeyShape(format!(
                    "column label {} has {} levels, table columns have {}",
                    label,
                    label.n_levels(),
                    first.n_levels()
                )));
            }
        }

        self.column_indices.insert(label.clone(), self.columns.len());
        self.labels.push(label);
        self.columns.push(column);
        Ok(())
    }

    /// Replace the column at `pos`, keeping its label
    pub fn replace_column(&mut self, pos: usize, column: Column) -> Result<()> {
        if column.len() != self.n_rows() {
            return Err(Error::InconsistentRowCount {
                expected: self.n_rows(),
                found: column.len(),
            });
        }
        let slot = self
            .columns
            .get_mut(pos)
            .ok_or(Error::IndexOutOfBounds {
                index: pos as i64,
                size: self.labels.len(),
            })?;
        *slot = column;
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_columns())
    }

    pub fn labels(&self) -> &[ColumnLabel] {
        &self.labels
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, pos: usize) -> Option<&Column> {
        self.columns.get(pos)
    }

    /// Position of the column labelled `label`
    pub fn position_of(&self, label: &ColumnLabel) -> Option<usize> {
        self.column_indices.get(label).copied()
    }

    pub fn column_by_label(&self, label: &ColumnLabel) -> Option<&Column> {
        self.position_of(label).map(|pos| &self.columns[pos])
    }

    pub fn contains_column(&self, label: &ColumnLabel) -> bool {
        self.column_indices.contains_key(label)
    }

    /// Number of levels of the column labels, `None` for a table without columns
    pub fn column_levels(&self) -> Option<usize> {
        self.labels.first().map(ColumnLabel::n_levels)
    }

    pub fn dtypes(&self) -> Vec<DataType> {
        self.columns.iter().map(Column::data_type).collect()
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Replace the row index; its length must match the row count unless the
    /// table has no columns
    pub fn set_index(&mut self, index: Index) -> Result<()> {
        if !self.columns.is_empty() && index.len() != self.n_rows() {
            return Err(Error::LengthMismatch {
                expected: self.n_rows(),
                actual: index.len(),
            });
        }
        self.index = index;
        Ok(())
    }

    /// Columns at `positions`, in that order, sharing this table's index
    pub fn select_positions(&self, positions: &[usize]) -> Result<Table> {
        let mut table = Table::empty(self.index.clone());
        for &pos in positions {
            let column = self.columns.get(pos).ok_or(Error::IndexOutOfBounds {
                index: pos as i64,
                size: self.columns.len(),
            })?;
            table.add_column(self.labels[pos].clone(), column.clone())?;
        }
        Ok(table)
    }

    /// Split into labels, columns and index
    pub fn into_parts(self) -> (Vec<ColumnLabel>, Vec<Column>, Index) {
        (self.labels, self.columns, self.index)
    }

    /// Replace index and columns at once (used when rows are appended)
    pub(crate) fn replace_rows(&mut self, columns: Vec<Column>, index: Index) -> Result<()> {
        if columns.len() != self.columns.len() {
            return Err(Error::LengthMismatch {
                expected: self.columns.len(),
                actual: columns.len(),
            });
        }
        if let Some(bad) = columns.iter().find(|c| c.len() != index.len()) {
            return Err(Error::InconsistentRowCount {
                expected: index.len(),
                found: bad.len(),
            });
        }
        self.columns = columns;
        self.index = index;
        Ok(())
    }
}
