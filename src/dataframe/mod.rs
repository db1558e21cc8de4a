use crate::column::{Column, DataType};
use crate::error::{Error, Result};
use crate::index::Index;
use crate::series::Series;
use crate::table::{ColumnLabel, Table};

/// Two-dimensional labelled table
#[derive(Debug, Clone)]
pub struct DataFrame {
    table: Table,
}

impl DataFrame {
    /// Empty DataFrame without rows or columns
    pub fn new() -> Self {
        DataFrame {
            table: Table::empty(Index::range(0)),
        }
    }

    /// Create a DataFrame with a default `0..len` index
    pub fn from_columns<L: Into<ColumnLabel>>(columns: Vec<(L, Column)>) -> Result<Self> {
        let n_rows = columns.first().map_or(0, |(_, col)| col.len());
        Self::with_index(columns, Index::range(n_rows))
    }

    /// Create a DataFrame over an explicit index
    pub fn with_index<L: Into<ColumnLabel>>(columns: Vec<(L, Column)>, index: impl Into<Index>) -> Result<Self> {
        let mut table = Table::empty(index.into());
        for (label, column) in columns {
            table.add_column(label, column)?;
        }
        Ok(DataFrame { table })
    }

    pub fn from_table(table: Table) -> Self {
        DataFrame { table }
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        self.table.shape()
    }

    pub fn n_rows(&self) -> usize {
        self.table.n_rows()
    }

    pub fn n_columns(&self) -> usize {
        self.table.n_columns()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0 || self.n_columns() == 0
    }

    pub fn column_labels(&self) -> &[ColumnLabel] {
        self.table.labels()
    }

    pub fn dtypes(&self) -> Vec<DataType> {
        self.table.dtypes()
    }

    pub fn index(&self) -> &Index {
        self.table.index()
    }

    /// Column `label` as a Series sharing the frame index
    pub fn column(&self, label: impl Into<ColumnLabel>) -> Result<Series> {
        let label = label.into();
        let values = self
            .table
            .column_by_label(&label)
            .ok_or_else(|| Error::ColumnNotFound(label.to_string()))?;
        Series::from_column(label, values.clone(), self.table.index().clone())
    }

    pub fn as_table(&self) -> &Table {
        &self.table
    }

    pub(crate) fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }
}

impl Default for DataFrame {
    fn default() -> Self {
        Self::new()
    }
}
