use crate::column::{Column, DataType, Scalar};
use crate::error::{Error, Result};
use crate::index::Index;
use crate::table::{ColumnLabel, Table};

/// One-dimensional labelled column
///
/// A Series is a [`Table`] holding exactly one column; its name is that
/// column's label.
#[derive(Debug, Clone)]
pub struct Series {
    table: Table,
}

impl Series {
    /// Create a Series with a default `0..len` index
    pub fn new(values: impl Into<Column>, name: Option<&str>) -> Result<Self> {
        let values = values.into();
        let index = Index::range(values.len());
        Self::with_index(values, index, name)
    }

    /// Create a Series over an explicit index
    pub fn with_index(values: impl Into<Column>, index: impl Into<Index>, name: Option<&str>) -> Result<Self> {
        let label = name.map_or_else(ColumnLabel::unnamed, ColumnLabel::new);
        Self::from_column(label, values.into(), index.into())
    }

    pub(crate) fn from_column(label: ColumnLabel, values: Column, index: Index) -> Result<Self> {
        let table = Table::from_parts(vec![label], vec![values], index)?;
        Ok(Series { table })
    }

    /// Wrap a single-column table
    pub fn from_table(table: Table) -> Result<Self> {
        if table.n_columns() != 1 {
            return Err(Error::ShapeMismatch(format!(
                "a Series holds exactly one column, got {}",
                table.n_columns()
            )));
        }
        Ok(Series { table })
    }

    pub fn len(&self) -> usize {
        self.table.n_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the Series, `None` when unnamed
    pub fn name(&self) -> Option<&ColumnLabel> {
        self.table.labels().first().filter(|label| !label.is_unnamed())
    }

    pub fn label(&self) -> &ColumnLabel {
        &self.table.labels()[0]
    }

    pub fn values(&self) -> &Column {
        &self.table.columns()[0]
    }

    pub fn dtype(&self) -> DataType {
        self.values().data_type()
    }

    pub fn index(&self) -> &Index {
        self.table.index()
    }

    /// Value at position `pos`
    pub fn get(&self, pos: usize) -> Result<Scalar> {
        self.values().get(pos)
    }

    pub fn to_scalars(&self) -> Vec<Scalar> {
        self.values().to_scalars()
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
