//! Result shaping: collapsing one-row or one-column selections

use crate::column::{Column, DataType, Scalar};
use crate::dataframe::DataFrame;
use crate::engine::ColumnarEngine;
use crate::error::Result;
use crate::index::{Index, MultiIndex, SingleIndex};
use crate::indexing::key::KeyKind;
use crate::indexing::Selection;
use crate::series::Series;
use crate::table::{ColumnLabel, Table};

fn all_numeric(table: &Table) -> bool {
    table.dtypes().iter().all(DataType::is_numeric)
}

/// Whether a selection should collapse into a Series or scalar
pub fn can_downcast(table: &Table, row: KeyKind, col: KeyKind) -> bool {
    let (n_rows, n_columns) = table.shape();

    if n_rows == 1 {
        if row == KeyKind::Slice {
            if col != KeyKind::Scalar {
                return false;
            }
        } else if row.is_list_like() && (col.is_list_like() || col == KeyKind::Slice) {
            return false;
        } else if row == KeyKind::Mask && col != KeyKind::Slice {
            return true;
        }
        if all_numeric(table) {
            return true;
        }
    }

    if n_columns == 1 {
        if col == KeyKind::Slice || col == KeyKind::SlicedTuple {
            return false;
        }
        if !col.is_list_like() {
            return true;
        }
    }

    false
}

/// Collapse a selection already known to be downcastable
///
/// A 1x1 result addressed by two scalar keys becomes its value. Otherwise the
/// single column becomes a Series (axis 1) or the single row becomes a Series
/// named after its row label and indexed by the column labels (axis 0).
pub fn downcast(engine: &dyn ColumnarEngine, table: Table, row: KeyKind, col: KeyKind) -> Result<Selection> {
    let (n_rows, n_columns) = table.shape();
    let along_rows = if n_rows == 1 && n_columns == 1 {
        if row == KeyKind::Scalar && col == KeyKind::Scalar {
            return Ok(Selection::Scalar(table.columns()[0].get(0)?));
        }
        row == KeyKind::Scalar
    } else {
        n_rows == 1
    };

    if !along_rows {
        return Ok(Selection::Series(Series::from_table(table)?));
    }

    let dtype = match DataType::common(&table.dtypes()) {
        Some(dtype) => dtype,
        None => {
            log::debug!("row has no common type; keeping the DataFrame");
            return Ok(Selection::DataFrame(DataFrame::from_table(table)));
        }
    };

    let values = table
        .columns()
        .iter()
        .map(|column| engine.cast(column, dtype)?.get(0))
        .collect::<Result<Vec<Scalar>>>()?;
    let name = ColumnLabel::new(table.index().label_at(0)?.to_string());
    let index = column_label_index(table.labels())?;
    Ok(Selection::Series(Series::from_column(
        name,
        Column::from_scalars(dtype, &values)?,
        index,
    )?))
}

/// Index made of column labels, multi-level when the labels are
fn column_label_index(labels: &[ColumnLabel]) -> Result<Index> {
    let levels = labels.first().map_or(1, ColumnLabel::n_levels);
    if levels > 1 {
        let tuples = labels
            .iter()
            .map(|label| label.levels().iter().map(|l| Scalar::from(l.as_str())).collect())
            .collect();
        return Ok(Index::Multi(MultiIndex::from_tuples(tuples, None)?));
    }
    let names: Vec<String> = labels.iter().map(ToString::to_string).collect();
    Ok(Index::Single(SingleIndex::new(names)))
}

/// Wrap a selection, downcasting when the rules allow
pub fn shape(engine: &dyn ColumnarEngine, table: Table, row: KeyKind, col: KeyKind) -> Result<Selection> {
    if can_downcast(&table, row, col) {
        downcast(engine, table, row, col)
    } else {
        Ok(Selection::DataFrame(DataFrame::from_table(table)))
    }
}
