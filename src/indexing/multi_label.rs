//! Ordered resolution of many labels at once
//!
//! Labels are matched against the index with a left join. Join output order is
//! unspecified, so each requested label carries its request position in an
//! order column and the joined rows are sorted on it afterwards.

use crate::column::{Column, Scalar};
use crate::engine::{ColumnarEngine, JoinHow};
use crate::error::{Error, Result};
use crate::index::Index;
use crate::table::{ColumnLabel, Table};

const ORDER_COLUMN: &str = "__order";
const POSITION_COLUMN: &str = "__position";

fn row_numbers(len: usize) -> Column {
    Column::from((0..len as i64).collect::<Vec<_>>())
}

/// Positions in `index` of every label in `labels`, in request order
///
/// A label matching several rows yields all of them, in index order. A label
/// with no match yields a single `None`.
pub(crate) fn resolve_many(
    engine: &dyn ColumnarEngine,
    index: &Index,
    labels: &Index,
) -> Result<Vec<Option<usize>>> {
    if labels.n_levels() != index.n_levels() {
        return Err(Error::InvalidKeyShape(format!(
            "{}-level labels cannot address a {}-level index",
            labels.n_levels(),
            index.n_levels()
        )));
    }
    if labels.is_empty() {
        return Ok(Vec::new());
    }

    let labels = labels.cast(&index.dtypes())?;
    let order = ColumnLabel::new(ORDER_COLUMN);
    let requested = Table::from_parts(vec![order.clone()], vec![row_numbers(labels.len())], labels)?;
    let existing = Table::from_parts(
        vec![ColumnLabel::new(POSITION_COLUMN)],
        vec![row_numbers(index.len())],
        index.clone(),
    )?;

    let joined = engine.join(&requested, &existing, JoinHow::Left)?;
    let sorted = engine.sort_values(&joined, &order)?;
    let positions = sorted
        .column_by_label(&ColumnLabel::new(POSITION_COLUMN))
        .ok_or_else(|| Error::ColumnNotFound(POSITION_COLUMN.into()))?;

    log::trace!("resolved {} labels to {} rows", requested.n_rows(), positions.len());
    Ok(positions
        .to_scalars()
        .into_iter()
        .map(|value| match value {
            Scalar::Int64(pos) => Some(pos as usize),
            _ => None,
        })
        .collect())
}

/// Positions of a resolution in which every label must exist
pub(crate) fn require_all(found: Vec<Option<usize>>, labels: &Index) -> Result<Vec<i64>> {
    found
        .into_iter()
        .map(|pos| pos.map(|p| p as i64))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| Error::KeyNotFound(format!("not all labels found in {:?}", labels)))
}
