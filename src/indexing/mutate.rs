//! In-place writes through `.loc` / `.iloc`
//!
//! Every write stages its new columns first and commits them only once all of
//! them were built, so a failing assignment leaves the table untouched.

use std::collections::HashMap;

use crate::column::{Column, DataType, Scalar};
use crate::engine::ColumnarEngine;
use crate::error::{Error, Result};
use crate::index::{Index, SingleIndex};
use crate::indexing::key::{is_bool_list, Key};
use crate::indexing::{label, rows, IndexingContext, Selector, Value};
use crate::series::Series;
use crate::table::{ColumnLabel, Table};

/// Reorder `values` (labelled by `from`) to follow the labels of `to`
///
/// Labels missing from `from` become nulls; duplicated labels in `from`
/// resolve to their first occurrence.
pub(crate) fn align_by_label(values: &Column, from: &Index, to: &Index) -> Result<Column> {
    let mut first: HashMap<Vec<Scalar>, usize> = HashMap::with_capacity(from.len());
    for pos in 0..from.len() {
        first.entry(from.key_at(pos)?).or_insert(pos);
    }
    let positions = (0..to.len())
        .map(|pos| Ok(first.get(&to.key_at(pos)?).copied()))
        .collect::<Result<Vec<Option<usize>>>>()?;
    Ok(values.take_optional(&positions))
}

fn align_series(series: &Series, to: &Index) -> Result<Column> {
    align_by_label(series.values(), series.index(), to)
}

fn scalar_column(value: &Scalar, len: usize) -> Result<Column> {
    Column::full(value.data_type().unwrap_or(DataType::Float64), value, len)
}

/// One value column per selected column
fn value_columns(value: &Value, index: &Index, positions: &[usize], n_columns: usize) -> Result<Vec<Column>> {
    let shared = match value {
        Value::Scalar(scalar) => scalar_column(scalar, 1)?,
        Value::Column(column) => column.clone(),
        Value::Series(series) => align_series(series, index)?.take(positions),
        Value::Columns(columns) if columns.len() == n_columns => return Ok(columns.clone()),
        Value::Columns(columns) if columns.len() == 1 => columns[0].clone(),
        Value::Columns(columns) => {
            return Err(Error::ShapeMismatch(format!(
                "cannot assign {} value columns to {} selected columns",
                columns.len(),
                n_columns
            )))
        }
    };
    Ok(vec![shared; n_columns])
}

/// Column `column` of `table` with `values` written at `positions`
///
/// Numeric columns are widened to the common type of the column and the
/// incoming values first.
fn stage(
    engine: &dyn ColumnarEngine,
    table: &Table,
    column: usize,
    positions: &[usize],
    values: &Column,
) -> Result<Column> {
    let target = table
        .column(column)
        .ok_or_else(|| Error::ColumnNotFound(format!("position {}", column)))?;
    let target_type = target.data_type();
    let value_type = values.data_type();

    let dtype = if values.null_count() == values.len() {
        target_type
    } else if target_type.is_numeric() && value_type.is_numeric() {
        engine.common_type(&[target_type, value_type])?
    } else {
        target_type
    };
    if target_type == DataType::Int64 && dtype == DataType::Float64 {
        log::warn!("widening Int64 column to Float64 for assignment; large integers lose precision");
    } else if dtype != target_type {
        log::debug!("widening {:?} column to {:?} for assignment", target_type, dtype);
    }

    let target = engine.cast(target, dtype)?;
    engine.scatter(&target, positions, values)
}

/// Write `value` into `columns` at the rows chosen by `selector`
pub(crate) fn write(
    ctx: IndexingContext<'_>,
    table: &mut Table,
    columns: &[usize],
    selector: &Selector,
    value: &Value,
) -> Result<()> {
    let positions = rows::positions(selector, table.n_rows())?;
    let values = value_columns(value, table.index(), &positions, columns.len())?;
    let staged = columns
        .iter()
        .zip(&values)
        .map(|(&column, values)| stage(ctx.engine, table, column, &positions, values))
        .collect::<Result<Vec<_>>>()?;

    log::trace!("writing {} rows in {} columns", positions.len(), columns.len());
    for (&column, data) in columns.iter().zip(staged) {
        table.replace_column(column, data)?;
    }
    Ok(())
}

/// Append one row labelled `label`
///
/// `columns` receive `value`, every other column a null. The index and each
/// column are widened to the common type of their old contents and the new
/// entry.
pub(crate) fn append_row(
    ctx: IndexingContext<'_>,
    table: &mut Table,
    label: &Scalar,
    value: &Scalar,
    columns: &[usize],
) -> Result<()> {
    let engine = ctx.engine;
    let index = table.index().as_single()?;

    let widened = |current: &Column, incoming: &Scalar| -> Result<DataType> {
        match incoming.data_type() {
            None => Ok(current.data_type()),
            Some(dtype) if current.is_empty() => Ok(dtype),
            Some(dtype) => engine.common_type(&[current.data_type(), dtype]),
        }
    };
    let extend = |current: &Column, incoming: &Scalar| -> Result<Column> {
        let dtype = widened(current, incoming)?;
        let current = engine.cast(current, dtype)?;
        let tail = Column::from_scalars(dtype, std::slice::from_ref(incoming))?;
        engine.concat_columns(&[current, tail])
    };

    let new_index = SingleIndex::with_name(
        extend(index.values(), label)?,
        index.name().map(String::from),
    );
    let new_columns = table
        .columns()
        .iter()
        .enumerate()
        .map(|(pos, column)| {
            if columns.contains(&pos) {
                extend(column, value)
            } else {
                extend(column, &Scalar::Null)
            }
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!("appending row {} to a table of {} rows", label, table.n_rows());
    table.replace_rows(new_columns, Index::Single(new_index))
}

/// Row labels a column insert writes to, `None` for "whatever the value has"
fn insert_rows(ctx: IndexingContext<'_>, table: &Table, row: &Key) -> Result<Option<Index>> {
    let index = table.index();
    if table.n_rows() == 0 && matches!(row, Key::All | Key::Slice(_)) {
        return Ok(None);
    }

    let picked = match row {
        Key::All => index.clone(),
        Key::Slice(_) | Key::Mask(_) => {
            let selector = label::resolve(ctx, index.as_single()?, row)?;
            index.take(&rows::positions(&selector, index.len())?)
        }
        Key::List(values) if is_bool_list(values) => {
            let selector = label::resolve(ctx, index.as_single()?, row)?;
            index.take(&rows::positions(&selector, index.len())?)
        }
        Key::Scalar(value) => Index::Single(SingleIndex::from_labels(std::slice::from_ref(value))?),
        Key::List(values) => Index::Single(SingleIndex::from_labels(values)?),
        Key::Labels(labels) => labels.clone(),
        Key::Tuple(_) => {
            return Err(Error::InvalidKeyShape(
                "tuple row key cannot insert a column".into(),
            ))
        }
    };
    Ok(Some(picked))
}

/// Add column `label` through a `.loc` assignment
///
/// The value is first laid out over the row labels the key names and then
/// aligned to the table's index. A table without rows takes those labels (or
/// a default range) as its index.
pub(crate) fn insert_column(
    ctx: IndexingContext<'_>,
    table: &mut Table,
    label: ColumnLabel,
    row: &Key,
    value: &Value,
) -> Result<()> {
    let rows = insert_rows(ctx, table, row)?;

    let (values, value_index) = match value {
        Value::Scalar(scalar) => (
            scalar_column(scalar, rows.as_ref().map_or(1, Index::len))?,
            rows,
        ),
        Value::Series(series) => match rows {
            Some(rows) => (align_series(series, &rows)?, Some(rows)),
            None => (series.values().clone(), Some(series.index().clone())),
        },
        Value::Column(column) => (column.clone(), rows),
        Value::Columns(columns) if columns.len() == 1 => (columns[0].clone(), rows),
        Value::Columns(columns) => {
            return Err(Error::ShapeMismatch(format!(
                "cannot insert {} value columns as one column",
                columns.len()
            )))
        }
    };

    if let Some(rows) = &value_index {
        if rows.len() != values.len() {
            return Err(Error::LengthMismatch {
                expected: rows.len(),
                actual: values.len(),
            });
        }
    }

    let mut next = table.clone();
    if table.n_rows() > 0 {
        let aligned = match &value_index {
            Some(rows) if !matches!(row, Key::All) => align_by_label(&values, rows, table.index())?,
            _ => values,
        };
        next.add_column(label.clone(), aligned)?;
    } else {
        let index = value_index.unwrap_or_else(|| Index::range(values.len()));
        next.set_index(index)?;
        next.add_column(label.clone(), values)?;
    }

    log::debug!("inserted column {} through a label assignment", label);
    *table = next;
    Ok(())
}
