//! Column selection by label or position

use crate::column::Scalar;
use crate::error::{Error, Result};
use crate::indexing::key::{is_bool_list, Key, SliceKey};
use crate::indexing::rows::{normalize_position, slice_positions};
use crate::table::{ColumnLabel, Table};

/// Text of a column label given as a scalar
pub(crate) fn label_text(value: &Scalar) -> String {
    match value {
        Scalar::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_multi_level(table: &Table) -> bool {
    table.column_levels().map_or(false, |levels| levels > 1)
}

/// Positions of the columns matching one scalar label
///
/// On multi-level columns a scalar matches every column whose first level
/// equals it.
fn positions_of_label(table: &Table, value: &Scalar) -> Result<Vec<usize>> {
    let name = label_text(value);
    let found: Vec<usize> = if is_multi_level(table) {
        table
            .labels()
            .iter()
            .enumerate()
            .filter(|(_, label)| label.level(0) == Some(name.as_str()))
            .map(|(pos, _)| pos)
            .collect()
    } else {
        table.position_of(&ColumnLabel::new(name.clone())).into_iter().collect()
    };

    if found.is_empty() {
        return Err(Error::ColumnNotFound(name));
    }
    Ok(found)
}

fn mask_positions(mask: &[bool], n_columns: usize) -> Result<Vec<usize>> {
    if mask.len() != n_columns {
        return Err(Error::ShapeMismatch(format!(
            "column mask of length {} does not match {} columns",
            mask.len(),
            n_columns
        )));
    }
    Ok(mask
        .iter()
        .enumerate()
        .filter_map(|(i, &keep)| if keep { Some(i) } else { None })
        .collect())
}

fn bool_values(values: &[Scalar]) -> Vec<bool> {
    values.iter().map(|v| v.as_bool().unwrap_or(false)).collect()
}

/// Label slice over the columns in table order, both bounds inclusive
fn label_slice_positions(table: &Table, slice: &SliceKey) -> Result<Vec<usize>> {
    let n = table.n_columns();
    let start = match &slice.start {
        Some(label) => positions_of_label(table, label)?[0] as i64,
        None => 0,
    };
    let stop = match &slice.stop {
        Some(label) => {
            let found = positions_of_label(table, label)?;
            found[found.len() - 1] as i64 + 1
        }
        None => n as i64,
    };
    let step = slice.step.unwrap_or(1);
    if step < 0 {
        return Err(Error::UnsupportedOperation(
            "negative steps are not supported for column label slices".into(),
        ));
    }
    Ok(slice_positions(start, stop, step.max(1), n))
}

/// Positions of the columns matching a per-level tuple
fn tuple_positions(table: &Table, parts: &[Key]) -> Result<Vec<usize>> {
    let levels = table.column_levels().unwrap_or(0);
    if levels < 2 || parts.len() > levels {
        return Err(Error::InvalidKeyShape(format!(
            "tuple column key with {} elements for {}-level columns",
            parts.len(),
            levels
        )));
    }

    let mut matches: Vec<usize> = Vec::new();
    'columns: for (pos, label) in table.labels().iter().enumerate() {
        for (level, part) in parts.iter().enumerate() {
            let value = label.level(level).unwrap_or_default();
            let keep = match part {
                Key::All => true,
                Key::Scalar(s) => label_text(s) == value,
                Key::List(options) => options.iter().any(|s| label_text(s) == value),
                Key::Slice(slice) if slice.is_full() => true,
                other => {
                    return Err(Error::InvalidKeyShape(format!(
                        "unsupported tuple component {:?} for column selection",
                        other
                    )))
                }
            };
            if !keep {
                continue 'columns;
            }
        }
        matches.push(pos);
    }

    if matches.is_empty() {
        return Err(Error::ColumnNotFound(format!("{:?}", parts)));
    }
    Ok(matches)
}

/// Column positions addressed by a label key
pub(crate) fn label_positions(table: &Table, key: &Key) -> Result<Vec<usize>> {
    let n = table.n_columns();
    match key {
        Key::All => Ok((0..n).collect()),
        Key::Scalar(value) => positions_of_label(table, value),
        Key::Mask(mask) => mask_positions(mask, n),
        Key::List(values) if is_bool_list(values) => mask_positions(&bool_values(values), n),
        Key::List(values) => {
            let mut positions = Vec::with_capacity(values.len());
            for value in values {
                positions.extend(positions_of_label(table, value)?);
            }
            Ok(positions)
        }
        Key::Slice(slice) => label_slice_positions(table, slice),
        Key::Tuple(parts) => tuple_positions(table, parts),
        Key::Labels(_) => Err(Error::InvalidKeyShape(
            "an index cannot be used as a column key".into(),
        )),
    }
}

/// Column positions addressed by a positional key
pub(crate) fn index_positions(table: &Table, key: &Key) -> Result<Vec<usize>> {
    let n = table.n_columns();
    let position = |value: &Scalar| -> Result<usize> {
        let pos = value.as_i64().filter(|_| value.is_integer()).ok_or_else(|| {
            Error::InvalidKeyShape(format!("positional column key must be an integer, got {:?}", value))
        })?;
        normalize_position(pos, n).map_err(|_| Error::ColumnNotFound(format!("position {}", pos)))
    };

    match key {
        Key::All => Ok((0..n).collect()),
        Key::Scalar(value) => Ok(vec![position(value)?]),
        Key::Mask(mask) => mask_positions(mask, n),
        Key::List(values) if is_bool_list(values) => mask_positions(&bool_values(values), n),
        Key::List(values) => values.iter().map(position).collect(),
        Key::Slice(slice) => {
            let (start, stop, step) = slice.indices(n)?;
            Ok(slice_positions(start, stop, step, n))
        }
        Key::Tuple(_) | Key::Labels(_) => Err(Error::InvalidKeyShape(
            "positional column key cannot be a tuple or label set".into(),
        )),
    }
}

/// Sub-table holding the columns addressed by a label key
pub fn by_label(table: &Table, key: &Key) -> Result<Table> {
    let positions = label_positions(table, key)?;
    log::trace!("column key {:?} selected positions {:?}", key, positions);
    table.select_positions(&positions)
}

/// Sub-table holding the columns addressed by a positional key
pub fn by_position(table: &Table, key: &Key) -> Result<Table> {
    let positions = index_positions(table, key)?;
    table.select_positions(&positions)
}
