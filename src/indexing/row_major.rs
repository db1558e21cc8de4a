//! Row lookup on a multi-level index

use std::cmp::Ordering;

use crate::column::Scalar;
use crate::error::{Error, Result};
use crate::index::{Index, MultiIndex};
use crate::indexing::key::{is_bool_list, Key};
use crate::indexing::{label, multi_label, rows, IndexingContext};
use crate::table::Table;

/// Rows of `table` addressed by `key` on its multi-level index
///
/// A scalar matches the first level. A tuple gives one component per leading
/// level; when every component is a scalar, the matched levels are dropped from
/// the result's index unless the tuple spans every level.
pub(crate) fn select(ctx: IndexingContext<'_>, table: &Table, key: &Key) -> Result<Table> {
    let index = match table.index() {
        Index::Multi(index) => index,
        Index::Single(_) => {
            return Err(Error::UnsupportedOperation(
                "row-major lookup requires a multi-level index".into(),
            ))
        }
    };

    match key {
        Key::All => Ok(table.clone()),
        Key::Mask(mask) => ctx.engine.boolean_mask(table, mask),
        Key::List(values) if is_bool_list(values) => {
            let mask: Vec<bool> = values.iter().map(|v| v.as_bool().unwrap_or(false)).collect();
            ctx.engine.boolean_mask(table, &mask)
        }
        Key::Labels(labels) => {
            let found = multi_label::resolve_many(ctx.engine, table.index(), labels)?;
            let positions: Vec<usize> = multi_label::require_all(found, labels)?
                .into_iter()
                .map(|p| p as usize)
                .collect();
            ctx.engine.gather(table, &positions)
        }
        Key::List(values) => first_level_list(ctx, table, index, values),
        Key::Slice(slice) => {
            let first = index.get_level_values(0)?;
            let selector = label::label_range_or_mask(ctx, &first, slice)?;
            rows::select(ctx.engine, table, &selector)
        }
        Key::Scalar(value) => by_components(ctx, table, index, &[Key::Scalar(value.clone())]),
        Key::Tuple(parts) => by_components(ctx, table, index, parts),
    }
}

/// Rows whose first level is in `values`, grouped by value in request order
fn first_level_list(
    ctx: IndexingContext<'_>,
    table: &Table,
    index: &MultiIndex,
    values: &[Scalar],
) -> Result<Table> {
    let level = &index.levels()[0];
    let labels = level.to_scalars();
    let mut positions = Vec::new();
    for value in values {
        let value = value.cast(level.data_type())?;
        let before = positions.len();
        positions.extend(
            labels
                .iter()
                .enumerate()
                .filter(|(_, label)| !label.is_null() && **label == value)
                .map(|(pos, _)| pos),
        );
        if positions.len() == before {
            return Err(Error::KeyNotFound(value.to_string()));
        }
    }
    ctx.engine.gather(table, &positions)
}

fn between(label: &Scalar, start: Option<&Scalar>, stop: Option<&Scalar>) -> bool {
    !label.is_null()
        && start.map_or(true, |s| label.compare(s) != Some(Ordering::Less))
        && stop.map_or(true, |s| label.compare(s) != Some(Ordering::Greater))
}

fn by_components(
    ctx: IndexingContext<'_>,
    table: &Table,
    index: &MultiIndex,
    parts: &[Key],
) -> Result<Table> {
    if parts.len() > index.n_levels() {
        return Err(Error::InvalidKeyShape(format!(
            "key with {} components for a {}-level index",
            parts.len(),
            index.n_levels()
        )));
    }

    let mut keep = vec![true; index.len()];
    for (level, part) in index.levels().iter().zip(parts) {
        let dtype = level.data_type();
        let labels = level.to_scalars();
        match part {
            Key::All => {}
            Key::Scalar(value) => {
                let value = value.cast(dtype)?;
                let mut seen = false;
                for (keep, label) in keep.iter_mut().zip(&labels) {
                    let hit = !label.is_null() && *label == value;
                    seen |= hit;
                    *keep &= hit;
                }
                if !seen {
                    return Err(Error::KeyNotFound(value.to_string()));
                }
            }
            Key::List(values) => {
                let values = values
                    .iter()
                    .map(|v| v.cast(dtype))
                    .collect::<Result<Vec<_>>>()?;
                for (keep, label) in keep.iter_mut().zip(&labels) {
                    *keep &= !label.is_null() && values.contains(label);
                }
            }
            Key::Slice(slice) => {
                let start = slice.start.as_ref().map(|s| s.cast(dtype)).transpose()?;
                let stop = slice.stop.as_ref().map(|s| s.cast(dtype)).transpose()?;
                for (keep, label) in keep.iter_mut().zip(&labels) {
                    *keep &= between(label, start.as_ref(), stop.as_ref());
                }
            }
            other => {
                return Err(Error::InvalidKeyShape(format!(
                    "unsupported component {:?} in a multi-level key",
                    other
                )))
            }
        }
    }

    // components that each match somewhere may still share no row
    let sliced = parts.iter().any(|part| matches!(part, Key::Slice(_) | Key::All));
    if !sliced && !keep.contains(&true) {
        return Err(Error::KeyNotFound(format!("{:?}", parts)));
    }

    let mut out = ctx.engine.boolean_mask(table, &keep)?;

    let all_scalar = parts.iter().all(Key::is_scalar);
    if all_scalar && parts.len() < index.n_levels() {
        let reduced = match out.index() {
            Index::Multi(matched) => Some(matched.drop_levels(parts.len())?),
            Index::Single(_) => None,
        };
        if let Some(reduced) = reduced {
            out.set_index(reduced)?;
        }
    }
    log::debug!(
        "multi-index key matched {} of {} rows",
        out.n_rows(),
        table.n_rows()
    );
    Ok(out)
}
