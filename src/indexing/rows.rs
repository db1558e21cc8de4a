//! Row selection from positional selectors

use crate::error::{Error, Result};
use crate::engine::ColumnarEngine;
use crate::indexing::key::{is_bool_list, Key};
use crate::indexing::Selector;
use crate::table::Table;

/// Positions visited by a normalized `start:stop:step` slice over `len` rows
pub(crate) fn slice_positions(start: i64, stop: i64, step: i64, len: usize) -> Vec<usize> {
    let len = len as i64;
    let mut positions = Vec::new();
    if step > 0 {
        let mut pos = start.clamp(0, len);
        let stop = stop.clamp(0, len);
        while pos < stop {
            positions.push(pos as usize);
            pos += step;
        }
    } else if step < 0 {
        let mut pos = start.clamp(-1, len - 1);
        let stop = stop.clamp(-1, len - 1);
        while pos > stop {
            positions.push(pos as usize);
            pos += step;
        }
    }
    positions
}

/// Normalize a possibly negative position against `len`
pub(crate) fn normalize_position(pos: i64, len: usize) -> Result<usize> {
    let size = len as i64;
    let normalized = if pos < 0 { pos + size } else { pos };
    if normalized < 0 || normalized >= size {
        return Err(Error::IndexOutOfBounds { index: pos, size: len });
    }
    Ok(normalized as usize)
}

/// Rows of `table` chosen by `selector`
pub fn select(engine: &dyn ColumnarEngine, table: &Table, selector: &Selector) -> Result<Table> {
    log::debug!("selecting rows with {:?}", selector);
    match selector {
        Selector::Slice { start, stop, step } => engine.slice(table, *start, *stop, *step),
        Selector::BooleanMask(mask) => engine.boolean_mask(table, mask),
        Selector::PositionList(positions) => {
            let positions = positions
                .iter()
                .map(|&p| {
                    usize::try_from(p).map_err(|_| Error::IndexOutOfBounds {
                        index: p,
                        size: table.n_rows(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            engine.gather(table, &positions)
        }
        Selector::SingleScalarPosition(pos) => {
            let pos = normalize_position(*pos, table.n_rows())? as i64;
            engine.slice(table, pos, pos + 1, 1)
        }
    }
}

/// Concrete row positions a selector picks out of `len` rows
pub(crate) fn positions(selector: &Selector, len: usize) -> Result<Vec<usize>> {
    match selector {
        Selector::Slice { start, stop, step } => {
            if *step == 0 {
                return Err(Error::InvalidKeyShape("slice step cannot be zero".into()));
            }
            Ok(slice_positions(*start, *stop, *step, len))
        }
        Selector::BooleanMask(mask) => {
            if mask.len() != len {
                return Err(Error::ShapeMismatch(format!(
                    "boolean mask of length {} does not match {} rows",
                    mask.len(),
                    len
                )));
            }
            Ok(mask
                .iter()
                .enumerate()
                .filter_map(|(i, &keep)| if keep { Some(i) } else { None })
                .collect())
        }
        Selector::PositionList(list) => list
            .iter()
            .map(|&p| {
                usize::try_from(p)
                    .ok()
                    .filter(|&p| p < len)
                    .ok_or(Error::IndexOutOfBounds { index: p, size: len })
            })
            .collect(),
        Selector::SingleScalarPosition(pos) => Ok(vec![normalize_position(*pos, len)?]),
    }
}

/// Positional selector for an `.iloc` row key
pub(crate) fn iloc_selector(key: &Key, len: usize) -> Result<Selector> {
    match key {
        Key::All => Ok(Selector::Slice {
            start: 0,
            stop: len as i64,
            step: 1,
        }),
        Key::Slice(slice) => {
            let (start, stop, step) = slice.indices(len)?;
            Ok(Selector::Slice { start, stop, step })
        }
        Key::Scalar(value) => match value.as_i64().filter(|_| value.is_integer()) {
            Some(pos) => Ok(Selector::SingleScalarPosition(pos)),
            None => Err(Error::InvalidKeyShape(format!(
                "positional indexer must be an integer, got {:?}",
                value
            ))),
        },
        Key::Mask(mask) => Ok(Selector::BooleanMask(mask.clone())),
        Key::List(values) if is_bool_list(values) => Ok(Selector::BooleanMask(
            values.iter().map(|v| v.as_bool().unwrap_or(false)).collect(),
        )),
        Key::List(values) => values
            .iter()
            .map(|v| {
                v.as_i64().filter(|_| v.is_integer()).ok_or_else(|| {
                    Error::InvalidKeyShape(format!("positional indexer must be an integer, got {:?}", v))
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Selector::PositionList),
        Key::Tuple(_) | Key::Labels(_) => Err(Error::InvalidKeyShape(
            "positional row indexer cannot be a tuple or label set".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::engine::HostEngine;
    use crate::index::Index;
    use crate::indexing::SliceKey;

    #[test]
    fn test_slice_positions_both_directions() {
        assert_eq!(slice_positions(0, 5, 2, 5), vec![0, 2, 4]);
        assert_eq!(slice_positions(4, -1, -2, 5), vec![4, 2, 0]);
        assert!(slice_positions(3, 1, 1, 5).is_empty());
    }

    #[test]
    fn test_scalar_position_out_of_range() {
        let engine = HostEngine::default();
        let table = Table::from_parts(
            vec!["a".into()],
            vec![Column::from(vec![1i64, 2, 3])],
            Index::range(3),
        )
        .unwrap();

        let last = select(&engine, &table, &Selector::SingleScalarPosition(-1)).unwrap();
        assert_eq!(last.n_rows(), 1);

        assert!(matches!(
            select(&engine, &table, &Selector::SingleScalarPosition(3)),
            Err(Error::IndexOutOfBounds { index: 3, size: 3 })
        ));
        assert!(matches!(
            select(&engine, &table, &Selector::PositionList(vec![0, -1])),
            Err(Error::IndexOutOfBounds { index: -1, .. })
        ));
    }

    #[test]
    fn test_iloc_selector_from_slice_key() {
        let key = Key::Slice(SliceKey::new(-2i64, 100i64));
        assert_eq!(
            iloc_selector(&key, 5).unwrap(),
            Selector::Slice {
                start: 3,
                stop: 5,
                step: 1
            }
        );
        assert!(iloc_selector(&Key::from("x"), 5).is_err());
    }
}
