//! Label key resolution on a single-level index

use std::cmp::Ordering;

use crate::column::{DataType, Scalar};
use crate::error::{Error, Result};
use crate::index::{Index, SingleIndex};
use crate::indexing::key::{is_bool_list, Key, SliceKey};
use crate::indexing::multi_label;
use crate::indexing::{IndexingContext, Selector};

/// Resolve a `.loc` key against `index` into a positional selector
pub(crate) fn resolve(ctx: IndexingContext<'_>, index: &SingleIndex, key: &Key) -> Result<Selector> {
    match key {
        Key::All => Ok(Selector::Slice {
            start: 0,
            stop: index.len() as i64,
            step: 1,
        }),
        Key::Scalar(label) => resolve_scalar(ctx, index, label),
        Key::Slice(slice) => label_range_or_mask(ctx, index, slice),
        Key::Mask(mask) => check_mask(mask.clone(), index.len()),
        Key::List(values) if is_bool_list(values) => check_mask(
            values.iter().map(|v| v.as_bool().unwrap_or(false)).collect(),
            index.len(),
        ),
        Key::List(values) => {
            let labels = Index::Single(SingleIndex::from_labels(values)?);
            resolve_labels(ctx, index, &labels)
        }
        Key::Labels(labels) => resolve_labels(ctx, index, labels),
        Key::Tuple(_) => Err(Error::InvalidKeyShape(
            "too many indexers for a single-level index".into(),
        )),
    }
}

fn resolve_scalar(ctx: IndexingContext<'_>, index: &SingleIndex, label: &Scalar) -> Result<Selector> {
    if ctx.config.integer_position_fallback && label.is_integer() && !index.dtype().is_numeric() {
        let pos = label.as_i64().unwrap_or_default();
        log::debug!(
            "integer key {} on a {:?} index treated as a position",
            pos,
            index.dtype()
        );
        return Ok(Selector::SingleScalarPosition(pos));
    }
    let pos = ctx.engine.find_first_value(index, label, false)?;
    Ok(Selector::SingleScalarPosition(pos as i64))
}

fn check_mask(mask: Vec<bool>, len: usize) -> Result<Selector> {
    if mask.len() != len {
        return Err(Error::ShapeMismatch(format!(
            "boolean mask of length {} does not match index of length {}",
            mask.len(),
            len
        )));
    }
    Ok(Selector::BooleanMask(mask))
}

/// Positions of every label in `labels`, in request order
fn resolve_labels(ctx: IndexingContext<'_>, index: &SingleIndex, labels: &Index) -> Result<Selector> {
    let target = Index::Single(index.clone());
    let found = multi_label::resolve_many(ctx.engine, &target, labels)?;
    multi_label::require_all(found, labels).map(Selector::PositionList)
}

/// Selector for a label slice
///
/// A non-monotonic datetime index cannot be searched for a contiguous range,
/// so those slices become a mask of labels between the bounds. Every other
/// index goes through the engine's label range search.
pub(crate) fn label_range_or_mask(
    ctx: IndexingContext<'_>,
    index: &SingleIndex,
    slice: &SliceKey,
) -> Result<Selector> {
    let bounded = slice.start.is_some() || slice.stop.is_some();
    if bounded
        && ctx.config.temporal_mask_fallback
        && index.dtype().is_temporal()
        && !index.is_monotonic_increasing()
    {
        return temporal_mask(index, slice);
    }

    let step = slice.step.unwrap_or(1);
    if step == 0 {
        return Err(Error::InvalidKeyShape("slice step cannot be zero".into()));
    }
    if step > 0 {
        let (start, stop) =
            ctx.engine
                .find_label_range(index, slice.start.as_ref(), slice.stop.as_ref())?;
        Ok(Selector::Slice {
            start: start as i64,
            stop: stop as i64,
            step,
        })
    } else {
        // a reversed slice walks the range between its bounds backwards
        let (low, high) =
            ctx.engine
                .find_label_range(index, slice.stop.as_ref(), slice.start.as_ref())?;
        Ok(Selector::Slice {
            start: high as i64 - 1,
            stop: low as i64 - 1,
            step,
        })
    }
}

fn temporal_mask(index: &SingleIndex, slice: &SliceKey) -> Result<Selector> {
    let start = slice.start.as_ref().map(|s| s.cast(DataType::Datetime)).transpose()?;
    let stop = slice.stop.as_ref().map(|s| s.cast(DataType::Datetime)).transpose()?;
    if let (Some(start), Some(stop)) = (&start, &stop) {
        if start.compare(stop) == Some(Ordering::Greater) {
            return Ok(Selector::Slice {
                start: 0,
                stop: 0,
                step: 1,
            });
        }
    }

    log::debug!("label slice on a non-monotonic datetime index resolved with a mask");
    let mask = index
        .labels()
        .iter()
        .map(|label| {
            !label.is_null()
                && start
                    .as_ref()
                    .map_or(true, |s| label.compare(s) != Some(Ordering::Less))
                && stop
                    .as_ref()
                    .map_or(true, |s| label.compare(s) != Some(Ordering::Greater))
        })
        .collect();
    Ok(Selector::BooleanMask(mask))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::parse_datetime;

    fn datetimes(values: &[&str]) -> SingleIndex {
        SingleIndex::new(
            values
                .iter()
                .map(|v| parse_datetime(v).unwrap())
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_label_slice_on_sorted_index() {
        let ctx = IndexingContext::global();
        let index = SingleIndex::new(vec![10i64, 20, 30]);
        let selector = label_range_or_mask(ctx, &index, &SliceKey::new(10i64, 20i64)).unwrap();
        assert_eq!(
            selector,
            Selector::Slice {
                start: 0,
                stop: 2,
                step: 1
            }
        );
    }

    #[test]
    fn test_unsorted_datetime_slice_uses_mask() {
        let ctx = IndexingContext::global();
        let index = datetimes(&["2020-01-03", "2020-01-01", "2020-01-02"]);
        let slice = SliceKey::new("2020-01-01", "2020-01-02");
        assert_eq!(
            label_range_or_mask(ctx, &index, &slice).unwrap(),
            Selector::BooleanMask(vec![false, true, true])
        );

        let reversed = SliceKey::new("2020-01-02", "2020-01-01");
        assert_eq!(
            label_range_or_mask(ctx, &index, &reversed).unwrap(),
            Selector::Slice {
                start: 0,
                stop: 0,
                step: 1
            }
        );
    }

    #[test]
    fn test_integer_key_on_string_index_is_positional() {
        let ctx = IndexingContext::global();
        let index = SingleIndex::new(vec!["a", "b"]);
        assert_eq!(
            resolve(ctx, &index, &Key::from(1i64)).unwrap(),
            Selector::SingleScalarPosition(1)
        );
        assert_eq!(
            resolve(ctx, &index, &Key::from("b")).unwrap(),
            Selector::SingleScalarPosition(1)
        );
    }

    #[test]
    fn test_mask_length_checked() {
        let ctx = IndexingContext::global();
        let index = SingleIndex::new(vec![1i64, 2, 3]);
        assert!(matches!(
            resolve(ctx, &index, &Key::from(vec![true, false])),
            Err(Error::ShapeMismatch(_))
        ));
    }
}
