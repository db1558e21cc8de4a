//! Indexing keys and their up-front classification

use std::ops::{Range, RangeFull};

use crate::column::Scalar;
use crate::error::{Error, Result};
use crate::index::{Index, MultiIndex};
use crate::indexing::columns;
use crate::table::Table;

/// Python-style slice of labels or positions
#[derive(Debug, Clone, PartialEq)]
pub struct SliceKey {
    pub start: Option<Scalar>,
    pub stop: Option<Scalar>,
    pub step: Option<i64>,
}

impl SliceKey {
    pub fn new(start: impl Into<Scalar>, stop: impl Into<Scalar>) -> Self {
        SliceKey {
            start: Some(start.into()),
            stop: Some(stop.into()),
            step: None,
        }
    }

    /// `slice(start, None)`
    pub fn from_start(start: impl Into<Scalar>) -> Self {
        SliceKey {
            start: Some(start.into()),
            stop: None,
            step: None,
        }
    }

    /// `slice(None, stop)`
    pub fn until(stop: impl Into<Scalar>) -> Self {
        SliceKey {
            start: None,
            stop: Some(stop.into()),
            step: None,
        }
    }

    /// `slice(None)`
    pub fn full() -> Self {
        SliceKey {
            start: None,
            stop: None,
            step: None,
        }
    }

    pub fn with_step(mut self, step: i64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn is_full(&self) -> bool {
        self.start.is_none() && self.stop.is_none() && self.step.map_or(true, |s| s == 1)
    }

    /// Normalize integer bounds against `len` like Python's `slice.indices`
    pub fn indices(&self, len: usize) -> Result<(i64, i64, i64)> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(Error::InvalidKeyShape("slice step cannot be zero".into()));
        }

        let len = len as i64;
        let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };
        let clamp = |bound: &Option<Scalar>, default: i64| -> Result<i64> {
            let value = match bound {
                None => return Ok(default),
                Some(Scalar::Int64(v)) => *v,
                Some(other) => {
                    return Err(Error::InvalidKeyShape(format!(
                        "positional slice bound must be an integer, got {:?}",
                        other
                    )))
                }
            };
            Ok(if value < 0 {
                (value + len).max(lower)
            } else {
                value.min(upper)
            })
        };

        let start = clamp(&self.start, if step < 0 { upper } else { lower })?;
        let stop = clamp(&self.stop, if step < 0 { lower } else { upper })?;
        Ok((start, stop, step))
    }
}

/// Indexing argument
///
/// A raw `.loc` / `.iloc` argument, classified once into one of these shapes
/// and pattern-matched from then on.
#[derive(Debug, Clone)]
pub enum Key {
    /// Every row or column (`slice(None)`, `:`)
    All,
    /// A single label or position
    Scalar(Scalar),
    /// A label or position slice
    Slice(SliceKey),
    /// Boolean mask
    Mask(Vec<bool>),
    /// Sequence of labels or positions
    List(Vec<Scalar>),
    /// Tuple: `(row, column)` or per-level components of a multi-level label
    Tuple(Vec<Key>),
    /// Index-like label set (e.g. a MultiIndex of wanted tuples)
    Labels(Index),
}

/// Shape class of a key, as used by the downcast rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Scalar,
    Slice,
    Mask,
    ListLike,
    /// Tuple with a slice component
    SlicedTuple,
}

impl KeyKind {
    pub fn is_list_like(self) -> bool {
        matches!(self, KeyKind::Mask | KeyKind::ListLike | KeyKind::SlicedTuple)
    }
}

impl Key {
    /// Build a label set from tuples, like a `pandas.MultiIndex` argument
    pub fn tuples(tuples: Vec<Vec<Scalar>>) -> Result<Key> {
        Ok(Key::Labels(Index::Multi(MultiIndex::from_tuples(tuples, None)?)))
    }

    pub fn kind(&self) -> KeyKind {
        match self {
            Key::Scalar(_) => KeyKind::Scalar,
            Key::All | Key::Slice(_) => KeyKind::Slice,
            Key::Mask(_) => KeyKind::Mask,
            Key::List(values) if is_bool_list(values) => KeyKind::Mask,
            Key::List(_) | Key::Labels(_) => KeyKind::ListLike,
            Key::Tuple(parts) => {
                if parts.iter().any(|p| p.kind() == KeyKind::Slice) {
                    KeyKind::SlicedTuple
                } else if parts.iter().all(|p| matches!(p, Key::Scalar(_))) {
                    KeyKind::Scalar
                } else {
                    KeyKind::ListLike
                }
            }
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Key::Scalar(_))
    }

    /// Components of an all-scalar tuple
    pub(crate) fn scalar_parts(&self) -> Option<Vec<&Scalar>> {
        match self {
            Key::Tuple(parts) => parts
                .iter()
                .map(|p| match p {
                    Key::Scalar(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }
}

pub(crate) fn is_bool_list(values: &[Scalar]) -> bool {
    !values.is_empty() && values.iter().all(|v| matches!(v, Scalar::Boolean(_)))
}

/// Split a DataFrame `.loc` argument into `(row, column)` keys
///
/// A non-tuple key selects rows over all columns. On a multi-level row index a
/// tuple is ambiguous: it is a `(row, column)` pair only when its second element
/// resolves against the columns, and a whole-row label otherwise. A single-level
/// row index holds no tuple labels, so there a 2-tuple is always `(row, column)`
/// even over multi-level columns.
pub(crate) fn split_label_key(key: Key, table: &Table) -> Result<(Key, Key)> {
    match key {
        Key::Tuple(mut parts) if table.index().is_multi() => {
            if parts.len() == 2 && columns::label_positions(table, &parts[1]).is_ok() {
                let col = parts.pop().unwrap_or(Key::All);
                let row = parts.pop().unwrap_or(Key::All);
                log::debug!("multi-index key split into row {:?} and column {:?}", row, col);
                Ok((row, col))
            } else {
                log::debug!("multi-index key used as a whole-row label");
                Ok((Key::Tuple(parts), Key::All))
            }
        }
        other => split_pair(other),
    }
}

/// Split a DataFrame `.iloc` argument into `(row, column)` keys
pub(crate) fn split_position_key(key: Key) -> Result<(Key, Key)> {
    split_pair(key)
}

fn split_pair(key: Key) -> Result<(Key, Key)> {
    match key {
        Key::Tuple(parts) if parts.len() == 2 => {
            let mut parts = parts.into_iter();
            let row = parts.next().unwrap_or(Key::All);
            let col = parts.next().unwrap_or(Key::All);
            Ok((row, col))
        }
        Key::Tuple(parts) => Err(Error::InvalidKeyShape(format!(
            "too many indexers: expected (row, column), got {} elements",
            parts.len()
        ))),
        other => Ok((other, Key::All)),
    }
}

impl From<Scalar> for Key {
    fn from(value: Scalar) -> Self {
        Key::Scalar(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Scalar(value.into())
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::Scalar(value.into())
    }
}

impl From<f64> for Key {
    fn from(value: f64) -> Self {
        Key::Scalar(value.into())
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Scalar(value.into())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Scalar(value.into())
    }
}

impl From<chrono::NaiveDateTime> for Key {
    fn from(value: chrono::NaiveDateTime) -> Self {
        Key::Scalar(value.into())
    }
}

impl From<SliceKey> for Key {
    fn from(value: SliceKey) -> Self {
        if value.is_full() {
            Key::All
        } else {
            Key::Slice(value)
        }
    }
}

impl From<Range<i64>> for Key {
    fn from(range: Range<i64>) -> Self {
        Key::Slice(SliceKey::new(range.start, range.end))
    }
}

impl From<RangeFull> for Key {
    fn from(_: RangeFull) -> Self {
        Key::All
    }
}

impl From<Vec<bool>> for Key {
    fn from(mask: Vec<bool>) -> Self {
        Key::Mask(mask)
    }
}

impl From<Vec<Scalar>> for Key {
    fn from(values: Vec<Scalar>) -> Self {
        Key::List(values)
    }
}

impl From<Vec<i64>> for Key {
    fn from(values: Vec<i64>) -> Self {
        Key::List(values.into_iter().map(Scalar::from).collect())
    }
}

impl From<Vec<i32>> for Key {
    fn from(values: Vec<i32>) -> Self {
        Key::List(values.into_iter().map(Scalar::from).collect())
    }
}

impl From<Vec<f64>> for Key {
    fn from(values: Vec<f64>) -> Self {
        Key::List(values.into_iter().map(Scalar::from).collect())
    }
}

impl From<Vec<&str>> for Key {
    fn from(values: Vec<&str>) -> Self {
        Key::List(values.into_iter().map(Scalar::from).collect())
    }
}

impl From<Vec<String>> for Key {
    fn from(values: Vec<String>) -> Self {
        Key::List(values.into_iter().map(Scalar::from).collect())
    }
}

impl From<Index> for Key {
    fn from(index: Index) -> Self {
        Key::Labels(index)
    }
}

impl From<MultiIndex> for Key {
    fn from(index: MultiIndex) -> Self {
        Key::Labels(Index::Multi(index))
    }
}

impl<A: Into<Key>, B: Into<Key>> From<(A, B)> for Key {
    fn from((a, b): (A, B)) -> Self {
        Key::Tuple(vec![a.into(), b.into()])
    }
}

impl<A: Into<Key>, B: Into<Key>, C: Into<Key>> From<(A, B, C)> for Key {
    fn from((a, b, c): (A, B, C)) -> Self {
        Key::Tuple(vec![a.into(), b.into(), c.into()])
    }
}
