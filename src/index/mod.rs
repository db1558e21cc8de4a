mod multi_index;

pub use multi_index::MultiIndex;

use std::cmp::Ordering;

use crate::column::{Column, DataType, Scalar};
use crate::error::{Error, Result};

/// Single-level index
///
/// Represents the row labels of a DataFrame or Series. Labels are neither
/// required to be unique nor sorted.
#[derive(Debug, Clone)]
pub struct SingleIndex {
    /// Label values
    values: Column,

    /// Optional index name
    name: Option<String>,
}

impl SingleIndex {
    /// Create an unnamed index
    pub fn new(values: impl Into<Column>) -> Self {
        SingleIndex {
            values: values.into(),
            name: None,
        }
    }

    /// Create a named index
    pub fn with_name(values: impl Into<Column>, name: Option<String>) -> Self {
        SingleIndex {
            values: values.into(),
            name,
        }
    }

    /// Default `0..len` index
    pub fn range(len: usize) -> Self {
        SingleIndex::new((0..len as i64).collect::<Vec<i64>>())
    }

    /// Create an index from label scalars, inferring the type
    pub fn from_labels(labels: &[Scalar]) -> Result<Self> {
        Ok(SingleIndex::new(Column::infer(labels)?))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dtype(&self) -> DataType {
        self.values.data_type()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Label column
    pub fn values(&self) -> &Column {
        &self.values
    }

    /// Label at `pos`
    pub fn get(&self, pos: usize) -> Result<Scalar> {
        self.values.get(pos)
    }

    pub fn labels(&self) -> Vec<Scalar> {
        self.values.to_scalars()
    }

    /// Whether labels never decrease (an index with nulls is never monotonic)
    pub fn is_monotonic_increasing(&self) -> bool {
        self.is_monotonic_by(|ord| ord != Ordering::Greater)
    }

    /// Whether labels never increase
    pub fn is_monotonic_decreasing(&self) -> bool {
        self.is_monotonic_by(|ord| ord != Ordering::Less)
    }

    pub fn is_monotonic(&self) -> bool {
        self.is_monotonic_increasing() || self.is_monotonic_decreasing()
    }

    fn is_monotonic_by(&self, accept: impl Fn(Ordering) -> bool) -> bool {
        if self.values.null_count() > 0 {
            return false;
        }
        let labels = self.labels();
        labels
            .windows(2)
            .all(|w| w[0].compare(&w[1]).map_or(false, &accept))
    }

    /// Rows at `positions`
    pub fn take(&self, positions: &[usize]) -> Self {
        SingleIndex {
            values: self.values.take(positions),
            name: self.name.clone(),
        }
    }

    /// Same labels cast to `dtype`
    pub fn cast(&self, dtype: DataType) -> Result<Self> {
        Ok(SingleIndex {
            values: Column::from_scalars(dtype, &self.labels())?,
            name: self.name.clone(),
        })
    }
}

/// Row index of a table: single- or multi-level
#[derive(Debug, Clone)]
pub enum Index {
    /// Single-level index
    Single(SingleIndex),
    /// Multi-level index
    Multi(MultiIndex),
}

impl Index {
    /// Default `0..len` index
    pub fn range(len: usize) -> Self {
        Index::Single(SingleIndex::range(len))
    }

    pub fn len(&self) -> usize {
        match self {
            Index::Single(idx) => idx.len(),
            Index::Multi(idx) => idx.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Index::Multi(_))
    }

    pub fn n_levels(&self) -> usize {
        match self {
            Index::Single(_) => 1,
            Index::Multi(idx) => idx.n_levels(),
        }
    }

    /// Type of each level
    pub fn dtypes(&self) -> Vec<DataType> {
        match self {
            Index::Single(idx) => vec![idx.dtype()],
            Index::Multi(idx) => idx.dtypes(),
        }
    }

    /// Label columns of each level
    pub fn level_columns(&self) -> Vec<&Column> {
        match self {
            Index::Single(idx) => vec![idx.values()],
            Index::Multi(idx) => idx.levels().iter().collect(),
        }
    }

    /// Label tuple at `pos` (one entry per level)
    pub fn key_at(&self, pos: usize) -> Result<Vec<Scalar>> {
        match self {
            Index::Single(idx) => Ok(vec![idx.get(pos)?]),
            Index::Multi(idx) => idx.get_tuple(pos),
        }
    }

    /// Label at `pos` as a scalar; multi-level labels render as a tuple string
    pub fn label_at(&self, pos: usize) -> Result<Scalar> {
        match self {
            Index::Single(idx) => idx.get(pos),
            Index::Multi(idx) => {
                let parts: Vec<String> = idx.get_tuple(pos)?.iter().map(|s| s.to_string()).collect();
                Ok(Scalar::String(format!("({})", parts.join(", "))))
            }
        }
    }

    /// Rows at `positions`
    pub fn take(&self, positions: &[usize]) -> Index {
        match self {
            Index::Single(idx) => Index::Single(idx.take(positions)),
            Index::Multi(idx) => Index::Multi(idx.take(positions)),
        }
    }

    /// Rows at `positions`, `None` becoming a null label
    pub fn take_optional(&self, positions: &[Option<usize>]) -> Result<Index> {
        Ok(match self {
            Index::Single(idx) => Index::Single(SingleIndex::with_name(
                idx.values().take_optional(positions),
                idx.name.clone(),
            )),
            Index::Multi(idx) => Index::Multi(MultiIndex::from_arrays(
                idx.levels().iter().map(|l| l.take_optional(positions)).collect(),
                Some(idx.names().to_vec()),
            )?),
        })
    }

    /// Cast the labels of every level to `dtypes`
    pub fn cast(&self, dtypes: &[DataType]) -> Result<Index> {
        match self {
            Index::Single(idx) => match dtypes {
                [dtype] => Ok(Index::Single(idx.cast(*dtype)?)),
                _ => Err(Error::LengthMismatch {
                    expected: 1,
                    actual: dtypes.len(),
                }),
            },
            Index::Multi(idx) => Ok(Index::Multi(idx.cast_levels(dtypes)?)),
        }
    }

    /// Single-level view, failing on multi-level indexes
    pub fn as_single(&self) -> Result<&SingleIndex> {
        match self {
            Index::Single(idx) => Ok(idx),
            Index::Multi(_) => Err(Error::UnsupportedOperation(
                "operation requires a single-level index".into(),
            )),
        }
    }
}

impl From<SingleIndex> for Index {
    fn from(index: SingleIndex) -> Self {
        Index::Single(index)
    }
}

impl From<MultiIndex> for Index {
    fn from(index: MultiIndex) -> Self {
        Index::Multi(index)
    }
}

impl<T> From<Vec<T>> for Index
where
    Column: From<Vec<T>>,
{
    fn from(values: Vec<T>) -> Self {
        Index::Single(SingleIndex::new(values))
    }
}
