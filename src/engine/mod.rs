//! Columnar execution engine contract
//!
//! The indexing layer never touches column buffers directly for row
//! selection; it asks a [`ColumnarEngine`] to slice, gather, mask, join and
//! sort. Production deployments plug in a device engine; [`HostEngine`] is the
//! host-memory implementation used by default.

mod host;
mod join;

pub use host::HostEngine;

use std::fmt::Debug;

use crate::column::{Column, DataType, Scalar};
use crate::error::{Error, Result};
use crate::index::SingleIndex;
use crate::table::{ColumnLabel, Table};

/// Join type for [`ColumnarEngine::join`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinHow {
    /// Only rows whose index key exists on both sides
    Inner,
    /// Every left row; unmatched rows get null right-hand columns
    Left,
}

/// Capabilities the selection layer needs from a columnar engine
pub trait ColumnarEngine: Debug + Send + Sync {
    /// Rows of a normalized slice: `start`, `start + step`, ... stopping before `stop`
    ///
    /// Bounds follow Python's `slice.indices` normalization: for a positive step
    /// `0 <= start, stop <= len`; for a negative step `-1 <= start, stop < len`.
    fn slice(&self, table: &Table, start: i64, stop: i64, step: i64) -> Result<Table>;

    /// Rows at `positions`, in order, repeats allowed
    fn gather(&self, table: &Table, positions: &[usize]) -> Result<Table>;

    /// Rows where `mask` is true, order preserved
    fn boolean_mask(&self, table: &Table, mask: &[bool]) -> Result<Table>;

    /// Equality join on the index keys of both tables
    ///
    /// The result is indexed by the left keys and holds the left columns followed
    /// by the right columns. Output row order is unspecified.
    fn join(&self, left: &Table, right: &Table, how: JoinHow) -> Result<Table>;

    /// Stable ascending sort by the column labelled `by` (nulls last)
    fn sort_values(&self, table: &Table, by: &ColumnLabel) -> Result<Table>;

    /// Half-open position range of the labels between `start` and `stop`
    /// inclusive; a missing bound extends to the corresponding end
    fn find_label_range(
        &self,
        index: &SingleIndex,
        start: Option<&Scalar>,
        stop: Option<&Scalar>,
    ) -> Result<(usize, usize)>;

    /// First position holding `label`
    ///
    /// With `closest` on a monotonic increasing index, the first position whose
    /// label is not less than `label` is returned instead of failing.
    fn find_first_value(&self, index: &SingleIndex, label: &Scalar, closest: bool) -> Result<usize>;

    /// Last position holding `label`
    fn find_last_value(&self, index: &SingleIndex, label: &Scalar, closest: bool) -> Result<usize>;

    /// Convert `column` to `dtype`
    fn cast(&self, column: &Column, dtype: DataType) -> Result<Column>;

    /// Widest common type of `types`
    fn common_type(&self, types: &[DataType]) -> Result<DataType> {
        DataType::common(types).ok_or_else(|| Error::NoCommonType(types.to_vec()))
    }

    /// Concatenate columns of the same type
    fn concat_columns(&self, columns: &[Column]) -> Result<Column>;

    /// Copy of `column` with `values` written at `positions`
    ///
    /// `values` holds one value per position, or a single value broadcast to
    /// every position.
    fn scatter(&self, column: &Column, positions: &[usize], values: &Column) -> Result<Column>;
}
