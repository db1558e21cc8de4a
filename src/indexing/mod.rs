//! Label- and position-based selection (`.loc` / `.iloc`)
//!
//! Every request flows through the same stages: the key is classified once
//! into a [`Key`], resolved against the index into a positional [`Selector`],
//! executed by a [`ColumnarEngine`], and finally shaped into a scalar, a
//! [`Series`] or a [`DataFrame`].
//!
//! # Example
//!
//! ```ignore
//! use pandrs_indexing::{DataFrame, Column};
//!
//! let df = DataFrame::with_index(
//!     vec![("a", Column::from(vec![1i64, 2, 3]))],
//!     vec![10i64, 20, 30],
//! )?;
//! let rows = df.loc().get(pandrs_indexing::SliceKey::new(10i64, 20i64))?;
//! ```

mod columns;
mod frame;
mod key;
mod label;
mod multi_label;
mod mutate;
mod row_major;
mod rows;
mod series;
mod shape;

pub use frame::{DataFrameIlocIndexer, DataFrameLocIndexer};
pub use key::{Key, KeyKind, SliceKey};
pub use series::{SeriesIlocIndexer, SeriesLocIndexer};

pub(crate) use rows::slice_positions;

use lazy_static::lazy_static;

use crate::column::{Column, Scalar};
use crate::config::IndexingConfig;
use crate::dataframe::DataFrame;
use crate::engine::{ColumnarEngine, HostEngine};
use crate::series::Series;

lazy_static! {
    static ref DEFAULT_CONFIG: IndexingConfig = IndexingConfig::default();
    static ref DEFAULT_ENGINE: HostEngine = HostEngine::new(DEFAULT_CONFIG.engine.clone());
}

/// Engine and configuration used by one indexing call
#[derive(Debug, Clone, Copy)]
pub struct IndexingContext<'a> {
    pub engine: &'a dyn ColumnarEngine,
    pub config: &'a IndexingConfig,
}

impl<'a> IndexingContext<'a> {
    pub fn new(engine: &'a dyn ColumnarEngine, config: &'a IndexingConfig) -> Self {
        IndexingContext { engine, config }
    }
}

impl IndexingContext<'static> {
    /// Host engine with the default configuration
    pub fn global() -> Self {
        IndexingContext {
            engine: &*DEFAULT_ENGINE,
            config: &*DEFAULT_CONFIG,
        }
    }
}

impl Default for IndexingContext<'static> {
    fn default() -> Self {
        Self::global()
    }
}

/// Positional plan a label key resolves to
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Normalized `start:stop:step` positions
    Slice { start: i64, stop: i64, step: i64 },
    /// Keep rows where true
    BooleanMask(Vec<bool>),
    /// Rows at these positions, in order
    PositionList(Vec<i64>),
    /// One row; negative positions count from the end
    SingleScalarPosition(i64),
}

/// Result of a read
#[derive(Debug, Clone)]
pub enum Selection {
    Scalar(Scalar),
    Series(Series),
    DataFrame(DataFrame),
}

impl Selection {
    pub fn is_scalar(&self) -> bool {
        matches!(self, Selection::Scalar(_))
    }

    pub fn into_scalar(self) -> Option<Scalar> {
        match self {
            Selection::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_series(self) -> Option<Series> {
        match self {
            Selection::Series(series) => Some(series),
            _ => None,
        }
    }

    pub fn into_frame(self) -> Option<DataFrame> {
        match self {
            Selection::DataFrame(frame) => Some(frame),
            _ => None,
        }
    }
}

/// Right-hand side of an assignment
#[derive(Debug, Clone)]
pub enum Value {
    /// Broadcast to every selected cell
    Scalar(Scalar),
    /// One value per selected row, shared by every selected column
    Column(Column),
    /// Aligned to the target's index by label
    Series(Series),
    /// Two-dimensional value, one column per selected column
    Columns(Vec<Column>),
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Value::Scalar(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<Column> for Value {
    fn from(column: Column) -> Self {
        Value::Column(column)
    }
}

impl From<Series> for Value {
    fn from(series: Series) -> Self {
        Value::Series(series)
    }
}

impl From<Vec<Column>> for Value {
    fn from(columns: Vec<Column>) -> Self {
        Value::Columns(columns)
    }
}

impl From<Vec<i64>> for Value {
    fn from(values: Vec<i64>) -> Self {
        Value::Column(values.into())
    }
}

impl From<Vec<f64>> for Value {
    fn from(values: Vec<f64>) -> Self {
        Value::Column(values.into())
    }
}

impl From<Vec<bool>> for Value {
    fn from(values: Vec<bool>) -> Self {
        Value::Column(values.into())
    }
}

impl From<Vec<&str>> for Value {
    fn from(values: Vec<&str>) -> Self {
        Value::Column(values.into())
    }
}
