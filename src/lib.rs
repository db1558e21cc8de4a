#![allow(clippy::needless_lifetimes)]
#![allow(clippy::too_many_arguments)]

//! pandas-compatible `.loc` / `.iloc` indexing over columnar tables
//!
//! Label and position keys are resolved against a row index into positional
//! selectors, executed by a pluggable [`ColumnarEngine`], and shaped into a
//! scalar, a [`Series`] or a [`DataFrame`] following pandas' downcast rules.

pub mod column;
pub mod config;
pub mod dataframe;
pub mod engine;
pub mod error;
pub mod index;
pub mod indexing;
pub mod series;
pub mod table;

// Re-export commonly used types
pub use column::{Column, DataType, Scalar};
pub use config::{EngineConfig, IndexingConfig};
pub use dataframe::DataFrame;
pub use engine::{ColumnarEngine, HostEngine, JoinHow};
pub use error::{Error, Result};
pub use index::{Index, MultiIndex, SingleIndex};
pub use indexing::{IndexingContext, Key, KeyKind, Selection, Selector, SliceKey, Value};
pub use series::Series;
pub use table::{ColumnLabel, Table};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
