//! Typed nullable columns and scalar values

mod common;
mod scalar;
mod typed;

pub use common::{utils, Column, DataType};
pub use scalar::Scalar;
pub(crate) use scalar::parse_datetime;
pub use typed::{
    BooleanColumn, ColumnValue, DatetimeColumn, Float64Column, Int64Column, StringColumn,
    TypedColumn,
};
