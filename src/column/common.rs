use serde::{Deserialize, Serialize};

use crate::column::typed::{
    BooleanColumn, ColumnValue, DatetimeColumn, Float64Column, Int64Column, StringColumn,
    TypedColumn,
};
use crate::column::Scalar;
use crate::error::{Error, Result};

/// Logical type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Int64,
    Float64,
    Utf8,
    Datetime,
}

impl DataType {
    /// Numeric in the pandas sense, booleans included
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Boolean | DataType::Int64 | DataType::Float64)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, DataType::Datetime)
    }

    /// Narrowest type both `self` and `other` cast to without loss
    pub fn common_with(&self, other: DataType) -> Option<DataType> {
        use DataType::*;
        match (*self, other) {
            (a, b) if a == b => Some(a),
            (Boolean, Int64) | (Int64, Boolean) => Some(Int64),
            (Boolean, Float64) | (Float64, Boolean) => Some(Float64),
            (Int64, Float64) | (Float64, Int64) => Some(Float64),
            _ => None,
        }
    }

    /// Common type of every entry of `types`
    pub fn common(types: &[DataType]) -> Option<DataType> {
        let (first, rest) = types.split_first()?;
        rest.iter()
            .try_fold(*first, |acc, dt| acc.common_with(*dt))
    }
}

/// Column of any supported type
#[derive(Debug, Clone)]
pub enum Column {
    Boolean(BooleanColumn),
    Int64(Int64Column),
    Float64(Float64Column),
    String(StringColumn),
    Datetime(DatetimeColumn),
}

/// Bitmask helpers shared by the typed columns
pub mod utils {
    use std::sync::Arc;

    /// Create a bitmask from per-slot null flags
    pub fn create_bitmask(nulls: &[bool]) -> Arc<[u8]> {
        let length = nulls.len();
        let bytes_needed = (length + 7) / 8;
        let mut data = vec![0u8; bytes_needed];

        for (i, &is_null) in nulls.iter().enumerate() {
            if is_null {
                let byte_idx = i / 8;
                let bit_idx = i % 8;
                data[byte_idx] |= 1 << bit_idx;
            }
        }

        data.into()
    }
}

macro_rules! each_column {
    ($column:expr, $col:ident => $body:expr) => {
        match $column {
            Column::Boolean($col) => $body,
            Column::Int64($col) => $body,
            Column::Float64($col) => $body,
            Column::String($col) => $body,
            Column::Datetime($col) => $body,
        }
    };
}

macro_rules! map_column {
    ($column:expr, $col:ident => $body:expr) => {
        match $column {
            Column::Boolean($col) => Column::Boolean($body),
            Column::Int64($col) => Column::Int64($body),
            Column::Float64($col) => Column::Float64($body),
            Column::String($col) => Column::String($body),
            Column::Datetime($col) => Column::Datetime($body),
        }
    };
}

impl Column {
    pub fn len(&self) -> usize {
        each_column!(self, col => col.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Column::Boolean(_) => DataType::Boolean,
            Column::Int64(_) => DataType::Int64,
            Column::Float64(_) => DataType::Float64,
            Column::String(_) => DataType::Utf8,
            Column::Datetime(_) => DataType::Datetime,
        }
    }

    pub fn null_count(&self) -> usize {
        each_column!(self, col => col.null_count())
    }

    pub fn is_null(&self, index: usize) -> bool {
        each_column!(self, col => col.is_null(index))
    }

    /// Value at `index` as a scalar
    pub fn get(&self, index: usize) -> Result<Scalar> {
        each_column!(self, col => Ok(col.get(index)?.map_or(Scalar::Null, |v| v.to_scalar())))
    }

    /// Every value as a scalar, nulls included
    pub fn to_scalars(&self) -> Vec<Scalar> {
        each_column!(self, col => col
            .iter()
            .map(|v| v.map_or(Scalar::Null, |v| v.to_scalar()))
            .collect())
    }

    /// Rows at `positions`; callers check bounds
    pub fn take(&self, positions: &[usize]) -> Column {
        map_column!(self, col => col.take(positions))
    }

    /// Rows at `positions`, `None` becoming null
    pub fn take_optional(&self, positions: &[Option<usize>]) -> Column {
        map_column!(self, col => col.take_optional(positions))
    }

    /// Build a column of type `dtype` from scalars, casting each value
    pub fn from_scalars(dtype: DataType, values: &[Scalar]) -> Result<Column> {
        Ok(match dtype {
            DataType::Boolean => Column::Boolean(TypedColumn::from_scalars(values)?),
            DataType::Int64 => Column::Int64(TypedColumn::from_scalars(values)?),
            DataType::Float64 => Column::Float64(TypedColumn::from_scalars(values)?),
            DataType::Utf8 => Column::String(TypedColumn::from_scalars(values)?),
            DataType::Datetime => Column::Datetime(TypedColumn::from_scalars(values)?),
        })
    }

    /// Build a column inferring the type from the first non-null value
    ///
    /// All values must share a common type; an all-null input becomes Float64
    /// the way pandas stores missing values.
    pub fn infer(values: &[Scalar]) -> Result<Column> {
        let types: Vec<DataType> = values.iter().filter_map(Scalar::data_type).collect();
        let dtype = if types.is_empty() {
            DataType::Float64
        } else {
            DataType::common(&types).ok_or(Error::NoCommonType(types))?
        };
        Column::from_scalars(dtype, values)
    }

    /// Column of `len` copies of `value`
    pub fn full(dtype: DataType, value: &Scalar, len: usize) -> Result<Column> {
        Column::from_scalars(dtype, &vec![value.clone(); len])
    }

    /// Whether the column is a boolean mask without nulls
    pub fn as_mask(&self) -> Option<Vec<bool>> {
        match self {
            Column::Boolean(col) if col.null_count() == 0 => Some(col.data().to_vec()),
            _ => None,
        }
    }
}

impl From<BooleanColumn> for Column {
    fn from(col: BooleanColumn) -> Self {
        Column::Boolean(col)
    }
}

impl From<Int64Column> for Column {
    fn from(col: Int64Column) -> Self {
        Column::Int64(col)
    }
}

impl From<Float64Column> for Column {
    fn from(col: Float64Column) -> Self {
        Column::Float64(col)
    }
}

impl From<StringColumn> for Column {
    fn from(col: StringColumn) -> Self {
        Column::String(col)
    }
}

impl From<DatetimeColumn> for Column {
    fn from(col: DatetimeColumn) -> Self {
        Column::Datetime(col)
    }
}

impl From<Vec<bool>> for Column {
    fn from(values: Vec<bool>) -> Self {
        Column::Boolean(TypedColumn::new(values))
    }
}

impl From<Vec<i64>> for Column {
    fn from(values: Vec<i64>) -> Self {
        Column::Int64(TypedColumn::new(values))
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::Float64(TypedColumn::new(values))
    }
}

impl From<Vec<String>> for Column {
    fn from(values: Vec<String>) -> Self {
        Column::String(TypedColumn::new(values))
    }
}

impl From<Vec<&str>> for Column {
    fn from(values: Vec<&str>) -> Self {
        Column::String(TypedColumn::new(values.into_iter().map(str::to_string).collect()))
    }
}

impl From<Vec<chrono::NaiveDateTime>> for Column {
    fn from(values: Vec<chrono::NaiveDateTime>) -> Self {
        Column::Datetime(TypedColumn::new(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_type_widening() {
        assert_eq!(
            DataType::common(&[DataType::Boolean, DataType::Int64]),
            Some(DataType::Int64)
        );
        assert_eq!(
            DataType::common(&[DataType::Int64, DataType::Float64, DataType::Boolean]),
            Some(DataType::Float64)
        );
        assert_eq!(DataType::common(&[DataType::Int64, DataType::Utf8]), None);
    }

    #[test]
    fn test_take_optional_produces_nulls() {
        let col = Column::from(vec![10i64, 20, 30]);
        let taken = col.take_optional(&[Some(2), None, Some(0)]);
        assert_eq!(
            taken.to_scalars(),
            vec![Scalar::Int64(30), Scalar::Null, Scalar::Int64(10)]
        );
        assert_eq!(taken.null_count(), 1);
    }

    #[test]
    fn test_infer_widens_mixed_numbers() {
        let col = Column::infer(&[Scalar::Int64(1), Scalar::Float64(2.5), Scalar::Null]).unwrap();
        assert_eq!(col.data_type(), DataType::Float64);
        assert!(col.is_null(2));
    }
}
