use std::fmt::Debug;
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::column::common::utils;
use crate::column::{DataType, Scalar};
use crate::error::{Error, Result};

/// Element type that can be stored in a [`TypedColumn`]
pub trait ColumnValue: Clone + Debug + Send + Sync + 'static {
    /// Logical type of columns holding this element
    const DATA_TYPE: DataType;

    /// Placeholder stored in null slots
    fn null_fill() -> Self;

    fn to_scalar(&self) -> Scalar;

    /// Extract the element from a scalar of exactly this type
    fn from_scalar(value: &Scalar) -> Option<Self>;
}

impl ColumnValue for bool {
    const DATA_TYPE: DataType = DataType::Boolean;

    fn null_fill() -> Self {
        false
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Boolean(*self)
    }

    fn from_scalar(value: &Scalar) -> Option<Self> {
        value.as_bool()
    }
}

impl ColumnValue for i64 {
    const DATA_TYPE: DataType = DataType::Int64;

    fn null_fill() -> Self {
        0
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Int64(*self)
    }

    fn from_scalar(value: &Scalar) -> Option<Self> {
        value.as_i64()
    }
}

impl ColumnValue for f64 {
    const DATA_TYPE: DataType = DataType::Float64;

    fn null_fill() -> Self {
        f64::NAN
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Float64(*self)
    }

    fn from_scalar(value: &Scalar) -> Option<Self> {
        match value {
            Scalar::Float64(v) => Some(*v),
            _ => None,
        }
    }
}

impl ColumnValue for String {
    const DATA_TYPE: DataType = DataType::Utf8;

    fn null_fill() -> Self {
        String::new()
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::String(self.clone())
    }

    fn from_scalar(value: &Scalar) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl ColumnValue for NaiveDateTime {
    const DATA_TYPE: DataType = DataType::Datetime;

    fn null_fill() -> Self {
        NaiveDateTime::MIN
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Datetime(*self)
    }

    fn from_scalar(value: &Scalar) -> Option<Self> {
        match value {
            Scalar::Datetime(dt) => Some(*dt),
            _ => None,
        }
    }
}

/// Nullable column of a single element type
///
/// Data is shared through `Arc`, so cloning a column and selecting whole
/// columns never copies buffers. A set bit in `null_mask` marks a null slot.
#[derive(Debug, Clone)]
pub struct TypedColumn<T: ColumnValue> {
    pub(crate) data: Arc<[T]>,
    pub(crate) null_mask: Option<Arc<[u8]>>,
}

/// Boolean column
pub type BooleanColumn = TypedColumn<bool>;
/// Int64 column
pub type Int64Column = TypedColumn<i64>;
/// Float64 column
pub type Float64Column = TypedColumn<f64>;
/// UTF-8 string column
pub type StringColumn = TypedColumn<String>;
/// Datetime column (naive, nanosecond resolution)
pub type DatetimeColumn = TypedColumn<NaiveDateTime>;

impl<T: ColumnValue> TypedColumn<T> {
    /// Create a column without nulls
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
        }
    }

    /// Create a column with an explicit null flag per slot
    pub fn with_nulls(data: Vec<T>, nulls: Vec<bool>) -> Self {
        let null_mask = if nulls.iter().any(|&is_null| is_null) {
            Some(utils::create_bitmask(&nulls))
        } else {
            None
        };

        Self {
            data: data.into(),
            null_mask,
        }
    }

    /// Create a column from optional values
    pub fn from_options(values: Vec<Option<T>>) -> Self {
        let nulls: Vec<bool> = values.iter().map(Option::is_none).collect();
        let data: Vec<T> = values
            .into_iter()
            .map(|v| v.unwrap_or_else(T::null_fill))
            .collect();
        Self::with_nulls(data, nulls)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the slot at `index` is null (the index must be in range)
    pub fn is_null(&self, index: usize) -> bool {
        match &self.null_mask {
            Some(mask) => {
                let byte_idx = index / 8;
                let bit_idx = index % 8;
                byte_idx < mask.len() && (mask[byte_idx] & (1 << bit_idx)) != 0
            }
            None => false,
        }
    }

    pub fn null_count(&self) -> usize {
        match &self.null_mask {
            Some(_) => (0..self.len()).filter(|&i| self.is_null(i)).count(),
            None => 0,
        }
    }

    /// Get the value at `index`
    pub fn get(&self, index: usize) -> Result<Option<&T>> {
        if index >= self.data.len() {
            return Err(Error::IndexOutOfBounds {
                index: index as i64,
                size: self.data.len(),
            });
        }

        if self.is_null(index) {
            return Ok(None);
        }

        Ok(Some(&self.data[index]))
    }

    /// Raw buffer, including the fill values of null slots
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| if self.is_null(i) { None } else { Some(v) })
    }

    /// Rows at `positions`; positions must be in range
    pub fn take(&self, positions: &[usize]) -> Self {
        let data: Vec<T> = positions.iter().map(|&p| self.data[p].clone()).collect();
        match self.null_mask {
            Some(_) => {
                let nulls: Vec<bool> = positions.iter().map(|&p| self.is_null(p)).collect();
                Self::with_nulls(data, nulls)
            }
            None => Self::new(data),
        }
    }

    /// Rows at `positions`, with `None` producing a null slot
    pub fn take_optional(&self, positions: &[Option<usize>]) -> Self {
        let values = positions
            .iter()
            .map(|p| p.and_then(|p| if self.is_null(p) { None } else { Some(self.data[p].clone()) }))
            .collect();
        Self::from_options(values)
    }

    /// Build a column from scalars that already have this column's type
    pub fn from_scalars(values: &[Scalar]) -> Result<Self> {
        let mut options = Vec::with_capacity(values.len());
        for value in values {
            if value.is_null() {
                options.push(None);
                continue;
            }
            let cast = value.cast(T::DATA_TYPE)?;
            let element = T::from_scalar(&cast).ok_or(Error::Cast {
                from: value.data_type().unwrap_or(T::DATA_TYPE),
                to: T::DATA_TYPE,
            })?;
            options.push(Some(element));
        }
        Ok(Self::from_options(options))
    }
}
