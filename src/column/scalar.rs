use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::column::DataType;
use crate::error::{Error, Result};

/// Formats accepted when coercing strings to datetimes
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// A single nullable cell value
///
/// Scalars are used as labels, keys and values. They hash and compare so that
/// they can serve as join keys: `Int64` and `Float64` compare numerically and
/// floats compare equal to themselves even when NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Boolean(bool),
    Int64(i64),
    Float64(f64),
    String(String),
    Datetime(NaiveDateTime),
}

impl Scalar {
    /// Type of the value, `None` for null
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Scalar::Null => None,
            Scalar::Boolean(_) => Some(DataType::Boolean),
            Scalar::Int64(_) => Some(DataType::Int64),
            Scalar::Float64(_) => Some(DataType::Float64),
            Scalar::String(_) => Some(DataType::Utf8),
            Scalar::Datetime(_) => Some(DataType::Datetime),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Whether this is an integer value (booleans are not integers here)
    pub fn is_integer(&self) -> bool {
        matches!(self, Scalar::Int64(_))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int64(v) => v.to_f64(),
            Scalar::Float64(v) => Some(*v),
            Scalar::Boolean(v) => Some(if *v { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert the value to `to`
    ///
    /// Float to integer casts only succeed for integral values.
    pub fn cast(&self, to: DataType) -> Result<Scalar> {
        let from = match self.data_type() {
            None => return Ok(Scalar::Null),
            Some(dt) if dt == to => return Ok(self.clone()),
            Some(dt) => dt,
        };
        let failed = || Error::Cast { from, to };

        let cast = match (self, to) {
            (Scalar::Boolean(b), DataType::Int64) => Scalar::Int64(*b as i64),
            (Scalar::Boolean(b), DataType::Float64) => Scalar::Float64(if *b { 1.0 } else { 0.0 }),
            (Scalar::Int64(v), DataType::Float64) => Scalar::Float64(v.to_f64().ok_or_else(failed)?),
            (Scalar::Int64(v), DataType::Boolean) => match v {
                0 => Scalar::Boolean(false),
                1 => Scalar::Boolean(true),
                _ => return Err(failed()),
            },
            (Scalar::Int64(v), DataType::Datetime) => {
                let secs = v.div_euclid(1_000_000_000);
                let nanos = v.rem_euclid(1_000_000_000) as u32;
                let dt = DateTime::from_timestamp(secs, nanos).ok_or_else(failed)?;
                Scalar::Datetime(dt.naive_utc())
            }
            (Scalar::Float64(v), DataType::Int64) => {
                if v.fract() != 0.0 {
                    return Err(failed());
                }
                Scalar::Int64(v.to_i64().ok_or_else(failed)?)
            }
            (Scalar::Float64(v), DataType::Boolean) if *v == 0.0 || *v == 1.0 => {
                Scalar::Boolean(*v == 1.0)
            }
            (Scalar::Datetime(dt), DataType::Int64) => {
                Scalar::Int64(dt.and_utc().timestamp_nanos_opt().ok_or_else(failed)?)
            }
            (Scalar::String(s), DataType::Int64) => {
                Scalar::Int64(s.trim().parse::<i64>().map_err(|_| failed())?)
            }
            (Scalar::String(s), DataType::Float64) => {
                Scalar::Float64(s.trim().parse::<f64>().map_err(|_| failed())?)
            }
            (Scalar::String(s), DataType::Boolean) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Scalar::Boolean(true),
                "false" => Scalar::Boolean(false),
                _ => return Err(failed()),
            },
            (Scalar::String(s), DataType::Datetime) => {
                Scalar::Datetime(parse_datetime(s).ok_or_else(failed)?)
            }
            (value, DataType::Utf8) => Scalar::String(value.to_string()),
            _ => return Err(failed()),
        };
        Ok(cast)
    }

    /// Ordering between comparable values
    ///
    /// Mixed Int64/Float64 compare numerically. Nulls and values of unrelated
    /// types are unordered.
    pub fn compare(&self, other: &Scalar) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Boolean(a), Scalar::Boolean(b)) => Some(a.cmp(b)),
            (Scalar::Int64(a), Scalar::Int64(b)) => Some(a.cmp(b)),
            (Scalar::String(a), Scalar::String(b)) => Some(a.cmp(b)),
            (Scalar::Datetime(a), Scalar::Datetime(b)) => Some(a.cmp(b)),
            (Scalar::Float64(a), Scalar::Float64(b)) => a.partial_cmp(b),
            (Scalar::Int64(a), Scalar::Float64(b)) => (*a as f64).partial_cmp(b),
            (Scalar::Float64(a), Scalar::Int64(b)) => a.partial_cmp(&(*b as f64)),
            _ => None,
        }
    }
}

/// Parse a datetime the way pandas' `to_datetime` accepts date strings
pub(crate) fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::Float64(a), Scalar::Float64(b)) if a.is_nan() && b.is_nan() => true,
            // exact match only, so equal values hash alike above 2^53
            (Scalar::Int64(i), Scalar::Float64(f)) | (Scalar::Float64(f), Scalar::Int64(i)) => {
                f.fract() == 0.0 && f.to_i64() == Some(*i)
            }
            _ => self.compare(other) == Some(Ordering::Equal),
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Scalar::Null => 0u8.hash(state),
            Scalar::Boolean(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            // Integral floats hash like the equal Int64 value
            Scalar::Int64(v) => {
                2u8.hash(state);
                v.hash(state);
            }
            Scalar::Float64(v) => match v.to_i64() {
                Some(i) if v.fract() == 0.0 => {
                    2u8.hash(state);
                    i.hash(state);
                }
                _ => {
                    3u8.hash(state);
                    if v.is_nan() {
                        f64::NAN.to_bits().hash(state);
                    } else {
                        v.to_bits().hash(state);
                    }
                }
            },
            Scalar::String(s) => {
                4u8.hash(state);
                s.hash(state);
            }
            Scalar::Datetime(dt) => {
                5u8.hash(state);
                dt.hash(state);
            }
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "<NA>"),
            Scalar::Boolean(v) => write!(f, "{}", v),
            Scalar::Int64(v) => write!(f, "{}", v),
            Scalar::Float64(v) => write!(f, "{}", v),
            Scalar::String(v) => write!(f, "{}", v),
            Scalar::Datetime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S%.f")),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int64(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int64(value as i64)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float64(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<NaiveDateTime> for Scalar {
    fn from(value: NaiveDateTime) -> Self {
        Scalar::Datetime(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Scalar::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_numeric_equality_across_types() {
        assert_eq!(Scalar::Int64(3), Scalar::Float64(3.0));
        assert_ne!(Scalar::Int64(3), Scalar::Float64(3.5));

        let mut set = HashSet::new();
        set.insert(Scalar::Int64(3));
        assert!(set.contains(&Scalar::Float64(3.0)));
    }

    #[test]
    fn test_large_int_float_equality_is_exact() {
        let big = 1i64 << 53;
        assert_ne!(Scalar::Int64(big + 1), Scalar::Float64(big as f64));
        assert_eq!(Scalar::Int64(big), Scalar::Float64(big as f64));

        let mut set = HashSet::new();
        set.insert(Scalar::Float64(big as f64));
        assert!(!set.contains(&Scalar::Int64(big + 1)));
        assert!(set.contains(&Scalar::Int64(big)));
    }

    #[test]
    fn test_float_to_int_cast_requires_integral() {
        assert_eq!(
            Scalar::Float64(2.0).cast(DataType::Int64).unwrap(),
            Scalar::Int64(2)
        );
        assert!(Scalar::Float64(2.5).cast(DataType::Int64).is_err());
    }

    #[test]
    fn test_string_to_datetime_cast() {
        let dt = Scalar::from("2021-03-04").cast(DataType::Datetime).unwrap();
        let expected = NaiveDate::from_ymd_opt(2021, 3, 4)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(dt, Scalar::Datetime(expected));
    }

    #[test]
    fn test_null_casts_to_null() {
        assert!(Scalar::Null.cast(DataType::Utf8).unwrap().is_null());
    }
}
