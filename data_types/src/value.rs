//! The variant value that carries one element of any column type across the
//! untyped engine surface, and the closed trait implemented by the five
//! concrete element types.

use std::cmp::Ordering;
use std::fmt;

use snafu::{OptionExt, Snafu};

use crate::DataType;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("cannot parse '{}' as {}", value, target))]
    ParseValue { value: String, target: DataType },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A tagged value holding exactly one inhabitant of the element type set.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
}

impl Value {
    /// The element type of the carried value.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int(_) => DataType::Int,
            Self::Long(_) => DataType::Long,
            Self::Float(_) => DataType::Float,
            Self::Double(_) => DataType::Double,
            Self::String(_) => DataType::String,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => v.fmt(f),
            Self::Long(v) => v.fmt(f),
            Self::Float(v) => v.fmt(f),
            Self::Double(v) => v.fmt(f),
            Self::String(v) => v.fmt(f),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

/// One of the five concrete element types.
///
/// The set is closed: these five impls are the entire implementation surface,
/// and generic storage and operator code is instantiated for exactly them via
/// [`dispatch_data_type!`](crate::dispatch_data_type).
pub trait NativeType: Clone + fmt::Debug + Send + Sync + 'static {
    const DATA_TYPE: DataType;

    /// Converts a variant value into this type.
    ///
    /// Numeric pairs convert with standard truncation, numerics format into
    /// strings, and strings parse into numerics, failing on unparsable text.
    fn try_from_value(value: &Value) -> Result<Self>;

    /// Wraps this value back into the variant.
    fn into_value(self) -> Value;

    /// Total order over the element domain. The float types order via their
    /// IEEE 754 `totalOrder` so that dictionary sorting never needs to
    /// reason about incomparable values.
    fn total_cmp(&self, other: &Self) -> Ordering;
}

macro_rules! impl_numeric_native_type {
    ($native:ty, $data_type:expr, $variant:ident, $cmp:expr) => {
        impl NativeType for $native {
            const DATA_TYPE: DataType = $data_type;

            fn try_from_value(value: &Value) -> Result<Self> {
                match value {
                    Value::Int(v) => Ok(*v as $native),
                    Value::Long(v) => Ok(*v as $native),
                    Value::Float(v) => Ok(*v as $native),
                    Value::Double(v) => Ok(*v as $native),
                    Value::String(v) => v.parse::<$native>().ok().context(ParseValue {
                        value: v.clone(),
                        target: $data_type,
                    }),
                }
            }

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn total_cmp(&self, other: &Self) -> Ordering {
                let cmp: fn(&$native, &$native) -> Ordering = $cmp;
                cmp(self, other)
            }
        }
    };
}

impl_numeric_native_type!(i32, DataType::Int, Int, Ord::cmp);
impl_numeric_native_type!(i64, DataType::Long, Long, Ord::cmp);
impl_numeric_native_type!(f32, DataType::Float, Float, f32::total_cmp);
impl_numeric_native_type!(f64, DataType::Double, Double, f64::total_cmp);

impl NativeType for String {
    const DATA_TYPE: DataType = DataType::String;

    fn try_from_value(value: &Value) -> Result<Self> {
        Ok(match value {
            Value::Int(v) => v.to_string(),
            Value::Long(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Double(v) => v.to_string(),
            Value::String(v) => v.clone(),
        })
    }

    fn into_value(self) -> Value {
        Value::String(self)
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}
