//! The closed set of column element types and the name ↔ type mapping used
//! when schemas are declared with textual type names.

use std::fmt;
use std::str::FromStr;

use snafu::Snafu;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("unknown type name '{}'", name))]
    UnknownTypeName { name: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The element type of a column.
///
/// Schemas are declared with the textual names accepted by [`FromStr`];
/// everything past that boundary works with this tag or with the concrete
/// element type resolved through
/// [`dispatch_data_type!`](crate::dispatch_data_type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataType {
    /// Signed 32-bit integer, declared as `"int"`.
    Int,
    /// Signed 64-bit integer, declared as `"long"`.
    Long,
    /// 32-bit float, declared as `"float"`.
    Float,
    /// 64-bit float, declared as `"double"`.
    Double,
    /// UTF-8 string, declared as `"string"`.
    String,
}

impl DataType {
    /// The textual name this type is declared with.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
        }
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "int" => Ok(Self::Int),
            "long" => Ok(Self::Long),
            "float" => Ok(Self::Float),
            "double" => Ok(Self::Double),
            "string" => Ok(Self::String),
            _ => UnknownTypeName { name }.fail(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolves a runtime [`DataType`] to its compile-time element type.
///
/// Expands to an exhaustive match over [`DataType`] that binds the given
/// identifier as a type alias for the matching element type and evaluates the
/// body once per arm. This macro is the only place the tag → type mapping
/// exists; generic code takes `T: NativeType` and is instantiated from here.
///
/// ```
/// use data_types::{dispatch_data_type, DataType};
///
/// let data_type = DataType::Long;
/// let width = dispatch_data_type!(data_type, |T| std::mem::size_of::<T>());
/// assert_eq!(width, 8);
/// ```
#[macro_export]
macro_rules! dispatch_data_type {
    ($data_type:expr, | $t:ident | $body:expr) => {
        match $data_type {
            $crate::DataType::Int => {
                type $t = i32;
                $body
            }
            $crate::DataType::Long => {
                type $t = i64;
                $body
            }
            $crate::DataType::Float => {
                type $t = f32;
                $body
            }
            $crate::DataType::Double => {
                type $t = f64;
                $body
            }
            $crate::DataType::String => {
                type $t = ::std::string::String;
                $body
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NativeType;

    #[test]
    fn name_round_trip() {
        for data_type in &[
            DataType::Int,
            DataType::Long,
            DataType::Float,
            DataType::Double,
            DataType::String,
        ] {
            assert_eq!(data_type.name().parse::<DataType>().unwrap(), *data_type);
        }
    }

    #[test]
    fn unknown_name() {
        let err = "bool".parse::<DataType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown type name 'bool'");
    }

    #[test]
    fn dispatch_resolves_element_type() {
        let resolved = dispatch_data_type!(DataType::Float, |T| T::DATA_TYPE);
        assert_eq!(resolved, DataType::Float);

        let resolved = dispatch_data_type!(DataType::String, |T| T::DATA_TYPE);
        assert_eq!(resolved, DataType::String);
    }
}
