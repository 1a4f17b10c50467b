//! The uncompressed, append-only segment encoding.

use data_types::{dispatch_data_type, DataType, NativeType, Value};
use snafu::{ResultExt, Snafu};

use crate::segment::SegmentType;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("value not convertible to column type {}: {}", data_type, source))]
    ValueConversion {
        data_type: DataType,
        source: data_types::value::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Stores one column's values for one chunk as a plain typed vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSegment {
    data: ValueData,
}

/// The typed back store, one variant per element type.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueData {
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    String(Vec<String>),
}

impl ValueSegment {
    /// An empty segment for a column of the given element type.
    pub fn new(data_type: DataType) -> Self {
        dispatch_data_type!(data_type, |T| Self {
            data: T::value_data(Vec::new()),
        })
    }

    /// The element type of the stored values.
    pub fn data_type(&self) -> DataType {
        match &self.data {
            ValueData::Int(_) => DataType::Int,
            ValueData::Long(_) => DataType::Long,
            ValueData::Float(_) => DataType::Float,
            ValueData::Double(_) => DataType::Double,
            ValueData::String(_) => DataType::String,
        }
    }

    /// Number of stored values.
    pub fn size(&self) -> usize {
        match &self.data {
            ValueData::Int(values) => values.len(),
            ValueData::Long(values) => values.len(),
            ValueData::Float(values) => values.len(),
            ValueData::Double(values) => values.len(),
            ValueData::String(values) => values.len(),
        }
    }

    /// Converts `value` to the segment's element type and pushes it.
    pub fn append(&mut self, value: Value) -> Result<()> {
        let data_type = self.data_type();
        match &mut self.data {
            ValueData::Int(values) => {
                values.push(i32::try_from_value(&value).context(ValueConversion { data_type })?)
            }
            ValueData::Long(values) => {
                values.push(i64::try_from_value(&value).context(ValueConversion { data_type })?)
            }
            ValueData::Float(values) => {
                values.push(f32::try_from_value(&value).context(ValueConversion { data_type })?)
            }
            ValueData::Double(values) => {
                values.push(f64::try_from_value(&value).context(ValueConversion { data_type })?)
            }
            ValueData::String(values) => {
                values.push(String::try_from_value(&value).context(ValueConversion { data_type })?)
            }
        }
        Ok(())
    }

    /// The typed back store, or `None` if `T` is not the segment's element
    /// type.
    pub fn values<T: SegmentType>(&self) -> Option<&[T]> {
        T::values(&self.data)
    }

    /// The value at `offset` as a variant. Slow; typed paths use
    /// [`Self::values`].
    pub fn value_at(&self, offset: usize) -> Value {
        match &self.data {
            ValueData::Int(values) => Value::Int(values[offset]),
            ValueData::Long(values) => Value::Long(values[offset]),
            ValueData::Float(values) => Value::Float(values[offset]),
            ValueData::Double(values) => Value::Double(values[offset]),
            ValueData::String(values) => Value::String(values[offset].clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_segments() {
        assert_eq!(ValueSegment::new(DataType::Int).size(), 0);
        assert_eq!(ValueSegment::new(DataType::String).size(), 0);
        assert_eq!(ValueSegment::new(DataType::Double).size(), 0);
    }

    #[test]
    fn append_same_type() {
        let mut int_segment = ValueSegment::new(DataType::Int);
        int_segment.append(Value::Int(3)).unwrap();
        assert_eq!(int_segment.size(), 1);

        let mut string_segment = ValueSegment::new(DataType::String);
        string_segment.append(Value::from("Hello")).unwrap();
        assert_eq!(string_segment.size(), 1);

        let mut double_segment = ValueSegment::new(DataType::Double);
        double_segment.append(Value::Double(3.14)).unwrap();
        assert_eq!(double_segment.size(), 1);
    }

    #[test]
    fn typed_values_view() {
        let mut segment = ValueSegment::new(DataType::Int);
        segment.append(Value::Int(3)).unwrap();
        assert_eq!(segment.values::<i32>().unwrap(), &[3]);
        assert!(segment.values::<i64>().is_none());

        let mut segment = ValueSegment::new(DataType::String);
        segment.append(Value::from("Hello")).unwrap();
        assert_eq!(segment.values::<String>().unwrap(), &["Hello".to_string()]);
    }

    #[test]
    fn append_converts_across_types() {
        let mut int_segment = ValueSegment::new(DataType::Int);
        int_segment.append(Value::Double(3.14)).unwrap();
        assert_eq!(int_segment.size(), 1);
        int_segment.append(Value::from("42")).unwrap();
        assert_eq!(int_segment.size(), 2);
        assert_eq!(int_segment.values::<i32>().unwrap(), &[3, 42]);

        let err = int_segment.append(Value::from("Hi")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "value not convertible to column type int: cannot parse 'Hi' as int"
        );
        assert_eq!(int_segment.size(), 2);

        let mut string_segment = ValueSegment::new(DataType::String);
        string_segment.append(Value::Int(3)).unwrap();
        string_segment.append(Value::Double(4.44)).unwrap();
        assert_eq!(string_segment.size(), 2);

        let mut double_segment = ValueSegment::new(DataType::Double);
        double_segment.append(Value::Int(4)).unwrap();
        assert_eq!(double_segment.size(), 1);
        assert!(double_segment.append(Value::from("Hi")).is_err());
    }

    #[test]
    fn value_at_round_trips() {
        let mut segment = ValueSegment::new(DataType::Long);
        segment.append(Value::Long(1)).unwrap();
        segment.append(Value::Int(2)).unwrap();
        assert_eq!(segment.value_at(0), Value::Long(1));
        assert_eq!(segment.value_at(1), Value::Long(2));
    }
}
