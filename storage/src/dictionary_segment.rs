//! The order-preserving dictionary segment encoding.

use std::cmp::Ordering;

use data_types::{dispatch_data_type, DataType, NativeType, Value, ValueId, INVALID_VALUE_ID};
use itertools::Itertools;
use snafu::{ensure, ResultExt, Snafu};

use crate::attribute_vector::AttributeVector;
use crate::segment::{Segment, SegmentType};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("value id {} is not a dictionary entry", value_id))]
    InvalidValueId { value_id: ValueId },

    #[snafu(display(
        "search value not convertible to column type {}: {}",
        data_type,
        source
    ))]
    SearchValueConversion {
        data_type: DataType,
        source: data_types::value::Error,
    },

    #[snafu(display("cannot build a dictionary over a reference segment"))]
    DictionaryOverReference,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An immutable segment storing each row as a narrow code into a sorted
/// dictionary of the distinct column values.
///
/// The dictionary is sorted by the element type's total order, so value
/// comparisons can be answered in code space via
/// [`lower_bound`](Self::lower_bound) and [`upper_bound`](Self::upper_bound)
/// without touching the dictionary per row.
#[derive(Debug, Clone)]
pub struct DictionarySegment {
    dictionary: DictionaryData,
    attribute_vector: AttributeVector,
}

/// The sorted unique dictionary, one variant per element type.
#[derive(Debug, Clone, PartialEq)]
pub enum DictionaryData {
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    String(Vec<String>),
}

impl DictionarySegment {
    /// Dictionary-encodes the values of an existing segment.
    ///
    /// Value segments encode their typed vector directly. Encoding a
    /// dictionary segment decodes and rebuilds, which makes recompression
    /// idempotent in effect. Reference segments cannot be encoded.
    pub fn from_segment(segment: &Segment) -> Result<Self> {
        match segment {
            Segment::Value(value_segment) => {
                dispatch_data_type!(value_segment.data_type(), |T| {
                    let values = value_segment
                        .values::<T>()
                        .expect("value data matches its type tag");
                    Ok(Self::build(values))
                })
            }
            Segment::Dictionary(dictionary_segment) => {
                dispatch_data_type!(dictionary_segment.data_type(), |T| {
                    let values: Vec<T> = dictionary_segment
                        .decoded()
                        .expect("dictionary data matches its type tag");
                    Ok(Self::build(&values))
                })
            }
            Segment::Reference(_) => DictionaryOverReference.fail(),
        }
    }

    fn build<T: SegmentType>(values: &[T]) -> Self {
        let dictionary: Vec<T> = values
            .iter()
            .cloned()
            .sorted_by(|a, b| a.total_cmp(b))
            .dedup_by(|a, b| a.total_cmp(b) == Ordering::Equal)
            .collect();

        let mut attribute_vector = AttributeVector::with_len(dictionary.len(), values.len());
        for (offset, value) in values.iter().enumerate() {
            let value_id = dictionary
                .binary_search_by(|entry| entry.total_cmp(value))
                .expect("every segment value is in the dictionary");
            attribute_vector.set(offset, value_id as ValueId);
        }

        Self {
            dictionary: T::dictionary_data(dictionary),
            attribute_vector,
        }
    }

    /// The element type of the dictionary entries.
    pub fn data_type(&self) -> DataType {
        match &self.dictionary {
            DictionaryData::Int(_) => DataType::Int,
            DictionaryData::Long(_) => DataType::Long,
            DictionaryData::Float(_) => DataType::Float,
            DictionaryData::Double(_) => DataType::Double,
            DictionaryData::String(_) => DataType::String,
        }
    }

    /// Number of rows covered.
    pub fn size(&self) -> usize {
        self.attribute_vector.size()
    }

    /// Number of dictionary entries.
    pub fn unique_values_count(&self) -> usize {
        match &self.dictionary {
            DictionaryData::Int(values) => values.len(),
            DictionaryData::Long(values) => values.len(),
            DictionaryData::Float(values) => values.len(),
            DictionaryData::Double(values) => values.len(),
            DictionaryData::String(values) => values.len(),
        }
    }

    /// The sorted unique dictionary as a typed slice, or `None` on a type
    /// mismatch.
    pub fn dictionary<T: SegmentType>(&self) -> Option<&[T]> {
        T::dictionary(&self.dictionary)
    }

    /// The width-fitted code vector.
    pub fn attribute_vector(&self) -> &AttributeVector {
        &self.attribute_vector
    }

    /// The row value at `offset`, resolved through the dictionary.
    pub fn value_at(&self, offset: usize) -> Value {
        self.value_by_value_id(self.attribute_vector.get(offset))
            .expect("attribute codes index the dictionary")
    }

    /// The dictionary entry for `value_id`.
    pub fn value_by_value_id(&self, value_id: ValueId) -> Result<Value> {
        ensure!(
            value_id != INVALID_VALUE_ID && (value_id as usize) < self.unique_values_count(),
            InvalidValueId { value_id }
        );
        dispatch_data_type!(self.data_type(), |T| {
            let dictionary = self
                .dictionary::<T>()
                .expect("dictionary data matches its type tag");
            Ok(dictionary[value_id as usize].clone().into_value())
        })
    }

    /// The id of the first dictionary entry ≥ `value`, or
    /// [`INVALID_VALUE_ID`] if every entry is smaller.
    pub fn lower_bound(&self, value: &Value) -> Result<ValueId> {
        self.bound(value, |ordering| ordering == Ordering::Less)
    }

    /// The id of the first dictionary entry > `value`, or
    /// [`INVALID_VALUE_ID`] if no entry is greater.
    pub fn upper_bound(&self, value: &Value) -> Result<ValueId> {
        self.bound(value, |ordering| ordering != Ordering::Greater)
    }

    /// Index of the first entry whose ordering against the search value
    /// stops satisfying `in_prefix`.
    fn bound(&self, value: &Value, in_prefix: impl Fn(Ordering) -> bool) -> Result<ValueId> {
        let data_type = self.data_type();
        dispatch_data_type!(data_type, |T| {
            let search = T::try_from_value(value).context(SearchValueConversion { data_type })?;
            let dictionary = self
                .dictionary::<T>()
                .expect("dictionary data matches its type tag");
            let index = dictionary.partition_point(|entry| in_prefix(entry.total_cmp(&search)));
            Ok(if index == dictionary.len() {
                INVALID_VALUE_ID
            } else {
                index as ValueId
            })
        })
    }

    fn decoded<T: SegmentType>(&self) -> Option<Vec<T>> {
        let dictionary = self.dictionary::<T>()?;
        Some(
            self.attribute_vector
                .iter()
                .map(|value_id| dictionary[value_id as usize].clone())
                .collect(),
        )
    }
}
