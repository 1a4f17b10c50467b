//! The segment sum type and the typed access bridge shared by all encodings.

use std::fmt;

use data_types::{DataType, NativeType, Value};
use snafu::{ResultExt, Snafu};

use crate::dictionary_segment::{DictionaryData, DictionarySegment};
use crate::reference_segment::ReferenceSegment;
use crate::value_segment::{ValueData, ValueSegment};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("{} segments are immutable", encoding))]
    ImmutableSegment { encoding: SegmentEncoding },

    #[snafu(display("{}", source))]
    ValueAppend { source: crate::value_segment::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The physical encoding of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentEncoding {
    Value,
    Dictionary,
    Reference,
}

impl fmt::Display for SegmentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value => f.write_str("value"),
            Self::Dictionary => f.write_str("dictionary"),
            Self::Reference => f.write_str("reference"),
        }
    }
}

/// One column's worth of data in one chunk, in one of the closed set of
/// encodings.
///
/// All encodings answer [`size`](Self::size) and [`value_at`](Self::value_at);
/// encoding-specific fast paths match on the variant instead.
#[derive(Debug, Clone)]
pub enum Segment {
    Value(ValueSegment),
    Dictionary(DictionarySegment),
    Reference(ReferenceSegment),
}

impl Segment {
    /// Number of rows covered by this segment.
    pub fn size(&self) -> usize {
        match self {
            Self::Value(segment) => segment.size(),
            Self::Dictionary(segment) => segment.size(),
            Self::Reference(segment) => segment.size(),
        }
    }

    /// The element type of the column this segment belongs to.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Value(segment) => segment.data_type(),
            Self::Dictionary(segment) => segment.data_type(),
            Self::Reference(segment) => segment.data_type(),
        }
    }

    pub fn encoding(&self) -> SegmentEncoding {
        match self {
            Self::Value(_) => SegmentEncoding::Value,
            Self::Dictionary(_) => SegmentEncoding::Dictionary,
            Self::Reference(_) => SegmentEncoding::Reference,
        }
    }

    /// The value at `offset` as a variant. This is the slow generic access
    /// path; operators specialize on the encoding instead.
    pub fn value_at(&self, offset: usize) -> Value {
        match self {
            Self::Value(segment) => segment.value_at(offset),
            Self::Dictionary(segment) => segment.value_at(offset),
            Self::Reference(segment) => segment.value_at(offset),
        }
    }

    /// Appends to a value segment; dictionary and reference segments reject
    /// the append.
    pub fn append(&mut self, value: Value) -> Result<()> {
        match self {
            Self::Value(segment) => segment.append(value).context(ValueAppend),
            _ => ImmutableSegment {
                encoding: self.encoding(),
            }
            .fail(),
        }
    }
}

/// Typed access into the per-type back stores of the segment encodings.
///
/// This is the closed bridge used by code that has already resolved an
/// element type `T` (via [`dispatch_data_type!`](data_types::dispatch_data_type))
/// and needs the matching typed vectors out of the encoding-level enums.
pub trait SegmentType: NativeType {
    /// Wraps a typed vector into the value-segment back store.
    fn value_data(values: Vec<Self>) -> ValueData;

    /// Borrows the typed values, or `None` on a type mismatch.
    fn values(data: &ValueData) -> Option<&[Self]>;

    /// Wraps a sorted unique vector into the dictionary back store.
    fn dictionary_data(values: Vec<Self>) -> DictionaryData;

    /// Borrows the typed dictionary, or `None` on a type mismatch.
    fn dictionary(data: &DictionaryData) -> Option<&[Self]>;
}

macro_rules! impl_segment_type {
    ($(($native:ty, $variant:ident),)*) => {
        $(
            impl SegmentType for $native {
                fn value_data(values: Vec<Self>) -> ValueData {
                    ValueData::$variant(values)
                }

                fn values(data: &ValueData) -> Option<&[Self]> {
                    match data {
                        ValueData::$variant(values) => Some(values),
                        _ => None,
                    }
                }

                fn dictionary_data(values: Vec<Self>) -> DictionaryData {
                    DictionaryData::$variant(values)
                }

                fn dictionary(data: &DictionaryData) -> Option<&[Self]> {
                    match data {
                        DictionaryData::$variant(values) => Some(values),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_segment_type! {
    (i32, Int),
    (i64, Long),
    (f32, Float),
    (f64, Double),
    (String, String),
}
