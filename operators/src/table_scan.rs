//! The predicate scan: selects the rows of one column satisfying a
//! comparison and emits a table of references to them.

use std::sync::Arc;

use data_types::{
    dispatch_data_type, ChunkId, ChunkOffset, ColumnId, NativeType, PosList, RowId, Value, ValueId,
};
use num_traits::AsPrimitive;
use observability_deps::tracing::debug;
use snafu::{ensure, ResultExt};
use storage::{AttributeVector, Chunk, ReferenceSegment, Segment, SegmentType, Table};

use crate::{
    ColumnIdOutOfRange, DictionaryScan, MixedSegmentEncodings, Operator, Predicate, Result,
    ResultTable, SearchValueConversion,
};

/// Scans one column of the input for rows satisfying `predicate` against
/// `search_value`.
///
/// The output is a fresh single-chunk table with the input's schema whose
/// segments are reference segments into the scanned table — or, when the
/// input is itself made of references, into that input's base table, so a
/// chain of scans always references the ultimate base.
#[derive(Debug)]
pub struct TableScan {
    input: Box<dyn Operator>,
    column_id: ColumnId,
    predicate: Predicate,
    search_value: Value,
    output: Option<Arc<Table>>,
}

impl TableScan {
    pub fn new(
        input: Box<dyn Operator>,
        column_id: ColumnId,
        predicate: Predicate,
        search_value: Value,
    ) -> Self {
        Self {
            input,
            column_id,
            predicate,
            search_value,
            output: None,
        }
    }

    pub fn column_id(&self) -> ColumnId {
        self.column_id
    }

    pub fn predicate(&self) -> Predicate {
        self.predicate
    }

    pub fn search_value(&self) -> &Value {
        &self.search_value
    }

    fn scan(&self, input: &Arc<Table>) -> Result<Arc<Table>> {
        ensure!(
            self.column_id < input.column_count(),
            ColumnIdOutOfRange {
                column_id: self.column_id,
                column_count: input.column_count(),
            }
        );

        let data_type = input.column_type(self.column_id);
        let (pos_list, base_table) =
            dispatch_data_type!(data_type, |T| self.collect_matches::<T>(input))?;

        debug!(
            column_id = usize::from(self.column_id),
            predicate = %self.predicate,
            search_value = %self.search_value,
            matches = pos_list.len(),
            "scan complete"
        );

        let output = Table::new(input.chunk_size());
        for column_id in 0..input.column_count() {
            output
                .add_column(
                    &input.column_name(column_id),
                    input.column_type(column_id).name(),
                )
                .context(ResultTable)?;
        }

        let pos_list = Arc::new(pos_list);
        let mut chunk = Chunk::new();
        for column_id in 0..input.column_count() {
            chunk.add_segment(Segment::Reference(ReferenceSegment::new(
                Arc::clone(&base_table),
                column_id,
                Arc::clone(&pos_list),
            )));
        }
        output.emplace_chunk(chunk).context(ResultTable)?;

        Ok(Arc::new(output))
    }

    /// Walks every chunk of the scanned column, specialized to the column's
    /// element type, and returns the matching positions along with the table
    /// those positions refer into.
    fn collect_matches<T: SegmentType>(
        &self,
        input: &Arc<Table>,
    ) -> Result<(PosList, Arc<Table>)> {
        let search = T::try_from_value(&self.search_value).context(SearchValueConversion {
            data_type: T::DATA_TYPE,
        })?;

        let mut pos_list = PosList::new();
        let mut base_table = Arc::clone(input);

        for chunk_id in 0..input.chunk_count() {
            let chunk = input.get_chunk(chunk_id);
            let chunk = chunk.read();
            match chunk.get_segment(self.column_id) {
                Segment::Value(value_segment) => {
                    let values = value_segment
                        .values::<T>()
                        .expect("segment element type matches the schema");
                    for (offset, value) in values.iter().enumerate() {
                        if self.predicate.test(value.total_cmp(&search)) {
                            pos_list.push(RowId {
                                chunk_id,
                                chunk_offset: offset as ChunkOffset,
                            });
                        }
                    }
                }
                Segment::Dictionary(dictionary_segment) => {
                    let lower = dictionary_segment
                        .lower_bound(&self.search_value)
                        .context(DictionaryScan)?;
                    let upper = dictionary_segment
                        .upper_bound(&self.search_value)
                        .context(DictionaryScan)?;
                    scan_attribute_codes(
                        dictionary_segment.attribute_vector(),
                        self.predicate,
                        lower,
                        upper,
                        chunk_id,
                        &mut pos_list,
                    );
                }
                Segment::Reference(reference_segment) => {
                    // Reference inputs carry all their rows in one chunk, so
                    // seeing one anywhere else means mixed encodings.
                    ensure!(input.chunk_count() == 1, MixedSegmentEncodings);
                    base_table = Arc::clone(reference_segment.referenced_table());
                    for (offset, row_id) in reference_segment.pos_list().iter().enumerate() {
                        let value = T::try_from_value(&reference_segment.value_at(offset))
                            .expect("base column element type matches the schema");
                        if self.predicate.test(value.total_cmp(&search)) {
                            pos_list.push(*row_id);
                        }
                    }
                }
            }
        }
        Ok((pos_list, base_table))
    }
}

impl Operator for TableScan {
    fn execute(&mut self) -> Result<()> {
        if self.output.is_some() {
            return Ok(());
        }
        self.input.execute()?;
        let input = self.input.output().expect("executed input has an output");
        self.output = Some(self.scan(&input)?);
        Ok(())
    }

    fn output(&self) -> Option<Arc<Table>> {
        self.output.as_ref().map(Arc::clone)
    }
}

/// Scans dictionary codes with the predicate rewritten into code space, in
/// the codes' native width.
fn scan_attribute_codes(
    attribute_vector: &AttributeVector,
    predicate: Predicate,
    lower: ValueId,
    upper: ValueId,
    chunk_id: ChunkId,
    pos_list: &mut PosList,
) {
    match attribute_vector {
        AttributeVector::U8(codes) => {
            scan_codes(codes, predicate, lower, upper, chunk_id, pos_list)
        }
        AttributeVector::U16(codes) => {
            scan_codes(codes, predicate, lower, upper, chunk_id, pos_list)
        }
        AttributeVector::U32(codes) => {
            scan_codes(codes, predicate, lower, upper, chunk_id, pos_list)
        }
    }
}

fn scan_codes<C>(
    codes: &[C],
    predicate: Predicate,
    lower: ValueId,
    upper: ValueId,
    chunk_id: ChunkId,
    pos_list: &mut PosList,
) where
    C: Copy + Ord + 'static,
    ValueId: AsPrimitive<C>,
{
    let rewritten = CodePredicate::new(predicate, lower, upper);
    for (offset, code) in codes.iter().enumerate() {
        if rewritten.test(*code) {
            pos_list.push(RowId {
                chunk_id,
                chunk_offset: offset as ChunkOffset,
            });
        }
    }
}

/// A predicate rewritten against dictionary codes.
///
/// `lower`/`upper` are the dictionary bounds of the search value. Narrowing
/// them to the code width with `as_` keeps the no-entry sentinel above every
/// valid code, since a dictionary never fills its width completely.
#[derive(Debug, Clone, Copy)]
enum CodePredicate<C> {
    All,
    Nothing,
    EqualTo(C),
    NotEqualTo(C),
    Below(C),
    AtLeast(C),
}

impl<C> CodePredicate<C>
where
    C: Copy + Ord + 'static,
    ValueId: AsPrimitive<C>,
{
    fn new(predicate: Predicate, lower: ValueId, upper: ValueId) -> Self {
        match predicate {
            // `lower == upper` means the search value is not in the
            // dictionary: nothing is equal to it, everything differs.
            Predicate::Equals if lower == upper => Self::Nothing,
            Predicate::Equals => Self::EqualTo(lower.as_()),
            Predicate::NotEquals if lower == upper => Self::All,
            Predicate::NotEquals => Self::NotEqualTo(lower.as_()),
            Predicate::LessThan => Self::Below(lower.as_()),
            Predicate::LessThanOrEquals => Self::Below(upper.as_()),
            Predicate::GreaterThan => Self::AtLeast(upper.as_()),
            Predicate::GreaterThanOrEquals => Self::AtLeast(lower.as_()),
        }
    }

    fn test(&self, code: C) -> bool {
        match self {
            Self::All => true,
            Self::Nothing => false,
            Self::EqualTo(value) => code == *value,
            Self::NotEqualTo(value) => code != *value,
            Self::Below(value) => code < *value,
            Self::AtLeast(value) => code >= *value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, TableWrapper};

    fn row_id(chunk_id: ChunkId, chunk_offset: ChunkOffset) -> RowId {
        RowId {
            chunk_id,
            chunk_offset,
        }
    }

    /// The scenario table: five columns, chunk size 2, three rows.
    fn five_column_table() -> Arc<Table> {
        let table = Table::new(2);
        table.add_column("col_1", "int").unwrap();
        table.add_column("col_2", "string").unwrap();
        table.add_column("col_3", "int").unwrap();
        table.add_column("col_4", "int").unwrap();
        table.add_column("col_5", "int").unwrap();
        for (a, b) in &[(4, "Hello,"), (6, "world"), (3, "!")] {
            table
                .append(vec![
                    Value::Int(*a),
                    Value::from(*b),
                    Value::Int(1),
                    Value::Int(2),
                    Value::Int(3),
                ])
                .unwrap();
        }
        Arc::new(table)
    }

    fn int_table(values: &[i32], chunk_size: u32) -> Arc<Table> {
        let table = Table::new(chunk_size);
        table.add_column("a", "int").unwrap();
        for value in values {
            table.append(vec![Value::Int(*value)]).unwrap();
        }
        Arc::new(table)
    }

    fn scan_output(
        table: &Arc<Table>,
        column_id: ColumnId,
        predicate: Predicate,
        search_value: Value,
    ) -> Arc<Table> {
        let mut scan = TableScan::new(
            Box::new(TableWrapper::new(Arc::clone(table))),
            column_id,
            predicate,
            search_value,
        );
        scan.execute().unwrap();
        scan.output().unwrap()
    }

    fn positions(output: &Arc<Table>) -> Vec<RowId> {
        let chunk = output.get_chunk(0);
        let chunk = chunk.read();
        match chunk.get_segment(0) {
            Segment::Reference(segment) => segment.pos_list().as_ref().clone(),
            other => panic!("expected a reference segment, got {}", other.encoding()),
        }
    }

    #[test]
    fn scan_over_value_segments() {
        test_helpers::maybe_start_logging();
        let table = five_column_table();
        let output = scan_output(&table, 0, Predicate::LessThan, Value::Int(5));

        assert_eq!(output.chunk_count(), 1);
        assert_eq!(output.column_count(), 5);
        assert_eq!(output.column_names(), table.column_names());
        assert_eq!(positions(&output), vec![row_id(0, 0), row_id(1, 0)]);

        // All five reference segments share one position list and point at
        // the scanned table itself.
        let chunk = output.get_chunk(0);
        let chunk = chunk.read();
        let shared = match chunk.get_segment(0) {
            Segment::Reference(segment) => Arc::clone(segment.pos_list()),
            _ => unreachable!(),
        };
        for column_id in 0..output.column_count() {
            match chunk.get_segment(column_id) {
                Segment::Reference(segment) => {
                    assert!(Arc::ptr_eq(segment.pos_list(), &shared));
                    assert!(Arc::ptr_eq(segment.referenced_table(), &table));
                }
                other => panic!("expected a reference segment, got {}", other.encoding()),
            }
        }

        // Rows resolve through the references in position-list order.
        assert_eq!(chunk.get_segment(0).value_at(0), Value::Int(4));
        assert_eq!(chunk.get_segment(0).value_at(1), Value::Int(3));
        assert_eq!(chunk.get_segment(1).value_at(0), Value::from("Hello,"));
        assert_eq!(chunk.get_segment(1).value_at(1), Value::from("!"));
    }

    #[test]
    fn scan_over_dictionary_segments_matches_value_scan() {
        let table = five_column_table();
        let expected = positions(&scan_output(&table, 0, Predicate::LessThan, Value::Int(5)));

        table.compress_chunk(0).unwrap();
        let output = scan_output(&table, 0, Predicate::LessThan, Value::Int(5));
        assert_eq!(positions(&output), expected);

        // Reference segments keep pointing at the scanned table even after
        // the partial last chunk is compressed as well.
        table.compress_chunk(1).unwrap();
        let output = scan_output(&table, 0, Predicate::LessThan, Value::Int(5));
        assert_eq!(positions(&output), expected);
        match &*output.get_chunk(0).read().get_segment(0) {
            Segment::Reference(segment) => assert!(Arc::ptr_eq(segment.referenced_table(), &table)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn chained_scans_collapse_to_the_base_table() {
        let table = int_table(&[5, 3, 8, 1, 7, 2], 3);

        let mut first = TableScan::new(
            Box::new(TableWrapper::new(Arc::clone(&table))),
            0,
            Predicate::GreaterThan,
            Value::Int(2),
        );
        first.execute().unwrap();
        let intermediate = first.output().unwrap();
        assert_eq!(
            positions(&intermediate),
            vec![row_id(0, 0), row_id(0, 1), row_id(0, 2), row_id(1, 1)]
        );

        let mut second = TableScan::new(
            Box::new(first),
            0,
            Predicate::LessThan,
            Value::Int(8),
        );
        second.execute().unwrap();
        let output = second.output().unwrap();

        // Positions are base-table row ids, not offsets into the
        // intermediate result.
        assert_eq!(
            positions(&output),
            vec![row_id(0, 0), row_id(0, 1), row_id(1, 1)]
        );
        match &*output.get_chunk(0).read().get_segment(0) {
            Segment::Reference(segment) => {
                assert!(Arc::ptr_eq(segment.referenced_table(), &table));
                assert!(!Arc::ptr_eq(segment.referenced_table(), &intermediate));
            }
            _ => unreachable!(),
        }

        assert_eq!(output.get_chunk(0).read().get_segment(0).value_at(0), Value::Int(5));
        assert_eq!(output.get_chunk(0).read().get_segment(0).value_at(2), Value::Int(7));
    }

    #[test]
    fn dictionary_and_value_scans_agree_on_boundaries() {
        let values = [0, 2, 4, 6, 8, 10];
        let plain = int_table(&values, 6);
        let compressed = int_table(&values, 6);
        compressed.compress_chunk(0).unwrap();

        let predicates = [
            Predicate::Equals,
            Predicate::NotEquals,
            Predicate::LessThan,
            Predicate::LessThanOrEquals,
            Predicate::GreaterThan,
            Predicate::GreaterThanOrEquals,
        ];
        // Below the minimum, present, absent-in-between, the maximum, and
        // past the maximum.
        for search in &[-1, 0, 4, 5, 10, 15] {
            for predicate in &predicates {
                let from_values =
                    positions(&scan_output(&plain, 0, *predicate, Value::Int(*search)));
                let from_codes =
                    positions(&scan_output(&compressed, 0, *predicate, Value::Int(*search)));
                assert_eq!(
                    from_codes, from_values,
                    "predicate {} with search value {}",
                    predicate, search
                );
            }
        }
    }

    #[test]
    fn not_equals_with_absent_search_value_matches_all_rows() {
        let table = int_table(&[0, 2, 4, 6, 8, 10], 6);
        table.compress_chunk(0).unwrap();

        let output = scan_output(&table, 0, Predicate::NotEquals, Value::Int(5));
        assert_eq!(
            positions(&output),
            (0..6).map(|offset| row_id(0, offset)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn scan_string_column() {
        let table = five_column_table();
        let output = scan_output(&table, 1, Predicate::Equals, Value::from("world"));
        assert_eq!(positions(&output), vec![row_id(0, 1)]);
    }

    #[test]
    fn empty_result_is_a_valid_table() {
        let table = five_column_table();
        let output = scan_output(&table, 0, Predicate::GreaterThan, Value::Int(100));
        assert_eq!(output.chunk_count(), 1);
        assert_eq!(output.row_count(), 0);
        assert!(positions(&output).is_empty());
    }

    #[test]
    fn search_value_must_convert_to_the_column_type() {
        let table = five_column_table();
        let mut scan = TableScan::new(
            Box::new(TableWrapper::new(table)),
            0,
            Predicate::Equals,
            Value::from("Hi"),
        );
        let err = scan.execute().unwrap_err();
        assert_eq!(
            err.to_string(),
            "search value not convertible to column type int: cannot parse 'Hi' as int"
        );
    }

    #[test]
    fn column_id_must_be_in_range() {
        let table = five_column_table();
        let mut scan = TableScan::new(
            Box::new(TableWrapper::new(table)),
            5,
            Predicate::Equals,
            Value::Int(1),
        );
        assert!(matches!(
            scan.execute().unwrap_err(),
            Error::ColumnIdOutOfRange { .. }
        ));
    }

    #[test]
    fn reference_input_must_be_a_single_chunk() {
        let base = int_table(&[1, 2], 2);

        // Hand-build a reference table spread over two chunks, which a scan
        // never produces.
        let fragmented = Table::new(1);
        fragmented.add_column("a", "int").unwrap();
        for offset in 0..2 {
            let mut chunk = Chunk::new();
            chunk.add_segment(Segment::Reference(ReferenceSegment::new(
                Arc::clone(&base),
                0,
                Arc::new(vec![row_id(0, offset)]),
            )));
            fragmented.emplace_chunk(chunk).unwrap();
        }
        assert_eq!(fragmented.chunk_count(), 2);

        let mut scan = TableScan::new(
            Box::new(TableWrapper::new(Arc::new(fragmented))),
            0,
            Predicate::Equals,
            Value::Int(1),
        );
        assert!(matches!(
            scan.execute().unwrap_err(),
            Error::MixedSegmentEncodings
        ));
    }

    #[test]
    fn accessors_expose_the_configuration() {
        let table = five_column_table();
        let scan = TableScan::new(
            Box::new(TableWrapper::new(table)),
            2,
            Predicate::GreaterThanOrEquals,
            Value::Int(1),
        );
        assert_eq!(scan.column_id(), 2);
        assert_eq!(scan.predicate(), Predicate::GreaterThanOrEquals);
        assert_eq!(*scan.search_value(), Value::Int(1));
        assert!(scan.output().is_none());
    }
}
