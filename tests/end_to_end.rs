//! End-to-end pipelines: load a table, compress chunks, chain scans, and
//! resolve tables through the storage manager.

use std::sync::Arc;

use catalog::StorageManager;
use data_types::{RowId, Value};
use operators::{GetTable, Operator, Predicate, TableScan, TableWrapper};
use storage::{Segment, Table};

fn row_id(chunk_id: u32, chunk_offset: u32) -> RowId {
    RowId {
        chunk_id,
        chunk_offset,
    }
}

fn people_table() -> Arc<Table> {
    let table = Table::new(2);
    table.add_column("id", "int").unwrap();
    table.add_column("name", "string").unwrap();
    table.add_column("score", "double").unwrap();
    for (id, name, score) in &[
        (1, "ada", 9.5),
        (2, "grace", 7.25),
        (3, "edsger", 8.0),
        (4, "barbara", 6.5),
        (5, "donald", 9.0),
    ] {
        table
            .append(vec![
                Value::Int(*id),
                Value::from(*name),
                Value::Double(*score),
            ])
            .unwrap();
    }
    Arc::new(table)
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
fn rollover_fills_chunks_to_capacity() {
    test_helpers::maybe_start_logging();
    let table = people_table();

    assert_eq!(table.row_count(), 5);
    assert_eq!(table.chunk_count(), 3);
    for chunk_id in 0..2 {
        assert_eq!(table.get_chunk(chunk_id).read().size(), 2);
    }
    assert_eq!(table.get_chunk(2).read().size(), 1);
}

#[test]
fn scan_pipeline_over_mixed_encodings() {
    let table = people_table();
    // Compress the full chunks, leave the partial one uncompressed.
    table.compress_chunk(0).unwrap();
    table.compress_chunk(1).unwrap();

    let mut scan = TableScan::new(
        Box::new(TableWrapper::new(Arc::clone(&table))),
        2,
        Predicate::GreaterThanOrEquals,
        Value::Double(8.0),
    );
    scan.execute().unwrap();
    let output = scan.output().unwrap();

    assert_eq!(
        positions(&output),
        vec![row_id(0, 0), row_id(1, 0), row_id(2, 0)]
    );

    let chunk = output.get_chunk(0);
    let chunk = chunk.read();
    assert_eq!(chunk.get_segment(1).value_at(0), Value::from("ada"));
    assert_eq!(chunk.get_segment(1).value_at(1), Value::from("edsger"));
    assert_eq!(chunk.get_segment(1).value_at(2), Value::from("donald"));
}

#[test]
fn chained_scans_reference_the_base_table() {
    let table = people_table();

    let first = TableScan::new(
        Box::new(TableWrapper::new(Arc::clone(&table))),
        2,
        Predicate::GreaterThan,
        Value::Double(7.0),
    );
    let mut second = TableScan::new(
        Box::new(first),
        0,
        Predicate::LessThanOrEquals,
        Value::Int(3),
    );
    second.execute().unwrap();
    let output = second.output().unwrap();

    // scores > 7.0 keeps ids 1, 2, 3, 5; id <= 3 narrows to 1, 2, 3.
    assert_eq!(
        positions(&output),
        vec![row_id(0, 0), row_id(0, 1), row_id(1, 0)]
    );
    let chunk = output.get_chunk(0);
    let chunk = chunk.read();
    match chunk.get_segment(0) {
        Segment::Reference(segment) => {
            assert!(Arc::ptr_eq(segment.referenced_table(), &table));
        }
        other => panic!("expected a reference segment, got {}", other.encoding()),
    }
}

#[test]
fn registry_headed_pipeline() {
    let name = "end_to_end_people";
    let table = people_table();
    StorageManager::global()
        .add_table(name, Arc::clone(&table))
        .unwrap();
    assert!(StorageManager::global().has_table(name));

    let mut scan = TableScan::new(
        Box::new(GetTable::new(name)),
        1,
        Predicate::Equals,
        Value::from("grace"),
    );
    scan.execute().unwrap();
    let output = scan.output().unwrap();
    assert_eq!(positions(&output), vec![row_id(0, 1)]);

    StorageManager::global().drop_table(name).unwrap();
    assert!(!StorageManager::global().has_table(name));
}

#[test]
fn search_values_convert_to_the_column_type() {
    let table = people_table();

    // A string search value against an int column parses before comparing.
    let mut scan = TableScan::new(
        Box::new(TableWrapper::new(Arc::clone(&table))),
        0,
        Predicate::Equals,
        Value::from("3"),
    );
    scan.execute().unwrap();
    assert_eq!(positions(&scan.output().unwrap()), vec![row_id(1, 0)]);
}
