pub mod recording_logger;
pub mod scripted_source;

use std::sync::Arc;

use arrow::array::{Array, Int64Array, RecordBatch, StringArray};
use datafusion::execution::context::SessionContext;

// +-----+----------+--------+--------+
// | id  | customer | region | amount |
// +-----+----------+--------+--------+
// | 2   | Alice    | eu     | 120    |
// | 3   | Bob      | us     | 75     |
// | 5   | Charlie  | eu     | 300    |
// | 11  | David    | us     | 42     |
// | 12  | Eve      | eu     | 18     |
// | 26  | Frank    | apac   | 990    |
// | 27  | Grace    | us     | 61     |
// | 48  | Heidi    | eu     | 250    |
// +-----+----------+--------+--------+
pub const ORDER_IDS: [i64; 8] = [2, 3, 5, 11, 12, 26, 27, 48];

/// Helper function to setup test environment
pub async fn setup_test_env() -> SessionContext {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();

    let ctx = SessionContext::new();
    let batch = RecordBatch::try_from_iter(vec![
        ("id", Arc::new(Int64Array::from(ORDER_IDS.to_vec())) as _),
        (
            "customer",
            Arc::new(StringArray::from(vec![
                "Alice", "Bob", "Charlie", "David", "Eve", "Frank", "Grace", "Heidi",
            ])) as _,
        ),
        (
            "region",
            Arc::new(StringArray::from(vec![
                "eu", "us", "eu", "us", "eu", "apac", "us", "eu",
            ])) as _,
        ),
        (
            "amount",
            Arc::new(Int64Array::from(vec![120, 75, 300, 42, 18, 990, 61, 250])) as _,
        ),
    ])
    .unwrap();
    ctx.register_batch("orders", batch).unwrap();
    ctx
}

pub fn extract_ids(batches: &[RecordBatch]) -> Vec<i64> {
    let mut ids = Vec::new();
    for batch in batches {
        let id_array = batch
            .column_by_name("id")
            .unwrap()
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap();
        ids.extend(id_array.iter().flatten());
    }
    ids
}

pub fn extract_customers(batches: &[RecordBatch]) -> Vec<String> {
    let mut names = Vec::new();
    for batch in batches {
        let name_array = batch
            .column_by_name("customer")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        for i in 0..name_array.len() {
            names.push(name_array.value(i).to_string());
        }
    }
    names
}
