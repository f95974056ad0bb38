//! Benchmark utilities and helpers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

use strata_common::config::TableConfig;
use strata_common::types::{AggType, ColumnSpec, ColumnType, Value};
use strata_engine::Table;

/// The benchmark schema: an indexed product key, a LAST price, a SUM
/// stock delta.
pub fn inventory_columns(indexed: bool) -> Vec<ColumnSpec> {
    let product = ColumnSpec::new("Product", ColumnType::Str, AggType::Last);
    vec![
        if indexed { product.indexed() } else { product },
        ColumnSpec::new("Price", ColumnType::Int, AggType::Last),
        ColumnSpec::new("Stock", ColumnType::Int, AggType::Sum),
    ]
}

/// Creates a table with its log in a fresh temp directory.
///
/// The directory guard must be kept alive for the table's lifetime.
pub fn fresh_table(dir: &TempDir, indexed: bool) -> Table {
    let table = Table::new(TableConfig::new("bench").with_dir(dir.path())).unwrap();
    for spec in inventory_columns(indexed) {
        table.create_column(spec).unwrap();
    }
    table
}

/// Generates `count` rows over `key_space` distinct product keys, seeded
/// for reproducibility.
pub fn generate_rows(count: usize, key_space: usize) -> Vec<[Value; 3]> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|_| {
            let key = rng.gen_range(0..key_space);
            [
                Value::from(format!("Product_{key:06}")),
                Value::Int(rng.gen_range(1..1000)),
                Value::Int(rng.gen_range(-5..50)),
            ]
        })
        .collect()
}
