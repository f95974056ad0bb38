//! The table coordinator.
//!
//! A `Table` owns its schema, one chunked column per declared column, the
//! MVCC creation-timestamp metadata, optional per-column equality
//! indexes, the atomic tail cursor and logical clock, and the table's
//! write-ahead log.
//!
//! The insert path is ordered so that a reader who observes a committed
//! creation timestamp also observes every cell write of that row, and so
//! that a crash at any point loses at most unacknowledged work: cells and
//! index postings are written first, then the log record is buffered, and
//! the creation timestamp is published last.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::{debug, info};

use strata_common::config::TableConfig;
use strata_common::constants::{CHUNK_SIZE, MAX_ROWS};
use strata_common::error::{StrataError, StrataResult};
use strata_common::types::{AggType, ColumnSpec, ColumnType, RowId, TxId, Value};
use strata_index::HashIndex;
use strata_storage::{ColumnData, MvccMeta};
use strata_wal::{WalConfig, WalWriter};

/// One declared column: its spec, its chunked store, and its index.
struct ColumnEntry {
    spec: ColumnSpec,
    data: ColumnData,
    index: Option<HashIndex>,
}

/// The schema vector and the name → position map it implies.
///
/// Guarded by a reader/writer lock: `create_column` takes it exclusively,
/// steady-state inserts and queries share it.
#[derive(Default)]
struct Schema {
    columns: Vec<ColumnEntry>,
    by_name: HashMap<String, usize>,
}

/// Point-in-time counters for diagnostics and tests.
#[derive(Debug, Clone)]
pub struct TableStats {
    /// Rows claimed from the tail cursor (committed rows are a prefix).
    pub claimed_rows: u64,
    /// Current logical clock value.
    pub logical_time: u64,
    /// Allocated MVCC metadata chunks.
    pub mvcc_chunks: usize,
    /// Allocated chunks per column, in schema order.
    pub column_chunks: Vec<usize>,
    /// Distinct keys in each column's equality index, in schema order;
    /// `None` for unindexed columns.
    pub index_keys: Vec<Option<usize>>,
}

/// An in-memory, insert-only, column-oriented table with MVCC visibility
/// and a write-ahead log.
pub struct Table {
    name: String,
    config: TableConfig,
    schema: RwLock<Schema>,
    mvcc: MvccMeta,
    /// Count of claimed row indices; fetch-add hands each index to
    /// exactly one writer.
    tail: AtomicU64,
    /// Monotonic logical clock; advanced by one per insert. Its value
    /// orders LAST resolution, independently of row-index order.
    clock: AtomicU64,
    /// Cleared while recovery replays the log through the insert path.
    logging: AtomicBool,
    /// Set once the row capacity is exhausted.
    read_only: AtomicBool,
    wal: WalWriter,
}

impl Table {
    /// Opens a table according to its configuration.
    ///
    /// With `truncate_log` set this is a fresh table and any existing log
    /// is cleared; without it, existing records are preserved so the
    /// caller can re-declare the schema and [`recover`](Self::recover).
    pub fn new(config: TableConfig) -> StrataResult<Self> {
        config
            .validate()
            .map_err(StrataError::invalid_config)?;

        let wal = WalWriter::open(
            WalConfig::new(config.log_path())
                .with_truncate(config.truncate_log)
                .with_flush_interval(config.flush_interval)
                .with_buffer_capacity(config.log_buffer_capacity),
        )?;

        Ok(Self {
            name: config.name.clone(),
            config,
            schema: RwLock::new(Schema::default()),
            mvcc: MvccMeta::new(),
            tail: AtomicU64::new(0),
            clock: AtomicU64::new(0),
            logging: AtomicBool::new(true),
            read_only: AtomicBool::new(false),
            wal,
        })
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared column specs, in schema order.
    #[must_use]
    pub fn schema(&self) -> Vec<ColumnSpec> {
        self.schema.read().columns.iter().map(|c| c.spec.clone()).collect()
    }

    /// Returns the number of claimed row indices. Committed rows are a
    /// prefix of these, each with a finite creation timestamp.
    #[must_use]
    pub fn row_count(&self) -> u64 {
        self.tail.load(Ordering::Acquire)
    }

    /// Returns the current logical clock value.
    #[must_use]
    pub fn logical_time(&self) -> u64 {
        self.clock.load(Ordering::Acquire)
    }

    /// Returns point-in-time counters.
    #[must_use]
    pub fn stats(&self) -> TableStats {
        let schema = self.schema.read();
        TableStats {
            claimed_rows: self.row_count(),
            logical_time: self.logical_time(),
            mvcc_chunks: self.mvcc.allocated_chunks(),
            column_chunks: schema.columns.iter().map(|c| c.data.allocated_chunks()).collect(),
            index_keys: schema
                .columns
                .iter()
                .map(|c| c.index.as_ref().map(HashIndex::key_count))
                .collect(),
        }
    }

    /// Declares a column.
    ///
    /// The schema freezes at the first insert; SUM is only defined for
    /// INT columns and indexes only for STRING columns.
    pub fn create_column(&self, spec: ColumnSpec) -> StrataResult<()> {
        if self.tail.load(Ordering::Acquire) > 0 {
            return Err(StrataError::SchemaFrozen {
                table: self.name.clone(),
            });
        }

        if spec.agg == AggType::Sum && spec.column_type == ColumnType::Str {
            return Err(StrataError::invalid_column_spec(
                &spec.name,
                "SUM is only defined for INT columns",
            ));
        }
        if spec.indexed && spec.column_type == ColumnType::Int {
            return Err(StrataError::invalid_column_spec(
                &spec.name,
                "indexes are only supported on STRING columns",
            ));
        }

        let mut schema = self.schema.write();
        if schema.by_name.contains_key(&spec.name) {
            return Err(StrataError::DuplicateColumn {
                column: spec.name.clone(),
                table: self.name.clone(),
            });
        }

        let entry = ColumnEntry {
            data: ColumnData::new(spec.column_type),
            index: spec.indexed.then(HashIndex::new),
            spec,
        };
        let position = schema.columns.len();
        schema.by_name.insert(entry.spec.name.clone(), position);
        schema.columns.push(entry);
        Ok(())
    }

    /// Inserts one row, values in schema order.
    ///
    /// Returns the claimed row index. Once an index has been claimed, a
    /// later failure leaves that row permanently uncommitted, invisible
    /// to every query.
    pub fn insert(&self, values: &[Value]) -> StrataResult<RowId> {
        let schema = self.schema.read();

        // Validation happens before the claim so a bad row costs nothing.
        if values.len() != schema.columns.len() {
            return Err(StrataError::schema_mismatch(format!(
                "expected {} values, got {}",
                schema.columns.len(),
                values.len()
            )));
        }
        for (entry, value) in schema.columns.iter().zip(values) {
            if !value.matches(entry.spec.column_type) {
                return Err(StrataError::schema_mismatch(format!(
                    "column '{}' is {}, got a {} value",
                    entry.spec.name,
                    entry.spec.column_type,
                    value.column_type()
                )));
            }
        }

        if self.read_only.load(Ordering::Acquire) {
            return Err(StrataError::CapacityExceeded {
                row: self.tail.load(Ordering::Acquire),
                max_rows: MAX_ROWS,
            });
        }

        // Claim: this index now belongs to this thread alone.
        let claimed = self.tail.fetch_add(1, Ordering::Relaxed);
        if claimed >= MAX_ROWS {
            self.read_only.store(true, Ordering::Release);
            return Err(StrataError::CapacityExceeded {
                row: claimed,
                max_rows: MAX_ROWS,
            });
        }
        let row = RowId::new(claimed);

        // Chunks must exist in the MVCC store and every column before any
        // payload lands. All calls are idempotent.
        let chunk_index = row.chunk_index(CHUNK_SIZE);
        self.mvcc.ensure_chunk(chunk_index)?;
        for entry in &schema.columns {
            entry.data.ensure_chunk(chunk_index)?;
        }

        let tx = TxId::new(self.clock.fetch_add(1, Ordering::Relaxed) + 1);

        for (entry, value) in schema.columns.iter().zip(values) {
            entry.data.set(row, value)?;
            if let (Some(index), Value::Str(key)) = (&entry.index, value) {
                index.insert(key.clone(), row);
            }
        }

        // Log before publication: a crash in between yields a log record
        // without a committed in-memory row, which replay reconstructs.
        if self.logging.load(Ordering::Relaxed) {
            self.wal.append_entry(values);
        }

        // Publication: release pairs with the acquire in visibility reads,
        // making every cell write above visible to whoever sees this row
        // as committed.
        self.mvcc.set_created(row, tx);
        Ok(row)
    }

    /// Folds all visible rows matching `key` in `key_column` into one
    /// logical row at the latest committed snapshot.
    ///
    /// LAST columns resolve to the value of the newest matching row by
    /// creation timestamp; SUM columns accumulate over every matching
    /// row in 64-bit signed arithmetic. The key column is echoed back;
    /// when no row matches, the result holds only that echo.
    pub fn query_snapshot(
        &self,
        key_column: &str,
        key: &Value,
    ) -> StrataResult<HashMap<String, String>> {
        let query_ts = self.clock.load(Ordering::Acquire);
        self.query_snapshot_at(key_column, key, query_ts)
    }

    /// The fold, pinned to a caller-supplied snapshot. Not public: the
    /// query API always reads the latest committed snapshot.
    fn query_snapshot_at(
        &self,
        key_column: &str,
        key: &Value,
        query_ts: u64,
    ) -> StrataResult<HashMap<String, String>> {
        let schema = self.schema.read();

        let key_idx = *schema
            .by_name
            .get(key_column)
            .ok_or_else(|| StrataError::unknown_column(key_column, &self.name))?;
        let key_entry = &schema.columns[key_idx];
        if !key.matches(key_entry.spec.column_type) {
            return Err(StrataError::TypeMismatch {
                expected: key_entry.spec.column_type,
                actual: key.column_type(),
            });
        }

        // Candidate selection: index probe where possible, else a scan of
        // every claimed row. Index-sourced candidates still pass through
        // the key equality check below, so a bucket that is stale relative
        // to publication cannot corrupt the result.
        let candidates: Box<dyn Iterator<Item = RowId>> = match (&key_entry.index, key) {
            (Some(index), Value::Str(bytes)) => Box::new(index.lookup(bytes).into_iter()),
            _ => Box::new((0..self.tail.load(Ordering::Acquire)).map(RowId::new)),
        };

        let width = schema.columns.len();
        let mut sums = vec![0i64; width];
        let mut last_ts = vec![0u64; width];
        let mut last_val: Vec<Option<Value>> = vec![None; width];
        let mut matched = 0u64;

        for row in candidates {
            if !self.mvcc.is_visible(row, query_ts) {
                continue;
            }
            if key_entry.data.get(row) != *key {
                continue;
            }
            let row_ts = self.mvcc.get_created(row).as_u64();
            matched += 1;

            for (i, entry) in schema.columns.iter().enumerate() {
                if i == key_idx {
                    continue;
                }
                match entry.spec.agg {
                    AggType::Sum => {
                        let cell = entry.data.get(row).as_int().unwrap_or(0);
                        sums[i] = sums[i].wrapping_add(cell);
                    }
                    AggType::Last => {
                        if row_ts > last_ts[i] {
                            last_ts[i] = row_ts;
                            last_val[i] = Some(entry.data.get(row));
                        }
                    }
                }
            }
        }

        let mut result = HashMap::new();
        result.insert(key_column.to_string(), key.render());
        if matched > 0 {
            for (i, entry) in schema.columns.iter().enumerate() {
                if i == key_idx {
                    continue;
                }
                match entry.spec.agg {
                    AggType::Sum => {
                        result.insert(entry.spec.name.clone(), sums[i].to_string());
                    }
                    AggType::Last => {
                        if let Some(value) = &last_val[i] {
                            result.insert(entry.spec.name.clone(), value.render());
                        }
                    }
                }
            }
        }
        Ok(result)
    }

    /// Returns every visible physical row at the latest committed
    /// snapshot, in row-index order. This is the `SELECT *` view: no
    /// folding, one entry per physical row.
    #[must_use]
    pub fn scan_snapshot(&self) -> Vec<Vec<Value>> {
        let schema = self.schema.read();
        let query_ts = self.clock.load(Ordering::Acquire);
        let claimed = self.tail.load(Ordering::Acquire);

        (0..claimed)
            .map(RowId::new)
            .filter(|row| self.mvcc.is_visible(*row, query_ts))
            .map(|row| schema.columns.iter().map(|entry| entry.data.get(row)).collect())
            .collect()
    }

    /// Replays the table's log through the insert path.
    ///
    /// Pre-conditions: the schema has been re-declared in its original
    /// order, and nothing has been inserted yet. Logging is disabled for
    /// the duration of the replay and re-enabled afterwards, so recovered
    /// rows are not re-appended to the log they came from.
    ///
    /// Returns the number of rows replayed. Afterwards the tail cursor
    /// and the logical clock both equal that count.
    pub fn recover(&self) -> StrataResult<usize> {
        if self.tail.load(Ordering::Acquire) > 0 {
            return Err(StrataError::schema_mismatch(
                "recovery requires a table with no inserted rows",
            ));
        }

        let column_types: Vec<ColumnType> = {
            let schema = self.schema.read();
            schema.columns.iter().map(|c| c.spec.column_type).collect()
        };

        let rows = strata_wal::read_log(&self.config.log_path(), &column_types)?;
        debug!(table = %self.name, records = rows.len(), "replaying log");

        self.logging.store(false, Ordering::Relaxed);
        let replay = || -> StrataResult<usize> {
            for row in &rows {
                self.insert(row)?;
            }
            Ok(rows.len())
        };
        let result = replay();
        self.logging.store(true, Ordering::Relaxed);

        let replayed = result?;
        info!(table = %self.name, rows = replayed, "recovery complete");
        Ok(replayed)
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("columns", &self.schema.read().columns.len())
            .field("claimed_rows", &self.row_count())
            .field("logical_time", &self.logical_time())
            .finish()
    }
}
