use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex};

use arrow::array::{Int64Array, RecordBatch};
use async_trait::async_trait;
use datafusion_chunk_scan::error::{ChunkError, Result};
use datafusion_chunk_scan::source::ChunkSource;
use datafusion_chunk_scan::types::KeyExtent;
use datafusion_common::DataFusionError;

/// In-memory source with scripted failures that records every fetch.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    ids: BTreeSet<i64>,
    /// Overrides the extents computed from `ids`.
    extents: Option<Vec<KeyExtent>>,
    bounds_not_found: bool,
    bounds_error: bool,
    grouped: bool,
    /// Windows (by `lo`) whose fetch fails.
    failing: HashSet<i64>,
    fetches: Mutex<Vec<(i64, i128)>>,
}

impl ScriptedSource {
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn with_extents(mut self, extents: Vec<KeyExtent>) -> Self {
        self.extents = Some(extents);
        self
    }

    pub fn with_bounds_not_found(mut self) -> Self {
        self.bounds_not_found = true;
        self
    }

    /// Reports the source as grouped, one extent per group.
    pub fn with_grouped(mut self) -> Self {
        self.grouped = true;
        self
    }

    pub fn with_bounds_error(mut self) -> Self {
        self.bounds_error = true;
        self
    }

    pub fn with_failing_window(mut self, lo: i64) -> Self {
        self.failing.insert(lo);
        self
    }

    pub fn fetches(&self) -> Vec<(i64, i128)> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChunkSource for ScriptedSource {
    fn table_name(&self) -> &str {
        "scripted"
    }

    fn is_grouped(&self) -> bool {
        self.grouped
    }

    async fn key_extents(&self) -> Result<Vec<KeyExtent>> {
        if self.bounds_error {
            return Err(DataFusionError::Execution("connection reset".to_string()).into());
        }
        if self.bounds_not_found {
            return Err(ChunkError::NotFound);
        }
        if let Some(extents) = &self.extents {
            return Ok(extents.clone());
        }
        Ok(vec![KeyExtent {
            max: self.ids.last().copied(),
            min: self.ids.first().copied(),
        }])
    }

    async fn fetch_range(&self, lo: i64, hi: i128) -> Result<Vec<RecordBatch>> {
        self.fetches.lock().unwrap().push((lo, hi));
        if self.failing.contains(&lo) {
            return Err(DataFusionError::Execution(format!("window {lo} timed out")).into());
        }
        let ids: Vec<i64> = match i64::try_from(hi) {
            Ok(hi) => self.ids.range(lo..hi).copied().collect(),
            Err(_) => self.ids.range(lo..).copied().collect(),
        };
        if ids.is_empty() {
            return Ok(vec![]);
        }
        Ok(vec![RecordBatch::try_from_iter(vec![(
            "id",
            Arc::new(Int64Array::from(ids)) as _,
        )])?])
    }
}
