// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Data sources the scanner walks.
//!
//! [`ChunkSource`] is the seam between the scanner and the relational store:
//! it answers the bounds aggregate and the per-window range fetch, with every
//! scope already applied. [`TableSource`] implements it on top of a DataFusion
//! [`SessionContext`].

use std::fmt;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Int64Type};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use datafusion::dataframe::DataFrame;
use datafusion::execution::context::SessionContext;
use datafusion::functions_aggregate::expr_fn::{max, min};
use datafusion::logical_expr::{ident, lit, Expr};

use crate::error::Result;
use crate::scope::{self, Scope};
use crate::types::KeyExtent;

/// Default name of the key column.
pub const DEFAULT_KEY_COLUMN: &str = "id";

const MAX_KEY_ALIAS: &str = "__chunk_max_key";
const MIN_KEY_ALIAS: &str = "__chunk_min_key";

/// A filtered, queryable table keyed by a totally ordered integer column.
#[async_trait]
pub trait ChunkSource: Send + Sync + fmt::Debug {
    /// Name of the table, used in log lines.
    fn table_name(&self) -> &str;

    /// Runs `SELECT MAX(key), MIN(key)` under the active scopes.
    ///
    /// Ungrouped queries return exactly one extent, with `None` sides when no
    /// row matched. Grouped queries return one extent per group. An empty
    /// result or [`ChunkError::NotFound`](crate::error::ChunkError::NotFound)
    /// both mean no row matched.
    async fn key_extents(&self) -> Result<Vec<KeyExtent>>;

    /// Whether the bounds aggregate yields one extent per group.
    ///
    /// Grouped sources always have their extents reduced across groups.
    fn is_grouped(&self) -> bool {
        false
    }

    /// Fetches the rows with `lo <= key < hi` under the active scopes.
    ///
    /// `hi` exceeds `i64::MAX` only for a window whose last key is `i64::MAX`.
    async fn fetch_range(&self, lo: i64, hi: i128) -> Result<Vec<RecordBatch>>;
}

/// A table registered in a DataFusion [`SessionContext`].
#[derive(Clone)]
pub struct TableSource {
    ctx: SessionContext,
    table: String,
    key_column: String,
    scopes: Vec<Arc<dyn Scope>>,
    group_by: Vec<Expr>,
}

impl fmt::Debug for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableSource")
            .field("table", &self.table)
            .field("key_column", &self.key_column)
            .field("scopes", &self.scopes)
            .field("group_by", &self.group_by)
            .finish()
    }
}

impl TableSource {
    pub fn new(ctx: SessionContext, table: impl Into<String>) -> Self {
        Self {
            ctx,
            table: table.into(),
            key_column: DEFAULT_KEY_COLUMN.to_string(),
            scopes: vec![],
            group_by: vec![],
        }
    }

    pub fn with_key_column(mut self, name: impl Into<String>) -> Self {
        self.key_column = name.into();
        self
    }

    /// Appends a scope; scopes run in the order they were added.
    pub fn with_scope(mut self, scope: Arc<dyn Scope>) -> Self {
        self.scopes.push(scope);
        self
    }

    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = Arc<dyn Scope>>) -> Self {
        self.scopes.extend(scopes);
        self
    }

    /// Appends a `WHERE predicate` scope.
    pub fn with_filter(self, predicate: Expr) -> Self {
        self.with_scope(scope::filter(predicate))
    }

    /// Groups the bounds aggregate by `exprs`, yielding one extent per group.
    ///
    /// Window fetches are not grouped.
    pub fn with_group_by(mut self, exprs: Vec<Expr>) -> Self {
        self.group_by = exprs;
        self
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    fn key(&self) -> Expr {
        ident(&self.key_column)
    }

    /// The table with every scope applied.
    pub async fn scoped(&self) -> Result<DataFrame> {
        let df = self.ctx.table(self.table.as_str()).await?;
        Ok(scope::apply_all(df, &self.scopes)?)
    }
}

#[async_trait]
impl ChunkSource for TableSource {
    fn table_name(&self) -> &str {
        &self.table
    }

    fn is_grouped(&self) -> bool {
        !self.group_by.is_empty()
    }

    async fn key_extents(&self) -> Result<Vec<KeyExtent>> {
        let df = self
            .scoped()
            .await?
            .aggregate(
                self.group_by.clone(),
                vec![
                    max(self.key()).alias(MAX_KEY_ALIAS),
                    min(self.key()).alias(MIN_KEY_ALIAS),
                ],
            )?
            .select(vec![ident(MAX_KEY_ALIAS), ident(MIN_KEY_ALIAS)])?;

        let mut extents = vec![];
        for batch in df.collect().await? {
            let maxes = cast(batch.column(0), &DataType::Int64)?;
            let mins = cast(batch.column(1), &DataType::Int64)?;
            let maxes = maxes.as_primitive::<Int64Type>();
            let mins = mins.as_primitive::<Int64Type>();
            for row in 0..batch.num_rows() {
                extents.push(KeyExtent {
                    max: maxes.is_valid(row).then(|| maxes.value(row)),
                    min: mins.is_valid(row).then(|| mins.value(row)),
                });
            }
        }
        Ok(extents)
    }

    async fn fetch_range(&self, lo: i64, hi: i128) -> Result<Vec<RecordBatch>> {
        let mut predicate = self.key().gt_eq(lit(lo));
        // past i64::MAX the upper bound excludes nothing
        if let Ok(hi) = i64::try_from(hi) {
            predicate = predicate.and(self.key().lt(lit(hi)));
        }
        Ok(self.scoped().await?.filter(predicate)?.collect().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int32Array, Int64Array, StringArray};
    use datafusion::prelude::col;

    fn users_ctx() -> SessionContext {
        let ctx = SessionContext::new();
        let batch = RecordBatch::try_from_iter(vec![
            ("id", Arc::new(Int32Array::from(vec![3, 7, 8, 15, 42])) as _),
            (
                "region",
                Arc::new(StringArray::from(vec!["eu", "us", "eu", "us", "eu"])) as _,
            ),
        ])
        .unwrap();
        ctx.register_batch("users", batch).unwrap();
        ctx
    }

    fn row_count(batches: &[RecordBatch]) -> usize {
        batches.iter().map(|b| b.num_rows()).sum()
    }

    #[tokio::test]
    async fn test_key_extents_casts_int32_keys() -> Result<()> {
        let source = TableSource::new(users_ctx(), "users");
        assert_eq!(source.key_extents().await?, vec![KeyExtent::new(42, 3)]);
        Ok(())
    }

    #[tokio::test]
    async fn test_key_extents_respects_filters() -> Result<()> {
        let source =
            TableSource::new(users_ctx(), "users").with_filter(col("region").eq(lit("us")));
        assert_eq!(source.key_extents().await?, vec![KeyExtent::new(15, 7)]);
        Ok(())
    }

    #[tokio::test]
    async fn test_key_extents_without_matches_is_null() -> Result<()> {
        let source =
            TableSource::new(users_ctx(), "users").with_filter(col("region").eq(lit("apac")));
        assert_eq!(source.key_extents().await?, vec![KeyExtent::default()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_grouped_key_extents() -> Result<()> {
        let source = TableSource::new(users_ctx(), "users").with_group_by(vec![col("region")]);
        assert!(source.is_grouped());
        let mut extents = source.key_extents().await?;
        extents.sort_by_key(|e| e.min);
        assert_eq!(extents, vec![KeyExtent::new(42, 3), KeyExtent::new(15, 7)]);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_range_is_half_open() -> Result<()> {
        let source = TableSource::new(users_ctx(), "users");
        assert_eq!(row_count(&source.fetch_range(3, 8).await?), 2);
        assert_eq!(row_count(&source.fetch_range(8, 15).await?), 1);
        assert_eq!(row_count(&source.fetch_range(16, 42).await?), 0);
        assert!(!source.is_grouped());
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_range_reaches_i64_max() -> Result<()> {
        let ctx = SessionContext::new();
        let batch = RecordBatch::try_from_iter(vec![(
            "id",
            Arc::new(Int64Array::from(vec![i64::MAX - 1, i64::MAX])) as _,
        )])?;
        ctx.register_batch("edge", batch)?;
        let source = TableSource::new(ctx, "edge");

        let rows = source.fetch_range(i64::MAX - 1, i64::MAX as i128 + 1).await?;
        assert_eq!(row_count(&rows), 2);
        let rows = source.fetch_range(i64::MAX - 1, i64::MAX as i128).await?;
        assert_eq!(row_count(&rows), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_table_is_an_error() {
        let source = TableSource::new(users_ctx(), "missing");
        let err = source.key_extents().await.unwrap_err();
        assert!(!err.is_not_found(), "unexpected error: {err:?}");
    }
}
