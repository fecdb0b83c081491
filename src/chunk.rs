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

//! The ID-range window iterator.
//!
//! [`ChunkScanner`] resolves the key bounds of a [`ChunkSource`] once, then
//! walks `[min, max]` in fixed windows of `size` keys:
//!
//! ```text
//! lo := min
//! while lo <= max:
//!     hi   := min(lo + size, max + 1)
//!     rows := fetch(lo <= key < hi)         // replaces `dest`
//!     if rows > 0: handler(window, dest)
//!     lo += size
//! ```
//!
//! Windows advance by `size` no matter how many rows came back, so sparse key
//! spaces are fine. A failed window fetch is logged and skipped. A handler
//! can stop the scan with [`ChunkControl::Break`]; any other handler failure
//! is logged and the scan goes on, unless the scanner is strict.
//!
//! The scan is sequential: each fetch and handler call finishes before the
//! next window starts.

use std::sync::Arc;
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use tokio_util::sync::CancellationToken;

use crate::bounds::{max_min_id, BoundsMode};
use crate::config::ChunkConfig;
use crate::error::{ChunkError, Result};
use crate::handler::{ChunkControl, ChunkHandler};
use crate::logger::{or_console, Logger};
use crate::source::ChunkSource;
use crate::types::{KeyBounds, ScanStatus, ScanSummary};

/// Walks a [`ChunkSource`] window by window.
#[derive(Debug, Clone)]
pub struct ChunkScanner {
    size: i64,
    strict: bool,
    bounds_mode: BoundsMode,
    cancel: Option<CancellationToken>,
    logger: Arc<dyn Logger>,
}

impl ChunkScanner {
    /// A lenient scanner with `size` keys per window that logs to the console.
    pub fn new(size: i64) -> Self {
        Self {
            size,
            strict: false,
            bounds_mode: BoundsMode::Plain,
            cancel: None,
            logger: or_console(None),
        }
    }

    pub fn from_config(config: &ChunkConfig) -> Self {
        Self::new(config.size)
            .with_strict(config.strict)
            .with_bounds_mode(config.bounds_mode)
    }

    /// When set, the first failing handler aborts the scan with
    /// [`ChunkError::Callback`].
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_bounds_mode(mut self, mode: BoundsMode) -> Self {
        self.bounds_mode = mode;
        self
    }

    /// Checked before every window; once cancelled the scan stops.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// `None` selects the console logger.
    pub fn with_logger(mut self, logger: Option<Arc<dyn Logger>>) -> Self {
        self.logger = or_console(logger);
        self
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    fn check_size(&self) -> Result<()> {
        if self.size <= 0 {
            return Err(ChunkError::InvalidArgument(format!(
                "chunk size must be positive, got {}",
                self.size
            )));
        }
        Ok(())
    }

    /// Resolves the bounds of `source` and walks them.
    ///
    /// `dest` is cleared and refilled for every window; it never accumulates
    /// rows across windows. A failing bounds query is returned before any
    /// window is fetched.
    pub async fn scan<H>(
        &self,
        source: &dyn ChunkSource,
        dest: &mut Vec<RecordBatch>,
        handler: &mut H,
    ) -> Result<ScanSummary>
    where
        H: ChunkHandler + ?Sized,
    {
        self.check_size()?;
        let start = Instant::now();
        let bounds = match max_min_id(source, self.bounds_mode).await {
            Ok(bounds) => bounds,
            Err(e) => {
                self.logger.error(&format!(
                    "query MinId and MaxId of `{}` error: {e}",
                    source.table_name()
                ));
                return Err(e);
            }
        };
        self.walk(start, bounds, source, dest, handler).await
    }

    /// Walks bounds that were resolved beforehand.
    pub async fn scan_bounds<H>(
        &self,
        bounds: Option<KeyBounds>,
        source: &dyn ChunkSource,
        dest: &mut Vec<RecordBatch>,
        handler: &mut H,
    ) -> Result<ScanSummary>
    where
        H: ChunkHandler + ?Sized,
    {
        self.check_size()?;
        self.walk(Instant::now(), bounds, source, dest, handler).await
    }

    async fn walk<H>(
        &self,
        start: Instant,
        bounds: Option<KeyBounds>,
        source: &dyn ChunkSource,
        dest: &mut Vec<RecordBatch>,
        handler: &mut H,
    ) -> Result<ScanSummary>
    where
        H: ChunkHandler + ?Sized,
    {
        let table = source.table_name();
        let mut summary = ScanSummary::new(bounds);
        dest.clear();

        let Some(bounds) = bounds else {
            self.logger.info(&format!(
                "no matching data in `{table}`, nothing to scan...MinId(null), MaxId(null)"
            ));
            summary.elapsed = start.elapsed();
            return Ok(summary);
        };
        self.logger.info(&format!("query result of `{table}`: {bounds}"));

        let mut failure = None;
        for window in bounds.windows(self.size)? {
            if self.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
                self.logger.info(&format!(
                    "scan of `{table}` cancelled before No.{}",
                    window.seq
                ));
                summary.status = ScanStatus::Cancelled;
                break;
            }

            dest.clear();
            summary.windows += 1;
            let rows = match source.fetch_range(window.lo, window.hi).await {
                Ok(batches) => {
                    dest.extend(batches);
                    dest.iter().map(|b| b.num_rows() as u64).sum::<u64>()
                }
                Err(e) => {
                    self.logger.error(&format!("{window}, query error: {e}"));
                    summary.fetch_errors += 1;
                    continue;
                }
            };
            self.logger.debug(&format!(
                "No.{}, query result {} <= id < {}, count: {rows}",
                window.seq, window.lo, window.hi
            ));
            summary.total_rows += rows;

            // sparse keys leave windows empty; that does not end the scan
            if rows == 0 {
                continue;
            }

            summary.callbacks += 1;
            match handler.handle(&window, dest).await {
                ChunkControl::Continue => {}
                ChunkControl::Break => {
                    self.logger
                        .info(&format!("No.{}, callback requested break", window.seq));
                    summary.status = ScanStatus::Broken;
                    break;
                }
                ChunkControl::Fail(err) => {
                    self.logger.error(&format!(
                        "No.{}, callback return ---> {err}",
                        window.seq
                    ));
                    summary.callback_errors += 1;
                    if self.strict {
                        failure = Some(ChunkError::Callback {
                            window: window.seq,
                            source: err,
                        });
                        break;
                    }
                }
            }
        }

        summary.elapsed = start.elapsed();
        self.logger.info(&format!(
            "data processing of `{table}` is {}...Used: {:.2}ms, TotalCount: {}",
            summary.status,
            summary.elapsed.as_secs_f64() * 1e3,
            summary.total_rows
        ));
        match failure {
            Some(err) => Err(err),
            None => Ok(summary),
        }
    }
}

/// Scans `source` in windows of `size` keys with the lenient defaults.
///
/// `logger` defaults to the console logger.
pub async fn chunk_by_id_max_min<H>(
    size: i64,
    source: &dyn ChunkSource,
    dest: &mut Vec<RecordBatch>,
    handler: &mut H,
    logger: Option<Arc<dyn Logger>>,
) -> Result<ScanSummary>
where
    H: ChunkHandler + ?Sized,
{
    ChunkScanner::new(size)
        .with_logger(logger)
        .scan(source, dest, handler)
        .await
}
