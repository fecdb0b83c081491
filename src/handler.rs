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

//! Per-window handlers and the result they hand back to the scanner.

use std::error::Error;
use std::fmt;

use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use thiserror::Error;

use crate::error::BoxError;
use crate::types::Window;

/// What the scanner should do after a handler returns.
pub enum ChunkControl {
    /// Move on to the next window.
    Continue,
    /// Stop the scan. This is a successful, intentionally shortened scan.
    Break,
    /// The handler failed on this window.
    ///
    /// By default the failure is logged and the scan moves on; a strict
    /// [`ChunkScanner`](crate::chunk::ChunkScanner) aborts instead.
    Fail(BoxError),
}

impl ChunkControl {
    pub fn fail(err: impl Into<BoxError>) -> Self {
        ChunkControl::Fail(err.into())
    }

    pub fn is_break(&self) -> bool {
        matches!(self, ChunkControl::Break)
    }
}

impl fmt::Debug for ChunkControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkControl::Continue => f.write_str("Continue"),
            ChunkControl::Break => f.write_str("Break"),
            ChunkControl::Fail(err) => f.debug_tuple("Fail").field(&err.to_string()).finish(),
        }
    }
}

/// Error marker that requests a [`ChunkControl::Break`].
///
/// Handlers written with `?` can return it, or any error whose
/// [`source`](Error::source) chain contains it, and convert the result with
/// `ChunkControl::from`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Error)]
#[error("break the chunk loop")]
pub struct BreakChunk;

/// Returns true if `err` is, or wraps, [`BreakChunk`].
pub fn is_break_chunk(err: &(dyn Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<BreakChunk>() {
            return true;
        }
        current = e.source();
    }
    false
}

impl From<Result<(), BoxError>> for ChunkControl {
    fn from(res: Result<(), BoxError>) -> Self {
        match res {
            Ok(()) => ChunkControl::Continue,
            Err(err) if is_break_chunk(&*err) => ChunkControl::Break,
            Err(err) => ChunkControl::Fail(err),
        }
    }
}

/// Caller logic run once for every non-empty window.
#[async_trait]
pub trait ChunkHandler: Send {
    /// Handles the rows of `window`. `rows` holds this window only.
    async fn handle(&mut self, window: &Window, rows: &[RecordBatch]) -> ChunkControl;
}

/// Adapter returned by [`from_fn`].
pub struct FnHandler<F>(F);

#[async_trait]
impl<F> ChunkHandler for FnHandler<F>
where
    F: FnMut(&Window, &[RecordBatch]) -> ChunkControl + Send,
{
    async fn handle(&mut self, window: &Window, rows: &[RecordBatch]) -> ChunkControl {
        (self.0)(window, rows)
    }
}

/// Wraps a synchronous closure as a [`ChunkHandler`].
pub fn from_fn<F>(f: F) -> FnHandler<F>
where
    F: FnMut(&Window, &[RecordBatch]) -> ChunkControl + Send,
{
    FnHandler(f)
}
