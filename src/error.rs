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

//! Error types shared by the bounds resolver and the window iterator.

use arrow::error::ArrowError;
use datafusion_common::DataFusionError;
use thiserror::Error;

/// Boxed error returned by chunk handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type used throughout the crate.
pub type Result<T, E = ChunkError> = std::result::Result<T, E>;

/// Errors produced while resolving key bounds or walking windows.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// The query matched no rows.
    ///
    /// Sources may return this from
    /// [`ChunkSource::key_extents`](crate::source::ChunkSource::key_extents);
    /// the bounds resolver turns it into "nothing to scan" rather than a
    /// failure.
    #[error("record not found")]
    NotFound,

    /// A caller supplied an argument the scanner cannot work with.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Planning or execution failed inside DataFusion.
    #[error(transparent)]
    DataFusion(#[from] DataFusionError),

    /// Decoding an Arrow array failed.
    #[error(transparent)]
    Arrow(#[from] ArrowError),

    /// A handler failed while the scanner runs in strict mode.
    #[error("chunk handler failed on window No.{window}: {source}")]
    Callback {
        window: usize,
        #[source]
        source: BoxError,
    },
}

impl ChunkError {
    /// Returns true if this error only says that no rows matched.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ChunkError::NotFound)
    }
}
