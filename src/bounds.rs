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

//! Key bounds discovery.
//!
//! The scanner needs the smallest and largest key under the active scopes
//! before it can lay out windows. Sources answer with one or more
//! `(MAX, MIN)` extents; this module reduces them to [`KeyBounds`].

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::source::ChunkSource;
use crate::types::{KeyBounds, KeyExtent};

/// How the bounds aggregate is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsMode {
    /// The aggregate yields a single row; only the first extent is read,
    /// unless the source reports itself grouped.
    #[default]
    Plain,
    /// The aggregate yields one row per group; extents are reduced to the
    /// overall maximum and minimum.
    Grouped,
}

/// Resolves the key bounds of `source`.
///
/// Extents are reduced across groups in [`BoundsMode::Grouped`] and whenever
/// [`ChunkSource::is_grouped`] is true. Returns `Ok(None)` when no row
/// matches, including the case where the source reports
/// [`ChunkError::NotFound`](crate::error::ChunkError::NotFound). Any other
/// failure is returned unchanged.
pub async fn max_min_id(source: &dyn ChunkSource, mode: BoundsMode) -> Result<Option<KeyBounds>> {
    let extents = match source.key_extents().await {
        Ok(extents) => extents,
        Err(e) if e.is_not_found() => return Ok(None),
        Err(e) => return Err(e),
    };
    if mode == BoundsMode::Grouped || source.is_grouped() {
        return Ok(reduce_extents(&extents));
    }
    Ok(extents.first().and_then(KeyExtent::bounds))
}

/// Maximum of the per-group maxima and minimum of the per-group minima.
///
/// Groups with null sides are skipped; `None` if nothing is left.
pub fn reduce_extents(extents: &[KeyExtent]) -> Option<KeyBounds> {
    let max = extents.iter().filter_map(|e| e.max).max()?;
    let min = extents.iter().filter_map(|e| e.min).min()?;
    KeyBounds::new(min, max).ok()
}
