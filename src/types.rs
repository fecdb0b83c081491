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

//! Common type definitions used throughout the crate.

use std::fmt;
use std::time::Duration;

use crate::error::{ChunkError, Result};

/// One `(MAX(key), MIN(key))` row of the bounds aggregate.
///
/// A grouped aggregate yields one extent per group. Either side is `None`
/// when the aggregate ran over no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyExtent {
    pub max: Option<i64>,
    pub min: Option<i64>,
}

impl KeyExtent {
    pub fn new(max: i64, min: i64) -> Self {
        Self {
            max: Some(max),
            min: Some(min),
        }
    }

    /// Returns the extent as bounds if both sides are present.
    pub fn bounds(&self) -> Option<KeyBounds> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => KeyBounds::new(min, max).ok(),
            _ => None,
        }
    }
}

/// Inclusive `[min, max]` range of key values matching the active scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBounds {
    min: i64,
    max: i64,
}

impl KeyBounds {
    pub fn new(min: i64, max: i64) -> Result<Self> {
        if min > max {
            return Err(ChunkError::InvalidArgument(format!(
                "key bounds min {min} is greater than max {max}"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// Splits the bounds into consecutive half-open windows of `size` keys.
    ///
    /// The windows tile `[min, max + 1)` exactly; only the last one may be
    /// shorter than `size`.
    pub fn windows(&self, size: i64) -> Result<Windows> {
        if size <= 0 {
            return Err(ChunkError::InvalidArgument(format!(
                "chunk size must be positive, got {size}"
            )));
        }
        Ok(Windows {
            next_lo: Some(self.min),
            max: self.max,
            size,
            seq: 0,
        })
    }

    /// Number of windows of `size` keys needed to cover the bounds.
    pub fn window_count(&self, size: i64) -> u64 {
        if size <= 0 {
            return 0;
        }
        let span = self.max as i128 - self.min as i128 + 1;
        ((span + size as i128 - 1) / size as i128) as u64
    }
}

impl fmt::Display for KeyBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MinId({}), MaxId({})", self.min, self.max)
    }
}

/// A half-open key interval `[lo, hi)` processed in one iteration.
///
/// `hi` is wide enough to hold `i64::MAX + 1`, the end of a window whose
/// last key is `i64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// 1-based position of the window in the scan.
    pub seq: usize,
    pub lo: i64,
    pub hi: i128,
}

impl Window {
    /// Returns true if `key` falls inside the window.
    pub fn contains(&self, key: i64) -> bool {
        self.lo <= key && (key as i128) < self.hi
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No.{}, {} <= id < {}", self.seq, self.lo, self.hi)
    }
}

/// Iterator returned by [`KeyBounds::windows`].
#[derive(Debug, Clone)]
pub struct Windows {
    next_lo: Option<i64>,
    max: i64,
    size: i64,
    seq: usize,
}

impl Iterator for Windows {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        let lo = self.next_lo?;
        if lo > self.max {
            self.next_lo = None;
            return None;
        }
        self.seq += 1;
        let hi = (lo as i128 + self.size as i128).min(self.max as i128 + 1);
        self.next_lo = lo.checked_add(self.size);
        Some(Window {
            seq: self.seq,
            lo,
            hi,
        })
    }
}

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    /// No row matched the scopes; no window was fetched.
    NothingToScan,
    /// Every window was visited.
    Completed,
    /// A handler asked to stop.
    Broken,
    /// The cancellation token fired between windows.
    Cancelled,
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScanStatus::NothingToScan => "nothing to scan",
            ScanStatus::Completed => "completed",
            ScanStatus::Broken => "broken by callback",
            ScanStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Outcome of a full scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub status: ScanStatus,
    pub bounds: Option<KeyBounds>,
    /// Windows visited, empty and failed ones included.
    pub windows: usize,
    /// Handler invocations.
    pub callbacks: usize,
    pub total_rows: u64,
    pub fetch_errors: usize,
    pub callback_errors: usize,
    pub elapsed: Duration,
}

impl ScanSummary {
    pub(crate) fn new(bounds: Option<KeyBounds>) -> Self {
        Self {
            status: if bounds.is_some() {
                ScanStatus::Completed
            } else {
                ScanStatus::NothingToScan
            },
            bounds,
            windows: 0,
            callbacks: 0,
            total_rows: 0,
            fetch_errors: 0,
            callback_errors: 0,
            elapsed: Duration::ZERO,
        }
    }
}
