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

//! # DataFusion Chunk Scan
//!
//! This crate walks arbitrarily large tables in fixed-size, non-overlapping
//! primary-key windows, handing each non-empty window to caller logic. It is
//! meant for batch jobs (migrations, backfills, exports) that must touch
//! millions of rows without loading them all at once or holding one giant
//! scan open.
//!
//! ## Architecture Overview
//!
//! A scan runs in two phases:
//!
//! 1. **Bounds Phase**: one aggregate query finds `MIN(key)` and `MAX(key)`
//!    under the active scopes ([`bounds::max_min_id`]). Grouped queries yield
//!    one extent per group, reduced to the overall minimum and maximum.
//! 2. **Window Phase**: the range `[min, max + 1)` is tiled with half-open
//!    windows of `size` keys. Each window is fetched into a caller-owned
//!    buffer and, when it holds rows, handed to a [`handler::ChunkHandler`].
//!
//! ```text
//! ChunkScanner::scan
//! ├── max_min_id            SELECT MAX(id), MIN(id) ... [GROUP BY ...]
//! └── for window in bounds.windows(size)
//!     ├── fetch_range       SELECT * ... WHERE lo <= id AND id < hi
//!     └── handler.handle    skipped for empty windows
//! ```
//!
//! ## Core Components
//!
//! - [`source::ChunkSource`]: the store seam; [`source::TableSource`]
//!   implements it over a DataFusion `SessionContext`
//! - [`scope::Scope`]: filters and other DataFrame transforms applied before
//!   every query, including [`order::OrderParam`] and [`pager::PageParam`]
//! - [`chunk::ChunkScanner`]: the window iterator, and
//!   [`chunk::chunk_by_id_max_min`] for the common case
//! - [`handler::ChunkControl`]: `Continue`, `Break` or `Fail` from a handler
//! - [`logger::Logger`]: injected log sink with console and no-op variants
//!
//! ## Failure Handling
//!
//! | Condition | Effect |
//! |-----------|--------|
//! | bounds query fails | error returned, no window fetched |
//! | no matching rows | [`types::ScanStatus::NothingToScan`], not an error |
//! | window fetch fails | logged, window skipped, scan continues |
//! | handler returns `Break` | scan stops, [`types::ScanStatus::Broken`] |
//! | handler returns `Fail` | logged, scan continues (aborts when strict) |
//!
//! Handler failures do not stop a lenient scan. Callers that expect any
//! failure to halt processing should enable
//! [`chunk::ChunkScanner::with_strict`].

pub mod bounds;
pub mod chunk;
pub mod config;
pub mod error;
pub mod handler;
pub mod logger;
pub mod order;
pub mod pager;
pub mod scope;
pub mod source;
pub mod types;

pub use chunk::{chunk_by_id_max_min, ChunkScanner};
pub use error::{ChunkError, Result};
pub use handler::{BreakChunk, ChunkControl, ChunkHandler};
pub use source::{ChunkSource, TableSource};
pub use types::{KeyBounds, ScanStatus, ScanSummary, Window};
