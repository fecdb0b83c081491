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

//! Scanner settings that batch jobs embed in their own configuration.

use serde::{Deserialize, Serialize};

use crate::bounds::BoundsMode;

pub const DEFAULT_CHUNK_SIZE: i64 = 1000;

/// Settings for a [`ChunkScanner`](crate::chunk::ChunkScanner).
///
/// Every field is optional when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    /// Keys per window. Must be positive.
    pub size: i64,
    /// Abort on the first handler failure instead of logging it.
    pub strict: bool,
    pub bounds_mode: BoundsMode,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_CHUNK_SIZE,
            strict: false,
            bounds_mode: BoundsMode::Plain,
        }
    }
}
