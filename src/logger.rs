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

//! Pluggable log sinks for scan progress.
//!
//! The scanner never logs through a global; it is handed a [`Logger`] and
//! writes its progress lines there. [`ConsoleLogger`] forwards to the [`log`]
//! facade, so output reaches the console once a backend such as `env_logger`
//! is installed. [`NoLogger`] discards everything.

use std::fmt;
use std::sync::Arc;

/// Log target used by [`ConsoleLogger`].
pub const LOG_TARGET: &str = "chunk_scan";

/// Leveled message sink used by the scanner.
pub trait Logger: fmt::Debug + Send + Sync {
    /// Log a debug message.
    fn debug(&self, msg: &str);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log an error message.
    fn error(&self, msg: &str);
}

/// Writes every message through the `log` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn debug(&self, msg: &str) {
        log::debug!(target: LOG_TARGET, "{msg}");
    }

    fn info(&self, msg: &str) {
        log::info!(target: LOG_TARGET, "{msg}");
    }

    fn error(&self, msg: &str) {
        log::error!(target: LOG_TARGET, "{msg}");
    }
}

/// Drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLogger;

impl Logger for NoLogger {
    fn debug(&self, _msg: &str) {}

    fn info(&self, _msg: &str) {}

    fn error(&self, _msg: &str) {}
}

/// Resolves an optional logger, falling back to [`ConsoleLogger`].
pub fn or_console(logger: Option<Arc<dyn Logger>>) -> Arc<dyn Logger> {
    logger.unwrap_or_else(|| Arc::new(ConsoleLogger))
}
