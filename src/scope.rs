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

//! Composable query scopes.
//!
//! A [`Scope`] transforms a DataFusion [`DataFrame`] before the scanner adds
//! its own aggregate or range predicate. Scopes run in the order they were
//! added to a [`TableSource`](crate::source::TableSource), for the bounds
//! query and for every window fetch alike.

use std::fmt;
use std::sync::Arc;

use datafusion::dataframe::DataFrame;
use datafusion::prelude::Expr;
use datafusion_common::Result;

/// A transformation applied to the query before it is executed.
pub trait Scope: fmt::Debug + Send + Sync {
    fn apply(&self, df: DataFrame) -> Result<DataFrame>;
}

/// Keeps only rows matching `predicate`.
#[derive(Debug, Clone)]
pub struct Filter(pub Expr);

impl Scope for Filter {
    fn apply(&self, df: DataFrame) -> Result<DataFrame> {
        df.filter(self.0.clone())
    }
}

/// Shorthand for `Arc::new(Filter(predicate))`.
pub fn filter(predicate: Expr) -> Arc<dyn Scope> {
    Arc::new(Filter(predicate))
}

/// A scope backed by a closure.
pub struct FnScope<F> {
    name: String,
    f: F,
}

impl<F> fmt::Debug for FnScope<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnScope").field(&self.name).finish()
    }
}

impl<F> Scope for FnScope<F>
where
    F: Fn(DataFrame) -> Result<DataFrame> + Send + Sync,
{
    fn apply(&self, df: DataFrame) -> Result<DataFrame> {
        (self.f)(df)
    }
}

/// Wraps a closure as a named scope.
pub fn from_fn<F>(name: impl Into<String>, f: F) -> Arc<dyn Scope>
where
    F: Fn(DataFrame) -> Result<DataFrame> + Send + Sync + 'static,
{
    Arc::new(FnScope {
        name: name.into(),
        f,
    })
}

/// Applies `scopes` to `df` in order.
pub fn apply_all(df: DataFrame, scopes: &[Arc<dyn Scope>]) -> Result<DataFrame> {
    scopes.iter().try_fold(df, |df, scope| scope.apply(df))
}
