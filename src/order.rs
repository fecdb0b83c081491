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

//! ORDER BY as a scope.

use datafusion::dataframe::DataFrame;
use datafusion::logical_expr::SortExpr;
use datafusion::prelude::col;
use datafusion_common::Result;
use serde::{Deserialize, Serialize};

use crate::scope::Scope;

/// Ordering requested by a caller, usually decoded from a request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderParam {
    /// Comma-separated `column [ASC|DESC]` list. Empty means unordered.
    #[serde(default)]
    pub order_by: String,
    /// `ASC` or `DESC`; only honoured for a single column without its own
    /// direction.
    #[serde(default)]
    pub order_type: String,
}

impl OrderParam {
    pub fn new(order_by: impl Into<String>, order_type: impl Into<String>) -> Self {
        Self {
            order_by: order_by.into(),
            order_type: order_type.into(),
        }
    }

    /// Translates the parameter into DataFusion sort expressions.
    pub fn sort_exprs(&self) -> Vec<SortExpr> {
        let order_by = self.order_by.trim();
        if order_by.is_empty() {
            return vec![];
        }
        let single = !order_by.contains(',');
        let desc_default = single && self.order_type.trim().eq_ignore_ascii_case("desc");

        order_by
            .split(',')
            .filter_map(|part| {
                let mut tokens = part.split_whitespace();
                let name = tokens.next()?;
                let asc = match tokens.next() {
                    Some(dir) => !dir.eq_ignore_ascii_case("desc"),
                    None => !desc_default,
                };
                // nulls last for ASC, first for DESC
                Some(col(name).sort(asc, !asc))
            })
            .collect()
    }
}

impl Scope for OrderParam {
    fn apply(&self, df: DataFrame) -> Result<DataFrame> {
        let exprs = self.sort_exprs();
        if exprs.is_empty() {
            return Ok(df);
        }
        df.sort(exprs)
    }
}
