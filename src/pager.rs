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

//! OFFSET/LIMIT paging as a scope, plus a page collector that counts totals.

use arrow::record_batch::RecordBatch;
use datafusion::dataframe::DataFrame;
use datafusion_common::Result;
use serde::{Deserialize, Serialize};

use crate::scope::Scope;

pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Uniform paging parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParam {
    /// 1-based page number; values below 1 mean the first page.
    #[serde(default)]
    pub curr_page: i64,
    /// Rows per page; values below 1 mean [`DEFAULT_PAGE_SIZE`].
    #[serde(default)]
    pub page_size: i64,
    /// Non-zero disables paging and the total count.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub ignore_page: i64,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

impl PageParam {
    pub fn new(curr_page: i64, page_size: i64) -> Self {
        Self {
            curr_page,
            page_size,
            ignore_page: 0,
        }
    }

    /// A parameter that returns every row and skips counting.
    pub fn unpaged() -> Self {
        Self {
            ignore_page: 1,
            ..Default::default()
        }
    }

    pub fn is_ignored(&self) -> bool {
        self.ignore_page != 0
    }

    /// Replaces out-of-range values with defaults.
    pub fn init(&mut self) {
        if self.curr_page <= 0 {
            self.curr_page = 1;
        }
        if self.page_size <= 0 {
            self.page_size = DEFAULT_PAGE_SIZE;
        }
    }

    /// `(offset, limit)` of the page after normalisation.
    pub fn offset_limit(&self) -> (usize, usize) {
        let mut param = self.clone();
        param.init();
        let offset = (param.curr_page - 1).saturating_mul(param.page_size);
        (offset as usize, param.page_size as usize)
    }
}

impl Scope for PageParam {
    fn apply(&self, df: DataFrame) -> Result<DataFrame> {
        if self.is_ignored() {
            return Ok(df);
        }
        let (offset, limit) = self.offset_limit();
        df.limit(offset, Some(limit))
    }
}

/// One page of rows together with the unpaged total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    #[serde(flatten)]
    pub param: PageParam,
    pub total_count: usize,
    pub curr_count: usize,
}

impl PageResult {
    pub fn new(param: PageParam) -> Self {
        Self {
            param,
            ..Default::default()
        }
    }

    /// Collects the requested page of `df` and records the counts.
    ///
    /// `df` must not be paged yet; the total is counted over it as given.
    /// An empty page is not an error.
    pub async fn scan(&mut self, df: DataFrame) -> Result<Vec<RecordBatch>> {
        if !self.param.is_ignored() {
            self.param.init();
        }
        let rows = self.param.apply(df.clone())?.collect().await?;
        self.curr_count = rows.iter().map(|b| b.num_rows()).sum();
        self.total_count = if self.param.is_ignored() {
            self.curr_count
        } else {
            df.count().await?
        };
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_defaults() {
        let mut param = PageParam::new(0, -5);
        param.init();
        assert_eq!(param, PageParam::new(1, DEFAULT_PAGE_SIZE));

        let mut param = PageParam::new(3, 25);
        param.init();
        assert_eq!(param, PageParam::new(3, 25));
    }

    #[test]
    fn test_offset_limit() {
        assert_eq!(PageParam::new(1, 10).offset_limit(), (0, 10));
        assert_eq!(PageParam::new(3, 20).offset_limit(), (40, 20));
        assert_eq!(PageParam::default().offset_limit(), (0, 10));
    }

    #[test]
    fn test_page_result_json_shape() {
        let result = PageResult {
            param: PageParam::new(2, 5),
            total_count: 11,
            curr_count: 5,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "curr_page": 2,
                "page_size": 5,
                "total_count": 11,
                "curr_count": 5,
            })
        );
    }
}
