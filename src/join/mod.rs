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

//! Streaming join-size estimation.
//!
//! [`StreamingJoinEstimator`] estimates how many keys two large streams share. Each
//! side is summarised by a [`StreamSide`]: a k-probe Bloom filter, a Count-Min sketch
//! and, while the number of distinct keys stays within a cap, the exact key set.
//! Exceeding the cap switches that side from [`JoinMode::Exact`] to
//! [`JoinMode::Approximate`] permanently.
//!
//! [`count_occurrences`] and [`skewed_keys`] find the heavy keys of a pair of streams,
//! which are the ones that make a join expensive.

mod estimator;
mod side;
mod skew;

pub use self::estimator::JoinEstimate;
pub use self::estimator::StreamingJoinEstimator;
pub use self::side::JoinMode;
pub use self::side::StreamSide;
pub use self::skew::count_occurrences;
pub use self::skew::skewed_keys;

use crate::error::Error;
use crate::hash::MAX_HASH_FUNCTIONS;

/// Parameters of a [`StreamingJoinEstimator`].
///
/// The same filter and sketch dimensions are used for both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinEstimatorConfig {
    /// Number of bits in each side's Bloom filter.
    pub bloom_filter_capacity: usize,
    /// Number of hash functions each Bloom filter probes.
    pub hash_functions_count: usize,
    /// Columns in each Count-Min sketch.
    pub sketch_table_width: usize,
    /// Rows in each Count-Min sketch.
    pub sketch_table_depth: usize,
    /// Largest number of distinct keys a side keeps exactly.
    pub max_unique_key_limit: usize,
}

impl Default for JoinEstimatorConfig {
    fn default() -> Self {
        JoinEstimatorConfig {
            bloom_filter_capacity: 10_000_000,
            hash_functions_count: 7,
            sketch_table_width: 100_000,
            sketch_table_depth: 5,
            max_unique_key_limit: 1_000_000,
        }
    }
}

impl JoinEstimatorConfig {
    /// Checks every dimension, naming the offending field on failure.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if a
    /// filter or sketch dimension is zero or the hash count is out of range.
    pub fn validate(&self) -> Result<(), Error> {
        if self.bloom_filter_capacity == 0 {
            return Err(Error::config_invalid(
                "bloom_filter_capacity",
                self.bloom_filter_capacity,
                "must be greater than 0",
            ));
        }
        if self.hash_functions_count == 0 || self.hash_functions_count > MAX_HASH_FUNCTIONS {
            return Err(Error::config_invalid(
                "hash_functions_count",
                self.hash_functions_count,
                "must be between 1 and 256",
            ));
        }
        if self.sketch_table_width == 0 {
            return Err(Error::config_invalid(
                "sketch_table_width",
                self.sketch_table_width,
                "must be greater than 0",
            ));
        }
        if self.sketch_table_depth == 0 || self.sketch_table_depth > MAX_HASH_FUNCTIONS {
            return Err(Error::config_invalid(
                "sketch_table_depth",
                self.sketch_table_depth,
                "must be between 1 and 256",
            ));
        }
        Ok(())
    }
}
