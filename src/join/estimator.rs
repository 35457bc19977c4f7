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

use std::collections::HashSet;
use std::convert::Infallible;
use std::hash::Hash;

use tracing::debug;

use super::JoinEstimatorConfig;
use super::JoinMode;
use super::StreamSide;
use crate::error::Error;

/// Result of a join-size estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinEstimate {
    /// Mode the left side was in when the right side was streamed.
    pub mode: JoinMode,
    /// Estimated intersection size.
    pub size: u64,
}

impl JoinEstimate {
    /// Returns whether `size` is exact.
    pub fn is_exact(&self) -> bool {
        self.mode == JoinMode::Exact
    }
}

/// Estimates how many keys two streams have in common without holding either in full.
///
/// The left stream is fed first with [`feed_left`](Self::feed_left). While it has at most
/// `max_unique_key_limit` distinct keys they are all kept, and
/// [`estimate`](Self::estimate) returns the exact number of distinct keys the right
/// stream shares with it. Once the left stream exceeds the limit only its Bloom filter
/// and Count-Min sketch remain; the estimate is then the sum, over every right key the
/// filter reports present, of the sketch's count for that key. Filter false positives
/// and sketch overcounts both push that sum up, never down.
///
/// # Examples
///
/// ```
/// use streamsketch::join::JoinEstimatorConfig;
/// use streamsketch::join::JoinMode;
/// use streamsketch::join::StreamingJoinEstimator;
///
/// let config = JoinEstimatorConfig {
///     bloom_filter_capacity: 1 << 16,
///     hash_functions_count: 4,
///     sketch_table_width: 1024,
///     sketch_table_depth: 4,
///     max_unique_key_limit: 10,
/// };
/// let mut estimator = StreamingJoinEstimator::new(config).unwrap();
/// estimator.feed_left(["a", "b", "c"]);
///
/// let estimate = estimator.estimate(["b", "c", "d"]);
/// assert_eq!(estimate.mode, JoinMode::Exact);
/// assert_eq!(estimate.size, 2);
/// ```
#[derive(Debug, Clone)]
pub struct StreamingJoinEstimator<K> {
    config: JoinEstimatorConfig,
    left: StreamSide<K>,
    right: StreamSide<K>,
}

impl<K: Hash + Eq> StreamingJoinEstimator<K> {
    /// Creates an estimator with empty left and right sides.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if
    /// the filter or sketch dimensions in `config` are invalid.
    pub fn new(config: JoinEstimatorConfig) -> Result<Self, Error> {
        config.validate()?;
        let left = StreamSide::new(&config)?;
        let right = left.empty_like();

        debug!(?config, "created streaming join estimator");
        Ok(StreamingJoinEstimator {
            config,
            left,
            right,
        })
    }

    /// Streams keys into the left side.
    pub fn feed_left<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
    {
        let result = self.try_feed_left(keys.into_iter().map(Ok::<K, Infallible>));
        match result {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    /// Streams keys into the left side from a fallible source.
    ///
    /// Stops at the first error and returns it unchanged; keys read before the error
    /// stay recorded.
    pub fn try_feed_left<I, E>(&mut self, keys: I) -> Result<(), E>
    where
        I: IntoIterator<Item = Result<K, E>>,
    {
        for key in keys {
            self.left.observe(key?);
        }
        Ok(())
    }

    /// Streams the right side and estimates its intersection with the left side.
    pub fn estimate<I>(&mut self, keys: I) -> JoinEstimate
    where
        I: IntoIterator<Item = K>,
    {
        match self.try_estimate(keys.into_iter().map(Ok::<K, Infallible>)) {
            Ok(estimate) => estimate,
            Err(never) => match never {},
        }
    }

    /// Streams the right side from a fallible source and estimates its intersection
    /// with the left side.
    ///
    /// The left side is only read. The right side is rebuilt from scratch on every call
    /// and replaces [`right`](Self::right) only when the whole source was read; a source
    /// error is returned unchanged.
    pub fn try_estimate<I, E>(&mut self, keys: I) -> Result<JoinEstimate, E>
    where
        I: IntoIterator<Item = Result<K, E>>,
    {
        let left = &self.left;
        let mut right = left.empty_like();

        let estimate = match left.exact_keys() {
            Some(left_keys) => {
                let mut shared: HashSet<&K> = HashSet::new();
                for key in keys {
                    let key = key?;
                    if let Some(left_key) = left_keys.get(&key) {
                        shared.insert(left_key);
                    }
                    right.observe(key);
                }
                JoinEstimate {
                    mode: JoinMode::Exact,
                    size: shared.len() as u64,
                }
            }
            None => {
                let mut size = 0u64;
                for key in keys {
                    let key = key?;
                    if left.filter().contains(&key) {
                        size = size.saturating_add(left.sketch().estimate(&key));
                    }
                    right.observe(key);
                }
                JoinEstimate {
                    mode: JoinMode::Approximate,
                    size,
                }
            }
        };

        debug!(
            mode = %estimate.mode,
            size = estimate.size,
            left_keys = self.left.num_keys(),
            right_keys = right.num_keys(),
            "estimated join size"
        );
        self.right = right;
        Ok(estimate)
    }

    /// Current mode of the left side.
    pub fn mode(&self) -> JoinMode {
        self.left.mode()
    }

    /// State accumulated from the left stream.
    pub fn left(&self) -> &StreamSide<K> {
        &self.left
    }

    /// State accumulated from the right stream by the last completed estimate.
    pub fn right(&self) -> &StreamSide<K> {
        &self.right
    }

    /// Returns the configuration the estimator was built with.
    pub fn config(&self) -> &JoinEstimatorConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(limit: usize) -> JoinEstimatorConfig {
        JoinEstimatorConfig {
            bloom_filter_capacity: 1 << 14,
            hash_functions_count: 4,
            sketch_table_width: 1 << 10,
            sketch_table_depth: 4,
            max_unique_key_limit: limit,
        }
    }

    #[test]
    fn test_exact_counts_distinct_shared_keys() {
        let mut estimator = StreamingJoinEstimator::new(small_config(10)).unwrap();
        estimator.feed_left(["a", "b", "b", "c"]);

        let estimate = estimator.estimate(["b", "b", "c", "d", "c"]);
        assert!(estimate.is_exact());
        assert_eq!(estimate.size, 2);
        assert_eq!(estimator.right().num_keys(), 5);
        assert_eq!(estimator.right().sketch().estimate("b"), 2);
    }

    #[test]
    fn test_left_is_unchanged_by_estimate() {
        let mut estimator = StreamingJoinEstimator::new(small_config(2)).unwrap();
        estimator.feed_left(["a", "b", "c"]);
        let before = estimator.left().sketch().clone();

        estimator.estimate(["a", "x", "y"]);
        assert_eq!(estimator.left().sketch(), &before);
        assert_eq!(estimator.left().num_keys(), 3);
    }

    #[test]
    fn test_source_error_is_propagated() {
        let mut estimator = StreamingJoinEstimator::new(small_config(10)).unwrap();
        let keys = vec![Ok("a"), Err("broken read"), Ok("b")];
        assert_eq!(estimator.try_feed_left(keys), Err("broken read"));
        assert_eq!(estimator.left().num_keys(), 1);

        let keys = vec![Ok("a"), Err("broken read")];
        assert_eq!(estimator.try_estimate(keys), Err("broken read"));
        assert_eq!(estimator.right().num_keys(), 0);
    }

    #[test]
    fn test_invalid_config() {
        let mut config = small_config(10);
        config.sketch_table_depth = 0;
        assert!(StreamingJoinEstimator::<&str>::new(config).is_err());
    }
}
