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
use std::fmt;
use std::hash::Hash;

use tracing::debug;

use super::JoinEstimatorConfig;
use crate::bloom::AdvancedBloomFilter;
use crate::countmin::CountMinSketch;
use crate::error::Error;

/// How a stream side tracks its distinct keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinMode {
    /// Every distinct key is held; intersections are exact.
    Exact,
    /// The distinct-key cap was exceeded; only the filter and sketch remain.
    Approximate,
}

impl fmt::Display for JoinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinMode::Exact => write!(f, "exact"),
            JoinMode::Approximate => write!(f, "approximate"),
        }
    }
}

#[derive(Debug, Clone)]
enum KeyTracking<K> {
    Exact(HashSet<K>),
    Approximate,
}

/// Everything retained about one input stream.
///
/// Every key goes into a k-probe Bloom filter and a Count-Min sketch. Distinct keys are
/// additionally kept in a set until there would be more than `max_unique_key_limit` of
/// them; at that point the set is dropped and the side switches to
/// [`JoinMode::Approximate`] for good.
#[derive(Debug, Clone)]
pub struct StreamSide<K> {
    filter: AdvancedBloomFilter,
    sketch: CountMinSketch,
    tracking: KeyTracking<K>,
    max_unique_keys: usize,
    num_keys: u64,
}

impl<K: Hash + Eq> StreamSide<K> {
    pub(super) fn new(config: &JoinEstimatorConfig) -> Result<Self, Error> {
        let filter = AdvancedBloomFilter::new(
            config.hash_functions_count,
            config.bloom_filter_capacity,
        )?;
        let sketch = CountMinSketch::new(config.sketch_table_width, config.sketch_table_depth)?;

        Ok(StreamSide {
            filter,
            sketch,
            tracking: KeyTracking::Exact(HashSet::new()),
            max_unique_keys: config.max_unique_key_limit,
            num_keys: 0,
        })
    }

    /// A fresh side with the same shape and cap.
    pub(super) fn empty_like(&self) -> Self {
        StreamSide {
            filter: self.filter.empty_like(),
            sketch: self.sketch.empty_like(),
            tracking: KeyTracking::Exact(HashSet::new()),
            max_unique_keys: self.max_unique_keys,
            num_keys: 0,
        }
    }

    /// Records one key from the stream.
    pub(super) fn observe(&mut self, key: K) {
        self.filter.insert(&key);
        self.sketch.update(&key);
        self.num_keys += 1;
        self.track(key);
    }

    /// Adds `key` to the exact set, switching to approximate mode if the set is full.
    fn track(&mut self, key: K) {
        let KeyTracking::Exact(keys) = &mut self.tracking else {
            return;
        };
        if keys.contains(&key) {
            return;
        }
        if keys.len() < self.max_unique_keys {
            keys.insert(key);
            return;
        }

        let distinct = keys.len();
        self.tracking = KeyTracking::Approximate;
        debug!(
            distinct,
            limit = self.max_unique_keys,
            keys_seen = self.num_keys,
            "distinct-key cap exceeded, switching to approximate mode"
        );
    }

    pub(super) fn exact_keys(&self) -> Option<&HashSet<K>> {
        match &self.tracking {
            KeyTracking::Exact(keys) => Some(keys),
            KeyTracking::Approximate => None,
        }
    }

    /// Current tracking mode.
    pub fn mode(&self) -> JoinMode {
        match self.tracking {
            KeyTracking::Exact(_) => JoinMode::Exact,
            KeyTracking::Approximate => JoinMode::Approximate,
        }
    }

    /// Number of distinct keys held, while still in exact mode.
    pub fn num_distinct_keys(&self) -> Option<usize> {
        self.exact_keys().map(HashSet::len)
    }

    /// Number of keys observed, duplicates included.
    pub fn num_keys(&self) -> u64 {
        self.num_keys
    }

    /// Membership filter over every observed key.
    pub fn filter(&self) -> &AdvancedBloomFilter {
        &self.filter
    }

    /// Frequency sketch over every observed key.
    pub fn sketch(&self) -> &CountMinSketch {
        &self.sketch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(limit: usize) -> JoinEstimatorConfig {
        JoinEstimatorConfig {
            bloom_filter_capacity: 1 << 12,
            hash_functions_count: 3,
            sketch_table_width: 256,
            sketch_table_depth: 3,
            max_unique_key_limit: limit,
        }
    }

    #[test]
    fn test_cap_is_inclusive() {
        let mut side = StreamSide::new(&config(3)).unwrap();
        for key in ["a", "b", "c", "a", "c"] {
            side.observe(key);
        }
        assert_eq!(side.mode(), JoinMode::Exact);
        assert_eq!(side.num_distinct_keys(), Some(3));
        assert_eq!(side.num_keys(), 5);
    }

    #[test]
    fn test_switch_is_final() {
        let mut side = StreamSide::new(&config(2)).unwrap();
        side.observe("a");
        side.observe("b");
        side.observe("c");
        assert_eq!(side.mode(), JoinMode::Approximate);
        assert!(side.exact_keys().is_none());

        // repeating already-seen keys does not bring the exact set back
        side.observe("a");
        assert_eq!(side.mode(), JoinMode::Approximate);
        assert!(side.filter().contains("c"));
        assert_eq!(side.sketch().estimate("a"), 2);
    }

    #[test]
    fn test_zero_limit_starts_approximate_on_first_key() {
        let mut side = StreamSide::new(&config(0)).unwrap();
        assert_eq!(side.mode(), JoinMode::Exact);
        side.observe("a");
        assert_eq!(side.mode(), JoinMode::Approximate);
    }

    #[test]
    fn test_empty_like_keeps_shape() {
        let mut side = StreamSide::new(&config(5)).unwrap();
        side.observe("a");
        let fresh = side.empty_like();
        assert_eq!(fresh.num_keys(), 0);
        assert!(fresh.filter().is_empty());
        assert!(fresh.sketch().is_empty());
        assert!(fresh.filter().is_compatible(side.filter()));
        assert_eq!(fresh.sketch().width(), side.sketch().width());
    }
}
