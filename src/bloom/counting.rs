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

use std::hash::Hash;

use tracing::debug;

use crate::error::Error;
use crate::hash::HashFamily;

/// Widest counter supported, in bits.
pub const MAX_COUNTER_BITS: u32 = 32;

/// Saturating counter arithmetic for a fixed bit width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CounterWidth {
    bits: u32,
    max: u32,
}

impl CounterWidth {
    fn new(bits: u32) -> Self {
        let max = ((1u64 << bits) - 1) as u32;
        CounterWidth { bits, max }
    }

    /// Returns the incremented value, clamped to `max`.
    fn increment(self, value: u32) -> u32 {
        if value >= self.max {
            self.max
        } else {
            value + 1
        }
    }

    /// Returns the decremented value, floored at 0.
    fn decrement(self, value: u32) -> u32 {
        value.saturating_sub(1)
    }
}

/// A Bloom filter over saturating counters, supporting removal.
///
/// Each of the `m` slots is a counter `capacity` bits wide. Inserting increments the `k`
/// counters an item maps to, removing decrements them. Counters never exceed
/// `2^capacity - 1` and never go below zero; both limits are silent.
///
/// Counters are shared between keys. Removing a key that was never inserted (or removing
/// a key more times than it was inserted) takes counts away from whichever keys share
/// those slots and can make them read as absent.
///
/// # Examples
///
/// ```
/// use streamsketch::bloom::CountingBloomFilter;
///
/// let mut filter = CountingBloomFilter::new(3, 1024, 4).unwrap();
/// filter.insert("hello");
/// filter.insert("world");
/// assert!(filter.contains("hello"));
///
/// filter.remove("hello");
/// assert!(filter.contains("world"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountingBloomFilter {
    hashes: HashFamily,
    width: CounterWidth,
    counters: Vec<u32>,
    /// Set once any increment was clamped
    saturated: bool,
}

impl CountingBloomFilter {
    /// Creates a filter of `num_counters` counters, each `capacity` bits wide, probed by
    /// `num_hashes` functions.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if
    /// any parameter is zero, `num_hashes` is too large, or `capacity` exceeds
    /// [`MAX_COUNTER_BITS`].
    pub fn new(num_hashes: usize, num_counters: usize, capacity: u32) -> Result<Self, Error> {
        if num_counters == 0 {
            return Err(Error::config_invalid(
                "num_counters",
                num_counters,
                "must be greater than 0",
            ));
        }
        if capacity == 0 || capacity > MAX_COUNTER_BITS {
            return Err(Error::config_invalid(
                "capacity",
                capacity,
                "must be between 1 and 32 bits",
            ));
        }
        let hashes = HashFamily::new(num_hashes)?;

        debug!(num_hashes, num_counters, capacity, "created counting bloom filter");
        Ok(CountingBloomFilter {
            hashes,
            width: CounterWidth::new(capacity),
            counters: vec![0; num_counters],
            saturated: false,
        })
    }

    /// Inserts an item, incrementing each of its counters up to the ceiling.
    pub fn insert<T: Hash + ?Sized>(&mut self, item: &T) {
        let width = self.width;
        for index in self.hashes.indices(item, self.counters.len()) {
            let counter = &mut self.counters[index];
            if *counter == width.max {
                self.saturated = true;
            }
            *counter = width.increment(*counter);
        }
    }

    /// Tests whether an item is possibly in the set: all of its counters are non-zero.
    pub fn contains<T: Hash + ?Sized>(&self, item: &T) -> bool {
        self.hashes
            .indices(item, self.counters.len())
            .all(|index| self.counters[index] > 0)
    }

    /// Removes an item, decrementing each of its counters down to zero.
    ///
    /// Removing an item that is not present is not an error.
    pub fn remove<T: Hash + ?Sized>(&mut self, item: &T) {
        let width = self.width;
        for index in self.hashes.indices(item, self.counters.len()) {
            let counter = &mut self.counters[index];
            *counter = width.decrement(*counter);
        }
    }

    /// Sum of all counters divided by the number of hash functions.
    ///
    /// Without saturation or removal this equals the number of insertions.
    pub fn average_usage(&self) -> f64 {
        let total: u64 = self.counters.iter().map(|&c| u64::from(c)).sum();
        total as f64 / self.hashes.num_functions() as f64
    }

    /// Read-only view of the counter array.
    pub fn counters(&self) -> &[u32] {
        &self.counters
    }

    /// Number of counters currently above zero.
    pub fn count_nonzero(&self) -> usize {
        self.counters.iter().filter(|&&c| c > 0).count()
    }

    /// Returns whether any increment was clamped at the counter ceiling.
    ///
    /// Once set the flag stays set, even if later removals bring counters back down:
    /// a saturated counter no longer knows its true count.
    pub fn has_saturated(&self) -> bool {
        self.saturated
    }

    /// Largest value a counter can hold, `2^capacity - 1`.
    pub fn max_counter_value(&self) -> u32 {
        self.width.max
    }

    /// Counter width in bits.
    pub fn capacity(&self) -> u32 {
        self.width.bits
    }

    /// Returns the number of counters.
    pub fn num_counters(&self) -> usize {
        self.counters.len()
    }

    /// Returns the number of hash functions used.
    pub fn num_hashes(&self) -> usize {
        self.hashes.num_functions()
    }

    /// Returns whether every counter is zero.
    pub fn is_empty(&self) -> bool {
        self.counters.iter().all(|&c| c == 0)
    }
}
