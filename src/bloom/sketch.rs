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

use super::bits::BitArray;
use crate::error::Error;
use crate::hash::DEFAULT_SEED;
use crate::hash::hash_item;

/// A single-probe Bloom filter.
///
/// Each item sets exactly one bit, `hash(item, 0) mod m`. Queries never return a false
/// negative; the false positive rate equals the fraction of bits set and grows without
/// bound as the filter fills. Use [`AdvancedBloomFilter`](super::AdvancedBloomFilter)
/// for a tunable rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomFilter {
    bits: BitArray,
}

impl BloomFilter {
    /// Creates an empty filter of `num_bits` bits.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if
    /// `num_bits` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use streamsketch::bloom::BloomFilter;
    ///
    /// let filter = BloomFilter::new(1024).unwrap();
    /// assert!(filter.is_empty());
    /// assert!(BloomFilter::new(0).is_err());
    /// ```
    pub fn new(num_bits: usize) -> Result<Self, Error> {
        if num_bits == 0 {
            return Err(Error::config_invalid(
                "num_bits",
                num_bits,
                "must be greater than 0",
            ));
        }

        debug!(num_bits, "created single-probe bloom filter");
        Ok(BloomFilter {
            bits: BitArray::new(num_bits),
        })
    }

    /// Inserts an item into the filter.
    ///
    /// After insertion, `contains(item)` will always return `true`.
    pub fn insert<T: Hash + ?Sized>(&mut self, item: &T) {
        let bit_index = self.bit_index(item);
        self.bits.set(bit_index);
    }

    /// Tests whether an item is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Item was **possibly** inserted (or false positive)
    /// - `false`: Item was **definitely not** inserted
    ///
    /// # Examples
    ///
    /// ```
    /// use streamsketch::bloom::BloomFilter;
    ///
    /// let mut filter = BloomFilter::new(64 * 1024).unwrap();
    /// filter.insert("apple");
    /// assert!(filter.contains("apple"));
    /// ```
    pub fn contains<T: Hash + ?Sized>(&self, item: &T) -> bool {
        self.bits.get(self.bit_index(item))
    }

    /// Tests and inserts an item in a single operation.
    ///
    /// Returns whether the item was possibly already in the set before insertion.
    pub fn contains_and_insert<T: Hash + ?Sized>(&mut self, item: &T) -> bool {
        let bit_index = self.bit_index(item);
        self.bits.set(bit_index)
    }

    /// Merges another filter into this one via bitwise OR.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Incompatible`](crate::error::ErrorKind::Incompatible) if the
    /// filters differ in size.
    pub fn union(&mut self, other: &BloomFilter) -> Result<(), Error> {
        if !self.is_compatible(other) {
            return Err(Error::incompatible("Bloom filters")
                .with_context("num_bits", self.capacity())
                .with_context("other_num_bits", other.capacity()));
        }
        self.bits.union(&other.bits);
        Ok(())
    }

    /// Returns the number of bits set to 1.
    pub fn count_ones(&self) -> u64 {
        self.bits.count_ones()
    }

    /// Returns whether no item has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.bits.count_ones() == 0
    }

    /// Returns the total number of bits in the filter.
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Returns the fraction of bits set.
    pub fn load_factor(&self) -> f64 {
        self.bits.count_ones() as f64 / self.bits.len() as f64
    }

    /// Probability that an item never inserted is reported as present.
    ///
    /// With a single probe this is exactly the load factor.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor()
    }

    /// Checks if two filters can be merged.
    pub fn is_compatible(&self, other: &BloomFilter) -> bool {
        self.bits.len() == other.bits.len()
    }

    fn bit_index<T: Hash + ?Sized>(&self, item: &T) -> usize {
        hash_item(item, DEFAULT_SEED) as usize % self.bits.len()
    }
}
