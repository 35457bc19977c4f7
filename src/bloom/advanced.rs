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
use crate::hash::HashFamily;

const MIN_SUGGESTED_BITS: usize = 64;

/// A Bloom filter probing `k` independently seeded hash functions.
///
/// An item is reported present only when all `k` of its bits are set, which bounds the
/// false positive rate to roughly `(1 - e^(-kn/m))^k` after `n` insertions. That rate
/// is minimised near `k = (m/n)·ln 2`; past that point more hashes make it worse. The
/// caller picks `k` and `m`; [`suggest_num_bits`](Self::suggest_num_bits) and
/// [`suggest_num_hashes`](Self::suggest_num_hashes) only help choose them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvancedBloomFilter {
    hashes: HashFamily,
    bits: BitArray,
}

impl AdvancedBloomFilter {
    /// Creates an empty filter with `num_hashes` functions over `num_bits` bits.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if
    /// either parameter is zero, or `num_hashes` exceeds
    /// [`MAX_HASH_FUNCTIONS`](crate::hash::MAX_HASH_FUNCTIONS).
    ///
    /// # Examples
    ///
    /// ```
    /// use streamsketch::bloom::AdvancedBloomFilter;
    ///
    /// let mut filter = AdvancedBloomFilter::new(3, 4096).unwrap();
    /// filter.insert("apple");
    /// assert!(filter.contains("apple"));
    /// ```
    pub fn new(num_hashes: usize, num_bits: usize) -> Result<Self, Error> {
        if num_bits == 0 {
            return Err(Error::config_invalid(
                "num_bits",
                num_bits,
                "must be greater than 0",
            ));
        }
        let hashes = HashFamily::new(num_hashes)?;

        debug!(num_hashes, num_bits, "created k-probe bloom filter");
        Ok(AdvancedBloomFilter {
            hashes,
            bits: BitArray::new(num_bits),
        })
    }

    /// An empty filter with the same size and hash functions.
    pub(crate) fn empty_like(&self) -> Self {
        AdvancedBloomFilter {
            hashes: self.hashes.clone(),
            bits: BitArray::new(self.bits.len()),
        }
    }

    /// Inserts an item, setting one bit per hash function.
    pub fn insert<T: Hash + ?Sized>(&mut self, item: &T) {
        let num_bits = self.bits.len();
        for bit_index in self.hashes.indices(item, num_bits) {
            self.bits.set(bit_index);
        }
    }

    /// Tests whether an item is possibly in the set.
    ///
    /// `false` means the item was definitely never inserted.
    pub fn contains<T: Hash + ?Sized>(&self, item: &T) -> bool {
        self.hashes
            .indices(item, self.bits.len())
            .all(|bit_index| self.bits.get(bit_index))
    }

    /// Tests and inserts an item in a single operation.
    ///
    /// Returns whether the item was possibly already in the set before insertion.
    pub fn contains_and_insert<T: Hash + ?Sized>(&mut self, item: &T) -> bool {
        let num_bits = self.bits.len();
        let mut was_present = true;
        for bit_index in self.hashes.indices(item, num_bits) {
            was_present &= self.bits.set(bit_index);
        }
        was_present
    }

    /// Merges another filter into this one via bitwise OR.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Incompatible`](crate::error::ErrorKind::Incompatible) if the
    /// filters differ in size or number of hashes.
    pub fn union(&mut self, other: &AdvancedBloomFilter) -> Result<(), Error> {
        if !self.is_compatible(other) {
            return Err(Error::incompatible("Bloom filters")
                .with_context("num_bits", self.capacity())
                .with_context("num_hashes", self.num_hashes())
                .with_context("other_num_bits", other.capacity())
                .with_context("other_num_hashes", other.num_hashes()));
        }
        self.bits.union(&other.bits);
        Ok(())
    }

    /// Average number of set bits per hash function.
    pub fn average_ones_per_k(&self) -> f64 {
        self.bits.count_ones() as f64 / self.hashes.num_functions() as f64
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

    /// Returns the number of hash functions used.
    pub fn num_hashes(&self) -> usize {
        self.hashes.num_functions()
    }

    /// Returns the fraction of bits set.
    pub fn load_factor(&self) -> f64 {
        self.bits.count_ones() as f64 / self.bits.len() as f64
    }

    /// Estimates the current false positive probability from the observed load.
    ///
    /// An absent item is a false positive when all `k` of its probes land on set bits:
    /// `load^k`.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powi(self.num_hashes() as i32)
    }

    /// Checks if two filters can be merged.
    pub fn is_compatible(&self, other: &AdvancedBloomFilter) -> bool {
        self.bits.len() == other.bits.len() && self.hashes == other.hashes
    }

    /// Suggests a bit count for `max_items` insertions at target false positive rate
    /// `fpp`.
    ///
    /// Formula: `m = -n * ln(p) / (ln(2)^2)`, rounded up to a multiple of 64.
    ///
    /// # Examples
    ///
    /// ```
    /// use streamsketch::bloom::AdvancedBloomFilter;
    ///
    /// let bits = AdvancedBloomFilter::suggest_num_bits(1000, 0.01);
    /// assert!(bits > 9000 && bits < 10000); // ~9585 bits
    /// ```
    pub fn suggest_num_bits(max_items: u64, fpp: f64) -> usize {
        let n = max_items.max(1) as f64;
        let p = fpp.clamp(f64::MIN_POSITIVE, 1.0);
        let ln2_squared = std::f64::consts::LN_2 * std::f64::consts::LN_2;

        let bits = (-n * p.ln() / ln2_squared).ceil() as usize;
        bits.div_ceil(64).saturating_mul(64).max(MIN_SUGGESTED_BITS)
    }

    /// Suggests the number of hash functions minimising false positives for
    /// `max_items` insertions into `num_bits` bits.
    ///
    /// Formula: `k = (m/n) * ln(2)`
    ///
    /// # Examples
    ///
    /// ```
    /// use streamsketch::bloom::AdvancedBloomFilter;
    ///
    /// assert_eq!(AdvancedBloomFilter::suggest_num_hashes(1000, 10000), 7);
    /// ```
    pub fn suggest_num_hashes(max_items: u64, num_bits: usize) -> usize {
        let m = num_bits as f64;
        let n = max_items.max(1) as f64;

        let k = (m / n * std::f64::consts::LN_2).round() as usize;
        k.clamp(1, crate::hash::MAX_HASH_FUNCTIONS)
    }
}
