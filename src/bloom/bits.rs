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

/// Fixed-size bit vector packed into `u64` words.
///
/// Bits are only ever set, so the running count of ones is kept exactly without
/// rescanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BitArray {
    /// Total number of addressable bits (m)
    num_bits: usize,
    /// Count of bits set to 1
    num_bits_set: u64,
    /// Length = ceil(num_bits / 64)
    words: Vec<u64>,
}

impl BitArray {
    pub(crate) fn new(num_bits: usize) -> Self {
        BitArray {
            num_bits,
            num_bits_set: 0,
            words: vec![0u64; num_bits.div_ceil(64)],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.num_bits
    }

    pub(crate) fn count_ones(&self) -> u64 {
        self.num_bits_set
    }

    /// Gets the value of a single bit.
    pub(crate) fn get(&self, bit_index: usize) -> bool {
        let mask = 1u64 << (bit_index % 64);
        (self.words[bit_index / 64] & mask) != 0
    }

    /// Sets a single bit, returning whether it was already set.
    pub(crate) fn set(&mut self, bit_index: usize) -> bool {
        let word = &mut self.words[bit_index / 64];
        let mask = 1u64 << (bit_index % 64);

        let was_set = (*word & mask) != 0;
        if !was_set {
            *word |= mask;
            self.num_bits_set += 1;
        }
        was_set
    }

    /// Bitwise OR with another array of the same length.
    pub(crate) fn union(&mut self, other: &BitArray) {
        debug_assert_eq!(self.num_bits, other.num_bits);
        for (word, other_word) in self.words.iter_mut().zip(&other.words) {
            *word |= *other_word;
        }
        self.num_bits_set = self.words.iter().map(|w| w.count_ones() as u64).sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut bits = BitArray::new(130);
        assert_eq!(bits.len(), 130);
        assert!(!bits.get(129));

        assert!(!bits.set(129));
        assert!(bits.set(129));
        assert!(bits.get(129));
        assert!(!bits.get(128));
        assert_eq!(bits.count_ones(), 1);
    }

    #[test]
    fn test_union_recounts() {
        let mut a = BitArray::new(100);
        let mut b = BitArray::new(100);
        a.set(1);
        a.set(70);
        b.set(70);
        b.set(99);

        a.union(&b);
        assert_eq!(a.count_ones(), 3);
        assert!(a.get(1) && a.get(70) && a.get(99));
    }
}
