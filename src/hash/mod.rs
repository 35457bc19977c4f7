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

//! Seeded hash family shared by every structure in the crate.
//!
//! All hashing goes through 32-bit MurmurHash3 (x86_32). A key is hashed over the byte
//! stream its [`Hash`] implementation feeds to the hasher, so the same logical key must
//! always be presented with the same type. Seeds `0..k` act as `k` independent hash
//! functions.
//!
//! ```rust
//! use streamsketch::hash::HashFamily;
//!
//! let family = HashFamily::new(3).unwrap();
//! let slots: Vec<usize> = family.indices("apple", 64).collect();
//! assert_eq!(slots.len(), 3);
//! assert!(slots.iter().all(|&slot| slot < 64));
//! ```

use std::hash::Hash;

use crate::error::Error;

mod murmurhash;

pub use self::murmurhash::hash_bytes;
pub use self::murmurhash::hash_item;

/// Width in bits of every hash value produced by this module.
pub const HASH_BITS: u32 = 32;

/// Seed used by single-hash structures.
pub const DEFAULT_SEED: u32 = 0;

/// Upper bound on the number of functions a family may hold.
pub const MAX_HASH_FUNCTIONS: usize = 256;

/// A family of `k` seeded hash functions.
///
/// Function `i` is MurmurHash3 with seed `seeds[i]`. The seed array is computed once at
/// construction; the family itself carries no other state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashFamily {
    seeds: Box<[u32]>,
}

impl HashFamily {
    /// Creates a family of `num_functions` functions seeded `0..num_functions`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if
    /// `num_functions` is zero or exceeds [`MAX_HASH_FUNCTIONS`].
    pub fn new(num_functions: usize) -> Result<Self, Error> {
        if num_functions == 0 {
            return Err(Error::config_invalid(
                "num_hashes",
                num_functions,
                "must be at least 1",
            ));
        }
        if num_functions > MAX_HASH_FUNCTIONS {
            return Err(Error::config_invalid(
                "num_hashes",
                num_functions,
                "must not exceed 256",
            ));
        }

        let seeds = (0..num_functions as u32).collect();
        Ok(HashFamily { seeds })
    }

    /// Returns the number of functions in the family.
    pub fn num_functions(&self) -> usize {
        self.seeds.len()
    }

    /// Returns the seed of every function, in order.
    pub fn seeds(&self) -> &[u32] {
        &self.seeds
    }

    /// Hashes `item` with function `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.num_functions()`.
    pub fn hash<T: Hash + ?Sized>(&self, item: &T, i: usize) -> u32 {
        hash_item(item, self.seeds[i])
    }

    /// Maps `item` into `0..modulus` with function `i`.
    pub fn index<T: Hash + ?Sized>(&self, item: &T, i: usize, modulus: usize) -> usize {
        self.hash(item, i) as usize % modulus
    }

    /// Yields the bucket `item` maps to under every function of the family.
    pub fn indices<T: Hash + ?Sized>(
        &self,
        item: &T,
        modulus: usize,
    ) -> impl Iterator<Item = usize> {
        self.seeds
            .iter()
            .map(move |&seed| hash_item(item, seed) as usize % modulus)
    }
}
