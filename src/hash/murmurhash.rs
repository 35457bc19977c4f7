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

/// Hashes any `T: Hash` with 32-bit MurmurHash3 and the given seed.
///
/// The input is the byte stream `item.hash()` writes, so a `&str` and a `String`
/// holding the same text hash identically, while a `&[u8]` of the same bytes does not
/// (slices prefix their length).
///
/// That byte stream is an implementation detail of the standard library and may change
/// between Rust releases, so hashes are reproducible within one toolchain only. Use
/// [`hash_bytes`] over an explicit encoding of the key when hashed state must match
/// across builds or other MurmurHash3 implementations.
///
/// # Examples
///
/// ```
/// use streamsketch::hash::hash_item;
///
/// assert_eq!(hash_item("apple", 7), hash_item(&String::from("apple"), 7));
/// assert_ne!(hash_item("apple", 0), hash_item("apple", 1));
/// ```
pub fn hash_item<T: Hash + ?Sized>(item: &T, seed: u32) -> u32 {
    let mut hasher = mur3::Hasher32::with_seed(seed);
    item.hash(&mut hasher);
    hasher.finish32()
}

/// Hashes raw bytes with 32-bit MurmurHash3 and the given seed.
///
/// Output is identical to the reference `MurmurHash3_x86_32`.
///
/// # Examples
///
/// ```
/// use streamsketch::hash::hash_bytes;
///
/// assert_eq!(hash_bytes(b"hello", 0), 0x248b_fa47);
/// ```
pub fn hash_bytes(bytes: &[u8], seed: u32) -> u32 {
    mur3::murmurhash3_x86_32(bytes, seed)
}
