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

//! Bloom filters for approximate set membership.
//!
//! Three variants share the same guarantee (an inserted item is always reported
//! present) and differ in what they spend per item:
//!
//! - [`BloomFilter`]: one bit per item, one hash.
//! - [`AdvancedBloomFilter`]: `k` bits per item from `k` seeded hashes.
//! - [`CountingBloomFilter`]: `k` saturating counters per item, allowing removal.
//!
//! # Usage
//!
//! ```rust
//! use streamsketch::bloom::AdvancedBloomFilter;
//!
//! let num_bits = AdvancedBloomFilter::suggest_num_bits(10_000, 0.01);
//! let num_hashes = AdvancedBloomFilter::suggest_num_hashes(10_000, num_bits);
//! let mut filter = AdvancedBloomFilter::new(num_hashes, num_bits).unwrap();
//!
//! filter.insert("apple");
//! assert!(filter.contains("apple"));
//! ```
//!
//! Sizes are fixed at construction. Overfilling a filter raises its false positive
//! rate; it never fails.

mod advanced;
mod bits;
mod counting;
mod sketch;

pub use self::advanced::AdvancedBloomFilter;
pub use self::counting::CountingBloomFilter;
pub use self::counting::MAX_COUNTER_BITS;
pub use self::sketch::BloomFilter;
