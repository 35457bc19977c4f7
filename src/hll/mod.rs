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

//! HyperLogLog sketch for cardinality estimation.
//!
//! A [`HyperLogLog`] keeps `2^p` small registers. Each item is hashed once; the low `p`
//! bits of the hash select a register, and the register remembers the longest run of
//! trailing zero bits (plus one) seen among the remaining bits. The harmonic mean of
//! the registers gives the distinct count, corrected by linear counting when the sketch
//! is sparse and for hash saturation when it is very full.
//!
//! # Usage
//!
//! ```rust
//! use streamsketch::hll::HyperLogLog;
//!
//! let mut hll = HyperLogLog::new(14).unwrap();
//! for word in ["a", "b", "c", "a", "b"] {
//!     hll.update(word);
//! }
//! assert_eq!(hll.estimate(), 3);
//! ```

mod estimator;
mod sketch;

pub use self::sketch::HyperLogLog;

/// Smallest supported precision.
pub const MIN_PRECISION: u8 = 1;

/// Largest supported precision; leaves 16 bits of a 32-bit hash for ranks.
pub const MAX_PRECISION: u8 = 16;
