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

//! Probabilistic data structures for membership, cardinality and frequency queries
//! over large key streams, and a streaming estimator for the intersection size of two
//! streams built from them.
//!
//! - [`bloom`]: single-probe, k-probe and counting Bloom filters.
//! - [`hll`]: HyperLogLog distinct counting.
//! - [`countmin`]: Count-Min frequency sketch.
//! - [`join`]: join-size estimation over two streams.
//!
//! Every structure is sized once at construction and never resized. Keys are any
//! `T: Hash`, hashed with 32-bit MurmurHash3 through [`hash::HashFamily`]; identical
//! parameters and key sequences always produce identical state.
//!
//! The crate logs through [`tracing`] and never installs a subscriber.

pub mod bloom;
pub mod countmin;
pub mod error;
pub mod hash;
pub mod hll;
pub mod join;
