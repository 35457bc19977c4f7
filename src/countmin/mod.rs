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

//! Count-Min sketch implementation for frequency estimation.
//!
//! The Count-Min sketch provides approximate frequency counts for streaming data. Its
//! error is one-sided: an estimate is never below the true count, and the overcount
//! shrinks as the table gets wider and deeper.
//!
//! # Usage
//!
//! ```rust
//! use streamsketch::countmin::CountMinSketch;
//!
//! let mut sketch = CountMinSketch::new(256, 5).unwrap();
//!
//! sketch.update("apple");
//! sketch.update_with_weight("banana", 3);
//!
//! let banana = sketch.estimate("banana");
//! assert!(banana >= 3);
//!
//! let upper = sketch.upper_bound("banana");
//! assert!(upper >= banana);
//! ```
//!
//! # Configuration Helpers
//!
//! ```rust
//! use streamsketch::countmin::CountMinSketch;
//!
//! let width = CountMinSketch::suggest_width(0.01);
//! let depth = CountMinSketch::suggest_depth(0.99);
//!
//! let _sketch = CountMinSketch::new(width, depth).unwrap();
//! ```

mod sketch;
pub use self::sketch::CountMinSketch;
