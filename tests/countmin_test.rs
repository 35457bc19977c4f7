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

use std::collections::HashMap;

use googletest::assert_that;
use googletest::prelude::contains_substring;
use googletest::prelude::ge;
use streamsketch::countmin::CountMinSketch;

/// Zipf-like stream: key `i` occurs `400 / (i + 1)` times.
fn skewed_stream() -> Vec<(String, u64)> {
    (0..400u64)
        .map(|i| (format!("item-{i}"), 400 / (i + 1)))
        .collect()
}

#[test]
fn test_never_underestimates() {
    let mut sketch = CountMinSketch::new(64, 3).unwrap();
    let mut truth: HashMap<String, u64> = HashMap::new();

    for _ in 0..3 {
        for (key, count) in skewed_stream() {
            for _ in 0..count {
                sketch.update(&key);
            }
            *truth.entry(key.clone()).or_insert(0) += count;

            // checked after every key, not only at the end
            assert_that!(sketch.estimate(&key), ge(truth[&key]));
        }
    }

    for (key, count) in &truth {
        assert_that!(sketch.estimate(key), ge(*count));
        assert!(sketch.upper_bound(key) >= sketch.estimate(key));
    }
}

#[test]
fn test_wider_tables_overcount_less() {
    let total_error = |width: usize| {
        let mut sketch = CountMinSketch::new(width, 4).unwrap();
        let stream = skewed_stream();
        for (key, count) in &stream {
            sketch.update_with_weight(key, *count);
        }
        stream
            .iter()
            .map(|(key, count)| sketch.estimate(key) - count)
            .sum::<u64>()
    };

    let narrow = total_error(16);
    let wide = total_error(4096);
    assert!(wide < narrow, "wide {wide}, narrow {narrow}");
}

#[test]
fn test_total_weight_and_bounds() {
    let mut sketch = CountMinSketch::new(272, 5).unwrap();
    for (key, count) in skewed_stream() {
        sketch.update_with_weight(&key, count);
    }

    let total: u64 = skewed_stream().iter().map(|(_, count)| count).sum();
    assert_eq!(sketch.total_weight(), total);
    assert!(sketch.relative_error() < 0.01);
    assert!(sketch.confidence() > 0.99);
}

#[test]
fn test_deterministic_replay() {
    let build = || {
        let mut sketch = CountMinSketch::new(100, 4).unwrap();
        for (key, count) in skewed_stream() {
            sketch.update_with_weight(&key, count);
        }
        sketch
    };
    assert_eq!(build(), build());
}

#[test]
fn test_invalid_dimensions() {
    let err = CountMinSketch::new(0, 5).unwrap_err();
    assert_that!(err.message(), contains_substring("width"));
    let err = CountMinSketch::new(5, 0).unwrap_err();
    assert_that!(err.message(), contains_substring("depth"));
}
