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

use crate::error::Error;
use crate::hash::HashFamily;

/// Count-Min sketch: a `depth × width` matrix of counters.
///
/// Row `i` hashes an item with seed `i` into one of `width` columns. Updates increment
/// one cell per row; a point query returns the smallest of the item's cells. Collisions
/// only add to a cell, so the estimate never falls below the true count, and it is
/// exact whenever one of the rows has no collision for the item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMinSketch {
    width: usize,
    hashes: HashFamily,
    /// Row-major, `depth * width` cells
    table: Vec<u64>,
    total_weight: u64,
}

impl CountMinSketch {
    /// Creates an empty sketch with `width` columns and `depth` rows.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if
    /// either dimension is zero, if `width * depth` cells cannot be allocated, or if
    /// `depth` exceeds [`MAX_HASH_FUNCTIONS`](crate::hash::MAX_HASH_FUNCTIONS).
    ///
    /// Each row needs its own seed from a [`HashFamily`], so depth shares the family's
    /// limit of 256 functions. A depth of 256 already gives a confidence of
    /// `1 - e^-256`, so deeper sketches are rejected rather than supported.
    pub fn new(width: usize, depth: usize) -> Result<Self, Error> {
        if width == 0 {
            return Err(Error::config_invalid("width", width, "must be greater than 0"));
        }
        if depth == 0 {
            return Err(Error::config_invalid("depth", depth, "must be greater than 0"));
        }
        let cells = width
            .checked_mul(depth)
            .filter(|&cells| cells <= isize::MAX as usize / size_of::<u64>())
            .ok_or_else(|| {
                Error::config_invalid("width", width, "* depth overflows the counter table")
                    .with_context("depth", depth)
            })?;
        let hashes = HashFamily::new(depth)?;

        debug!(width, depth, "created count-min sketch");
        Ok(CountMinSketch {
            width,
            hashes,
            table: vec![0; cells],
            total_weight: 0,
        })
    }

    /// An empty sketch with the same dimensions.
    pub(crate) fn empty_like(&self) -> Self {
        CountMinSketch {
            width: self.width,
            hashes: self.hashes.clone(),
            table: vec![0; self.table.len()],
            total_weight: 0,
        }
    }

    /// Records one occurrence of `item`.
    pub fn update<T: Hash + ?Sized>(&mut self, item: &T) {
        self.update_with_weight(item, 1);
    }

    /// Records `weight` occurrences of `item`.
    ///
    /// Counters saturate at `u64::MAX`.
    pub fn update_with_weight<T: Hash + ?Sized>(&mut self, item: &T, weight: u64) {
        let width = self.width;
        for (row, column) in self.hashes.indices(item, width).enumerate() {
            let cell = &mut self.table[row * width + column];
            *cell = cell.saturating_add(weight);
        }
        self.total_weight = self.total_weight.saturating_add(weight);
    }

    /// Returns the estimated number of occurrences of `item`.
    ///
    /// Never less than the true count.
    pub fn estimate<T: Hash + ?Sized>(&self, item: &T) -> u64 {
        self.hashes
            .indices(item, self.width)
            .enumerate()
            .map(|(row, column)| self.table[row * self.width + column])
            .min()
            .unwrap_or(0)
    }

    /// Upper bound on the true count that holds with probability [`confidence`].
    ///
    /// `estimate + relative_error * total_weight`
    ///
    /// [`confidence`]: Self::confidence
    pub fn upper_bound<T: Hash + ?Sized>(&self, item: &T) -> u64 {
        let slack = (self.relative_error() * self.total_weight as f64).ceil() as u64;
        self.estimate(item).saturating_add(slack)
    }

    /// Adds the counters of another sketch into this one.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Incompatible`](crate::error::ErrorKind::Incompatible) if the
    /// dimensions differ.
    pub fn merge(&mut self, other: &CountMinSketch) -> Result<(), Error> {
        if self.width != other.width || self.hashes != other.hashes {
            return Err(Error::incompatible("Count-Min sketches")
                .with_context("width", self.width)
                .with_context("depth", self.depth())
                .with_context("other_width", other.width)
                .with_context("other_depth", other.depth()));
        }
        for (cell, &other_cell) in self.table.iter_mut().zip(&other.table) {
            *cell = cell.saturating_add(other_cell);
        }
        self.total_weight = self.total_weight.saturating_add(other.total_weight);
        Ok(())
    }

    /// Returns the number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    pub fn depth(&self) -> usize {
        self.hashes.num_functions()
    }

    /// Sum of all weights recorded.
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Returns whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.total_weight == 0
    }

    /// Overestimate per unit of total weight, `e / width`.
    pub fn relative_error(&self) -> f64 {
        std::f64::consts::E / self.width as f64
    }

    /// Probability that [`upper_bound`](Self::upper_bound) holds, `1 - e^(-depth)`.
    pub fn confidence(&self) -> f64 {
        1.0 - (-(self.depth() as f64)).exp()
    }

    /// Suggests a width for relative error `epsilon`: `ceil(e / epsilon)`.
    pub fn suggest_width(epsilon: f64) -> usize {
        assert!(
            epsilon > 0.0 && epsilon < 1.0,
            "epsilon must be between 0.0 and 1.0 (exclusive)"
        );
        (std::f64::consts::E / epsilon).ceil() as usize
    }

    /// Suggests a depth for the given confidence: `ceil(ln(1 / (1 - confidence)))`.
    pub fn suggest_depth(confidence: f64) -> usize {
        assert!(
            confidence > 0.0 && confidence < 1.0,
            "confidence must be between 0.0 and 1.0 (exclusive)"
        );
        ((1.0 / (1.0 - confidence)).ln().ceil() as usize).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_single_item_exact() {
        let mut sketch = CountMinSketch::new(64, 4).unwrap();
        for _ in 0..7 {
            sketch.update("apple");
        }
        assert_eq!(sketch.estimate("apple"), 7);
        assert_eq!(sketch.total_weight(), 7);
        assert_eq!(sketch.estimate("pear"), 0);
    }

    #[test]
    fn test_one_cell_per_row() {
        let mut sketch = CountMinSketch::new(32, 5).unwrap();
        sketch.update("x");
        for row in sketch.table.chunks(32) {
            assert_eq!(row.iter().sum::<u64>(), 1);
        }
    }

    #[test]
    fn test_saturating_weight() {
        let mut sketch = CountMinSketch::new(8, 2).unwrap();
        sketch.update_with_weight("big", u64::MAX);
        sketch.update("big");
        assert_eq!(sketch.estimate("big"), u64::MAX);
    }

    #[test]
    fn test_merge() {
        let mut a = CountMinSketch::new(128, 3).unwrap();
        let mut b = CountMinSketch::new(128, 3).unwrap();
        a.update_with_weight("k", 3);
        b.update_with_weight("k", 4);
        a.merge(&b).unwrap();
        assert_eq!(a.estimate("k"), 7);
        assert_eq!(a.total_weight(), 7);

        let c = CountMinSketch::new(64, 3).unwrap();
        assert_eq!(a.merge(&c).unwrap_err().kind(), ErrorKind::Incompatible);
    }

    #[test]
    fn test_invalid_dimensions() {
        let err = CountMinSketch::new(0, 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(err.context("width"), Some("0"));

        let err = CountMinSketch::new(10, 0).unwrap_err();
        assert_eq!(err.context("depth"), Some("0"));
    }

    #[test]
    fn test_table_size_overflow() {
        let width = usize::MAX / 2 + 1;
        let err = CountMinSketch::new(width, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(err.context("width"), Some(width.to_string().as_str()));
        assert_eq!(err.context("depth"), Some("2"));

        // fits in usize, but not as a byte count
        let err = CountMinSketch::new(usize::MAX / 4, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_depth_limited_by_hash_family() {
        assert!(CountMinSketch::new(16, crate::hash::MAX_HASH_FUNCTIONS).is_ok());
        let err = CountMinSketch::new(16, 300).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(err.context("num_hashes"), Some("300"));
    }

    #[test]
    fn test_suggestions() {
        assert_eq!(CountMinSketch::suggest_width(0.01), 272);
        assert_eq!(CountMinSketch::suggest_depth(0.99), 5);
    }

    #[test]
    #[should_panic(expected = "epsilon must be between")]
    fn test_invalid_epsilon() {
        CountMinSketch::suggest_width(1.5);
    }
}
