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

use super::MAX_PRECISION;
use super::MIN_PRECISION;
use super::estimator;
use crate::error::Error;
use crate::hash::DEFAULT_SEED;
use crate::hash::HASH_BITS;
use crate::hash::hash_item;

/// HyperLogLog cardinality estimator over `2^precision` registers.
///
/// Memory is one byte per register regardless of how many items are seen. The expected
/// relative error is about `1.04 / sqrt(2^precision)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperLogLog {
    precision: u8,
    registers: Vec<u8>,
}

impl HyperLogLog {
    /// Creates an empty sketch with `2^precision` registers.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if
    /// `precision` is outside `1..=16`.
    pub fn new(precision: u8) -> Result<Self, Error> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
            return Err(Error::config_invalid(
                "precision",
                precision,
                "must be between 1 and 16",
            ));
        }

        let num_buckets = 1usize << precision;
        debug!(precision, num_buckets, "created hyperloglog");
        Ok(HyperLogLog {
            precision,
            registers: vec![0; num_buckets],
        })
    }

    /// Observes an item.
    ///
    /// The low `precision` bits of the hash pick a register; the register keeps the
    /// largest rank (position of the lowest set bit of the remaining bits, from 1)
    /// observed for it.
    pub fn update<T: Hash + ?Sized>(&mut self, item: &T) {
        let hash = hash_item(item, DEFAULT_SEED);
        let bucket = (hash & self.bucket_mask()) as usize;
        let rank = rank(hash >> self.precision, HASH_BITS - u32::from(self.precision));

        let register = &mut self.registers[bucket];
        if rank > *register {
            *register = rank;
        }
    }

    /// Returns the estimated number of distinct items observed.
    ///
    /// # Examples
    ///
    /// ```
    /// use streamsketch::hll::HyperLogLog;
    ///
    /// let mut hll = HyperLogLog::new(12).unwrap();
    /// assert_eq!(hll.estimate(), 0);
    ///
    /// for i in 0..10_000 {
    ///     hll.update(&i);
    /// }
    /// let estimate = hll.estimate() as f64;
    /// assert!((estimate - 10_000.0).abs() / 10_000.0 < 0.1);
    /// ```
    pub fn estimate(&self) -> u64 {
        let estimate = estimator::estimate(&self.registers);
        if estimate.is_finite() && estimate > 0.0 {
            estimate as u64
        } else {
            0
        }
    }

    /// Merges another sketch into this one by taking the register-wise maximum.
    ///
    /// The result is the sketch that would have seen both streams.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Incompatible`](crate::error::ErrorKind::Incompatible) if the
    /// precisions differ.
    pub fn merge(&mut self, other: &HyperLogLog) -> Result<(), Error> {
        if self.precision != other.precision {
            return Err(Error::incompatible("HyperLogLog sketches")
                .with_context("precision", self.precision)
                .with_context("other_precision", other.precision));
        }
        for (register, &other_register) in self.registers.iter_mut().zip(&other.registers) {
            *register = (*register).max(other_register);
        }
        Ok(())
    }

    /// Returns the precision `p`.
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Returns the number of registers, `2^p`.
    pub fn num_buckets(&self) -> usize {
        self.registers.len()
    }

    /// Read-only view of the registers.
    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    /// Returns whether no item has been observed.
    pub fn is_empty(&self) -> bool {
        self.registers.iter().all(|&r| r == 0)
    }

    /// Expected relative standard error, `1.04 / sqrt(m)`.
    pub fn relative_error(&self) -> f64 {
        1.04 / (self.registers.len() as f64).sqrt()
    }

    fn bucket_mask(&self) -> u32 {
        (1u32 << self.precision) - 1
    }
}

/// Position of the lowest set bit of `residual`, counted from 1.
///
/// `width` is how many meaningful bits `residual` holds; an all-zero residual ranks
/// `width + 1`.
fn rank(residual: u32, width: u32) -> u8 {
    if residual == 0 {
        (width + 1) as u8
    } else {
        (residual.trailing_zeros() + 1) as u8
    }
}
