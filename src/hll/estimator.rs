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

//! Cardinality estimate from a register array.
//!
//! The raw HyperLogLog estimate is corrected at both ends of its range:
//!
//! - small range: while the raw estimate is at most `2.5·m` and some registers are still
//!   zero, linear counting over the empty registers is used instead;
//! - large range: once the raw estimate exceeds `2^HASH_BITS / 30`, hash collisions in
//!   the `2^HASH_BITS` space are compensated for.

use crate::hash::HASH_BITS;

/// Size of the hash space, `2^HASH_BITS`.
const HASH_SPACE: f64 = (1u64 << HASH_BITS) as f64;

/// Raw estimates above this are corrected for hash saturation.
const LARGE_RANGE_THRESHOLD: f64 = HASH_SPACE / 30.0;

/// Bias correction constant for `m` registers.
pub(super) fn alpha(num_buckets: usize) -> f64 {
    0.7213 / (1.0 + 1.079 / num_buckets as f64)
}

/// `alpha(m)·m² / Σ 2^(-register[i])`
pub(super) fn raw_estimate(registers: &[u8]) -> f64 {
    let m = registers.len() as f64;
    let harmonic_sum: f64 = registers.iter().map(|&r| inv_pow2(r)).sum();
    alpha(registers.len()) * m * m / harmonic_sum
}

/// `m·ln(m / zeros)`
pub(super) fn linear_counting(num_buckets: usize, num_zeros: usize) -> f64 {
    let m = num_buckets as f64;
    m * (m / num_zeros as f64).ln()
}

/// `-2^32·ln(1 - E/2^32)`
///
/// The ratio is kept strictly below one so the result stays finite when the raw
/// estimate reaches the size of the hash space.
pub(super) fn large_range_correction(raw: f64) -> f64 {
    let ratio = (raw / HASH_SPACE).min(1.0 - f64::EPSILON);
    -HASH_SPACE * (1.0 - ratio).ln()
}

/// Full estimate with both range corrections applied.
pub(super) fn estimate(registers: &[u8]) -> f64 {
    let num_buckets = registers.len();
    let raw = raw_estimate(registers);

    if raw <= 2.5 * num_buckets as f64 {
        let num_zeros = registers.iter().filter(|&&r| r == 0).count();
        if num_zeros > 0 {
            return linear_counting(num_buckets, num_zeros);
        }
        raw
    } else if raw > LARGE_RANGE_THRESHOLD {
        large_range_correction(raw)
    } else {
        raw
    }
}

#[inline]
fn inv_pow2(value: u8) -> f64 {
    // 2^(-value), exact for every register value that fits in u8
    f64::from_bits((1023u64 - u64::from(value)) << 52)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inv_pow2() {
        assert_eq!(inv_pow2(0), 1.0);
        assert_eq!(inv_pow2(1), 0.5);
        assert_eq!(inv_pow2(10), 1.0 / 1024.0);
        assert_eq!(inv_pow2(33), 2f64.powi(-33));
    }

    #[test]
    fn test_alpha() {
        assert!((alpha(16) - 0.6757).abs() < 1e-3);
        assert!((alpha(1 << 16) - 0.7213).abs() < 1e-4);
    }

    #[test]
    fn test_empty_registers_estimate_zero() {
        assert_eq!(estimate(&[0u8; 64]), 0.0);
    }

    #[test]
    fn test_linear_counting_branch() {
        let mut registers = [0u8; 64];
        registers[0] = 1;
        registers[1] = 3;
        let expected = 64.0 * (64.0f64 / 62.0).ln();
        assert!((estimate(&registers) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_mid_range_uses_raw() {
        let registers = [12u8; 256];
        let raw = raw_estimate(&registers);
        assert!(raw > 2.5 * 256.0 && raw < LARGE_RANGE_THRESHOLD);
        assert_eq!(estimate(&registers), raw);
    }

    #[test]
    fn test_large_range_correction() {
        // every register at the largest rank a 32-bit hash allows with p = 4
        let registers = [29u8; 16];
        let raw = raw_estimate(&registers);
        assert!(raw > LARGE_RANGE_THRESHOLD);

        let corrected = estimate(&registers);
        assert!(corrected.is_finite());
        assert!(corrected > raw);
    }
}
