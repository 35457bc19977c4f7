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
use std::collections::HashSet;
use std::hash::Hash;

/// Counts how often each key occurs in a stream.
pub fn count_occurrences<K, I>(keys: I) -> HashMap<K, u64>
where
    K: Hash + Eq,
    I: IntoIterator<Item = K>,
{
    let mut counts = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Keys occurring more than `threshold` times in either stream.
///
/// Such keys dominate the size of a join between the two streams and are usually worth
/// handling separately before estimating it.
///
/// # Examples
///
/// ```
/// use streamsketch::join::count_occurrences;
/// use streamsketch::join::skewed_keys;
///
/// let left = count_occurrences(["a", "a", "a", "b"]);
/// let right = count_occurrences(["b", "c", "c", "c"]);
///
/// let mut skewed: Vec<_> = skewed_keys(&left, &right, 2).into_iter().collect();
/// skewed.sort();
/// assert_eq!(skewed, vec!["a", "c"]);
/// ```
pub fn skewed_keys<K>(
    left: &HashMap<K, u64>,
    right: &HashMap<K, u64>,
    threshold: u64,
) -> HashSet<K>
where
    K: Hash + Eq + Clone,
{
    left.iter()
        .chain(right.iter())
        .filter(|&(_, &count)| count > threshold)
        .map(|(key, _)| key.clone())
        .collect()
}
