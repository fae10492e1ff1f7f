//! Core Bloom Filter implementation
//!
//! INVARIANTS:
//! - FPR = (1 - e^(-kn/m))^k <= target_fpr at the expected element count
//! - No false negatives: if inserted, contains() MUST return true

use bitvec::prelude::*;

use super::hash_functions::hash_positions;
use super::parameters::{calculate_fpr, calculate_optimal_parameters};

/// Bloom filter for probabilistic membership testing
///
/// Append-only while a generation is being built, read-only afterwards.
/// False positives are possible, false negatives are not.
#[derive(Clone, Debug)]
pub struct BloomFilter {
    /// Bit array storing the filter state
    bits: BitVec<u64, Lsb0>,
    /// Number of hash functions (k)
    k: usize,
    /// Size in bits (m)
    m: usize,
    /// Number of elements inserted (n)
    n: usize,
}

impl BloomFilter {
    /// Create a new Bloom filter with specified parameters
    ///
    /// # Arguments
    /// * `m` - Size in bits
    /// * `k` - Number of hash functions
    pub fn new(m: usize, k: usize) -> Self {
        let m = m.max(1);
        Self {
            bits: bitvec![u64, Lsb0; 0; m],
            k: k.max(1),
            m,
            n: 0,
        }
    }

    /// Create a new Bloom filter with optimal parameters for target FPR
    ///
    /// # Arguments
    /// * `expected_elements` - Expected number of elements (n)
    /// * `target_fpr` - Target false positive rate
    pub fn new_with_fpr(expected_elements: usize, target_fpr: f64) -> Self {
        let params = calculate_optimal_parameters(expected_elements, target_fpr);
        Self::new(params.size_bits, params.hash_count)
    }

    /// Insert an element into the filter
    ///
    /// After insertion, `contains(element)` is guaranteed to return true.
    pub fn insert(&mut self, element: &[u8]) {
        for pos in hash_positions(element, self.k, self.m) {
            self.bits.set(pos, true);
        }
        self.n += 1;
    }

    /// Test if an element might be in the filter
    ///
    /// Returns:
    /// - `true` if the element might be in the set (could be false positive)
    /// - `false` if the element is definitely NOT in the set
    pub fn contains(&self, element: &[u8]) -> bool {
        hash_positions(element, self.k, self.m).all(|pos| self.bits[pos])
    }

    /// Calculate the current false positive rate
    pub fn false_positive_rate(&self) -> f64 {
        calculate_fpr(self.m, self.n, self.k)
    }

    /// Get the number of bits set in the filter
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Get the filter size in bits
    pub fn size_bits(&self) -> usize {
        self.m
    }

    /// Get the number of hash functions
    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// Get the number of elements inserted
    pub fn elements_inserted(&self) -> usize {
        self.n
    }
}
