//! Optimal Bloom filter parameter calculation
//!
//! Formulas:
//! - FPR = (1 - e^(-kn/m))^k
//! - m = -n*ln(fpr) / (ln(2)^2)  -- optimal bits
//! - k = (m/n) * ln(2)           -- optimal hash functions

use std::f64::consts::LN_2;

/// Capacity used when a filter is built over an empty table.
pub const DEFAULT_FILTER_CAPACITY: usize = 100;

/// Bloom filter parameters
#[derive(Clone, Debug, PartialEq)]
pub struct BloomFilterParams {
    /// Number of bits in the filter
    pub size_bits: usize,
    /// Number of hash functions
    pub hash_count: usize,
    /// Expected false positive rate with these parameters
    pub expected_fpr: f64,
}

/// Calculate optimal Bloom filter parameters for given constraints
///
/// # Arguments
/// * `num_elements` - Expected number of elements to insert (n)
/// * `target_fpr` - Target false positive rate
pub fn calculate_optimal_parameters(num_elements: usize, target_fpr: f64) -> BloomFilterParams {
    let n = num_elements.max(1) as f64;
    let ln2_squared = LN_2 * LN_2;

    let m = ((-n * target_fpr.ln() / ln2_squared).ceil() as usize).max(8);

    let k = ((m as f64 / n) * LN_2).round() as usize;
    let k = k.clamp(1, 16);

    let expected_fpr = calculate_fpr(m, num_elements, k);

    BloomFilterParams {
        size_bits: m,
        hash_count: k,
        expected_fpr,
    }
}

/// Calculate the false positive rate for given parameters
///
/// Formula: FPR = (1 - e^(-kn/m))^k
pub fn calculate_fpr(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}
