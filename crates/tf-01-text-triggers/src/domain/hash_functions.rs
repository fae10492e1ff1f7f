//! Hash functions for the trigger bloom filters
//!
//! Uses MurmurHash3 (x64, 128-bit) with two seeds and derives the k probe
//! positions by double hashing, so one pair of hashes serves every probe.

use std::io::Cursor;

/// Hash an element with MurmurHash3 using a seed
///
/// The lower 64 bits of the 128-bit digest are returned.
pub fn murmur_hash(element: &[u8], seed: u32) -> u64 {
    let mut cursor = Cursor::new(element);

    // Reading from an in-memory cursor cannot fail
    let hash = murmur3::murmur3_x64_128(&mut cursor, seed).unwrap_or(0);
    hash as u64
}

/// Lazily computed probe positions for one element
///
/// Double hashing: h(i) = h1 + i * h2 (mod m). Produced on demand so
/// membership tests can stop at the first unset bit without allocating.
#[derive(Clone, Debug)]
pub struct HashPositions {
    h1: u64,
    h2: u64,
    i: u64,
    k: u64,
    m: u64,
}

impl Iterator for HashPositions {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.i >= self.k {
            return None;
        }
        let hash = self.h1.wrapping_add(self.i.wrapping_mul(self.h2));
        self.i += 1;
        Some((hash % self.m) as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.k - self.i) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for HashPositions {}

/// Compute the k probe positions for an element in a filter of m bits
pub fn hash_positions(element: &[u8], k: usize, m: usize) -> HashPositions {
    HashPositions {
        h1: murmur_hash(element, 0),
        h2: murmur_hash(element, 1),
        i: 0,
        k: k as u64,
        m: m.max(1) as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_murmur3_hash_deterministic() {
        let element = b"kill the president";

        let hash1 = murmur_hash(element, 42);
        let hash2 = murmur_hash(element, 42);

        assert_eq!(hash1, hash2, "Same input with same seed must produce same output");
    }

    #[test]
    fn test_murmur3_different_seed_different_output() {
        let element = b"badword";

        assert_ne!(
            murmur_hash(element, 0),
            murmur_hash(element, 1),
            "Different seeds must produce different outputs"
        );
    }

    #[test]
    fn test_positions_within_bounds_and_varied() {
        let k = 7;
        let m = 10000;

        let positions: Vec<usize> = hash_positions(b"phrase", k, m).collect();

        assert_eq!(positions.len(), k, "Should produce k positions");
        for pos in &positions {
            assert!(*pos < m, "Position {} should be < m={}", pos, m);
        }

        let unique: std::collections::HashSet<_> = positions.iter().collect();
        assert!(unique.len() >= 3, "Hash functions should produce varied positions");
    }

    #[test]
    fn test_positions_are_repeatable() {
        let a: Vec<usize> = hash_positions(b"first", 5, 997).collect();
        let b: Vec<usize> = hash_positions(b"first", 5, 997).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_width_filter_does_not_divide_by_zero() {
        let positions: Vec<usize> = hash_positions(b"x", 3, 0).collect();
        assert!(positions.iter().all(|p| *p == 0));
    }

    #[test]
    fn test_hash_uniformity() {
        let m = 1000;
        let k = 7;
        let mut counts = vec![0usize; 10];

        for i in 0..1000 {
            let element = format!("word_{}", i);
            for pos in hash_positions(element.as_bytes(), k, m) {
                counts[pos / 100] += 1;
            }
        }

        // Each bucket should hold roughly 1000*7/10 = 700 probes
        let expected = 700;
        for (i, count) in counts.iter().enumerate() {
            assert!(
                *count >= expected / 2 && *count <= expected * 3 / 2,
                "Bucket {} has {} entries, expected ~{}",
                i,
                count,
                expected
            );
        }
    }
}
