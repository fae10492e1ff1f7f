//! Category enablement bitmap
//!
//! Fixed capacity, sized once at construction. Reads and writes are
//! lock-free; a single writer and any number of readers may race, and the
//! last write wins.

use std::sync::atomic::{AtomicU64, Ordering};

use shared_types::{CategoryId, MAX_CATEGORIES};

use crate::error::FilterError;

const WORD_BITS: usize = 64;

/// Which categories currently participate in blocking decisions.
#[derive(Debug)]
pub struct CategoryGate {
    words: Box<[AtomicU64]>,
    capacity: usize,
}

impl CategoryGate {
    /// A gate for ids `[0, capacity)`, all disabled.
    pub fn new(capacity: u16) -> Self {
        let capacity = capacity as usize;
        let words = (0..capacity.div_ceil(WORD_BITS))
            .map(|_| AtomicU64::new(0))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { words, capacity }
    }

    /// Number of addressable categories.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Enable or disable one category.
    pub fn set_enabled(&self, id: CategoryId, enabled: bool) -> Result<(), FilterError> {
        let idx = id as usize;
        if idx >= self.capacity {
            return Err(FilterError::CategoryOutOfRange {
                id,
                capacity: self.capacity,
            });
        }

        let mask = 1u64 << (idx % WORD_BITS);
        let word = &self.words[idx / WORD_BITS];
        if enabled {
            word.fetch_or(mask, Ordering::Release);
        } else {
            word.fetch_and(!mask, Ordering::Release);
        }
        Ok(())
    }

    /// Whether `id` is enabled. Out-of-range ids are never enabled.
    pub fn is_enabled(&self, id: CategoryId) -> bool {
        let idx = id as usize;
        if idx >= self.capacity {
            return false;
        }
        let mask = 1u64 << (idx % WORD_BITS);
        self.words[idx / WORD_BITS].load(Ordering::Acquire) & mask != 0
    }

    /// Enable or disable every category.
    pub fn set_all(&self, enabled: bool) {
        let full_words = self.capacity / WORD_BITS;
        let tail_bits = self.capacity % WORD_BITS;

        for (i, word) in self.words.iter().enumerate() {
            let value = if !enabled {
                0
            } else if i < full_words {
                u64::MAX
            } else {
                (1u64 << tail_bits) - 1
            };
            word.store(value, Ordering::Release);
        }
    }

    /// Number of enabled categories.
    pub fn enabled_count(&self) -> usize {
        self.words
            .iter()
            .map(|w| w.load(Ordering::Acquire).count_ones() as usize)
            .sum()
    }
}

impl Default for CategoryGate {
    fn default() -> Self {
        Self::new(MAX_CATEGORIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_starts_all_disabled() {
        let gate = CategoryGate::default();
        assert_eq!(gate.capacity(), MAX_CATEGORIES as usize);
        assert_eq!(gate.enabled_count(), 0);
        assert!(!gate.is_enabled(0));
        assert!(!gate.is_enabled(MAX_CATEGORIES - 1));
    }

    #[test]
    fn test_set_and_clear() {
        let gate = CategoryGate::default();
        gate.set_enabled(1, true).unwrap();
        gate.set_enabled(64, true).unwrap();
        assert!(gate.is_enabled(1));
        assert!(gate.is_enabled(64));
        assert!(!gate.is_enabled(2));

        gate.set_enabled(1, false).unwrap();
        assert!(!gate.is_enabled(1));
        assert!(gate.is_enabled(64), "Clearing one bit must not touch its neighbours");
    }

    #[test]
    fn test_out_of_range_rejected() {
        let gate = CategoryGate::new(10);
        let result = gate.set_enabled(10, true);
        assert!(matches!(
            result,
            Err(FilterError::CategoryOutOfRange { id: 10, capacity: 10 })
        ));
        assert!(!gate.is_enabled(10));
        assert!(!gate.is_enabled(u16::MAX));
    }

    #[test]
    fn test_set_all_respects_capacity() {
        let gate = CategoryGate::new(70);
        gate.set_all(true);
        assert_eq!(gate.enabled_count(), 70);
        assert!(gate.is_enabled(69));

        gate.set_all(false);
        assert_eq!(gate.enabled_count(), 0);
    }

    #[test]
    fn test_full_capacity_set_all() {
        let gate = CategoryGate::default();
        gate.set_all(true);
        assert_eq!(gate.enabled_count(), MAX_CATEGORIES as usize);
    }

    #[test]
    fn test_concurrent_readers_see_writes() {
        let gate = Arc::new(CategoryGate::default());
        let writer = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || {
                for id in 0..1000u16 {
                    gate.set_enabled(id, true).unwrap();
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let gate = Arc::clone(&gate);
                thread::spawn(move || (0..1000u16).filter(|id| gate.is_enabled(*id)).count())
            })
            .collect();

        writer.join().unwrap();
        for r in readers {
            assert!(r.join().unwrap() <= 1000);
        }
        assert_eq!(gate.enabled_count(), 1000);
    }
}
