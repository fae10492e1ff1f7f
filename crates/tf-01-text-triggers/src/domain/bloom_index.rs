//! Two-filter pre-check in front of the trigger store
//!
//! `first_word` holds the first token of every phrase; `whole_trigger` holds
//! every full phrase. Both are sized once from the row counts of their
//! tables and filled before the generation serves queries.

use tracing::info;

use super::bloom_filter::BloomFilter;
use super::parameters::DEFAULT_FILTER_CAPACITY;

#[derive(Clone, Debug)]
pub struct BloomIndex {
    first_word: BloomFilter,
    whole_trigger: BloomFilter,
}

impl BloomIndex {
    /// Empty filters sized for the given element counts.
    ///
    /// A count of zero falls back to [`DEFAULT_FILTER_CAPACITY`].
    pub fn with_capacity(first_words: usize, phrases: usize, fpr: f64) -> Self {
        let first_cap = capacity_or_default(first_words);
        let phrase_cap = capacity_or_default(phrases);

        let first_word = BloomFilter::new_with_fpr(first_cap, fpr);
        let whole_trigger = BloomFilter::new_with_fpr(phrase_cap, fpr);

        info!(
            expected = first_cap,
            size_bits = first_word.size_bits(),
            hash_count = first_word.hash_count(),
            "First-word bloom filter created"
        );
        info!(
            expected = phrase_cap,
            size_bits = whole_trigger.size_bits(),
            hash_count = whole_trigger.hash_count(),
            "Whole-trigger bloom filter created"
        );

        Self {
            first_word,
            whole_trigger,
        }
    }

    pub fn insert_first_word(&mut self, word: &str) {
        self.first_word.insert(word.as_bytes());
    }

    pub fn insert_phrase(&mut self, phrase: &str) {
        self.whole_trigger.insert(phrase.as_bytes());
    }

    /// `false` means `word` is certainly not the first word of any trigger.
    pub fn contains_first_word(&self, word: &str) -> bool {
        self.first_word.contains(word.as_bytes())
    }

    /// `false` means `phrase` is certainly not a stored trigger.
    pub fn contains_phrase(&self, phrase: &str) -> bool {
        self.whole_trigger.contains(phrase.as_bytes())
    }

    pub fn first_word_filter(&self) -> &BloomFilter {
        &self.first_word
    }

    pub fn whole_trigger_filter(&self) -> &BloomFilter {
        &self.whole_trigger
    }
}

fn capacity_or_default(count: usize) -> usize {
    if count == 0 {
        DEFAULT_FILTER_CAPACITY
    } else {
        count
    }
}
