//! In-flight candidate fragments for split-phrase reconstruction
//!
//! A fragment starts at a token that begins some multi-word trigger and
//! grows by one accepted token at a time. The set is bounded twice: each
//! fragment by the word window, the whole set by the in-flight cap (oldest
//! evicted first).

use std::collections::VecDeque;

use shared_types::MAX_PHRASE_LEN;

/// One candidate: its words joined with single spaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    text: String,
    words: usize,
}

impl Fragment {
    fn seed(word: &str) -> Self {
        Self {
            text: word.to_string(),
            words: 1,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn word_count(&self) -> usize {
        self.words
    }
}

/// What one [`FragmentSet::advance`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvanceOutcome {
    /// Fragments that had already reached the word window.
    pub retired: usize,
    /// Fragments dropped because the joined text would exceed the phrase limit.
    pub oversized: usize,
}

#[derive(Clone, Debug)]
pub struct FragmentSet {
    fragments: VecDeque<Fragment>,
    max_words: usize,
    max_in_flight: usize,
}

impl FragmentSet {
    pub fn new(max_words: usize, max_in_flight: usize) -> Self {
        Self {
            fragments: VecDeque::new(),
            max_words: max_words.max(1),
            max_in_flight: max_in_flight.max(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Append `word` to every fragment still inside the window.
    ///
    /// Full fragments are retired before growing; fragments whose text
    /// would pass [`MAX_PHRASE_LEN`] are discarded instead of extended.
    pub fn advance(&mut self, word: &str) -> AdvanceOutcome {
        let mut outcome = AdvanceOutcome::default();
        let max_words = self.max_words;

        self.fragments.retain_mut(|fragment| {
            if fragment.words >= max_words {
                outcome.retired += 1;
                return false;
            }
            if fragment.text.len() + 1 + word.len() > MAX_PHRASE_LEN {
                outcome.oversized += 1;
                return false;
            }
            fragment.text.push(' ');
            fragment.text.push_str(word);
            fragment.words += 1;
            true
        });

        outcome
    }

    /// Start a new fragment at `word`. Returns `true` if the oldest
    /// fragment had to be evicted to make room.
    pub fn seed(&mut self, word: &str) -> bool {
        let evicted = self.fragments.len() >= self.max_in_flight;
        if evicted {
            self.fragments.pop_front();
        }
        self.fragments.push_back(Fragment::seed(word));
        evicted
    }

    /// Fragments of two or more words, oldest first.
    pub fn candidates(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter().filter(|f| f.words > 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(set: &FragmentSet) -> Vec<&str> {
        set.candidates().map(|f| f.text()).collect()
    }

    #[test]
    fn test_seed_and_grow() {
        let mut set = FragmentSet::new(3, 8);
        set.seed("kill");
        assert!(texts(&set).is_empty(), "A lone seed is not a candidate");

        set.advance("the");
        assert_eq!(texts(&set), vec!["kill the"]);

        set.advance("president");
        assert_eq!(texts(&set), vec!["kill the president"]);
    }

    #[test]
    fn test_full_fragment_retired_before_growing() {
        let mut set = FragmentSet::new(2, 8);
        set.seed("kill");
        set.advance("the");

        let outcome = set.advance("president");
        assert_eq!(outcome.retired, 1);
        assert!(set.is_empty());
    }

    #[test]
    fn test_oldest_evicted_at_cap() {
        let mut set = FragmentSet::new(5, 2);
        assert!(!set.seed("a"));
        assert!(!set.seed("b"));
        assert!(set.seed("c"));
        set.advance("x");
        assert_eq!(texts(&set), vec!["b x", "c x"]);
    }

    #[test]
    fn test_oversized_fragment_discarded() {
        let mut set = FragmentSet::new(5, 4);
        let long = "w".repeat(MAX_PHRASE_LEN - 2);
        set.seed(&long);
        set.seed("ok");

        let outcome = set.advance("xyz");
        assert_eq!(outcome.oversized, 1);
        assert_eq!(texts(&set), vec!["ok xyz"]);
    }

    #[test]
    fn test_window_of_one_never_grows() {
        let mut set = FragmentSet::new(1, 4);
        set.seed("kill");
        set.advance("the");
        assert!(set.is_empty());
    }
}
