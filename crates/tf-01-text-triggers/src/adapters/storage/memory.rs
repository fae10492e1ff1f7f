//! In-memory trigger store
//!
//! Rows live in two append-only vectors. `finalize_for_read` builds a
//! stably sorted permutation of each, so lookups become a binary search
//! that still yields equal keys in insertion order. Writes after
//! finalization drop back to linear scans until the next finalize.

use shared_types::{CategoryId, FirstWordEntry, FirstWordHit, Trigger};

use crate::domain::phrase::TriggerBatch;
use crate::error::StoreError;
use crate::ports::TriggerStore;

#[derive(Debug, Default)]
pub struct InMemoryTriggerStore {
    triggers: Vec<Trigger>,
    first_words: Vec<FirstWordEntry>,
    phrase_index: Vec<usize>,
    word_index: Vec<usize>,
    finalized: bool,
}

impl InMemoryTriggerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}

/// Positions in `index` whose key equals `key`, in index order.
fn equal_range<'a, T>(
    rows: &'a [T],
    index: &'a [usize],
    key: &'a str,
    key_of: impl Fn(&T) -> &str + Copy + 'a,
) -> impl Iterator<Item = &'a T> + 'a {
    let start = index.partition_point(|&i| key_of(&rows[i]) < key);
    index[start..]
        .iter()
        .map(move |&i| &rows[i])
        .take_while(move |row| key_of(row) == key)
}

impl TriggerStore for InMemoryTriggerStore {
    fn write_batch(&mut self, batch: TriggerBatch) -> Result<(), StoreError> {
        if batch.triggers.len() != batch.first_words.len() {
            return Err(StoreError::Corruption(format!(
                "batch has {} triggers but {} first-word rows",
                batch.triggers.len(),
                batch.first_words.len()
            )));
        }
        self.triggers.extend(batch.triggers);
        self.first_words.extend(batch.first_words);
        self.finalized = false;
        Ok(())
    }

    fn finalize_for_read(&mut self) -> Result<(), StoreError> {
        let triggers = &self.triggers;
        let mut phrase_index: Vec<usize> = (0..triggers.len()).collect();
        phrase_index.sort_by(|&a, &b| triggers[a].phrase.cmp(&triggers[b].phrase));

        let first_words = &self.first_words;
        let mut word_index: Vec<usize> = (0..first_words.len()).collect();
        word_index.sort_by(|&a, &b| first_words[a].first_word.cmp(&first_words[b].first_word));

        self.phrase_index = phrase_index;
        self.word_index = word_index;
        self.finalized = true;
        Ok(())
    }

    fn lookup_all(&self, phrase: &str) -> Result<Vec<CategoryId>, StoreError> {
        let categories = if self.finalized {
            equal_range(&self.triggers, &self.phrase_index, phrase, |t: &Trigger| {
                t.phrase.as_str()
            })
            .map(|t| t.category)
            .collect()
        } else {
            self.triggers
                .iter()
                .filter(|t| t.phrase == phrase)
                .map(|t| t.category)
                .collect()
        };
        Ok(categories)
    }

    fn lookup_first_word(&self, word: &str) -> Result<Vec<FirstWordHit>, StoreError> {
        let hits = if self.finalized {
            equal_range(&self.first_words, &self.word_index, word, |e: &FirstWordEntry| {
                e.first_word.as_str()
            })
            .map(FirstWordEntry::hit)
            .collect()
        } else {
            self.first_words
                .iter()
                .filter(|e| e.first_word == word)
                .map(FirstWordEntry::hit)
                .collect()
        };
        Ok(hits)
    }

    fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    fn first_word_count(&self) -> usize {
        self.first_words.len()
    }

    fn for_each_phrase(&self, visit: &mut dyn FnMut(&str)) -> Result<(), StoreError> {
        for trigger in &self.triggers {
            visit(&trigger.phrase);
        }
        Ok(())
    }

    fn for_each_first_word(&self, visit: &mut dyn FnMut(&str)) -> Result<(), StoreError> {
        for entry in &self.first_words {
            visit(&entry.first_word);
        }
        Ok(())
    }
}
