//! Outbound Ports (Driven Ports)
//!
//! The persistent exact-match index the engine depends on. Any embedded
//! store that can answer exact key lookups over two logical tables
//! (phrases and first words) qualifies.

use shared_types::{CategoryId, FirstWordHit};

use crate::domain::phrase::{normalize_phrase, prepare_batch, LoadReport, TriggerBatch};
use crate::error::StoreError;

/// Trigger store (Driven Port)
///
/// One store holds one generation. Writes happen only while the generation
/// is being built; once installed the store is shared read-only across
/// query threads.
pub trait TriggerStore: Send + Sync {
    /// Persist every row of `batch` in a single transaction.
    ///
    /// On error nothing from the batch is visible.
    fn write_batch(&mut self, batch: TriggerBatch) -> Result<(), StoreError>;

    /// Build whatever indexes exact lookup needs. Later writes stay legal.
    fn finalize_for_read(&mut self) -> Result<(), StoreError>;

    /// Categories of every row whose phrase equals `phrase`, in insertion order.
    fn lookup_all(&self, phrase: &str) -> Result<Vec<CategoryId>, StoreError>;

    /// Every first-word row for `word`, in insertion order.
    fn lookup_first_word(&self, word: &str) -> Result<Vec<FirstWordHit>, StoreError>;

    fn trigger_count(&self) -> usize;

    fn first_word_count(&self) -> usize;

    /// Visit every stored phrase once.
    fn for_each_phrase(&self, visit: &mut dyn FnMut(&str)) -> Result<(), StoreError>;

    /// Visit every stored first word once per row.
    fn for_each_first_word(&self, visit: &mut dyn FnMut(&str)) -> Result<(), StoreError>;

    /// First category mapped to `phrase`, after case folding.
    fn is_exact_trigger(&self, phrase: &str) -> Result<Option<CategoryId>, StoreError> {
        Ok(self.lookup_all(&normalize_phrase(phrase))?.first().copied())
    }

    /// Prepare `phrases` and write them as one batch under `category`.
    ///
    /// Malformed lines are counted in the report, never raised.
    fn load_batch<I, S>(&mut self, phrases: I, category: CategoryId) -> Result<LoadReport, StoreError>
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (batch, report) = prepare_batch(phrases, category);
        if !batch.is_empty() {
            self.write_batch(batch)?;
        }
        Ok(report)
    }
}
