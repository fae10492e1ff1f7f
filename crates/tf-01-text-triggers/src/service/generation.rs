//! Trigger generations
//!
//! A generation is one fully loaded rule-set: store, bloom index, category
//! gate and category labels. It is built off to the side by a
//! [`GenerationBuilder`] and only becomes visible to queries once
//! [`finish`](GenerationBuilder::finish) has succeeded and the engine
//! installs it.

use std::collections::{BTreeSet, HashMap};

use shared_types::{is_valid_category, CategoryId, MAX_CATEGORIES};
use tracing::{debug, info};

use crate::domain::{BloomIndex, CategoryGate, EngineConfig, LoadReport};
use crate::error::FilterError;
use crate::ports::TriggerStore;

/// One immutable, query-ready rule-set.
#[derive(Debug)]
pub struct TriggerGeneration<S> {
    store: S,
    blooms: BloomIndex,
    gate: CategoryGate,
    labels: HashMap<CategoryId, String>,
    report: LoadReport,
}

impl<S: TriggerStore> TriggerGeneration<S> {
    /// A generation with no triggers; every scan returns no match.
    pub fn empty(mut store: S, config: &EngineConfig) -> Result<Self, FilterError> {
        store.finalize_for_read()?;
        Ok(Self {
            blooms: BloomIndex::with_capacity(0, 0, config.bloom_fpr),
            store,
            gate: CategoryGate::new(MAX_CATEGORIES),
            labels: HashMap::new(),
            report: LoadReport::default(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn blooms(&self) -> &BloomIndex {
        &self.blooms
    }

    pub fn gate(&self) -> &CategoryGate {
        &self.gate
    }

    /// Human-readable name recorded for `id`, if any.
    pub fn label(&self, id: CategoryId) -> Option<&str> {
        self.labels.get(&id).map(String::as_str)
    }

    /// Totals across every batch loaded into this generation.
    pub fn load_report(&self) -> LoadReport {
        self.report
    }

    pub fn stats(&self) -> GenerationStats {
        GenerationStats {
            triggers: self.store.trigger_count(),
            first_words: self.store.first_word_count(),
            enabled_categories: self.gate.enabled_count(),
            labelled_categories: self.labels.len(),
            skipped_lines: self.report.skipped,
        }
    }
}

/// Size summary of a generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub triggers: usize,
    pub first_words: usize,
    pub enabled_categories: usize,
    pub labelled_categories: usize,
    pub skipped_lines: usize,
}

/// Builds a [`TriggerGeneration`] on top of one fresh store.
pub struct GenerationBuilder<S> {
    store: S,
    bloom_fpr: f64,
    populated: BTreeSet<CategoryId>,
    labels: HashMap<CategoryId, String>,
    report: LoadReport,
}

impl<S: TriggerStore> GenerationBuilder<S> {
    pub fn new(store: S, config: &EngineConfig) -> Self {
        Self {
            store,
            bloom_fpr: config.bloom_fpr,
            populated: BTreeSet::new(),
            labels: HashMap::new(),
            report: LoadReport::default(),
        }
    }

    /// Load one list of phrases under `category` as a single batch.
    ///
    /// Blank and malformed lines are counted as skipped. A storage failure
    /// aborts the whole generation: drop the builder and keep the old one.
    pub fn load_batch<I, T>(&mut self, category: CategoryId, phrases: I) -> Result<LoadReport, FilterError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        if !is_valid_category(category) {
            return Err(FilterError::CategoryOutOfRange {
                id: category,
                capacity: MAX_CATEGORIES as usize,
            });
        }

        let report = self.store.load_batch(phrases, category)?;
        if report.loaded > 0 {
            self.populated.insert(category);
        }
        self.report += report;

        debug!(
            category,
            loaded = report.loaded,
            skipped = report.skipped,
            "Loaded trigger batch"
        );
        Ok(report)
    }

    /// Record a display name for `id`. Labels never affect matching.
    pub fn label_category(&mut self, id: CategoryId, name: impl Into<String>) {
        self.labels.insert(id, name.into());
    }

    /// Categories that received at least one phrase so far.
    pub fn populated_categories(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.populated.iter().copied()
    }

    /// Finalize the store, fill both bloom filters from it and enable every
    /// populated category.
    pub fn finish(mut self) -> Result<TriggerGeneration<S>, FilterError> {
        self.store.finalize_for_read()?;

        let mut blooms = BloomIndex::with_capacity(
            self.store.first_word_count(),
            self.store.trigger_count(),
            self.bloom_fpr,
        );
        self.store
            .for_each_first_word(&mut |word| blooms.insert_first_word(word))?;
        self.store
            .for_each_phrase(&mut |phrase| blooms.insert_phrase(phrase))?;

        let gate = CategoryGate::new(MAX_CATEGORIES);
        for &category in &self.populated {
            gate.set_enabled(category, true)?;
        }

        info!(
            triggers = self.store.trigger_count(),
            first_words = self.store.first_word_count(),
            categories = self.populated.len(),
            skipped = self.report.skipped,
            "Trigger generation built"
        );

        Ok(TriggerGeneration {
            store: self.store,
            blooms,
            gate,
            labels: self.labels,
            report: self.report,
        })
    }
}
