//! Match Engine
//!
//! Orchestrates tokenizer, bloom index, trigger store and category gate to
//! answer "does this text contain an enabled trigger?".
//!
//! The active generation sits behind a `RwLock<Arc<_>>`. Queries hold the
//! read lock only long enough to clone the `Arc`, so a reload never waits on
//! a long scan and a scan never sees a half-loaded rule-set.

use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::{CategoryId, TriggerMatch, MAX_PHRASE_LEN};
use tracing::{error, info, warn};

use crate::domain::{
    normalize_phrase, tokenize, EngineConfig, FragmentSet, MarkupState, QueryErrorPolicy,
};
use crate::error::{FilterError, StoreError};
use crate::metrics::{BloomKind, MetricsRecorder, NoOpMetrics};
use crate::ports::{TriggerMatcher, TriggerStore};

use super::generation::TriggerGeneration;

/// Text trigger matching service
///
/// Implements the `TriggerMatcher` port over one swappable generation.
pub struct MatchEngine<S> {
    active: RwLock<Arc<TriggerGeneration<S>>>,
    config: EngineConfig,
    metrics: Arc<dyn MetricsRecorder>,
}

impl<S: TriggerStore> MatchEngine<S> {
    /// Create an engine serving `generation`, with metrics disabled.
    pub fn new(config: EngineConfig, generation: TriggerGeneration<S>) -> Result<Self, FilterError> {
        Self::with_metrics(config, generation, Arc::new(NoOpMetrics))
    }

    pub fn with_metrics(
        config: EngineConfig,
        generation: TriggerGeneration<S>,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Result<Self, FilterError> {
        config.validate()?;
        Ok(Self {
            active: RwLock::new(Arc::new(generation)),
            config,
            metrics,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The generation currently serving queries.
    pub fn generation(&self) -> Arc<TriggerGeneration<S>> {
        Arc::clone(&self.active.read())
    }

    /// Atomically replace the active generation; returns the previous one.
    ///
    /// Scans already running keep their own `Arc` and finish against the
    /// old generation.
    pub fn install(&self, generation: TriggerGeneration<S>) -> Arc<TriggerGeneration<S>> {
        let stats = generation.stats();
        let next = Arc::new(generation);
        let previous = std::mem::replace(&mut *self.active.write(), next);

        self.metrics.record_generation_installed();
        info!(
            triggers = stats.triggers,
            categories = stats.enabled_categories,
            "Installed trigger generation"
        );
        previous
    }

    /// Build a generation with `build` and install it.
    ///
    /// On error the active generation is left untouched.
    pub fn reload<F, E>(&self, build: F) -> Result<Arc<TriggerGeneration<S>>, E>
    where
        F: FnOnce(&EngineConfig) -> Result<TriggerGeneration<S>, E>,
        E: std::fmt::Display,
    {
        match build(&self.config) {
            Ok(generation) => Ok(self.install(generation)),
            Err(e) => {
                error!(error = %e, "Trigger reload failed; keeping active generation");
                Err(e)
            }
        }
    }

    /// Display name of `id` in the active generation.
    pub fn category_label(&self, id: CategoryId) -> Option<String> {
        self.generation().label(id).map(str::to_string)
    }

    /// Apply the configured policy to a failed store lookup.
    fn guard<T: Default>(&self, result: Result<T, StoreError>, key: &str) -> Result<T, FilterError> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                self.metrics.record_store_error();
                match self.config.query_error_policy {
                    QueryErrorPolicy::FailOpen => {
                        warn!(error = %e, key, "Trigger store lookup failed; treating as no match");
                        Ok(T::default())
                    }
                    QueryErrorPolicy::FailClosed => {
                        warn!(error = %e, key, "Trigger store lookup failed; failing closed");
                        Err(FilterError::Store(e))
                    }
                }
            }
        }
    }

    fn scan(
        &self,
        generation: &TriggerGeneration<S>,
        text: &str,
        applicable: &dyn Fn(CategoryId) -> bool,
        rebuild: bool,
        max_fragment_len: usize,
        examined: &mut u64,
    ) -> Result<Option<TriggerMatch>, FilterError> {
        let blooms = generation.blooms();
        let store = generation.store();
        let mut markup = MarkupState::new();
        let mut fragments = FragmentSet::new(max_fragment_len, self.config.max_in_flight_fragments);

        for token in tokenize(text) {
            let Some(word) = markup.accept(&token) else {
                continue;
            };
            *examined += 1;

            // Multi-word path: extend every in-flight fragment by this word.
            if !fragments.is_empty() {
                let outcome = fragments.advance(word);
                if outcome.retired > 0 || outcome.oversized > 0 {
                    self.metrics
                        .record_fragments_dropped(outcome.retired as u64, outcome.oversized as u64);
                }
                for fragment in fragments.candidates() {
                    let phrase = fragment.text();
                    if !blooms.contains_phrase(phrase) {
                        self.metrics.record_bloom_rejection(BloomKind::WholePhrase);
                        continue;
                    }
                    self.metrics.record_store_lookup();
                    let categories = self.guard(store.lookup_all(phrase), phrase)?;
                    if let Some(category) = categories.into_iter().find(|&c| applicable(c)) {
                        return Ok(Some(TriggerMatch {
                            category,
                            matched_text: phrase.to_string(),
                        }));
                    }
                }
            }

            // Single-word path.
            if !blooms.contains_first_word(word) {
                self.metrics.record_bloom_rejection(BloomKind::FirstWord);
                continue;
            }
            self.metrics.record_store_lookup();
            let hits = self.guard(store.lookup_first_word(word), word)?;

            if let Some(hit) = hits
                .iter()
                .find(|h| h.is_whole_trigger && applicable(h.category))
            {
                return Ok(Some(TriggerMatch {
                    category: hit.category,
                    matched_text: word.to_string(),
                }));
            }

            if rebuild
                && hits
                    .iter()
                    .any(|h| !h.is_whole_trigger && applicable(h.category))
            {
                if fragments.seed(word) {
                    self.metrics.record_fragment_evicted();
                }
                self.metrics.record_fragment_started();
            }
        }

        Ok(None)
    }
}

impl<S: TriggerStore> TriggerMatcher for MatchEngine<S> {
    fn is_exact_trigger(
        &self,
        text: &str,
        category_applies: &dyn Fn(CategoryId) -> bool,
    ) -> Result<Option<CategoryId>, FilterError> {
        let generation = self.generation();
        let phrase = normalize_phrase(text);
        if phrase.is_empty() || phrase.len() > MAX_PHRASE_LEN {
            return Ok(None);
        }

        if !generation.blooms().contains_phrase(&phrase) {
            self.metrics.record_bloom_rejection(BloomKind::WholePhrase);
            return Ok(None);
        }
        self.metrics.record_store_lookup();
        let categories = self.guard(generation.store().lookup_all(&phrase), &phrase)?;

        let gate = generation.gate();
        Ok(categories
            .into_iter()
            .find(|&c| gate.is_enabled(c) && category_applies(c)))
    }

    fn contains_trigger(
        &self,
        text: &str,
        category_applies: &dyn Fn(CategoryId) -> bool,
        allow_fragment_rebuild: bool,
        max_fragment_len: usize,
    ) -> Result<Option<TriggerMatch>, FilterError> {
        let generation = self.generation();
        if generation.store().trigger_count() == 0 {
            return Ok(None);
        }

        let gate = generation.gate();
        let applicable = |c: CategoryId| gate.is_enabled(c) && category_applies(c);
        let rebuild = allow_fragment_rebuild && max_fragment_len > 1;

        let mut examined = 0;
        let result = self.scan(
            &generation,
            text,
            &applicable,
            rebuild,
            max_fragment_len,
            &mut examined,
        );
        self.metrics.record_scan(examined);

        if let Ok(Some(found)) = &result {
            self.metrics.record_match();
            info!(
                category = found.category,
                matched = %found.matched_text,
                "Trigger matched"
            );
        }
        result
    }

    fn set_category_enabled(&self, id: CategoryId, enabled: bool) -> Result<(), FilterError> {
        self.generation().gate().set_enabled(id, enabled)
    }

    fn is_category_enabled(&self, id: CategoryId) -> bool {
        self.generation().gate().is_enabled(id)
    }

    fn set_all_categories(&self, enabled: bool) {
        self.generation().gate().set_all(enabled)
    }
}
