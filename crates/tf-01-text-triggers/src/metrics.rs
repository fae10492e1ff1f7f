//! Metrics hooks for trigger matching
//!
//! Counters for how much work each scan does and how often the bloom
//! pre-filters spare an exact store lookup.
//!
//! ## Usage
//!
//! ```ignore
//! use tf_01_text_triggers::metrics::{EngineMetrics, MetricsRecorder};
//!
//! let metrics = EngineMetrics::new();
//! metrics.record_scan(42);
//! println!("{:?}", metrics.snapshot());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Which bloom filter rejected a candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BloomKind {
    FirstWord,
    WholePhrase,
}

/// Metrics collector for engine operations
///
/// Thread-safe counters, shared by all concurrent callers.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    /// Calls to `contains_trigger` that tokenized their input
    pub scans: AtomicU64,
    /// Word tokens examined across all scans
    pub tokens_examined: AtomicU64,
    pub first_word_rejections: AtomicU64,
    pub whole_phrase_rejections: AtomicU64,
    /// Exact lookups that reached the store
    pub store_lookups: AtomicU64,
    pub store_errors: AtomicU64,
    pub matches: AtomicU64,
    pub fragments_started: AtomicU64,
    /// Fragments dropped by the in-flight cap
    pub fragments_evicted: AtomicU64,
    /// Fragments that reached the word window without matching
    pub fragments_retired: AtomicU64,
    /// Fragments dropped before passing the phrase length limit
    pub fragments_oversized: AtomicU64,
    pub generations_installed: AtomicU64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            scans: self.scans.load(Ordering::Relaxed),
            tokens_examined: self.tokens_examined.load(Ordering::Relaxed),
            first_word_rejections: self.first_word_rejections.load(Ordering::Relaxed),
            whole_phrase_rejections: self.whole_phrase_rejections.load(Ordering::Relaxed),
            store_lookups: self.store_lookups.load(Ordering::Relaxed),
            store_errors: self.store_errors.load(Ordering::Relaxed),
            matches: self.matches.load(Ordering::Relaxed),
            fragments_started: self.fragments_started.load(Ordering::Relaxed),
            fragments_evicted: self.fragments_evicted.load(Ordering::Relaxed),
            fragments_retired: self.fragments_retired.load(Ordering::Relaxed),
            fragments_oversized: self.fragments_oversized.load(Ordering::Relaxed),
            generations_installed: self.generations_installed.load(Ordering::Relaxed),
        }
    }

    /// Share of bloom checks that were rejected without a store lookup.
    pub fn bloom_rejection_rate(&self) -> f64 {
        let rejected = self.first_word_rejections.load(Ordering::Relaxed)
            + self.whole_phrase_rejections.load(Ordering::Relaxed);
        let total = rejected + self.store_lookups.load(Ordering::Relaxed);
        if total > 0 {
            rejected as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        for counter in [
            &self.scans,
            &self.tokens_examined,
            &self.first_word_rejections,
            &self.whole_phrase_rejections,
            &self.store_lookups,
            &self.store_errors,
            &self.matches,
            &self.fragments_started,
            &self.fragments_evicted,
            &self.fragments_retired,
            &self.fragments_oversized,
            &self.generations_installed,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub scans: u64,
    pub tokens_examined: u64,
    pub first_word_rejections: u64,
    pub whole_phrase_rejections: u64,
    pub store_lookups: u64,
    pub store_errors: u64,
    pub matches: u64,
    pub fragments_started: u64,
    pub fragments_evicted: u64,
    pub fragments_retired: u64,
    pub fragments_oversized: u64,
    pub generations_installed: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this to forward engine counters to an external metrics system.
pub trait MetricsRecorder: Send + Sync {
    /// One scan finished after examining `tokens` word tokens.
    fn record_scan(&self, tokens: u64);
    fn record_bloom_rejection(&self, kind: BloomKind);
    fn record_store_lookup(&self);
    fn record_store_error(&self);
    fn record_match(&self);
    fn record_fragment_started(&self);
    fn record_fragment_evicted(&self);
    /// Fragments dropped while growing: `retired` hit the word window,
    /// `oversized` would have passed the phrase length limit.
    fn record_fragments_dropped(&self, retired: u64, oversized: u64);
    fn record_generation_installed(&self);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Debug, Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_scan(&self, _: u64) {}
    fn record_bloom_rejection(&self, _: BloomKind) {}
    fn record_store_lookup(&self) {}
    fn record_store_error(&self) {}
    fn record_match(&self) {}
    fn record_fragment_started(&self) {}
    fn record_fragment_evicted(&self) {}
    fn record_fragments_dropped(&self, _: u64, _: u64) {}
    fn record_generation_installed(&self) {}
}

impl MetricsRecorder for EngineMetrics {
    fn record_scan(&self, tokens: u64) {
        self.scans.fetch_add(1, Ordering::Relaxed);
        self.tokens_examined.fetch_add(tokens, Ordering::Relaxed);
    }

    fn record_bloom_rejection(&self, kind: BloomKind) {
        let counter = match kind {
            BloomKind::FirstWord => &self.first_word_rejections,
            BloomKind::WholePhrase => &self.whole_phrase_rejections,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn record_store_lookup(&self) {
        self.store_lookups.fetch_add(1, Ordering::Relaxed);
    }

    fn record_store_error(&self) {
        self.store_errors.fetch_add(1, Ordering::Relaxed);
    }

    fn record_match(&self) {
        self.matches.fetch_add(1, Ordering::Relaxed);
    }

    fn record_fragment_started(&self) {
        self.fragments_started.fetch_add(1, Ordering::Relaxed);
    }

    fn record_fragment_evicted(&self) {
        self.fragments_evicted.fetch_add(1, Ordering::Relaxed);
    }

    fn record_fragments_dropped(&self, retired: u64, oversized: u64) {
        self.fragments_retired.fetch_add(retired, Ordering::Relaxed);
        self.fragments_oversized.fetch_add(oversized, Ordering::Relaxed);
    }

    fn record_generation_installed(&self) {
        self.generations_installed.fetch_add(1, Ordering::Relaxed);
    }
}
