//! Phrase preparation for bulk loads
//!
//! Every input line becomes one [`Trigger`] row plus one derived
//! [`FirstWordEntry`] row, or is rejected as malformed. Rejections are
//! counted, never raised.

use shared_types::{CategoryId, FirstWordEntry, Trigger, MAX_PHRASE_LEN};

use super::tokenizer::words;

/// Why a line was not loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseRejection {
    /// Empty after trimming.
    Blank,
    /// Contains no `[a-z0-9.-]` run, so it can never be matched.
    NoWordToken,
    /// Embedded NUL; unusable as a store key.
    ContainsNul,
    /// Longer than [`MAX_PHRASE_LEN`] bytes after normalisation.
    TooLong { len: usize },
}

/// One accepted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPhrase {
    pub trigger: Trigger,
    pub first_word: FirstWordEntry,
}

/// Rows produced by one `load_batch` call, written in a single transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerBatch {
    pub triggers: Vec<Trigger>,
    pub first_words: Vec<FirstWordEntry>,
}

impl TriggerBatch {
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    pub fn push(&mut self, prepared: PreparedPhrase) {
        self.triggers.push(prepared.trigger);
        self.first_words.push(prepared.first_word);
    }
}

/// Outcome counters of one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Phrases stored.
    pub loaded: usize,
    /// Lines rejected as blank or malformed.
    pub skipped: usize,
}

impl std::ops::AddAssign for LoadReport {
    fn add_assign(&mut self, other: Self) {
        self.loaded += other.loaded;
        self.skipped += other.skipped;
    }
}

/// Canonical form of a phrase: its word tokens, lowercased, joined by
/// single spaces.
///
/// Stored phrases and rebuilt scan fragments share this form, so
/// punctuation and markup between words never affect a comparison.
pub fn normalize_phrase(raw: &str) -> String {
    let mut phrase = String::with_capacity(raw.len());
    for word in words(raw) {
        if !phrase.is_empty() {
            phrase.push(' ');
        }
        phrase.push_str(&word);
    }
    phrase
}

/// Turn one list line into its trigger and first-word rows.
pub fn prepare_phrase(line: &str, category: CategoryId) -> Result<PreparedPhrase, PhraseRejection> {
    let line = line.trim();

    if line.is_empty() {
        return Err(PhraseRejection::Blank);
    }
    if line.contains('\0') {
        return Err(PhraseRejection::ContainsNul);
    }

    let phrase = normalize_phrase(line);
    if phrase.is_empty() {
        return Err(PhraseRejection::NoWordToken);
    }
    if phrase.len() > MAX_PHRASE_LEN {
        return Err(PhraseRejection::TooLong { len: phrase.len() });
    }

    let (first, is_whole_trigger) = match phrase.split_once(' ') {
        Some((first, _)) => (first.to_string(), false),
        None => (phrase.clone(), true),
    };

    Ok(PreparedPhrase {
        first_word: FirstWordEntry {
            first_word: first,
            is_whole_trigger,
            category,
        },
        trigger: Trigger { phrase, category },
    })
}

/// Prepare every line of one list for a single batch write.
pub fn prepare_batch<I, S>(lines: I, category: CategoryId) -> (TriggerBatch, LoadReport)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut batch = TriggerBatch::default();
    let mut report = LoadReport::default();

    for line in lines {
        match prepare_phrase(line.as_ref(), category) {
            Ok(prepared) => {
                batch.push(prepared);
                report.loaded += 1;
            }
            Err(_) => report.skipped += 1,
        }
    }

    (batch, report)
}
