//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Categories**: `CategoryId`, `MAX_CATEGORIES`
//! - **Trigger rows**: `Trigger`, `FirstWordEntry`, `FirstWordHit`
//! - **Results**: `TriggerMatch`
//! - **Rule-set lists**: `ListKind`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// CLUSTER A: CATEGORIES
// =============================================================================

/// Identifier of a content category.
///
/// Assigned by the rule-set loader and stable for the lifetime of one
/// loaded rule-set.
pub type CategoryId = u16;

/// Exclusive upper bound for category ids.
pub const MAX_CATEGORIES: u16 = 32767;

/// Longest phrase, in bytes, the trigger index will store or query.
pub const MAX_PHRASE_LEN: usize = 255;

/// Returns true when `id` is inside the fixed category space.
pub fn is_valid_category(id: CategoryId) -> bool {
    id < MAX_CATEGORIES
}

// =============================================================================
// CLUSTER B: TRIGGER ROWS
// =============================================================================

/// A phrase whose presence in inspected text blocks its category.
///
/// The phrase is lowercased and whitespace-normalised before it is built.
/// The same phrase may appear once per category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trigger {
    /// Normalised phrase text.
    pub phrase: String,
    /// Category the phrase belongs to.
    pub category: CategoryId,
}

/// First-word row derived mechanically from a [`Trigger`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FirstWordEntry {
    /// The phrase's first word token.
    pub first_word: String,
    /// True iff the phrase is exactly this one token.
    pub is_whole_trigger: bool,
    /// Category of the originating trigger.
    pub category: CategoryId,
}

impl FirstWordEntry {
    /// Projection returned by first-word lookups.
    pub fn hit(&self) -> FirstWordHit {
        FirstWordHit {
            is_whole_trigger: self.is_whole_trigger,
            category: self.category,
        }
    }
}

/// Result row of a first-word lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FirstWordHit {
    /// True iff the stored phrase is a single word.
    pub is_whole_trigger: bool,
    /// Category of the stored phrase.
    pub category: CategoryId,
}

// =============================================================================
// CLUSTER C: RESULTS
// =============================================================================

/// A positive match verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerMatch {
    /// First applicable category of the matched phrase.
    pub category: CategoryId,
    /// The text that matched, space-joined when rebuilt from fragments.
    pub matched_text: String,
}

// =============================================================================
// CLUSTER D: RULE-SET LISTS
// =============================================================================

/// Kind of a plain-text list inside a rule-set.
///
/// Only `Triggers` lists feed the trigger engine. The other kinds belong to
/// the URL rule engine but share the category id namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// One trigger phrase per line.
    Triggers,
    /// Blocked domains or URLs.
    Blacklist,
    /// Allowed domains or URLs.
    Whitelist,
    /// Blacklist that can be flipped into a whitelist on demand.
    Bypass,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ListKind::Triggers => "triggers",
            ListKind::Blacklist => "blacklist",
            ListKind::Whitelist => "whitelist",
            ListKind::Bypass => "bypass",
        };
        f.write_str(name)
    }
}

/// Unrecognised list kind name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown list kind: {0}")]
pub struct UnknownListKind(pub String);

impl FromStr for ListKind {
    type Err = UnknownListKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "triggers" | "trigger" | "texttrigger" => Ok(ListKind::Triggers),
            "blacklist" => Ok(ListKind::Blacklist),
            "whitelist" => Ok(ListKind::Whitelist),
            "bypass" | "bypasslist" => Ok(ListKind::Bypass),
            other => Err(UnknownListKind(other.to_string())),
        }
    }
}
