//! Response body classification
//!
//! The request-inspection path hands over a response body and its content
//! type; a match becomes a [`BlockVerdict`] for the block-notification
//! collaborator.

use std::sync::Arc;

use shared_types::CategoryId;
use tf_01_text_triggers::{FilterError, TriggerMatcher};

use crate::runtime::FilterRuntime;

/// Content types whose bodies are scanned for triggers.
const SCANNED_CONTENT_TYPES: [&str; 2] = ["html", "json"];

/// Why a response should be blocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockVerdict {
    pub category_id: CategoryId,
    /// `None` when the category has no recorded name.
    pub category_name: Option<String>,
    /// The phrase as it matched, possibly rebuilt from fragments.
    pub trigger: String,
}

pub struct ContentClassifier {
    runtime: Arc<FilterRuntime>,
}

impl ContentClassifier {
    pub fn new(runtime: Arc<FilterRuntime>) -> Self {
        Self { runtime }
    }

    /// Whether bodies of `content_type` are inspected at all.
    pub fn inspects(content_type: &str) -> bool {
        let content_type = content_type.to_ascii_lowercase();
        SCANNED_CONTENT_TYPES
            .iter()
            .any(|kind| content_type.contains(kind))
    }

    /// Scan `body` for an enabled trigger whose category `category_applies`
    /// accepts.
    ///
    /// Invalid UTF-8 is replaced rather than rejected. Fragment rebuild is
    /// on whenever the configured phrase length exceeds one word.
    pub fn classify(
        &self,
        body: &[u8],
        content_type: &str,
        category_applies: &dyn Fn(CategoryId) -> bool,
    ) -> Result<Option<BlockVerdict>, FilterError> {
        if !Self::inspects(content_type) {
            return Ok(None);
        }

        let engine = self.runtime.engine();
        let config = engine.config();
        let text = String::from_utf8_lossy(body);

        let found = engine.contains_trigger(
            &text,
            category_applies,
            config.allows_fragment_rebuild(),
            config.max_fragment_len,
        )?;

        Ok(found.map(|m| BlockVerdict {
            category_id: m.category,
            category_name: engine.category_label(m.category),
            trigger: m.matched_text,
        }))
    }
}
