//! Inbound Ports (Driving Ports)
//!
//! The API the request-inspection path uses to ask whether text contains an
//! enabled trigger.

use shared_types::{CategoryId, TriggerMatch};

use crate::error::FilterError;

/// Trigger matching API (Driving Port)
pub trait TriggerMatcher: Send + Sync {
    /// Case-fold `text` and look it up as one whole phrase.
    ///
    /// Returns the first stored category that is enabled and for which
    /// `category_applies` holds.
    fn is_exact_trigger(
        &self,
        text: &str,
        category_applies: &dyn Fn(CategoryId) -> bool,
    ) -> Result<Option<CategoryId>, FilterError>;

    /// Scan `text` for the first enabled, applicable trigger.
    ///
    /// With `allow_fragment_rebuild`, phrases of up to `max_fragment_len`
    /// words split by discarded markup are reassembled and matched.
    fn contains_trigger(
        &self,
        text: &str,
        category_applies: &dyn Fn(CategoryId) -> bool,
        allow_fragment_rebuild: bool,
        max_fragment_len: usize,
    ) -> Result<Option<TriggerMatch>, FilterError>;

    fn set_category_enabled(&self, id: CategoryId, enabled: bool) -> Result<(), FilterError>;

    fn is_category_enabled(&self, id: CategoryId) -> bool;

    fn set_all_categories(&self, enabled: bool);
}
