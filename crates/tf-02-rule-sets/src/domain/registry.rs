//! Category registry
//!
//! Maps list-derived category names to small integer ids. Ids start at 1
//! and are handed out in first-seen order; the registry is rebuilt from
//! scratch on every reload so ids are only stable within one rule-set.

use std::collections::HashMap;

use shared_types::{CategoryId, MAX_CATEGORIES};
use tracing::{debug, error};

use crate::error::RuleSetError;

/// Suffix of the whitelist twin every bypass list gets.
pub const BYPASS_WHITELIST_SUFFIX: &str = "_as_whitelist";

#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    /// Lowercased name -> id
    by_name: HashMap<String, CategoryId>,
    /// Display names, indexed by `id - 1`
    names: Vec<String>,
    /// Bypass category -> its whitelist twin
    bypass_twins: HashMap<CategoryId, CategoryId>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Id of `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<CategoryId> {
        self.by_name.get(&name.to_lowercase()).copied()
    }

    pub fn name(&self, id: CategoryId) -> Option<&str> {
        let idx = usize::from(id).checked_sub(1)?;
        self.names.get(idx).map(String::as_str)
    }

    /// Existing id for `name`, or the next free one.
    pub fn fetch_or_create(&mut self, name: &str) -> Result<CategoryId, RuleSetError> {
        if let Some(id) = self.get(name) {
            return Ok(id);
        }

        let next = self.names.len() + 1;
        if next >= MAX_CATEGORIES as usize {
            error!(category = name, "The maximum number of filtering categories has been exceeded");
            return Err(RuleSetError::CategoryCapacity {
                name: name.to_string(),
            });
        }

        let id = next as CategoryId;
        self.by_name.insert(name.to_lowercase(), id);
        self.names.push(name.to_string());
        debug!(category = name, id, "Created category");
        Ok(id)
    }

    /// Ids for a bypass list and its whitelist twin, creating both if needed.
    ///
    /// The twin is created first, so it gets the lower id.
    pub fn fetch_or_create_bypass(&mut self, name: &str) -> Result<(CategoryId, CategoryId), RuleSetError> {
        if let Some(id) = self.get(name) {
            if let Some(&twin) = self.bypass_twins.get(&id) {
                return Ok((id, twin));
            }
        }

        let twin = self.fetch_or_create(&format!("{name}{BYPASS_WHITELIST_SUFFIX}"))?;
        let id = self.fetch_or_create(name)?;
        self.bypass_twins.insert(id, twin);
        Ok((id, twin))
    }

    /// Whitelist twin of a bypass category.
    pub fn bypass_twin(&self, id: CategoryId) -> Option<CategoryId> {
        self.bypass_twins.get(&id).copied()
    }

    /// `(id, name)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (CategoryId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| ((i + 1) as CategoryId, name.as_str()))
    }
}
