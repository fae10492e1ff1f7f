//! Rule-set loading
//!
//! Walks a manifest, assigns category ids and feeds every trigger list into
//! a fresh [`GenerationBuilder`]. The result is a finished generation that
//! the caller installs into its [`MatchEngine`](tf_01_text_triggers::MatchEngine).

use shared_types::ListKind;
use tf_01_text_triggers::{EngineConfig, GenerationBuilder, TriggerGeneration, TriggerStore};
use tracing::{debug, info, warn};

use crate::domain::{CategoryRegistry, ListEntry, ListManifest};
use crate::error::RuleSetError;
use crate::ports::ListSource;

/// Per-list outcome counts of one load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Trigger lists read and loaded
    pub lists_loaded: usize,
    /// Manifest entries with no file behind them
    pub lists_missing: usize,
    /// Lists of a kind this engine does not consume
    pub lists_skipped: usize,
    /// Lists dropped because the category limit was hit
    pub lists_rejected: usize,
    pub triggers_loaded: usize,
    pub lines_skipped: usize,
}

/// A finished generation together with the registry that named its categories.
pub struct LoadedRuleSet<S> {
    pub generation: TriggerGeneration<S>,
    pub registry: CategoryRegistry,
    pub summary: LoadSummary,
}

/// Load every list of `manifest` from `source` into `store`.
///
/// An empty manifest means "every `.txt` file is a trigger list". Missing
/// files and lists past the category limit are skipped; read and storage
/// failures abort the load.
pub fn load_rule_set<L, S>(
    source: &mut L,
    manifest: &ListManifest,
    store: S,
    config: &EngineConfig,
) -> Result<LoadedRuleSet<S>, RuleSetError>
where
    L: ListSource + ?Sized,
    S: TriggerStore,
{
    let discovered;
    let manifest = if manifest.is_empty() {
        let paths = source.list_paths()?;
        discovered = ListManifest::discover_triggers(paths.iter().map(String::as_str));
        debug!(lists = discovered.lists.len(), "Discovered trigger lists");
        &discovered
    } else {
        manifest
    };

    let mut registry = CategoryRegistry::new();
    let mut builder = GenerationBuilder::new(store, config);
    let mut summary = LoadSummary::default();

    for entry in &manifest.lists {
        load_entry(source, entry, &mut registry, &mut builder, &mut summary)?;
    }

    for (id, name) in registry.iter() {
        builder.label_category(id, name);
    }
    let generation = builder.finish()?;

    info!(
        lists = summary.lists_loaded,
        missing = summary.lists_missing,
        rejected = summary.lists_rejected,
        triggers = summary.triggers_loaded,
        skipped_lines = summary.lines_skipped,
        categories = registry.len(),
        "Rule-set loaded"
    );

    Ok(LoadedRuleSet {
        generation,
        registry,
        summary,
    })
}

fn load_entry<L, S>(
    source: &mut L,
    entry: &ListEntry,
    registry: &mut CategoryRegistry,
    builder: &mut GenerationBuilder<S>,
    summary: &mut LoadSummary,
) -> Result<(), RuleSetError>
where
    L: ListSource + ?Sized,
    S: TriggerStore,
{
    let name = entry.category_name();

    if entry.kind != ListKind::Triggers {
        let reserved = match entry.kind {
            ListKind::Bypass => registry.fetch_or_create_bypass(&name).map(|(id, _)| id),
            _ => registry.fetch_or_create(&name),
        };
        match reserved {
            Ok(id) => {
                debug!(list = %entry.path, kind = %entry.kind, id, "Reserved category for non-trigger list");
                summary.lists_skipped += 1;
            }
            Err(RuleSetError::CategoryCapacity { .. }) => summary.lists_rejected += 1,
            Err(e) => return Err(e),
        }
        return Ok(());
    }

    let Some(text) = source.read_list(&entry.path)? else {
        warn!(list = %entry.path, "Trigger list not found; skipping");
        summary.lists_missing += 1;
        return Ok(());
    };

    let id = match registry.fetch_or_create(&name) {
        Ok(id) => id,
        Err(RuleSetError::CategoryCapacity { .. }) => {
            summary.lists_rejected += 1;
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let report = builder.load_batch(id, text.lines())?;
    summary.lists_loaded += 1;
    summary.triggers_loaded += report.loaded;
    summary.lines_skipped += report.skipped;

    info!(
        list = %entry.path,
        category = %name,
        id,
        loaded = report.loaded,
        skipped = report.skipped,
        "Loaded trigger list"
    );
    Ok(())
}
