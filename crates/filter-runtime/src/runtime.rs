//! # Filter Runtime
//!
//! Owns the live [`MatchEngine`] and the category registry of the rule-set
//! it was loaded from.
//!
//! ## Reload Sequence
//!
//! 1. Open the rule-set source (directory or zip)
//! 2. Load every list into a fresh store for the next generation number
//! 3. Finalize, build blooms, enable populated categories
//! 4. Swap the generation in; in-flight scans finish on the old one
//! 5. Publish the new registry and summary
//!
//! Reloads are serialized, so steps 4 and 5 always describe the same
//! generation. Any failure before step 4 leaves the active generation
//! serving. A replaced generation's store goes away with the last scan
//! holding it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use shared_types::CategoryId;
use thiserror::Error;
use tf_01_text_triggers::{
    EngineMetrics, FilterError, GenerationStats, MatchEngine, MetricsRecorder, MetricsSnapshot,
    StoreError, TriggerGeneration,
};
use tf_02_rule_sets::{load_rule_set, CategoryRegistry, LoadSummary, RuleSetError, RuleSetSource};
use tracing::{debug, info};

use crate::config::RuntimeConfig;
use crate::store::StoreBackend;

/// Errors that stop the runtime from loading or reloading.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    RuleSet(#[from] RuleSetError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("Trigger store error: {0}")]
    Store(#[from] StoreError),

    #[error("Background reload task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

struct LoadedState {
    registry: Arc<CategoryRegistry>,
    summary: LoadSummary,
}

/// The running trigger filter.
pub struct FilterRuntime {
    config: RuntimeConfig,
    engine: MatchEngine<StoreBackend>,
    metrics: Arc<EngineMetrics>,
    state: RwLock<LoadedState>,
    /// Held across build, install and publish of one reload.
    reload_lock: Mutex<()>,
    next_generation: AtomicU64,
}

impl FilterRuntime {
    /// Load the configured rule-set and start serving it.
    pub fn load(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        let metrics = Arc::new(EngineMetrics::new());
        let recorder: Arc<dyn MetricsRecorder> = metrics.clone();
        let (generation, registry, summary) = build_generation(&config, 0)?;
        let engine = MatchEngine::with_metrics(config.engine.clone(), generation, recorder)?;

        info!(
            source = %config.rules.source.display(),
            categories = registry.len(),
            triggers = summary.triggers_loaded,
            "Filter runtime ready"
        );

        Ok(Self {
            config,
            engine,
            metrics,
            state: RwLock::new(LoadedState {
                registry: Arc::new(registry),
                summary,
            }),
            reload_lock: Mutex::new(()),
            next_generation: AtomicU64::new(1),
        })
    }

    /// [`load`](Self::load) on the blocking thread pool.
    pub async fn load_async(config: RuntimeConfig) -> Result<Arc<Self>, RuntimeError> {
        let runtime = tokio::task::spawn_blocking(move || Self::load(config)).await??;
        Ok(Arc::new(runtime))
    }

    /// Rebuild from the rule-set source and swap the result in.
    ///
    /// On error the current generation keeps serving.
    pub fn reload(&self) -> Result<LoadSummary, RuntimeError> {
        let _reloading = self.reload_lock.lock();
        let number = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let mut loaded = None;

        let previous = self.engine.reload(|_| {
            let (generation, registry, summary) = build_generation(&self.config, number)?;
            loaded = Some((registry, summary));
            Ok::<_, RuntimeError>(generation)
        })?;

        let summary = match loaded {
            Some((registry, summary)) => {
                *self.state.write() = LoadedState {
                    registry: Arc::new(registry),
                    summary,
                };
                summary
            }
            None => LoadSummary::default(),
        };

        if Arc::strong_count(&previous) > 1 {
            debug!("Previous generation still in use; in-flight scans release it");
        }
        Ok(summary)
    }

    /// [`reload`](Self::reload) on the blocking thread pool, off the
    /// request path.
    pub async fn reload_async(self: &Arc<Self>) -> Result<LoadSummary, RuntimeError> {
        let runtime = Arc::clone(self);
        tokio::task::spawn_blocking(move || runtime.reload()).await?
    }

    pub fn engine(&self) -> &MatchEngine<StoreBackend> {
        &self.engine
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn registry(&self) -> Arc<CategoryRegistry> {
        Arc::clone(&self.state.read().registry)
    }

    /// Id of a category by list-derived name, case-insensitive.
    pub fn category_id(&self, name: &str) -> Option<CategoryId> {
        self.state.read().registry.get(name)
    }

    pub fn last_load(&self) -> LoadSummary {
        self.state.read().summary
    }

    pub fn stats(&self) -> GenerationStats {
        self.engine.generation().stats()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

fn build_generation(
    config: &RuntimeConfig,
    number: u64,
) -> Result<(TriggerGeneration<StoreBackend>, CategoryRegistry, LoadSummary), RuntimeError> {
    let mut source = RuleSetSource::open(&config.rules.source)?;
    let store = StoreBackend::create(&config.storage, number)?;
    let loaded = load_rule_set(&mut source, &config.rules.manifest(), store, &config.engine)?;
    debug!(generation = number, "Built trigger generation");
    Ok((loaded.generation, loaded.registry, loaded.summary))
}
