use parking_lot::RwLock;
use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::{
    config::ResolverConfig,
    error::DocweaveError,
    identity::DocKey,
    provider::{DocumentIndex, MetadataUniverse},
};

use super::{
    engine::{resolve_parent, resolve_references, ResolutionStack},
    ResolvedContent,
};

/// Session-scoped memo of [ResolvedContent] per [DocKey].
///
/// Entries are computed on first demand and never evicted or invalidated: the document index
/// and metadata universe are treated as immutable for the cache's lifetime.
///
/// The map is the only shared mutable state. No lock is held while the collaborators are
/// queried or while resolution recurses, so two threads racing on a never-seen key may both
/// compute it; the first insert wins and both receive the same `Arc`.
pub struct DocCache {
    index: Arc<dyn DocumentIndex>,
    universe: Arc<dyn MetadataUniverse>,
    config: ResolverConfig,
    entries: RwLock<BTreeMap<DocKey, Arc<ResolvedContent>>>,
}

impl fmt::Debug for DocCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocCache")
            .field("config", &self.config)
            .field("entries", &self.len())
            .finish()
    }
}

impl DocCache {
    pub fn new(index: Arc<dyn DocumentIndex>, universe: Arc<dyn MetadataUniverse>) -> DocCache {
        DocCache::with_config(index, universe, ResolverConfig::default())
    }

    pub fn with_config(
        index: Arc<dyn DocumentIndex>,
        universe: Arc<dyn MetadataUniverse>,
        config: ResolverConfig,
    ) -> DocCache {
        DocCache {
            index,
            universe,
            config,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn universe(&self) -> &dyn MetadataUniverse {
        self.universe.as_ref()
    }

    pub fn index(&self) -> &dyn DocumentIndex {
        self.index.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn contains(&self, key: &DocKey) -> bool {
        self.entries.read().contains_key(key)
    }

    /// The cached content for `key`, without computing it.
    pub fn get(&self, key: &DocKey) -> Option<Arc<ResolvedContent>> {
        self.entries.read().get(key).cloned()
    }

    /// Resolve `key`, computing and caching it on first demand.
    ///
    /// Fails with [DocweaveError::CircularReference] or
    /// [DocweaveError::ResolutionDepthExceeded] on malformed input. A failed call stores nothing
    /// for the identities on its failing path.
    ///
    /// The outcome does not depend on what is already cached: a cached entry counts against the
    /// depth bound with the height its own computation reached, so a query that exceeds the
    /// bound keeps failing no matter which other identities were resolved first.
    pub fn resolve(&self, key: &DocKey) -> Result<Arc<ResolvedContent>, DocweaveError> {
        let mut stack = ResolutionStack::new(self.config.max_depth);
        self.resolve_in(key, &mut stack).inspect_err(|e| {
            tracing::warn!("[DocCache::resolve] failed to resolve {key}: {e}");
        })
    }

    /// Look `identifier` up in the metadata universe and resolve it. `Ok(None)` when the name
    /// is unknown.
    pub fn resolve_name(
        &self,
        identifier: &str,
    ) -> Result<Option<Arc<ResolvedContent>>, DocweaveError> {
        match self.universe.resolve_by_name(identifier) {
            Some(key) => self.resolve(&key).map(Some),
            None => {
                tracing::debug!("[DocCache::resolve_name] no declaration named '{identifier}'");
                Ok(None)
            }
        }
    }

    pub(crate) fn resolve_in(
        &self,
        key: &DocKey,
        stack: &mut ResolutionStack,
    ) -> Result<Arc<ResolvedContent>, DocweaveError> {
        let cached = self.entries.read().get(key).cloned();
        if let Some(content) = cached {
            tracing::trace!("[DocCache] hit for {key}");
            stack.reuse(key, content.height)?;
            return Ok(content);
        }

        let base = stack.depth();
        stack.enter(key)?;
        let outer = stack.start_measure();
        let computed = self.compute(key, stack);
        let reached = stack.finish_measure(outer);
        stack.leave();
        let mut content = computed?;
        // Skipped undocumented candidates count too, so measure rather than trust `new`
        content.height = reached - base;

        let mut writer = self.entries.write();
        let stored = writer
            .entry(key.clone())
            .or_insert_with(|| Arc::new(content))
            .clone();
        Ok(stored)
    }

    fn compute(
        &self,
        key: &DocKey,
        stack: &mut ResolutionStack,
    ) -> Result<ResolvedContent, DocweaveError> {
        let fragment = self.index.fragment(key);
        tracing::debug!(
            "[DocCache] miss for {key} (documented: {}, depth: {})",
            fragment.is_some(),
            stack.depth()
        );
        let parent = resolve_parent(fragment.as_deref(), key, self, stack)?;
        let references = resolve_references(fragment.as_deref(), self, stack)?;
        Ok(ResolvedContent::new(key.clone(), fragment, parent, references))
    }
}
