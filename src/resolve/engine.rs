//! Inheritance and cross-reference walks.
//!
//! Nothing here holds state. Every recursive step goes back through [`DocCache::resolve_in`] so
//! results are memoized and guarded by the caller's [`ResolutionStack`].

use std::{collections::HashSet, sync::Arc};

use crate::{
    error::DocweaveError,
    fragment::Fragment,
    identity::DocKey,
    provider::MetadataUniverse,
};

use super::{DocCache, ResolvedContent};

/// Identities currently being computed by one top-level resolution, outermost first.
///
/// Also tracks the deepest stack reached, counting cached entries at the depth their own
/// computation reached, so a resolution fails or succeeds the same way whatever is cached.
#[derive(Debug, Clone)]
pub struct ResolutionStack {
    keys: Vec<DocKey>,
    max_depth: usize,
    peak: usize,
}

impl ResolutionStack {
    pub fn new(max_depth: usize) -> ResolutionStack {
        ResolutionStack {
            keys: Vec::new(),
            max_depth,
            peak: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.keys.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn contains(&self, key: &DocKey) -> bool {
        self.keys.contains(key)
    }

    /// Push `key`, failing when it is already in flight or the depth bound is reached. Nothing is
    /// pushed on failure.
    pub fn enter(&mut self, key: &DocKey) -> Result<(), DocweaveError> {
        if self.contains(key) {
            let mut chain = self.keys.clone();
            chain.push(key.clone());
            return Err(DocweaveError::CircularReference {
                key: key.clone(),
                chain,
            });
        }
        if self.keys.len() >= self.max_depth {
            return Err(DocweaveError::ResolutionDepthExceeded {
                key: key.clone(),
                depth: self.max_depth,
            });
        }
        self.keys.push(key.clone());
        self.peak = self.peak.max(self.keys.len());
        Ok(())
    }

    pub fn leave(&mut self) {
        self.keys.pop();
    }

    /// Account for reusing a cached entry of the given `height` at the current depth. Fails
    /// exactly when computing that entry here would have.
    pub fn reuse(&mut self, key: &DocKey, height: usize) -> Result<(), DocweaveError> {
        let reached = self.keys.len() + height;
        if reached > self.max_depth {
            return Err(DocweaveError::ResolutionDepthExceeded {
                key: key.clone(),
                depth: self.max_depth,
            });
        }
        self.peak = self.peak.max(reached);
        Ok(())
    }

    /// Restart peak tracking at the current depth. Returns the previous peak for
    /// [Self::finish_measure].
    pub(crate) fn start_measure(&mut self) -> usize {
        std::mem::replace(&mut self.peak, self.keys.len())
    }

    /// Deepest level reached since [Self::start_measure], then fold it back into `outer`.
    pub(crate) fn finish_measure(&mut self, outer: usize) -> usize {
        let reached = self.peak;
        self.peak = outer.max(reached);
        reached
    }
}

/// Declarations `key` may inherit documentation from, in tie-break order.
///
/// Types: the direct base type only. Members: the matching member of every interface of the
/// declaring type in reported order, then the matching member of each base type, nearest first.
/// Base types that don't declare the member are skipped, not treated as the end of the search.
pub fn parent_candidates(
    key: &DocKey,
    universe: &dyn MetadataUniverse,
    max_depth: usize,
) -> Vec<DocKey> {
    let (ty, member) = match key {
        DocKey::Type { ty } => {
            return universe
                .base_type(ty)
                .map(DocKey::of_type)
                .into_iter()
                .collect();
        }
        DocKey::Member { ty, .. } => (ty, key),
    };

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for interface in universe.interfaces(ty) {
        if let Some(declared) = universe.declares(&interface, member) {
            if seen.insert(declared.clone()) {
                candidates.push(declared);
            }
        }
    }

    let mut visited_types = HashSet::from([ty.clone()]);
    let mut current = universe.base_type(ty);
    while let Some(base) = current {
        if !visited_types.insert(base.clone()) {
            tracing::warn!("[parent_candidates] base type cycle at {base} while walking {key}");
            break;
        }
        if visited_types.len() > max_depth {
            tracing::warn!("[parent_candidates] base chain of {key} exceeds {max_depth} types");
            break;
        }
        if let Some(declared) = universe.declares(&base, member) {
            if seen.insert(declared.clone()) {
                candidates.push(declared);
            }
        }
        current = universe.base_type(&base);
    }
    candidates
}

/// The documented declaration an inherit-only `fragment` stands for, if any.
///
/// The first candidate from [parent_candidates] whose own fragment exists wins; there is no
/// merging. A parent that is itself inherit-only carries its own parent, so chains of any depth
/// are followed.
pub fn resolve_parent(
    fragment: Option<&Fragment>,
    key: &DocKey,
    cache: &DocCache,
    stack: &mut ResolutionStack,
) -> Result<Option<Arc<ResolvedContent>>, DocweaveError> {
    let Some(fragment) = fragment else {
        return Ok(None);
    };
    if !fragment.is_inherit_only() {
        return Ok(None);
    }

    for candidate in parent_candidates(key, cache.universe(), stack.max_depth()) {
        let content = cache.resolve_in(&candidate, stack)?;
        if content.has_documentation() {
            tracing::debug!("[resolve_parent] {key} inherits from {candidate}");
            return Ok(Some(content));
        }
    }
    tracing::debug!("[resolve_parent] {key} is inherit-only but no documented parent exists");
    Ok(None)
}

/// Resolve each distinct cross-reference target of `fragment`, in first-occurrence order.
///
/// Targets the metadata universe can't name are dropped. Distinct spellings of the same
/// identity (`T:Acme.Shape` and `Shape`) produce one entry.
pub fn resolve_references(
    fragment: Option<&Fragment>,
    cache: &DocCache,
    stack: &mut ResolutionStack,
) -> Result<Vec<Arc<ResolvedContent>>, DocweaveError> {
    let Some(fragment) = fragment else {
        return Ok(Vec::new());
    };

    let mut seen = HashSet::new();
    let mut references = Vec::new();
    for target in fragment.reference_targets() {
        let Some(key) = cache.universe().resolve_by_name(target) else {
            tracing::debug!("[resolve_references] dropping unresolvable reference '{target}'");
            continue;
        };
        if !seen.insert(key.clone()) {
            continue;
        }
        references.push(cache.resolve_in(&key, stack)?);
    }
    Ok(references)
}
