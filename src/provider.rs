//! Collaborator interfaces the resolver is built against.
//!
//! The resolver never reflects over a concrete metadata system or reads documentation files.
//! A host environment supplies both through these traits; [`crate::catalog::Catalog`] is an
//! in-memory implementation of each.

use std::sync::Arc;

use crate::{
    fragment::Fragment,
    identity::{DocKey, TypeToken},
};

/// Raw, unresolved documentation per identity. One index per compilation unit.
pub trait DocumentIndex: Send + Sync {
    /// The fragment declared directly on `key`, with no inheritance or reference resolution
    /// applied. `None` when the declaration is undocumented.
    fn fragment(&self, key: &DocKey) -> Option<Arc<Fragment>>;
}

/// The loaded metadata universe: type hierarchy, declared members and name lookup.
pub trait MetadataUniverse: Send + Sync {
    fn base_type(&self, ty: &TypeToken) -> Option<TypeToken>;

    /// Every interface `ty` implements, directly, through interfaces it extends or through its
    /// base types. Deduplicated, in the order the metadata system reports them.
    fn interfaces(&self, ty: &TypeToken) -> Vec<TypeToken>;

    /// Members declared directly on `ty`.
    fn members(&self, ty: &TypeToken) -> Vec<DocKey>;

    /// Best-effort lookup of a cross-reference target string. `None` for unknown or external
    /// symbols.
    fn resolve_by_name(&self, identifier: &str) -> Option<DocKey>;

    /// The member of `ty` with the same name and kind as `member`, if `ty` declares one.
    fn declares(&self, ty: &TypeToken, member: &DocKey) -> Option<DocKey> {
        self.members(ty)
            .into_iter()
            .find(|candidate| candidate.same_signature(member))
    }
}
