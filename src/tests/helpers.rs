//! Shared test utilities for resolution testing

use parking_lot::Mutex;
use std::{collections::BTreeSet, sync::Arc};

use crate::{
    catalog::{Catalog, MemberEntry, TypeEntry},
    config::ResolverConfig,
    fragment::{Fragment, FragmentNode, MEMBER_TAG},
    identity::{DocKey, MemberKind},
    provider::DocumentIndex,
    resolve::DocCache,
};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

pub fn prose(text: &str) -> Fragment {
    Fragment::new(
        MEMBER_TAG,
        vec![FragmentNode::element("para", vec![FragmentNode::text(text)])],
    )
}

/// A fragment whose content is nothing but cross-references to `targets`, in order.
pub fn references_to(targets: &[&str]) -> Fragment {
    Fragment::new(
        MEMBER_TAG,
        targets.iter().map(|t| FragmentNode::reference(*t)).collect(),
    )
}

pub fn method(ty: &str, name: &str) -> DocKey {
    DocKey::member(ty, name, MemberKind::Method)
}

pub fn documented_method(name: &str, doc: &str) -> MemberEntry {
    MemberEntry::new(name, MemberKind::Method).doc(doc)
}

pub fn cache_for(catalog: Catalog) -> DocCache {
    init_logging();
    catalog.into_cache()
}

pub fn cache_with_depth(catalog: Catalog, max_depth: usize) -> DocCache {
    init_logging();
    let catalog = Arc::new(catalog);
    DocCache::with_config(
        catalog.clone(),
        catalog,
        ResolverConfig::with_max_depth(max_depth),
    )
}

/// Diamond-ish hierarchy used by the tie-break tests:
///
/// ```text
/// Acme.IFirst   Acme.ISecond   Acme.Base
///        \          |          /
///         +---- Acme.Widget --+
/// ```
///
/// Every ancestor documents `Draw`; `Acme.Widget.Draw` only inherits.
pub fn widget_catalog() -> Catalog {
    let mut catalog = Catalog::default();
    catalog
        .add_type(TypeEntry::new("Acme.IFirst").member(documented_method("Draw", "Draws, per IFirst.")))
        .unwrap();
    catalog
        .add_type(TypeEntry::new("Acme.ISecond").member(documented_method("Draw", "Draws, per ISecond.")))
        .unwrap();
    catalog
        .add_type(TypeEntry::new("Acme.Base").member(documented_method("Draw", "Draws, per Base.")))
        .unwrap();
    catalog
        .add_type(
            TypeEntry::new("Acme.Widget")
                .base("Acme.Base")
                .interface("Acme.IFirst")
                .interface("Acme.ISecond")
                .member(documented_method("Draw", "<inheritdoc/>")),
        )
        .unwrap();
    catalog
}

/// Document index that fails the test when asked for the same identity twice.
pub struct QueryOnceIndex {
    inner: Catalog,
    seen: Mutex<BTreeSet<DocKey>>,
}

impl QueryOnceIndex {
    pub fn new(inner: Catalog) -> QueryOnceIndex {
        QueryOnceIndex {
            inner,
            seen: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn queried(&self) -> usize {
        self.seen.lock().len()
    }
}

impl DocumentIndex for QueryOnceIndex {
    fn fragment(&self, key: &DocKey) -> Option<Arc<Fragment>> {
        if !self.seen.lock().insert(key.clone()) {
            panic!("document index queried twice for {key}");
        }
        self.inner.fragment(key)
    }
}
