use std::sync::Arc;

use crate::{fragment::Fragment, identity::DocKey};

/// The fully resolved documentation of one identity.
///
/// Built once per identity by [`super::DocCache`] and shared read-only afterwards. Equality is
/// structural: two contents are equal when their fragments, parents and references are.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContent {
    pub key: DocKey,
    /// The fragment declared on `key`, if any.
    pub fragment: Option<Arc<Fragment>>,
    /// Only set when `fragment` is purely an inherit-marker and a documented parent declaration
    /// exists.
    pub parent: Option<Arc<ResolvedContent>>,
    /// One entry per distinct resolvable cross-reference in `fragment`, first occurrence first.
    pub references: Vec<Arc<ResolvedContent>>,
    /// Longest chain of identities, this one included, that computing this content walks
    /// through.
    pub height: usize,
}

impl ResolvedContent {
    pub fn new(
        key: DocKey,
        fragment: Option<Arc<Fragment>>,
        parent: Option<Arc<ResolvedContent>>,
        references: Vec<Arc<ResolvedContent>>,
    ) -> ResolvedContent {
        let below = parent
            .iter()
            .chain(references.iter())
            .map(|content| content.height)
            .max()
            .unwrap_or(0);
        ResolvedContent {
            key,
            fragment,
            parent,
            references,
            height: below + 1,
        }
    }

    pub fn has_documentation(&self) -> bool {
        self.fragment.is_some()
    }

    /// This content followed by each parent in turn, nearest first.
    pub fn inheritance_chain(&self) -> Vec<&ResolvedContent> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(parent) = current.parent.as_deref() {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// The fragment a renderer should show: the first one along the inheritance chain that is
    /// not purely an inherit-marker. Falls back to the last fragment in the chain when every
    /// link only inherits.
    pub fn effective_fragment(&self) -> Option<&Arc<Fragment>> {
        let chain = self.inheritance_chain();
        chain
            .iter()
            .copied()
            .filter_map(|content| content.fragment.as_ref())
            .find(|fragment| !fragment.is_inherit_only())
            .or_else(|| chain.iter().copied().rev().find_map(|content| content.fragment.as_ref()))
    }

    /// Plain text of [`Self::effective_fragment`], empty when undocumented.
    pub fn plain_text(&self) -> String {
        self.effective_fragment()
            .map(|fragment| fragment.plain_text())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{FragmentNode, MEMBER_TAG};
    use crate::identity::MemberKind;

    fn prose(text: &str) -> Arc<Fragment> {
        Arc::new(Fragment::new(MEMBER_TAG, vec![FragmentNode::text(text)]))
    }

    #[test]
    fn test_effective_fragment_follows_parents() {
        let a = Arc::new(ResolvedContent::new(
            DocKey::member("A", "m", MemberKind::Method),
            Some(prose("Does the thing.")),
            None,
            vec![],
        ));
        let b = Arc::new(ResolvedContent::new(
            DocKey::member("B", "m", MemberKind::Method),
            Some(Arc::new(Fragment::inherit())),
            Some(a.clone()),
            vec![],
        ));
        let c = ResolvedContent::new(
            DocKey::member("C", "m", MemberKind::Method),
            Some(Arc::new(Fragment::inherit())),
            Some(b),
            vec![],
        );

        assert_eq!(c.inheritance_chain().len(), 3);
        assert_eq!(c.height, 3);
        assert_eq!(c.effective_fragment(), a.fragment.as_ref());
        assert_eq!(c.plain_text(), "Does the thing.");
    }

    #[test]
    fn test_undocumented_content() {
        let content = ResolvedContent::new(DocKey::of_type("A"), None, None, vec![]);
        assert!(!content.has_documentation());
        assert!(content.effective_fragment().is_none());
        assert_eq!(content.plain_text(), "");
    }

    #[test]
    fn test_unresolved_inherit_falls_back_to_marker() {
        let content = ResolvedContent::new(
            DocKey::of_type("A"),
            Some(Arc::new(Fragment::inherit())),
            None,
            vec![],
        );
        assert!(content
            .effective_fragment()
            .map(|f| f.is_inherit_only())
            .unwrap_or(false));
    }
}
