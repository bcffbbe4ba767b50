//! The parsed documentation fragment handed to the resolver by a
//! [`DocumentIndex`](crate::provider::DocumentIndex).
//!
//! A [`Fragment`] is a small read-only tree: a root tag plus inline children. Two kinds of child
//! carry meaning for resolution:
//!
//! - [`FragmentNode::Inherit`]: "use the documentation of the nearest overridden or implemented
//!   declaration". Only honored when it is the fragment's entire content.
//! - [`FragmentNode::Reference`]: a cross-reference to another declaration by target string.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Root tag used for fragments that come straight from a member's doc comment.
pub const MEMBER_TAG: &str = "member";

/// Element tags that start a new block of text. Anything else is inline.
pub const BLOCK_TAGS: &[&str] = &[
    "para", "h1", "h2", "h3", "h4", "h5", "h6", "quote", "pre", "list", "item", "table", "row",
    "cell",
];

pub fn is_block_tag(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FragmentNode {
    Text(String),
    Element {
        tag: String,
        children: Vec<FragmentNode>,
    },
    Reference {
        target: String,
        children: Vec<FragmentNode>,
    },
    Inherit,
}

impl FragmentNode {
    pub fn text<S: Into<String>>(text: S) -> FragmentNode {
        FragmentNode::Text(text.into())
    }

    pub fn element<S: Into<String>>(tag: S, children: Vec<FragmentNode>) -> FragmentNode {
        FragmentNode::Element {
            tag: tag.into(),
            children,
        }
    }

    pub fn reference<S: Into<String>>(target: S) -> FragmentNode {
        FragmentNode::Reference {
            target: target.into(),
            children: Vec::new(),
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            FragmentNode::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    fn collect_targets<'a>(&'a self, seen: &mut HashSet<&'a str>, out: &mut Vec<&'a str>) {
        match self {
            FragmentNode::Reference { target, children } => {
                if seen.insert(target.as_str()) {
                    out.push(target.as_str());
                }
                for child in children {
                    child.collect_targets(seen, out);
                }
            }
            FragmentNode::Element { children, .. } => {
                for child in children {
                    child.collect_targets(seen, out);
                }
            }
            FragmentNode::Text(_) | FragmentNode::Inherit => {}
        }
    }

    fn write_text(&self, out: &mut String) {
        match self {
            FragmentNode::Text(text) => out.push_str(text),
            FragmentNode::Element { tag, children } => {
                for child in children {
                    child.write_text(out);
                }
                if is_block_tag(tag) {
                    out.push(' ');
                }
            }
            FragmentNode::Reference { target, children } => {
                if children.is_empty() {
                    out.push_str(target);
                } else {
                    for child in children {
                        child.write_text(out);
                    }
                }
            }
            FragmentNode::Inherit => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub tag: String,
    pub children: Vec<FragmentNode>,
}

impl Fragment {
    pub fn new<S: Into<String>>(tag: S, children: Vec<FragmentNode>) -> Fragment {
        Fragment {
            tag: tag.into(),
            children,
        }
    }

    /// A fragment whose whole content is an inherit-marker.
    pub fn inherit() -> Fragment {
        Fragment::new(MEMBER_TAG, vec![FragmentNode::Inherit])
    }

    pub fn is_empty(&self) -> bool {
        self.children.iter().all(FragmentNode::is_blank)
    }

    /// True iff the only non-whitespace child is an inherit-marker. An inherit-marker with
    /// sibling prose does not count.
    pub fn is_inherit_only(&self) -> bool {
        let mut content = self.children.iter().filter(|child| !child.is_blank());
        matches!(
            (content.next(), content.next()),
            (Some(FragmentNode::Inherit), None)
        )
    }

    /// Cross-reference targets in document order, nested markup flattened, duplicates dropped
    /// after their first occurrence.
    pub fn reference_targets(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for child in &self.children {
            child.collect_targets(&mut seen, &mut out);
        }
        out
    }

    /// Flattened, whitespace-collapsed text content.
    pub fn plain_text(&self) -> String {
        let mut raw = String::new();
        for child in &self.children {
            child.write_text(&mut raw);
        }
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(children: Vec<FragmentNode>) -> FragmentNode {
        FragmentNode::element("para", children)
    }

    #[test]
    fn test_inherit_only() {
        assert!(Fragment::inherit().is_inherit_only());

        let padded = Fragment::new(
            MEMBER_TAG,
            vec![
                FragmentNode::text("\n  "),
                FragmentNode::Inherit,
                FragmentNode::text("\n"),
            ],
        );
        assert!(padded.is_inherit_only());
    }

    #[test]
    fn test_inherit_with_prose_is_not_inherit_only() {
        let mixed = Fragment::new(
            MEMBER_TAG,
            vec![FragmentNode::Inherit, FragmentNode::text("Also draws a border.")],
        );
        assert!(!mixed.is_inherit_only());

        let nested = Fragment::new(MEMBER_TAG, vec![para(vec![FragmentNode::Inherit])]);
        assert!(!nested.is_inherit_only());

        assert!(!Fragment::new(MEMBER_TAG, vec![]).is_inherit_only());
    }

    #[test]
    fn test_reference_targets_flatten_and_dedup() {
        let fragment = Fragment::new(
            MEMBER_TAG,
            vec![
                FragmentNode::reference("X"),
                para(vec![
                    FragmentNode::text("see "),
                    FragmentNode::reference("Y"),
                    FragmentNode::element("em", vec![FragmentNode::reference("X")]),
                ]),
                FragmentNode::reference("Z"),
            ],
        );
        assert_eq!(fragment.reference_targets(), vec!["X", "Y", "Z"]);
    }

    #[test]
    fn test_plain_text() {
        let fragment = Fragment::new(
            MEMBER_TAG,
            vec![
                para(vec![
                    FragmentNode::text("Computes the   area of a "),
                    FragmentNode::reference("T:Acme.Shape"),
                    FragmentNode::text("."),
                ]),
                para(vec![FragmentNode::Reference {
                    target: "T:Acme.Circle".to_string(),
                    children: vec![FragmentNode::text("circles")],
                }]),
            ],
        );
        assert_eq!(
            fragment.plain_text(),
            "Computes the area of a T:Acme.Shape. circles"
        );
        assert!(!fragment.is_empty());
        assert!(Fragment::new(MEMBER_TAG, vec![FragmentNode::text("  ")]).is_empty());
    }

    #[test]
    fn test_inline_elements_keep_punctuation_attached() {
        let fragment = Fragment::new(
            MEMBER_TAG,
            vec![
                para(vec![
                    FragmentNode::text("Like "),
                    FragmentNode::element("em", vec![FragmentNode::text("this")]),
                    FragmentNode::text(", and "),
                    FragmentNode::element("code", vec![FragmentNode::text("that")]),
                    FragmentNode::text("."),
                ]),
                FragmentNode::element("h2", vec![FragmentNode::text("Remarks")]),
                para(vec![FragmentNode::text("More.")]),
            ],
        );
        assert_eq!(fragment.plain_text(), "Like this, and that. Remarks More.");
    }
}
