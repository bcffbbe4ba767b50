//! # Documentation Resolution
//!
//! Turns the raw per-identity fragments of a [`DocumentIndex`](crate::provider::DocumentIndex)
//! into [`ResolvedContent`]:
//!
//! 1. **Inheritance**: a fragment that is purely an inherit-marker takes its documentation from
//!    the first documented candidate declaration. For a type that is its base type; for a member,
//!    the same-named member of each implemented interface, then of each base type.
//! 2. **References**: every distinct cross-reference target is looked up by name and resolved in
//!    turn. Unknown targets are dropped.
//! 3. **Memoization**: [`DocCache`] stores each result once per identity for the session.
//!
//! Malformed input (a type that is its own ancestor, a fragment that references itself) is
//! reported as [`DocweaveError::CircularReference`](crate::DocweaveError::CircularReference);
//! pathologically deep chains as
//! [`DocweaveError::ResolutionDepthExceeded`](crate::DocweaveError::ResolutionDepthExceeded).
//!
//! ```rust
//! use std::sync::Arc;
//! use docweave_core::{catalog::{Catalog, MemberEntry, TypeEntry}, identity::{DocKey, MemberKind}, resolve::DocCache};
//!
//! let mut catalog = Catalog::default();
//! catalog.add_type(TypeEntry::new("Acme.Shape").member(MemberEntry::new("Area", MemberKind::Property).doc("The area.")))?;
//! catalog.add_type(TypeEntry::new("Acme.Circle").base("Acme.Shape").member(MemberEntry::new("Area", MemberKind::Property).doc("<inheritdoc/>")))?;
//!
//! let catalog = Arc::new(catalog);
//! let cache = DocCache::new(catalog.clone(), catalog);
//! let area = cache.resolve(&DocKey::member("Acme.Circle", "Area", MemberKind::Property))?;
//! assert_eq!(area.plain_text(), "The area.");
//! # Ok::<(), docweave_core::DocweaveError>(())
//! ```

mod cache;
mod content;
pub mod engine;

pub use cache::DocCache;
pub use content::ResolvedContent;
pub use engine::ResolutionStack;
