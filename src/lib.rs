//! # docweave-core
//!
//! A Rust library for resolving structured documentation comments attached to program metadata
//! (types, properties, fields, methods) into inheritance-aware, cross-referenced documentation
//! trees.
//!
//! ## Overview
//!
//! Documentation comments rarely stand alone. An overriding method says "see my base class"
//! (`<inheritdoc/>`), a summary points at related types (`<see cref="T:Acme.Shape"/>`).
//! docweave-core takes the raw per-declaration fragments a host has already parsed and answers,
//! for any type or member:
//!
//! - which fragment actually applies, following inherit-markers through interfaces and base
//!   types,
//! - which declarations it cross-references, each resolved the same way,
//!
//! and memoizes the answer per declaration so repeated queries are cheap.
//!
//! ## Architecture
//!
//! - **[`identity`]**: `DocKey`, the cache key for a type or member, and cref target parsing
//! - **[`fragment`]**: the read-only parsed documentation tree
//! - **[`provider`]**: `DocumentIndex` and `MetadataUniverse`, the collaborator traits a host
//!   implements
//! - **[`resolve`]**: `DocCache`, `ResolvedContent` and the inheritance/reference walks
//! - **[`catalog`]**: an in-memory, TOML-loadable implementation of both collaborator traits
//! - **[`codec`]**: Markdown doc text to `Fragment` decoding
//! - **[`config`]**: resolver settings
//!
//! ## Quick Start
//!
//! ```rust
//! use docweave_core::{catalog::Catalog, identity::{DocKey, MemberKind}};
//!
//! let catalog = Catalog::from_toml_str(r#"
//! [[types]]
//! name = "Acme.Shape"
//! doc = "Something with an area."
//!
//! [[types.members]]
//! name = "Area"
//! kind = "property"
//! doc = "The enclosed area, see <see cref=\"T:Acme.Shape\"/>."
//!
//! [[types]]
//! name = "Acme.Circle"
//! base = "Acme.Shape"
//!
//! [[types.members]]
//! name = "Area"
//! kind = "property"
//! doc = "<inheritdoc/>"
//! "#)?;
//!
//! let cache = catalog.into_cache();
//! let area = cache.resolve(&DocKey::member("Acme.Circle", "Area", MemberKind::Property))?;
//!
//! let parent = area.parent.as_ref().expect("inherits from Acme.Shape.Area");
//! assert_eq!(parent.key, DocKey::member("Acme.Shape", "Area", MemberKind::Property));
//! assert_eq!(parent.references[0].key, DocKey::of_type("Acme.Shape"));
//! assert_eq!(area.plain_text(), "The enclosed area, see T:Acme.Shape.");
//! # Ok::<(), docweave_core::DocweaveError>(())
//! ```
//!
//! ## Errors
//!
//! Missing documentation, missing base types and unknown cross-reference targets are not errors;
//! they show up as `None` or as omitted references. Only malformed input fails a resolution:
//! [`DocweaveError::CircularReference`] and [`DocweaveError::ResolutionDepthExceeded`]. A failed
//! resolution never leaves a partial entry in the cache.

pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod fragment;
pub mod identity;
pub mod provider;
pub mod resolve;
#[cfg(test)]
mod tests;

pub use error::*;
