//! # Fragment Codecs
//!
//! The resolver consumes already-parsed [`Fragment`] trees. Codecs are the adapters that produce
//! them from the text a host stores its documentation in. They sit outside the resolution core:
//! [`crate::resolve`] never calls a codec, only [`crate::catalog::Catalog`] does while loading.
//!
//! ## Built-in codecs
//!
//! - [`md::MdCodec`]: Markdown doc text, with `<inheritdoc/>` and `<see cref="..."/>` embedded as
//!   HTML, or `[text](cref:TARGET)` links.
//!
//! Hosts with another doc format implement [`FragmentCodec`] and hand it to
//! [`Catalog::with_codec`](crate::catalog::Catalog::with_codec).

use std::result::Result;

use crate::{error::DocweaveError, fragment::Fragment};

pub mod md;

pub use md::MdCodec;

pub trait FragmentCodec: Send + Sync {
    fn decode(&self, content: &str) -> Result<Fragment, DocweaveError>;
}
