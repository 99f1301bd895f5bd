//! URL handling module
//!
//! Normalization and same-site scoping for crawl URLs. Unlike a
//! general-purpose canonicalizer, normalization here is deliberately minimal:
//! only the fragment is stripped, because query strings frequently carry the
//! actual document reference (`?file=report.pdf`) and must survive intact.

mod normalize;
mod scope;

pub use normalize::{ensure_scheme, normalize};
pub use scope::same_site;
