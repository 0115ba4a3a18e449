//! Utility functions shared by the registry, the fetcher and the renderer.
//!
//! - **URL validation**: scheme checks for registry entries and a host policy
//!   that keeps the HTTP source away from localhost and private networks
//! - **Text processing**: markup stripping and width-aware truncation used to
//!   build entry snippets

mod text;
mod url_validator;

pub use text::{make_snippet, strip_markup, truncate_to_width, SNIPPET_WIDTH};
pub use url_validator::{ensure_public_host, parse_feed_url, UrlValidationError};
