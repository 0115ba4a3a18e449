//! Feed retrieval and rendering.
//!
//! - [`parser`] turns RSS/Atom bytes into [`Entry`] values using `feed-rs`
//! - [`fetcher`] defines the [`FeedSource`] seam and its HTTP implementation
//! - [`render`] writes entries into the document's feed container
//!
//! # Example
//!
//! ```ignore
//! use feedreader::feed::{build_client, FeedSource, HttpFeedSource};
//!
//! let client = build_client(Duration::from_secs(30))?;
//! let source = HttpFeedSource::new(client, Duration::from_secs(30));
//! let entries = source.fetch(&descriptor).await?;
//! ```

mod fetcher;
mod parser;
mod render;

pub use fetcher::{build_client, FeedSource, FetchError, HttpFeedSource};
pub use parser::{parse_feed, Entry};
pub use render::render_entries;
