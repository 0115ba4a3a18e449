//! The ordered list of feeds the reader can show.
//!
//! A [`FeedRegistry`] is built once at startup from configuration and never
//! changes afterwards. Components receive it explicitly (usually behind an
//! `Arc`) instead of reaching for shared global state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::{parse_feed_url, UrlValidationError};

/// Errors raised while building a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No feeds were configured.
    #[error("Feed registry is empty: configure at least one feed")]
    Empty,

    /// A feed at the given position has a blank name.
    #[error("Feed #{0} has no name")]
    BlankName(usize),

    /// A feed at the given position has a blank url.
    #[error("Feed #{index} ({name}) has no url")]
    BlankUrl { index: usize, name: String },

    /// A feed url is not an absolute http(s) URL.
    #[error("Feed #{index} ({name}) has an invalid url: {source}")]
    InvalidUrl {
        index: usize,
        name: String,
        #[source]
        source: UrlValidationError,
    },
}

/// A named feed source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedDescriptor {
    pub name: String,
    pub url: String,
}

impl FeedDescriptor {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Ordered, non-empty, read-only list of [`FeedDescriptor`]s.
#[derive(Debug, Clone)]
pub struct FeedRegistry {
    feeds: Vec<FeedDescriptor>,
}

impl FeedRegistry {
    /// Validates and wraps a list of feeds.
    ///
    /// Names and urls are trimmed. Every name and url must be non-empty and
    /// every url must parse as an absolute `http`/`https` URL.
    pub fn new(feeds: Vec<FeedDescriptor>) -> Result<Self, RegistryError> {
        if feeds.is_empty() {
            return Err(RegistryError::Empty);
        }

        let feeds = feeds
            .into_iter()
            .enumerate()
            .map(|(index, feed)| {
                let name = feed.name.trim().to_string();
                let url = feed.url.trim().to_string();

                if name.is_empty() {
                    return Err(RegistryError::BlankName(index));
                }
                if url.is_empty() {
                    return Err(RegistryError::BlankUrl { index, name });
                }
                if let Err(source) = parse_feed_url(&url) {
                    return Err(RegistryError::InvalidUrl {
                        index,
                        name,
                        source,
                    });
                }

                Ok(FeedDescriptor { name, url })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(feeds = feeds.len(), "Feed registry built");
        Ok(Self { feeds })
    }

    pub fn get(&self, index: usize) -> Option<&FeedDescriptor> {
        self.feeds.get(index)
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    /// Always false for a constructed registry; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedDescriptor> {
        self.feeds.iter()
    }

    pub fn as_slice(&self) -> &[FeedDescriptor] {
        &self.feeds
    }
}

impl<'a> IntoIterator for &'a FeedRegistry {
    type Item = &'a FeedDescriptor;
    type IntoIter = std::slice::Iter<'a, FeedDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.feeds.iter()
    }
}
