//! A small feed reader.
//!
//! - [`registry`] holds the configured feeds
//! - [`menu`] shows and hides the navigation menu through a class on the page root
//! - [`app`] runs the feed load cycle: fetch a feed, render its entries into
//!   the page's feed container, signal completion
//!
//! The page is reached through the [`dom::Document`] port and feeds through
//! the [`feed::FeedSource`] port, so both can be swapped out in tests.

pub mod app;
pub mod config;
pub mod dom;
pub mod feed;
pub mod menu;
pub mod registry;
pub mod util;

pub use app::{App, ClickOutcome, LoadError, LoadReport};
pub use config::{Config, ConfigError};
pub use registry::{FeedDescriptor, FeedRegistry, RegistryError};
