//! The reader: a page, a feed registry and the feed load cycle.
//!
//! [`App`] owns the document and is the only writer of its feed container.
//! Loads run through a single async gate, so a load never starts rendering
//! while another one is between fetch and render:
//!
//! `Idle → Loading (gate held, fetching) → Rendered → completion → Idle`
//!
//! The document sits behind a plain mutex that is only held for short
//! synchronous sections and never across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use crate::dom::page::{self, PageLayout, FEED_ID_ATTR, FEED_LIST_CLASS, MENU_ICON_CLASS};
use crate::dom::{Document, NodeId};
use crate::feed::{render_entries, FeedSource, FetchError};
use crate::menu::{self, MenuState};
use crate::registry::FeedRegistry;

// ============================================================================
// Error and Result Types
// ============================================================================

#[derive(Debug, Error)]
pub enum LoadError {
    /// The requested index does not name a registry entry.
    #[error("Feed index {index} is out of range (registry has {len} feeds)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The feed source failed. The feed container keeps its previous content.
    #[error("Failed to load feed '{name}': {source}")]
    Fetch {
        name: String,
        #[source]
        source: FetchError,
    },
}

/// What a finished load put on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub index: usize,
    pub feed_name: String,
    /// Number of `.entry` elements rendered.
    pub entries: usize,
}

/// Effect of a synthetic click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    MenuToggled(MenuState),
    FeedSelected(LoadReport),
    Ignored,
}

enum ClickTarget {
    MenuIcon,
    FeedLink(usize),
    Nothing,
}

// ============================================================================
// App
// ============================================================================

pub struct App<S, D> {
    registry: Arc<FeedRegistry>,
    source: S,
    document: Mutex<D>,
    layout: PageLayout,
    feed_links: Vec<NodeId>,
    load_gate: tokio::sync::Mutex<()>,
    entry_limit: Option<usize>,
}

impl<S: FeedSource, D: Document> App<S, D> {
    /// Builds the page skeleton inside `document` and fills the menu's feed
    /// list from `registry`. The menu starts hidden and the feed container
    /// starts empty; call [`App::init`] or [`App::load_feed`] to show a feed.
    pub fn new(registry: Arc<FeedRegistry>, source: S, mut document: D) -> Self {
        let layout = page::scaffold(&mut document);
        let feed_links = page::populate_feed_list(&mut document, layout.feed_list, &registry);

        Self {
            registry,
            source,
            document: Mutex::new(document),
            layout,
            feed_links,
            load_gate: tokio::sync::Mutex::new(()),
            entry_limit: None,
        }
    }

    /// Caps the number of entries rendered per feed. `None` renders all.
    pub fn with_entry_limit(mut self, limit: Option<usize>) -> Self {
        self.entry_limit = limit;
        self
    }

    pub fn registry(&self) -> &FeedRegistry {
        &self.registry
    }

    pub fn layout(&self) -> PageLayout {
        self.layout
    }

    /// The menu link that selects the feed at `index`.
    pub fn feed_link(&self, index: usize) -> Option<NodeId> {
        self.feed_links.get(index).copied()
    }

    fn doc(&self) -> MutexGuard<'_, D> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with read access to the document.
    pub fn with_document<R>(&self, f: impl FnOnce(&D) -> R) -> R {
        f(&self.doc())
    }

    // ------------------------------------------------------------------------
    // Menu
    // ------------------------------------------------------------------------

    pub fn menu_state(&self) -> MenuState {
        menu::state(&*self.doc())
    }

    pub fn toggle_menu(&self) -> MenuState {
        menu::toggle(&mut *self.doc())
    }

    // ------------------------------------------------------------------------
    // Feed container
    // ------------------------------------------------------------------------

    /// Serialized HTML of the feed container.
    pub fn feed_html(&self) -> String {
        self.doc().inner_html(self.layout.feed_container)
    }

    /// Number of `.entry` elements inside the feed container.
    pub fn entry_count(&self) -> usize {
        self.doc()
            .query_class_within(self.layout.feed_container, page::ENTRY_CLASS)
            .len()
    }

    pub fn header_title(&self) -> String {
        self.doc().text_content(self.layout.header_title)
    }

    /// Empties the feed container once no load is in flight.
    pub async fn clear_feed(&self) {
        let _gate = self.load_gate.lock().await;
        self.doc().empty(self.layout.feed_container);
    }

    // ------------------------------------------------------------------------
    // Load cycle
    // ------------------------------------------------------------------------

    /// Loads the feed at `initial` (usually the configured initial feed).
    pub async fn init(&self, initial: usize) -> Result<LoadReport, LoadError> {
        tracing::info!(feeds = self.registry.len(), initial, "Initializing reader");
        self.load_feed(initial).await
    }

    /// Fetches the feed at `index` and renders its entries into the feed
    /// container, replacing whatever was there.
    ///
    /// Resolves only after the container shows the new feed. An out-of-range
    /// index fails before anything is fetched or touched. A fetch failure
    /// leaves the container as it was.
    pub async fn load_feed(&self, index: usize) -> Result<LoadReport, LoadError> {
        self.check_index(index)?;
        self.load_checked(index, || {}).await
    }

    /// Like [`App::load_feed`], but also signals completion through
    /// `on_complete`.
    ///
    /// `on_complete` runs exactly once for every accepted index, after the
    /// render (or after the fetch failed) and before any queued load may
    /// start. It is not called for an out-of-range index.
    pub async fn load_feed_with<F>(&self, index: usize, on_complete: F) -> Result<LoadReport, LoadError>
    where
        F: FnOnce() + Send,
    {
        self.check_index(index)?;
        self.load_checked(index, on_complete).await
    }

    /// Starts a load on the tokio runtime. The handle resolves when the load
    /// completes.
    pub fn spawn_load(
        self: &Arc<Self>,
        index: usize,
    ) -> tokio::task::JoinHandle<Result<LoadReport, LoadError>>
    where
        S: 'static,
        D: 'static,
    {
        let app = Arc::clone(self);
        tokio::spawn(async move { app.load_feed(index).await })
    }

    fn check_index(&self, index: usize) -> Result<(), LoadError> {
        if index < self.registry.len() {
            return Ok(());
        }
        tracing::warn!(index, len = self.registry.len(), "Rejected out-of-range feed index");
        Err(LoadError::IndexOutOfRange {
            index,
            len: self.registry.len(),
        })
    }

    /// Runs one load under the gate. `on_complete` fires while the gate is
    /// still held, so the page it observes is this load's result.
    async fn load_checked<F>(&self, index: usize, on_complete: F) -> Result<LoadReport, LoadError>
    where
        F: FnOnce() + Send,
    {
        let Some(feed) = self.registry.get(index) else {
            return Err(LoadError::IndexOutOfRange {
                index,
                len: self.registry.len(),
            });
        };

        let _gate = self.load_gate.lock().await;
        tracing::debug!(index, feed = %feed.url, "Loading feed");

        let mut entries = match self.source.fetch(feed).await {
            Ok(entries) => entries,
            Err(source) => {
                tracing::warn!(index, feed = %feed.url, error = %source, "Feed load failed");
                on_complete();
                return Err(LoadError::Fetch {
                    name: feed.name.clone(),
                    source,
                });
            }
        };

        if let Some(limit) = self.entry_limit {
            entries.truncate(limit);
        }

        let rendered = {
            let mut doc = self.doc();
            doc.set_text(self.layout.header_title, &feed.name);
            render_entries(&mut *doc, self.layout.feed_container, &entries).len()
        };

        tracing::info!(index, feed = %feed.name, entries = rendered, "Feed rendered");
        on_complete();
        Ok(LoadReport {
            index,
            feed_name: feed.name.clone(),
            entries: rendered,
        })
    }

    // ------------------------------------------------------------------------
    // Clicks
    // ------------------------------------------------------------------------

    /// Dispatches a synthetic click on `node`.
    ///
    /// Walking up from `node`: the menu icon toggles the menu; a link with a
    /// feed id inside the feed list hides the menu and loads that feed;
    /// anything else is ignored.
    pub async fn click(&self, node: NodeId) -> Result<ClickOutcome, LoadError> {
        let target = self.resolve_click(node);

        match target {
            ClickTarget::MenuIcon => Ok(ClickOutcome::MenuToggled(self.toggle_menu())),
            ClickTarget::FeedLink(index) => {
                menu::hide(&mut *self.doc());
                let report = self.load_feed(index).await?;
                Ok(ClickOutcome::FeedSelected(report))
            }
            ClickTarget::Nothing => {
                tracing::debug!(node = ?node, "Click ignored");
                Ok(ClickOutcome::Ignored)
            }
        }
    }

    fn resolve_click(&self, node: NodeId) -> ClickTarget {
        let doc = self.doc();
        let mut feed_id = None;
        let mut current = Some(node);

        while let Some(id) = current {
            if doc.has_class(id, MENU_ICON_CLASS) {
                return ClickTarget::MenuIcon;
            }
            if feed_id.is_none() && doc.tag(id) == Some("a") {
                feed_id = doc.attribute(id, FEED_ID_ATTR).and_then(|v| v.parse().ok());
            }
            if doc.has_class(id, FEED_LIST_CLASS) {
                return feed_id.map_or(ClickTarget::Nothing, ClickTarget::FeedLink);
            }
            current = doc.parent(id);
        }

        ClickTarget::Nothing
    }
}
