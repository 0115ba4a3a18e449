//! Document port.
//!
//! The reader never touches a rendering surface directly. Everything it needs
//! from a page (finding elements by class, flipping the menu marker on the
//! root, replacing the feed container's children, reading back HTML) goes
//! through the [`Document`] trait.
//!
//! [`MemoryDocument`] is the in-process implementation used by the binary and
//! the tests. [`page`] builds the fixed page skeleton the reader expects.

mod memory;
pub mod page;

pub use memory::MemoryDocument;

/// Handle to a node inside a [`Document`].
///
/// Handles are only meaningful for the document that issued them. A handle
/// to a removed node stays invalid even after its storage is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

/// Description of an element to append.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSpec {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Minimal query/mutation surface over a page.
///
/// Methods taking a [`NodeId`] that the document does not know are no-ops
/// (mutations) or return empty values (queries).
pub trait Document: Send {
    /// The root element (the page body). Carries the menu marker.
    fn root(&self) -> NodeId;

    /// All elements carrying `class`, in document order.
    fn query_class(&self, class: &str) -> Vec<NodeId> {
        self.query_class_within(self.root(), class)
    }

    /// Elements under `ancestor` (including itself) carrying `class`, in document order.
    fn query_class_within(&self, ancestor: NodeId, class: &str) -> Vec<NodeId>;

    /// First element carrying `class`.
    fn first_by_class(&self, class: &str) -> Option<NodeId> {
        self.query_class(class).into_iter().next()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn tag(&self, node: NodeId) -> Option<&str>;

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    fn add_class(&mut self, node: NodeId, class: &str);

    fn remove_class(&mut self, node: NodeId, class: &str);

    /// Flips `class` on `node` and returns whether it is present afterwards.
    fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            true
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Replaces the children of `node` with a single text node.
    fn set_text(&mut self, node: NodeId, text: &str);

    /// Appends a new element as the last child of `parent`.
    fn append(&mut self, parent: NodeId, element: ElementSpec) -> NodeId;

    /// Removes every child of `node`.
    fn empty(&mut self, node: NodeId);

    /// Serialized HTML of the children of `node`.
    fn inner_html(&self, node: NodeId) -> String;

    /// Concatenated text content of `node` and its descendants.
    fn text_content(&self, node: NodeId) -> String;
}
