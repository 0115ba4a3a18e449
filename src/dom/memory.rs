use super::{Document, ElementSpec, NodeId};

#[derive(Debug, Clone)]
enum NodeKind {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
    /// Bumped whenever the slot is freed, invalidating old handles.
    generation: u32,
    /// False while the slot sits on the free list.
    attached: bool,
}

/// Arena-backed [`Document`] kept entirely in memory.
///
/// Removed nodes go back on a free list and their slots are reused by later
/// appends, so repeatedly emptying and refilling a container keeps the arena
/// bounded. Handles to removed nodes stop matching anything.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    free: Vec<usize>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Creates a document containing only an empty `<body>` root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Element(Element {
                    tag: "body".to_string(),
                    classes: Vec::new(),
                    attributes: Vec::new(),
                }),
                generation: 0,
                attached: true,
            }],
            free: Vec::new(),
        }
    }

    /// Number of node slots allocated, live or free.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes currently in the document, the root included.
    pub fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.index)
            .filter(|n| n.attached && n.generation == id.generation)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.index)
            .filter(|n| n.attached && n.generation == id.generation)
    }

    fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.node(id)?.kind {
            NodeKind::Element(el) => Some(el),
            NodeKind::Text(_) => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(el) => Some(el),
            NodeKind::Text(_) => None,
        }
    }

    /// Allocates a node under `parent`, which must be live.
    fn push_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.nodes[index];
                slot.parent = Some(parent);
                slot.kind = kind;
                slot.attached = true;
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.nodes.len();
                self.nodes.push(Node {
                    parent: Some(parent),
                    children: Vec::new(),
                    kind,
                    generation: 0,
                    attached: true,
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        id
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.node_mut(current) else {
                continue;
            };
            stack.append(&mut node.children);
            node.parent = None;
            node.kind = NodeKind::Text(String::new());
            node.attached = false;
            node.generation = node.generation.wrapping_add(1);
            self.free.push(current.index);
        }
    }

    fn collect_matching(&self, id: NodeId, class: &str, out: &mut Vec<NodeId>) {
        let Some(node) = self.node(id) else {
            return;
        };
        if let NodeKind::Element(el) = &node.kind {
            if el.classes.iter().any(|c| c == class) {
                out.push(id);
            }
        }
        for child in &node.children {
            self.collect_matching(*child, class, out);
        }
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Text(text) => out.push_str(&escape(text, false)),
            NodeKind::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                if !el.classes.is_empty() {
                    out.push_str(" class=\"");
                    out.push_str(&escape(&el.classes.join(" "), true));
                    out.push('"');
                }
                for (name, value) in &el.attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(value, true));
                    out.push('"');
                }
                out.push('>');
                for child in &node.children {
                    self.write_html(*child, out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }

    fn write_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(_) => {
                for child in &node.children {
                    self.write_text(*child, out);
                }
            }
        }
    }
}

fn escape(s: &str, in_attribute: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

impl Document for MemoryDocument {
    fn root(&self) -> NodeId {
        NodeId {
            index: 0,
            generation: 0,
        }
    }

    fn query_class_within(&self, ancestor: NodeId, class: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_matching(ancestor, class, &mut out);
        out
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.tag.as_str())
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|el| el.classes.iter().any(|c| c == class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element_mut(node) {
            if !el.classes.iter().any(|c| c == class) {
                el.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element_mut(node) {
            el.classes.retain(|c| c != class);
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if self.element(node).is_none() {
            return;
        }
        self.empty(node);
        self.push_node(node, NodeKind::Text(text.to_string()));
    }

    fn append(&mut self, parent: NodeId, element: ElementSpec) -> NodeId {
        if self.element(parent).is_none() {
            tracing::warn!(parent = ?parent, tag = %element.tag, "Append to unknown node ignored");
            // A handle that never resolves: callers cannot reach a live node through it
            return NodeId {
                index: usize::MAX,
                generation: 0,
            };
        }

        let ElementSpec {
            tag,
            classes,
            attributes,
            text,
        } = element;
        let id = self.push_node(
            parent,
            NodeKind::Element(Element {
                tag,
                classes,
                attributes,
            }),
        );
        if let Some(text) = text {
            self.push_node(id, NodeKind::Text(text));
        }
        id
    }

    fn empty(&mut self, node: NodeId) {
        let Some(target) = self.node_mut(node) else {
            return;
        };
        let children = std::mem::take(&mut target.children);
        for child in children {
            self.free_subtree(child);
        }
    }

    fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let Some(n) = self.node(node) {
            for child in &n.children {
                self.write_html(*child, &mut out);
            }
        }
        out
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_text(node, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_document_has_empty_body() {
        let doc = MemoryDocument::new();
        assert_eq!(doc.tag(doc.root()), Some("body"));
        assert_eq!(doc.inner_html(doc.root()), "");
    }

    #[test]
    fn test_append_and_serialize() {
        let mut doc = MemoryDocument::new();
        let root = doc.root();
        let link = doc.append(
            root,
            ElementSpec::new("a").class("entry-link").attr("href", "https://x/?a=1&b=\"2\""),
        );
        doc.append(link, ElementSpec::new("h2").text("Tom & <Jerry>"));

        assert_eq!(
            doc.inner_html(root),
            "<a class=\"entry-link\" href=\"https://x/?a=1&amp;b=&quot;2&quot;\"><h2>Tom &amp; &lt;Jerry&gt;</h2></a>"
        );
        assert_eq!(doc.text_content(root), "Tom & <Jerry>");
    }

    #[test]
    fn test_query_class_in_document_order() {
        let mut doc = MemoryDocument::new();
        let root = doc.root();
        let outer = doc.append(root, ElementSpec::new("div").class("x"));
        let inner = doc.append(outer, ElementSpec::new("span").class("x"));
        let sibling = doc.append(root, ElementSpec::new("p").class("x").class("y"));

        assert_eq!(doc.query_class("x"), vec![outer, inner, sibling]);
        assert_eq!(doc.query_class_within(outer, "x"), vec![outer, inner]);
        assert_eq!(doc.first_by_class("y"), Some(sibling));
        assert!(doc.query_class("missing").is_empty());
    }

    #[test]
    fn test_toggle_class_is_involution() {
        let mut doc = MemoryDocument::new();
        let root = doc.root();
        assert!(doc.toggle_class(root, "menu-hidden"));
        assert!(doc.has_class(root, "menu-hidden"));
        assert!(!doc.toggle_class(root, "menu-hidden"));
        assert!(!doc.has_class(root, "menu-hidden"));
    }

    #[test]
    fn test_add_class_does_not_duplicate() {
        let mut doc = MemoryDocument::new();
        let root = doc.root();
        doc.add_class(root, "a");
        doc.add_class(root, "a");
        let child = doc.append(root, ElementSpec::new("i"));
        assert_eq!(doc.inner_html(root), "<i></i>");
        doc.remove_class(root, "a");
        assert!(!doc.has_class(root, "a"));
        assert!(!doc.has_class(child, "a"));
    }

    #[test]
    fn test_empty_detaches_descendants() {
        let mut doc = MemoryDocument::new();
        let root = doc.root();
        let container = doc.append(root, ElementSpec::new("div").class("feed"));
        let entry = doc.append(container, ElementSpec::new("article").class("entry"));

        doc.empty(container);

        assert_eq!(doc.inner_html(container), "");
        assert!(doc.query_class("entry").is_empty());
        assert!(!doc.has_class(entry, "entry"));
        assert_eq!(doc.parent(entry), None);
        // Container itself survives
        assert_eq!(doc.query_class("feed"), vec![container]);
    }

    #[test]
    fn test_set_text_replaces_children() {
        let mut doc = MemoryDocument::new();
        let root = doc.root();
        let title = doc.append(root, ElementSpec::new("h1").text("old"));
        doc.append(title, ElementSpec::new("b").text("bold"));

        doc.set_text(title, "new");

        assert_eq!(doc.inner_html(title), "new");
        assert_eq!(doc.text_content(title), "new");
    }

    #[test]
    fn test_attribute_lookup() {
        let mut doc = MemoryDocument::new();
        let root = doc.root();
        let a = doc.append(root, ElementSpec::new("a").attr("data-id", "3"));
        assert_eq!(doc.attribute(a, "data-id"), Some("3"));
        assert_eq!(doc.attribute(a, "href"), None);
        assert_eq!(doc.parent(a), Some(root));
    }

    #[test]
    fn test_refilling_container_reuses_slots() {
        let mut doc = MemoryDocument::new();
        let root = doc.root();
        let container = doc.append(root, ElementSpec::new("div").class("feed"));

        let fill = |doc: &mut MemoryDocument| {
            doc.empty(container);
            for i in 0..10 {
                doc.append(container, ElementSpec::new("p").class("entry").text(format!("entry {i}")));
            }
        };

        fill(&mut doc);
        let capacity = doc.capacity();
        for _ in 0..1000 {
            fill(&mut doc);
        }

        assert_eq!(doc.capacity(), capacity);
        // root + container + 10 * (element + text)
        assert_eq!(doc.live_nodes(), 22);
        assert_eq!(doc.query_class_within(container, "entry").len(), 10);
    }

    #[test]
    fn test_stale_handle_does_not_resolve_to_reused_slot() {
        let mut doc = MemoryDocument::new();
        let root = doc.root();
        let container = doc.append(root, ElementSpec::new("div"));
        let old = doc.append(container, ElementSpec::new("a").attr("data-id", "0"));

        doc.empty(container);
        let new = doc.append(container, ElementSpec::new("a").attr("data-id", "1"));

        assert_eq!(new.index, old.index);
        assert_ne!(new, old);
        assert_eq!(doc.attribute(old, "data-id"), None);
        assert_eq!(doc.attribute(new, "data-id"), Some("1"));
        assert_eq!(doc.parent(old), None);
    }

    #[test]
    fn test_set_text_frees_previous_text() {
        let mut doc = MemoryDocument::new();
        let root = doc.root();
        let title = doc.append(root, ElementSpec::new("h1"));
        doc.set_text(title, "first");
        let capacity = doc.capacity();

        for i in 0..100 {
            doc.set_text(title, &format!("title {i}"));
        }

        assert_eq!(doc.capacity(), capacity);
        assert_eq!(doc.text_content(title), "title 99");
    }

    #[test]
    fn test_append_to_detached_node_is_ignored() {
        let mut doc = MemoryDocument::new();
        let root = doc.root();
        let gone = doc.append(root, ElementSpec::new("div"));
        doc.empty(root);

        let orphan = doc.append(gone, ElementSpec::new("span").class("ghost"));

        assert!(doc.query_class("ghost").is_empty());
        assert_eq!(doc.parent(orphan), None);
        assert_eq!(doc.inner_html(root), "");
    }
}
