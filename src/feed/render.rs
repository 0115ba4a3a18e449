use super::parser::Entry;
use crate::dom::page::{ENTRY_CLASS, ENTRY_LINK_CLASS};
use crate::dom::{Document, ElementSpec, NodeId};

/// Replaces the children of `container` with one rendered block per entry.
///
/// Each entry becomes
/// `<a class="entry-link" href=LINK><article class="entry"><h2>TITLE</h2><p>SNIPPET</p></article></a>`.
/// Entries without a link point at `#`. Returns the `.entry` nodes.
pub fn render_entries<D: Document + ?Sized>(
    doc: &mut D,
    container: NodeId,
    entries: &[Entry],
) -> Vec<NodeId> {
    doc.empty(container);

    entries
        .iter()
        .map(|entry| {
            let link = doc.append(
                container,
                ElementSpec::new("a")
                    .class(ENTRY_LINK_CLASS)
                    .attr("href", entry.link.as_deref().unwrap_or("#")),
            );
            let article = doc.append(link, ElementSpec::new("article").class(ENTRY_CLASS));
            doc.append(article, ElementSpec::new("h2").text(entry.title.as_str()));
            doc.append(article, ElementSpec::new("p").text(entry.snippet.as_str()));
            article
        })
        .collect()
}
