//! Page skeleton and the class names the reader relies on.

use super::{Document, ElementSpec, NodeId};
use crate::registry::FeedRegistry;

/// Present on the root while the navigation menu is hidden.
pub const MENU_HIDDEN_CLASS: &str = "menu-hidden";
/// The clickable icon that toggles the menu.
pub const MENU_ICON_CLASS: &str = "menu-icon-link";
/// Heading that shows the name of the loaded feed.
pub const HEADER_TITLE_CLASS: &str = "header-title";
pub const SLIDE_MENU_CLASS: &str = "slide-menu";
/// List of feed links inside the menu.
pub const FEED_LIST_CLASS: &str = "feed-list";
/// Container that receives rendered entries.
pub const FEED_CONTAINER_CLASS: &str = "feed";
pub const ENTRY_LINK_CLASS: &str = "entry-link";
/// One rendered entry.
pub const ENTRY_CLASS: &str = "entry";
/// Attribute carrying a feed's registry index on menu links.
pub const FEED_ID_ATTR: &str = "data-id";

/// Handles to the elements built by [`scaffold`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub menu_icon: NodeId,
    pub header_title: NodeId,
    pub feed_list: NodeId,
    pub feed_container: NodeId,
}

/// Builds the reader's page skeleton under the document root.
///
/// The menu starts hidden. The feed list and the feed container start empty.
pub fn scaffold<D: Document + ?Sized>(doc: &mut D) -> PageLayout {
    let root = doc.root();
    doc.add_class(root, MENU_HIDDEN_CLASS);

    let header = doc.append(root, ElementSpec::new("div").class("header"));
    let menu_icon = doc.append(
        header,
        ElementSpec::new("a").class(MENU_ICON_CLASS).attr("href", "#"),
    );
    doc.append(menu_icon, ElementSpec::new("i").class("icon-list"));
    let header_title = doc.append(header, ElementSpec::new("h1").class(HEADER_TITLE_CLASS));

    let menu = doc.append(root, ElementSpec::new("div").class(SLIDE_MENU_CLASS));
    doc.append(menu, ElementSpec::new("h2").text("Feeds"));
    let feed_list = doc.append(menu, ElementSpec::new("ul").class(FEED_LIST_CLASS));

    let feed_container = doc.append(root, ElementSpec::new("div").class(FEED_CONTAINER_CLASS));

    PageLayout {
        menu_icon,
        header_title,
        feed_list,
        feed_container,
    }
}

/// Fills the menu's feed list with one link per registry entry.
///
/// Any previous links are replaced. Each link carries its registry index in
/// [`FEED_ID_ATTR`].
pub fn populate_feed_list<D: Document + ?Sized>(
    doc: &mut D,
    feed_list: NodeId,
    registry: &FeedRegistry,
) -> Vec<NodeId> {
    doc.empty(feed_list);
    registry
        .iter()
        .enumerate()
        .map(|(index, feed)| {
            let item = doc.append(feed_list, ElementSpec::new("li"));
            doc.append(
                item,
                ElementSpec::new("a")
                    .attr("href", "#")
                    .attr(FEED_ID_ATTR, index.to_string())
                    .text(feed.name.as_str()),
            )
        })
        .collect()
}
