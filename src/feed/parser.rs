use anyhow::Result;
use chrono::{DateTime, Utc};
use feed_rs::parser;

use crate::util::make_snippet;

/// One item of a fetched feed, reduced to what the reader renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    pub link: Option<String>,
    /// Plain-text, width-limited summary.
    pub snippet: String,
    pub published: Option<DateTime<Utc>>,
}

/// Parses RSS/Atom/JSON Feed bytes into entries, preserving feed order.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<Entry>> {
    let feed = parser::parse(bytes)?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let link = entry.links.first().map(|l| l.href.clone());
            let published = entry.published.or(entry.updated);
            let raw_summary = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .unwrap_or_default();
            let title = entry
                .title
                .map(|t| t.content.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Untitled".to_string());

            Entry {
                title,
                link,
                snippet: make_snippet(&raw_summary),
                published,
            }
        })
        .collect();

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_rss_items() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <title>Example</title>
    <item>
        <title>First</title>
        <link>https://example.com/1</link>
        <description>&lt;p&gt;Hello &lt;b&gt;there&lt;/b&gt;&lt;/p&gt;</description>
        <pubDate>Mon, 01 Jan 2024 00:00:00 +0000</pubDate>
    </item>
    <item><title>Second</title></item>
</channel></rss>"#;

        let entries = parse_feed(rss.as_bytes()).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "First");
        assert_eq!(entries[0].link.as_deref(), Some("https://example.com/1"));
        assert_eq!(entries[0].snippet, "Hello there");
        assert!(entries[0].published.is_some());
        assert_eq!(entries[1].title, "Second");
        assert_eq!(entries[1].snippet, "");
    }

    #[test]
    fn test_untitled_fallback() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><item><description>x</description></item></channel></rss>"#;
        let entries = parse_feed(rss.as_bytes()).unwrap();
        assert_eq!(entries[0].title, "Untitled");
    }

    #[test]
    fn test_parse_atom_content_fallback() {
        let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom</title>
  <id>urn:feed</id>
  <updated>2024-01-01T00:00:00Z</updated>
  <entry>
    <title>Atom entry</title>
    <id>urn:entry:1</id>
    <link href="https://example.com/atom/1"/>
    <updated>2024-01-02T00:00:00Z</updated>
    <content type="html">&lt;p&gt;Body text&lt;/p&gt;</content>
  </entry>
</feed>"#;

        let entries = parse_feed(atom.as_bytes()).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].link.as_deref(), Some("https://example.com/atom/1"));
        assert_eq!(entries[0].snippet, "Body text");
        assert!(entries[0].published.is_some());
    }

    #[test]
    fn test_invalid_xml_is_error() {
        assert!(parse_feed(b"<not valid xml").is_err());
    }
}
