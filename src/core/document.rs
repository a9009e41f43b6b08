//! Query capability over a parsed HTML document.
//!
//! Extraction only needs CSS-style lookups, text and attributes, so it is
//! written against [`DocumentNode`] and can run on a hand-built tree in tests.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

pub trait DocumentNode: Sized {
    /// First descendant matching `selector`, in document order.
    fn find_first(&self, selector: &str) -> Option<Self>;

    /// All descendants matching `selector`, in document order.
    fn find_all(&self, selector: &str) -> Vec<Self>;

    /// Concatenated text of the node and its descendants, as in the source.
    fn text_content(&self) -> String;

    fn attribute(&self, name: &str) -> Option<String>;

    /// Text with surrounding whitespace removed and inner runs collapsed.
    fn clean_text(&self) -> String {
        self.text_content().split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(%selector, error = ?e, "Invalid CSS selector");
            None
        }
    }
}

impl DocumentNode for ElementRef<'_> {
    fn find_first(&self, selector: &str) -> Option<Self> {
        let selector = parse_selector(selector)?;
        self.select(&selector).next()
    }

    fn find_all(&self, selector: &str) -> Vec<Self> {
        match parse_selector(selector) {
            Some(selector) => self.select(&selector).collect(),
            None => Vec::new(),
        }
    }

    fn text_content(&self) -> String {
        self.text().collect()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }
}

/// An HTML page parsed into a queryable tree.
pub struct ParsedPage {
    html: Html,
}

impl ParsedPage {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// The `<html>` element; every lookup on it searches the whole document.
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }
}
