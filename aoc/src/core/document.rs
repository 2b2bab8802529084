//! Minimal node-query capability over fetched HTML.
//!
//! The problem parser and the submission-response parser only need a handful
//! of operations (first/all matches, attributes, text, markup, following
//! siblings), so the HTML engine stays behind this thin wrapper.

use scraper::{ElementRef, Html, Selector};

/// Parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// First element matching `selector` in document order.
    pub fn select_first(&self, selector: &Selector) -> Option<Node<'_>> {
        self.html.select(selector).next().map(Node)
    }

    /// Every element matching `selector` in document order.
    pub fn select_all(&self, selector: &Selector) -> Vec<Node<'_>> {
        self.html.select(selector).map(Node).collect()
    }
}

/// Borrowed element of a [`Document`].
#[derive(Clone, Copy)]
pub struct Node<'a>(ElementRef<'a>);

impl<'a> Node<'a> {
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.value().classes().any(|c| c == class)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn inner_text(&self) -> String {
        self.0.text().collect()
    }

    pub fn inner_html(&self) -> String {
        self.0.inner_html()
    }

    /// First descendant matching `selector`.
    pub fn select_first(&self, selector: &Selector) -> Option<Node<'a>> {
        self.0.select(selector).next().map(Node)
    }

    /// True if this element or any descendant carries `class`.
    pub fn contains_class(&self, class: &str) -> bool {
        self.has_class(class)
            || self
                .0
                .descendants()
                .filter_map(ElementRef::wrap)
                .any(|el| el.value().classes().any(|c| c == class))
    }

    /// First following sibling element with the given tag name.
    pub fn following_sibling(&self, tag: &str) -> Option<Node<'a>> {
        self.0
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == tag)
            .map(Node)
    }
}

/// Parse a selector that is known to be valid at compile time.
pub(crate) fn static_selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|err| panic!("invalid static selector `{css}`: {err:?}"))
}
