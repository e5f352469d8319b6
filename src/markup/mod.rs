//! Generic element tree handed over by the markup front end.
//!
//! The builder never sees XML directly. It consumes [`Element`]s: a tag, its
//! attributes in document order, mixed content (text and child elements in
//! document order) and the line the element started on. Include resolution,
//! comment stripping and schema validation happen before this point.
//!
//! Elements can be assembled by hand, which is how most tests build their
//! fixtures:
//!
//! ```
//! use divergloss::markup::Element;
//!
//! let concept = Element::new("concept")
//!     .with_attr("id", "file")
//!     .with_child(Element::new("term").with_attr("lang", "en").with_text("file"));
//! assert_eq!(concept.attr("id"), Some("file"));
//! ```

#[cfg(feature = "xml")]
pub mod xml;

use indexmap::IndexMap;

/// One item of mixed element content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Element(Element),
}

/// A parsed markup element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: IndexMap<String, String>,
    pub content: Vec<Content>,
    /// 1-based source line, 0 when unknown.
    pub line: u32,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: IndexMap::new(),
            content: Vec::new(),
            line: 0,
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.content.push(Content::Text(text.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.content.push(Content::Element(child));
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.content
            .extend(children.into_iter().map(Content::Element));
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Child elements in document order.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.content.iter().filter_map(|c| match c {
            Content::Element(e) => Some(e),
            Content::Text(_) => None,
        })
    }

    /// Child elements whose tag is one of `tags`.
    pub fn children_tagged<'a>(
        &'a self,
        tags: &'a [&'a str],
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children().filter(move |e| tags.contains(&e.tag.as_str()))
    }

    pub fn has_child(&self, tag: &str) -> bool {
        self.children().any(|e| e.tag == tag)
    }

    /// All text below this element with markup dropped.
    pub fn pure_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for item in &self.content {
            match item {
                Content::Text(t) => out.push_str(t),
                Content::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Depth-first walk over this element and all descendants.
    pub fn walk(&self, f: &mut impl FnMut(&Element)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }
}
