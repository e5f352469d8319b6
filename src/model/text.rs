//! Glossary text: nested markup segments.
//!
//! Markup such as
//!
//! ```text
//! Blah <ref c="file">one</ref> blah <em>other</em>.
//! ```
//!
//! is kept as `Text[Plain]["Blah ", Text[Ref c=file]["one"], " blah ", Text[Em]["other"], "."]`.

use crate::base::{Key, SourceLocation};

/// What a text run is, with the attributes its markup carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextKind {
    /// The whole text of an element.
    Plain,
    Para,
    Em,
    /// Reference to a concept.
    Ref { c: Option<Key> },
    /// Inline quote in another language; `wl` asks for the language's
    /// short name to be shown with it.
    Ol { lang: Option<Key>, wl: bool },
    Link { url: Option<String> },
}

impl TextKind {
    /// Inline tags that may nest directly inside this kind of text.
    pub fn allowed_tags(&self) -> &'static [&'static str] {
        match self {
            Self::Plain => &["para", "ref", "em", "ol", "link"],
            Self::Para | Self::Em => &["ref", "em", "ol", "link"],
            Self::Ref { .. } | Self::Link { .. } => &["em", "ol"],
            Self::Ol { .. } => &["ref", "em", "ol"],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Str(String),
    Text(Text),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Text {
    pub kind: TextKind,
    pub segments: Vec<Segment>,
    pub location: SourceLocation,
}

impl Text {
    pub fn new(kind: TextKind, location: SourceLocation) -> Self {
        Self {
            kind,
            segments: Vec::new(),
            location,
        }
    }

    /// Plain text with a single string segment.
    pub fn plain(value: impl Into<String>) -> Self {
        let mut text = Self::new(TextKind::Plain, SourceLocation::unknown());
        text.push_str(&value.into());
        text
    }

    /// Append a string, merging with a preceding string segment.
    pub fn push_str(&mut self, value: &str) {
        if value.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(Segment::Str(prev)) => prev.push_str(value),
            _ => self.segments.push(Segment::Str(value.to_string())),
        }
    }

    pub fn push_text(&mut self, text: Text) {
        self.segments.push(Segment::Text(text));
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// All string content, markup dropped.
    pub fn flatten(&self) -> String {
        let mut out = String::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut String) {
        for seg in &self.segments {
            match seg {
                Segment::Str(s) => out.push_str(s),
                Segment::Text(t) => t.flatten_into(out),
            }
        }
    }

    /// Visit this text and every nested run, outermost first.
    pub fn walk(&self, f: &mut impl FnMut(&Text)) {
        f(self);
        for seg in &self.segments {
            if let Segment::Text(t) = seg {
                t.walk(f);
            }
        }
    }

    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Text)) {
        f(self);
        for seg in &mut self.segments {
            if let Segment::Text(t) = seg {
                t.walk_mut(f);
            }
        }
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::new(TextKind::Plain, SourceLocation::unknown())
    }
}
