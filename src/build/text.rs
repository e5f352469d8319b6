//! Text runs from mixed element content.

use std::sync::Arc;

use super::builder::attr_key;
use crate::base::SourceLocation;
use crate::markup::{Content, Element};
use crate::model::{Text, TextKind};

/// Build the text of `element` as a run of `kind`.
///
/// Inline elements allowed inside `kind` become nested runs; anything else is
/// reduced to its pure text.
pub(super) fn build_text(element: &Element, kind: TextKind, file: &Arc<str>) -> Text {
    let allowed = kind.allowed_tags();
    let mut text = Text::new(kind, SourceLocation::new(file.clone(), element.line));
    for item in &element.content {
        match item {
            Content::Text(s) => text.push_str(s),
            Content::Element(child) if allowed.contains(&child.tag.as_str()) => {
                text.push_text(build_text(child, inline_kind(child), file));
            }
            Content::Element(child) => text.push_str(&child.pure_text()),
        }
    }
    text
}

fn inline_kind(element: &Element) -> TextKind {
    match element.tag.as_str() {
        "para" => TextKind::Para,
        "em" => TextKind::Em,
        "ref" => TextKind::Ref {
            c: attr_key(element, "c"),
        },
        "ol" => TextKind::Ol {
            lang: attr_key(element, "lang"),
            wl: element.attr("wl").is_some_and(|v| !v.trim().is_empty()),
        },
        "link" => TextKind::Link {
            url: element.attr("url").map(str::to_string),
        },
        _ => TextKind::Plain,
    }
}
