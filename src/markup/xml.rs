//! XML front end: reads a Divergloss document into an [`Element`] tree.
//!
//! This is a plain well-formedness reader. It keeps mixed content intact
//! (whitespace included), records the line each element starts on, and drops
//! comments, processing instructions and the doctype. DTD validation and
//! XInclude resolution are not performed here.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{Content, Element};
use crate::error::GlossError;

/// Parse an XML document into its root element.
pub fn parse_str(input: &str) -> Result<Element, GlossError> {
    XmlReader::new(input).read()
}

/// Read and parse an XML file.
pub fn parse_file(path: &Path) -> Result<Element, GlossError> {
    let input = std::fs::read_to_string(path)?;
    parse_str(&input)
}

struct XmlReader<'a> {
    input: &'a str,
    /// Open elements, innermost last.
    stack: Vec<Element>,
    root: Option<Element>,
    /// Byte offset up to which newlines have been counted.
    line_offset: usize,
    line: u32,
}

impl<'a> XmlReader<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            stack: Vec::new(),
            root: None,
            line_offset: 0,
            line: 1,
        }
    }

    fn read(mut self) -> Result<Element, GlossError> {
        let mut reader = Reader::from_str(self.input);
        reader.config_mut().trim_text(false);

        loop {
            let position = reader.buffer_position() as usize;
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let element = self.start_element(e, position)?;
                    self.stack.push(element);
                }
                Ok(Event::Empty(ref e)) => {
                    let element = self.start_element(e, position)?;
                    self.close_element(element)?;
                }
                Ok(Event::End(_)) => {
                    let element = self
                        .stack
                        .pop()
                        .ok_or_else(|| GlossError::xml("unbalanced end tag"))?;
                    self.close_element(element)?;
                }
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| GlossError::xml(format!("text error: {e}")))?;
                    self.push_text(&text);
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    self.push_text(&text);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(GlossError::xml(format!(
                        "XML parse error at position {}: {e}",
                        reader.error_position()
                    )));
                }
                // Declarations, comments, processing instructions, doctype.
                _ => {}
            }
        }

        if !self.stack.is_empty() {
            return Err(GlossError::xml("unexpected end of document"));
        }
        self.root
            .ok_or_else(|| GlossError::xml("document has no root element"))
    }

    fn start_element(
        &mut self,
        e: &BytesStart<'_>,
        position: usize,
    ) -> Result<Element, GlossError> {
        let name = e.name();
        let tag = std::str::from_utf8(name.as_ref())
            .map_err(|e| GlossError::xml(format!("invalid tag name: {e}")))?;
        let mut element = Element::new(tag).with_line(self.line_at(position));

        for attr_result in e.attributes() {
            let attr =
                attr_result.map_err(|e| GlossError::xml(format!("attribute error: {e}")))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| GlossError::xml(format!("attribute key error: {e}")))?;
            let value = attr
                .unescape_value()
                .map_err(|e| GlossError::xml(format!("attribute value error: {e}")))?;
            element.attrs.insert(key.to_string(), value.into_owned());
        }
        Ok(element)
    }

    fn close_element(&mut self, element: Element) -> Result<(), GlossError> {
        match self.stack.last_mut() {
            Some(parent) => parent.content.push(Content::Element(element)),
            None if self.root.is_none() => self.root = Some(element),
            None => return Err(GlossError::xml("more than one root element")),
        }
        Ok(())
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        // Text outside the root element is insignificant whitespace.
        let Some(parent) = self.stack.last_mut() else {
            return;
        };
        match parent.content.last_mut() {
            Some(Content::Text(prev)) => prev.push_str(text),
            _ => parent.content.push(Content::Text(text.to_string())),
        }
    }

    /// Line of a byte offset. Offsets only ever grow, so count incrementally.
    fn line_at(&mut self, position: usize) -> u32 {
        let end = position.min(self.input.len());
        if end > self.line_offset {
            let added = self.input.as_bytes()[self.line_offset..end]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.line += added as u32;
            self.line_offset = end;
        }
        self.line
    }
}
