//! Referential integrity of a built glossary.
//!
//! Every key-valued attribute must name a member of the matching keyed
//! collection:
//!
//! | attribute | collection |
//! |-----------|------------|
//! | `lang`, inline `ol lang` | languages |
//! | `env`, `closeto` | environments |
//! | `by` | editors |
//! | `src` | sources |
//! | `gr` | grammar |
//! | `root` | extroots |
//! | `c`, `related` | concepts |
//! | `topic` | topics |
//! | `level` | levels |
//!
//! The unspecified language or environment is never checked.

use tracing::debug;

use crate::base::{Key, SourceLocation};
use crate::error::GlossError;
use crate::model::{Collection, Glossary, NodeId, Text, TextKind};

/// Check the whole tree, failing on the first dangling reference.
pub fn check(glossary: &Glossary) -> Result<(), GlossError> {
    let checker = Checker { glossary };
    checker.node(glossary.root_id())?;
    debug!("referential check passed");
    Ok(())
}

struct Checker<'a> {
    glossary: &'a Glossary,
}

impl Checker<'_> {
    fn node(&self, id: NodeId) -> Result<(), GlossError> {
        let Some(node) = self.glossary.node(id) else {
            return Ok(());
        };

        for key_ref in node.kind.key_refs() {
            self.keys(
                key_ref.attribute,
                key_ref.target,
                key_ref.keys.into_iter(),
                &node.location,
            )?;
        }
        if let Some(text) = node.text() {
            self.text(text)?;
        }

        for child in self.glossary.child_nodes(id, None) {
            self.node(child)?;
        }
        Ok(())
    }

    fn text(&self, text: &Text) -> Result<(), GlossError> {
        let mut result = Ok(());
        text.walk(&mut |run| {
            if result.is_err() {
                return;
            }
            result = match &run.kind {
                TextKind::Ref { c } => {
                    self.keys("c", Collection::Concepts, c.iter(), &run.location)
                }
                TextKind::Ol { lang, .. } => {
                    self.keys("lang", Collection::Languages, lang.iter(), &run.location)
                }
                _ => Ok(()),
            };
        });
        result
    }

    fn keys<'k>(
        &self,
        attribute: &'static str,
        target: Collection,
        keys: impl Iterator<Item = &'k Key>,
        location: &SourceLocation,
    ) -> Result<(), GlossError> {
        let collection = self.glossary.collection(target);
        let missing: Vec<Key> = keys
            .filter(|key| !collection.contains_key(key.as_str()))
            .cloned()
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        Err(GlossError::UnresolvedKeys {
            attribute,
            target: target.entity(),
            keys: missing,
            location: location.clone(),
        })
    }
}
