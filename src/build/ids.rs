//! Document-wide `id` uniqueness.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::base::{Key, SourceLocation};
use crate::error::GlossError;
use crate::markup::Element;

/// Fail on the first `id` value seen twice anywhere under `root`.
pub(super) fn check_unique(root: &Element, file: &Arc<str>) -> Result<(), GlossError> {
    let mut seen: FxHashMap<Key, SourceLocation> = FxHashMap::default();
    visit(root, file, &mut seen)
}

fn visit(
    element: &Element,
    file: &Arc<str>,
    seen: &mut FxHashMap<Key, SourceLocation>,
) -> Result<(), GlossError> {
    if let Some(id) = element.attr("id").map(str::trim).filter(|id| !id.is_empty()) {
        let location = SourceLocation::new(file.clone(), element.line);
        if let Some(first) = seen.get(id) {
            return Err(GlossError::DuplicateId {
                id: Key::new(id),
                first: first.clone(),
                second: location,
            });
        }
        seen.insert(Key::new(id), location);
    }
    element
        .children()
        .try_for_each(|child| visit(child, file, seen))
}
