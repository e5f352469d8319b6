//! Flattened views of the node tree and whole-tree key renames.

use rustc_hash::FxHashSet;

use super::{Dset, Glossary, Keyed, NodeId, NodeKind, NodeType, TextKind};
use crate::base::Key;

fn matches(glossary: &Glossary, id: NodeId, filter: Option<&[NodeType]>) -> bool {
    match filter {
        None => true,
        Some(types) => glossary
            .node(id)
            .is_some_and(|n| types.contains(&n.node_type())),
    }
}

impl Glossary {
    /// Direct children of `id`, optionally only those of the given types.
    ///
    /// A node filed in a d-set under several environments is listed once.
    pub fn child_nodes(&self, id: NodeId, filter: Option<&[NodeType]>) -> Vec<NodeId> {
        let Some(node) = self.node(id) else {
            return Vec::new();
        };
        let mut seen: FxHashSet<NodeId> = FxHashSet::default();
        node.kind
            .children()
            .into_iter()
            .filter(|child| seen.insert(*child) && matches(self, *child, filter))
            .collect()
    }

    /// All nodes below `id` in preorder, optionally only those of the given
    /// types. The filter selects output; the walk always goes through
    /// every node.
    pub fn descendant_nodes(&self, id: NodeId, filter: Option<&[NodeType]>) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(id, filter, &mut out);
        out
    }

    fn collect_descendants(&self, id: NodeId, filter: Option<&[NodeType]>, out: &mut Vec<NodeId>) {
        for child in self.child_nodes(id, None) {
            if matches(self, child, filter) {
                out.push(child);
            }
            self.collect_descendants(child, filter, out);
        }
    }

    /// D-sets of `id` and of every node below it.
    pub fn descendant_dsets(&self, id: NodeId) -> Vec<&Dset> {
        let mut out = Vec::new();
        self.collect_dsets(id, &mut out);
        out
    }

    fn collect_dsets<'a>(&'a self, id: NodeId, out: &mut Vec<&'a Dset>) {
        let Some(node) = self.node(id) else {
            return;
        };
        out.extend(node.kind.dsets().into_iter().map(|(_, dset)| dset));
        for child in self.child_nodes(id, None) {
            self.collect_dsets(child, out);
        }
    }

    /// Rename a language key throughout the tree: node languages, inline
    /// `ol` languages, d-set buckets and the language entry itself.
    pub fn rename_lang(&mut self, old: &str, new: &str) {
        let old = Key::new(old);
        let new = Key::new(new);
        tracing::debug!(%old, %new, "renaming language");

        for (_, node) in self.arena_mut().iter_mut() {
            if let Some(langenv) = node.kind.langenv_mut()
                && langenv.lang.as_ref() == Some(&old)
            {
                langenv.lang = Some(new.clone());
            }
            if let Some(text) = node.kind.text_mut() {
                text.walk_mut(&mut |t| {
                    if let TextKind::Ol { lang, .. } = &mut t.kind
                        && lang.as_ref() == Some(&old)
                    {
                        *lang = Some(new.clone());
                    }
                });
            }
            for dset in node.kind.dsets_mut() {
                dset.rename_lang(Some(&old), Some(new.clone()));
            }
            if let NodeKind::Language(language) = &mut node.kind
                && language.id == old
            {
                language.id = new.clone();
            }
            if let NodeKind::Glossary(root) = &mut node.kind {
                rename_key(&mut root.languages, &old, &new);
            }
        }
    }

    /// Rename an environment key throughout the tree: env lists, `closeto`
    /// lists, d-set buckets and the environment entry itself.
    pub fn rename_env(&mut self, old: &str, new: &str) {
        let old = Key::new(old);
        let new = Key::new(new);
        tracing::debug!(%old, %new, "renaming environment");
        let old_env = Some(old.clone());

        for (_, node) in self.arena_mut().iter_mut() {
            if let Some(langenv) = node.kind.langenv_mut() {
                for env in &mut langenv.env {
                    if *env == old_env {
                        *env = Some(new.clone());
                    }
                }
            }
            for dset in node.kind.dsets_mut() {
                dset.rename_env(&old_env, Some(new.clone()));
            }
            match &mut node.kind {
                NodeKind::Environment(environment) => {
                    if environment.id == old {
                        environment.id = new.clone();
                    }
                    for env in &mut environment.closeto {
                        if *env == old_env {
                            *env = Some(new.clone());
                        }
                    }
                }
                NodeKind::Glossary(root) => rename_key(&mut root.environments, &old, &new),
                _ => {}
            }
        }
    }
}

/// Replace `old` with `new` in place, keeping the entry's position.
fn rename_key(keyed: &mut Keyed, old: &Key, new: &Key) {
    if let Some(index) = keyed.get_index_of(old) {
        let entries = std::mem::take(keyed);
        *keyed = entries
            .into_iter()
            .enumerate()
            .map(|(i, (key, id))| if i == index { (new.clone(), id) } else { (key, id) })
            .collect();
    }
}
