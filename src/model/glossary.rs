use std::ops::Index;

use super::{
    Arena, Collection, Concept, Editor, EnvKey, Environment, EnvironmentGraph, ExtRoot, KeyDef,
    Keyed, LangEnv, Language, Node, NodeId, NodeKind, Root, Source,
};
use crate::base::Key;

/// A built glossary: the node arena and its root.
#[derive(Clone, Debug)]
pub struct Glossary {
    arena: Arena,
    root: NodeId,
}

impl Glossary {
    /// `root` must be a [`NodeKind::Glossary`] node of `arena`.
    pub(crate) fn new(arena: Arena, root: NodeId) -> Self {
        Self { arena, root }
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn root(&self) -> &Root {
        match self.arena.get(self.root).map(|n| &n.kind) {
            Some(NodeKind::Glossary(root)) => root,
            _ => unreachable!("glossary root is always a glossary node"),
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|n| n.parent)
    }

    /// All nodes, in allocation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.arena.iter()
    }

    pub(crate) fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Default language of the glossary.
    pub fn lang(&self) -> Option<&Key> {
        self.root().langenv.lang.as_ref()
    }

    /// Default environment list of the glossary.
    pub fn env(&self) -> &[EnvKey] {
        &self.root().langenv.env
    }

    pub fn collection(&self, collection: Collection) -> &Keyed {
        self.root().collection(collection)
    }

    /// Langenv in effect at `id`: its own, or that of the nearest ancestor
    /// carrying one.
    pub fn inherited_langenv(&self, id: NodeId) -> LangEnv {
        let mut current = Some(id);
        while let Some(id) = current {
            let Some(node) = self.arena.get(id) else {
                break;
            };
            if let Some(langenv) = node.langenv() {
                return langenv.clone();
            }
            current = node.parent;
        }
        LangEnv::new(None, vec![None])
    }

    fn member(&self, collection: Collection, key: &str) -> Option<&Node> {
        self.collection(collection)
            .get(key)
            .and_then(|id| self.arena.get(*id))
    }

    pub fn concept(&self, key: &str) -> Option<&Concept> {
        self.member(Collection::Concepts, key)
            .and_then(Node::as_concept)
    }

    /// Concepts in document order.
    pub fn concepts(&self) -> impl Iterator<Item = (&Key, &Concept)> {
        self.root().concepts.iter().filter_map(|(key, id)| {
            self.arena
                .get(*id)
                .and_then(Node::as_concept)
                .map(|c| (key, c))
        })
    }

    pub fn language(&self, key: &str) -> Option<&Language> {
        self.member(Collection::Languages, key)
            .and_then(Node::as_language)
    }

    pub fn environment(&self, key: &str) -> Option<&Environment> {
        self.member(Collection::Environments, key)
            .and_then(Node::as_environment)
    }

    pub fn editor(&self, key: &str) -> Option<&Editor> {
        self.member(Collection::Editors, key).and_then(Node::as_editor)
    }

    pub fn source(&self, key: &str) -> Option<&Source> {
        self.member(Collection::Sources, key).and_then(Node::as_source)
    }

    pub fn topic(&self, key: &str) -> Option<&KeyDef> {
        self.member(Collection::Topics, key).and_then(Node::as_keydef)
    }

    pub fn level(&self, key: &str) -> Option<&KeyDef> {
        self.member(Collection::Levels, key).and_then(Node::as_keydef)
    }

    pub fn gramm(&self, key: &str) -> Option<&KeyDef> {
        self.member(Collection::Grammar, key).and_then(Node::as_keydef)
    }

    pub fn extroot(&self, key: &str) -> Option<&ExtRoot> {
        self.member(Collection::ExtRoots, key)
            .and_then(Node::as_extroot)
    }
}

impl Index<NodeId> for Glossary {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        match self.arena.get(id) {
            Some(node) => node,
            None => panic!("node {id} is not in this glossary"),
        }
    }
}

/// Declared environments seen through an arena and an environments map.
#[derive(Clone, Copy)]
pub(crate) struct EnvView<'a> {
    pub arena: &'a Arena,
    pub environments: &'a Keyed,
}

impl<'a> EnvView<'a> {
    fn lookup(self, env: &Key) -> Option<&'a [EnvKey]> {
        let id = self.environments.get(env)?;
        self.arena
            .get(*id)
            .and_then(Node::as_environment)
            .map(|e| e.closeto.as_slice())
    }

    fn all(self) -> Vec<(&'a Key, &'a [EnvKey])> {
        self.environments
            .iter()
            .filter_map(|(key, id)| {
                self.arena
                    .get(*id)
                    .and_then(Node::as_environment)
                    .map(|e| (key, e.closeto.as_slice()))
            })
            .collect()
    }
}

impl EnvironmentGraph for EnvView<'_> {
    fn closeto(&self, env: &Key) -> Option<&[EnvKey]> {
        self.lookup(env)
    }

    fn environments(&self) -> Vec<(&Key, &[EnvKey])> {
        self.all()
    }
}

impl Glossary {
    fn env_view(&self) -> EnvView<'_> {
        EnvView {
            arena: &self.arena,
            environments: &self.root().environments,
        }
    }
}

impl EnvironmentGraph for Glossary {
    fn closeto(&self, env: &Key) -> Option<&[EnvKey]> {
        self.env_view().lookup(env)
    }

    fn environments(&self) -> Vec<(&Key, &[EnvKey])> {
        self.env_view().all()
    }
}
