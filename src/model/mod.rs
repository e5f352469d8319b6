//! In-memory glossary model.
//!
//! ## Design
//!
//! Nodes live in an arena owned by [`Glossary`] and are addressed by
//! [`NodeId`]. Ownership edges go from parent to child (child ids stored in
//! the parent's fields); the back edge to the parent is a plain id and is never
//! followed when copying a subtree.
//!
//! ```text
//! Glossary
//! ├── nodes: IndexMap<NodeId, Node>   (arena)
//! └── root: NodeId                    (NodeKind::Glossary)
//!       ├── languages / environments / ... : IndexMap<Key, NodeId>
//!       ├── concepts : IndexMap<Key, NodeId>
//!       └── title / desc / version : Dset
//! ```
//!
//! Every node kind has a fixed field set ([`NodeKind`]); absent optional
//! attributes are `None` or empty, never missing.

mod arena;
mod dset;
mod glossary;
mod node;
mod query;
mod text;

pub use arena::Arena;
pub use dset::{Dset, EnvironmentGraph};
pub use glossary::Glossary;
pub(crate) use glossary::EnvView;
pub use node::{
    Comment, Concept, Decl, Desc, Details, Editor, Environment, ExtRoot, KeyDef, KeyRef,
    Language, Node, NodeKind, NodeType, Plain, Root, Source, Term,
};
pub use text::{Segment, Text, TextKind};

use std::fmt;

use indexmap::IndexMap;

use crate::base::Key;

/// Environment key; `None` is the unspecified environment.
pub type EnvKey = Option<Key>;

/// Keyed collection: unique id to owned node.
pub type Keyed = IndexMap<Key, NodeId>;

/// Stable handle of a node in the glossary arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Language and environment list of a node.
///
/// Once a node is built its `env` is never empty; a glossary without declared
/// environments carries `[None]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LangEnv {
    pub lang: Option<Key>,
    pub env: Vec<EnvKey>,
}

impl LangEnv {
    pub fn new(lang: Option<Key>, env: Vec<EnvKey>) -> Self {
        Self { lang, env }
    }

    /// Fill whatever this langenv leaves unspecified from `inherited`,
    /// falling back to the unspecified environment.
    pub fn resolve(&self, inherited: &LangEnv) -> LangEnv {
        let lang = self.lang.clone().or_else(|| inherited.lang.clone());
        let env = if !self.env.is_empty() {
            self.env.clone()
        } else if !inherited.env.is_empty() {
            inherited.env.clone()
        } else {
            vec![None]
        };
        LangEnv { lang, env }
    }

    /// First environment of the list, the default for queries.
    pub fn first_env(&self) -> EnvKey {
        self.env.first().cloned().flatten()
    }
}

/// The keyed collections of a glossary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Languages,
    Environments,
    Editors,
    Sources,
    Topics,
    Levels,
    Grammar,
    ExtRoots,
    Concepts,
}

impl Collection {
    /// Name of one member, as used in messages.
    pub fn entity(self) -> &'static str {
        match self {
            Self::Languages => "language",
            Self::Environments => "environment",
            Self::Editors => "editor",
            Self::Sources => "source",
            Self::Topics => "topic",
            Self::Levels => "level",
            Self::Grammar => "grammar",
            Self::ExtRoots => "root",
            Self::Concepts => "concept",
        }
    }
}

/// Render an environment key for messages.
pub fn display_env(env: &EnvKey) -> &str {
    env.as_deref().unwrap_or("<none>")
}
