//! Diversity sets: child nodes indexed by language and environment.

use std::hash::Hash;

use indexmap::IndexMap;
use tracing::trace;

use super::{EnvKey, LangEnv, NodeId};
use crate::base::Key;

/// Read access to the declared environments and their closeness relation.
///
/// Implemented by [`Glossary`](super::Glossary) and by the builder while the
/// environments collection is still being filled.
pub trait EnvironmentGraph {
    /// `closeto` list of a declared environment, `None` when undeclared.
    fn closeto(&self, env: &Key) -> Option<&[EnvKey]>;

    /// All declared environments with their `closeto` lists, in declaration
    /// order.
    fn environments(&self) -> Vec<(&Key, &[EnvKey])>;
}

/// Node list per (language, environment), owned by one node.
///
/// A node is appended to the bucket of every environment it applies to, so the
/// same id can appear under several environments. Buckets keep insertion order.
#[derive(Clone, Debug)]
pub struct Dset {
    owner: NodeId,
    /// Language and environments the owner resolves to; the query defaults.
    inherited: LangEnv,
    data: IndexMap<Option<Key>, IndexMap<EnvKey, Vec<NodeId>>>,
}

impl Dset {
    pub fn new(owner: NodeId, inherited: LangEnv) -> Self {
        Self {
            owner,
            inherited,
            data: IndexMap::new(),
        }
    }

    pub fn owner(&self) -> NodeId {
        self.owner
    }

    pub fn inherited(&self) -> &LangEnv {
        &self.inherited
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Insert `node` under its effective language and every effective
    /// environment. Unspecified parts come from the owner's langenv.
    pub fn add(&mut self, node: NodeId, langenv: &LangEnv) {
        let effective = langenv.resolve(&self.inherited);
        let envs = self.data.entry(effective.lang).or_default();
        for env in effective.env {
            envs.entry(env).or_default().push(node);
        }
    }

    /// Nodes for a language and environment.
    ///
    /// `None` arguments take the owner's language and first environment. When
    /// the exact bucket is missing and the environment is declared, its
    /// `closeto` environments are tried in order; the first present bucket
    /// wins. The lookup never goes further than one hop.
    pub fn query<'a>(
        &'a self,
        graph: &impl EnvironmentGraph,
        lang: Option<&str>,
        env: Option<&str>,
    ) -> &'a [NodeId] {
        let lang = match lang {
            Some(lang) => Some(Key::new(lang)),
            None => self.inherited.lang.clone(),
        };
        let env = match env {
            Some(env) => Some(Key::new(env)),
            None => self.inherited.first_env(),
        };

        let Some(envs) = self.data.get(&lang) else {
            return &[];
        };
        if let Some(nodes) = envs.get(&env) {
            return nodes;
        }

        let closeto = env.as_ref().and_then(|e| graph.closeto(e)).unwrap_or(&[]);
        for close in closeto {
            if let Some(nodes) = envs.get(close) {
                trace!(
                    owner = %self.owner,
                    env = ?env,
                    fallback = ?close,
                    "d-set query resolved by closeness"
                );
                return nodes;
            }
        }
        &[]
    }

    /// Every node in the set, by language then environment.
    ///
    /// A node filed under several environments appears once per bucket.
    pub fn values(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.data
            .values()
            .flat_map(|envs| envs.values())
            .flat_map(|nodes| nodes.iter().copied())
    }

    /// Languages present, in insertion order.
    pub fn languages(&self) -> impl Iterator<Item = Option<&Key>> {
        self.data.keys().map(Option::as_ref)
    }

    /// Environments with content for a language, plus every declared
    /// environment close to one of them. `None` when the language is absent.
    pub fn environments(
        &self,
        graph: &impl EnvironmentGraph,
        lang: Option<&str>,
    ) -> Option<Vec<EnvKey>> {
        let lang = match lang {
            Some(lang) => Some(Key::new(lang)),
            None => self.inherited.lang.clone(),
        };
        let envs = self.data.get(&lang)?;

        let declared = graph.environments();
        let mut out: Vec<EnvKey> = Vec::new();
        for env in envs.keys() {
            if !out.contains(env) {
                out.push(env.clone());
            }
            for (key, closeto) in &declared {
                let close = Some((*key).clone());
                if closeto.contains(env) && !out.contains(&close) {
                    out.push(close);
                }
            }
        }
        Some(out)
    }

    /// Move the buckets of `old` under `new`, also in the query defaults.
    ///
    /// The language keeps its position; buckets already held by `new` are
    /// merged with the moved ones.
    pub fn rename_lang(&mut self, old: Option<&Key>, new: Option<Key>) {
        let old = old.cloned();
        if self.inherited.lang == old {
            self.inherited.lang = new.clone();
        }
        rename_entry(&mut self.data, &old, &new, |existing, moved| {
            for (env, nodes) in moved {
                merge_nodes(existing.entry(env).or_default(), nodes);
            }
        });
    }

    /// Move the `old` environment bucket under `new` for every language.
    pub fn rename_env(&mut self, old: &EnvKey, new: EnvKey) {
        for env in &mut self.inherited.env {
            if env == old {
                *env = new.clone();
            }
        }
        for envs in self.data.values_mut() {
            rename_entry(envs, old, &new, merge_nodes);
        }
    }

    pub(crate) fn remap(&mut self, f: &mut impl FnMut(NodeId) -> NodeId) {
        self.owner = f(self.owner);
        for envs in self.data.values_mut() {
            for nodes in envs.values_mut() {
                for id in nodes {
                    *id = f(*id);
                }
            }
        }
    }
}

/// Rename `old` to `new` in place, merging into an entry `new` already has.
fn rename_entry<K, V>(
    map: &mut IndexMap<K, V>,
    old: &K,
    new: &K,
    mut merge: impl FnMut(&mut V, V),
) where
    K: Hash + Eq + Clone,
{
    if old == new || !map.contains_key(old) {
        return;
    }
    for (key, value) in std::mem::take(map) {
        let key = if &key == old { new.clone() } else { key };
        match map.get_mut(&key) {
            Some(existing) => merge(existing, value),
            None => {
                map.insert(key, value);
            }
        }
    }
}

fn merge_nodes(existing: &mut Vec<NodeId>, moved: Vec<NodeId>) {
    for node in moved {
        if !existing.contains(&node) {
            existing.push(node);
        }
    }
}
