//! Assertion helpers over built glossaries.

use divergloss::{Dset, Glossary, NodeId};

/// Flattened text of each node.
pub fn texts(glossary: &Glossary, ids: &[NodeId]) -> Vec<String> {
    ids.iter()
        .map(|id| {
            glossary[*id]
                .text()
                .map(|t| t.flatten())
                .unwrap_or_else(|| panic!("node {id} carries no text"))
        })
        .collect()
}

/// Flattened nominal forms of term nodes.
pub fn noms(glossary: &Glossary, ids: &[NodeId]) -> Vec<String> {
    ids.iter()
        .map(|id| {
            let term = glossary[*id]
                .as_term()
                .unwrap_or_else(|| panic!("node {id} is not a term"));
            texts(glossary, &[term.nom]).remove(0)
        })
        .collect()
}

/// Query a d-set and flatten the texts found.
pub fn query_texts(
    glossary: &Glossary,
    dset: &Dset,
    lang: Option<&str>,
    env: Option<&str>,
) -> Vec<String> {
    texts(glossary, dset.query(glossary, lang, env))
}

/// Environment keys of a node as plain strings, `-` for the unspecified one.
pub fn envs_of(glossary: &Glossary, id: NodeId) -> Vec<String> {
    glossary[id]
        .langenv()
        .unwrap_or_else(|| panic!("node {id} carries no langenv"))
        .env
        .iter()
        .map(|e| e.as_deref().unwrap_or("-").to_string())
        .collect()
}
