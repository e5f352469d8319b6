//! Language and environment inheritance.

use crate::helpers::glossary_assertions::*;
use crate::helpers::glossary_fixtures::*;
use divergloss::markup::Element;
use divergloss::{Key, LangEnv};

fn root_with_env(env: &str, concepts: Vec<Element>) -> Element {
    Element::new("glossary")
        .with_attr("lang", "en")
        .with_attr("env", env)
        .with_child(keydefs(
            &["en", "sr"],
            vec![environment("x", &[]), environment("y", &[])],
        ))
        .with_child(Element::new("concepts").with_children(concepts))
}

#[test]
fn test_root_env_defaults_to_unspecified() {
    let glossary = build_ok(&glossary(vec![], vec![])).glossary;
    assert_eq!(glossary.env(), &[None::<Key>]);
    assert_eq!(glossary.lang().map(Key::as_str), Some("en"));
}

#[test]
fn test_node_inherits_root_environment() {
    let concept = Element::new("concept").with_attr("id", "c").with_child(desc("d"));
    let glossary = build_ok(&root_with_env("x", vec![concept])).glossary;
    let c = glossary.concept("c").expect("concept");

    let found = c.desc.query(&glossary, None, None);
    assert_eq!(texts(&glossary, found), vec!["d"]);
    assert_eq!(envs_of(&glossary, found[0]), vec!["x"]);
    assert!(c.desc.query(&glossary, None, Some("y")).is_empty());
}

#[test]
fn test_own_attributes_override_inherited() {
    let concept = Element::new("concept").with_attr("id", "c").with_child(
        desc("d")
            .with_attr("lang", "sr")
            .with_attr("env", "x y"),
    );
    let glossary = build_ok(&root_with_env("x", vec![concept])).glossary;
    let c = glossary.concept("c").expect("concept");

    assert!(c.desc.query(&glossary, Some("en"), None).is_empty());
    let x = c.desc.query(&glossary, Some("sr"), Some("x"));
    let y = c.desc.query(&glossary, Some("sr"), Some("y"));
    assert_eq!(x, y);
    assert_eq!(envs_of(&glossary, x[0]), vec!["x", "y"]);
}

#[test]
fn test_term_children_inherit_from_term() {
    let concept = Element::new("concept").with_attr("id", "c").with_child(
        Element::new("eterm")
            .with_attr("lang", "sr")
            .with_attr("env", "y")
            .with_child(Element::new("nom").with_text("n"))
            .with_child(Element::new("origin").with_text("o")),
    );
    let glossary = build_ok(&root_with_env("x", vec![concept])).glossary;
    let c = glossary.concept("c").expect("concept");

    let term_id = c.term.query(&glossary, Some("sr"), Some("y"))[0];
    let term = glossary[term_id].as_term().expect("term");
    assert_eq!(
        glossary[term.nom].langenv(),
        Some(&LangEnv::new(Some(Key::new("sr")), vec![Some(Key::new("y"))]))
    );

    // The term's d-sets default to the term's own langenv.
    assert_eq!(query_texts(&glossary, &term.origin, None, None), vec!["o"]);
    assert_eq!(glossary.inherited_langenv(term.nom).lang.as_deref(), Some("sr"));
}

#[test]
fn test_inherited_langenv_walks_to_root() {
    let glossary = build_ok(&root_with_env("y", vec![concept("c", "t")])).glossary;
    let concept_id = glossary.root().concepts["c"];
    let langenv = glossary.inherited_langenv(concept_id);
    assert_eq!(langenv.lang.as_deref(), Some("en"));
    assert_eq!(langenv.env, vec![Some(Key::new("y"))]);
}
