//! Whole-tree language and environment renames.

use crate::helpers::glossary_assertions::*;
use crate::helpers::glossary_fixtures::*;
use divergloss::markup::Element;
use divergloss::model::TextKind;
use divergloss::{Glossary, Key, validate};

fn renamable() -> Glossary {
    let concept = Element::new("concept")
        .with_attr("id", "file")
        .with_child(
            desc("Called ")
                .with_attr("env", "kde")
                .with_child(Element::new("ol").with_attr("lang", "sr").with_text("фајл")),
        )
        .with_child(Element::new("term").with_text("file"))
        .with_child(
            Element::new("eterm")
                .with_attr("lang", "sr")
                .with_attr("env", "kde4")
                .with_child(Element::new("nom").with_text("фајл"))
                .with_child(Element::new("comment").with_text("c")),
        );
    build_ok(&glossary(
        vec![environment("kde", &[]), environment("kde4", &["kde"])],
        vec![concept],
    ))
    .glossary
}

#[test]
fn test_rename_lang_everywhere() {
    let mut glossary = renamable();
    glossary.rename_lang("sr", "sr_Latn");

    let keys: Vec<_> = glossary.root().languages.keys().map(Key::as_str).collect();
    assert_eq!(keys, vec!["en", "sr_Latn"]);
    assert_eq!(
        glossary.language("sr_Latn").map(|l| l.id.as_str()),
        Some("sr_Latn")
    );
    assert!(glossary.language("sr").is_none());

    let file = glossary.concept("file").expect("concept");
    assert!(file.term.query(&glossary, Some("sr"), Some("kde4")).is_empty());
    let renamed = file.term.query(&glossary, Some("sr_Latn"), Some("kde4"));
    assert_eq!(noms(&glossary, renamed), vec!["фајл"]);

    // The term's own d-sets default to the renamed language.
    let term = glossary[renamed[0]].as_term().expect("term");
    assert_eq!(term.langenv.lang.as_deref(), Some("sr_Latn"));
    assert_eq!(query_texts(&glossary, &term.comment, None, None), vec!["c"]);

    let desc = file.desc.query(&glossary, None, Some("kde"))[0];
    let mut ol_langs = Vec::new();
    glossary[desc].text().expect("text").walk(&mut |run| {
        if let TextKind::Ol { lang, .. } = &run.kind {
            ol_langs.push(lang.clone());
        }
    });
    assert_eq!(ol_langs, vec![Some(Key::new("sr_Latn"))]);

    assert!(validate::check(&glossary).is_ok());
}

#[test]
fn test_rename_env_everywhere() {
    let mut glossary = renamable();
    glossary.rename_env("kde", "plasma");

    let keys: Vec<_> = glossary.root().environments.keys().map(Key::as_str).collect();
    assert_eq!(keys, vec!["plasma", "kde4"]);
    let kde4 = glossary.environment("kde4").expect("kde4");
    assert_eq!(kde4.closeto, vec![Some(Key::new("plasma")), None]);

    let file = glossary.concept("file").expect("concept");
    assert!(file.desc.query(&glossary, None, Some("kde")).is_empty());
    let desc = file.desc.query(&glossary, None, Some("plasma"));
    assert_eq!(envs_of(&glossary, desc[0]), vec!["plasma"]);

    // Closeness follows the renamed key.
    assert_eq!(
        file.desc.query(&glossary, None, Some("kde4")),
        desc
    );

    assert!(validate::check(&glossary).is_ok());
}

#[test]
fn test_rename_unknown_key_changes_nothing() {
    let mut glossary = renamable();
    glossary.rename_lang("de", "fr");
    glossary.rename_env("xfce", "lxqt");

    assert_eq!(glossary.root().languages.len(), 2);
    assert!(glossary.language("sr").is_some());
    assert!(glossary.environment("kde").is_some());
    assert!(validate::check(&glossary).is_ok());
}
