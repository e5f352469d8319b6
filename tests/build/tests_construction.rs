//! Node tree construction from element trees.

use crate::helpers::glossary_assertions::*;
use crate::helpers::glossary_fixtures::*;
use divergloss::diagnostics::codes;
use divergloss::markup::Element;
use divergloss::{BuildOptions, Key, NodeType, build};

// =============================================================================
// KEYED COLLECTIONS
// =============================================================================

#[test]
fn test_keydefs_are_flattened_into_root() {
    let root = glossary(
        vec![environment("kde", &[]), environment("gnome", &[])],
        vec![concept("file", "file")],
    );
    let glossary = build_ok(&root).glossary;

    let root = glossary.root();
    assert_eq!(root.id.as_deref(), Some("test"));
    assert_eq!(
        root.languages.keys().map(Key::as_str).collect::<Vec<_>>(),
        vec!["en", "sr"]
    );
    assert_eq!(
        root.environments.keys().map(Key::as_str).collect::<Vec<_>>(),
        vec!["kde", "gnome"]
    );
    assert!(glossary.concept("file").is_some());
    assert!(glossary.language("en").is_some());
}

#[test]
fn test_environment_closeto_gets_unspecified_env() {
    let root = glossary(
        vec![environment("kde", &[]), environment("kde4", &["kde"])],
        vec![],
    );
    let glossary = build_ok(&root).glossary;

    let kde4 = glossary.environment("kde4").expect("kde4 declared");
    assert_eq!(kde4.closeto, vec![Some(Key::new("kde")), None]);
    let kde = glossary.environment("kde").expect("kde declared");
    assert_eq!(kde.closeto, vec![None]);
}

#[test]
fn test_every_keydef_group() {
    let keydefs = Element::new("keydefs")
        .with_child(Element::new("languages").with_child(language("en")))
        .with_child(
            Element::new("editors").with_child(
                Element::new("editor")
                    .with_attr("id", "ed")
                    .with_child(Element::new("name").with_text("Ed"))
                    .with_child(Element::new("affiliation").with_text("Team"))
                    .with_child(Element::new("email").with_text("ed@example.org")),
            ),
        )
        .with_child(
            Element::new("sources").with_child(
                Element::new("source")
                    .with_attr("id", "web")
                    .with_child(Element::new("url").with_text("https://example.org")),
            ),
        )
        .with_child(Element::new("topics").with_child(Element::new("topic").with_attr("id", "t")))
        .with_child(Element::new("levels").with_child(Element::new("level").with_attr("id", "l")))
        .with_child(Element::new("grammar").with_child(Element::new("gramm").with_attr("id", "pl")))
        .with_child(
            Element::new("extroots").with_child(
                Element::new("extroot")
                    .with_attr("id", "wiki")
                    .with_child(Element::new("rooturl").with_text("https://wiki.example.org/"))
                    .with_child(Element::new("browseurl").with_text("https://wiki.example.org/b")),
            ),
        );
    let root = Element::new("glossary")
        .with_attr("lang", "en")
        .with_child(keydefs);
    let glossary = build_ok(&root).glossary;

    let editor = glossary.editor("ed").expect("editor");
    assert_eq!(
        texts(&glossary, editor.affiliation.query(&glossary, None, None)),
        vec!["Team"]
    );
    let email = editor.email.expect("email");
    assert_eq!(texts(&glossary, &[email]), vec!["ed@example.org"]);

    let source = glossary.source("web").expect("source");
    assert_eq!(
        texts(&glossary, &[source.url.expect("url")]),
        vec!["https://example.org"]
    );
    assert!(source.email.is_none());

    assert!(glossary.topic("t").is_some());
    assert!(glossary.level("l").is_some());
    assert!(glossary.gramm("pl").is_some());

    let extroot = glossary.extroot("wiki").expect("extroot");
    assert!(extroot.rooturl.is_some());
    assert!(extroot.browseurl.is_some());
    assert_eq!(
        glossary[glossary.root().grammar["pl"]].node_type(),
        NodeType::Gramm
    );
}

#[test]
fn test_metadata_is_flattened_into_root() {
    let root = Element::new("glossary")
        .with_attr("lang", "en")
        .with_child(
            Element::new("metadata")
                .with_child(Element::new("title").with_text("Glossary"))
                .with_child(Element::new("title").with_attr("lang", "sr").with_text("Речник"))
                .with_child(Element::new("ldesc").with_text("Long description."))
                .with_child(Element::new("version").with_text("1.0"))
                .with_child(Element::new("date").with_text("2008-01-01")),
        )
        .with_child(keydefs(&["en", "sr"], vec![]));
    let glossary = build_ok(&root).glossary;
    let meta = glossary.root();

    assert_eq!(query_texts(&glossary, &meta.title, None, None), vec!["Glossary"]);
    assert_eq!(
        query_texts(&glossary, &meta.title, Some("sr"), None),
        vec!["Речник"]
    );
    assert_eq!(
        query_texts(&glossary, &meta.desc, None, None),
        vec!["Long description."]
    );
    assert_eq!(query_texts(&glossary, &meta.version, None, None), vec!["1.0"]);
    assert_eq!(
        texts(&glossary, &[meta.date.expect("date")]),
        vec!["2008-01-01"]
    );
}

// =============================================================================
// DUAL ELEMENTS AND TERMS
// =============================================================================

#[test]
fn test_dual_elements_share_one_dset() {
    let concept = Element::new("concept")
        .with_attr("id", "file")
        .with_child(desc("short"))
        .with_child(Element::new("ldesc").with_text("long"))
        .with_child(Element::new("comment").with_text("c1"))
        .with_child(Element::new("lcomment").with_text("c2"))
        .with_child(Element::new("origin").with_text("o1"))
        .with_child(Element::new("lorigin").with_text("o2"));
    let glossary = build_ok(&glossary(vec![], vec![concept])).glossary;
    let file = glossary.concept("file").expect("concept");

    assert_eq!(query_texts(&glossary, &file.desc, None, None), vec!["short", "long"]);
    assert_eq!(query_texts(&glossary, &file.comment, None, None), vec!["c1", "c2"]);
    assert_eq!(query_texts(&glossary, &file.origin, None, None), vec!["o1", "o2"]);
}

#[test]
fn test_short_and_long_terms_expose_nom() {
    let concept = Element::new("concept")
        .with_attr("id", "folder")
        .with_child(Element::new("term").with_text("folder"))
        .with_child(
            Element::new("eterm")
                .with_attr("lang", "sr")
                .with_child(Element::new("nom").with_text("фасцикла"))
                .with_child(Element::new("stem").with_text("фасцикл"))
                .with_child(
                    Element::new("decl")
                        .with_attr("gr", "gen")
                        .with_text("фасцикле"),
                )
                .with_child(
                    Element::new("decl")
                        .with_attr("gr", "dat")
                        .with_text("фасцикли"),
                )
                .with_child(Element::new("comment").with_text("also директоријум")),
        );
    let options = BuildOptions::default().with_validate(false);
    let glossary = build(&glossary(vec![], vec![concept]), &options)
        .expect("build")
        .glossary;
    let folder = glossary.concept("folder").expect("concept");

    let en = folder.term.query(&glossary, None, None);
    assert_eq!(noms(&glossary, en), vec!["folder"]);
    let short = glossary[en[0]].as_term().expect("term");
    assert!(short.stem.is_none());
    assert!(short.decl.is_empty());

    let sr = folder.term.query(&glossary, Some("sr"), None);
    assert_eq!(noms(&glossary, sr), vec!["фасцикла"]);
    let long = glossary[sr[0]].as_term().expect("term");
    assert_eq!(texts(&glossary, &[long.stem.expect("stem")]), vec!["фасцикл"]);
    assert_eq!(texts(&glossary, &long.decl), vec!["фасцикле", "фасцикли"]);
    let grammar: Vec<_> = long
        .decl
        .iter()
        .map(|id| glossary[*id].as_decl().and_then(|d| d.gr.clone()))
        .collect();
    assert_eq!(grammar, vec![Some(Key::new("gen")), Some(Key::new("dat"))]);
    assert_eq!(
        query_texts(&glossary, &long.comment, None, None),
        vec!["also директоријум"]
    );
}

#[test]
fn test_short_term_keeps_inline_markup_in_nom() {
    let concept = Element::new("concept").with_attr("id", "x").with_child(
        Element::new("term")
            .with_text("big ")
            .with_child(Element::new("em").with_text("file")),
    );
    let glossary = build_ok(&glossary(vec![], vec![concept])).glossary;
    let term = glossary.concept("x").expect("concept").term.query(&glossary, None, None)[0];
    let nom = glossary[term].as_term().expect("term").nom;
    let text = glossary[nom].text().expect("text");
    assert_eq!(text.segments.len(), 2);
    assert_eq!(text.flatten(), "big file");
}

// =============================================================================
// SINGLETONS, KEYS, LOCATIONS
// =============================================================================

#[test]
fn test_extra_singleton_warns_and_first_wins() {
    let keydefs = keydefs(&["en"], vec![]).with_child(
        Element::new("editors").with_child(
            Element::new("editor")
                .with_attr("id", "ed")
                .with_child(Element::new("email").with_text("first@example.org"))
                .with_child(Element::new("email").with_text("second@example.org").with_line(12)),
        ),
    );
    let root = Element::new("glossary")
        .with_attr("lang", "en")
        .with_child(keydefs);
    let result = build_ok(&root);

    let email = result.glossary.editor("ed").and_then(|e| e.email).expect("email");
    assert_eq!(texts(&result.glossary, &[email]), vec!["first@example.org"]);

    assert_eq!(result.diagnostics.len(), 1);
    let diag = &result.diagnostics[0];
    assert_eq!(diag.code, codes::DUPLICATE_SINGLETON);
    assert_eq!(diag.location.line, 12);
}

#[test]
fn test_key_attributes_are_trimmed() {
    let concept = Element::new("concept")
        .with_attr("id", "  file ")
        .with_attr("related", " folder  ")
        .with_child(Element::new("term").with_text("file"));
    let glossary = build_ok(&glossary(vec![], vec![concept, concept_folder()])).glossary;

    let file = glossary.concept("file").expect("trimmed key");
    assert_eq!(file.id, "file");
    assert_eq!(file.related, vec![Key::new("folder")]);
}

fn concept_folder() -> Element {
    concept("folder", "folder")
}

#[test]
fn test_nodes_record_source_location() {
    let concept = Element::new("concept")
        .with_attr("id", "file")
        .with_line(7)
        .with_child(desc("d").with_line(8));
    let glossary = build_ok(&glossary(vec![], vec![concept])).glossary;

    let id = glossary.root().concepts["file"];
    assert_eq!(glossary[id].location.line, 7);
    assert_eq!(&*glossary[id].location.file, "test.xml");

    let desc = glossary.concept("file").expect("concept").desc.query(&glossary, None, None)[0];
    assert_eq!(glossary[desc].location.line, 8);
    assert_eq!(glossary[desc].text().expect("text").location.line, 8);
    assert_eq!(glossary.parent(desc), Some(id));
}

#[test]
fn test_concepts_keep_document_order() {
    let root = glossary(
        vec![],
        vec![concept("b", "b"), concept("a", "a"), concept("c", "c")],
    );
    let glossary = build_ok(&root).glossary;
    let keys: Vec<_> = glossary.concepts().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["b", "a", "c"]);
}
