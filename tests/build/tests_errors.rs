//! Fatal construction errors.

use crate::helpers::glossary_fixtures::*;
use divergloss::markup::Element;
use divergloss::{BuildOptions, GlossError, build};
use rstest::rstest;

fn build_err(root: &Element) -> GlossError {
    match build(root, &BuildOptions::default()) {
        Ok(_) => panic!("build should fail"),
        Err(e) => e,
    }
}

#[rstest]
#[case::language_and_concept(
    vec![environment("kde", &[])],
    vec![concept("en", "english")]
)]
#[case::environment_and_concept(
    vec![environment("kde", &[])],
    vec![concept("kde", "kde")]
)]
#[case::two_concepts(
    vec![],
    vec![concept("file", "a"), concept("file", "b")]
)]
#[case::nested_desc(
    vec![],
    vec![concept("file", "a").with_child(desc("d").with_attr("id", "file"))]
)]
fn test_duplicate_id_is_fatal(#[case] environments: Vec<Element>, #[case] concepts: Vec<Element>) {
    let err = build_err(&glossary(environments, concepts));
    assert!(
        matches!(err, GlossError::DuplicateId { .. }),
        "expected duplicate id, got {err}"
    );
}

#[test]
fn test_duplicate_id_reports_both_locations() {
    let root = glossary(
        vec![],
        vec![
            concept("file", "a").with_line(10),
            concept("file", "b").with_line(20),
        ],
    );
    match build_err(&root) {
        GlossError::DuplicateId { id, first, second } => {
            assert_eq!(id, "file");
            assert_eq!(first.line, 10);
            assert_eq!(second.line, 20);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_duplicate_id_is_fatal_without_validation() {
    let root = glossary(vec![], vec![concept("x", "a"), concept("x", "b")]);
    let options = BuildOptions::default().with_validate(false);
    assert!(matches!(
        build(&root, &options),
        Err(GlossError::DuplicateId { .. })
    ));
}

#[rstest]
#[case::concept(glossary(vec![], vec![Element::new("concept").with_line(5)]), "concept")]
#[case::environment(
    glossary(vec![Element::new("environment").with_line(5)], vec![]),
    "environment"
)]
#[case::blank_id(
    glossary(vec![], vec![Element::new("concept").with_attr("id", "  ").with_line(5)]),
    "concept"
)]
fn test_keyed_member_without_id(#[case] root: Element, #[case] expected_tag: &str) {
    match build_err(&root) {
        GlossError::MissingId { tag, location } => {
            assert_eq!(tag, expected_tag);
            assert_eq!(location.line, 5);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_root_element() {
    let err = build_err(&Element::new("dictionary").with_line(2));
    assert_eq!(
        err.to_string(),
        "<unknown>:2: expected a 'glossary' root element, found 'dictionary'"
    );
}
