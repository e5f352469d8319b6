//! Element-tree fixtures for glossary tests.

use divergloss::markup::Element;
use divergloss::{Build, BuildOptions, build};

/// `<language id=...>` with an English name.
pub fn language(id: &str) -> Element {
    Element::new("language")
        .with_attr("id", id)
        .with_child(Element::new("name").with_text(id))
}

/// `<environment id=... closeto=...>`.
pub fn environment(id: &str, closeto: &[&str]) -> Element {
    let env = Element::new("environment").with_attr("id", id);
    if closeto.is_empty() {
        env
    } else {
        env.with_attr("closeto", closeto.join(" "))
    }
}

/// `<keydefs>` with one wrapper per non-empty group.
pub fn keydefs(languages: &[&str], environments: Vec<Element>) -> Element {
    let mut keydefs = Element::new("keydefs").with_child(
        Element::new("languages").with_children(languages.iter().map(|l| language(l))),
    );
    if !environments.is_empty() {
        keydefs = keydefs.with_child(Element::new("environments").with_children(environments));
    }
    keydefs
}

/// A glossary in English with the given environments and concepts.
pub fn glossary(environments: Vec<Element>, concepts: Vec<Element>) -> Element {
    Element::new("glossary")
        .with_attr("id", "test")
        .with_attr("lang", "en")
        .with_line(1)
        .with_child(keydefs(&["en", "sr"], environments))
        .with_child(Element::new("concepts").with_children(concepts))
}

/// Concept with a single short-form term.
pub fn concept(id: &str, term: &str) -> Element {
    Element::new("concept")
        .with_attr("id", id)
        .with_child(Element::new("term").with_text(term))
}

pub fn desc(text: &str) -> Element {
    Element::new("desc").with_text(text)
}

/// Build with default options, panicking on failure.
pub fn build_ok(root: &Element) -> Build {
    build(root, &BuildOptions::default().with_source_name("test.xml"))
        .unwrap_or_else(|e| panic!("build failed: {e}"))
}

/// Smallest file-manager glossary used across tests, as XML.
pub const FILE_MANAGER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<glossary id="fm" lang="en">
  <metadata>
    <title>File manager glossary</title>
    <title lang="sr">Речник менаџера фајлова</title>
    <date>2008-01-01</date>
  </metadata>
  <keydefs>
    <languages>
      <language id="en"><name>English</name></language>
      <language id="sr"><name>Serbian</name><shortname>sr</shortname></language>
    </languages>
    <environments>
      <environment id="kde"><name>KDE</name></environment>
      <environment id="kde4" closeto="kde"><name>KDE 4</name></environment>
      <environment id="gnome"><name>GNOME</name></environment>
    </environments>
    <editors>
      <editor id="ci"><name>Editor One</name><email>one@example.org</email></editor>
    </editors>
    <topics>
      <topic id="files"><name>Files</name></topic>
    </topics>
  </keydefs>
  <concepts>
    <concept id="file" topic="files" related="folder">
      <desc>A named unit of data. See <ref c="folder">folders</ref>.</desc>
      <term>file</term>
      <term lang="sr">фајл</term>
    </concept>
    <concept id="folder" related="file">
      <desc>Open the ~kde:Konqueror|gnome:Nautilus~ window to browse.</desc>
      <eterm by="ci">
        <nom>folder</nom>
        <stem>fold</stem>
        <comment>Also called directory.</comment>
      </eterm>
    </concept>
  </concepts>
</glossary>
"#;
