//! Typed node construction from the element tree.

use std::sync::Arc;

use tracing::{debug, trace};

use super::text::build_text;
use crate::base::{Key, SourceLocation, split_keys};
use crate::diagnostics::{DiagnosticCollector, codes};
use crate::error::GlossError;
use crate::markup::Element;
use crate::model::{
    Arena, Collection, Comment, Concept, Decl, Desc, Details, Dset, Editor, EnvKey, EnvView,
    Environment, ExtRoot, Glossary, KeyDef, LangEnv, Language, Node, NodeId, NodeKind, Plain,
    Root, Source, Term, Text, TextKind,
};
use crate::selector::{self, Resolution, SelectorFallback};

/// Trimmed key attribute; blank values count as absent.
pub(super) fn attr_key(element: &Element, name: &str) -> Option<Key> {
    element
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(Key::new)
}

fn attr_keys(element: &Element, name: &str) -> Vec<Key> {
    element.attr(name).map(split_keys).unwrap_or_default()
}

/// `lang` and `env` exactly as written on the element.
fn own_langenv(element: &Element) -> LangEnv {
    LangEnv::new(
        attr_key(element, "lang"),
        attr_keys(element, "env").into_iter().map(Some).collect(),
    )
}

/// Text-bearing node kinds.
#[derive(Clone, Copy, Debug)]
enum Leaf {
    Title,
    Version,
    Date,
    Name,
    ShortName,
    Affiliation,
    Email,
    Url,
    RootUrl,
    BrowseUrl,
    Nom,
    Stem,
    Desc,
    Origin,
    Comment,
    Details,
    Media,
    Decl,
}

impl Leaf {
    fn make(self, langenv: LangEnv, text: Text, element: &Element) -> NodeKind {
        let plain = |langenv, text| Plain { langenv, text };
        match self {
            Leaf::Title => NodeKind::Title(plain(langenv, text)),
            Leaf::Version => NodeKind::Version(plain(langenv, text)),
            Leaf::Date => NodeKind::Date(plain(langenv, text)),
            Leaf::Name => NodeKind::Name(plain(langenv, text)),
            Leaf::ShortName => NodeKind::ShortName(plain(langenv, text)),
            Leaf::Affiliation => NodeKind::Affiliation(plain(langenv, text)),
            Leaf::Email => NodeKind::Email(plain(langenv, text)),
            Leaf::Url => NodeKind::Url(plain(langenv, text)),
            Leaf::RootUrl => NodeKind::RootUrl(plain(langenv, text)),
            Leaf::BrowseUrl => NodeKind::BrowseUrl(plain(langenv, text)),
            Leaf::Nom => NodeKind::Nom(plain(langenv, text)),
            Leaf::Stem => NodeKind::Stem(plain(langenv, text)),
            Leaf::Desc | Leaf::Origin => {
                let desc = Desc {
                    langenv,
                    by: attr_key(element, "by"),
                    src: attr_key(element, "src"),
                    text,
                };
                match self {
                    Leaf::Desc => NodeKind::Desc(desc),
                    _ => NodeKind::Origin(desc),
                }
            }
            Leaf::Comment => NodeKind::Comment(Comment {
                langenv,
                by: attr_key(element, "by"),
                text,
            }),
            Leaf::Details | Leaf::Media => {
                let details = Details {
                    langenv,
                    by: attr_key(element, "by"),
                    root: attr_key(element, "root"),
                    rel: element.attr("rel").map(str::to_string),
                    text,
                };
                match self {
                    Leaf::Details => NodeKind::Details(details),
                    _ => NodeKind::Media(details),
                }
            }
            Leaf::Decl => NodeKind::Decl(Decl {
                langenv,
                gr: attr_key(element, "gr"),
                text,
            }),
        }
    }
}

pub(super) struct Builder {
    arena: Arena,
    file: Arc<str>,
    fallback: SelectorFallback,
    root_id: NodeId,
    /// Root under construction; its keyed collections fill up as keydefs are
    /// read, which is what selector resolution sees of the environments.
    root: Root,
    /// Langenv in effect, innermost last.
    scope: Vec<LangEnv>,
    diagnostics: DiagnosticCollector,
}

impl Builder {
    pub(super) fn new(
        element: &Element,
        file: Arc<str>,
        fallback: SelectorFallback,
    ) -> Result<Self, GlossError> {
        if element.tag != "glossary" {
            return Err(GlossError::UnknownRoot {
                tag: element.tag.clone(),
                location: SourceLocation::new(file, element.line),
            });
        }

        let mut arena = Arena::new();
        let root_id = arena.reserve();
        let langenv = own_langenv(element).resolve(&LangEnv::default());
        let empty = || Dset::new(root_id, langenv.clone());
        let root = Root {
            id: attr_key(element, "id"),
            langenv: langenv.clone(),
            title: empty(),
            desc: empty(),
            version: empty(),
            date: None,
            languages: Default::default(),
            environments: Default::default(),
            editors: Default::default(),
            sources: Default::default(),
            topics: Default::default(),
            levels: Default::default(),
            grammar: Default::default(),
            extroots: Default::default(),
            concepts: Default::default(),
        };

        Ok(Self {
            arena,
            file,
            fallback,
            root_id,
            root,
            scope: vec![langenv],
            diagnostics: DiagnosticCollector::new(),
        })
    }

    /// Build everything below the root and hand over the finished glossary.
    pub(super) fn build(
        mut self,
        element: &Element,
    ) -> Result<(Glossary, DiagnosticCollector), GlossError> {
        let root_id = self.root_id;

        for keydefs in element.children_tagged(&["keydefs"]) {
            self.keyed(keydefs, "languages", "language", Collection::Languages, Self::language)?;
            self.keyed(
                keydefs,
                "environments",
                "environment",
                Collection::Environments,
                Self::environment,
            )?;
            self.keyed(keydefs, "editors", "editor", Collection::Editors, Self::editor)?;
            self.keyed(keydefs, "sources", "source", Collection::Sources, Self::source)?;
            self.keyed(keydefs, "topics", "topic", Collection::Topics, |b, key, el| {
                let def = b.keydef(key, el);
                b.finish(def.0, el, NodeKind::Topic(def.1))
            })?;
            self.keyed(keydefs, "levels", "level", Collection::Levels, |b, key, el| {
                let def = b.keydef(key, el);
                b.finish(def.0, el, NodeKind::Level(def.1))
            })?;
            self.keyed(keydefs, "grammar", "gramm", Collection::Grammar, |b, key, el| {
                let def = b.keydef(key, el);
                b.finish(def.0, el, NodeKind::Gramm(def.1))
            })?;
            self.keyed(keydefs, "extroots", "extroot", Collection::ExtRoots, Self::extroot)?;
        }
        debug!(
            languages = self.root.languages.len(),
            environments = self.root.environments.len(),
            "keyed definitions built"
        );

        // Text outside keydefs is read once every environment is known, so
        // that selector resolution sees the whole closeness relation.
        for metadata in element.children_tagged(&["metadata"]) {
            self.metadata(metadata);
        }
        for concepts in element.children_tagged(&["concepts"]) {
            for concept in concepts.children_tagged(&["concept"]) {
                let key = self.require_id(concept)?;
                let id = self.concept(key.clone(), concept);
                self.root.concepts.insert(key, id);
            }
        }

        let location = self.location(element);
        self.arena.insert(
            root_id,
            Node {
                parent: None,
                location,
                kind: NodeKind::Glossary(self.root),
            },
        );
        Ok((Glossary::new(self.arena, root_id), self.diagnostics))
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn location(&self, element: &Element) -> SourceLocation {
        SourceLocation::new(self.file.clone(), element.line)
    }

    fn inherited(&self) -> LangEnv {
        self.scope
            .last()
            .cloned()
            .unwrap_or_else(|| LangEnv::new(None, vec![None]))
    }

    fn resolved_langenv(&self, element: &Element) -> LangEnv {
        own_langenv(element).resolve(&self.inherited())
    }

    fn require_id(&self, element: &Element) -> Result<Key, GlossError> {
        attr_key(element, "id").ok_or_else(|| GlossError::MissingId {
            tag: element.tag.clone(),
            location: self.location(element),
        })
    }

    /// Insert a keyed member, reserved earlier, under the root.
    fn finish(&mut self, id: NodeId, element: &Element, kind: NodeKind) -> NodeId {
        let location = self.location(element);
        self.arena.insert(
            id,
            Node {
                parent: Some(self.root_id),
                location,
                kind,
            },
        );
        id
    }

    /// Build a text-bearing node under `parent`.
    fn leaf(&mut self, parent: NodeId, element: &Element, leaf: Leaf) -> NodeId {
        let id = self.arena.reserve();
        let langenv = self.resolved_langenv(element);
        let text = build_text(element, TextKind::Plain, &self.file);
        let kind = leaf.make(langenv, text, element);
        let location = self.location(element);
        self.arena.insert(
            id,
            Node {
                parent: Some(parent),
                location,
                kind,
            },
        );
        id
    }

    /// First child tagged `tag`; later ones are reported and ignored.
    fn singleton(
        &mut self,
        parent: NodeId,
        element: &Element,
        tag: &str,
        leaf: Leaf,
    ) -> Option<NodeId> {
        let mut candidates = element.children_tagged(std::slice::from_ref(&tag));
        let first = candidates.next()?;
        for extra in candidates {
            let location = self.location(extra);
            self.diagnostics.warning(
                codes::DUPLICATE_SINGLETON,
                &location,
                format!("extra <{tag}> in <{}> ignored, only the first one is used", element.tag),
            );
        }
        Some(self.leaf(parent, first, leaf))
    }

    /// Add every child tagged with one of `tags` to `dset`.
    fn fill_dset(
        &mut self,
        dset: &mut Dset,
        owner: NodeId,
        element: &Element,
        tags: &[&str],
        leaf: Leaf,
    ) {
        for child in element.children_tagged(tags) {
            let id = self.leaf(owner, child, leaf);
            self.add_resolved(dset, id);
        }
    }

    fn dset(&mut self, owner: NodeId, element: &Element, tags: &[&str], leaf: Leaf) -> Dset {
        let mut dset = Dset::new(owner, self.inherited());
        self.fill_dset(&mut dset, owner, element, tags, leaf);
        dset
    }

    /// Resolve embedded selectors in a freshly built node and file the
    /// result, one copy per selected environment.
    fn add_resolved(&mut self, dset: &mut Dset, id: NodeId) {
        let Some(node) = self.arena.get(id) else {
            return;
        };
        let parent = node.parent;
        let langenv = node.langenv().cloned().unwrap_or_default();
        let Some(text) = node.text() else {
            dset.add(id, &langenv);
            return;
        };

        let graph = EnvView {
            arena: &self.arena,
            environments: &self.root.environments,
        };
        let resolution = selector::resolve(
            text,
            &langenv.env,
            &graph,
            self.fallback,
            &mut self.diagnostics,
        );

        match resolution {
            Resolution::Unchanged(text) => {
                self.set_text(id, None, text);
                dset.add(id, &langenv);
            }
            Resolution::Expanded(variants) => {
                trace!(node = %id, copies = variants.len(), "expanding embedded selectors");
                // Copies are taken from the untouched node before it is
                // narrowed to the first environment.
                let mut targets = vec![id];
                for _ in 1..variants.len() {
                    if let Some(copy) = self.arena.copy_subtree(id, parent) {
                        targets.push(copy);
                    }
                }
                for (target, (env, text)) in targets.into_iter().zip(variants) {
                    self.set_text(target, Some(env.clone()), text);
                    let narrowed = LangEnv::new(langenv.lang.clone(), vec![env]);
                    dset.add(target, &narrowed);
                }
            }
        }
    }

    fn set_text(&mut self, id: NodeId, env: Option<EnvKey>, text: Text) {
        let Some(node) = self.arena.get_mut(id) else {
            return;
        };
        if let Some(env) = env
            && let Some(langenv) = node.kind.langenv_mut()
        {
            langenv.env = vec![env];
        }
        if let Some(slot) = node.kind.text_mut() {
            *slot = text;
        }
    }

    fn keyed(
        &mut self,
        container: &Element,
        wrapper: &str,
        tag: &str,
        collection: Collection,
        mut make: impl FnMut(&mut Self, Key, &Element) -> NodeId,
    ) -> Result<(), GlossError> {
        for group in container.children_tagged(std::slice::from_ref(&wrapper)) {
            for member in group.children_tagged(std::slice::from_ref(&tag)) {
                let key = self.require_id(member)?;
                let id = make(self, key.clone(), member);
                self.root.collection_mut(collection).insert(key, id);
            }
        }
        Ok(())
    }

    // ========================================================================
    // NODE KINDS
    // ========================================================================

    fn metadata(&mut self, element: &Element) {
        self.fill_root_dset(|root| &mut root.title, element, &["title"], Leaf::Title);
        self.fill_root_dset(|root| &mut root.desc, element, &["desc", "ldesc"], Leaf::Desc);
        self.fill_root_dset(|root| &mut root.version, element, &["version"], Leaf::Version);

        let date = self.singleton(self.root_id, element, "date", Leaf::Date);
        if self.root.date.is_none() {
            self.root.date = date;
        } else if let Some(extra) = date {
            let location = self.arena.get(extra).map(|n| n.location.clone()).unwrap_or_default();
            self.diagnostics.warning(
                codes::DUPLICATE_SINGLETON,
                &location,
                "extra <date> in glossary metadata ignored, only the first one is used",
            );
        }
    }

    /// Metadata may come in several blocks; each adds to the root's d-sets.
    fn fill_root_dset(
        &mut self,
        select: fn(&mut Root) -> &mut Dset,
        element: &Element,
        tags: &[&str],
        leaf: Leaf,
    ) {
        let placeholder = Dset::new(self.root_id, self.root.langenv.clone());
        let mut dset = std::mem::replace(select(&mut self.root), placeholder);
        self.fill_dset(&mut dset, self.root_id, element, tags, leaf);
        *select(&mut self.root) = dset;
    }

    fn language(&mut self, key: Key, element: &Element) -> NodeId {
        let id = self.arena.reserve();
        let kind = NodeKind::Language(Language {
            id: key,
            name: self.dset(id, element, &["name"], Leaf::Name),
            shortname: self.dset(id, element, &["shortname"], Leaf::ShortName),
        });
        self.finish(id, element, kind)
    }

    fn environment(&mut self, key: Key, element: &Element) -> NodeId {
        let id = self.arena.reserve();
        let mut closeto: Vec<EnvKey> = attr_keys(element, "closeto")
            .into_iter()
            .map(Some)
            .collect();
        // The unspecified environment is close to every environment.
        closeto.push(None);
        let kind = NodeKind::Environment(Environment {
            id: key,
            weight: element.attr("weight").map(str::to_string),
            meta: element.attr("meta").map(str::to_string),
            closeto,
            name: self.dset(id, element, &["name"], Leaf::Name),
            shortname: self.dset(id, element, &["shortname"], Leaf::ShortName),
            desc: self.dset(id, element, &["desc", "ldesc"], Leaf::Desc),
        });
        self.finish(id, element, kind)
    }

    fn editor(&mut self, key: Key, element: &Element) -> NodeId {
        let id = self.arena.reserve();
        let kind = NodeKind::Editor(Editor {
            id: key,
            name: self.dset(id, element, &["name"], Leaf::Name),
            shortname: self.dset(id, element, &["shortname"], Leaf::ShortName),
            affiliation: self.dset(id, element, &["affiliation"], Leaf::Affiliation),
            desc: self.dset(id, element, &["desc", "ldesc"], Leaf::Desc),
            email: self.singleton(id, element, "email", Leaf::Email),
        });
        self.finish(id, element, kind)
    }

    fn source(&mut self, key: Key, element: &Element) -> NodeId {
        let id = self.arena.reserve();
        let kind = NodeKind::Source(Source {
            id: key,
            name: self.dset(id, element, &["name"], Leaf::Name),
            shortname: self.dset(id, element, &["shortname"], Leaf::ShortName),
            desc: self.dset(id, element, &["desc", "ldesc"], Leaf::Desc),
            url: self.singleton(id, element, "url", Leaf::Url),
            email: self.singleton(id, element, "email", Leaf::Email),
        });
        self.finish(id, element, kind)
    }

    /// Topic, level and grammar share one shape.
    fn keydef(&mut self, key: Key, element: &Element) -> (NodeId, KeyDef) {
        let id = self.arena.reserve();
        let def = KeyDef {
            id: key,
            name: self.dset(id, element, &["name"], Leaf::Name),
            shortname: self.dset(id, element, &["shortname"], Leaf::ShortName),
            desc: self.dset(id, element, &["desc", "ldesc"], Leaf::Desc),
        };
        (id, def)
    }

    fn extroot(&mut self, key: Key, element: &Element) -> NodeId {
        let id = self.arena.reserve();
        let kind = NodeKind::ExtRoot(ExtRoot {
            id: key,
            name: self.dset(id, element, &["name"], Leaf::Name),
            shortname: self.dset(id, element, &["shortname"], Leaf::ShortName),
            desc: self.dset(id, element, &["desc", "ldesc"], Leaf::Desc),
            rooturl: self.singleton(id, element, "rooturl", Leaf::RootUrl),
            browseurl: self.singleton(id, element, "browseurl", Leaf::BrowseUrl),
        });
        self.finish(id, element, kind)
    }

    fn concept(&mut self, key: Key, element: &Element) -> NodeId {
        let id = self.arena.reserve();

        let mut term = Dset::new(id, self.inherited());
        for child in element.children_tagged(&["term", "eterm"]) {
            let term_id = self.term(id, child);
            self.add_resolved(&mut term, term_id);
        }

        let kind = NodeKind::Concept(Concept {
            id: key,
            topic: attr_keys(element, "topic"),
            level: attr_keys(element, "level"),
            related: attr_keys(element, "related"),
            desc: self.dset(id, element, &["desc", "ldesc"], Leaf::Desc),
            term,
            details: self.dset(id, element, &["details"], Leaf::Details),
            media: self.dset(id, element, &["media"], Leaf::Media),
            origin: self.dset(id, element, &["origin", "lorigin"], Leaf::Origin),
            comment: self.dset(id, element, &["comment", "lcomment"], Leaf::Comment),
        });
        self.finish(id, element, kind)
    }

    /// `term` is the short form, its own text being the nominal form;
    /// `eterm` (or any term with a `nom` child) spells the forms out.
    fn term(&mut self, parent: NodeId, element: &Element) -> NodeId {
        let id = self.arena.reserve();
        let langenv = self.resolved_langenv(element);
        self.scope.push(langenv.clone());

        let term = if element.has_child("nom") {
            let nom = match self.singleton(id, element, "nom", Leaf::Nom) {
                Some(nom) => nom,
                None => self.leaf(id, element, Leaf::Nom),
            };
            Term {
                langenv,
                by: attr_key(element, "by"),
                src: attr_key(element, "src"),
                gr: attr_key(element, "gr"),
                nom,
                stem: self.singleton(id, element, "stem", Leaf::Stem),
                decl: element
                    .children_tagged(&["decl"])
                    .map(|decl| self.leaf(id, decl, Leaf::Decl))
                    .collect(),
                origin: self.dset(id, element, &["origin", "lorigin"], Leaf::Origin),
                comment: self.dset(id, element, &["comment", "lcomment"], Leaf::Comment),
            }
        } else {
            let nom = self.leaf(id, element, Leaf::Nom);
            Term {
                langenv: langenv.clone(),
                by: attr_key(element, "by"),
                src: attr_key(element, "src"),
                gr: attr_key(element, "gr"),
                nom,
                stem: None,
                decl: Vec::new(),
                origin: Dset::new(id, langenv.clone()),
                comment: Dset::new(id, langenv),
            }
        };

        self.scope.pop();
        let location = self.location(element);
        self.arena.insert(
            id,
            Node {
                parent: Some(parent),
                location,
                kind: NodeKind::Term(term),
            },
        );
        id
    }
}
