//! Typed glossary nodes.
//!
//! One [`NodeKind`] variant per Divergloss element. Dual elements share a
//! variant (`desc`/`ldesc` are both [`NodeKind::Desc`], `term`/`eterm` both
//! [`NodeKind::Term`]), and kinds with identical field sets share a struct.

use super::text::Text;
use super::{Collection, Dset, EnvKey, Keyed, LangEnv, NodeId};
use crate::base::{Key, SourceLocation};

/// A node in the glossary arena.
#[derive(Clone, Debug)]
pub struct Node {
    /// Owning node; `None` only for the glossary root.
    pub parent: Option<NodeId>,
    pub location: SourceLocation,
    pub kind: NodeKind,
}

// ============================================================================
// NODE DATA
// ============================================================================

/// Root of the glossary: defaults, metadata and every keyed collection.
#[derive(Clone, Debug)]
pub struct Root {
    pub id: Option<Key>,
    pub langenv: LangEnv,
    pub title: Dset,
    pub desc: Dset,
    pub version: Dset,
    pub date: Option<NodeId>,
    pub languages: Keyed,
    pub environments: Keyed,
    pub editors: Keyed,
    pub sources: Keyed,
    pub topics: Keyed,
    pub levels: Keyed,
    pub grammar: Keyed,
    pub extroots: Keyed,
    pub concepts: Keyed,
}

impl Root {
    pub fn collection(&self, collection: Collection) -> &Keyed {
        match collection {
            Collection::Languages => &self.languages,
            Collection::Environments => &self.environments,
            Collection::Editors => &self.editors,
            Collection::Sources => &self.sources,
            Collection::Topics => &self.topics,
            Collection::Levels => &self.levels,
            Collection::Grammar => &self.grammar,
            Collection::ExtRoots => &self.extroots,
            Collection::Concepts => &self.concepts,
        }
    }

    pub(crate) fn collection_mut(&mut self, collection: Collection) -> &mut Keyed {
        match collection {
            Collection::Languages => &mut self.languages,
            Collection::Environments => &mut self.environments,
            Collection::Editors => &mut self.editors,
            Collection::Sources => &mut self.sources,
            Collection::Topics => &mut self.topics,
            Collection::Levels => &mut self.levels,
            Collection::Grammar => &mut self.grammar,
            Collection::ExtRoots => &mut self.extroots,
            Collection::Concepts => &mut self.concepts,
        }
    }
}

/// Text-only node: title, name, email, nominal form, ...
#[derive(Clone, Debug)]
pub struct Plain {
    pub langenv: LangEnv,
    pub text: Text,
}

/// Description or origin.
#[derive(Clone, Debug)]
pub struct Desc {
    pub langenv: LangEnv,
    pub by: Option<Key>,
    pub src: Option<Key>,
    pub text: Text,
}

#[derive(Clone, Debug)]
pub struct Comment {
    pub langenv: LangEnv,
    pub by: Option<Key>,
    pub text: Text,
}

/// Pointer to details or media under an external root.
#[derive(Clone, Debug)]
pub struct Details {
    pub langenv: LangEnv,
    pub by: Option<Key>,
    pub root: Option<Key>,
    pub rel: Option<String>,
    pub text: Text,
}

/// One declension form of a term.
#[derive(Clone, Debug)]
pub struct Decl {
    pub langenv: LangEnv,
    pub gr: Option<Key>,
    pub text: Text,
}

#[derive(Clone, Debug)]
pub struct Term {
    pub langenv: LangEnv,
    pub by: Option<Key>,
    pub src: Option<Key>,
    pub gr: Option<Key>,
    /// Nominal form; present for both `term` and `eterm`.
    pub nom: NodeId,
    pub stem: Option<NodeId>,
    pub decl: Vec<NodeId>,
    pub origin: Dset,
    pub comment: Dset,
}

#[derive(Clone, Debug)]
pub struct Concept {
    pub id: Key,
    pub topic: Vec<Key>,
    pub level: Vec<Key>,
    pub related: Vec<Key>,
    pub desc: Dset,
    pub term: Dset,
    pub details: Dset,
    pub media: Dset,
    pub origin: Dset,
    pub comment: Dset,
}

#[derive(Clone, Debug)]
pub struct Language {
    pub id: Key,
    pub name: Dset,
    pub shortname: Dset,
}

#[derive(Clone, Debug)]
pub struct Environment {
    pub id: Key,
    pub weight: Option<String>,
    pub meta: Option<String>,
    /// Environments this one falls back to, in declaration order. Always ends
    /// with the unspecified environment.
    pub closeto: Vec<EnvKey>,
    pub name: Dset,
    pub shortname: Dset,
    pub desc: Dset,
}

#[derive(Clone, Debug)]
pub struct Editor {
    pub id: Key,
    pub name: Dset,
    pub shortname: Dset,
    pub affiliation: Dset,
    pub desc: Dset,
    pub email: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct Source {
    pub id: Key,
    pub name: Dset,
    pub shortname: Dset,
    pub desc: Dset,
    pub url: Option<NodeId>,
    pub email: Option<NodeId>,
}

/// Topic, level or grammar category.
#[derive(Clone, Debug)]
pub struct KeyDef {
    pub id: Key,
    pub name: Dset,
    pub shortname: Dset,
    pub desc: Dset,
}

#[derive(Clone, Debug)]
pub struct ExtRoot {
    pub id: Key,
    pub name: Dset,
    pub shortname: Dset,
    pub desc: Dset,
    pub rooturl: Option<NodeId>,
    pub browseurl: Option<NodeId>,
}

// ============================================================================
// NODE KINDS
// ============================================================================

#[derive(Clone, Debug)]
pub enum NodeKind {
    Glossary(Root),
    Language(Language),
    Environment(Environment),
    Editor(Editor),
    Source(Source),
    Topic(KeyDef),
    Level(KeyDef),
    Gramm(KeyDef),
    ExtRoot(ExtRoot),
    Concept(Concept),
    Term(Term),
    Desc(Desc),
    Origin(Desc),
    Comment(Comment),
    Details(Details),
    Media(Details),
    Decl(Decl),
    Title(Plain),
    Version(Plain),
    Date(Plain),
    Name(Plain),
    ShortName(Plain),
    Affiliation(Plain),
    Email(Plain),
    Url(Plain),
    RootUrl(Plain),
    BrowseUrl(Plain),
    Nom(Plain),
    Stem(Plain),
}

/// Tag of a [`NodeKind`], for filtering traversals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    Glossary,
    Language,
    Environment,
    Editor,
    Source,
    Topic,
    Level,
    Gramm,
    ExtRoot,
    Concept,
    Term,
    Desc,
    Origin,
    Comment,
    Details,
    Media,
    Decl,
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
}

/// Cross-reference attribute of a node and the keys it states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyRef<'a> {
    pub attribute: &'static str,
    pub target: Collection,
    pub keys: Vec<&'a Key>,
}

impl<'a> KeyRef<'a> {
    fn one(attribute: &'static str, target: Collection, key: &'a Option<Key>) -> Self {
        Self {
            attribute,
            target,
            keys: key.iter().collect(),
        }
    }

    fn many(attribute: &'static str, target: Collection, keys: &'a [Key]) -> Self {
        Self {
            attribute,
            target,
            keys: keys.iter().collect(),
        }
    }

    fn envs(attribute: &'static str, envs: &'a [EnvKey]) -> Self {
        Self {
            attribute,
            target: Collection::Environments,
            keys: envs.iter().flatten().collect(),
        }
    }
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Glossary(_) => NodeType::Glossary,
            Self::Language(_) => NodeType::Language,
            Self::Environment(_) => NodeType::Environment,
            Self::Editor(_) => NodeType::Editor,
            Self::Source(_) => NodeType::Source,
            Self::Topic(_) => NodeType::Topic,
            Self::Level(_) => NodeType::Level,
            Self::Gramm(_) => NodeType::Gramm,
            Self::ExtRoot(_) => NodeType::ExtRoot,
            Self::Concept(_) => NodeType::Concept,
            Self::Term(_) => NodeType::Term,
            Self::Desc(_) => NodeType::Desc,
            Self::Origin(_) => NodeType::Origin,
            Self::Comment(_) => NodeType::Comment,
            Self::Details(_) => NodeType::Details,
            Self::Media(_) => NodeType::Media,
            Self::Decl(_) => NodeType::Decl,
            Self::Title(_) => NodeType::Title,
            Self::Version(_) => NodeType::Version,
            Self::Date(_) => NodeType::Date,
            Self::Name(_) => NodeType::Name,
            Self::ShortName(_) => NodeType::ShortName,
            Self::Affiliation(_) => NodeType::Affiliation,
            Self::Email(_) => NodeType::Email,
            Self::Url(_) => NodeType::Url,
            Self::RootUrl(_) => NodeType::RootUrl,
            Self::BrowseUrl(_) => NodeType::BrowseUrl,
            Self::Nom(_) => NodeType::Nom,
            Self::Stem(_) => NodeType::Stem,
        }
    }

    /// Key of a keyed-collection member.
    pub fn key(&self) -> Option<&Key> {
        match self {
            Self::Language(n) => Some(&n.id),
            Self::Environment(n) => Some(&n.id),
            Self::Editor(n) => Some(&n.id),
            Self::Source(n) => Some(&n.id),
            Self::Topic(n) | Self::Level(n) | Self::Gramm(n) => Some(&n.id),
            Self::ExtRoot(n) => Some(&n.id),
            Self::Concept(n) => Some(&n.id),
            _ => None,
        }
    }

    /// Language and environments, for kinds that carry them.
    pub fn langenv(&self) -> Option<&LangEnv> {
        match self {
            Self::Glossary(n) => Some(&n.langenv),
            Self::Term(n) => Some(&n.langenv),
            Self::Desc(n) | Self::Origin(n) => Some(&n.langenv),
            Self::Comment(n) => Some(&n.langenv),
            Self::Details(n) | Self::Media(n) => Some(&n.langenv),
            Self::Decl(n) => Some(&n.langenv),
            Self::Title(n)
            | Self::Version(n)
            | Self::Date(n)
            | Self::Name(n)
            | Self::ShortName(n)
            | Self::Affiliation(n)
            | Self::Email(n)
            | Self::Url(n)
            | Self::RootUrl(n)
            | Self::BrowseUrl(n)
            | Self::Nom(n)
            | Self::Stem(n) => Some(&n.langenv),
            _ => None,
        }
    }

    pub fn langenv_mut(&mut self) -> Option<&mut LangEnv> {
        match self {
            Self::Glossary(n) => Some(&mut n.langenv),
            Self::Term(n) => Some(&mut n.langenv),
            Self::Desc(n) | Self::Origin(n) => Some(&mut n.langenv),
            Self::Comment(n) => Some(&mut n.langenv),
            Self::Details(n) | Self::Media(n) => Some(&mut n.langenv),
            Self::Decl(n) => Some(&mut n.langenv),
            Self::Title(n)
            | Self::Version(n)
            | Self::Date(n)
            | Self::Name(n)
            | Self::ShortName(n)
            | Self::Affiliation(n)
            | Self::Email(n)
            | Self::Url(n)
            | Self::RootUrl(n)
            | Self::BrowseUrl(n)
            | Self::Nom(n)
            | Self::Stem(n) => Some(&mut n.langenv),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&Text> {
        match self {
            Self::Desc(n) | Self::Origin(n) => Some(&n.text),
            Self::Comment(n) => Some(&n.text),
            Self::Details(n) | Self::Media(n) => Some(&n.text),
            Self::Decl(n) => Some(&n.text),
            Self::Title(n)
            | Self::Version(n)
            | Self::Date(n)
            | Self::Name(n)
            | Self::ShortName(n)
            | Self::Affiliation(n)
            | Self::Email(n)
            | Self::Url(n)
            | Self::RootUrl(n)
            | Self::BrowseUrl(n)
            | Self::Nom(n)
            | Self::Stem(n) => Some(&n.text),
            _ => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Self::Desc(n) | Self::Origin(n) => Some(&mut n.text),
            Self::Comment(n) => Some(&mut n.text),
            Self::Details(n) | Self::Media(n) => Some(&mut n.text),
            Self::Decl(n) => Some(&mut n.text),
            Self::Title(n)
            | Self::Version(n)
            | Self::Date(n)
            | Self::Name(n)
            | Self::ShortName(n)
            | Self::Affiliation(n)
            | Self::Email(n)
            | Self::Url(n)
            | Self::RootUrl(n)
            | Self::BrowseUrl(n)
            | Self::Nom(n)
            | Self::Stem(n) => Some(&mut n.text),
            _ => None,
        }
    }

    /// D-set children, named as their field.
    pub fn dsets(&self) -> Vec<(&'static str, &Dset)> {
        match self {
            Self::Glossary(n) => vec![
                ("title", &n.title),
                ("desc", &n.desc),
                ("version", &n.version),
            ],
            Self::Language(n) => vec![("name", &n.name), ("shortname", &n.shortname)],
            Self::Environment(n) => vec![
                ("name", &n.name),
                ("shortname", &n.shortname),
                ("desc", &n.desc),
            ],
            Self::Editor(n) => vec![
                ("name", &n.name),
                ("shortname", &n.shortname),
                ("affiliation", &n.affiliation),
                ("desc", &n.desc),
            ],
            Self::Source(n) => vec![
                ("name", &n.name),
                ("shortname", &n.shortname),
                ("desc", &n.desc),
            ],
            Self::Topic(n) | Self::Level(n) | Self::Gramm(n) => vec![
                ("name", &n.name),
                ("shortname", &n.shortname),
                ("desc", &n.desc),
            ],
            Self::ExtRoot(n) => vec![
                ("name", &n.name),
                ("shortname", &n.shortname),
                ("desc", &n.desc),
            ],
            Self::Concept(n) => vec![
                ("desc", &n.desc),
                ("term", &n.term),
                ("details", &n.details),
                ("media", &n.media),
                ("origin", &n.origin),
                ("comment", &n.comment),
            ],
            Self::Term(n) => vec![("origin", &n.origin), ("comment", &n.comment)],
            _ => Vec::new(),
        }
    }

    pub fn dsets_mut(&mut self) -> Vec<&mut Dset> {
        match self {
            Self::Glossary(n) => vec![&mut n.title, &mut n.desc, &mut n.version],
            Self::Language(n) => vec![&mut n.name, &mut n.shortname],
            Self::Environment(n) => vec![&mut n.name, &mut n.shortname, &mut n.desc],
            Self::Editor(n) => vec![
                &mut n.name,
                &mut n.shortname,
                &mut n.affiliation,
                &mut n.desc,
            ],
            Self::Source(n) => vec![&mut n.name, &mut n.shortname, &mut n.desc],
            Self::Topic(n) | Self::Level(n) | Self::Gramm(n) => {
                vec![&mut n.name, &mut n.shortname, &mut n.desc]
            }
            Self::ExtRoot(n) => vec![&mut n.name, &mut n.shortname, &mut n.desc],
            Self::Concept(n) => vec![
                &mut n.desc,
                &mut n.term,
                &mut n.details,
                &mut n.media,
                &mut n.origin,
                &mut n.comment,
            ],
            Self::Term(n) => vec![&mut n.origin, &mut n.comment],
            _ => Vec::new(),
        }
    }

    /// Every owned child: d-set members, singletons, lists, keyed members.
    pub fn children(&self) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self
            .dsets()
            .into_iter()
            .flat_map(|(_, dset)| dset.values())
            .collect();
        match self {
            Self::Glossary(n) => {
                out.extend(n.date);
                for keyed in [
                    &n.languages,
                    &n.environments,
                    &n.editors,
                    &n.sources,
                    &n.topics,
                    &n.levels,
                    &n.grammar,
                    &n.extroots,
                    &n.concepts,
                ] {
                    out.extend(keyed.values().copied());
                }
            }
            Self::Editor(n) => out.extend(n.email),
            Self::Source(n) => out.extend(n.url.into_iter().chain(n.email)),
            Self::ExtRoot(n) => out.extend(n.rooturl.into_iter().chain(n.browseurl)),
            Self::Term(n) => {
                out.push(n.nom);
                out.extend(n.stem);
                out.extend(n.decl.iter().copied());
            }
            _ => {}
        }
        out
    }

    /// Rewrite every owned child id in place, d-set members included.
    pub(crate) fn remap_children(&mut self, f: &mut impl FnMut(NodeId) -> NodeId) {
        for dset in self.dsets_mut() {
            dset.remap(f);
        }
        let remap_opt = |slot: &mut Option<NodeId>, f: &mut dyn FnMut(NodeId) -> NodeId| {
            if let Some(id) = slot {
                *id = f(*id);
            }
        };
        match self {
            Self::Glossary(n) => {
                remap_opt(&mut n.date, f);
                for keyed in [
                    &mut n.languages,
                    &mut n.environments,
                    &mut n.editors,
                    &mut n.sources,
                    &mut n.topics,
                    &mut n.levels,
                    &mut n.grammar,
                    &mut n.extroots,
                    &mut n.concepts,
                ] {
                    for id in keyed.values_mut() {
                        *id = f(*id);
                    }
                }
            }
            Self::Editor(n) => remap_opt(&mut n.email, f),
            Self::Source(n) => {
                remap_opt(&mut n.url, f);
                remap_opt(&mut n.email, f);
            }
            Self::ExtRoot(n) => {
                remap_opt(&mut n.rooturl, f);
                remap_opt(&mut n.browseurl, f);
            }
            Self::Term(n) => {
                n.nom = f(n.nom);
                remap_opt(&mut n.stem, f);
                for id in &mut n.decl {
                    *id = f(*id);
                }
            }
            _ => {}
        }
    }

    /// Cross-reference attributes stated by this node (text excluded).
    pub fn key_refs(&self) -> Vec<KeyRef<'_>> {
        let mut refs = Vec::new();
        if let Some(langenv) = self.langenv() {
            refs.push(KeyRef::one("lang", Collection::Languages, &langenv.lang));
            refs.push(KeyRef::envs("env", &langenv.env));
        }
        match self {
            Self::Term(n) => {
                refs.push(KeyRef::one("by", Collection::Editors, &n.by));
                refs.push(KeyRef::one("src", Collection::Sources, &n.src));
                refs.push(KeyRef::one("gr", Collection::Grammar, &n.gr));
            }
            Self::Desc(n) | Self::Origin(n) => {
                refs.push(KeyRef::one("by", Collection::Editors, &n.by));
                refs.push(KeyRef::one("src", Collection::Sources, &n.src));
            }
            Self::Comment(n) => refs.push(KeyRef::one("by", Collection::Editors, &n.by)),
            Self::Details(n) | Self::Media(n) => {
                refs.push(KeyRef::one("by", Collection::Editors, &n.by));
                refs.push(KeyRef::one("root", Collection::ExtRoots, &n.root));
            }
            Self::Decl(n) => refs.push(KeyRef::one("gr", Collection::Grammar, &n.gr)),
            Self::Concept(n) => {
                refs.push(KeyRef::many("topic", Collection::Topics, &n.topic));
                refs.push(KeyRef::many("level", Collection::Levels, &n.level));
                refs.push(KeyRef::many("related", Collection::Concepts, &n.related));
            }
            Self::Environment(n) => refs.push(KeyRef::envs("closeto", &n.closeto)),
            _ => {}
        }
        refs.retain(|r| !r.keys.is_empty());
        refs
    }
}

// ============================================================================
// TYPED ACCESS
// ============================================================================

impl Node {
    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn langenv(&self) -> Option<&LangEnv> {
        self.kind.langenv()
    }

    pub fn text(&self) -> Option<&Text> {
        self.kind.text()
    }

    pub fn as_root(&self) -> Option<&Root> {
        match &self.kind {
            NodeKind::Glossary(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_concept(&self) -> Option<&Concept> {
        match &self.kind {
            NodeKind::Concept(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_term(&self) -> Option<&Term> {
        match &self.kind {
            NodeKind::Term(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_language(&self) -> Option<&Language> {
        match &self.kind {
            NodeKind::Language(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_environment(&self) -> Option<&Environment> {
        match &self.kind {
            NodeKind::Environment(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_editor(&self) -> Option<&Editor> {
        match &self.kind {
            NodeKind::Editor(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_source(&self) -> Option<&Source> {
        match &self.kind {
            NodeKind::Source(n) => Some(n),
            _ => None,
        }
    }

    /// Topic, level or grammar category.
    pub fn as_keydef(&self) -> Option<&KeyDef> {
        match &self.kind {
            NodeKind::Topic(n) | NodeKind::Level(n) | NodeKind::Gramm(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_extroot(&self) -> Option<&ExtRoot> {
        match &self.kind {
            NodeKind::ExtRoot(n) => Some(n),
            _ => None,
        }
    }

    /// Description or origin.
    pub fn as_desc(&self) -> Option<&Desc> {
        match &self.kind {
            NodeKind::Desc(n) | NodeKind::Origin(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_comment(&self) -> Option<&Comment> {
        match &self.kind {
            NodeKind::Comment(n) => Some(n),
            _ => None,
        }
    }

    /// Details or media.
    pub fn as_details(&self) -> Option<&Details> {
        match &self.kind {
            NodeKind::Details(n) | NodeKind::Media(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_decl(&self) -> Option<&Decl> {
        match &self.kind {
            NodeKind::Decl(n) => Some(n),
            _ => None,
        }
    }
}
