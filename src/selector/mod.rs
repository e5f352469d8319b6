//! Embedded environment selectors.
//!
//! A text may carry inline variants for different environments:
//!
//! ```text
//! Open the ~kde:Konqueror|gnome:Nautilus~ window.
//! ```
//!
//! Resolution happens in two steps. The text is first normalized: every
//! selector becomes a choice of env-to-string variants and every environment
//! named anywhere is collected. The normalized text is then realized once per
//! collected environment, which is what lets a single node fan out into one
//! copy per environment.
//!
//! ## Grammar
//!
//! ```text
//! selector := '~' alt ('|' alt)* '~'
//! alt      := [envkeys ':'] text
//! envkeys  := envkey (' ' envkey)*
//! ```
//!
//! Outside a selector `~~` is a literal `~`. Inside a selector the first `~`
//! closes it, so `~~` there closes one selector and opens the next.

pub mod lexer;

use indexmap::{IndexMap, IndexSet};

use self::lexer::{Lexer, SelectorToken};
use crate::base::{SourceLocation, split_keys};
use crate::diagnostics::{DiagnosticCollector, codes};
use crate::model::{EnvKey, EnvironmentGraph, Segment, Text, TextKind, display_env};

/// What to pick when no selector alternative matches an environment, even
/// through closeness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectorFallback {
    /// The first alternative in selector order.
    #[default]
    FirstListed,
    /// The alternative with the smallest environment key, the unspecified
    /// environment sorting first.
    Lexicographic,
}

/// Outcome of resolving one text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// No selector: the text with `~~` unescaped.
    Unchanged(Text),
    /// One realized text per environment, in first-mention order.
    Expanded(Vec<(EnvKey, Text)>),
}

/// Resolve the selectors in `text`.
///
/// Alternatives without environment keys apply to `defaults`, the env list
/// of the node owning the text.
pub fn resolve(
    text: &Text,
    defaults: &[EnvKey],
    graph: &impl EnvironmentGraph,
    fallback: SelectorFallback,
    diagnostics: &mut DiagnosticCollector,
) -> Resolution {
    let mut envs = IndexSet::new();
    let mut choices = 0;
    let normalized = {
        let mut scanner = Scanner {
            defaults,
            diagnostics: &mut *diagnostics,
            envs: &mut envs,
            choices: &mut choices,
        };
        scanner.normalize(text)
    };

    let mut realizer = Realizer {
        graph,
        fallback,
        diagnostics,
    };
    if choices == 0 || envs.is_empty() {
        let env = defaults.first().cloned().flatten();
        return Resolution::Unchanged(realizer.realize(&normalized, &env));
    }

    let variants = envs
        .into_iter()
        .map(|env| {
            let text = realizer.realize(&normalized, &env);
            (env, text)
        })
        .collect();
    Resolution::Expanded(variants)
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Text with every selector parsed into a [`Choice`].
#[derive(Debug)]
struct NormText {
    kind: TextKind,
    location: SourceLocation,
    pieces: Vec<Piece>,
}

#[derive(Debug)]
enum Piece {
    Str(String),
    Choice(Choice),
    Nested(NormText),
}

#[derive(Debug)]
struct Choice {
    /// Variant per environment, in the order environments were first named.
    variants: IndexMap<EnvKey, String>,
    /// The selector as written, for messages.
    source: String,
}

fn push_str(pieces: &mut Vec<Piece>, value: &str) {
    if value.is_empty() {
        return;
    }
    match pieces.last_mut() {
        Some(Piece::Str(prev)) => prev.push_str(value),
        _ => pieces.push(Piece::Str(value.to_string())),
    }
}

/// Alternative being read.
#[derive(Default)]
struct Alt {
    keys: Option<String>,
    text: String,
}

/// Selector being read.
struct OpenSelector {
    start: usize,
    alts: Vec<Alt>,
    current: Alt,
}

impl OpenSelector {
    fn new(start: usize) -> Self {
        Self {
            start,
            alts: Vec::new(),
            current: Alt::default(),
        }
    }

    fn colon(&mut self) {
        if self.current.keys.is_none() {
            self.current.keys = Some(std::mem::take(&mut self.current.text));
        } else {
            self.current.text.push(':');
        }
    }

    fn next_alt(&mut self) {
        self.alts.push(std::mem::take(&mut self.current));
    }

    fn finish(mut self) -> Vec<Alt> {
        self.next_alt();
        self.alts
    }
}

struct Scanner<'a> {
    defaults: &'a [EnvKey],
    diagnostics: &'a mut DiagnosticCollector,
    envs: &'a mut IndexSet<EnvKey>,
    choices: &'a mut usize,
}

impl Scanner<'_> {
    fn normalize(&mut self, text: &Text) -> NormText {
        let mut pieces = Vec::new();
        for segment in &text.segments {
            match segment {
                Segment::Str(s) => self.scan(s, &text.location, &mut pieces),
                Segment::Text(t) => pieces.push(Piece::Nested(self.normalize(t))),
            }
        }
        NormText {
            kind: text.kind.clone(),
            location: text.location.clone(),
            pieces,
        }
    }

    fn scan(&mut self, input: &str, location: &SourceLocation, pieces: &mut Vec<Piece>) {
        let mut open: Option<OpenSelector> = None;

        for token in Lexer::new(input) {
            let Some(selector) = open.as_mut() else {
                match token.kind {
                    SelectorToken::Tilde => open = Some(OpenSelector::new(token.offset)),
                    SelectorToken::EscapedTilde => push_str(pieces, "~"),
                    _ => push_str(pieces, token.text),
                }
                continue;
            };
            match token.kind {
                SelectorToken::Tilde => {
                    let end = token.offset + token.text.len();
                    if let Some(selector) = open.take() {
                        self.close(selector, &input[..end], location, pieces);
                    }
                }
                SelectorToken::EscapedTilde => {
                    let end = token.offset + 1;
                    if let Some(selector) = open.take() {
                        self.close(selector, &input[..end], location, pieces);
                    }
                    open = Some(OpenSelector::new(end));
                }
                SelectorToken::Pipe => selector.next_alt(),
                SelectorToken::Colon => selector.colon(),
                SelectorToken::Text => selector.current.text.push_str(token.text),
            }
        }

        if let Some(selector) = open {
            let tail = &input[selector.start..];
            self.diagnostics.warning(
                codes::UNTERMINATED_SELECTOR,
                location,
                format!("unterminated embedded selector '{tail}'"),
            );
            push_str(pieces, tail);
        }
    }

    /// Turn a closed selector into a choice. `upto` ends right after the
    /// closing tilde. A selector naming no environment stays literal.
    fn close(
        &mut self,
        selector: OpenSelector,
        upto: &str,
        location: &SourceLocation,
        pieces: &mut Vec<Piece>,
    ) {
        let source = &upto[selector.start..];
        let mut variants: IndexMap<EnvKey, String> = IndexMap::new();
        let mut repeated: Vec<EnvKey> = Vec::new();

        for alt in selector.finish() {
            let keys: IndexSet<EnvKey> = match &alt.keys {
                Some(raw) => split_keys(raw).into_iter().map(Some).collect(),
                None => self.defaults.iter().cloned().collect(),
            };
            for key in &keys {
                if variants.contains_key(key) && !repeated.contains(key) {
                    repeated.push(key.clone());
                }
            }
            for key in keys {
                variants.insert(key, alt.text.clone());
            }
        }

        if variants.is_empty() {
            self.diagnostics.warning(
                codes::EMPTY_SELECTOR,
                location,
                format!("embedded selector '{source}' names no environment, kept as written"),
            );
            push_str(pieces, source);
            return;
        }

        if !repeated.is_empty() {
            let names: Vec<&str> = repeated.iter().map(display_env).collect();
            self.diagnostics.warning(
                codes::REPEATED_SELECTOR_ENV,
                location,
                format!(
                    "embedded selector '{source}' repeats environments: {}",
                    names.join(" ")
                ),
            );
        }

        self.envs.extend(variants.keys().cloned());
        *self.choices += 1;
        pieces.push(Piece::Choice(Choice {
            variants,
            source: source.to_string(),
        }));
    }
}

// ============================================================================
// REALIZATION
// ============================================================================

struct Realizer<'a, G> {
    graph: &'a G,
    fallback: SelectorFallback,
    diagnostics: &'a mut DiagnosticCollector,
}

impl<G: EnvironmentGraph> Realizer<'_, G> {
    fn realize(&mut self, norm: &NormText, env: &EnvKey) -> Text {
        let mut text = Text::new(norm.kind.clone(), norm.location.clone());
        for piece in &norm.pieces {
            match piece {
                Piece::Str(s) => text.push_str(s),
                Piece::Nested(nested) => text.push_text(self.realize(nested, env)),
                Piece::Choice(choice) => {
                    let picked = self.pick(choice, env, &norm.location);
                    text.push_str(picked);
                }
            }
        }
        text
    }

    fn pick<'c>(&mut self, choice: &'c Choice, env: &EnvKey, location: &SourceLocation) -> &'c str {
        if let Some(variant) = choice.variants.get(env) {
            return variant;
        }

        let closeto = env
            .as_ref()
            .and_then(|e| self.graph.closeto(e))
            .unwrap_or(&[]);
        for close in closeto {
            if let Some(variant) = choice.variants.get(close) {
                tracing::trace!(env = ?env, fallback = ?close, "selector resolved by closeness");
                return variant;
            }
        }

        self.diagnostics.warning(
            codes::UNRESOLVED_SELECTOR_ENV,
            location,
            format!(
                "no resolution for expected environment '{}' in embedded selector '{}'",
                display_env(env),
                choice.source
            ),
        );
        let picked = match self.fallback {
            SelectorFallback::FirstListed => choice.variants.first(),
            SelectorFallback::Lexicographic => choice.variants.iter().min_by(|a, b| a.0.cmp(b.0)),
        };
        picked.map(|(_, v)| v.as_str()).unwrap_or("")
    }
}
