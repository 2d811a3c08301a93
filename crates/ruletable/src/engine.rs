//! Grammar engines: turn grammar text into a [`RuleTree`].
//!
//! Each supported notation lives in its own submodule with its own `logos`
//! lexer and recursive-descent parser. They share the token [`Cursor`] and the
//! node constructors defined here, so every engine shapes its tree the same
//! way: a top-level `rule` node whose children are the items of its body
//! sequence, single-item sequences and choices collapsed, spans recorded, and
//! choice alternatives marked with `unique_match`.

use crate::error::ParseError;
use crate::tree::{ParsedRule, RuleKind, RuleTree};
use logos::{FilterResult, Lexer, Logos, Span};
use std::collections::HashMap;

/// How deeply brackets may nest before a grammar is rejected.
///
/// Parsing recurses once per bracket level; the limit keeps pathological
/// input from exhausting the call stack.
pub const MAX_NESTING: usize = 256;

pub mod bnf;
pub mod custom;
pub mod w3c;

/// A reader for one grammar notation.
pub trait GrammarEngine {
    /// Short engine name, matching its configuration spelling.
    fn name(&self) -> &'static str;

    /// Parses grammar text into a rule tree.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the text is not a well-formed grammar.
    fn parse(&self, source: &str) -> Result<RuleTree, ParseError>;
}

/// Lexer failures shared by every engine's token set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum LexError {
    #[default]
    UnexpectedCharacter,
    UnterminatedComment,
}

/// Skips a block comment whose opening delimiter was just matched.
///
/// Block comments do not nest: the first `close` ends the comment.
pub(crate) fn block_comment<'s, T>(
    lex: &mut Lexer<'s, T>,
    close: &str,
) -> FilterResult<(), LexError>
where
    T: Logos<'s, Source = str>,
{
    match lex.remainder().find(close) {
        Some(at) => {
            lex.bump(at + close.len());
            FilterResult::Skip
        }
        None => FilterResult::Error(LexError::UnterminatedComment),
    }
}

/// Tokenizes `source`, failing on the first character no token matches.
pub(crate) fn lex<'s, T>(engine: &'static str, source: &'s str) -> Result<Vec<(T, Span)>, ParseError>
where
    T: Logos<'s, Source = str, Error = LexError>,
    T::Extras: Default,
{
    let mut tokens = Vec::new();
    for (token, span) in T::lexer(source).spanned() {
        match token {
            Ok(token) => tokens.push((token, span)),
            Err(LexError::UnterminatedComment) => {
                return Err(ParseError::at(
                    engine,
                    source,
                    span.start,
                    format!("unterminated comment '{}'", &source[span]),
                ));
            }
            Err(LexError::UnexpectedCharacter) => {
                let found = source[span.clone()].chars().next().unwrap_or_default();
                return Err(ParseError::at(
                    engine,
                    source,
                    span.start,
                    format!("unexpected character '{}'", found.escape_debug()),
                ));
            }
        }
    }
    Ok(tokens)
}

/// A position in a token stream, with error reporting against the source.
pub(crate) struct Cursor<'s, T> {
    engine: &'static str,
    source: &'s str,
    tokens: Vec<(T, Span)>,
    pos: usize,
    depth: usize,
}

impl<'s, T: PartialEq> Cursor<'s, T> {
    pub(crate) fn new(engine: &'static str, source: &'s str, tokens: Vec<(T, Span)>) -> Self {
        Self {
            engine,
            source,
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Enters one bracket level, failing past [`MAX_NESTING`].
    pub(crate) fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth == MAX_NESTING {
            return Err(self.error_at(
                self.span().start,
                format!("nesting exceeds {MAX_NESTING} levels"),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Leaves a bracket level opened by [`Cursor::enter`].
    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn peek(&self) -> Option<&T> {
        self.peek_nth(0)
    }

    pub(crate) fn peek_nth(&self, n: usize) -> Option<&T> {
        self.tokens.get(self.pos + n).map(|(token, _)| token)
    }

    pub(crate) fn is_done(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Span of the current token, or an empty span at end of input.
    pub(crate) fn span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map_or(self.source.len()..self.source.len(), |(_, span)| span.clone())
    }

    /// Consumes the current token.
    pub(crate) fn bump(&mut self) -> Option<(&T, Span)> {
        let (token, span) = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some((token, span.clone()))
    }

    /// Consumes the current token if it equals `token`.
    pub(crate) fn eat(&mut self, token: &T) -> Option<Span> {
        if self.peek() == Some(token) {
            self.bump().map(|(_, span)| span)
        } else {
            None
        }
    }

    /// Consumes `token` or fails with "expected {what}".
    pub(crate) fn expect(&mut self, token: &T, what: &str) -> Result<Span, ParseError> {
        match self.eat(token) {
            Some(span) => Ok(span),
            None => Err(self.unexpected(what)),
        }
    }

    /// An error at the current token: "expected {what}, found ...".
    pub(crate) fn unexpected(&self, what: &str) -> ParseError {
        let span = self.span();
        let found = if self.is_done() {
            "end of input".to_owned()
        } else {
            format!("'{}'", &self.source[span.clone()])
        };
        ParseError::at(
            self.engine,
            self.source,
            span.start,
            format!("expected {what}, found {found}"),
        )
    }

    pub(crate) fn error_at(&self, offset: usize, message: impl Into<String>) -> ParseError {
        ParseError::at(self.engine, self.source, offset, message)
    }
}

fn span_of(nodes: &[ParsedRule]) -> Option<Span> {
    let start = nodes.first()?.annotations.span.as_ref()?.start;
    let end = nodes.last()?.annotations.span.as_ref()?.end;
    Some(start..end)
}

/// A leaf node.
pub(crate) fn leaf(kind: RuleKind, name: impl Into<String>, span: Span) -> ParsedRule {
    ParsedRule::new(kind, name).with_span(span)
}

/// A single-child wrapper such as `optional` or `group`.
pub(crate) fn wrap(kind: RuleKind, owner: &str, child: ParsedRule, span: Span) -> ParsedRule {
    ParsedRule::new(kind, owner)
        .with_children(vec![child])
        .with_span(span)
}

/// A sequence, collapsed to its only item when there is one.
pub(crate) fn sequence(owner: &str, mut items: Vec<ParsedRule>) -> ParsedRule {
    if items.len() == 1 {
        if let Some(item) = items.pop() {
            return item;
        }
    }
    let span = span_of(&items);
    let node = ParsedRule::new(RuleKind::Sequence, owner).with_children(items);
    match span {
        Some(span) => node.with_span(span),
        None => node,
    }
}

/// A choice, collapsed to its only alternative when there is one.
pub(crate) fn choice(owner: &str, mut alternatives: Vec<ParsedRule>) -> ParsedRule {
    if alternatives.len() == 1 {
        if let Some(alternative) = alternatives.pop() {
            return alternative;
        }
    }
    mark_unique_alternatives(&mut alternatives);
    let span = span_of(&alternatives);
    let node = ParsedRule::new(RuleKind::Choice, owner).with_children(alternatives);
    match span {
        Some(span) => node.with_span(span),
        None => node,
    }
}

/// A top-level declaration. The body's sequence items become its children.
pub(crate) fn declaration(name: &str, mut body: ParsedRule, span: Span) -> ParsedRule {
    let children = if body.kind == RuleKind::Sequence {
        std::mem::take(&mut body.children)
    } else {
        vec![body]
    };
    ParsedRule::new(RuleKind::Rule, name)
        .with_children(children)
        .with_span(span)
}

/// The literal an alternative must start with, if it is fixed.
fn leading_literal(node: &ParsedRule) -> Option<&str> {
    let mut node = node;
    loop {
        match node.kind {
            RuleKind::Terminal => return Some(&node.name),
            RuleKind::Sequence | RuleKind::Group | RuleKind::Repetition1 => {
                node = node.children.first()?;
            }
            _ => return None,
        }
    }
}

fn mark_unique_alternatives(alternatives: &mut [ParsedRule]) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for alternative in alternatives.iter() {
        if let Some(literal) = leading_literal(alternative) {
            *counts.entry(literal.to_owned()).or_default() += 1;
        }
    }
    for alternative in alternatives.iter_mut() {
        let unique = leading_literal(alternative).is_some_and(|literal| counts[literal] == 1);
        alternative.annotations.unique_match = unique;
    }
}

/// Collects declarations into a tree, rejecting duplicates and empty grammars.
pub(crate) fn collect_rules<T: PartialEq>(
    cursor: &Cursor<'_, T>,
    rules: Vec<ParsedRule>,
) -> Result<RuleTree, ParseError> {
    if rules.is_empty() {
        return Err(cursor.error_at(0, "grammar declares no rules"));
    }
    let mut tree = RuleTree::new();
    for rule in rules {
        if let Err(duplicate) = tree.insert(rule) {
            let offset = duplicate.annotations.span.as_ref().map_or(0, |span| span.start);
            return Err(cursor.error_at(
                offset,
                format!("rule '{}' is declared more than once", duplicate.name),
            ));
        }
    }
    Ok(tree)
}
