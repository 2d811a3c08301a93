//! Core types for representing parsed grammar rules.
//!
//! A grammar engine produces a [`RuleTree`] of [`ParsedRule`] working nodes,
//! which still carry parse-time [`Annotations`]. The sanitizer maps those onto
//! [`RuleNode`], the annotation-free shape that ends up in generated code.

use facet::Facet;
use indexmap::IndexMap;
use std::ops::Range;

/// The enumeration of all node kinds a grammar engine can produce.
///
/// Each variant corresponds to one of the `type` strings written into the
/// generated rule table. The set is closed: emitters and consumers can match
/// on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Facet)]
#[repr(u8)]
pub enum RuleKind {
    /// A top-level rule declaration.
    #[facet(rename = "rule")]
    Rule,
    /// A literal string token.
    #[facet(rename = "terminal")]
    Terminal,
    /// A reference to another named rule.
    #[facet(rename = "non_terminal")]
    NonTerminal,
    /// A character class or hex character token.
    #[facet(rename = "pattern")]
    Pattern,
    /// A sequential composition of child rules.
    #[facet(rename = "sequence")]
    Sequence,
    /// A rule that matches one of several alternatives.
    #[facet(rename = "choice")]
    Choice,
    /// A zero-or-one occurrence of a rule.
    #[facet(rename = "optional")]
    Optional,
    /// A zero-or-more repetition of a rule.
    #[facet(rename = "repetition")]
    Repetition,
    /// A one-or-more repetition of a rule.
    #[facet(rename = "repetition1")]
    Repetition1,
    /// A parenthesised sub-expression.
    #[facet(rename = "group")]
    Group,
    /// A match of the first child that does not match the second.
    #[facet(rename = "exclusion")]
    Exclusion,
}

impl RuleKind {
    /// Returns the canonical string name of this rule kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::Rule => "rule",
            RuleKind::Terminal => "terminal",
            RuleKind::NonTerminal => "non_terminal",
            RuleKind::Pattern => "pattern",
            RuleKind::Sequence => "sequence",
            RuleKind::Choice => "choice",
            RuleKind::Optional => "optional",
            RuleKind::Repetition => "repetition",
            RuleKind::Repetition1 => "repetition1",
            RuleKind::Group => "group",
            RuleKind::Exclusion => "exclusion",
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata that only means something while a grammar is being parsed.
///
/// None of it is part of the grammar's static definition, and none of it may
/// reach the generated output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    /// Byte range of the node in the grammar source.
    pub span: Option<Range<usize>>,

    /// Set on a choice alternative when it is the only alternative starting
    /// with its leading literal.
    pub unique_match: bool,
}

impl Annotations {
    /// Returns `true` if no annotation is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.span.is_none() && !self.unique_match
    }
}

/// A working rule node, as produced by a grammar engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRule {
    /// Rule name, literal text, referenced rule, or owning rule (see [`RuleKind`]).
    pub name: String,

    /// The kind of node.
    pub kind: RuleKind,

    /// Ordered child nodes.
    pub children: Vec<ParsedRule>,

    /// Parse-time metadata.
    pub annotations: Annotations,
}

impl ParsedRule {
    /// Creates a childless node without annotations.
    #[must_use]
    pub fn new(kind: RuleKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            children: Vec::new(),
            annotations: Annotations::default(),
        }
    }

    /// Replaces the children of this node.
    #[must_use]
    pub fn with_children(mut self, children: Vec<ParsedRule>) -> Self {
        self.children = children;
        self
    }

    /// Records the source span of this node.
    #[must_use]
    pub fn with_span(mut self, span: Range<usize>) -> Self {
        self.annotations.span = Some(span);
        self
    }

    /// Returns the maximum nesting depth below and including this node.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        deepest
    }

    /// Returns the number of nodes below and including this node.
    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

// Children are released from a heap stack so dropping a deep tree does not
// recurse once per level.
impl Drop for ParsedRule {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// An annotation-free rule node, the shape written into generated code.
///
/// Field order (`name`, `type`, `children`) is the canonical order used by the
/// emitter.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct RuleNode {
    /// Rule name, literal text, referenced rule, or owning rule.
    pub name: String,

    /// The discriminant identifying what kind of node this is.
    #[facet(rename = "type")]
    pub kind: RuleKind,

    /// Ordered child nodes.
    pub children: Vec<RuleNode>,
}

impl RuleNode {
    /// Creates a node from its parts.
    #[must_use]
    pub fn new(kind: RuleKind, name: impl Into<String>, children: Vec<RuleNode>) -> Self {
        Self {
            name: name.into(),
            kind,
            children,
        }
    }
}

impl Drop for RuleNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// The top-level rules of a grammar, in declaration order.
///
/// Rule names are unique; [`RuleTree::insert`] refuses a second declaration of
/// the same name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleTree {
    rules: IndexMap<String, ParsedRule>,
}

impl RuleTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a top-level rule, keyed by its name.
    ///
    /// # Errors
    ///
    /// Gives the rule back if a rule of the same name is already present.
    pub fn insert(&mut self, rule: ParsedRule) -> Result<(), ParsedRule> {
        if self.rules.contains_key(&rule.name) {
            return Err(rule);
        }
        self.rules.insert(rule.name.clone(), rule);
        Ok(())
    }

    /// Looks up a top-level rule by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParsedRule> {
        self.rules.get(name)
    }

    /// Number of top-level rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the tree holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates over the top-level rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ParsedRule> {
        self.rules.values()
    }

    /// Consumes the tree, yielding the top-level rules in declaration order.
    pub fn into_rules(self) -> impl Iterator<Item = ParsedRule> {
        self.rules.into_values()
    }
}
