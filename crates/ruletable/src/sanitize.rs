//! Removal of parse-time annotations.
//!
//! [`sanitize`] maps the engine's working nodes onto [`RuleNode`], which has
//! nowhere to put an annotation, so nothing parse-only can leak into generated
//! code. Both walks use an explicit stack: grammar nesting depth is bounded
//! only by memory, never by the call stack.

use crate::tree::{Annotations, ParsedRule, RuleKind, RuleNode, RuleTree};
use tracing::{debug, trace};

/// A node whose children are still being converted.
struct Frame {
    name: String,
    kind: RuleKind,
    pending: std::vec::IntoIter<ParsedRule>,
    done: Vec<RuleNode>,
}

impl Frame {
    fn open(mut rule: ParsedRule) -> Self {
        let children = std::mem::take(&mut rule.children);
        Self {
            name: std::mem::take(&mut rule.name),
            kind: rule.kind,
            done: Vec::with_capacity(children.len()),
            pending: children.into_iter(),
        }
    }

    fn close(self) -> RuleNode {
        RuleNode::new(self.kind, self.name, self.done)
    }
}

/// Converts one working node, and everything below it, into an emission node.
///
/// Children keep their order. The walk visits each node exactly once.
#[must_use]
pub fn sanitize_rule(rule: ParsedRule) -> RuleNode {
    let mut root = Frame::open(rule);
    let mut open: Vec<Frame> = Vec::new();
    loop {
        let top = open.last_mut().unwrap_or(&mut root);
        match top.pending.next() {
            Some(child) => open.push(Frame::open(child)),
            None => match open.pop() {
                Some(finished) => open
                    .last_mut()
                    .unwrap_or(&mut root)
                    .done
                    .push(finished.close()),
                None => return root.close(),
            },
        }
    }
}

/// Converts a whole rule tree into emission nodes, in declaration order.
#[must_use]
pub fn sanitize(tree: RuleTree) -> Vec<RuleNode> {
    debug!(rules = tree.len(), "sanitizing rule tree");
    tree.into_rules()
        .map(|rule| {
            trace!(rule = %rule.name, nodes = rule.node_count(), "converting rule");
            sanitize_rule(rule)
        })
        .collect()
}

/// Clears every annotation of a working node in place, pre-order.
///
/// Running it again on the same node changes nothing.
pub fn sanitize_in_place(rule: &mut ParsedRule) {
    let mut stack = vec![rule];
    while let Some(node) = stack.pop() {
        node.annotations = Annotations::default();
        stack.extend(node.children.iter_mut().rev());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotated(kind: RuleKind, name: &str, children: Vec<ParsedRule>) -> ParsedRule {
        let mut node = ParsedRule::new(kind, name)
            .with_children(children)
            .with_span(0..1);
        node.annotations.unique_match = true;
        node
    }

    /// A chain `depth` nodes deep with both annotations on the deepest node.
    fn chain(depth: usize) -> ParsedRule {
        let mut node = annotated(RuleKind::Terminal, "deepest", Vec::new());
        for _ in 1..depth {
            node = ParsedRule::new(RuleKind::Group, "r").with_children(vec![node]);
        }
        node
    }

    fn all_clean(rule: &ParsedRule) -> bool {
        let mut stack = vec![rule];
        while let Some(node) = stack.pop() {
            if !node.annotations.is_empty() {
                return false;
            }
            stack.extend(node.children.iter());
        }
        true
    }

    #[test]
    fn test_sanitize_rule_preserves_structure() {
        let rule = annotated(
            RuleKind::Rule,
            "r",
            vec![
                annotated(RuleKind::Terminal, "a", Vec::new()),
                annotated(
                    RuleKind::Choice,
                    "r",
                    vec![
                        annotated(RuleKind::NonTerminal, "x", Vec::new()),
                        annotated(RuleKind::NonTerminal, "y", Vec::new()),
                    ],
                ),
                annotated(RuleKind::Terminal, "b", Vec::new()),
            ],
        );

        let expected = RuleNode::new(
            RuleKind::Rule,
            "r",
            vec![
                RuleNode::new(RuleKind::Terminal, "a", Vec::new()),
                RuleNode::new(
                    RuleKind::Choice,
                    "r",
                    vec![
                        RuleNode::new(RuleKind::NonTerminal, "x", Vec::new()),
                        RuleNode::new(RuleKind::NonTerminal, "y", Vec::new()),
                    ],
                ),
                RuleNode::new(RuleKind::Terminal, "b", Vec::new()),
            ],
        );
        assert_eq!(sanitize_rule(rule), expected);
    }

    #[test]
    fn test_sanitize_leaf() {
        let leaf = annotated(RuleKind::Terminal, "x", Vec::new());
        assert_eq!(
            sanitize_rule(leaf),
            RuleNode::new(RuleKind::Terminal, "x", Vec::new())
        );
    }

    #[test]
    fn test_deepest_annotation_is_removed() {
        for depth in [1, 2, 64, 1_000] {
            let mut rule = chain(depth);
            sanitize_in_place(&mut rule);
            assert!(all_clean(&rule), "depth {depth}");
            assert_eq!(rule.depth(), depth);
        }
    }

    #[test]
    fn test_sanitize_handles_deep_nesting() {
        let depth = 200_000;
        let sanitized = sanitize_rule(chain(depth));

        let mut node = &sanitized;
        let mut seen = 1;
        while let Some(child) = node.children.first() {
            node = child;
            seen += 1;
        }
        assert_eq!(seen, depth);
        assert_eq!(node.name, "deepest");
        drop(sanitized);
    }

    #[test]
    fn test_sanitize_in_place_is_idempotent() {
        let mut once = chain(10);
        sanitize_in_place(&mut once);
        let mut twice = once.clone();
        sanitize_in_place(&mut twice);
        assert_eq!(once, twice);
        assert_eq!(sanitize_rule(once), sanitize_rule(twice));
    }

    #[test]
    fn test_sanitize_tree_keeps_declaration_order() {
        let mut tree = RuleTree::new();
        for name in ["b", "a", "c"] {
            tree.insert(annotated(RuleKind::Rule, name, Vec::new())).unwrap();
        }
        let names: Vec<_> = sanitize(tree).iter().map(|node| node.name.clone()).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }
}
