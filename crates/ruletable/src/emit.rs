//! Code generation: sanitized rules → TypeScript or JavaScript source.
//!
//! The generated module is laid out as:
//!
//! ```text
//! // Generated by ruletable. Do not edit by hand.
//! // Generated at: 2026-10-18T09:30:00Z
//! // Grammar source not embedded.
//!
//! import type { RuleTable } from "ruletable";
//!
//! export const rules: RuleTable = [
//!   {
//!     "name": "rule",
//!     "type": "rule",
//!     "children": [ ... ]
//!   }
//! ];
//! // end of generated rule table
//! ```
//!
//! The untyped form replaces the declaration with `const grammar = {};` and
//! `grammar.rules = [ ... ];`. Everything except the timestamp line is a pure
//! function of the rules, the export descriptor, and the embedded source.

use crate::dialect::{ExportDescriptor, OutputDialect};
use crate::tree::RuleNode;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

pub(crate) mod doc;
pub mod embed;

use doc::{Doc, Printer};
use embed::{source_block, SourceSnapshot};

/// First line of every generated file.
pub const BANNER: &str = "// Generated by ruletable. Do not edit by hand.";

/// Last line of every generated file.
pub const FOOTER: &str = "// end of generated rule table";

/// Prefix of the timestamp line, the only line that varies between runs.
pub const TIMESTAMP_PREFIX: &str = "// Generated at: ";

/// Module the typed declaration imports its type from.
pub const TYPE_MODULE: &str = "ruletable";

/// Name of the imported rule-array type.
pub const TYPE_NAME: &str = "RuleTable";

/// Name of the namespace object in untyped output.
pub const NAMESPACE: &str = "grammar";

/// Renders a complete generated module.
///
/// `source` is the grammar text to embed, or `None` for the placeholder.
#[must_use]
pub fn emit(
    rules: &[RuleNode],
    descriptor: &ExportDescriptor,
    source: Option<&SourceSnapshot>,
    generated_at: DateTime<Utc>,
) -> String {
    debug!(
        rules = rules.len(),
        symbol = descriptor.symbol(),
        dialect = ?descriptor.dialect(),
        embed_source = source.is_some(),
        "emitting rule table"
    );

    let mut docs = vec![
        Doc::text(BANNER),
        Doc::Line,
        Doc::text(format!(
            "{TIMESTAMP_PREFIX}{}",
            generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )),
        Doc::Line,
    ];
    docs.extend(source_block(source));
    docs.push(Doc::Line);

    let symbol = descriptor.symbol();
    match descriptor.dialect() {
        OutputDialect::Typed => {
            docs.push(Doc::text(format!(
                "import type {{ {TYPE_NAME} }} from \"{TYPE_MODULE}\";"
            )));
            docs.extend([Doc::Line, Doc::Line]);
            docs.push(Doc::text(format!("export const {symbol}: {TYPE_NAME} = ")));
        }
        OutputDialect::Untyped => {
            docs.push(Doc::text(format!("const {NAMESPACE} = {{}};")));
            docs.extend([Doc::Line, Doc::Line]);
            docs.push(Doc::text(format!("{NAMESPACE}.{symbol} = ")));
        }
    }
    rule_array(rules, &mut docs);
    docs.extend([Doc::text(";"), Doc::Line, Doc::text(FOOTER), Doc::Line]);

    Printer::new().print(&docs)
}

enum Step<'a> {
    Node { node: &'a RuleNode, last: bool },
    Emit(Doc),
}

fn push_nodes<'a>(stack: &mut Vec<Step<'a>>, nodes: &'a [RuleNode]) {
    let count = nodes.len();
    for (index, node) in nodes.iter().enumerate().rev() {
        stack.push(Step::Node {
            node,
            last: index + 1 == count,
        });
    }
}

/// Appends the array literal for `rules`, with no trailing line break.
///
/// Every node is rendered with the fields `name`, `type`, `children`, in that
/// order. Work is driven by an explicit stack.
fn rule_array(rules: &[RuleNode], docs: &mut Vec<Doc>) {
    if rules.is_empty() {
        docs.push(Doc::text("[]"));
        return;
    }
    docs.extend([Doc::text("["), Doc::Line, Doc::Indent]);

    let mut stack = vec![Step::Emit(Doc::text("]")), Step::Emit(Doc::Dedent)];
    push_nodes(&mut stack, rules);

    while let Some(step) = stack.pop() {
        let (node, last) = match step {
            Step::Emit(doc) => {
                docs.push(doc);
                continue;
            }
            Step::Node { node, last } => (node, last),
        };

        docs.extend([Doc::text("{"), Doc::Line, Doc::Indent]);
        docs.extend([Doc::str("name"), Doc::text(": "), Doc::str(&node.name)]);
        docs.extend([Doc::text(","), Doc::Line]);
        docs.extend([Doc::str("type"), Doc::text(": "), Doc::str(node.kind.as_str())]);
        docs.extend([Doc::text(","), Doc::Line]);
        docs.extend([Doc::str("children"), Doc::text(": ")]);

        // Closing steps are pushed first so they run after the children.
        stack.push(Step::Emit(Doc::Line));
        if !last {
            stack.push(Step::Emit(Doc::text(",")));
        }
        stack.push(Step::Emit(Doc::text("}")));
        stack.push(Step::Emit(Doc::Dedent));
        stack.push(Step::Emit(Doc::Line));

        if node.children.is_empty() {
            docs.push(Doc::text("[]"));
        } else {
            docs.extend([Doc::text("["), Doc::Line, Doc::Indent]);
            stack.push(Step::Emit(Doc::text("]")));
            stack.push(Step::Emit(Doc::Dedent));
            push_nodes(&mut stack, &node.children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::RuleKind;
    use chrono::TimeZone;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    fn ab_rule() -> Vec<RuleNode> {
        vec![RuleNode::new(
            RuleKind::Rule,
            "rule",
            vec![
                RuleNode::new(RuleKind::Terminal, "a", Vec::new()),
                RuleNode::new(RuleKind::Terminal, "b", Vec::new()),
            ],
        )]
    }

    const AB_ARRAY: &str = r#"[
  {
    "name": "rule",
    "type": "rule",
    "children": [
      {
        "name": "a",
        "type": "terminal",
        "children": []
      },
      {
        "name": "b",
        "type": "terminal",
        "children": []
      }
    ]
  }
];"#;

    #[test]
    fn test_emit_typed_module() {
        let descriptor = ExportDescriptor::new("rules", OutputDialect::Typed).unwrap();
        let output = emit(&ab_rule(), &descriptor, None, at(0));
        let expected = format!(
            "// Generated by ruletable. Do not edit by hand.\n\
             // Generated at: 1970-01-01T00:00:00Z\n\
             // Grammar source not embedded.\n\
             \n\
             import type {{ RuleTable }} from \"ruletable\";\n\
             \n\
             export const rules: RuleTable = {AB_ARRAY}\n\
             // end of generated rule table\n"
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn test_emit_untyped_module() {
        let descriptor = ExportDescriptor::new("G", OutputDialect::Untyped).unwrap();
        let output = emit(&ab_rule(), &descriptor, None, at(0));
        assert!(output.contains(&format!("const grammar = {{}};\n\ngrammar.G = {AB_ARRAY}\n")));
        assert!(!output.contains("import"));
        assert!(output.ends_with("// end of generated rule table\n"));
    }

    #[test]
    fn test_emit_differs_only_in_timestamp() {
        let descriptor = ExportDescriptor::new("rules", OutputDialect::Typed).unwrap();
        let source = SourceSnapshot::new("g.ebnf", "rule ::= \"a\" , \"b\" ;\n");
        let first = emit(&ab_rule(), &descriptor, Some(&source), at(0));
        let second = emit(&ab_rule(), &descriptor, Some(&source), at(86_400 * 365));

        assert_ne!(first, second);
        let differing: Vec<_> = first
            .lines()
            .zip(second.lines())
            .filter(|(a, b)| a != b)
            .collect();
        assert_eq!(differing.len(), 1);
        assert!(differing[0].0.starts_with(TIMESTAMP_PREFIX));
        assert_eq!(first.lines().count(), second.lines().count());
    }

    #[test]
    fn test_embedded_source_sits_between_banner_and_declaration() {
        let descriptor = ExportDescriptor::new("rules", OutputDialect::Untyped).unwrap();
        let source = SourceSnapshot::new("g.ebnf", "rule ::= \"a\" , \"b\" ;");
        let output = emit(&ab_rule(), &descriptor, Some(&source), at(0));
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[2], "// Grammar source: g.ebnf");
        assert_eq!(lines[3], "// rule ::= \"a\" , \"b\" ;");
        assert_eq!(lines[4], "// ----");
        assert_eq!(lines[6], "const grammar = {};");
    }

    #[test]
    fn test_emit_empty_rule_list() {
        let descriptor = ExportDescriptor::new("rules", OutputDialect::Untyped).unwrap();
        let output = emit(&[], &descriptor, None, at(0));
        assert!(output.contains("grammar.rules = [];\n"));
    }

    #[test]
    fn test_emit_escapes_literals() {
        let rules = vec![RuleNode::new(
            RuleKind::Rule,
            "quote",
            vec![RuleNode::new(RuleKind::Terminal, "\"\\\n", Vec::new())],
        )];
        let descriptor = ExportDescriptor::new("rules", OutputDialect::Typed).unwrap();
        let output = emit(&rules, &descriptor, None, at(0));
        assert!(output.contains(r#""name": "\"\\\n","#));
    }

    #[test]
    fn test_emit_deep_tree_without_truncation() {
        let depth = 1_000;
        let mut node = RuleNode::new(RuleKind::Terminal, "leaf", Vec::new());
        for _ in 1..depth {
            node = RuleNode::new(RuleKind::Group, "deep", vec![node]);
        }
        let descriptor = ExportDescriptor::new("rules", OutputDialect::Untyped).unwrap();
        let output = emit(std::slice::from_ref(&node), &descriptor, None, at(0));
        assert_eq!(output.matches("\"type\": \"group\"").count(), depth - 1);
        assert!(output.contains("\"name\": \"leaf\""));
    }
}
