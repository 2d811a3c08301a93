//! Classical BNF.
//!
//! ```text
//! <syntax>     ::= <rule> | <rule> <syntax>
//! <rule>       ::= <name> "::=" <expression>
//! <expression> ::= <list> | <list> "|" <expression>
//! <list>       ::= <term> | <term> <list>
//! <term>       ::= <name> | <literal>
//! ```
//!
//! A rule runs until the next `<name> ::=`. `;` starts a line comment.

use super::{choice, collect_rules, declaration, leaf, lex, sequence, Cursor, GrammarEngine, LexError};
use crate::error::ParseError;
use crate::tree::{ParsedRule, RuleKind, RuleTree};
use logos::Logos;

const NAME: &str = "bnf";

/// Reader for classical BNF.
#[derive(Debug, Clone, Copy, Default)]
pub struct BnfEngine;

impl GrammarEngine for BnfEngine {
    fn name(&self) -> &'static str {
        NAME
    }

    fn parse(&self, source: &str) -> Result<RuleTree, ParseError> {
        let tokens = lex::<Token>(NAME, source)?;
        let mut cursor = Cursor::new(NAME, source, tokens);
        let mut rules = Vec::new();
        while !cursor.is_done() {
            rules.push(rule(&mut cursor)?);
        }
        collect_rules(&cursor, rules)
    }
}

fn unquote(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_owned()
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r";[^\n]*")]
enum Token {
    #[token("::=")]
    Define,
    #[token("|")]
    Pipe,
    #[regex(r"<[^<>\r\n]+>", |lex| unquote(lex).trim().to_owned())]
    Name(String),
    #[regex(r#""[^"\r\n]*""#, unquote)]
    #[regex(r"'[^'\r\n]*'", unquote)]
    Literal(String),
}

fn at_rule_start(cursor: &Cursor<'_, Token>) -> bool {
    matches!(cursor.peek(), Some(Token::Name(_))) && cursor.peek_nth(1) == Some(&Token::Define)
}

fn rule(cursor: &mut Cursor<'_, Token>) -> Result<ParsedRule, ParseError> {
    let start = cursor.span().start;
    let name = match cursor.peek() {
        Some(Token::Name(name)) => name.clone(),
        _ => return Err(cursor.unexpected("a rule name such as <rule>")),
    };
    cursor.bump();
    cursor.expect(&Token::Define, "'::='")?;

    let mut alternatives = vec![list(cursor, &name)?];
    while cursor.eat(&Token::Pipe).is_some() {
        alternatives.push(list(cursor, &name)?);
    }
    let body = choice(&name, alternatives);
    let end = body.annotations.span.as_ref().map_or(start, |span| span.end);
    Ok(declaration(&name, body, start..end))
}

fn list(cursor: &mut Cursor<'_, Token>, owner: &str) -> Result<ParsedRule, ParseError> {
    let mut items = Vec::new();
    while !at_rule_start(cursor) {
        let span = cursor.span();
        let node = match cursor.peek() {
            Some(Token::Name(name)) => leaf(RuleKind::NonTerminal, name.clone(), span),
            Some(Token::Literal(text)) => leaf(RuleKind::Terminal, text.clone(), span),
            _ => break,
        };
        cursor.bump();
        items.push(node);
    }
    if items.is_empty() {
        return Err(cursor.unexpected("a <name> or quoted literal"));
    }
    Ok(sequence(owner, items))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(node: &ParsedRule) -> Vec<(RuleKind, &str)> {
        node.children
            .iter()
            .map(|child| (child.kind, child.name.as_str()))
            .collect()
    }

    #[test]
    fn test_parse_postal_address_fragment() {
        let tree = BnfEngine
            .parse(
                r#"
                ; a classic
                <postal-address> ::= <name-part> <street-address> <zip-part>
                <zip-part>       ::= <town-name> "," <state-code> <ZIP-code> <EOL>
                <opt-apt-num>    ::= <apt-num> | ""
                "#,
            )
            .unwrap();

        let order: Vec<_> = tree.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(order, ["postal-address", "zip-part", "opt-apt-num"]);

        let zip = tree.get("zip-part").unwrap();
        assert_eq!(
            names(zip),
            [
                (RuleKind::NonTerminal, "town-name"),
                (RuleKind::Terminal, ","),
                (RuleKind::NonTerminal, "state-code"),
                (RuleKind::NonTerminal, "ZIP-code"),
                (RuleKind::NonTerminal, "EOL"),
            ]
        );

        let apt = tree.get("opt-apt-num").unwrap();
        assert_eq!(apt.children.len(), 1);
        assert_eq!(apt.children[0].kind, RuleKind::Choice);
        assert_eq!(
            names(&apt.children[0]),
            [(RuleKind::NonTerminal, "apt-num"), (RuleKind::Terminal, "")]
        );
    }

    #[test]
    fn test_rule_span_ends_at_last_item() {
        let source = "<a> ::= 'x' 'y'\n<b> ::= <a>\n";
        let tree = BnfEngine.parse(source).unwrap();
        assert_eq!(tree.get("a").unwrap().annotations.span, Some(0..15));
    }

    #[test]
    fn test_empty_alternative_is_an_error() {
        let err = BnfEngine.parse("<a> ::= 'x' |\n<b> ::= 'y'").unwrap_err();
        assert_eq!(err.message, "expected a <name> or quoted literal, found '<b>'");
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_missing_definition_operator() {
        let err = BnfEngine.parse("<a> 'x'").unwrap_err();
        assert_eq!(err.message, "expected '::=', found ''x''");
    }
}
