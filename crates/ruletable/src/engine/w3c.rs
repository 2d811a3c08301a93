//! W3C EBNF, the notation of the XML 1.0 specification.
//!
//! ```text
//! [1] rule    ::= Name '::=' choice
//! [2] choice  ::= seq ( '|' seq )*
//! [3] seq     ::= diff+
//! [4] diff    ::= postfix ( '-' postfix )?
//! [5] postfix ::= primary ( '?' | '*' | '+' )?
//! [6] primary ::= Name | Literal | CharClass | HexChar | '(' choice ')'
//! ```
//!
//! Rule numbers like `[1]` are accepted and ignored. `[...]` character
//! classes and `#xN` characters become `pattern` nodes holding their source
//! text. Comments are `/* ... */`.

use super::{
    block_comment, choice, collect_rules, declaration, leaf, lex, sequence, wrap, Cursor,
    GrammarEngine, LexError,
};
use crate::error::ParseError;
use crate::tree::{ParsedRule, RuleKind, RuleTree};
use logos::{FilterResult, Logos};

const NAME: &str = "w3c-ebnf";

/// Reader for W3C EBNF.
#[derive(Debug, Clone, Copy, Default)]
pub struct W3cEngine;

impl GrammarEngine for W3cEngine {
    fn name(&self) -> &'static str {
        NAME
    }

    fn parse(&self, source: &str) -> Result<RuleTree, ParseError> {
        let tokens = lex::<Token>(NAME, source)?;
        let mut parser = Parser {
            cursor: Cursor::new(NAME, source, tokens),
            owner: String::new(),
        };
        let mut rules = Vec::new();
        while !parser.cursor.is_done() {
            rules.push(parser.rule()?);
        }
        collect_rules(&parser.cursor, rules)
    }
}

fn unquote(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_owned()
}

fn comment(lex: &mut logos::Lexer<Token>) -> FilterResult<(), LexError> {
    block_comment(lex, "*/")
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Token {
    #[token("/*", comment)]
    Comment,
    #[token("::=")]
    Define,
    #[token("|")]
    Pipe,
    #[token("-")]
    Minus,
    #[token("?")]
    Question,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[regex(r"[A-Za-z_][A-Za-z0-9_.\-]*", |lex| lex.slice().to_owned())]
    Name(String),
    #[regex(r#""[^"]*""#, unquote)]
    #[regex(r"'[^']*'", unquote)]
    Literal(String),
    #[regex(r"\[[0-9]+\]", |lex| lex.slice().to_owned(), priority = 10)]
    Label(String),
    #[regex(r"\[[^\]\r\n]*\]", |lex| lex.slice().to_owned())]
    #[regex(r"#x[0-9A-Fa-f]+", |lex| lex.slice().to_owned())]
    Pattern(String),
}

struct Parser<'s> {
    cursor: Cursor<'s, Token>,
    owner: String,
}

impl Parser<'_> {
    fn at_rule_start(&self) -> bool {
        let name_at = usize::from(matches!(self.cursor.peek(), Some(Token::Label(_))));
        matches!(self.cursor.peek_nth(name_at), Some(Token::Name(_)))
            && self.cursor.peek_nth(name_at + 1) == Some(&Token::Define)
    }

    fn rule(&mut self) -> Result<ParsedRule, ParseError> {
        let start = self.cursor.span().start;
        if matches!(self.cursor.peek(), Some(Token::Label(_))) {
            self.cursor.bump();
        }
        let name = match self.cursor.peek() {
            Some(Token::Name(name)) => name.clone(),
            _ => return Err(self.cursor.unexpected("a rule name")),
        };
        self.cursor.bump();
        self.owner.clone_from(&name);
        self.cursor.expect(&Token::Define, "'::='")?;
        let body = self.choice()?;
        let end = body.annotations.span.as_ref().map_or(start, |span| span.end);
        Ok(declaration(&name, body, start..end))
    }

    fn choice(&mut self) -> Result<ParsedRule, ParseError> {
        let mut alternatives = vec![self.seq()?];
        while self.cursor.eat(&Token::Pipe).is_some() {
            alternatives.push(self.seq()?);
        }
        Ok(choice(&self.owner, alternatives))
    }

    fn starts_primary(&self) -> bool {
        !self.at_rule_start()
            && matches!(
                self.cursor.peek(),
                Some(
                    Token::Name(_)
                        | Token::Literal(_)
                        | Token::Pattern(_)
                        | Token::Label(_)
                        | Token::LParen
                )
            )
    }

    fn seq(&mut self) -> Result<ParsedRule, ParseError> {
        let mut items = vec![self.diff()?];
        while self.starts_primary() {
            items.push(self.diff()?);
        }
        Ok(sequence(&self.owner, items))
    }

    fn diff(&mut self) -> Result<ParsedRule, ParseError> {
        let left = self.postfix()?;
        if self.cursor.eat(&Token::Minus).is_none() {
            return Ok(left);
        }
        let right = self.postfix()?;
        let start = left.annotations.span.as_ref().map_or(0, |span| span.start);
        let end = right.annotations.span.as_ref().map_or(start, |span| span.end);
        Ok(ParsedRule::new(RuleKind::Exclusion, self.owner.clone())
            .with_children(vec![left, right])
            .with_span(start..end))
    }

    fn postfix(&mut self) -> Result<ParsedRule, ParseError> {
        let node = self.primary()?;
        let kind = match self.cursor.peek() {
            Some(Token::Question) => RuleKind::Optional,
            Some(Token::Star) => RuleKind::Repetition,
            Some(Token::Plus) => RuleKind::Repetition1,
            _ => return Ok(node),
        };
        let end = self.cursor.span().end;
        self.cursor.bump();
        let start = node.annotations.span.as_ref().map_or(end, |span| span.start);
        Ok(wrap(kind, &self.owner, node, start..end))
    }

    fn primary(&mut self) -> Result<ParsedRule, ParseError> {
        let span = self.cursor.span();
        let node = match self.cursor.peek() {
            Some(Token::Name(name)) => leaf(RuleKind::NonTerminal, name.clone(), span),
            Some(Token::Literal(text)) => leaf(RuleKind::Terminal, text.clone(), span),
            Some(Token::Pattern(text) | Token::Label(text)) => {
                leaf(RuleKind::Pattern, text.clone(), span)
            }
            Some(Token::LParen) => {
                self.cursor.enter()?;
                self.cursor.bump();
                let inner = self.choice()?;
                let end = self.cursor.expect(&Token::RParen, "')'")?.end;
                self.cursor.leave();
                return Ok(wrap(RuleKind::Group, &self.owner, inner, span.start..end));
            }
            _ => return Err(self.cursor.unexpected("a name, literal, character class or '('")),
        };
        self.cursor.bump();
        Ok(node)
    }
}
