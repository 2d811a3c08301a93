//! The default notation: ISO-style EBNF.
//!
//! ```text
//! expr    ::= term , { "|" , term } ;
//! term    ::= factor , { [ "," ] , factor } ;
//! factor  ::= primary , { "?" | "*" | "+" } ;
//! primary ::= name | literal | "(" expr ")" | "[" expr "]" | "{" expr "}" ;
//! ```
//!
//! Rules end with `;` and may use `=` instead of `::=`. Comments are
//! `(* ... *)` or `// ...`. Brackets nest at most
//! [`MAX_NESTING`](super::MAX_NESTING) levels deep.

use super::{
    block_comment, choice, collect_rules, declaration, leaf, lex, sequence, wrap, Cursor,
    GrammarEngine, LexError,
};
use crate::error::ParseError;
use crate::tree::{ParsedRule, RuleKind, RuleTree};
use logos::{FilterResult, Logos};

const NAME: &str = "custom";

/// Reader for the ISO-style EBNF notation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomEngine;

impl GrammarEngine for CustomEngine {
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
    block_comment(lex, "*)")
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
enum Token {
    #[token("(*", comment)]
    Comment,
    #[token("::=")]
    #[token("=")]
    Define,
    #[token("|")]
    Pipe,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("?")]
    Question,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[regex(r"[A-Za-z_][A-Za-z0-9_\-]*", |lex| lex.slice().to_owned())]
    Name(String),
    #[regex(r#""[^"\r\n]*""#, unquote)]
    #[regex(r"'[^'\r\n]*'", unquote)]
    Literal(String),
}

struct Parser<'s> {
    cursor: Cursor<'s, Token>,
    owner: String,
}

impl Parser<'_> {
    fn rule(&mut self) -> Result<ParsedRule, ParseError> {
        let start = self.cursor.span().start;
        let name = match self.cursor.peek() {
            Some(Token::Name(name)) => name.clone(),
            _ => return Err(self.cursor.unexpected("a rule name")),
        };
        self.cursor.bump();
        self.owner.clone_from(&name);
        self.cursor.expect(&Token::Define, "'::=' or '='")?;
        let body = self.expr()?;
        let end = self.cursor.expect(&Token::Semi, "';'")?.end;
        Ok(declaration(&name, body, start..end))
    }

    fn expr(&mut self) -> Result<ParsedRule, ParseError> {
        let mut alternatives = vec![self.term()?];
        while self.cursor.eat(&Token::Pipe).is_some() {
            alternatives.push(self.term()?);
        }
        Ok(choice(&self.owner, alternatives))
    }

    fn term(&mut self) -> Result<ParsedRule, ParseError> {
        let mut items = vec![self.factor()?];
        while self.cursor.eat(&Token::Comma).is_some() || self.starts_factor() {
            items.push(self.factor()?);
        }
        Ok(sequence(&self.owner, items))
    }

    fn starts_factor(&self) -> bool {
        match self.cursor.peek() {
            // `name ::=` opens the next rule: the current one is missing its `;`.
            Some(Token::Name(_)) => self.cursor.peek_nth(1) != Some(&Token::Define),
            Some(Token::Literal(_) | Token::LParen | Token::LBracket | Token::LBrace) => true,
            _ => false,
        }
    }

    fn factor(&mut self) -> Result<ParsedRule, ParseError> {
        let mut node = self.primary()?;
        loop {
            let kind = match self.cursor.peek() {
                Some(Token::Question) => RuleKind::Optional,
                Some(Token::Star) => RuleKind::Repetition,
                Some(Token::Plus) => RuleKind::Repetition1,
                _ => return Ok(node),
            };
            let end = self.cursor.span().end;
            self.cursor.bump();
            let start = node.annotations.span.as_ref().map_or(end, |span| span.start);
            node = wrap(kind, &self.owner, node, start..end);
        }
    }

    fn primary(&mut self) -> Result<ParsedRule, ParseError> {
        let span = self.cursor.span();
        let (kind, close, what) = match self.cursor.peek() {
            Some(Token::Name(name)) => {
                let node = leaf(RuleKind::NonTerminal, name.clone(), span);
                self.cursor.bump();
                return Ok(node);
            }
            Some(Token::Literal(text)) => {
                let node = leaf(RuleKind::Terminal, text.clone(), span);
                self.cursor.bump();
                return Ok(node);
            }
            Some(Token::LParen) => (RuleKind::Group, Token::RParen, "')'"),
            Some(Token::LBracket) => (RuleKind::Optional, Token::RBracket, "']'"),
            Some(Token::LBrace) => (RuleKind::Repetition, Token::RBrace, "'}'"),
            _ => return Err(self.cursor.unexpected("a name, literal or bracket")),
        };
        self.cursor.enter()?;
        self.cursor.bump();
        let inner = self.expr()?;
        let end = self.cursor.expect(&close, what)?.end;
        self.cursor.leave();
        Ok(wrap(kind, &self.owner, inner, span.start..end))
    }
}
