// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Hand-written recursive-descent parser for the boolean query grammar
//! (`spec.md` §4.4):
//!
//! ```text
//! query   := orExpr
//! orExpr  := andExpr ("OR" andExpr)*
//! andExpr := term ("AND"? term)*      -- adjacency implies AND
//! term    := exact | word | '(' orExpr ')'
//! exact   := '"' <chars except '"'> '"'
//! word    := <chars except whitespace, '"', '(', ')'>
//! ```
//!
//! No parser-combinator crate is pulled in: the grammar is three productions
//! deep and doesn't justify the dependency. Two distinct failure modes are
//! represented, deliberately not conflated:
//!
//! - a genuinely malformed query (unterminated quote, dangling operator,
//!   mismatched parenthesis) fails the whole parse, returning `None` from
//!   [`parse`] — per `spec.md` §7 this degrades to an empty result set
//!   rather than surfacing to the caller;
//! - an empty exact phrase (`""`) is dropped silently, per `spec.md` §4.4
//!   ("Empty exact strings are dropped"): `parse("Hello AND \"\"")` still
//!   succeeds, collapsing to just `{word: Hello}`, not `None`.

use super::Expr;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    /// A non-empty quoted phrase.
    Exact(String),
    /// `""` — parses cleanly but contributes nothing to the tree.
    EmptyExact,
    And,
    Or,
    LParen,
    RParen,
}

fn lex(input: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '(' {
            chars.next();
            tokens.push(Token::LParen);
            continue;
        }
        if c == ')' {
            chars.next();
            tokens.push(Token::RParen);
            continue;
        }
        if c == '"' {
            chars.next();
            let mut buf = String::new();
            let mut closed = false;
            while let Some(c) = chars.next() {
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        buf.push(escaped);
                    }
                    continue;
                }
                if c == '"' {
                    closed = true;
                    break;
                }
                buf.push(c);
            }
            if !closed {
                return None;
            }
            tokens.push(if buf.is_empty() { Token::EmptyExact } else { Token::Exact(buf) });
            continue;
        }
        let mut buf = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() || c == '"' || c == '(' || c == ')' {
                break;
            }
            buf.push(c);
            chars.next();
        }
        match buf.as_str() {
            "AND" => tokens.push(Token::And),
            "OR" => tokens.push(Token::Or),
            _ => tokens.push(Token::Word(buf)),
        }
    }
    Some(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

/// `Ok(Some(_))` is a real subtree; `Ok(None)` is a clean drop (an empty
/// exact phrase, or a group that reduced to nothing); `Err(())` is a hard
/// parse failure that aborts the whole query.
type PResult = Result<Option<Expr>, ()>;

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn starts_term(tok: Option<&Token>) -> bool {
        matches!(
            tok,
            Some(Token::Word(_)) | Some(Token::Exact(_)) | Some(Token::EmptyExact) | Some(Token::LParen)
        )
    }

    fn parse_or(&mut self) -> PResult {
        let mut parts = Vec::new();
        if let Some(e) = self.parse_and()? {
            parts.push(e);
        }
        while matches!(self.peek(), Some(Token::Or)) {
            self.bump();
            if let Some(e) = self.parse_and()? {
                parts.push(e);
            }
        }
        Ok(collapse(parts, Expr::Or as fn(Vec<Expr>) -> Expr))
    }

    fn parse_and(&mut self) -> PResult {
        let mut parts = Vec::new();
        if let Some(e) = self.parse_term()? {
            parts.push(e);
        }
        loop {
            match self.peek() {
                Some(Token::And) => {
                    self.bump();
                    if let Some(e) = self.parse_term()? {
                        parts.push(e);
                    }
                }
                tok if Self::starts_term(tok) => {
                    if let Some(e) = self.parse_term()? {
                        parts.push(e);
                    }
                }
                _ => break,
            }
        }
        Ok(collapse(parts, Expr::And as fn(Vec<Expr>) -> Expr))
    }

    fn parse_term(&mut self) -> PResult {
        match self.bump().ok_or(())? {
            Token::Word(w) => Ok(Some(Expr::Word(w))),
            Token::Exact(w) => Ok(Some(Expr::Exact(w))),
            Token::EmptyExact => Ok(None),
            Token::LParen => {
                let inner = self.parse_or()?;
                match self.bump() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(()),
                }
            }
            Token::And | Token::Or | Token::RParen => Err(()),
        }
    }
}

/// Collapse a list of subtrees per `spec.md` §4.4: zero children is absent,
/// one child replaces the wrapping node, two or more keep the combinator.
fn collapse(mut parts: Vec<Expr>, make: fn(Vec<Expr>) -> Expr) -> Option<Expr> {
    match parts.len() {
        0 => None,
        1 => parts.pop(),
        _ => Some(make(parts)),
    }
}

/// Parse `input` into an [`Expr`] tree, or `None` if it is empty, malformed
/// (unterminated quote, dangling `AND`/`OR`, mismatched parenthesis), or
/// reduces to nothing once empty exact phrases are dropped.
pub fn parse(input: &str) -> Option<Expr> {
    let tokens = lex(input)?;
    if tokens.is_empty() {
        return None;
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or().ok()?;
    if parser.pos != parser.tokens.len() {
        return None;
    }
    expr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_word() {
        assert_eq!(parse("rust"), Some(Expr::Word("rust".to_string())));
    }

    #[test]
    fn exact_phrase() {
        assert_eq!(parse("\"hello world\""), Some(Expr::Exact("hello world".to_string())));
    }

    #[test]
    fn implicit_and_by_adjacency() {
        assert_eq!(
            parse("rust lang"),
            Some(Expr::And(vec![
                Expr::Word("rust".to_string()),
                Expr::Word("lang".to_string())
            ]))
        );
    }

    #[test]
    fn explicit_and() {
        assert_eq!(
            parse("rust AND lang"),
            Some(Expr::And(vec![
                Expr::Word("rust".to_string()),
                Expr::Word("lang".to_string())
            ]))
        );
    }

    #[test]
    fn or_binds_looser_than_and() {
        assert_eq!(
            parse("rust lang OR python"),
            Some(Expr::Or(vec![
                Expr::And(vec![Expr::Word("rust".to_string()), Expr::Word("lang".to_string())]),
                Expr::Word("python".to_string())
            ]))
        );
    }

    #[test]
    fn unterminated_quote_is_none() {
        assert_eq!(parse("\"rust lang"), None);
    }

    #[test]
    fn empty_input_is_none() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
    }

    #[test]
    fn dangling_operator_is_none() {
        assert_eq!(parse("rust OR"), None);
        assert_eq!(parse("AND rust"), None);
    }

    #[test]
    fn parenthesized_group() {
        assert_eq!(
            parse("a AND (b OR c)"),
            Some(Expr::And(vec![
                Expr::Word("a".to_string()),
                Expr::Or(vec![Expr::Word("b".to_string()), Expr::Word("c".to_string())]),
            ]))
        );
    }

    #[test]
    fn or_between_words() {
        assert_eq!(
            parse("Hello OR World"),
            Some(Expr::Or(vec![Expr::Word("Hello".to_string()), Expr::Word("World".to_string())]))
        );
    }

    #[test]
    fn implicit_and_two_words() {
        assert_eq!(
            parse("Hello World"),
            Some(Expr::And(vec![Expr::Word("Hello".to_string()), Expr::Word("World".to_string())]))
        );
    }

    #[test]
    fn empty_exact_is_dropped_not_a_parse_failure() {
        assert_eq!(parse("Hello AND \"\""), Some(Expr::Word("Hello".to_string())));
        assert_eq!(parse("\"\""), None);
    }

    #[test]
    fn mismatched_parens_are_none() {
        assert_eq!(parse("(a AND b"), None);
        assert_eq!(parse("a AND b)"), None);
        assert_eq!(parse(")"), None);
    }

    #[test]
    fn nested_groups() {
        assert_eq!(
            parse("(a OR (b AND c))"),
            Some(Expr::Or(vec![
                Expr::Word("a".to_string()),
                Expr::And(vec![Expr::Word("b".to_string()), Expr::Word("c".to_string())]),
            ]))
        );
    }

    #[test]
    fn escaped_quote_inside_exact_phrase() {
        assert_eq!(parse("\"say \\\"hi\\\"\""), Some(Expr::Exact("say \"hi\"".to_string())));
    }
}
