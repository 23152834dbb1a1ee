//! expression parser - converts selection expression text to the AST
//!
//! supports:
//! - logical operators: and, or, not (lowest to highest precedence)
//! - comparison operators: ==, !=, >, >=, <, <=, in, not in
//! - parentheses for grouping
//! - string, integer, float and boolean literals
//! - bare identifiers naming attributes

use super::types::{CompareOp, Expr};
use crate::attributes::AttrValue;

/// error type for parsing expressions
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    /// byte offset into the expression text
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at offset {})", self.message, self.position)
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Int(i64),
    Float(f64),
    Op(CompareOp),
    LParen,
    RParen,
    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "'{}'", s),
            Token::Str(s) => write!(f, "string {:?}", s),
            Token::Int(n) => write!(f, "number {}", n),
            Token::Float(n) => write!(f, "number {}", n),
            Token::Op(op) => write!(f, "'{}'", op),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::Eof => write!(f, "end of expression"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '(' || c == ')' {
            chars.next();
            let tok = if c == '(' { Token::LParen } else { Token::RParen };
            tokens.push((tok, pos));
            continue;
        }

        if c == '\'' || c == '"' {
            chars.next();
            let mut value = String::new();
            let mut closed = false;
            while let Some((_, ch)) = chars.next() {
                match ch {
                    '\\' => match chars.next() {
                        Some((_, 'n')) => value.push('\n'),
                        Some((_, 't')) => value.push('\t'),
                        Some((_, esc @ ('\\' | '\'' | '"'))) => value.push(esc),
                        Some((epos, other)) => {
                            return Err(ParseError::new(
                                format!("unknown escape '\\{}'", other),
                                epos,
                            ))
                        }
                        None => break,
                    },
                    ch if ch == c => {
                        closed = true;
                        break;
                    }
                    ch => value.push(ch),
                }
            }
            if !closed {
                return Err(ParseError::new("unterminated string", pos));
            }
            tokens.push((Token::Str(value), pos));
            continue;
        }

        if c.is_ascii_digit() || (c == '-' && next_is_digit(input, pos)) {
            chars.next();
            let mut end = pos + c.len_utf8();
            let mut is_float = false;
            while let Some(&(i, ch)) = chars.peek() {
                if ch.is_ascii_digit() || (ch == '.' && !is_float) {
                    is_float |= ch == '.';
                    chars.next();
                    end = i + ch.len_utf8();
                } else {
                    break;
                }
            }
            let text = &input[pos..end];
            let tok = if is_float {
                text.parse::<f64>()
                    .map(Token::Float)
                    .map_err(|_| ParseError::new(format!("invalid number '{}'", text), pos))?
            } else {
                text.parse::<i64>()
                    .map(Token::Int)
                    .map_err(|_| ParseError::new(format!("invalid number '{}'", text), pos))?
            };
            tokens.push((tok, pos));
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let mut end = pos;
            while let Some(&(i, ch)) = chars.peek() {
                if ch.is_alphanumeric() || ch == '_' {
                    chars.next();
                    end = i + ch.len_utf8();
                } else {
                    break;
                }
            }
            tokens.push((Token::Ident(input[pos..end].to_string()), pos));
            continue;
        }

        if "=!<>".contains(c) {
            chars.next();
            let mut sym = c.to_string();
            if let Some(&(_, '=')) = chars.peek() {
                chars.next();
                sym.push('=');
            }
            let op = CompareOp::parse(&sym).ok_or_else(|| {
                let hint = match sym.as_str() {
                    "=" => "; use '==' for comparison",
                    "!" => "; use 'not' for negation",
                    _ => "",
                };
                ParseError::new(format!("unknown operator '{}'{}", sym, hint), pos)
            })?;
            tokens.push((Token::Op(op), pos));
            continue;
        }

        return Err(ParseError::new(format!("unexpected character '{}'", c), pos));
    }

    tokens.push((Token::Eof, input.len()));
    Ok(tokens)
}

fn next_is_digit(input: &str, pos: usize) -> bool {
    input[pos + 1..]
        .chars()
        .next()
        .map(|c| c.is_ascii_digit())
        .unwrap_or(false)
}

/// deepest allowed nesting of parentheses and `not`
const MAX_DEPTH: usize = 256;

struct Parser {
    tokens: Vec<(Token, usize)>,
    cursor: usize,
    depth: usize,
}

impl Parser {
    fn descend(&mut self, pos: usize) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::new(
                format!("expression nested too deeply (limit {})", MAX_DEPTH),
                pos,
            ));
        }
        Ok(())
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.cursor].0
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.cursor + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].0
    }

    fn position(&self) -> usize {
        self.tokens[self.cursor].1
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.cursor].0.clone();
        if self.cursor < self.tokens.len() - 1 {
            self.cursor += 1;
        }
        tok
    }

    fn is_keyword(&self, word: &str) -> bool {
        matches!(self.peek(), Token::Ident(s) if s == word)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut items = vec![self.parse_and()?];
        while self.is_keyword("or") {
            self.advance();
            items.push(self.parse_and()?);
        }
        Ok(collapse(items, Expr::Any))
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut items = vec![self.parse_not()?];
        while self.is_keyword("and") {
            self.advance();
            items.push(self.parse_not()?);
        }
        Ok(collapse(items, Expr::All))
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if self.is_keyword("not") {
            let pos = self.position();
            self.descend(pos)?;
            self.advance();
            let inner = self.parse_not()?;
            self.depth -= 1;
            return Ok(Expr::negate(inner));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_primary()?;

        let op = match self.peek() {
            Token::Op(op) => Some(*op),
            Token::Ident(s) if s == "in" => Some(CompareOp::In),
            Token::Ident(s) if s == "not" && matches!(self.peek_at(1), Token::Ident(n) if n == "in") => {
                Some(CompareOp::NotIn)
            }
            _ => None,
        };

        let Some(op) = op else {
            return Ok(left);
        };

        self.advance();
        if op == CompareOp::NotIn {
            self.advance();
        }
        let right = self.parse_primary()?;
        Ok(Expr::compare(left, op, right))
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let pos = self.position();
        match self.advance() {
            Token::LParen => {
                self.descend(pos)?;
                let inner = self.parse_or()?;
                self.depth -= 1;
                match self.advance() {
                    Token::RParen => Ok(inner),
                    other => Err(ParseError::new(
                        format!("expected ')', found {}", other),
                        self.tokens[self.cursor.saturating_sub(1)].1,
                    )),
                }
            }
            Token::Str(s) => Ok(Expr::Literal(AttrValue::String(s))),
            Token::Int(n) => Ok(Expr::Literal(AttrValue::Number(n))),
            Token::Float(n) => Ok(Expr::Literal(AttrValue::Float(n))),
            Token::Ident(name) => match name.as_str() {
                "True" | "true" => Ok(Expr::Literal(AttrValue::Bool(true))),
                "False" | "false" => Ok(Expr::Literal(AttrValue::Bool(false))),
                "and" | "or" | "not" | "in" => Err(ParseError::new(
                    format!("unexpected keyword '{}'", name),
                    pos,
                )),
                _ => Ok(Expr::Ident(name)),
            },
            other => Err(ParseError::new(
                format!("expected a name, literal or '(', found {}", other),
                pos,
            )),
        }
    }
}

fn collapse(mut items: Vec<Expr>, wrap: fn(Vec<Expr>) -> Expr) -> Expr {
    if items.len() == 1 {
        items.remove(0)
    } else {
        wrap(items)
    }
}

/// parse expression text into an AST
pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        cursor: 0,
        depth: 0,
    };

    if matches!(parser.peek(), Token::Eof) {
        return Err(ParseError::new("empty expression", 0));
    }

    let expr = parser.parse_or()?;

    match parser.peek() {
        Token::Eof => Ok(expr),
        other => Err(ParseError::new(
            format!("unexpected {}", other),
            parser.position(),
        )),
    }
}
