//! Parse s-expressions from text.
use delegate::delegate;
use std::ops::ControlFlow;

use crate::{
    lexer::{LexError, LexErrorKind, Lexer, Token},
    util::{char_offset, Spanned},
    value::Sexp,
};

/// What went wrong while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error(transparent)]
    Lex(#[from] LexErrorKind),
    #[error("unexpected closing parenthesis")]
    UnexpectedClose,
    #[error("unterminated list")]
    UnterminatedList,
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected input after expression")]
    TrailingInput,
}

/// A parse error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at offset {offset}")]
pub struct ParseError {
    kind: ParseErrorKind,
    offset: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// Zero-based character offset into the input.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::new(err.kind().into(), err.offset())
    }
}

/// Shorthand for a result specialised to parse errors.
pub type Result<T, E = ParseError> = std::result::Result<T, E>;

/// A parser that pulls tokens from a [`Lexer`] on demand.
///
/// Only the tokens of the expression being built are scanned; whatever
/// follows is left for the next call.
#[derive(Clone)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
        }
    }

    #[inline]
    pub fn source(&self) -> &'a str {
        self.lexer.source()
    }

    /// Character offset just past the last consumed token.
    #[inline]
    pub fn position(&self) -> usize {
        self.lexer.position()
    }

    fn error(&self, kind: ParseErrorKind, byte: usize) -> ParseError {
        ParseError::new(kind, char_offset(self.source(), byte))
    }

    #[inline]
    fn next_token(&mut self) -> Result<Spanned<Token>> {
        Ok(self.lexer.next_token()?)
    }

    /// Parses the next top-level expression.
    ///
    /// Returns `None` once the end of input is reached.
    pub fn next_expr(&mut self) -> Result<Option<Sexp>> {
        let token = self.next_token()?;
        if token.inner == Token::EndOfInput {
            return Ok(None);
        }
        self.parse_from(token).map(Some)
    }

    /// Parses exactly one expression, failing on a premature end of input.
    pub fn expr(&mut self) -> Result<Sexp> {
        let token = self.next_token()?;
        self.parse_from(token)
    }

    /// Requires that no tokens are left.
    pub fn finish(&mut self) -> Result<()> {
        let token = self.next_token()?;
        match token.inner {
            Token::EndOfInput => Ok(()),
            Token::RightParen => Err(self.error(ParseErrorKind::UnexpectedClose, token.span.start)),
            _ => Err(self.error(ParseErrorKind::TrailingInput, token.span.start)),
        }
    }

    /// Builds the expression starting at `token`.
    ///
    /// Open lists are kept on an explicit stack together with the position of
    /// their opening parenthesis, so nesting depth is not limited by the call
    /// stack. Dropping the partial lists on an error is iterative as well, see
    /// the `Drop` impl of [`Sexp`].
    fn parse_from(&mut self, mut token: Spanned<Token>) -> Result<Sexp> {
        let mut open_stack: Vec<(usize, Vec<Sexp>)> = Vec::new();

        loop {
            let value = match token.inner {
                Token::Atom(atom) => Sexp::Atom(atom),
                Token::LeftParen => {
                    open_stack.push((token.span.start, Vec::new()));
                    token = self.next_token()?;
                    continue;
                }
                Token::RightParen => match open_stack.pop() {
                    Some((_, items)) => Sexp::List(items),
                    None => {
                        return Err(self.error(ParseErrorKind::UnexpectedClose, token.span.start))
                    }
                },
                Token::EndOfInput => {
                    return Err(match open_stack.last() {
                        Some((open, _)) => self.error(ParseErrorKind::UnterminatedList, *open),
                        None => self.error(ParseErrorKind::UnexpectedEof, token.span.start),
                    })
                }
            };

            match open_stack.last_mut() {
                Some((_, items)) => items.push(value),
                None => return Ok(value),
            }

            token = self.next_token()?;
        }
    }
}

/// Iterator over the top-level expressions of a document.
///
/// Each call to `next` scans just enough input to complete one expression.
/// After an error the iterator is exhausted.
#[derive(Clone)]
pub struct Exprs<'a> {
    parser: Parser<'a>,
    done: bool,
}

impl<'a> Exprs<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            parser: Parser::new(source),
            done: false,
        }
    }

    delegate! {
        to self.parser {
            pub fn source(&self) -> &'a str;
            pub fn position(&self) -> usize;
        }
    }
}

impl Iterator for Exprs<'_> {
    type Item = Result<Sexp>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.parser.next_expr().transpose();
        self.done = !matches!(result, Some(Ok(_)));
        result
    }
}

impl std::iter::FusedIterator for Exprs<'_> {}

/// Parse a single expression, requiring that nothing but whitespace and
/// comments follows it.
pub fn parse_one(source: &str) -> Result<Sexp> {
    let mut parser = Parser::new(source);
    let value = parser.expr()?;
    parser.finish()?;
    Ok(value)
}

/// Parse every top-level expression of a document, in order.
pub fn parse_all(source: &str) -> Result<Vec<Sexp>> {
    let values = Exprs::new(source).collect::<Result<Vec<_>>>()?;
    tracing::debug!(count = values.len(), "parsed document");
    Ok(values)
}

/// Parse top-level expressions one at a time, handing each to `handler` as
/// soon as it is complete.
///
/// Stops without scanning further input once `handler` returns
/// [`ControlFlow::Break`]. Expressions delivered before an error stay
/// delivered.
pub fn parse_streaming<F>(source: &str, mut handler: F) -> Result<()>
where
    F: FnMut(Sexp) -> ControlFlow<()>,
{
    let mut exprs = Exprs::new(source);
    while let Some(value) = exprs.next() {
        if handler(value?).is_break() {
            tracing::trace!(position = exprs.position(), "stopped streaming parse");
            break;
        }
    }
    Ok(())
}

/// Parse a whole document and wrap its top-level expressions in a single
/// root list, as expected by [`Config`](crate::config::Config).
pub fn parse_document(source: &str) -> Result<Sexp> {
    parse_all(source).map(Sexp::List)
}
