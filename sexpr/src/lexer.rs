//! Split s-expression text into tokens.
use logos::Logos;
use smol_str::SmolStr;

use crate::{
    escape::unescape,
    util::{char_offset, Span, Spanned},
};

#[derive(Debug, Clone, PartialEq, Logos)]
#[logos(error = LexErrorKind)]
#[logos(skip r"\s+")]
#[logos(skip r";[^\n]*\n?")]
enum LexerToken {
    #[token("(")]
    OpenList,
    #[token(")")]
    CloseList,
    #[regex(r#"[^\s\(\)";]+"#, bare_atom)]
    BareAtom(SmolStr),
    #[token("\"", quoted_atom)]
    QuotedAtom(SmolStr),
}

fn bare_atom(lexer: &mut logos::Lexer<'_, LexerToken>) -> Result<SmolStr, LexErrorKind> {
    let slice = lexer.slice();
    if slice.is_empty() {
        return Err(LexErrorKind::EmptyAtom);
    }
    Ok(slice.into())
}

/// Scans from just after the opening quote up to the matching closing quote.
///
/// On failure the whole remainder is consumed so that the error span starts
/// at the opening quote.
fn quoted_atom(lexer: &mut logos::Lexer<'_, LexerToken>) -> Result<SmolStr, LexErrorKind> {
    let rest = lexer.remainder();
    let mut chars = rest.char_indices();

    while let Some((index, c)) = chars.next() {
        match c {
            '"' => {
                lexer.bump(index + 1);
                let unescaped = unescape(&rest[..index]).ok_or(LexErrorKind::InvalidCharacter)?;
                return Ok(unescaped.into());
            }
            '\\' => {
                if chars.next().is_none() {
                    break;
                }
            }
            _ => {}
        }
    }

    lexer.bump(rest.len());
    Err(LexErrorKind::UnterminatedString)
}

/// A lexical token of an s-expression document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    LeftParen,
    RightParen,
    Atom(SmolStr),
    EndOfInput,
}

impl From<LexerToken> for Token {
    fn from(token: LexerToken) -> Self {
        match token {
            LexerToken::OpenList => Token::LeftParen,
            LexerToken::CloseList => Token::RightParen,
            LexerToken::BareAtom(atom) | LexerToken::QuotedAtom(atom) => Token::Atom(atom),
        }
    }
}

/// What went wrong while lexing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[default]
    #[error("invalid character sequence")]
    InvalidCharacter,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("empty atom")]
    EmptyAtom,
}

/// A lex error together with the character offset at which it was detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at offset {offset}")]
pub struct LexError {
    kind: LexErrorKind,
    offset: usize,
}

impl LexError {
    pub fn new(kind: LexErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    pub fn kind(&self) -> LexErrorKind {
        self.kind
    }

    /// Zero-based character offset into the input.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Lazily produces the tokens of a source string.
///
/// The iterator yields exactly one [`Token::EndOfInput`] at the end and stops
/// after the first error.
#[derive(Clone)]
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LexerToken>,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: LexerToken::lexer(source),
            finished: false,
        }
    }

    #[inline]
    pub fn source(&self) -> &'a str {
        self.inner.source()
    }

    /// Character offset just past the last scanned token.
    pub fn position(&self) -> usize {
        char_offset(self.source(), self.inner.span().end)
    }

    /// Scans the next token.
    ///
    /// Once the input is exhausted this keeps returning [`Token::EndOfInput`]
    /// spanning the end of the source.
    pub fn next_token(&mut self) -> Result<Spanned<Token>, LexError> {
        let Some(token) = self.inner.next() else {
            let end = self.source().len();
            return Ok(Spanned::new(Token::EndOfInput, end..end));
        };

        let span: Span = self.inner.span();
        match token {
            Ok(token) => Ok(Spanned::new(token.into(), span)),
            Err(kind) => Err(LexError::new(kind, char_offset(self.source(), span.start))),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Spanned<Token>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let token = self.next_token();
        self.finished = matches!(
            token,
            Err(_)
                | Ok(Spanned {
                    inner: Token::EndOfInput,
                    ..
                })
        );
        Some(token)
    }
}

/// Splits `source` into tokens, terminated by a single [`Token::EndOfInput`].
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let tokens = Lexer::new(source)
        .map(|token| token.map(Spanned::into_inner))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::trace!(count = tokens.len(), "tokenized input");
    Ok(tokens)
}
