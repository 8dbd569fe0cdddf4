//! Utilities shared by the lexer and the parser.
mod spanned;

pub use spanned::{Span, Spanned};

/// Converts a byte position in `source` into a character offset.
///
/// Positions past the end or inside a multi-byte character are clamped to
/// the preceding character boundary.
pub(crate) fn char_offset(source: &str, byte: usize) -> usize {
    let mut byte = byte.min(source.len());
    while !source.is_char_boundary(byte) {
        byte -= 1;
    }
    source[..byte].chars().count()
}
