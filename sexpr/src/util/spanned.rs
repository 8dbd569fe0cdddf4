use std::ops::Range;

/// Byte range within a source string.
pub type Span = Range<usize>;

/// Records the source span around an inner type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<T> {
    pub inner: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(inner: T, span: Span) -> Self {
        Self { inner, span }
    }

    /// Converts into the inner type.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Maps the inner value, keeping the span.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned {
            inner: f(self.inner),
            span: self.span,
        }
    }
}
