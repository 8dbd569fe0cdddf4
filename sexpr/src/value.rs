//! The s-expression tree produced by the parser.
use smol_str::SmolStr;
use std::fmt::Display;

/// An s-expression represented as a recursive enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sexp {
    Atom(SmolStr),
    List(Vec<Sexp>),
}

/// The two shapes an s-expression can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Atom,
    List,
}

impl Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::Atom => f.write_str("atom"),
            Shape::List => f.write_str("list"),
        }
    }
}

/// A value did not have the shape the caller expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("type mismatch: expected {expected}")]
pub struct TypeMismatch {
    pub expected: Shape,
}

impl Sexp {
    /// Builds an atom.
    pub fn atom(value: impl Into<SmolStr>) -> Self {
        Sexp::Atom(value.into())
    }

    /// Builds a list from a sequence of values.
    pub fn list(items: impl IntoIterator<Item = Sexp>) -> Self {
        Sexp::List(items.into_iter().collect())
    }

    pub fn shape(&self) -> Shape {
        match self {
            Sexp::Atom(_) => Shape::Atom,
            Sexp::List(_) => Shape::List,
        }
    }

    #[inline]
    pub fn is_atom(&self) -> bool {
        matches!(self, Sexp::Atom(_))
    }

    #[inline]
    pub fn is_list(&self) -> bool {
        matches!(self, Sexp::List(_))
    }

    /// The text of an atom, or `None` for a list.
    pub fn atom_str(&self) -> Option<&str> {
        match self {
            Sexp::Atom(atom) => Some(atom.as_str()),
            Sexp::List(_) => None,
        }
    }

    /// The items of a list, or `None` for an atom.
    pub fn list_items(&self) -> Option<&[Sexp]> {
        match self {
            Sexp::Atom(_) => None,
            Sexp::List(items) => Some(items.as_slice()),
        }
    }

    /// The text of an atom.
    ///
    /// # Errors
    ///
    /// Fails with a [`TypeMismatch`] if this is a list.
    pub fn as_atom(&self) -> Result<&str, TypeMismatch> {
        self.atom_str().ok_or(TypeMismatch {
            expected: Shape::Atom,
        })
    }

    /// The items of a list.
    ///
    /// # Errors
    ///
    /// Fails with a [`TypeMismatch`] if this is an atom.
    pub fn as_list(&self) -> Result<&[Sexp], TypeMismatch> {
        self.list_items().ok_or(TypeMismatch {
            expected: Shape::List,
        })
    }

    /// Iterates over the items of a list.
    pub fn iter(&self) -> Result<std::slice::Iter<'_, Sexp>, TypeMismatch> {
        self.as_list().map(<[Sexp]>::iter)
    }

    /// Calls `f` on every item of a list, in order.
    pub fn for_each<F>(&self, f: F) -> Result<(), TypeMismatch>
    where
        F: FnMut(&Sexp),
    {
        self.iter()?.for_each(f);
        Ok(())
    }

    /// Converts into the text of an atom, handing the value back on a mismatch.
    pub fn into_atom(mut self) -> Result<SmolStr, Self> {
        if let Sexp::Atom(atom) = &mut self {
            return Ok(std::mem::take(atom));
        }
        Err(self)
    }

    /// Converts into the items of a list, handing the value back on a mismatch.
    pub fn into_list(mut self) -> Result<Vec<Sexp>, Self> {
        if let Sexp::List(items) = &mut self {
            return Ok(std::mem::take(items));
        }
        Err(self)
    }
}

/// Nested lists are flattened onto a work stack before they are freed, so
/// dropping a deeply nested tree does not recurse.
impl Drop for Sexp {
    fn drop(&mut self) {
        let Sexp::List(items) = self else {
            return;
        };
        if items.iter().all(Sexp::is_atom) {
            return;
        }

        let mut stack = std::mem::take(items);
        while let Some(mut value) = stack.pop() {
            if let Sexp::List(children) = &mut value {
                stack.append(children);
            }
        }
    }
}

impl From<SmolStr> for Sexp {
    fn from(value: SmolStr) -> Self {
        Self::Atom(value)
    }
}

impl From<String> for Sexp {
    fn from(value: String) -> Self {
        Self::Atom(value.into())
    }
}

impl From<&str> for Sexp {
    fn from(value: &str) -> Self {
        Self::Atom(value.into())
    }
}

impl From<Vec<Sexp>> for Sexp {
    fn from(value: Vec<Sexp>) -> Self {
        Self::List(value)
    }
}

impl FromIterator<Sexp> for Sexp {
    fn from_iter<I: IntoIterator<Item = Sexp>>(iter: I) -> Self {
        Self::list(iter)
    }
}
