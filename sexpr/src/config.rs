//! Read configuration values out of a parsed s-expression tree.
//!
//! Every list whose first item is an atom is an *entry*: the atom is its key
//! and the remaining items are its payload. Entries nest, and a dot-separated
//! path such as `server.port` names an entry within the payload of another.
//!
//! ```
//! use sexpr::{config::Config, parse_document};
//!
//! let root = parse_document("(server (host localhost) (port 8080))").unwrap();
//! let config = Config::new(&root).unwrap();
//! assert_eq!(Some("localhost"), config.get_string("server.host"));
//! assert_eq!(Some(8080), config.get_int("server.port"));
//! assert!(!config.has("server.ssl"));
//! ```
use smol_str::SmolStr;
use std::str::FromStr;

use crate::value::{Sexp, TypeMismatch};

/// A required configuration value could not be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing configuration value `{path}`")]
    Missing { path: String },
    #[error("invalid configuration value `{path}`: expected {expected}")]
    Invalid { path: String, expected: &'static str },
}

impl ConfigError {
    /// The dot path that was queried.
    pub fn path(&self) -> &str {
        match self {
            ConfigError::Missing { path } | ConfigError::Invalid { path, .. } => path,
        }
    }
}

/// Types that can be read from the payload of an entry.
pub trait FromPayload<'a>: Sized {
    /// Describes the accepted payload in error messages.
    const EXPECTED: &'static str;

    fn from_payload(payload: &'a [Sexp]) -> Option<Self>;
}

fn single_atom(payload: &[Sexp]) -> Option<&str> {
    match payload {
        [Sexp::Atom(atom)] => Some(atom.as_str()),
        _ => None,
    }
}

/// Parses a base-10 integer made of an optional `-` followed by digits.
fn parse_int<T: FromStr>(text: &str) -> Option<T> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

impl<'a> FromPayload<'a> for &'a str {
    const EXPECTED: &'static str = "a single atom";

    fn from_payload(payload: &'a [Sexp]) -> Option<Self> {
        single_atom(payload)
    }
}

impl<'a> FromPayload<'a> for SmolStr {
    const EXPECTED: &'static str = "a single atom";

    fn from_payload(payload: &'a [Sexp]) -> Option<Self> {
        single_atom(payload).map(SmolStr::from)
    }
}

impl<'a> FromPayload<'a> for String {
    const EXPECTED: &'static str = "a single atom";

    fn from_payload(payload: &'a [Sexp]) -> Option<Self> {
        single_atom(payload).map(String::from)
    }
}

impl<'a> FromPayload<'a> for bool {
    const EXPECTED: &'static str = "a boolean";

    fn from_payload(payload: &'a [Sexp]) -> Option<Self> {
        single_atom(payload).and_then(parse_bool)
    }
}

/// Implement [`FromPayload`] for integer types.
macro_rules! impl_from_payload_for_int {
    ($($ty:ty),*) => {
        $(impl<'a> FromPayload<'a> for $ty {
            const EXPECTED: &'static str = concat!("an integer (", stringify!($ty), ")");

            fn from_payload(payload: &'a [Sexp]) -> Option<Self> {
                single_atom(payload).and_then(parse_int)
            }
        })*
    };
}

impl_from_payload_for_int!(u8, u16, u32, u64, u128, usize);
impl_from_payload_for_int!(i8, i16, i32, i64, i128, isize);

/// A list of strings is either a single nested list of atoms,
/// `(features (auth logging))`, or the atoms themselves,
/// `(features auth logging)`.
impl<'a> FromPayload<'a> for Vec<&'a str> {
    const EXPECTED: &'static str = "a list of atoms";

    fn from_payload(payload: &'a [Sexp]) -> Option<Self> {
        let items = match payload {
            [Sexp::List(items)] => items.as_slice(),
            items => items,
        };
        items.iter().map(Sexp::atom_str).collect()
    }
}

impl<'a> FromPayload<'a> for Vec<String> {
    const EXPECTED: &'static str = "a list of atoms";

    fn from_payload(payload: &'a [Sexp]) -> Option<Self> {
        let items = Vec::<&str>::from_payload(payload)?;
        Some(items.into_iter().map(String::from).collect())
    }
}

/// A read-only view of a table of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config<'a> {
    items: &'a [Sexp],
}

impl<'a> Config<'a> {
    /// Wraps a root list.
    ///
    /// # Errors
    ///
    /// Fails with a [`TypeMismatch`] if `root` is an atom.
    pub fn new(root: &'a Sexp) -> Result<Self, TypeMismatch> {
        Ok(Self::from_items(root.as_list()?))
    }

    /// Wraps the items of a list directly.
    pub fn from_items(items: &'a [Sexp]) -> Self {
        Self { items }
    }

    /// Iterates over the `(key, payload)` pairs at this level, in order.
    ///
    /// Items that are not entries are skipped.
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, &'a [Sexp])> + 'a {
        let items = self.items;
        items.iter().filter_map(|item| match item.list_items()? {
            [Sexp::Atom(key), payload @ ..] => Some((key.as_str(), payload)),
            _ => None,
        })
    }

    /// Iterates over the keys at this level, in order, including duplicates.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.entries().map(|(key, _)| key)
    }

    fn find(&self, key: &str) -> Option<&'a [Sexp]> {
        self.entries()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, payload)| payload)
    }

    /// The payload of the entry at `path`.
    ///
    /// Segments match keys exactly; among sibling entries with the same key
    /// the first one wins. Empty segments never match.
    pub fn lookup(&self, path: &str) -> Option<&'a [Sexp]> {
        let mut payload = self.items;
        for segment in path.split('.') {
            if segment.is_empty() {
                return None;
            }
            payload = Config::from_items(payload).find(segment)?;
        }
        Some(payload)
    }

    /// Whether every segment of `path` resolves to an entry.
    pub fn has(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    /// A view of the entries nested in the entry at `path`.
    pub fn section(&self, path: &str) -> Option<Config<'a>> {
        self.lookup(path).map(Config::from_items)
    }

    /// The value at `path`, or `None` if it is missing or has the wrong type.
    pub fn get<T: FromPayload<'a>>(&self, path: &str) -> Option<T> {
        let payload = self.lookup(path)?;
        let value = T::from_payload(payload);
        if value.is_none() {
            tracing::debug!(path, expected = T::EXPECTED, "ignoring invalid configuration value");
        }
        value
    }

    /// The value at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the path does not resolve or its payload has the wrong type.
    pub fn require<T: FromPayload<'a>>(&self, path: &str) -> Result<T, ConfigError> {
        let payload = self.lookup(path).ok_or_else(|| ConfigError::Missing {
            path: path.to_string(),
        })?;
        T::from_payload(payload).ok_or_else(|| ConfigError::Invalid {
            path: path.to_string(),
            expected: T::EXPECTED,
        })
    }

    pub fn get_string(&self, path: &str) -> Option<&'a str> {
        self.get(path)
    }

    pub fn get_int(&self, path: &str) -> Option<i64> {
        self.get(path)
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path)
    }

    pub fn get_string_list(&self, path: &str) -> Option<Vec<&'a str>> {
        self.get(path)
    }

    pub fn require_string(&self, path: &str) -> Result<&'a str, ConfigError> {
        self.require(path)
    }

    pub fn require_int(&self, path: &str) -> Result<i64, ConfigError> {
        self.require(path)
    }

    pub fn require_bool(&self, path: &str) -> Result<bool, ConfigError> {
        self.require(path)
    }

    pub fn require_string_list(&self, path: &str) -> Result<Vec<&'a str>, ConfigError> {
        self.require(path)
    }
}

#[cfg(test)]
mod test {
    use super::{Config, ConfigError};
    use crate::{parse_document, parse_one, value::Sexp};
    use rstest::{fixture, rstest};

    const SERVER: &str = r#"
        ; sample configuration
        (server
          (host "localhost")
          (port 8080)
          (debug true)
          (features (auth logging)))
    "#;

    #[fixture]
    fn server() -> Sexp {
        parse_document(SERVER).unwrap()
    }

    #[rstest]
    fn test_server_round_trip(server: Sexp) {
        let config = Config::new(&server).unwrap();
        assert_eq!(Some("localhost"), config.get_string("server.host"));
        assert_eq!(Some(8080), config.get_int("server.port"));
        assert_eq!(Some(true), config.get_bool("server.debug"));
        assert_eq!(
            Some(vec!["auth", "logging"]),
            config.get_string_list("server.features")
        );
        assert_eq!(None, config.get_int("server.timeout"));
        assert!(!config.has("server.ssl"));
    }

    #[rstest]
    #[case("server", true)]
    #[case("server.host", true)]
    #[case("server.features.auth", true)]
    #[case("server.host.localhost", false)]
    #[case("Server.host", false)]
    #[case("server.", false)]
    #[case(".server", false)]
    #[case("", false)]
    #[case("host", false)]
    fn test_has(server: Sexp, #[case] path: &str, #[case] expected: bool) {
        assert_eq!(expected, Config::new(&server).unwrap().has(path));
    }

    #[rstest]
    fn test_lookup_returns_payload(server: Sexp) {
        let config = Config::new(&server).unwrap();
        assert_eq!(
            Some([Sexp::atom("8080")].as_slice()),
            config.lookup("server.port")
        );
        assert_eq!(None, config.lookup("server.timeout"));
    }

    #[rstest]
    fn test_section_and_keys(server: Sexp) {
        let config = Config::new(&server).unwrap();
        let section = config.section("server").unwrap();
        assert_eq!(
            vec!["host", "port", "debug", "features"],
            section.keys().collect::<Vec<_>>()
        );
        assert_eq!(Some(8080), section.get_int("port"));
        assert!(config.section("server.ssl").is_none());
    }

    #[test]
    fn test_non_list_root() {
        let root = Sexp::atom("server");
        let err = Config::new(&root).unwrap_err();
        assert_eq!("type mismatch: expected list", err.to_string());
    }

    #[test]
    fn test_non_entries_are_skipped() {
        let root = parse_document(r#"loose () ((nested) x) ("quoted key" 1) (key 2)"#).unwrap();
        let config = Config::new(&root).unwrap();
        assert_eq!(
            vec!["quoted key", "key"],
            config.keys().collect::<Vec<_>>()
        );
        assert_eq!(Some(1), config.get_int("quoted key"));
        assert!(!config.has("loose"));
    }

    #[test]
    fn test_duplicate_keys_first_match_wins() {
        let root = parse_document("(port 1) (port 2) (db (name a)) (db (name b) (user c))").unwrap();
        let config = Config::new(&root).unwrap();
        assert_eq!(Some(1), config.get_int("port"));
        assert_eq!(Some("a"), config.get_string("db.name"));
        assert!(!config.has("db.user"));
        assert_eq!(vec!["port", "port", "db", "db"], config.keys().collect::<Vec<_>>());
    }

    #[test]
    fn test_root_list_itself() {
        let root = parse_one("((a 1) (b (c 2)))").unwrap();
        let config = Config::new(&root).unwrap();
        assert_eq!(Some(1), config.get_int("a"));
        assert_eq!(Some(2), config.get_int("b.c"));
    }

    #[rstest]
    #[case("0", Some(0))]
    #[case("42", Some(42))]
    #[case("-17", Some(-17))]
    #[case("007", Some(7))]
    #[case("9223372036854775807", Some(i64::MAX))]
    #[case("-9223372036854775808", Some(i64::MIN))]
    #[case("9223372036854775808", None)]
    #[case("+5", None)]
    #[case("-", None)]
    #[case("--1", None)]
    #[case("1.5", None)]
    #[case("0x10", None)]
    #[case("12abc", None)]
    #[case("\"\"", None)]
    fn test_int_coercion(#[case] atom: &str, #[case] expected: Option<i64>) {
        let root = parse_document(&format!("(value {atom})")).unwrap();
        assert_eq!(expected, Config::new(&root).unwrap().get_int("value"));
    }

    #[rstest]
    #[case("true", Some(true))]
    #[case("TRUE", Some(true))]
    #[case("True", Some(true))]
    #[case("false", Some(false))]
    #[case("fAlSe", Some(false))]
    #[case("yes", None)]
    #[case("1", None)]
    #[case("truex", None)]
    fn test_bool_coercion(#[case] atom: &str, #[case] expected: Option<bool>) {
        let root = parse_document(&format!("(value {atom})")).unwrap();
        assert_eq!(expected, Config::new(&root).unwrap().get_bool("value"));
    }

    #[rstest]
    #[case("(tags (a b c))", Some(vec!["a", "b", "c"]))]
    #[case("(tags a b c)", Some(vec!["a", "b", "c"]))]
    #[case("(tags \"x y\")", Some(vec!["x y"]))]
    #[case("(tags ())", Some(vec![]))]
    #[case("(tags)", Some(vec![]))]
    #[case("(tags (a (b)))", None)]
    #[case("(tags a (b))", None)]
    #[case("(tags (a) (b))", None)]
    fn test_string_list(#[case] source: &str, #[case] expected: Option<Vec<&str>>) {
        let root = parse_document(source).unwrap();
        assert_eq!(expected, Config::new(&root).unwrap().get_string_list("tags"));
    }

    #[rstest]
    #[case("(name)")]
    #[case("(name a b)")]
    #[case("(name (a))")]
    fn test_string_requires_single_atom(#[case] source: &str) {
        let root = parse_document(source).unwrap();
        assert_eq!(None, Config::new(&root).unwrap().get_string("name"));
    }

    #[rstest]
    fn test_required_getters(server: Sexp) {
        let config = Config::new(&server).unwrap();
        assert_eq!(Ok("localhost"), config.require_string("server.host"));
        assert_eq!(Ok(8080), config.require_int("server.port"));
        assert_eq!(Ok(true), config.require_bool("server.debug"));
        assert_eq!(
            Ok(vec!["auth", "logging"]),
            config.require_string_list("server.features")
        );
    }

    #[rstest]
    fn test_required_missing(server: Sexp) {
        let err = Config::new(&server)
            .unwrap()
            .require_int("server.timeout")
            .unwrap_err();
        assert_eq!(
            ConfigError::Missing {
                path: "server.timeout".into()
            },
            err
        );
        assert_eq!("server.timeout", err.path());
        assert_eq!(
            "missing configuration value `server.timeout`",
            err.to_string()
        );
    }

    #[rstest]
    fn test_required_invalid(server: Sexp) {
        let config = Config::new(&server).unwrap();
        let err = config.require_bool("server.host").unwrap_err();
        assert_eq!("server.host", err.path());
        assert_eq!(
            "invalid configuration value `server.host`: expected a boolean",
            err.to_string()
        );
        assert!(matches!(
            config.require_string("server.features"),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[rstest]
    fn test_generic_getters(server: Sexp) {
        let config = Config::new(&server).unwrap();
        assert_eq!(Some(8080u16), config.get("server.port"));
        assert_eq!(None, config.get::<u8>("server.port"));
        assert_eq!(Some(String::from("localhost")), config.get("server.host"));
        assert_eq!(
            Some(vec![String::from("auth"), String::from("logging")]),
            config.get("server.features")
        );
        assert_eq!(
            "invalid configuration value `server.port`: expected an integer (u8)",
            config.require::<u8>("server.port").unwrap_err().to_string()
        );
    }

    #[test]
    fn test_unsigned_rejects_negative() {
        let root = parse_document("(n -1)").unwrap();
        let config = Config::new(&root).unwrap();
        assert_eq!(None, config.get::<u32>("n"));
        assert_eq!(Some(-1i32), config.get("n"));
    }
}
