use logos::Logos;

/// Lexer token for the contents of a quoted atom.
#[derive(Debug, Clone, Logos)]
enum EscapedToken {
    #[token(r#"\n"#, |_| '\n')]
    #[token(r#"\r"#, |_| '\r')]
    #[token(r#"\t"#, |_| '\t')]
    #[token(r#"\""#, |_| '"')]
    #[token(r#"\\"#, |_| '\\')]
    Escaped(char),

    /// A backslash before any other character is kept as written.
    #[regex(r#"\\[^\\"nrt]"#)]
    Unknown,

    #[regex(r#"[^\\]"#)]
    Literal,
}

/// Replaces escape sequences with their corresponding characters.
///
/// Returns `None` if `str` ends in a lone backslash, which the lexer never
/// hands over since such a backslash would escape the closing quote.
pub fn unescape(str: &str) -> Option<String> {
    let mut lexer = EscapedToken::lexer(str);
    let mut output = String::with_capacity(str.len());

    while let Some(token) = lexer.next() {
        let token = token.ok()?;

        match token {
            EscapedToken::Escaped(c) => output.push(c),
            EscapedToken::Unknown | EscapedToken::Literal => output.push_str(lexer.slice()),
        }
    }

    Some(output)
}
