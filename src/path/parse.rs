//! logos-based parser for textual name paths.
//!
//! Accepted syntax, as used by host APIs and tests:
//!
//! - `contacts.2.email`: dot-separated keys, bare numbers are indices
//! - `contacts[2].email`: bracketed index
//! - `meta["first.name"]`: bracketed quoted key (may contain dots or spaces)
//!
//! The empty string parses to the empty path.

use std::str::FromStr;

use logos::Logos;

use super::name::{NamePath, PathSegment};
use crate::error::ComposeError;

/// Name path token produced by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t]+")]
enum Token {
    /// Object key: `email`, `first-name`, `$meta`.
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$\-]*")]
    Ident,

    /// List index.
    #[regex(r"[0-9]+")]
    Number,

    /// Quoted key inside brackets.
    #[regex(r#""[^"]*""#)]
    #[regex(r"'[^']*'")]
    Quoted,

    #[token(".")]
    Dot,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,
}

fn invalid(input: &str, message: impl Into<String>) -> ComposeError {
    ComposeError::InvalidPath {
        input: input.to_owned(),
        message: message.into(),
    }
}

fn index(input: &str, slice: &str) -> Result<PathSegment, ComposeError> {
    slice
        .parse::<usize>()
        .map(PathSegment::Index)
        .map_err(|_| invalid(input, format!("index `{slice}` is out of range")))
}

/// Parse a textual name path.
pub fn parse_name_path(input: &str) -> Result<NamePath, ComposeError> {
    let mut lexer = Token::lexer(input);
    let mut segments = Vec::new();
    // True at the start and right after a `.`.
    let mut expect_segment = true;

    while let Some(token) = lexer.next() {
        let slice = lexer.slice();
        let token = token.map_err(|_| invalid(input, format!("unexpected `{slice}`")))?;
        match token {
            Token::Ident | Token::Number if !expect_segment => {
                return Err(invalid(input, format!("missing `.` before `{slice}`")));
            }
            Token::Ident => {
                segments.push(PathSegment::Key(slice.to_owned()));
                expect_segment = false;
            }
            Token::Number => {
                segments.push(index(input, slice)?);
                expect_segment = false;
            }
            Token::Dot if expect_segment => {
                return Err(invalid(input, "empty segment"));
            }
            Token::Dot => expect_segment = true,
            Token::BracketOpen => {
                if expect_segment && !segments.is_empty() {
                    return Err(invalid(input, "expected a segment after `.`"));
                }
                let inner = match lexer.next() {
                    Some(Ok(Token::Number)) => index(input, lexer.slice())?,
                    Some(Ok(Token::Quoted)) => {
                        let quoted = lexer.slice();
                        PathSegment::Key(quoted[1..quoted.len() - 1].to_owned())
                    }
                    _ => return Err(invalid(input, "expected an index or quoted key after `[`")),
                };
                if !matches!(lexer.next(), Some(Ok(Token::BracketClose))) {
                    return Err(invalid(input, "unclosed `[`"));
                }
                segments.push(inner);
                expect_segment = false;
            }
            Token::BracketClose => return Err(invalid(input, "unexpected `]`")),
            Token::Quoted => return Err(invalid(input, "quoted keys must be bracketed")),
        }
    }

    if expect_segment && !segments.is_empty() {
        return Err(invalid(input, "trailing `.`"));
    }
    Ok(NamePath::from(segments))
}

impl FromStr for NamePath {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name_path(s)
    }
}

impl NamePath {
    /// Parse dotted/bracketed text into a path. See the module docs for syntax.
    pub fn parse(input: &str) -> Result<Self, ComposeError> {
        parse_name_path(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name_path;

    #[test]
    fn dotted_keys_and_indices() {
        let path: NamePath = "contacts.2.email".parse().unwrap();
        assert_eq!(path, name_path!["contacts", 2usize, "email"]);
    }

    #[test]
    fn bracketed_index() {
        let path = NamePath::parse("contacts[2].email").unwrap();
        assert_eq!(path, name_path!["contacts", 2usize, "email"]);
    }

    #[test]
    fn leading_bracket() {
        let path = NamePath::parse("[0].name").unwrap();
        assert_eq!(path, name_path![0usize, "name"]);
    }

    #[test]
    fn quoted_key_keeps_dots() {
        let path = NamePath::parse(r#"meta["first.name"]"#).unwrap();
        assert_eq!(path, name_path!["meta", "first.name"]);
        let single = NamePath::parse("meta['a b']").unwrap();
        assert_eq!(single, name_path!["meta", "a b"]);
    }

    #[test]
    fn hyphenated_keys() {
        let path = NamePath::parse("date-range.start").unwrap();
        assert_eq!(path, name_path!["date-range", "start"]);
    }

    #[test]
    fn empty_input_is_empty_path() {
        assert!(NamePath::parse("").unwrap().is_empty());
    }

    #[test]
    fn rejects_empty_segment() {
        let err = NamePath::parse("a..b").unwrap_err();
        assert!(err.to_string().contains("empty segment"));
    }

    #[test]
    fn rejects_trailing_dot() {
        assert!(NamePath::parse("a.").is_err());
    }

    #[test]
    fn rejects_unclosed_bracket() {
        assert!(NamePath::parse("a[1").is_err());
        assert!(NamePath::parse("a[b]").is_err());
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(NamePath::parse("a b").is_err());
    }

    #[test]
    fn rejects_stray_characters() {
        assert!(NamePath::parse("a/b").is_err());
    }

    #[test]
    fn round_trips_through_display() {
        let path = name_path!["contacts", 0usize, "phones", 3usize];
        let reparsed = NamePath::parse(&path.to_string()).unwrap();
        assert_eq!(reparsed, path);
    }
}
