use std::fmt::Display;

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

use crate::errors::errors::ErrorImpl;

lazy_static! {
    // ASCII word characters only, so letters such as `é` break like `,` does
    static ref DEFAULT_BREAK: Regex = Regex::new(r"[^A-Za-z0-9_]").unwrap();
}

/// A compiled `/body/flags` matcher.
///
/// Used as the break test of a tokenizer and as an operand inside rule
/// tests. Matching is an unanchored search, so `/a/` matches `"cat"`.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// The break pattern used when a spec has no `break on` line.
    pub fn default_break() -> Pattern {
        Pattern {
            source: String::from(r"/\W/"),
            regex: DEFAULT_BREAK.clone(),
        }
    }

    /// Parses a delimited pattern literal such as `/[a-z]+/i`.
    pub fn from_literal(literal: &str) -> Result<Pattern, ErrorImpl> {
        let invalid = |message: &str| ErrorImpl::InvalidPattern {
            pattern: literal.to_string(),
            message: message.to_string(),
        };

        let rest = literal
            .strip_prefix('/')
            .ok_or_else(|| invalid("expected a literal of the form /pattern/"))?;

        let mut body = String::new();
        let mut chars = rest.char_indices();
        let mut flags = None;

        while let Some((i, ch)) = chars.next() {
            match ch {
                '\\' => match chars.next() {
                    Some((_, '/')) => body.push('/'),
                    Some((_, escaped)) => {
                        body.push('\\');
                        body.push(escaped);
                    }
                    None => return Err(invalid("dangling escape")),
                },
                '/' => {
                    flags = Some(&rest[i + 1..]);
                    break;
                }
                _ => body.push(ch),
            }
        }

        let flags = flags.ok_or_else(|| invalid("missing closing `/`"))?;
        let mut builder = RegexBuilder::new(&body);

        for flag in flags.chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                'x' => builder.ignore_whitespace(true),
                // Global, sticky and unicode have no meaning for a single test
                'g' | 'y' | 'u' => &mut builder,
                other => return Err(invalid(&format!("unknown flag `{}`", other))),
            };
        }

        let regex = builder
            .build()
            .map_err(|error| invalid(&error.to_string()))?;

        Ok(Pattern {
            source: literal.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn matches_char(&self, ch: char) -> bool {
        let mut buffer = [0; 4];
        self.regex.is_match(ch.encode_utf8(&mut buffer))
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Pattern::default_break()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}
