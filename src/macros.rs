//! Utility macros for the clause lexer.
//!
//! This module defines helper macros used by the lexer:
//!
//! - `MK_TOKEN!` - Creates a clause Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default lexer handler for fixed operators
//!
//! These macros reduce boilerplate in the lexer pattern table.

/// Creates a clause Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's string value
/// * `$offset` - Byte offset of the token inside the clause
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Tag, "keyword".to_string(), 4);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $offset:expr) => {
        Token {
            kind: $kind,
            value: $value,
            offset: $offset,
        }
    };
}

/// Creates a default lexer handler for fixed operator tokens.
///
/// Generates a handler function that pushes a token with the given kind
/// and advances the lexer position by the operator's length.
///
/// # Arguments
///
/// * `$kind` - The TokenKind to create
/// * `$value` - The literal operator text (used for length calculation)
///
/// # Example
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new("^&&").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::And, "&&"),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| {
            let offset = lexer.pos;
            lexer.push(MK_TOKEN!($kind, String::from($value), offset));
            lexer.advance_n($value.len());
        }
    };
}
