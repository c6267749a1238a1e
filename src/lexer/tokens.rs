use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("continue", TokenKind::Continue);
        map.insert("skip", TokenKind::Skip);
        map.insert("token", TokenKind::TokenKeyword);
        map.insert("throw", TokenKind::Throw);
        map.insert("join", TokenKind::Join);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Pattern,
    String,
    Tag,
    HostExpression,
    Identifier,
    Number,

    And,          // &&
    Or,           // ||
    LookAhead,    // ->
    LookBehind,   // <-
    Current,      // <->
    Semicolon,

    // Reserved
    Continue,
    Skip,
    TokenKeyword,
    Throw,
    Join,
}

impl TokenKind {
    /// Kinds that compile to a test of their own inside a test clause.
    pub fn is_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Pattern | TokenKind::String | TokenKind::Tag | TokenKind::HostExpression
        )
    }

    /// Kinds that read as a bare word inside a test clause.
    pub fn is_word(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Number
                | TokenKind::Continue
                | TokenKind::Skip
                | TokenKind::TokenKeyword
                | TokenKind::Throw
                | TokenKind::Join
        )
    }

    pub fn is_positional(&self) -> bool {
        matches!(
            self,
            TokenKind::LookAhead | TokenKind::LookBehind | TokenKind::Current
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A lexeme of a rule's test or action clause.
///
/// `value` holds the decoded payload: string literals without quotes and
/// with escapes applied, tags without `#`, host expressions without the
/// `[(` `)]` delimiters. Pattern literals keep their full `/body/flags` text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub offset: usize,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.kind, self.value)
    }
}
