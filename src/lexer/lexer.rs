use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new(r"^\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^<->").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Current, "<->") },
        RegexPattern { regex: Regex::new(r"^<-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LookBehind, "<-") },
        RegexPattern { regex: Regex::new(r"^->").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LookAhead, "->") },
        RegexPattern { regex: Regex::new(r"^&&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::And, "&&") },
        RegexPattern { regex: Regex::new(r"^\|\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Or, "||") },
        RegexPattern { regex: Regex::new(r"^;").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
        RegexPattern { regex: Regex::new(r"^\[\((.*?)\)\]").unwrap(), handler: host_handler },
        RegexPattern { regex: Regex::new(r"^/(?:[^/\\\n]|\\.)*/[A-Za-z]*").unwrap(), handler: pattern_handler },
        RegexPattern { regex: Regex::new(r#"^'(?:[^'\\]|\\.)*'"#).unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new(r#"^"(?:[^"\\]|\\.)*""#).unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new(r"^`(?:[^`\\]|\\.)*`").unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new(r"^#\w+").unwrap(), handler: tag_handler },
        RegexPattern { regex: Regex::new(r"^[0-9]\w*").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new(r"^[A-Za-z_]\w*").unwrap(), handler: symbol_handler },
    ];
}

/// Splits a test or action clause into clause tokens.
pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Lexer {
        Lexer {
            tokens: vec![],
            source: source.to_string(),
            pos: 0,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn matched(&self, regex: &Regex) -> String {
        regex
            .find(self.remainder())
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }
}

/// Decodes the escape sequences of a quoted literal body.
pub fn unescape(literal: &str) -> String {
    let mut result = String::new();
    let mut chars = literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        let Some(next_ch) = chars.peek().copied() else {
            result.push(ch); // Keep the lone backslash
            break;
        };

        match next_ch {
            'n' => result.push('\n'),
            't' => result.push('\t'),
            'r' => result.push('\r'),
            '0' => result.push('\0'),
            '\\' | '"' | '\'' | '`' => result.push(next_ch),
            'x' => {
                chars.next();
                let mut hex = String::new();

                for _ in 0..2 {
                    match chars.peek() {
                        Some(ch) if ch.is_ascii_hexdigit() => {
                            hex.push(*ch);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => result.push(byte as char),
                    Err(_) => {
                        result.push_str("\\x");
                        result.push_str(&hex);
                    }
                }
                continue;
            }
            _ => {
                result.push(ch); // Keep the backslash
                continue;
            }
        }

        chars.next();
    }

    result
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    lexer.advance_n(matched.len());
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    let offset = lexer.pos;
    let body = &matched[1..matched.len() - 1];

    lexer.push(MK_TOKEN!(TokenKind::String, unescape(body), offset));
    lexer.advance_n(matched.len());
}

fn pattern_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    let offset = lexer.pos;

    lexer.advance_n(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::Pattern, matched, offset));
}

fn host_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    let offset = lexer.pos;
    let body = matched[2..matched.len() - 2].trim().to_string();

    lexer.push(MK_TOKEN!(TokenKind::HostExpression, body, offset));
    lexer.advance_n(matched.len());
}

fn tag_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    let offset = lexer.pos;

    lexer.push(MK_TOKEN!(TokenKind::Tag, matched[1..].to_string(), offset));
    lexer.advance_n(matched.len());
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    let offset = lexer.pos;

    lexer.advance_n(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::Number, matched, offset));
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let value = lexer.matched(regex);
    let offset = lexer.pos;

    let kind = RESERVED_LOOKUP
        .get(value.to_ascii_lowercase().as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);

    lexer.advance_n(value.len());
    lexer.push(MK_TOKEN!(kind, value, offset));
}

fn is_literal_opening(remainder: &str) -> bool {
    remainder.starts_with(['\'', '"', '`', '/']) || remainder.starts_with("[(")
}

/// Tokenizes a clause. Errors carry `position`, the location of the rule
/// the clause belongs to.
pub fn tokenize(source: &str, position: &Position) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source);

    while !lex.at_eof() {
        let start = lex.pos;
        let pattern = PATTERNS
            .iter()
            .find(|pattern| pattern.regex.is_match(lex.remainder()));

        match pattern {
            Some(pattern) => (pattern.handler)(&mut lex, &pattern.regex),
            None if is_literal_opening(lex.remainder()) => {
                return Err(Error::new(
                    ErrorImpl::UnterminatedLiteral {
                        literal: lex.remainder().to_string(),
                    },
                    position.clone(),
                ));
            }
            None => {}
        }

        if lex.pos == start {
            let token = lex.remainder().chars().next().unwrap_or_default().to_string();
            return Err(Error::new(ErrorImpl::UnrecognisedToken { token }, position.clone()));
        }
    }

    let offset = lex.pos;
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), offset));
    Ok(lex.tokens)
}
