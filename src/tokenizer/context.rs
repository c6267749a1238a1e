use std::collections::HashMap;

use super::types::{Token, Value};

/// Mutable state of one tokenize call.
///
/// A fresh context is created per call and never shared, which is what
/// keeps a `Tokenizer` safe to use from several threads at once. Host
/// callbacks receive the context of the call they run in.
#[derive(Debug, Clone, Default)]
pub struct ScanContext {
    pub(crate) input: Vec<char>,
    pub(crate) index: usize,
    pub(crate) token: Token,
    pub(crate) tokens: Vec<Token>,
    pub(crate) definitions: HashMap<String, Value>,
    /// Extra characters the current boundary event consumes (`skip N`).
    pub(crate) skip: usize,
    /// Look-back count of the rule that matched last.
    pub(crate) look_back: usize,
}

impl ScanContext {
    pub fn new(input: &str, definitions: HashMap<String, Value>) -> Self {
        ScanContext {
            input: input.chars().collect(),
            definitions,
            ..Default::default()
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_char(&self) -> Option<char> {
        self.input.get(self.index).copied()
    }

    /// The character `offset` positions after the scan index.
    pub fn char_ahead(&self, offset: usize) -> Option<char> {
        self.input.get(self.index + offset).copied()
    }

    /// The in-progress token.
    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn token_mut(&mut self) -> &mut Token {
        &mut self.token
    }

    /// Tokens emitted so far, oldest first.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The emitted token `distance` places from the end; `1` is the last one.
    pub fn token_behind(&self, distance: usize) -> Option<&Token> {
        if distance == 0 {
            return None;
        }
        self.tokens
            .len()
            .checked_sub(distance)
            .and_then(|index| self.tokens.get(index))
    }

    pub fn definition(&self, name: &str) -> Option<&Value> {
        self.definitions.get(name)
    }

    pub fn set_definition(&mut self, name: impl Into<String>, value: Value) {
        self.definitions.insert(name.into(), value);
    }

    pub fn skip(&self) -> usize {
        self.skip
    }

    pub fn look_back(&self) -> usize {
        self.look_back
    }

    /// Byte offset of the scan index, used to position runtime errors.
    pub(crate) fn byte_offset(&self) -> usize {
        self.input
            .iter()
            .take(self.index)
            .map(|ch| ch.len_utf8())
            .sum()
    }

    /// Emits the in-progress token if it has text and starts an empty one.
    pub(crate) fn flush(&mut self) {
        let token = std::mem::take(&mut self.token);
        if !token.is_empty() {
            self.tokens.push(token);
        }
    }

    /// Moves the `look_back` most recent emitted tokens onto the front of
    /// the in-progress token, in emission order.
    pub(crate) fn join_behind(&mut self) {
        let count = self.look_back.min(self.tokens.len());
        let start = self.tokens.len() - count;

        let prefix: String = self
            .tokens
            .drain(start..)
            .map(|token| token.text)
            .collect();

        self.token.text.insert_str(0, &prefix);
    }
}
