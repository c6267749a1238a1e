use std::{collections::BTreeSet, fmt::Display};

use crate::lexer::lexer::unescape;

/// Minimal lexical unit produced by a tokenizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub tags: BTreeSet<String>,
}

impl Token {
    pub fn new(text: impl Into<String>) -> Self {
        Token {
            text: text.into(),
            tags: BTreeSet::new(),
        }
    }

    pub fn with_tags<I, S>(text: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Token {
            text: text.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.insert(tag.into());
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.text)?;
        if !self.tags.is_empty() {
            let tags = self
                .tags
                .iter()
                .map(|tag| format!("#{}", tag))
                .collect::<Vec<_>>()
                .join(" ");
            write!(f, " [{}]", tags)?;
        }
        Ok(())
    }
}

/// Value of a `define`d scan-time variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Undefined,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    /// Evaluates the initial-value expression of a definition.
    pub fn from_expression(expression: Option<&str>) -> Value {
        let Some(expression) = expression.map(str::trim) else {
            return Value::Undefined;
        };

        match expression {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            _ => {}
        }

        if let Ok(number) = expression.parse::<f64>() {
            return Value::Number(number);
        }

        let mut chars = expression.chars();
        if let (Some(first), Some(last)) = (chars.next(), chars.next_back()) {
            if first == last && matches!(first, '\'' | '"' | '`') {
                return Value::Text(unescape(&expression[1..expression.len() - 1]));
            }
        }

        Value::Text(expression.to_string())
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined => false,
            Value::Bool(value) => *value,
            Value::Number(value) => *value != 0.0 && !value.is_nan(),
            Value::Text(value) => !value.is_empty(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Number(value) => write!(f, "{}", value),
            Value::Text(value) => write!(f, "{:?}", value),
        }
    }
}
