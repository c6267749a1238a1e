use std::fmt::Display;

use crate::Position;

use super::pattern::Pattern;

/// The parsed form of a rule-description text.
///
/// Rule order in `if_rules` and `let_rules` is authoring order, which is
/// also first-match precedence.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSpecification {
    pub if_rules: Vec<IfRule>,
    pub let_rules: Vec<LetRule>,
    pub break_pattern: Pattern,
    pub definitions: Vec<Definition>,
}

impl Default for RuleSpecification {
    fn default() -> Self {
        RuleSpecification {
            if_rules: vec![],
            let_rules: vec![],
            break_pattern: Pattern::default_break(),
            definitions: vec![],
        }
    }
}

/// `if <test> then <action>`
#[derive(Debug, Clone, PartialEq)]
pub struct IfRule {
    pub test: String,
    pub action: String,
    pub position: Position,
}

/// `let <test> <kind> <action>`
#[derive(Debug, Clone, PartialEq)]
pub struct LetRule {
    pub test: String,
    pub kind: LetKind,
    pub action: String,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetKind {
    Be,
    BeGroup,
    Throw,
    ExpandGroup,
}

impl Display for LetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LetKind::Be => write!(f, "be"),
            LetKind::BeGroup => write!(f, "be group"),
            LetKind::Throw => write!(f, "throw"),
            LetKind::ExpandGroup => write!(f, "expand group"),
        }
    }
}

/// `define <name> [= <value>]`
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub name: String,
    pub value: Option<String>,
}
