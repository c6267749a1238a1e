//! Compilation and execution of rule action clauses.

use std::{fmt::Display, sync::Arc};

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::tokenize,
        tokens::{Token, TokenKind},
    },
    spec::types::LetKind,
    tokenizer::{context::ScanContext, types},
    Position,
};

use super::host::{CompileScope, HostAction};

/// The rule form an action belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Then,
    Let(LetKind),
}

impl ActionKind {
    /// Whether `continue`, `skip N` and `skip token` may be used.
    pub fn allows_flow_control(&self) -> bool {
        match self {
            ActionKind::Then => true,
            ActionKind::Let(_) => false,
        }
    }
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::Then => write!(f, "then"),
            ActionKind::Let(kind) => write!(f, "{}", kind),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Step {
    /// Fold the boundary character into the in-progress token.
    Continue,
    /// Consume this many characters, boundary character included.
    Skip(usize),
    /// Drop the in-progress token.
    SkipToken,
    Throw(String),
    /// Pull this many emitted tokens onto the front of the in-progress token.
    Join(usize),
    Tag(String),
    Host(HostAction),
}

/// How a boundary event continues after a rule's steps ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Proceed,
    Fold,
    Skip,
}

fn unexpected(token: &Token, message: &str, position: &Position) -> Error {
    Error::new(
        ErrorImpl::UnexpectedToken {
            token: token.value.clone(),
            message: message.to_string(),
        },
        position.clone(),
    )
}

fn check_flow_control(kind: ActionKind, token: &Token, position: &Position) -> Result<(), Error> {
    if kind.allows_flow_control() {
        return Ok(());
    }

    Err(Error::new(
        ErrorImpl::ActionNotAllowed {
            keyword: token.value.clone(),
            kind: kind.to_string(),
        },
        position.clone(),
    ))
}

fn compile_skip(next: Option<&Token>, position: &Position) -> Result<Step, Error> {
    let invalid = |count: &str| {
        Error::new(
            ErrorImpl::InvalidSkipCount {
                count: count.to_string(),
            },
            position.clone(),
        )
    };

    match next {
        Some(token) if token.kind == TokenKind::TokenKeyword => Ok(Step::SkipToken),
        Some(token) if token.kind == TokenKind::Number => match token.value.parse::<usize>() {
            Ok(count) if count >= 1 => Ok(Step::Skip(count)),
            _ => Err(invalid(&token.value)),
        },
        Some(token) if token.kind != TokenKind::EOF => Err(invalid(&token.value)),
        _ => Err(invalid("")),
    }
}

/// Compiles the action clause of a rule into an ordered list of steps.
///
/// # Arguments
///
/// * `kind` - `then` for if-rules, the let kind for let-rules
/// * `action` - The clause text
/// * `look_back` - Look-back count of the rule's test, used by `join`
/// * `scope` - Host callbacks the clause may refer to
/// * `position` - Location of the rule, used for errors
pub fn compile_action(
    kind: ActionKind,
    action: &str,
    look_back: usize,
    scope: &CompileScope,
    position: &Position,
) -> Result<Vec<Step>, Error> {
    let tokens = tokenize(action, position)?;

    if kind == ActionKind::Let(LetKind::Throw) {
        return match tokens.as_slice() {
            [message, eof] if message.kind == TokenKind::String && eof.kind == TokenKind::EOF => {
                Ok(vec![Step::Throw(message.value.clone())])
            }
            [first, ..] => Err(unexpected(first, "expected a single string literal", position)),
            [] => Ok(vec![]),
        };
    }

    let mut steps = vec![];
    let mut iter = tokens.iter().peekable();

    while let Some(token) = iter.next() {
        let step = match token.kind {
            TokenKind::EOF => break,
            TokenKind::Semicolon => continue,
            TokenKind::Continue => {
                check_flow_control(kind, token, position)?;
                Step::Continue
            }
            TokenKind::Skip => {
                check_flow_control(kind, token, position)?;
                let step = compile_skip(iter.peek().copied(), position)?;
                iter.next();
                step
            }
            TokenKind::Throw => match iter.next() {
                Some(message) if message.kind == TokenKind::String => {
                    Step::Throw(message.value.clone())
                }
                other => {
                    let found = other.unwrap_or(token);
                    return Err(unexpected(
                        found,
                        "expected a string literal after `throw`",
                        position,
                    ));
                }
            },
            TokenKind::Join => Step::Join(look_back),
            TokenKind::Tag => Step::Tag(token.value.clone()),
            TokenKind::HostExpression => match scope.hosts().resolve_action(&token.value) {
                Some(host) => Step::Host(host),
                None => {
                    return Err(Error::new(
                        ErrorImpl::UnknownHostExpression {
                            expression: token.value.clone(),
                        },
                        position.clone(),
                    ))
                }
            },
            _ => return Err(unexpected(token, "not allowed in an action", position)),
        };

        steps.push(step);
    }

    Ok(steps)
}

fn thrown(message: String, context: &ScanContext) -> Error {
    Error::new(
        ErrorImpl::Thrown { message },
        Position(context.byte_offset() as u32, Arc::new(String::from("<input>"))),
    )
}

/// Runs compiled steps against a scan context.
pub fn execute_steps(steps: &[Step], context: &mut ScanContext) -> Result<Flow, Error> {
    let mut flow = Flow::Proceed;

    for step in steps {
        match step {
            Step::Continue => flow = Flow::Fold,
            Step::Skip(count) => {
                context.skip = count - 1;
                flow = Flow::Skip;
            }
            Step::SkipToken => context.token = types::Token::default(),
            Step::Throw(message) => return Err(thrown(message.clone(), context)),
            Step::Join(count) => {
                context.look_back = *count;
                context.join_behind();
            }
            Step::Tag(tag) => context.token.add_tag(tag.clone()),
            Step::Host(host) => {
                if let Err(message) = host.call(context) {
                    return Err(thrown(message, context));
                }
            }
        }
    }

    Ok(flow)
}
