//! Compilation of rule test clauses.
//!
//! A test clause such as `'a' <- /\d+/ && #number -> /\s/` becomes a
//! `Predicate` tree. Every operand is bound to the thing it inspects (its
//! `Target`) by the positional operators around it, and the operands are
//! combined with `&&` binding tighter than `||`.

use log::warn;

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::tokenize,
        tokens::{Token, TokenKind},
    },
    spec::pattern::Pattern,
    tokenizer::{
        context::ScanContext,
        types::{self, Value},
    },
    Position,
};

use super::host::{CompileScope, HostTest};

/// What an operand of a test clause inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The in-progress token.
    Token,
    /// The raw character at the scan index.
    Character,
    /// The character this many positions after the scan index.
    Ahead(usize),
    /// The emitted token this many places from the end (1 = last emitted).
    Behind(usize),
}

#[derive(Debug, Clone)]
pub enum Matcher {
    Pattern(Pattern),
    Text(String),
    Tag(String),
}

impl Matcher {
    pub fn matches_token(&self, token: &types::Token) -> bool {
        match self {
            Matcher::Pattern(pattern) => pattern.is_match(&token.text),
            Matcher::Text(text) => *text == token.text,
            Matcher::Tag(tag) => token.has_tag(tag),
        }
    }

    /// Characters past the end of input read as the empty string.
    pub fn matches_char(&self, ch: Option<char>) -> bool {
        let mut buffer = [0; 4];
        let text: &str = match ch {
            Some(ch) => ch.encode_utf8(&mut buffer),
            None => "",
        };

        match self {
            Matcher::Pattern(pattern) => pattern.is_match(text),
            Matcher::Text(expected) => expected == text,
            Matcher::Tag(_) => false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Predicate {
    Test { target: Target, matcher: Matcher },
    Definition(String),
    Host(HostTest),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn evaluate(&self, context: &ScanContext) -> bool {
        match self {
            Predicate::Test { target, matcher } => match target {
                Target::Token => matcher.matches_token(context.token()),
                Target::Behind(distance) => context
                    .token_behind(*distance)
                    .is_some_and(|token| matcher.matches_token(token)),
                Target::Character => matcher.matches_char(context.current_char()),
                Target::Ahead(offset) => matcher.matches_char(context.char_ahead(*offset)),
            },
            Predicate::Definition(name) => context.definition(name).is_some_and(Value::is_truthy),
            Predicate::Host(host) => host.call(context),
            Predicate::And(left, right) => left.evaluate(context) && right.evaluate(context),
            Predicate::Or(left, right) => left.evaluate(context) || right.evaluate(context),
        }
    }
}

/// Result of compiling one test clause.
#[derive(Debug, Clone)]
pub struct CompiledTest {
    /// `None` for an empty clause, which can never match.
    pub predicate: Option<Predicate>,
    /// Number of operands addressing emitted tokens through `<-`.
    pub look_back: usize,
}

enum Item {
    Operand(Predicate),
    And,
    Or,
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

fn check_positional_operators(tokens: &[Token], position: &Position) -> Result<(), Error> {
    for (i, token) in tokens.iter().enumerate() {
        if !token.kind.is_positional() {
            continue;
        }

        let left = i > 0 && tokens[i - 1].kind.is_operand();
        let right = tokens.get(i + 1).is_some_and(|next| next.kind.is_operand());

        match token.kind {
            TokenKind::Current if !left && !right => {
                return Err(unexpected(token, "expected an operand next to `<->`", position));
            }
            TokenKind::LookAhead | TokenKind::LookBehind if !(left && right) => {
                return Err(unexpected(token, "expected an operand on both sides", position));
            }
            _ => {}
        }
    }

    Ok(())
}

/// Binds every operand to its target. Returns the targets indexed like
/// `tokens` (`None` for non-operands) and the look-back count.
fn resolve_targets(tokens: &[Token]) -> (Vec<Option<Target>>, usize) {
    let mut targets = vec![None; tokens.len()];
    let mut ahead = 0;
    let mut behind = 0;

    for (i, token) in tokens.iter().enumerate() {
        if !token.kind.is_operand() {
            continue;
        }

        let previous = i.checked_sub(1).map(|j| tokens[j].kind);
        let next = tokens.get(i + 1).map(|next| next.kind);

        let current = previous == Some(TokenKind::Current) || next == Some(TokenKind::Current);

        targets[i] = Some(if current {
            Target::Character
        } else if previous == Some(TokenKind::LookAhead) {
            ahead += 1;
            Target::Ahead(ahead)
        } else if next == Some(TokenKind::LookBehind) {
            // Numbered in source order for now, flipped to distances below
            behind += 1;
            Target::Behind(behind)
        } else {
            Target::Token
        });
    }

    for target in targets.iter_mut().flatten() {
        if let Target::Behind(order) = target {
            *target = Target::Behind(behind - *order + 1);
        }
    }

    (targets, behind)
}

fn compile_operand(
    token: &Token,
    target: Target,
    scope: &CompileScope,
    position: &Position,
) -> Result<Predicate, Error> {
    let matcher = match token.kind {
        TokenKind::Pattern => Matcher::Pattern(
            Pattern::from_literal(&token.value)
                .map_err(|error| Error::new(error, position.clone()))?,
        ),
        TokenKind::String => Matcher::Text(token.value.clone()),
        TokenKind::Tag => Matcher::Tag(token.value.clone()),
        TokenKind::HostExpression => {
            if let Some(host) = scope.hosts().resolve_test(&token.value) {
                return Ok(Predicate::Host(host));
            }
            if scope.is_definition(&token.value) {
                return Ok(Predicate::Definition(token.value.clone()));
            }
            return Err(Error::new(
                ErrorImpl::UnknownHostExpression {
                    expression: token.value.clone(),
                },
                position.clone(),
            ));
        }
        _ => return Err(unexpected(token, "expected an operand", position)),
    };

    Ok(Predicate::Test { target, matcher })
}

fn combine(items: Vec<(Item, &Token)>, position: &Position) -> Result<Option<Predicate>, Error> {
    let mut disjuncts: Vec<Predicate> = vec![];
    let mut current: Option<Predicate> = None;
    let mut last_combinator: Option<&Token> = None;

    for (item, token) in items {
        match item {
            Item::Operand(predicate) => {
                current = Some(match current.take() {
                    Some(left) => Predicate::And(Box::new(left), Box::new(predicate)),
                    None => predicate,
                });
                last_combinator = None;
            }
            Item::And | Item::Or => {
                if current.is_none() || last_combinator.is_some() {
                    return Err(unexpected(
                        token,
                        "expected an operand before this operator",
                        position,
                    ));
                }
                if let Item::Or = item {
                    disjuncts.extend(current.take());
                }
                last_combinator = Some(token);
            }
        }
    }

    if let Some(token) = last_combinator {
        return Err(unexpected(token, "expected an operand after this operator", position));
    }

    disjuncts.extend(current);

    Ok(disjuncts
        .into_iter()
        .reduce(|left, right| Predicate::Or(Box::new(left), Box::new(right))))
}

/// Compiles the test clause of a rule.
///
/// # Arguments
///
/// * `test` - The clause text, e.g. `'a' <- #number`
/// * `scope` - Definitions and host callbacks the clause may refer to
/// * `position` - Location of the rule, used for errors
///
/// # Returns
///
/// The predicate tree and the clause's look-back count.
pub fn compile_test(
    test: &str,
    scope: &CompileScope,
    position: &Position,
) -> Result<CompiledTest, Error> {
    let mut tokens = tokenize(test, position)?;
    tokens.retain(|token| token.kind != TokenKind::EOF);

    check_positional_operators(&tokens, position)?;
    let (targets, look_back) = resolve_targets(&tokens);

    let mut items = vec![];
    for (token, target) in tokens.iter().zip(targets) {
        let item = match token.kind {
            _ if token.kind.is_operand() => {
                let target = target.unwrap_or(Target::Token);
                Item::Operand(compile_operand(token, target, scope, position)?)
            }
            _ if token.kind.is_word() && scope.is_definition(&token.value) => {
                Item::Operand(Predicate::Definition(token.value.clone()))
            }
            // Any other bare word reads as `&&`
            _ if token.kind.is_word() => Item::And,
            TokenKind::And => Item::And,
            TokenKind::Or => Item::Or,
            _ if token.kind.is_positional() => continue,
            _ => return Err(unexpected(token, "not allowed in a test", position)),
        };
        items.push((item, token));
    }

    let predicate = combine(items, position)?;
    if predicate.is_none() {
        warn!("empty test at {}:{} can never match", position.1, position.0);
    }

    Ok(CompiledTest {
        predicate,
        look_back,
    })
}
