//! Tokenizer assembly and the scanning state machine.
//!
//! Scanning walks the input one character at a time. Characters that do
//! not match the break pattern accumulate into the in-progress token. A
//! boundary character triggers a boundary event:
//!
//! 1. the if-rule chain is evaluated against the in-progress token,
//! 2. the in-progress token is emitted and a boundary token is seeded with
//!    the boundary character,
//! 3. the chain is evaluated again against the boundary token,
//! 4. the boundary token is emitted.
//!
//! `continue` and `skip N` end the event early. After scanning, let-rules
//! run over the emitted tokens (see `Tokenizer::apply_let_rules`).

use std::collections::HashMap;

use log::debug;

use crate::{
    compiler::{
        action::{ActionKind, Flow},
        host::{CompileScope, HostRegistry},
        rule::{compile_rules, evaluate_chain, find_match, RuleChain},
    },
    errors::errors::Error,
    spec::{
        pattern::Pattern,
        types::{LetKind, RuleSpecification},
    },
};

use super::{
    context::ScanContext,
    types::{Token, Value},
};

/// A compiled specification: turns input text into tokens.
///
/// Each call to `tokenize` works on its own `ScanContext`, so one tokenizer
/// can serve any number of calls, including concurrent ones.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    break_pattern: Pattern,
    rules: RuleChain,
    definitions: HashMap<String, Value>,
}

impl Tokenizer {
    pub fn break_pattern(&self) -> &Pattern {
        &self.break_pattern
    }

    pub fn rules(&self) -> &RuleChain {
        &self.rules
    }

    /// Splits `input` into tokens.
    ///
    /// A `throw` step, or a failing host action, aborts the call; no tokens
    /// are returned in that case.
    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>, Error> {
        let mut context = ScanContext::new(input, self.definitions.clone());

        while context.index < context.input.len() {
            let ch = context.input[context.index];

            if self.break_pattern.matches_char(ch) {
                self.scan_boundary(&mut context, ch)?;
            } else {
                context.token.text.push(ch);
            }

            context.index += 1;
        }

        context.flush();
        self.apply_let_rules(context)
    }

    fn scan_boundary(&self, context: &mut ScanContext, ch: char) -> Result<(), Error> {
        match evaluate_chain(&self.rules.if_rules, context)? {
            Flow::Fold => {
                context.token.text.push(ch);
                return Ok(());
            }
            Flow::Skip => {
                consume_skipped(context);
                return Ok(());
            }
            Flow::Proceed => {}
        }

        context.flush();
        context.token = Token::new(ch);

        match evaluate_chain(&self.rules.if_rules, context)? {
            // The boundary token stays in progress and keeps collecting text
            Flow::Fold => return Ok(()),
            Flow::Skip => {
                context.token = Token::default();
                consume_skipped(context);
                return Ok(());
            }
            Flow::Proceed => {}
        }

        context.flush();
        Ok(())
    }

    /// Runs the let-rule chain over the scanned tokens.
    ///
    /// Every token in turn becomes the in-progress token, with the tokens
    /// already passed as its look-behind list. The character view is the
    /// concatenated token text with the scan index on the token's last
    /// character, so `->` operands read the text right after the token.
    fn apply_let_rules(&self, mut context: ScanContext) -> Result<Vec<Token>, Error> {
        if self.rules.let_rules.is_empty() {
            return Ok(context.tokens);
        }

        let scanned = std::mem::take(&mut context.tokens);
        context.input = scanned.iter().flat_map(|token| token.text.chars()).collect();

        let mut end = 0;
        for token in scanned {
            end += token.text.chars().count();
            context.index = end.saturating_sub(1);
            context.token = token;

            let Some(rule) = find_match(&self.rules.let_rules, &context) else {
                context.flush();
                continue;
            };

            let ActionKind::Let(kind) = rule.kind else {
                context.flush();
                continue;
            };

            match kind {
                LetKind::Be | LetKind::Throw => {
                    rule.run(&mut context)?;
                    context.flush();
                }
                LetKind::BeGroup => {
                    context.look_back = rule.look_back;
                    context.join_behind();
                    rule.run(&mut context)?;
                    context.flush();
                }
                LetKind::ExpandGroup => {
                    rule.run(&mut context)?;
                    let token = std::mem::take(&mut context.token);
                    context.tokens.extend(self.expand(token));
                }
            }
        }

        Ok(context.tokens)
    }

    /// Splits a token at break-pattern characters into runs of text and
    /// single boundary characters, each keeping the token's tags.
    fn expand(&self, token: Token) -> Vec<Token> {
        let mut parts = vec![];
        let mut run = String::new();

        for ch in token.text.chars() {
            if !self.break_pattern.matches_char(ch) {
                run.push(ch);
                continue;
            }

            if !run.is_empty() {
                parts.push(std::mem::take(&mut run));
            }
            parts.push(ch.to_string());
        }

        if !run.is_empty() {
            parts.push(run);
        }

        parts
            .into_iter()
            .map(|text| Token {
                text,
                tags: token.tags.clone(),
            })
            .collect()
    }
}

fn consume_skipped(context: &mut ScanContext) {
    context.index = (context.index + context.skip).min(context.input.len());
    context.skip = 0;
}

/// Builds a tokenizer for a specification without host callbacks.
pub fn build_tokenizer(spec: &RuleSpecification) -> Result<Tokenizer, Error> {
    build_tokenizer_with(spec, &HostRegistry::new())
}

/// Builds a tokenizer for a specification.
///
/// # Arguments
///
/// * `spec` - The parsed specification
/// * `hosts` - Callbacks backing the `[( ... )]` expressions of the rules
///
/// # Returns
///
/// The tokenizer, or the error of the first rule that failed to compile.
pub fn build_tokenizer_with(
    spec: &RuleSpecification,
    hosts: &HostRegistry,
) -> Result<Tokenizer, Error> {
    let scope = CompileScope::new(&spec.definitions, hosts);
    let rules = compile_rules(spec, &scope)?;

    let definitions = spec
        .definitions
        .iter()
        .map(|definition| {
            (
                definition.name.clone(),
                Value::from_expression(definition.value.as_deref()),
            )
        })
        .collect();

    debug!(
        "assembled tokenizer: {} if rules, {} let rules, break on {}",
        rules.if_rules.len(),
        rules.let_rules.len(),
        spec.break_pattern
    );

    Ok(Tokenizer {
        break_pattern: spec.break_pattern.clone(),
        rules,
        definitions,
    })
}
