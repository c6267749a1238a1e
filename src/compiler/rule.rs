use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

use crate::{
    errors::errors::Error,
    spec::types::{IfRule, LetRule, RuleSpecification},
    tokenizer::context::ScanContext,
    Position,
};

use super::{
    action::{compile_action, execute_steps, ActionKind, Flow, Step},
    expr::{compile_test, Predicate},
    host::CompileScope,
};

lazy_static! {
    static ref LEADING_TAG: Regex = Regex::new(r"^\s*#(\w+)").unwrap();
}

/// One "when predicate holds, run steps" unit of a rule chain.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub kind: ActionKind,
    pub predicate: Predicate,
    pub look_back: usize,
    pub steps: Vec<Step>,
    pub position: Position,
}

impl CompiledRule {
    pub fn matches(&self, context: &ScanContext) -> bool {
        self.predicate.evaluate(context)
    }

    pub fn run(&self, context: &mut ScanContext) -> Result<Flow, Error> {
        trace!(
            "rule at {}:{} matched {:?}",
            self.position.1,
            self.position.0,
            context.token().text
        );
        context.look_back = self.look_back;
        context.skip = 0;
        execute_steps(&self.steps, context)
    }
}

/// Compiled if-rules and let-rules, each in authoring order.
#[derive(Debug, Clone, Default)]
pub struct RuleChain {
    pub if_rules: Vec<CompiledRule>,
    pub let_rules: Vec<CompiledRule>,
}

/// Compiles an if-rule. A leading `#name` in the action records `name` on
/// the in-progress token before the remaining steps run.
///
/// Returns `None` when the test is empty.
pub fn compile_if_rule(rule: &IfRule, scope: &CompileScope) -> Result<Option<CompiledRule>, Error> {
    let (tag, action) = match LEADING_TAG.captures(&rule.action) {
        Some(captures) => (
            captures.get(1).map(|m| m.as_str().to_string()),
            &rule.action[captures.get(0).map_or(0, |m| m.end())..],
        ),
        None => (None, rule.action.as_str()),
    };

    let test = compile_test(&rule.test, scope, &rule.position)?;
    let mut steps = compile_action(
        ActionKind::Then,
        action,
        test.look_back,
        scope,
        &rule.position,
    )?;

    if let Some(tag) = tag {
        steps.insert(0, Step::Tag(tag));
    }

    Ok(test.predicate.map(|predicate| CompiledRule {
        kind: ActionKind::Then,
        predicate,
        look_back: test.look_back,
        steps,
        position: rule.position.clone(),
    }))
}

/// Compiles a let-rule. Returns `None` when the test is empty.
pub fn compile_let_rule(
    rule: &LetRule,
    scope: &CompileScope,
) -> Result<Option<CompiledRule>, Error> {
    let kind = ActionKind::Let(rule.kind);
    let test = compile_test(&rule.test, scope, &rule.position)?;
    let steps = compile_action(kind, &rule.action, test.look_back, scope, &rule.position)?;

    Ok(test.predicate.map(|predicate| CompiledRule {
        kind,
        predicate,
        look_back: test.look_back,
        steps,
        position: rule.position.clone(),
    }))
}

/// Compiles every rule of a specification. The first rule that fails to
/// compile aborts the whole build.
pub fn compile_rules(spec: &RuleSpecification, scope: &CompileScope) -> Result<RuleChain, Error> {
    let mut chain = RuleChain::default();

    for rule in &spec.if_rules {
        chain.if_rules.extend(compile_if_rule(rule, scope)?);
    }

    for rule in &spec.let_rules {
        chain.let_rules.extend(compile_let_rule(rule, scope)?);
    }

    Ok(chain)
}

/// First rule of the chain whose predicate holds.
pub fn find_match<'a>(
    rules: &'a [CompiledRule],
    context: &ScanContext,
) -> Option<&'a CompiledRule> {
    rules.iter().find(|rule| rule.matches(context))
}

/// Evaluates a chain once: the first matching rule runs, the rest are skipped.
pub fn evaluate_chain(rules: &[CompiledRule], context: &mut ScanContext) -> Result<Flow, Error> {
    match find_match(rules, context) {
        Some(rule) => rule.run(context),
        None => Ok(Flow::Proceed),
    }
}
