//! Unit tests for the tokenizer.
//!
//! This module contains tests for the boundary state machine, the rule
//! actions as seen from scanning, and the let-rule pass.

use std::{collections::HashMap, sync::Arc, thread};

use crate::{
    compiler::host::HostRegistry,
    errors::errors::ErrorCategory,
    spec::{parser::parse_specification, types::RuleSpecification},
};

use super::{
    context::ScanContext,
    tokenizer::{build_tokenizer, build_tokenizer_with, Tokenizer},
    types::{Token, Value},
};

fn tokenizer(source: &str) -> Tokenizer {
    let spec = parse_specification(source).unwrap();
    build_tokenizer(&spec).unwrap()
}

fn texts(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|token| token.text.as_str()).collect()
}

#[test]
fn test_default_spec_splits_on_non_word() {
    let tokenizer = build_tokenizer(&RuleSpecification::default()).unwrap();
    let tokens = tokenizer.tokenize("ab,cd").unwrap();

    assert_eq!(
        tokens,
        vec![Token::new("ab"), Token::new(","), Token::new("cd")]
    );
}

#[test]
fn test_default_spec_breaks_on_non_ascii_letters() {
    let tokenizer = build_tokenizer(&RuleSpecification::default()).unwrap();
    let tokens = tokenizer.tokenize("café,x").unwrap();

    assert_eq!(texts(&tokens), vec!["caf", "é", ",", "x"]);
}

#[test]
fn test_consecutive_boundaries() {
    let tokenizer = build_tokenizer(&RuleSpecification::default()).unwrap();
    let tokens = tokenizer.tokenize(", a").unwrap();

    assert_eq!(texts(&tokens), vec![",", " ", "a"]);
}

#[test]
fn test_empty_input() {
    let tokenizer = build_tokenizer(&RuleSpecification::default()).unwrap();
    assert!(tokenizer.tokenize("").unwrap().is_empty());
}

#[test]
fn test_continue_folds_boundary() {
    let tokenizer = tokenizer("if 'test' then continue");
    let tokens = tokenizer.tokenize("test,x").unwrap();

    assert_eq!(texts(&tokens), vec!["test,x"]);
}

#[test]
fn test_continue_only_for_matching_token() {
    let tokenizer = tokenizer("if 'test' then continue");
    let tokens = tokenizer.tokenize("a,test b").unwrap();

    assert_eq!(texts(&tokens), vec!["a", ",", "test b"]);
}

#[test]
fn test_break_on_custom_pattern() {
    let tokenizer = tokenizer("break on /,/");
    let tokens = tokenizer.tokenize("ab cd,ef").unwrap();

    assert_eq!(texts(&tokens), vec!["ab cd", ",", "ef"]);
}

#[test]
fn test_skip_token_drops_boundary() {
    let tokenizer = tokenizer("if ',' then skip token");
    let tokens = tokenizer.tokenize("a,b").unwrap();

    assert_eq!(texts(&tokens), vec!["a", "b"]);
}

#[test]
fn test_join_with_look_back() {
    let tokenizer = tokenizer("if 'a' <- ',' then join");
    let tokens = tokenizer.tokenize("a,b").unwrap();

    assert_eq!(texts(&tokens), vec!["a,", "b"]);
}

#[test]
fn test_join_without_enough_tokens() {
    let tokenizer = tokenizer("if #x <- '.' || '.' then join");
    let tokens = tokenizer.tokenize(".a").unwrap();

    assert_eq!(texts(&tokens), vec![".", "a"]);
}

#[test]
fn test_skip_count_consumes_following_characters() {
    let tokenizer = tokenizer("if ',' then skip 2");
    let tokens = tokenizer.tokenize("a,xb").unwrap();

    assert_eq!(texts(&tokens), vec!["a", "b"]);
}

#[test]
fn test_skip_count_past_end() {
    let tokenizer = tokenizer("if ',' then skip 5");
    let tokens = tokenizer.tokenize("a,b").unwrap();

    assert_eq!(texts(&tokens), vec!["a"]);
}

#[test]
fn test_skip_on_current_character_keeps_token_open() {
    let tokenizer = tokenizer("if <-> ',' -> ' ' then skip 2");
    let tokens = tokenizer.tokenize("a, b").unwrap();

    assert_eq!(texts(&tokens), vec!["ab"]);
}

#[test]
fn test_leading_tag_marks_token() {
    let tokenizer = tokenizer(r"if /^\d+$/ then #number");
    let tokens = tokenizer.tokenize("12 ab").unwrap();

    assert_eq!(
        tokens,
        vec![
            Token::with_tags("12", ["number"]),
            Token::new(" "),
            Token::new("ab"),
        ]
    );
}

#[test]
fn test_trailing_token_is_not_evaluated() {
    let tokenizer = tokenizer(r"if /^\d+$/ then #number");
    let tokens = tokenizer.tokenize("ab 12").unwrap();

    assert_eq!(tokens.last(), Some(&Token::new("12")));
}

#[test]
fn test_tag_visible_to_look_behind() {
    let source = "\
if /^\\d+$/ then #number
if #number <- '%' then join #percent
";
    let tokenizer = tokenizer(source);
    let tokens = tokenizer.tokenize("50% off").unwrap();

    assert_eq!(tokens[0].text, "50%");
    assert!(tokens[0].has_tag("percent"));
    assert_eq!(texts(&tokens), vec!["50%", " ", "off"]);
}

#[test]
fn test_first_matching_rule_wins() {
    let source = "\
if ',' then #first
if ',' then #second
";
    let tokenizer = tokenizer(source);
    let tokens = tokenizer.tokenize("a,b").unwrap();

    assert_eq!(tokens[1], Token::with_tags(",", ["first"]));
}

#[test]
fn test_throw_aborts_call() {
    let tokenizer = tokenizer("if ',' then throw 'bad input'");
    let error = tokenizer.tokenize("a,b").unwrap_err();

    assert_eq!(error.get_category(), ErrorCategory::RuntimeThrow);
    assert_eq!(error.get_internal_error().to_string(), "bad input");
    assert_eq!(error.get_position().0, 1);
}

#[test]
fn test_tokenizer_reusable_after_throw() {
    let tokenizer = tokenizer("if ',' then throw 'bad input'");

    assert!(tokenizer.tokenize("a,b").is_err());
    assert_eq!(texts(&tokenizer.tokenize("a b").unwrap()), vec!["a", " ", "b"]);
}

#[test]
fn test_definition_as_test() {
    let enabled = tokenizer("define strip = true\nif strip && ' ' then skip token");
    let disabled = tokenizer("define strip = false\nif strip && ' ' then skip token");

    assert_eq!(texts(&enabled.tokenize("a b").unwrap()), vec!["a", "b"]);
    assert_eq!(texts(&disabled.tokenize("a b").unwrap()), vec!["a", " ", "b"]);
}

#[test]
fn test_definition_visible_to_hosts() {
    let spec = parse_specification("define limit = 1\nif [(over limit)] then #long").unwrap();
    let hosts = HostRegistry::new().with_test("over limit", |context: &ScanContext| {
        match context.definition("limit") {
            Some(Value::Number(limit)) => context.token().text.len() as f64 > *limit,
            _ => false,
        }
    });
    let tokenizer = build_tokenizer_with(&spec, &hosts).unwrap();
    let tokens = tokenizer.tokenize("a bb c").unwrap();

    assert!(!tokens[0].has_tag("long"));
    assert!(tokens[2].has_tag("long"));
}

#[test]
fn test_definition_without_value() {
    let spec = parse_specification("define seen\nif ',' then [(mark)]").unwrap();
    let hosts = HostRegistry::new().with_action("mark", |context: &mut ScanContext| {
        if context.definition("seen") != Some(&Value::Undefined) {
            return Err(String::from("seen was already set"));
        }
        context.set_definition("seen", Value::Bool(true));
        Ok(())
    });
    let tokenizer = build_tokenizer_with(&spec, &hosts).unwrap();

    let error = tokenizer.tokenize("a,b,c").unwrap_err();
    assert_eq!(error.get_category(), ErrorCategory::RuntimeThrow);
    assert_eq!(error.get_internal_error().to_string(), "seen was already set");

    // Definitions start over on every call
    assert!(tokenizer.tokenize("a,b").is_ok());
}

#[test]
fn test_host_action_edits_token() {
    let spec = parse_specification("if /^[a-z]+$/ then [(upper)]").unwrap();
    let hosts = HostRegistry::new().with_action("upper", |context: &mut ScanContext| {
        let token = context.token_mut();
        token.text = token.text.to_uppercase();
        Ok(())
    });
    let tokenizer = build_tokenizer_with(&spec, &hosts).unwrap();

    assert_eq!(texts(&tokenizer.tokenize("ab cd").unwrap()), vec!["AB", " ", "cd"]);
}

#[test]
fn test_let_be_tags_tokens() {
    let tokenizer = tokenizer(r"let /^\d$/ be #digit");
    let tokens = tokenizer.tokenize("1 a").unwrap();

    assert_eq!(
        tokens,
        vec![
            Token::with_tags("1", ["digit"]),
            Token::new(" "),
            Token::new("a"),
        ]
    );
}

#[test]
fn test_let_be_group_joins_look_back() {
    let tokenizer = tokenizer(r"let '-' <- /^\d+$/ be group #negative");
    let tokens = tokenizer.tokenize("x -1").unwrap();

    assert_eq!(
        tokens,
        vec![
            Token::new("x"),
            Token::new(" "),
            Token::with_tags("-1", ["negative"]),
        ]
    );
}

#[test]
fn test_let_throw() {
    let tokenizer = tokenizer("let 'bad' throw 'no bad words'");
    let error = tokenizer.tokenize("a bad").unwrap_err();

    assert_eq!(error.get_category(), ErrorCategory::RuntimeThrow);
    assert_eq!(error.get_internal_error().to_string(), "no bad words");
}

#[test]
fn test_let_expand_group() {
    let source = "\
if '1' then continue
let /\\+/ expand group #sum
";
    let tokenizer = tokenizer(source);
    let tokens = tokenizer.tokenize("1+2").unwrap();

    assert_eq!(
        tokens,
        vec![
            Token::with_tags("1", ["sum"]),
            Token::with_tags("+", ["sum"]),
            Token::with_tags("2", ["sum"]),
        ]
    );
}

#[test]
fn test_let_rules_see_following_text() {
    let tokenizer = tokenizer(r"let /^\w+$/ -> '(' be #call");
    let tokens = tokenizer.tokenize("f(x)").unwrap();

    assert!(tokens[0].has_tag("call"));
    assert!(!tokens[2].has_tag("call"));
}

#[test]
fn test_build_fails_on_bad_rule() {
    let spec = parse_specification("if 'a' then [(missing)]").unwrap();
    let error = build_tokenizer(&spec).unwrap_err();

    assert_eq!(error.get_category(), ErrorCategory::Validation);
}

#[test]
fn test_empty_test_rule_is_dropped() {
    let tokenizer = tokenizer("if  then continue\nif ',' then skip token");

    assert_eq!(tokenizer.rules().if_rules.len(), 1);
    assert_eq!(texts(&tokenizer.tokenize("a,b").unwrap()), vec!["a", "b"]);
}

#[test]
fn test_tokenizer_across_threads() {
    let tokenizer = Arc::new(tokenizer("if 'test' then continue"));
    let inputs = ["test,x", "a,b", "test test", "x"];

    let results: HashMap<&str, Vec<String>> = thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| {
                let tokenizer = Arc::clone(&tokenizer);
                scope.spawn(move || {
                    let tokens = tokenizer.tokenize(input).unwrap();
                    (*input, tokens.into_iter().map(|token| token.text).collect())
                })
            })
            .collect();

        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    assert_eq!(results["test,x"], vec!["test,x"]);
    assert_eq!(results["a,b"], vec!["a", ",", "b"]);
    assert_eq!(results["test test"], vec!["test test"]);
    assert_eq!(results["x"], vec!["x"]);
}
