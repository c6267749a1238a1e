//! Unit tests for error handling.
//!
//! This module contains tests for error types, categories and tips.

use crate::errors::errors::{Error, ErrorCategory, ErrorImpl, ErrorTip};
use crate::Position;
use std::sync::Arc;

fn at(offset: u32) -> Position {
    Position(offset, Arc::new("test.prism".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_category(), ErrorCategory::Syntax);
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnrecognisedLine {
            line: "nonsense".to_string(),
        },
        at(42),
    );

    assert_eq!(error.get_position().0, 42);
    assert_eq!(error.get_position().1.as_str(), "test.prism");
}

#[test]
fn test_missing_input_error() {
    let error = Error::new(ErrorImpl::MissingInput, Position::null());

    assert_eq!(error.get_error_name(), "MissingInput");
    assert_eq!(error.get_category(), ErrorCategory::Argument);
    assert_eq!(error.get_category().to_string(), "ArgumentError");
}

#[test]
fn test_invalid_input_type_error() {
    let error = Error::new(
        ErrorImpl::InvalidInputType {
            reason: "invalid utf-8 sequence".to_string(),
        },
        at(0),
    );

    assert_eq!(error.get_error_name(), "InvalidInputType");
    assert_eq!(error.get_category().to_string(), "TypeError");
}

#[test]
fn test_syntax_errors() {
    let errors = [
        ErrorImpl::UnrecognisedLine {
            line: "x".to_string(),
        },
        ErrorImpl::UnterminatedLiteral {
            literal: "'abc".to_string(),
        },
        ErrorImpl::UnexpectedToken {
            token: "&&".to_string(),
            message: "expected an operand".to_string(),
        },
        ErrorImpl::InvalidPattern {
            pattern: "/(/".to_string(),
            message: "unclosed group".to_string(),
        },
        ErrorImpl::InvalidSkipCount {
            count: "0".to_string(),
        },
    ];

    for error in errors {
        let error = Error::new(error, at(0));
        assert_eq!(error.get_category(), ErrorCategory::Syntax, "{}", error.get_error_name());
    }
}

#[test]
fn test_validation_errors() {
    let error = Error::new(
        ErrorImpl::ActionNotAllowed {
            keyword: "continue".to_string(),
            kind: "be".to_string(),
        },
        at(0),
    );
    assert_eq!(error.get_error_name(), "ActionNotAllowed");
    assert_eq!(error.get_category().to_string(), "ValidationError");

    let error = Error::new(
        ErrorImpl::UnknownHostExpression {
            expression: "isStart".to_string(),
        },
        at(0),
    );
    assert_eq!(error.get_error_name(), "UnknownHostExpression");
    assert_eq!(error.get_category(), ErrorCategory::Validation);
}

#[test]
fn test_thrown_error_carries_message() {
    let error = Error::new(
        ErrorImpl::Thrown {
            message: "bad input".to_string(),
        },
        at(3),
    );

    assert_eq!(error.get_error_name(), "Thrown");
    assert_eq!(error.get_category(), ErrorCategory::RuntimeThrow);
    assert_eq!(error.get_internal_error().to_string(), "bad input");
    assert_eq!(error.to_string(), "RuntimeThrow: bad input");
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(0),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
            message: "not allowed in a test".to_string(),
        },
        at(0),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("`}`")),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_error_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync + std::error::Error>() {}
    assert_send_sync::<Error>();
}
