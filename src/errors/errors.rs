use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::MissingInput => "MissingInput",
            ErrorImpl::InvalidInputType { .. } => "InvalidInputType",
            ErrorImpl::UnrecognisedLine { .. } => "UnrecognisedLine",
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnterminatedLiteral { .. } => "UnterminatedLiteral",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::InvalidPattern { .. } => "InvalidPattern",
            ErrorImpl::InvalidSkipCount { .. } => "InvalidSkipCount",
            ErrorImpl::ActionNotAllowed { .. } => "ActionNotAllowed",
            ErrorImpl::UnknownHostExpression { .. } => "UnknownHostExpression",
            ErrorImpl::Thrown { .. } => "Thrown",
        }
    }

    pub fn get_category(&self) -> ErrorCategory {
        match &self.internal_error {
            ErrorImpl::MissingInput => ErrorCategory::Argument,
            ErrorImpl::InvalidInputType { .. } => ErrorCategory::Type,
            ErrorImpl::UnrecognisedLine { .. }
            | ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnterminatedLiteral { .. }
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::InvalidPattern { .. }
            | ErrorImpl::InvalidSkipCount { .. } => ErrorCategory::Syntax,
            ErrorImpl::ActionNotAllowed { .. } | ErrorImpl::UnknownHostExpression { .. } => {
                ErrorCategory::Validation
            }
            ErrorImpl::Thrown { .. } => ErrorCategory::RuntimeThrow,
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::MissingInput => ErrorTip::Suggestion(String::from(
                "A specification has to be passed in before it can be parsed",
            )),
            ErrorImpl::InvalidInputType { reason } => {
                ErrorTip::Suggestion(format!("Specification must be text: {}", reason))
            }
            ErrorImpl::UnrecognisedLine { line } => {
                ErrorTip::Suggestion(format!("Can't understand `{}`", line))
            }
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedLiteral { literal } => ErrorTip::Suggestion(format!(
                "Literal `{}` is missing its closing delimiter",
                literal
            )),
            ErrorImpl::UnexpectedToken { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::InvalidPattern { pattern, message } => {
                ErrorTip::Suggestion(format!("Invalid pattern `{}`: {}", pattern, message))
            }
            ErrorImpl::InvalidSkipCount { count } => ErrorTip::Suggestion(format!(
                "`skip` expects a positive count or `token`, found `{}`",
                count
            )),
            ErrorImpl::ActionNotAllowed { keyword, kind } => ErrorTip::Suggestion(format!(
                "`{}` can only be used in `then` actions, not in `{}`",
                keyword, kind
            )),
            ErrorImpl::UnknownHostExpression { expression } => ErrorTip::Suggestion(format!(
                "No host callback or definition registered for `[({})]`",
                expression
            )),
            ErrorImpl::Thrown { .. } => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.get_category(), self.internal_error)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Argument,
    Type,
    Syntax,
    Validation,
    RuntimeThrow,
}

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Argument => write!(f, "ArgumentError"),
            ErrorCategory::Type => write!(f, "TypeError"),
            ErrorCategory::Syntax => write!(f, "SyntaxError"),
            ErrorCategory::Validation => write!(f, "ValidationError"),
            ErrorCategory::RuntimeThrow => write!(f, "RuntimeThrow"),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("no specification was passed in")]
    MissingInput,
    #[error("specification is not text: {reason}")]
    InvalidInputType { reason: String },
    #[error("can't understand {line:?}")]
    UnrecognisedLine { line: String },
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unterminated literal: {literal:?}")]
    UnterminatedLiteral { literal: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedToken { token: String, message: String },
    #[error("invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
    #[error("invalid skip count {count:?}")]
    InvalidSkipCount { count: String },
    #[error("{keyword:?} is not allowed in a {kind:?} action")]
    ActionNotAllowed { keyword: String, kind: String },
    #[error("unknown host expression {expression:?}")]
    UnknownHostExpression { expression: String },
    #[error("{message}")]
    Thrown { message: String },
}
