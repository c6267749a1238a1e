//! Specification parsing.
//!
//! This module reads the rule-description language into a
//! `RuleSpecification`:
//!
//! - `if <test> then <action>` rules
//! - `let <test> (be|be group|throw|expand group) <action>` rules
//! - `break on /pattern/` overrides of the boundary matcher
//! - `define <name> [= <value>]` scan-time variables
//!
//! Lines starting with `~` are comments. Rule clauses are kept as text here;
//! they are compiled by the `compiler` module.

pub mod parser;
pub mod pattern;
pub mod types;
