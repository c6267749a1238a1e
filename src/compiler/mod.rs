//! Rule compilation.
//!
//! This module turns the text clauses of a `RuleSpecification` into
//! executable rule chains. It handles:
//!
//! - Test clauses into predicate trees with look-ahead/look-behind targets
//! - Action clauses into ordered step lists, validated per rule kind
//! - Pairing both into first-match-wins rule chains
//! - Resolution of `[( ... )]` host expressions against a registry

pub mod action;
pub mod expr;
pub mod host;
pub mod rule;
