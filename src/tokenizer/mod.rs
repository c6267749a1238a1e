//! Tokenizer assembly and scanning.
//!
//! This module turns a parsed `RuleSpecification` into a reusable
//! `Tokenizer`. It handles:
//!
//! - Compiling the specification's rules against a host registry
//! - Per-call scan state (`ScanContext`), exposed to host callbacks
//! - The boundary state machine driven by the break pattern
//! - The post-scan let-rule pass

pub mod context;
pub mod tokenizer;
pub mod types;

#[cfg(test)]
mod tests;
