//! Clause lexer shared by the test and action compilers.
//!
//! This module splits the `<test>` and `<action>` clauses of a rule into a
//! stream of tokens. It handles:
//!
//! - Tokenization using an ordered table of anchored regex patterns
//! - Pattern, string, tag and host-expression literals (escape-aware)
//! - The `&&`, `||`, `->`, `<-` and `<->` operators
//! - Action keywords (`continue`, `skip`, `token`, `throw`, `join`)

pub mod lexer;
pub mod tokens;
