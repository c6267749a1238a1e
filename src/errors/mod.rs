//! Error types and error handling for the lexer generator.
//!
//! This module defines the error types used throughout the pipeline. It
//! includes:
//!
//! - Error structures with source position information
//! - Specific error variants for parsing, compiling and scanning
//! - The category taxonomy (argument, type, syntax, validation, throw)
//! - Helpful error messages and suggestions

pub mod errors;

#[cfg(test)]
mod tests;
