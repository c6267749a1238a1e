#![allow(clippy::module_inception)]

use std::{fmt::Write, sync::Arc};

use crate::errors::errors::{Error, ErrorTip};

pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod spec;
pub mod tokenizer;

extern crate regex;

pub use compiler::host::HostRegistry;
pub use spec::parser::{parse_specification, parse_specification_bytes, parse_specification_named};
pub use spec::types::RuleSpecification;
pub use tokenizer::tokenizer::{build_tokenizer, build_tokenizer_with, Tokenizer};
pub use tokenizer::types::{Token, Value};

/// A byte offset into a named source (a spec file or a tokenizer input).
#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Arc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Arc::new(String::from("<null>")))
    }
}

/// Finds the line containing `position`.
///
/// Returns the 1-based line number, the line text and the offset of
/// `position` inside that line, or `None` when `position` lies past the end.
pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > content.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let line_pos = pos - start;
            return Some((line_number, line.to_string(), line_pos));
        }

        start = end;
        line_number += 1;
    }

    // Position sits at the very end of the content
    Some((line_number, String::new(), 0))
}

/// Renders an error together with the offending source line.
///
/// ```text
/// Error: SyntaxError (Can't understand `foo bar`)
/// -> lang.prism
///   |
/// 3 | foo bar
///   | ^
/// ```
pub fn render_error(error: &Error, source: &str) -> String {
    let mut out = String::new();
    let position = error.get_position();

    if let ErrorTip::None = error.get_tip() {
        let _ = writeln!(out, "Error: {} ({})", error.get_category(), error);
    } else {
        let _ = writeln!(out, "Error: {} ({})", error.get_category(), error.get_tip());
    }
    let _ = writeln!(out, "-> {}", position.1);

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) else {
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let _ = writeln!(out, "{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    let _ = writeln!(out, "{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    let _ = writeln!(out, "{:>padding$} {:->arrows$}", "|", "^");

    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
