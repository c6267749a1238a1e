//! Parser for the rule-description language.
//!
//! A specification is read line by line. Every line is either skipped
//! (comment or blank) or matched against the line lookup table, whose
//! handlers append to the `RuleSpecification` being built. The first line
//! that matches nothing aborts the parse.

use std::sync::Arc;

use lazy_static::lazy_static;
use log::debug;
use regex::{Captures, Regex};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{
    pattern::Pattern,
    types::{Definition, IfRule, LetKind, LetRule, RuleSpecification},
};

pub type LineHandler = fn(&mut RuleSpecification, &Captures, &Position) -> Result<(), Error>;

pub struct LinePattern {
    regex: Regex,
    handler: LineHandler,
}

lazy_static! {
    static ref COMMENT_LINE: Regex = Regex::new(r"^~").unwrap();
    static ref BLANK_LINE: Regex = Regex::new(r"^\s*$").unwrap();
    static ref LINE_LOOKUP: Vec<LinePattern> = vec![
        LinePattern {
            regex: Regex::new(r"(?i)^\s*if\s+(.*?)\s+then\s+(.*?)\s*$").unwrap(),
            handler: parse_if_line,
        },
        LinePattern {
            regex: Regex::new(r"(?i)^\s*let\s+(.*?)\s+(?:(be\s+group)|(be)|(throw)|(expand\s+group))\s+(.*?)\s*$").unwrap(),
            handler: parse_let_line,
        },
        LinePattern {
            regex: Regex::new(r"(?i)^\s*break\s+on\s+(.*?)\s*$").unwrap(),
            handler: parse_break_line,
        },
        LinePattern {
            regex: Regex::new(r"(?i)^\s*define\s+([A-Za-z_]\w*)(?:\s*=\s*(.*?))?\s*$").unwrap(),
            handler: parse_define_line,
        },
    ];
}

fn capture(captures: &Captures, index: usize) -> String {
    captures
        .get(index)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn parse_if_line(
    spec: &mut RuleSpecification,
    captures: &Captures,
    position: &Position,
) -> Result<(), Error> {
    spec.if_rules.push(IfRule {
        test: capture(captures, 1),
        action: capture(captures, 2),
        position: position.clone(),
    });
    Ok(())
}

fn parse_let_line(
    spec: &mut RuleSpecification,
    captures: &Captures,
    position: &Position,
) -> Result<(), Error> {
    let kind = if captures.get(2).is_some() {
        LetKind::BeGroup
    } else if captures.get(3).is_some() {
        LetKind::Be
    } else if captures.get(4).is_some() {
        LetKind::Throw
    } else {
        LetKind::ExpandGroup
    };

    spec.let_rules.push(LetRule {
        test: capture(captures, 1),
        kind,
        action: capture(captures, 6),
        position: position.clone(),
    });
    Ok(())
}

fn parse_break_line(
    spec: &mut RuleSpecification,
    captures: &Captures,
    position: &Position,
) -> Result<(), Error> {
    let literal = capture(captures, 1);
    spec.break_pattern =
        Pattern::from_literal(&literal).map_err(|error| Error::new(error, position.clone()))?;
    Ok(())
}

fn parse_define_line(
    spec: &mut RuleSpecification,
    captures: &Captures,
    _position: &Position,
) -> Result<(), Error> {
    let value = capture(captures, 2);
    spec.definitions.push(Definition {
        name: capture(captures, 1),
        value: if value.is_empty() { None } else { Some(value) },
    });
    Ok(())
}

fn parse_line(spec: &mut RuleSpecification, line: &str, position: &Position) -> Result<(), Error> {
    if COMMENT_LINE.is_match(line) || BLANK_LINE.is_match(line) {
        return Ok(());
    }

    for pattern in LINE_LOOKUP.iter() {
        if let Some(captures) = pattern.regex.captures(line) {
            return (pattern.handler)(spec, &captures, position);
        }
    }

    Err(Error::new(
        ErrorImpl::UnrecognisedLine {
            line: line.to_string(),
        },
        position.clone(),
    ))
}

/// Parses a specification text into a `RuleSpecification`.
///
/// # Arguments
///
/// * `source` - The rule-description text
/// * `file` - Name of the source, carried into error positions
///
/// # Returns
///
/// The complete specification, or the error of the first line that could
/// not be understood. No partial specification is ever returned.
pub fn parse_specification_named(source: &str, file: &str) -> Result<RuleSpecification, Error> {
    let file = Arc::new(file.to_string());
    let mut spec = RuleSpecification::default();
    let mut offset = 0;

    for raw_line in source.split_inclusive('\n') {
        let position = Position(offset as u32, Arc::clone(&file));
        offset += raw_line.len();

        let line = raw_line.trim_end_matches(['\n', '\r']);
        parse_line(&mut spec, line, &position)?;
    }

    debug!(
        "parsed {}: {} if rules, {} let rules, {} definitions, break on {}",
        file,
        spec.if_rules.len(),
        spec.let_rules.len(),
        spec.definitions.len(),
        spec.break_pattern
    );

    Ok(spec)
}

pub fn parse_specification(source: &str) -> Result<RuleSpecification, Error> {
    parse_specification_named(source, "<spec>")
}

/// Parses raw specification data as handed over by a storage layer.
///
/// Absent data is an argument error and data that is not UTF-8 text is a
/// type error; everything else is parsed as by `parse_specification_named`.
pub fn parse_specification_bytes(
    data: Option<&[u8]>,
    file: &str,
) -> Result<RuleSpecification, Error> {
    let position = Position(0, Arc::new(file.to_string()));
    let data = data.ok_or_else(|| Error::new(ErrorImpl::MissingInput, position.clone()))?;

    let source = std::str::from_utf8(data).map_err(|error| {
        Error::new(
            ErrorImpl::InvalidInputType {
                reason: error.to_string(),
            },
            position.clone(),
        )
    })?;

    parse_specification_named(source, file)
}
