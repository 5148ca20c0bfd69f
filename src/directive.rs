//! Scanning of `{{name key="value" ...}}` directive spans embedded in
//! free document text.
//!
//! The scanner is a small hand-written state machine rather than a set of
//! patterns, so unbalanced braces and unterminated quotes surface as
//! explicit malformed spans instead of silently mis-splitting. Directives
//! do not nest: a `}}` always closes the nearest preceding `{{`, which
//! means argument values must not themselves contain `}}`. Values are
//! double-quoted only and embedded quotes cannot be escaped; both are
//! documented limitations of the micro-syntax.

use std::fmt;

use tracing::debug;

use crate::error::{FactsheetError, Result};

// ------------- Directive -------------
/// One parsed directive: a name plus its key/value arguments in the order
/// they were written. Consumed immediately by the dispatching renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    name: String,
    args: Vec<(String, String)>,
}

impl Directive {
    pub fn new(name: impl Into<String>, args: Vec<(String, String)>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn arg(&self, key: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
    /// Looks up an argument the directive cannot do without.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.arg(key).ok_or_else(|| FactsheetError::MissingArgument {
            directive: self.name.clone(),
            argument: key.to_string(),
        })
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (key, value) in &self.args {
            write!(f, " {}=\"{}\"", key, value)?;
        }
        Ok(())
    }
}

// ------------- Span -------------
/// Byte offsets of one `{{...}}` occurrence, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Outcome of parsing one span's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedSpan {
    Directive(Directive),
    Malformed { message: String },
}

// ------------- Scanner -------------
#[derive(Debug, PartialEq, Eq)]
enum ArgState {
    Name,
    BetweenArgs,
    Key,
    AwaitingQuote,
    QuotedValue,
}

/// Finds every directive span in the document, in order of appearance.
pub fn scan(document: &str) -> Vec<(Span, ParsedSpan)> {
    let mut spans = Vec::new();
    let mut search_from = 0;
    while let Some(relative) = document[search_from..].find("{{") {
        let start = search_from + relative;
        match document[start + 2..].find("}}") {
            Some(inner_len) => {
                let end = start + 2 + inner_len + 2;
                let inner = &document[start + 2..end - 2];
                let parsed = match parse_inner(inner) {
                    Ok(directive) => {
                        debug!(directive = %directive, start, "directive span");
                        ParsedSpan::Directive(directive)
                    }
                    Err(message) => ParsedSpan::Malformed { message },
                };
                spans.push((Span { start, end }, parsed));
                search_from = end;
            }
            None => {
                // an opening brace pair with no closing pair runs to the
                // end of the document
                spans.push((
                    Span {
                        start,
                        end: document.len(),
                    },
                    ParsedSpan::Malformed {
                        message: "unbalanced braces: '{{' without a closing '}}'".to_string(),
                    },
                ));
                break;
            }
        }
    }
    spans
}

/// Parses the text between `{{` and `}}` into a name and key/value pairs.
fn parse_inner(inner: &str) -> std::result::Result<Directive, String> {
    let mut state = ArgState::Name;
    let mut name = String::new();
    let mut key = String::new();
    let mut value = String::new();
    let mut args: Vec<(String, String)> = Vec::new();
    for c in inner.chars() {
        match state {
            ArgState::Name => {
                if c.is_whitespace() {
                    if name.is_empty() {
                        continue;
                    }
                    state = ArgState::BetweenArgs;
                } else {
                    name.push(c);
                }
            }
            ArgState::BetweenArgs => {
                if !c.is_whitespace() {
                    key.clear();
                    key.push(c);
                    state = ArgState::Key;
                }
            }
            ArgState::Key => {
                if c == '=' {
                    state = ArgState::AwaitingQuote;
                } else if c.is_whitespace() {
                    return Err(format!("argument '{}' is missing '=\"...\"'", key));
                } else {
                    key.push(c);
                }
            }
            ArgState::AwaitingQuote => {
                if c == '"' {
                    value.clear();
                    state = ArgState::QuotedValue;
                } else {
                    return Err(format!(
                        "argument '{}' must use a double-quoted value",
                        key
                    ));
                }
            }
            ArgState::QuotedValue => {
                if c == '"' {
                    args.push((key.clone(), value.clone()));
                    state = ArgState::BetweenArgs;
                } else {
                    value.push(c);
                }
            }
        }
    }
    match state {
        ArgState::Name | ArgState::BetweenArgs => {
            if name.is_empty() {
                Err("empty directive name".to_string())
            } else {
                Ok(Directive::new(name, args))
            }
        }
        ArgState::Key | ArgState::AwaitingQuote => {
            Err(format!("argument '{}' is missing '=\"...\"'", key))
        }
        ArgState::QuotedValue => Err(format!("unterminated quote in argument '{}'", key)),
    }
}
