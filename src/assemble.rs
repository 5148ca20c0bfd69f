//! The document assembler: scan, dispatch, substitute, sanitize.
//!
//! A render pass is read-only against the trace. Hosts whose runtime keeps
//! asserting facts while a report is rendered should copy the live trace
//! into a [`Snapshot`](crate::trace::Snapshot) and hand that over, so every
//! renderer in the pass observes the same facts.

use tracing::{debug, warn};

use crate::directive::{self, ParsedSpan};
use crate::error::FactsheetError;
use crate::render::{dispatch, RenderContext};
use crate::sanitize;
use crate::trace::{ActorRegistry, FactStore};

/// Renders an inline diagnostic comment. Diagnostics are invisible in
/// rendered Markdown but carry a stable prefix so hosts can grep a report
/// for degradations.
pub fn diagnostic(message: &str) -> String {
    format!("<!-- factsheet: {} -->", message)
}

/// Turns a document with inline directives into a finished report.
pub struct Assembler<'a> {
    context: RenderContext<'a>,
}

impl<'a> Assembler<'a> {
    pub fn new(store: &'a dyn FactStore, registry: &'a dyn ActorRegistry) -> Self {
        Self {
            context: RenderContext { store, registry },
        }
    }

    /// Replaces every directive span with its rendered fragment. No single
    /// directive failure aborts the pass: unknown names, missing arguments,
    /// and malformed spans each degrade to a localized diagnostic comment.
    /// A document without directives renders to itself.
    pub fn render(&self, document: &str) -> String {
        let spans = directive::scan(document);
        debug!(spans = spans.len(), "render pass");
        let mut out = String::with_capacity(document.len());
        let mut cursor = 0;
        for (span, parsed) in spans {
            out.push_str(&document[cursor..span.start]);
            let fragment = match parsed {
                ParsedSpan::Directive(directive) => {
                    match dispatch(&self.context, &directive) {
                        // generated diagram fragments get their labels
                        // sanitized before substitution
                        Ok(fragment) => sanitize::sanitize(&fragment),
                        Err(error) => {
                            warn!(%error, "directive degraded to diagnostic");
                            diagnostic(&error.to_string())
                        }
                    }
                }
                ParsedSpan::Malformed { message } => {
                    let error = FactsheetError::MalformedSpan {
                        message,
                        offset: span.start,
                    };
                    warn!(%error, "malformed directive span");
                    diagnostic(&error.to_string())
                }
            };
            out.push_str(&fragment);
            cursor = span.end;
        }
        out.push_str(&document[cursor..]);
        out
    }
}
