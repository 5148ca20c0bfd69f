//! Factsheet – renders report documents from inline directives resolved
//! against a time-stamped fact trace.
//!
//! A document may embed directives of the form `{{name key="value" ...}}`.
//! Rendering resolves each directive against a read-only trace of facts
//! produced by an external simulation runtime, substitutes the rendered
//! fragment in place, and sanitizes every generated diagram fragment so it
//! stays parseable in the constrained diagram dialect. The core pieces:
//! * A [`construct::Term`] is a tagged value (variable, atom, number,
//!   string, or list).
//! * A [`construct::Fact`] couples a predicate with its argument terms and
//!   an integer logical time (tick).
//! * A [`construct::Goal`] is a query pattern over facts, possibly holding
//!   variables; [`construct::unify`] matches it positionally against one
//!   fact, with repeated variables required to resolve consistently.
//! * The [`trace::FactStore`] trait is the contract every renderer queries:
//!   positional unification queries, full enumeration, and the four
//!   temporal predicates (always / eventually / never / possibly).
//!
//! ## Modules
//! * [`construct`] – Terms, facts, goals, bindings, and unification.
//! * [`trace`] – The fact-store and actor-registry contracts plus the
//!   in-memory [`trace::Snapshot`] render passes work against.
//! * [`directive`] – Scanner for `{{...}}` directive spans.
//! * [`formula`] – Temporal-formula surface syntax → quantifier + goal.
//! * [`render`] – One renderer per directive kind.
//! * [`sanitize`] – Label sanitization for generated diagram fragments.
//! * [`assemble`] – The document assembler orchestrating a render pass.
//! * [`error`] – Error taxonomy; every variant degrades to an inline
//!   diagnostic, nothing is fatal to the host.
//!
//! ## Directives
//! `state_diagram`, `sequence_diagram`, `property`, `properties`,
//! `facts_table`, `facts_list`, and `metrics_chart`. An unknown name or a
//! missing required argument renders as a localized diagnostic comment and
//! the rest of the document is unaffected.
//!
//! ## Quick Start
//! ```
//! use factsheet::assemble::Assembler;
//! use factsheet::construct::{Fact, Term};
//! use factsheet::trace::{InMemoryRegistry, Snapshot};
//!
//! let mut trace = Snapshot::new();
//! trace.record(Fact::at(
//!     "sale",
//!     vec![Term::Atom("widget".into()), Term::Number(5)],
//!     1,
//! ));
//! let registry = InMemoryRegistry::new();
//! let assembler = Assembler::new(&trace, &registry);
//! let report = assembler.render("# Report\n\n{{facts_table predicate=\"sale\"}}\n");
//! assert!(report.contains("sale(widget, 5)"));
//! ```
//!
//! ## Scope
//! The simulation itself, the rule-derivation engine producing derived
//! facts, and the persistence of the trace are external collaborators; this
//! crate only consumes their contracts.

pub mod assemble;
pub mod construct;
pub mod directive;
pub mod error;
pub mod formula;
pub mod render;
pub mod sanitize;
pub mod trace;
