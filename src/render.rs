//! One renderer per directive kind.
//!
//! Every renderer is a pure function of an explicit [`RenderContext`] and
//! the directive's arguments; none of them mutate the trace. Renderers
//! return `Err` only for the recoverable conditions of the error taxonomy
//! (missing argument, unknown actor); the assembler turns those into
//! inline diagnostics so a single bad directive never aborts the pass.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::construct::{Fact, Goal, Term, Tick};
use crate::directive::Directive;
use crate::error::{FactsheetError, Result};
use crate::formula::{self, Quantifier};
use crate::trace::{ActorRegistry, FactStore, NameHasher};

/// Everything a renderer may consult: the trace snapshot and the actor
/// registry. Passed explicitly so renderers can be tested against fakes.
pub struct RenderContext<'a> {
    pub store: &'a dyn FactStore,
    pub registry: &'a dyn ActorRegistry,
}

/// The bookkeeping predicate the producing runtime records when a process
/// spins up; excluded from the metrics fallback selection.
const PROCESS_START_MARKER: &str = "process_started";

/// Sanity checks used when a properties directive names none itself.
const DEFAULT_CHECKS: [(&str, &str); 2] = [
    ("deadlock freedom", "never? '(deadlock ?a ?b)'"),
    ("messages flow", "eventually? '(sent ?from ?to ?msg ?t)'"),
];

/// Dispatches one parsed directive to its renderer.
pub fn dispatch(context: &RenderContext, directive: &Directive) -> Result<String> {
    match directive.name() {
        "state_diagram" => state_diagram(context, directive),
        "sequence_diagram" => sequence_diagram(context, directive),
        "property" => property(context, directive),
        "properties" => properties(context, directive),
        "facts_table" => facts_table(context, directive),
        "facts_list" => facts_list(context, directive),
        "metrics_chart" => metrics_chart(context, directive),
        unknown => Err(FactsheetError::UnknownDirective(unknown.to_string())),
    }
}

// ------------- state_diagram -------------
/// Initial-state skeleton for a registered actor. Only existence is
/// checked here; deriving real states from the definition is the modeling
/// layer's job.
fn state_diagram(context: &RenderContext, directive: &Directive) -> Result<String> {
    let actor = directive.require("actor")?;
    let definition = context
        .registry
        .lookup(actor)
        .ok_or_else(|| FactsheetError::ActorNotFound(actor.to_string()))?;
    debug!(actor = definition.name(), "state diagram skeleton");
    Ok(format!(
        "```mermaid\nstateDiagram-v2\n    [*] --> initial\n    note right of initial: actor {}\n```",
        definition.name()
    ))
}

// ------------- sequence_diagram -------------
fn sequence_diagram(context: &RenderContext, directive: &Directive) -> Result<String> {
    let listed = directive.require("actors")?;
    let actors: Vec<&str> = listed
        .split(',')
        .map(str::trim)
        .filter(|actor| !actor.is_empty())
        .collect();
    if actors.is_empty() {
        return Err(FactsheetError::MissingArgument {
            directive: directive.name().to_string(),
            argument: "actors".to_string(),
        });
    }
    let goal = Goal::new(
        "sent",
        vec![
            Term::Variable("from".to_string()),
            Term::Variable("to".to_string()),
            Term::Variable("msg".to_string()),
            Term::Variable("time".to_string()),
        ],
    );
    let bindings = context.store.query(&goal);
    let mut lines = vec!["```mermaid".to_string(), "sequenceDiagram".to_string()];
    // duplicates are preserved on purpose: the list is the author's order
    for actor in &actors {
        lines.push(format!("    participant {}", actor));
    }
    if bindings.is_empty() {
        lines.push(format!("    Note over {}: no messages yet", actors[0]));
    }
    for binding in &bindings {
        let from = binding.get("from").map(term_text).unwrap_or_default();
        let to = binding.get("to").map(term_text).unwrap_or_default();
        let msg = binding.get("msg").map(term_text).unwrap_or_default();
        match binding.tick() {
            Some(tick) => lines.push(format!("    {}->>{}: {} (t={})", from, to, msg, tick)),
            None => lines.push(format!("    {}->>{}: {}", from, to, msg)),
        }
    }
    lines.push("```".to_string());
    Ok(lines.join("\n"))
}

// ------------- property / properties -------------
fn property(context: &RenderContext, directive: &Directive) -> Result<String> {
    let formula = directive.require("formula")?;
    let name = directive.arg("name").unwrap_or(formula);
    Ok(format!(
        "| check | formula | result |\n| --- | --- | --- |\n{}",
        property_row(context, name, formula)
    ))
}

fn properties(context: &RenderContext, directive: &Directive) -> Result<String> {
    let mut rows = String::new();
    match directive.arg("checks") {
        Some(checks) => {
            for entry in checks.split(';').map(str::trim).filter(|e| !e.is_empty()) {
                let (name, formula) = split_check(entry);
                rows += &property_row(context, name, formula);
            }
        }
        None => {
            for (name, formula) in DEFAULT_CHECKS {
                rows += &property_row(context, name, formula);
            }
        }
    }
    Ok(format!(
        "| check | formula | result |\n| --- | --- | --- |\n{}",
        rows
    ))
}

/// Splits a `name: formula` entry; an entry whose head contains a `(` is a
/// bare formula, since no quantifier form starts with a parenthesis.
fn split_check(entry: &str) -> (&str, &str) {
    match entry.split_once(':') {
        Some((name, formula)) if !name.contains('(') => (name.trim(), formula.trim()),
        _ => (entry, entry),
    }
}

fn property_row(context: &RenderContext, name: &str, formula: &str) -> String {
    let result = match formula::extract(formula) {
        Some((quantifier, goal)) => {
            let holds = match quantifier {
                Quantifier::Always => context.store.always(&goal),
                Quantifier::Eventually => context.store.eventually(&goal),
                Quantifier::Never => context.store.never(&goal),
                Quantifier::Possibly => context.store.possibly(&goal),
            };
            if holds {
                "true"
            } else {
                "false"
            }
        }
        None => {
            warn!(formula, "unresolved formula");
            "unknown"
        }
    };
    format!("| {} | `{}` | {} |\n", name, formula, result)
}

// ------------- facts_table / facts_list -------------
fn facts_table(context: &RenderContext, directive: &Directive) -> Result<String> {
    let limit = parse_limit(directive, 10);
    match directive.arg("predicate") {
        Some(predicate) => {
            let matching: Vec<&Fact> = context
                .store
                .facts()
                .iter()
                .filter(|fact| fact.predicate() == predicate)
                .collect();
            if matching.is_empty() {
                return Ok(format!("_No `{}` facts recorded._", predicate));
            }
            let mut out = String::from("| # | fact | tick |\n| --- | --- | --- |\n");
            for (row, fact) in matching.iter().take(limit).enumerate() {
                out += &format!("| {} | {} | {} |\n", row + 1, fact_text(fact), tick_text(fact));
            }
            if matching.len() > limit {
                out += &format!("| | ...and {} more | |\n", matching.len() - limit);
            }
            Ok(out)
        }
        None => Ok(predicate_summary(context.store.facts())),
    }
}

fn facts_list(context: &RenderContext, directive: &Directive) -> Result<String> {
    let limit = parse_limit(directive, 20);
    let facts = context.store.facts();
    match directive.arg("predicate") {
        Some(predicate) => {
            let matching: Vec<&Fact> = facts
                .iter()
                .filter(|fact| fact.predicate() == predicate)
                .collect();
            if matching.is_empty() {
                return Ok(format!("_No `{}` facts recorded._", predicate));
            }
            Ok(fact_bullets(&matching, limit, ""))
        }
        None => {
            if facts.is_empty() {
                return Ok("_No facts recorded yet._".to_string());
            }
            let mut groups: HashMap<&str, Vec<&Fact>, NameHasher> = HashMap::default();
            for fact in facts {
                groups.entry(fact.predicate()).or_default().push(fact);
            }
            // lexicographic group order keeps the report reproducible
            let mut predicates: Vec<&str> = groups.keys().copied().collect();
            predicates.sort_unstable();
            let mut out = String::new();
            for predicate in predicates {
                let group = &groups[predicate];
                out += &format!("- **{}** ({})\n", predicate, group.len());
                out += &fact_bullets(group, limit, "  ");
            }
            Ok(out)
        }
    }
}

fn fact_bullets(facts: &[&Fact], limit: usize, indent: &str) -> String {
    let mut out = String::new();
    for fact in facts.iter().take(limit) {
        match fact.tick() {
            Some(tick) => out += &format!("{}- {} @ {}\n", indent, fact_text(fact), tick),
            None => out += &format!("{}- {}\n", indent, fact_text(fact)),
        }
    }
    if facts.len() > limit {
        out += &format!("{}- ...and {} more\n", indent, facts.len() - limit);
    }
    out
}

/// Count-by-predicate summary, iterated over a sorted key list so the
/// rendered report is stable across runs.
fn predicate_summary(facts: &[Fact]) -> String {
    if facts.is_empty() {
        return "_No facts recorded yet._".to_string();
    }
    let mut counts: HashMap<&str, usize, NameHasher> = HashMap::default();
    for fact in facts {
        *counts.entry(fact.predicate()).or_insert(0) += 1;
    }
    let mut predicates: Vec<&str> = counts.keys().copied().collect();
    predicates.sort_unstable();
    let mut out = String::from("| predicate | count |\n| --- | --- |\n");
    for predicate in predicates {
        out += &format!("| {} | {} |\n", predicate, counts[predicate]);
    }
    out += &format!("| **total** | {} |\n", facts.len());
    out
}

// ------------- metrics_chart -------------
fn metrics_chart(context: &RenderContext, directive: &Directive) -> Result<String> {
    let title = directive.arg("title").unwrap_or("Simulation metrics");
    let facts = context.store.facts();
    if facts.is_empty() {
        return Ok(format!(
            "{}\n\n**Warning:** no simulation data recorded.",
            zero_chart(title)
        ));
    }
    let max_tick: Tick = facts
        .iter()
        .map(|fact| fact.tick().unwrap_or(0))
        .max()
        .unwrap_or(0);
    let step: Tick = std::cmp::max(1, max_tick / 10);
    let mut boundaries: Vec<Tick> = Vec::new();
    let mut boundary: Tick = 0;
    while boundary <= max_tick && boundaries.len() < 11 {
        boundaries.push(boundary);
        boundary += step;
    }
    // which predicates get a series
    let mut present: Vec<&str> = Vec::new();
    for fact in facts {
        if !present.contains(&fact.predicate()) {
            present.push(fact.predicate());
        }
    }
    let mut fallback_note = None;
    let selected: Vec<&str> = match directive.arg("predicates") {
        Some(requested) => {
            let kept: Vec<&str> = requested
                .split(',')
                .map(str::trim)
                .filter(|name| present.contains(name))
                .collect();
            if kept.is_empty() {
                warn!(requested, "requested predicates absent from trace");
                fallback_note =
                    Some("_Requested predicates not present; showing all recorded predicates._");
                all_but_marker(&present)
            } else {
                kept
            }
        }
        None => all_but_marker(&present),
    };
    if selected.is_empty() {
        return Ok(format!(
            "{}\n\n**Warning:** no simulation data recorded.",
            zero_chart(title)
        ));
    }
    // one cumulative series per selected predicate
    let mut series: Vec<(&str, Vec<usize>)> = Vec::new();
    let mut y_max = 0usize;
    for predicate in &selected {
        let mut running = 0usize;
        let mut points = Vec::with_capacity(boundaries.len());
        for boundary in &boundaries {
            running += facts
                .iter()
                .filter(|fact| fact.predicate() == *predicate)
                .filter(|fact| {
                    let tick = fact.tick().unwrap_or(0);
                    tick >= *boundary && tick < *boundary + step
                })
                .count();
            points.push(running);
        }
        y_max = std::cmp::max(y_max, running);
        series.push((predicate, points));
    }
    let mut lines = vec![
        "```mermaid".to_string(),
        "xychart-beta".to_string(),
        format!("    title \"{}\"", title),
        format!("    x-axis [{}]", joined(&boundaries)),
        format!("    y-axis \"cumulative facts\" 0 --> {}", y_max + 10),
    ];
    for (_, points) in &series {
        lines.push(format!("    line [{}]", joined(points)));
    }
    lines.push("```".to_string());
    let names: Vec<&str> = series.iter().map(|(name, _)| *name).collect();
    lines.push(String::new());
    lines.push(format!("_Series: {}_", names.join(", ")));
    if let Some(note) = fallback_note {
        lines.push(note.to_string());
    }
    Ok(lines.join("\n"))
}

fn all_but_marker<'a>(present: &[&'a str]) -> Vec<&'a str> {
    let mut kept: Vec<&str> = present
        .iter()
        .copied()
        .filter(|name| *name != PROCESS_START_MARKER)
        .collect();
    kept.sort_unstable();
    kept
}

fn zero_chart(title: &str) -> String {
    format!(
        "```mermaid\nxychart-beta\n    title \"{}\"\n    x-axis [0]\n    y-axis \"cumulative facts\" 0 --> 10\n    line [0]\n```",
        title
    )
}

// ------------- shared helpers -------------
/// Term text for diagram labels: strings lose their quotes since the
/// diagram dialect treats quotes as structure, everything else renders as
/// it displays.
fn term_text(term: &Term) -> String {
    match term {
        Term::Str(value) => value.clone(),
        other => other.to_string(),
    }
}

/// A fact without its tick suffix, for tables that show the tick in its
/// own column.
fn fact_text(fact: &Fact) -> String {
    let args: Vec<String> = fact.args().iter().map(Term::to_string).collect();
    format!("{}({})", fact.predicate(), args.join(", "))
}

fn tick_text(fact: &Fact) -> String {
    match fact.tick() {
        Some(tick) => tick.to_string(),
        None => "-".to_string(),
    }
}

fn parse_limit(directive: &Directive, default: usize) -> usize {
    match directive.arg("limit") {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(limit = raw, "limit is not a number, using default");
            default
        }),
        None => default,
    }
}

fn joined<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
