//! The contracts this core consumes: a read-only fact store with temporal
//! predicates, and an actor-definition registry, plus in-memory
//! implementations of both.
//!
//! The trace itself is produced and owned by an external runtime. The
//! [`Snapshot`] here is the scoped read-only view a render pass works
//! against: a host either hands one over directly or copies its live trace
//! into one before rendering, so no facts can be asserted mid-pass.

use std::collections::{BTreeSet, HashMap};
use std::hash::BuildHasherDefault;

use seahash::SeaHasher;
use tracing::debug;

use crate::construct::{unify, Binding, Fact, Goal, Tick};

/// Hasher for maps keyed by predicate or actor names.
pub type NameHasher = BuildHasherDefault<SeaHasher>;

// ------------- FactStore -------------
/// Positional query with unification, full enumeration, and the four
/// trace-level temporal predicates.
///
/// Implementations must return query bindings in trace (oldest first)
/// order and must honor the repeated-variable consistency rule of
/// [`unify`]; every renderer relies on both.
pub trait FactStore {
    /// One binding per fact matching the goal, in trace order.
    fn query(&self, goal: &Goal) -> Vec<Binding>;
    /// The full trace, in recording order.
    fn facts(&self) -> &[Fact];
    /// The goal holds universally along the trace.
    fn always(&self, goal: &Goal) -> bool;
    /// At least one matching fact exists anywhere in the trace.
    fn eventually(&self, goal: &Goal) -> bool;
    /// No matching fact exists anywhere in the trace.
    fn never(&self, goal: &Goal) -> bool;
    /// Treated as equivalent to `eventually` unless a store knows better.
    fn possibly(&self, goal: &Goal) -> bool;
}

// ------------- Snapshot -------------
/// An immutable, in-memory copy of a trace implementing [`FactStore`].
#[derive(Debug, Default)]
pub struct Snapshot {
    facts: Vec<Fact>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self { facts: Vec::new() }
    }
    pub fn from_facts(facts: Vec<Fact>) -> Self {
        Self { facts }
    }
    /// Appends a fact; the trace is append-only, facts are never revised.
    pub fn record(&mut self, fact: Fact) {
        self.facts.push(fact);
    }
    pub fn len(&self) -> usize {
        self.facts.len()
    }
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl FactStore for Snapshot {
    fn query(&self, goal: &Goal) -> Vec<Binding> {
        let bindings: Vec<Binding> = self
            .facts
            .iter()
            .filter_map(|fact| unify(goal, fact))
            .collect();
        debug!(goal = %goal, matches = bindings.len(), "query");
        bindings
    }
    fn facts(&self) -> &[Fact] {
        &self.facts
    }
    /// Universal semantics: the goal matches at least one fact recorded at
    /// every distinct tick present in the trace. Vacuously true when the
    /// trace records no ticks at all. This is a deliberate choice of
    /// state granularity (per tick), not the only defensible one.
    fn always(&self, goal: &Goal) -> bool {
        let ticks: BTreeSet<Tick> = self.facts.iter().filter_map(Fact::tick).collect();
        ticks.iter().all(|tick| {
            self.facts
                .iter()
                .filter(|fact| fact.tick() == Some(*tick))
                .any(|fact| unify(goal, fact).is_some())
        })
    }
    fn eventually(&self, goal: &Goal) -> bool {
        self.facts.iter().any(|fact| unify(goal, fact).is_some())
    }
    fn never(&self, goal: &Goal) -> bool {
        !self.eventually(goal)
    }
    fn possibly(&self, goal: &Goal) -> bool {
        self.eventually(goal)
    }
}

// ------------- ActorRegistry -------------
/// An actor definition as handed over by the external modeling layer.
/// Only existence is consumed here; the body stays opaque.
#[derive(Debug, Clone)]
pub struct ActorDefinition {
    name: String,
    body: String,
}

impl ActorDefinition {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Lookup of actor definitions by name.
pub trait ActorRegistry {
    fn lookup(&self, name: &str) -> Option<&ActorDefinition>;
}

#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    kept: HashMap<String, ActorDefinition, NameHasher>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self {
            kept: HashMap::default(),
        }
    }
    pub fn define(&mut self, definition: ActorDefinition) {
        self.kept.insert(definition.name().to_owned(), definition);
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

impl ActorRegistry for InMemoryRegistry {
    fn lookup(&self, name: &str) -> Option<&ActorDefinition> {
        self.kept.get(name)
    }
}
