// the fundamental constructs: terms, facts, goals, and bindings

// used to print out readable forms of a construct
use std::fmt;

// ------------- Tick -------------
/// Logical time attached to a fact by the producing runtime.
pub type Tick = i64;

// ------------- Term -------------
/// A tagged value appearing as an argument of a fact or a goal.
///
/// Two terms of different tags are never equal, which the derived
/// `PartialEq` already guarantees. Variables carry no value until they
/// are bound during unification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Variable(String),
    Atom(String),
    Number(i64),
    Str(String),
    List(Vec<Term>),
}

impl Term {
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }
    /// The variable name, without the `?` sigil, when this term is one.
    pub fn variable_name(&self) -> Option<&str> {
        match self {
            Term::Variable(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Variable(name) => write!(f, "?{}", name),
            Term::Atom(name) => write!(f, "{}", name),
            Term::Number(value) => write!(f, "{}", value),
            Term::Str(value) => write!(f, "\"{}\"", value),
            Term::List(items) => {
                let mut s = String::new();
                for item in items {
                    s += &(item.to_string() + ", ");
                }
                s.pop();
                s.pop();
                write!(f, "[{}]", s)
            }
        }
    }
}

// ------------- Fact -------------
/// An immutable, time-stamped record of a predicate and its arguments.
///
/// Facts are recorded by an external runtime; once constructed they are
/// never mutated, so getters are the only access. A fact recorded outside
/// of simulated time carries no tick.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fact {
    predicate: String,
    args: Vec<Term>,
    tick: Option<Tick>,
}

impl Fact {
    pub fn new(predicate: impl Into<String>, args: Vec<Term>) -> Self {
        Self {
            predicate: predicate.into(),
            args,
            tick: None,
        }
    }
    pub fn at(predicate: impl Into<String>, args: Vec<Term>, tick: Tick) -> Self {
        Self {
            predicate: predicate.into(),
            args,
            tick: Some(tick),
        }
    }
    pub fn predicate(&self) -> &str {
        &self.predicate
    }
    pub fn args(&self) -> &[Term] {
        &self.args
    }
    pub fn tick(&self) -> Option<Tick> {
        self.tick
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = String::new();
        for arg in &self.args {
            s += &(arg.to_string() + ", ");
        }
        s.pop();
        s.pop();
        match self.tick {
            Some(tick) => write!(f, "{}({}) @ {}", self.predicate, s, tick),
            None => write!(f, "{}({})", self.predicate, s),
        }
    }
}

// ------------- Goal -------------
/// A query pattern over facts, possibly containing variables.
///
/// Goals are built fresh per evaluation and owned by the caller; they are
/// never persisted anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    predicate: String,
    args: Vec<Term>,
}

impl Goal {
    pub fn new(predicate: impl Into<String>, args: Vec<Term>) -> Self {
        Self {
            predicate: predicate.into(),
            args,
        }
    }
    pub fn predicate(&self) -> &str {
        &self.predicate
    }
    pub fn args(&self) -> &[Term] {
        &self.args
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.args.is_empty() {
            return write!(f, "({})", self.predicate);
        }
        let args: Vec<String> = self.args.iter().map(Term::to_string).collect();
        write!(f, "({} {})", self.predicate, args.join(" "))
    }
}

// ------------- Binding -------------
/// The variable assignments produced by one successful match of a goal
/// against a fact, valid for the duration of a single query call.
///
/// Entries keep the goal's argument order so that rendered output is
/// deterministic without sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    entries: Vec<(String, Term)>,
    tick: Option<Tick>,
}

impl Binding {
    fn new(tick: Option<Tick>) -> Self {
        Self {
            entries: Vec::new(),
            tick,
        }
    }
    pub fn get(&self, name: &str) -> Option<&Term> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, term)| term)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.entries.iter().map(|(name, term)| (name.as_str(), term))
    }
    /// Tick of the fact this binding came from, when it was recorded.
    pub fn tick(&self) -> Option<Tick> {
        self.tick
    }
    fn bind(&mut self, name: &str, term: &Term) -> bool {
        match self.get(name) {
            // a repeated variable only matches structurally equal terms
            Some(bound) => bound == term,
            None => {
                self.entries.push((name.to_string(), term.clone()));
                true
            }
        }
    }
}

/// Unifies a goal positionally against a single fact.
///
/// Returns one binding when the predicates agree, the arities agree, every
/// constant argument of the goal is structurally equal to the fact's term
/// at the same position, and every repeated variable resolves to the same
/// term across all of its positions.
pub fn unify(goal: &Goal, fact: &Fact) -> Option<Binding> {
    if goal.predicate() != fact.predicate() || goal.args().len() != fact.args().len() {
        return None;
    }
    let mut binding = Binding::new(fact.tick());
    for (pattern, term) in goal.args().iter().zip(fact.args()) {
        match pattern {
            Term::Variable(name) => {
                if !binding.bind(name, term) {
                    return None;
                }
            }
            constant => {
                if constant != term {
                    return None;
                }
            }
        }
    }
    Some(binding)
}
