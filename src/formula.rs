//! Translation of the restricted property-formula surface syntax into a
//! temporal quantifier and a [`Goal`].
//!
//! Both the word forms (`always?`, `never?`, ...) and the symbolic forms
//! (`AG`, `AF`, `EF`, `AG(not`, `AG(¬`) are recognized. A formula nobody
//! recognizes is simply unresolved; the property renderer shows `unknown`
//! instead of failing.

use crate::construct::{Goal, Term};

// ------------- Quantifier -------------
/// The four trace-level temporal quantifiers a formula can denote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    Always,
    Eventually,
    Never,
    Possibly,
}

// The negated-universal prefixes must come before the bare `AG` row, or
// `AG(not ...` would resolve to Always.
const PREFIXES: [(&str, Quantifier); 9] = [
    ("always?", Quantifier::Always),
    ("eventually?", Quantifier::Eventually),
    ("never?", Quantifier::Never),
    ("AG(not", Quantifier::Never),
    ("AG(¬", Quantifier::Never),
    ("possibly?", Quantifier::Possibly),
    ("AG", Quantifier::Always),
    ("AF", Quantifier::Eventually),
    ("EF", Quantifier::Possibly),
];

/// Resolves a formula to its quantifier and goal pattern.
///
/// Returns `None` when no recognized prefix matches or when the pattern
/// holds no tokens; the caller renders such formulas as `unknown`.
pub fn extract(formula: &str) -> Option<(Quantifier, Goal)> {
    let trimmed = formula.trim();
    let (prefix, quantifier) = PREFIXES
        .iter()
        .find(|(prefix, _)| trimmed.starts_with(prefix))?;
    let goal = extract_goal(&trimmed[prefix.len()..])?;
    Some((*quantifier, goal))
}

/// Pulls the parenthesized pattern out of the formula remainder and
/// tokenizes it into a goal.
fn extract_goal(rest: &str) -> Option<Goal> {
    let mut rest = rest.trim_start();
    // a quote marker may precede the pattern, as in never? '(deadlock ?a ?b)'
    if let Some(stripped) = rest.strip_prefix('\'').or_else(|| rest.strip_prefix('"')) {
        rest = stripped;
    }
    let pattern = balanced_parens(rest)?;
    let inner = &pattern[1..pattern.len() - 1];
    let mut tokens = inner.split_whitespace();
    let predicate = tokens.next()?;
    let args = tokens
        .map(|token| match token.strip_prefix('?') {
            Some(name) => Term::Variable(name.to_string()),
            None => Term::Atom(token.to_string()),
        })
        .collect();
    Some(Goal::new(predicate, args))
}

/// Balanced scan from the first `(` so that parentheses nested inside the
/// pattern are preserved intact. `None` when the parens never close.
fn balanced_parens(text: &str) -> Option<&str> {
    let open = text.find('(')?;
    let mut depth = 0usize;
    for (offset, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[open..open + offset + 1]);
                }
            }
            _ => (),
        }
    }
    None
}
