//! Second pass over generated diagram fragments.
//!
//! The diagram dialect has a constrained label grammar: colons, semicolons,
//! double quotes, and angle-bracket segments inside an edge label all break
//! rendering, and assignment-style `:=` tokens are misread as label
//! separators anywhere in a block. This pass rewrites just enough to keep
//! fragments parseable; it does not validate the full grammar. Running it
//! twice yields the same text as running it once.

const FENCE_OPEN: &str = "```mermaid";
const FENCE_CLOSE: &str = "```";

const ARROWS: [&str; 3] = ["-->", "->>", "->"];

/// Sanitizes every fenced diagram block in the given text, leaving
/// everything outside the fences untouched.
pub fn sanitize(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut in_block = false;
    for line in text.split('\n') {
        let trimmed = line.trim();
        if !in_block && trimmed == FENCE_OPEN {
            in_block = true;
            out.push(line.to_string());
        } else if in_block && trimmed == FENCE_CLOSE {
            in_block = false;
            out.push(line.to_string());
        } else if in_block {
            out.push(sanitize_line(line));
        } else {
            out.push(line.to_string());
        }
    }
    out.join("\n")
}

fn sanitize_line(line: &str) -> String {
    let mut line = line.to_string();
    // assignment-style tokens read as stray label separators
    while line.contains(":=") {
        line = line.replace(":=", "=");
    }
    // only edge/transition lines carry a label after a colon
    let arrow_end = match ARROWS
        .iter()
        .filter_map(|arrow| line.find(arrow).map(|at| at + arrow.len()))
        .min()
    {
        Some(at) => at,
        None => return line,
    };
    let label_at = match line[arrow_end..].find(':') {
        Some(colon) => arrow_end + colon + 1,
        None => return line,
    };
    let (head, label) = line.split_at(label_at);
    format!("{}{}", head, clean_label(label))
}

/// Strips the characters that break the label grammar: colons beyond the
/// separating one, semicolons, double quotes, and angle-bracket segments
/// (stray brackets included).
fn clean_label(label: &str) -> String {
    let mut cleaned = String::with_capacity(label.len());
    let mut angle_depth = 0usize;
    for c in label.chars() {
        match c {
            '<' => angle_depth += 1,
            '>' => angle_depth = angle_depth.saturating_sub(1),
            ':' | ';' | '"' => (),
            _ if angle_depth == 0 => cleaned.push(c),
            _ => (),
        }
    }
    cleaned
}
