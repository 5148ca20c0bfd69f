use factsheet::sanitize::sanitize;

#[test]
fn assignment_tokens_become_plain_equality() {
    let block = "```mermaid\nstateDiagram-v2\n    counting: n := 0\n```";
    let out = sanitize(block);
    assert!(out.contains("n = 0"), "got: {out}");
    assert!(!out.contains(":="));
}

#[test]
fn labels_lose_grammar_breaking_characters() {
    let block = "```mermaid\nstateDiagram-v2\n    s1 --> s2: count := x; note \"q\" <internal>\n```";
    let out = sanitize(block);
    let line = out
        .lines()
        .find(|line| line.contains("-->"))
        .expect("transition kept");
    assert!(line.contains("s1 --> s2: count = x note q"), "got: {line}");
    assert!(!line.contains(';'));
    assert!(!line.contains('"'));
    assert!(!line.contains('<'));
}

#[test]
fn left_hand_side_stays_untouched() {
    let block = "```mermaid\nsequenceDiagram\n    alice->>bob: status: ready; <ok>\n```";
    let out = sanitize(block);
    assert!(out.contains("alice->>bob:"), "got: {out}");
    assert!(out.contains("status ready"));
}

#[test]
fn text_outside_fenced_blocks_is_left_alone() {
    let document = "prose with a := token and a --> arrow: label; <raw>\n```mermaid\na --> b: x;y\n```\ntrailing := text";
    let out = sanitize(document);
    assert!(out.starts_with("prose with a := token and a --> arrow: label; <raw>"));
    assert!(out.ends_with("trailing := text"));
    assert!(out.contains("a --> b: xy"));
}

#[test]
fn arrowless_lines_keep_their_colons() {
    let block = "```mermaid\nsequenceDiagram\n    Note over alice: no messages yet\n```";
    assert_eq!(sanitize(block), block);
}

#[test]
fn sanitizing_twice_equals_sanitizing_once() {
    let blocks = [
        "```mermaid\nstateDiagram-v2\n    s1 --> s2: a := b; \"c\" <d>\n```",
        "```mermaid\nsequenceDiagram\n    a->>b: x ::= y: z\n```",
        "```mermaid\nxychart-beta\n    y-axis \"count\" 0 --> 10\n```",
        "no diagram here at all",
    ];
    for block in blocks {
        let once = sanitize(block);
        let twice = sanitize(&once);
        assert_eq!(once, twice, "not idempotent for: {block}");
    }
}
