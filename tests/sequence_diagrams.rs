use factsheet::assemble::Assembler;
use factsheet::construct::{Fact, Term};
use factsheet::trace::{InMemoryRegistry, Snapshot};

fn sent(from: &str, to: &str, msg: &str, tick: i64) -> Fact {
    Fact::at(
        "sent",
        vec![
            Term::Atom(from.into()),
            Term::Atom(to.into()),
            Term::Str(msg.into()),
            Term::Number(tick),
        ],
        tick,
    )
}

/// The producer/consumer exchange: three items, each acknowledged.
fn exchange_trace() -> Snapshot {
    Snapshot::from_facts(vec![
        sent("producer", "consumer", "item 1", 1),
        sent("consumer", "producer", "ack", 2),
        sent("producer", "consumer", "item 2", 3),
        sent("consumer", "producer", "ack", 4),
        sent("producer", "consumer", "item 3", 5),
        sent("consumer", "producer", "ack", 6),
    ])
}

fn render(trace: &Snapshot, document: &str) -> String {
    let registry = InMemoryRegistry::new();
    Assembler::new(trace, &registry).render(document)
}

#[test]
fn one_participant_per_listed_actor_and_one_arrow_per_message() {
    let trace = exchange_trace();
    let out = render(&trace, "{{sequence_diagram actors=\"producer,consumer\"}}");
    let participants = out
        .lines()
        .filter(|line| line.trim_start().starts_with("participant "))
        .count();
    assert_eq!(participants, 2, "got: {out}");
    let arrows: Vec<&str> = out.lines().filter(|line| line.contains("->>")).collect();
    assert_eq!(arrows.len(), 6, "got: {out}");
    // trace order, oldest first
    assert!(arrows[0].contains("producer->>consumer: item 1 (t=1)"));
    assert!(arrows[1].contains("consumer->>producer: ack (t=2)"));
    assert!(arrows[5].contains("consumer->>producer: ack (t=6)"));
}

#[test]
fn listed_duplicates_are_preserved() {
    let trace = exchange_trace();
    let out = render(
        &trace,
        "{{sequence_diagram actors=\"producer,consumer,producer\"}}",
    );
    let producers = out
        .lines()
        .filter(|line| line.trim() == "participant producer")
        .count();
    assert_eq!(producers, 2, "got: {out}");
}

#[test]
fn empty_trace_renders_a_note_on_the_first_actor() {
    let out = render(
        &Snapshot::new(),
        "{{sequence_diagram actors=\"producer,consumer\"}}",
    );
    assert!(out.contains("Note over producer: no messages yet"), "got: {out}");
    assert!(!out.contains("->>"));
}

#[test]
fn missing_actors_argument_degrades_to_a_diagnostic() {
    let trace = exchange_trace();
    let out = render(&trace, "{{sequence_diagram}}");
    assert!(out.contains("<!-- factsheet:"), "got: {out}");
    assert!(out.contains("'actors'"));
    let out = render(&trace, "{{sequence_diagram actors=\" , \"}}");
    assert!(out.contains("<!-- factsheet:"), "got: {out}");
}

#[test]
fn message_labels_survive_sanitization() {
    // a message label carrying characters the diagram dialect rejects
    let trace = Snapshot::from_facts(vec![sent("a", "b", "ready: phase<2>; \"go\"", 1)]);
    let out = render(&trace, "{{sequence_diagram actors=\"a,b\"}}");
    let arrow = out
        .lines()
        .find(|line| line.contains("->>"))
        .expect("arrow rendered");
    assert!(arrow.contains("a->>b: ready phase go"), "got: {arrow}");
    assert!(!arrow.contains(';'));
    assert!(!arrow.contains('<'));
}
