use factsheet::assemble::Assembler;
use factsheet::construct::{Fact, Term};
use factsheet::trace::{InMemoryRegistry, Snapshot};

fn render(trace: &Snapshot, document: &str) -> String {
    let registry = InMemoryRegistry::new();
    Assembler::new(trace, &registry).render(document)
}

fn sale_at(tick: i64) -> Fact {
    Fact::at("sale", vec![Term::Atom("widget".into())], tick)
}

#[test]
fn empty_trace_renders_a_zero_series_and_a_warning() {
    let out = render(&Snapshot::new(), "{{metrics_chart}}");
    assert!(out.contains("xychart-beta"), "got: {out}");
    assert!(out.contains("x-axis [0]"));
    assert!(out.contains("line [0]"));
    assert!(out.contains("no simulation data"));
}

#[test]
fn counts_accumulate_across_buckets() {
    let trace = Snapshot::from_facts(vec![
        sale_at(0),
        sale_at(5),
        sale_at(10),
        sale_at(15),
        sale_at(20),
    ]);
    let out = render(&trace, "{{metrics_chart predicates=\"sale\"}}");
    // max tick 20 -> step 2 -> eleven boundaries 0..20
    assert!(
        out.contains("x-axis [0, 2, 4, 6, 8, 10, 12, 14, 16, 18, 20]"),
        "got: {out}"
    );
    assert!(
        out.contains("line [1, 1, 2, 2, 2, 3, 3, 4, 4, 4, 5]"),
        "got: {out}"
    );
    // y upper bound is the observed maximum plus the fixed margin
    assert!(out.contains("0 --> 15"));
    assert!(out.contains("_Series: sale_"));
}

#[test]
fn short_traces_use_unit_buckets() {
    let trace = Snapshot::from_facts(vec![sale_at(0), sale_at(1), sale_at(2)]);
    let out = render(&trace, "{{metrics_chart}}");
    assert!(out.contains("x-axis [0, 1, 2]"), "got: {out}");
    assert!(out.contains("line [1, 2, 3]"));
}

#[test]
fn requested_predicates_are_filtered_to_those_present() {
    let trace = Snapshot::from_facts(vec![
        sale_at(1),
        Fact::at("restock", vec![Term::Atom("widget".into())], 2),
    ]);
    let out = render(&trace, "{{metrics_chart predicates=\"sale,refund\"}}");
    assert!(out.contains("_Series: sale_"), "got: {out}");
    assert!(!out.contains("refund"));
    assert!(!out.contains("Requested predicates not present"));
}

#[test]
fn absent_request_falls_back_to_recorded_predicates_with_a_note() {
    let trace = Snapshot::from_facts(vec![
        sale_at(1),
        Fact::at("restock", vec![Term::Atom("widget".into())], 2),
        Fact::at("process_started", vec![Term::Atom("runtime".into())], 0),
    ]);
    let out = render(&trace, "{{metrics_chart predicates=\"refund\"}}");
    assert!(out.contains("Requested predicates not present"), "got: {out}");
    // the bookkeeping start marker never gets a series
    assert!(out.contains("_Series: restock, sale_"));
}

#[test]
fn title_argument_is_honored() {
    let trace = Snapshot::from_facts(vec![sale_at(1)]);
    let out = render(&trace, "{{metrics_chart title=\"Sales over time\"}}");
    assert!(out.contains("title \"Sales over time\""), "got: {out}");
}
