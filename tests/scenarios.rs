//! End-to-end rebalance scenarios on small, hand-checked books.

use factorbook::{
    DailyRecord, DailySnapshot, Instruction, InstructionKind, Position, Rebalancer, Symbol,
};

fn sym(s: &str) -> Symbol {
    Symbol::new(s)
}

fn snapshot(rows: &[(&str, f64)]) -> DailySnapshot {
    DailySnapshot::from_factors(rows.iter().map(|&(s, f)| (sym(s), f))).unwrap()
}

fn pairs(out: &[Instruction]) -> Vec<(&str, f64)> {
    out.iter()
        .map(|i| (i.symbol.as_str(), i.target_weight))
        .collect()
}

// ============================================================================
// Weight assignment
// ============================================================================

#[test]
fn two_longs_one_short_fresh_book() {
    let snap = snapshot(&[("A", 0.8), ("B", 0.1), ("C", -0.3)]);
    let out = Rebalancer::default().rebalance(&snap, &[], |_| true);

    assert_eq!(pairs(&out), vec![("A", 0.275), ("B", 0.275), ("C", -0.45)]);
    assert_eq!(out[0].kind, InstructionKind::Long);
    assert_eq!(out[2].kind, InstructionKind::Short);
}

#[test]
fn no_longs_only_short() {
    let snap = snapshot(&[("D", -0.2), ("Z", 0.0)]);
    let out = Rebalancer::default().rebalance(&snap, &[], |_| true);

    assert_eq!(pairs(&out), vec![("D", -0.45)]);
}

#[test]
fn empty_selection_emits_nothing() {
    let snap = snapshot(&[("Z", 0.0), ("Y", f64::NAN)]);
    let out = Rebalancer::default().rebalance(&snap, &[], |_| true);
    assert!(out.is_empty());

    let out = Rebalancer::default().rebalance(&DailySnapshot::new(), &[], |_| true);
    assert!(out.is_empty());
}

// ============================================================================
// Stale positions
// ============================================================================

#[test]
fn stale_tradable_position_is_flattened() {
    let positions = [Position::new(sym("E"), 100)];
    let out = Rebalancer::default().rebalance(&DailySnapshot::new(), &positions, |_| true);

    assert_eq!(pairs(&out), vec![("E", 0.0)]);
    assert_eq!(out[0].kind, InstructionKind::Liquidate);
}

#[test]
fn stale_halted_position_carries_over() {
    let positions = [Position::new(sym("F"), -20)];
    let out = Rebalancer::default().rebalance(&DailySnapshot::new(), &positions, |s| {
        s.as_str() != "F"
    });

    assert!(out.is_empty());
}

#[test]
fn halted_selected_name_is_not_resized() {
    let snap = snapshot(&[("A", 0.5), ("C", -0.5)]);
    let positions = [Position::new(sym("A"), 10), Position::new(sym("E"), 7)];
    let out = Rebalancer::default().rebalance(&snap, &positions, |s| s.as_str() != "A");

    assert_eq!(pairs(&out), vec![("C", -0.45), ("E", 0.0)]);
}

#[test]
fn mixed_day() {
    let snap = snapshot(&[
        ("AAPL", 0.21),
        ("MSFT", 0.05),
        ("XOM", -0.12),
        ("IBM", -0.40),
        ("KO", 0.0),
    ]);
    let positions = [
        Position::new(sym("AAPL"), 50),  // still long
        Position::new(sym("KO"), 30),    // dropped: factor went to zero
        Position::new(sym("GE"), -15),   // dropped: left the universe
        Position::new(sym("HALT"), 200), // dropped but halted
    ];

    let out = Rebalancer::default().rebalance(&snap, &positions, |s| s.as_str() != "HALT");

    assert_eq!(
        pairs(&out),
        vec![
            ("AAPL", 0.275),
            ("MSFT", 0.275),
            ("XOM", -0.225),
            ("IBM", -0.225),
            ("KO", 0.0),
            ("GE", 0.0),
        ]
    );
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn diagnostics_count_by_sign() {
    let positions = [Position::new(sym("G"), 5), Position::new(sym("H"), -3)];
    let rec = DailyRecord::from_positions(&positions, 0.97);

    assert_eq!(rec.num_long, 1);
    assert_eq!(rec.num_short, 1);
    assert_eq!(rec.leverage, 0.97);
}

#[test]
fn diagnostics_do_not_depend_on_snapshot() {
    // Counting is pure observation of the book, before or after a rebalance.
    let positions = [
        Position::new(sym("A"), 1),
        Position::new(sym("B"), 2),
        Position::new(sym("C"), -9),
    ];
    let before = DailyRecord::from_positions(&positions, 1.0);
    let _ = Rebalancer::default().rebalance(&snapshot(&[("A", -1.0)]), &positions, |_| true);
    let after = DailyRecord::from_positions(&positions, 1.0);
    assert_eq!(before, after);
}
