//! Property-based tests for rebalance invariants.
//!
//! These tests use proptest to verify that the weight assignment rules hold
//! across randomly generated snapshots, books and halt lists.

use factorbook::{DailySnapshot, InstructionKind, Position, Rebalancer, Symbol};
use proptest::prelude::*;
use rustc_hash::FxHashSet;

const EPS: f64 = 1e-9;

/// Factor values with a healthy share of exact zeros.
fn factor_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        3 => -100.0f64..100.0,
        1 => Just(0.0),
    ]
}

/// A universe of `S0..Sn` with random factors.
fn snapshot_strategy() -> impl Strategy<Value = DailySnapshot> {
    prop::collection::vec(factor_strategy(), 0..40).prop_map(|factors| {
        DailySnapshot::from_factors(
            factors
                .into_iter()
                .enumerate()
                .map(|(i, f)| (Symbol::new(&format!("S{i}")), f)),
        )
        .unwrap()
    })
}

/// Positions over `S0..S59`, so some overlap the universe and some do not.
fn positions_strategy() -> impl Strategy<Value = Vec<Position>> {
    prop::collection::btree_map(0usize..60, -500i64..500, 0..30).prop_map(|m| {
        m.into_iter()
            .map(|(i, amount)| Position::new(Symbol::new(&format!("S{i}")), amount))
            .collect()
    })
}

/// Indices of halted symbols.
fn halted_strategy() -> impl Strategy<Value = FxHashSet<Symbol>> {
    prop::collection::hash_set(0usize..60, 0..10).prop_map(|s| {
        s.into_iter()
            .map(|i| Symbol::new(&format!("S{i}")))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // ========================================================================
    // EXPOSURE INVARIANTS
    // ========================================================================

    /// With everything tradable, longs sum to 0.55 and are split evenly.
    #[test]
    fn long_weights_sum_to_long_exposure(snap in snapshot_strategy()) {
        let out = Rebalancer::default().rebalance(&snap, &[], |_| true);
        let longs: Vec<f64> = out
            .iter()
            .filter(|i| i.kind == InstructionKind::Long)
            .map(|i| i.target_weight)
            .collect();

        let n_long = snap.longs().count();
        prop_assert_eq!(longs.len(), n_long);
        if n_long > 0 {
            let sum: f64 = longs.iter().sum();
            prop_assert!((sum - 0.55).abs() < EPS, "long sum {}", sum);
            prop_assert!(longs.iter().all(|w| *w == longs[0]));
        }
    }

    /// With everything tradable, shorts sum to -0.45 and are split evenly.
    #[test]
    fn short_weights_sum_to_short_exposure(snap in snapshot_strategy()) {
        let out = Rebalancer::default().rebalance(&snap, &[], |_| true);
        let shorts: Vec<f64> = out
            .iter()
            .filter(|i| i.kind == InstructionKind::Short)
            .map(|i| i.target_weight)
            .collect();

        let n_short = snap.shorts().count();
        prop_assert_eq!(shorts.len(), n_short);
        if n_short > 0 {
            let sum: f64 = shorts.iter().sum();
            prop_assert!((sum + 0.45).abs() < EPS, "short sum {}", sum);
            prop_assert!(shorts.iter().all(|w| *w == shorts[0] && *w < 0.0));
        }
    }

    /// Gross target exposure never exceeds the policy gross.
    #[test]
    fn gross_within_policy(snap in snapshot_strategy()) {
        let tw = Rebalancer::default().target_weights(&snap);
        prop_assert!(tw.gross() <= 1.0 + EPS);
        prop_assert!(tw.iter().all(|(_, w)| (-1.0..=1.0).contains(&w)));
    }

    // ========================================================================
    // SELECTION INVARIANTS
    // ========================================================================

    /// No security is selected on both sides.
    #[test]
    fn long_and_short_sets_are_disjoint(snap in snapshot_strategy()) {
        let sel = snap.select();
        let longs: FxHashSet<Symbol> = sel.longs.iter().copied().collect();
        prop_assert!(sel.shorts.iter().all(|s| !longs.contains(s)));
    }

    /// Every symbol gets at most one instruction per cycle.
    #[test]
    fn at_most_one_instruction_per_symbol(
        snap in snapshot_strategy(),
        positions in positions_strategy(),
        halted in halted_strategy(),
    ) {
        let out = Rebalancer::default().rebalance(&snap, &positions, |s| !halted.contains(s));
        let mut seen = FxHashSet::default();
        for i in &out {
            prop_assert!(seen.insert(i.symbol), "duplicate instruction for {}", i.symbol);
        }
    }

    // ========================================================================
    // LIQUIDATION AND TRADABILITY
    // ========================================================================

    /// Held, unselected, tradable → exactly one zero-weight liquidation.
    /// Held, unselected, halted → nothing.
    #[test]
    fn stale_positions_flattened_unless_halted(
        snap in snapshot_strategy(),
        positions in positions_strategy(),
        halted in halted_strategy(),
    ) {
        let out = Rebalancer::default().rebalance(&snap, &positions, |s| !halted.contains(s));
        let selected = snap.select().selected();

        for pos in positions.iter().filter(|p| p.amount != 0 && !selected.contains(&p.symbol)) {
            let hits: Vec<_> = out.iter().filter(|i| i.symbol == pos.symbol).collect();
            if halted.contains(&pos.symbol) {
                prop_assert!(hits.is_empty());
            } else {
                prop_assert_eq!(hits.len(), 1);
                prop_assert_eq!(hits[0].kind, InstructionKind::Liquidate);
                prop_assert_eq!(hits[0].target_weight, 0.0);
            }
        }
    }

    /// Halted symbols never appear in the output.
    #[test]
    fn halted_symbols_untouched(
        snap in snapshot_strategy(),
        positions in positions_strategy(),
        halted in halted_strategy(),
    ) {
        let out = Rebalancer::default().rebalance(&snap, &positions, |s| !halted.contains(s));
        prop_assert!(out.iter().all(|i| !halted.contains(&i.symbol)));
    }

    /// An all-negative universe never emits a long (and never divides by zero).
    #[test]
    fn empty_long_set_emits_no_longs(factors in prop::collection::vec(-100.0f64..-0.001, 0..20)) {
        let snap = DailySnapshot::from_factors(
            factors.into_iter().enumerate().map(|(i, f)| (Symbol::new(&format!("N{i}")), f)),
        ).unwrap();
        let out = Rebalancer::default().rebalance(&snap, &[], |_| true);
        prop_assert!(out.iter().all(|i| i.kind != InstructionKind::Long));
        prop_assert!(out.iter().all(|i| i.target_weight.is_finite()));
    }
}
