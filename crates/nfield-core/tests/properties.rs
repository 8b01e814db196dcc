//! Property-based tests over randomized tick sequences, covering the
//! invariants that must hold for every reachable field state rather than
//! just the handful of scenarios in `scenarios.rs`.

use nfield_core::{tick, Field, FieldConfig};
use proptest::prelude::*;

fn run_ticks(mut field: Field, initial_values: &[i16], ticks: u32) -> Field {
    field.feed(0, initial_values.len(), initial_values);
    for _ in 0..ticks {
        let mut next = field.copy();
        tick(&field, &mut next);
        field = next;
    }
    field
}

proptest! {
    #[test]
    fn syn_count_always_matches_popcount(
        seed_values in proptest::collection::vec(-100i16..150, 16),
        ticks in 0u32..20,
    ) {
        let field = Field::init(FieldConfig::new(4, 4)).unwrap();
        let field = run_ticks(field, &seed_values, ticks);
        for neuron in field.neurons() {
            prop_assert_eq!(neuron.syn_count, neuron.synac_mask.count_ones() as u8);
        }
    }

    #[test]
    fn syn_count_never_exceeds_capacity(
        seed_values in proptest::collection::vec(-100i16..150, 16),
        ticks in 0u32..20,
    ) {
        let field = Field::init(FieldConfig::new(4, 4)).unwrap();
        let field = run_ticks(field, &seed_values, ticks);
        let max = field.max_syn_count();
        for neuron in field.neurons() {
            prop_assert!(neuron.syn_count <= max);
        }
    }

    #[test]
    fn pulse_count_never_exceeds_window(
        seed_values in proptest::collection::vec(-100i16..150, 16),
        ticks in 1u32..20,
    ) {
        let field = Field::init(FieldConfig::new(4, 4)).unwrap();
        let field = run_ticks(field, &seed_values, ticks);
        let window = field.pulse_window();
        for neuron in field.neurons() {
            prop_assert!(neuron.pulse <= window + 1);
        }
    }

    #[test]
    fn ticks_count_advances_by_exactly_one_per_tick(
        ticks in 0u32..30,
    ) {
        let field = Field::init(FieldConfig::new(5, 5)).unwrap();
        let field = run_ticks(field, &[], ticks);
        prop_assert_eq!(field.ticks_count(), ticks);
    }

    #[test]
    fn deterministic_for_identical_initial_state(
        seed_values in proptest::collection::vec(-100i16..150, 9),
        ticks in 0u32..15,
    ) {
        let field_a = Field::init(FieldConfig::new(3, 3)).unwrap();
        let field_b = Field::init(FieldConfig::new(3, 3)).unwrap();
        let result_a = run_ticks(field_a, &seed_values, ticks);
        let result_b = run_ticks(field_b, &seed_values, ticks);
        prop_assert_eq!(result_a.neurons(), result_b.neurons());
    }
}
