//! Integration tests for the field's documented invariants and a handful
//! of concrete simulation scenarios: quiescence, firing and recovery,
//! wrap-around connectivity, structural plasticity birth/death, and
//! snapshot round-tripping.

use nfield_core::{tick, Field, FieldConfig};

fn small_field() -> Field {
    Field::init(FieldConfig::new(6, 6)).unwrap()
}

#[test]
fn scenario_quiescent_field_never_fires() {
    let mut prev = small_field();
    for _ in 0..20 {
        let mut next = prev.copy();
        tick(&prev, &mut next);
        assert!(next.neurons().iter().all(|n| n.value == 0));
        assert!(next.neurons().iter().all(|n| n.pulse == 0));
        prev = next;
    }
}

#[test]
fn scenario_single_fed_neuron_fires_once_and_recovers() {
    let mut prev = small_field();
    let target = prev.index(3, 3);
    prev.feed(target, 1, &[prev.fire_threshold() + 10]);

    let mut next = prev.copy();
    tick(&prev, &mut next);

    assert_eq!(next.neurons()[target].value, next.recovery_value());
    assert_eq!(next.neurons()[target].pulse, 1);
    assert_eq!(next.neurons()[target].pulse_mask & 1, 1);
}

#[test]
fn scenario_decay_moves_value_toward_zero() {
    let mut prev = small_field();
    let target = prev.index(2, 2);
    prev.feed(target, 1, &[10]);

    let mut next = prev.copy();
    tick(&prev, &mut next);

    assert!(next.neurons()[target].value < 10);
    assert!(next.neurons()[target].value >= 0);
}

#[test]
fn scenario_wraparound_connectivity_at_edge() {
    let mut prev = Field::init(FieldConfig::new(4, 4)).unwrap();
    prev.set_evol_step(0);

    let corner = prev.index(0, 0);
    let opposite_corner = prev.index(3, 3);
    prev.neurons_mut()[corner].synac_mask = 0b1;
    prev.neurons_mut()[corner].synex_mask = 0b1;
    prev.neurons_mut()[corner].syn_count = 1;
    prev.feed(opposite_corner, 1, &[prev.fire_threshold() + 10]);

    let mut next = prev.copy();
    tick(&prev, &mut next);

    assert_ne!(next.neurons()[corner].value, 0, "corner neuron should integrate from its wrap-around neighbor");
}

#[test]
fn scenario_synapse_dies_under_sustained_low_activity() {
    let mut prev = Field::init(FieldConfig::new(6, 6)).unwrap();
    prev.set_evol_step(0);
    prev.set_syngen_pulses_count(2);

    let target = prev.index(3, 3);
    prev.neurons_mut()[target].synac_mask = 0b1;
    prev.neurons_mut()[target].synex_mask = 0b1;
    prev.neurons_mut()[target].syn_count = 1;

    let mut died = false;
    for _ in 0..3000 {
        let mut next = prev.copy();
        tick(&prev, &mut next);
        if next.neurons()[target].syn_count == 0 {
            died = true;
            break;
        }
        prev = next;
    }
    assert!(died, "a synapse onto a never-firing neighbor should eventually die");
}

#[test]
fn scenario_synapse_capacity_never_exceeded() {
    let mut prev = Field::init(FieldConfig::new(6, 6)).unwrap();
    prev.set_evol_step(0);
    prev.set_syngen_pulses_count(0);
    prev.set_max_touch(1, 2);
    for n in prev.neurons_mut() {
        n.pulse = 255;
        n.synac_mask = 0;
        n.synex_mask = 0;
        n.syn_count = 0;
    }

    for _ in 0..32 {
        let mut next = prev.copy();
        tick(&prev, &mut next);
        assert!(next.neurons().iter().all(|n| n.syn_count <= next.max_syn_count()));
        assert!(next
            .neurons()
            .iter()
            .all(|n| n.syn_count == n.synac_mask.count_ones() as u8));
        prev = next;
    }
}

#[test]
fn scenario_snapshot_preserves_exact_state_across_ticks() {
    let mut prev = small_field();
    prev.feed(0, 1, &[30]);
    prev.neurons_mut()[1].synac_mask = 0b0101;
    prev.neurons_mut()[1].syn_count = 2;

    for _ in 0..5 {
        let mut next = prev.copy();
        tick(&prev, &mut next);
        prev = next;
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.bin");
    prev.to_file(&path).unwrap();
    let restored = Field::from_file(&path).unwrap();

    assert_eq!(restored.ticks_count(), prev.ticks_count());
    assert_eq!(restored.neurons(), prev.neurons());
}
