//! The per-tick update kernel: double-buffered, data-parallel-safe, and
//! deterministic regardless of how the per-neuron updates are fanned out.
//!
//! `tick(prev, next)` reads exclusively from `prev` and writes exclusively
//! to `next`'s own cell for each neuron, so the update can run neuron by
//! neuron in any order, or in parallel, and produce the same result: every
//! neuron's one PRNG draw comes from [`Xorshift96::draw_one`], keyed by
//! `(ticks_count, x, y)` rather than a shared mutating stream.

use log::debug;

use crate::field::Field;
use crate::neuron::Neuron;
use crate::rng::Xorshift96;

fn wrap(coord: i32, extent: u16) -> u16 {
    coord.rem_euclid(i32::from(extent)) as u16
}

/// Compute neuron `(x, y)`'s next state from `prev`. Reads only `prev`;
/// safe to call concurrently for distinct `(x, y)` in the same tick.
fn update_cell(prev: &Field, x: u16, y: u16) -> Neuron {
    let prev_idx = prev.index(x, y);
    let prev_neuron = prev.neurons()[prev_idx];

    let base = Xorshift96::new(prev.seed.0, prev.seed.1, prev.seed.2);
    let draw = Xorshift96::draw_one(&base, prev.ticks_count, x, y);

    let radius = i32::from(prev.nh_radius);
    let diameter = radius * 2 + 1;

    let mut synac_mask = prev_neuron.synac_mask;
    let mut synex_mask = prev_neuron.synex_mask;
    let mut running_syn_count = u32::from(prev_neuron.syn_count);
    let mut delta_value: i32 = 0;

    let plasticity_active = prev.ticks_count % (prev.evol_step + 1) == 0;

    for j in 0..diameter {
        for i in 0..diameter {
            if i == radius && j == radius {
                continue;
            }

            // IDX2D(i, j, d): the neighbor's bit position in synac_mask/synex_mask,
            // addressed the same way regardless of whether it falls before or
            // after the skipped center cell.
            let idx2d = (j * diameter + i) as u32;

            let nx = wrap(i32::from(x) + i - radius, prev.width);
            let ny = wrap(i32::from(y) + j - radius, prev.height);
            let neighbor = prev.neurons()[prev.index(nx, ny)];

            let bit_was_set = (prev_neuron.synac_mask >> idx2d) & 1 != 0;

            if bit_was_set && neighbor.value > prev.fire_threshold {
                let excitatory = (prev_neuron.synex_mask >> idx2d) & 1 != 0;
                delta_value += if excitatory {
                    i32::from(prev.exc_value)
                } else {
                    -i32::from(prev.exc_value)
                };
            }

            if plasticity_active {
                let gate = draw.wrapping_add(idx2d) % 1000 < 10;
                if gate {
                    let nb_pulse = neighbor.pulse;
                    if bit_was_set && nb_pulse < prev.syngen_pulses_count {
                        synac_mask &= !(1 << idx2d);
                        running_syn_count = running_syn_count.saturating_sub(1);
                    } else if !bit_was_set
                        && nb_pulse > prev.syngen_pulses_count
                        && running_syn_count < u32::from(prev.max_syn_count)
                    {
                        synac_mask |= 1 << idx2d;
                        let inhibitory = (draw & prev.inhexc_ratio) == 0;
                        if inhibitory {
                            synex_mask &= !(1 << idx2d);
                        } else {
                            synex_mask |= 1 << idx2d;
                        }
                        running_syn_count += 1;
                    }
                }
            }
        }
    }

    let mut value = i32::from(prev_neuron.value) + delta_value;
    if value > 0 {
        value -= i32::from(prev.decay_value);
    } else if value < 0 {
        value += i32::from(prev.decay_value);
    }
    let value = value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;

    let fired = prev_neuron.value > prev.fire_threshold;
    let (value, mut pulse_mask, mut pulse) = if fired {
        (prev.recovery_value, prev_neuron.pulse_mask | 1, prev_neuron.pulse.saturating_add(1))
    } else {
        (value, prev_neuron.pulse_mask, prev_neuron.pulse)
    };

    if (prev_neuron.pulse_mask >> u32::from(prev.pulse_window)) & 1 != 0 {
        pulse = pulse.saturating_sub(1);
    }
    pulse_mask <<= 1;

    Neuron {
        value,
        pulse_mask,
        pulse,
        synac_mask,
        synex_mask,
        syn_count: synac_mask.count_ones() as u8,
    }
}

/// Advance the field by one tick: `next` is overwritten cell by cell from
/// `prev`, which is left untouched. `next` must share `prev`'s dimensions
/// and scalar configuration (typically obtained via [`Field::copy`]).
pub fn tick(prev: &Field, next: &mut Field) {
    debug_assert_eq!(prev.width, next.width);
    debug_assert_eq!(prev.height, next.height);

    for y in 0..prev.height {
        for x in 0..prev.width {
            let idx = prev.index(x, y);
            next.neurons[idx] = update_cell(prev, x, y);
        }
    }
    next.ticks_count = prev.ticks_count + 1;
    debug!("tick {} -> {} complete", prev.ticks_count, next.ticks_count);
}

/// Data-parallel variant of [`tick`], fanning the per-row update out over
/// a rayon thread pool. Each worker owns a disjoint set of `next` rows and
/// reads `prev` freely; because every neuron's PRNG draw is a pure
/// function of `(ticks_count, x, y)`, this produces bit-identical output
/// to the sequential [`tick`] regardless of how rows are scheduled.
#[cfg(feature = "parallel")]
pub fn tick_parallel(prev: &Field, next: &mut Field) {
    use rayon::prelude::*;

    debug_assert_eq!(prev.width, next.width);
    debug_assert_eq!(prev.height, next.height);

    let width = prev.width;
    next.neurons
        .par_chunks_mut(usize::from(width))
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as u16;
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = update_cell(prev, x as u16, y);
            }
        });
    next.ticks_count = prev.ticks_count + 1;
    debug!("parallel tick {} -> {} complete", prev.ticks_count, next.ticks_count);
}
