//! A 2D spiking neural-field simulator: a toroidal grid of neurons with
//! bitmask-encoded synaptic connectivity, structural plasticity driven by
//! recent firing rate, and a deterministic tick kernel safe to fan out
//! across a data-parallel worker pool.

mod error;
mod feed;
mod field;
mod neuron;
mod rng;
mod snapshot;
mod tick;

pub use error::{FieldError, Result};
pub use field::{
    Field, FieldBuilder, FieldConfig, PulseMapping, DEFAULT_DECAY_VALUE, DEFAULT_EVOL_STEP,
    DEFAULT_EXC_VALUE, DEFAULT_FIRE_THRESHOLD, DEFAULT_INHEXC_RATIO, DEFAULT_MAX_TOUCH_DEN,
    DEFAULT_MAX_TOUCH_NUM, DEFAULT_PULSE_WINDOW, DEFAULT_RECOVERY_VALUE, DEFAULT_SAMPLE_WINDOW,
    DEFAULT_SYNGEN_PULSES_COUNT,
};
pub use neuron::Neuron;
pub use rng::Xorshift96;
pub use tick::tick;

#[cfg(feature = "parallel")]
pub use tick::tick_parallel;
