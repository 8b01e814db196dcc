//! The field: a toroidal grid of neurons plus the scalar parameters that
//! govern how they integrate, fire, decay, and grow or prune synapses.

use log::{debug, warn};

pub use nfield_storage::PulseMapping;

use crate::error::{FieldError, Result};
use crate::neuron::Neuron;
use crate::rng::Xorshift96;

/// Default structural-plasticity cadence: re-evaluate synapse birth/death
/// every tick (`ticks_count % (evol_step + 1) == 0` with `evol_step == 0`).
pub const DEFAULT_EVOL_STEP: u32 = 0;
/// Default pulse history window, in ticks
pub const DEFAULT_PULSE_WINDOW: u8 = 16;
/// Default firing threshold
pub const DEFAULT_FIRE_THRESHOLD: i16 = 80;
/// Default post-fire reset value
pub const DEFAULT_RECOVERY_VALUE: i16 = -20;
/// Default per-active-synapse charge magnitude
pub const DEFAULT_EXC_VALUE: i16 = 20;
/// Default per-tick decay magnitude
pub const DEFAULT_DECAY_VALUE: i16 = 1;
/// Default pulse-count threshold gating synapse birth/death
pub const DEFAULT_SYNGEN_PULSES_COUNT: u8 = 2;
/// Default fraction (numerator over denominator) of a neighborhood's
/// cells a neuron may connect to. Defaults to the whole neighborhood, so
/// a freshly initialized field's full `synac_mask` does not itself
/// violate the `syn_count <= max_syn_count` invariant.
pub const DEFAULT_MAX_TOUCH_NUM: u32 = 1;
/// Denominator paired with [`DEFAULT_MAX_TOUCH_NUM`]
pub const DEFAULT_MAX_TOUCH_DEN: u32 = 1;
/// Default excitatory/inhibitory split control: low nibble mask, giving
/// new synapses roughly a 1-in-16 chance of being inhibitory
pub const DEFAULT_INHEXC_RATIO: u32 = 0x0000_000F;
/// Default stimulus sub-cycle length
pub const DEFAULT_SAMPLE_WINDOW: u32 = 10;

fn neighborhood_count(radius: u8) -> u32 {
    let diameter = u32::from(radius) * 2 + 1;
    diameter * diameter - 1
}

/// The default `synac_mask`/`synex_mask` for a freshly initialized field:
/// every one of the `d*d - 1` neighbor bits set, addressed low-to-high by
/// `IDX2D(i, j, d) = j*d + i` (the center cell, `i == j == radius`, is
/// never assigned a bit). Defining this relative to `radius` rather than
/// a fixed constant is required so radius 1 and radius 2 fields both
/// start fully connected to their own neighborhoods.
fn default_neighbor_mask(radius: u8) -> u32 {
    let count = neighborhood_count(radius);
    if count >= 32 {
        u32::MAX
    } else {
        (1u32 << count) - 1
    }
}

/// Construction-time parameters for a [`Field`], mirroring the role a
/// network configuration type plays for a simulation engine: validated up
/// front, then consumed by `FieldBuilder::build`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldConfig {
    /// Grid width, in cells
    pub width: u16,
    /// Grid height, in cells
    pub height: u16,
    /// Chebyshev neighborhood radius (1 or 2)
    pub nh_radius: u8,
}

impl FieldConfig {
    /// Build a config, defaulting the neighborhood radius to 1
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height, nh_radius: 1 }
    }

    /// Set the neighborhood radius
    pub fn with_nh_radius(mut self, radius: u8) -> Self {
        self.nh_radius = radius;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FieldError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.nh_radius != 1 && self.nh_radius != 2 {
            return Err(FieldError::InvalidRadius { radius: self.nh_radius });
        }
        Ok(())
    }
}

/// Builds a [`Field`] from a [`FieldConfig`], mirroring the network
/// builder pattern used elsewhere in this codebase for multi-step,
/// validated construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBuilder {
    config: FieldConfig,
}

impl FieldBuilder {
    /// Start building from a config
    pub fn new(config: FieldConfig) -> Self {
        Self { config }
    }

    /// Validate the config and allocate the field
    pub fn build(self) -> Result<Field> {
        Field::init(self.config)
    }
}

/// A 2D toroidal grid of spiking neurons with bitmask-encoded synaptic
/// connectivity and structural plasticity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) ticks_count: u32,
    pub(crate) nh_radius: u8,
    pub(crate) fire_threshold: i16,
    pub(crate) recovery_value: i16,
    pub(crate) exc_value: i16,
    pub(crate) decay_value: i16,
    pub(crate) pulse_window: u8,
    pub(crate) syngen_pulses_count: u8,
    pub(crate) max_syn_count: u8,
    pub(crate) evol_step: u32,
    pub(crate) inhexc_ratio: u32,
    pub(crate) sample_window: u32,
    pub(crate) pulse_mapping: PulseMapping,
    pub(crate) neurons: Vec<Neuron>,
    pub(crate) seed: (u32, u32, u32),
    pub(crate) feed_rng: Xorshift96,
}

impl Field {
    /// Allocate a new field from a validated config, with every scalar
    /// parameter at its documented default and every neuron quiescent.
    pub fn init(config: FieldConfig) -> Result<Self> {
        config.validate()?;

        let cell_count = usize::from(config.width) * usize::from(config.height);
        let max_syn_count = ((neighborhood_count(config.nh_radius) * DEFAULT_MAX_TOUCH_NUM)
            / DEFAULT_MAX_TOUCH_DEN)
            .min(31) as u8;

        debug!(
            "initializing field {}x{} (radius={}, max_syn_count={})",
            config.width, config.height, config.nh_radius, max_syn_count
        );

        let nh_mask = default_neighbor_mask(config.nh_radius);
        let mut neuron = Neuron::new();
        neuron.synac_mask = nh_mask;
        neuron.synex_mask = nh_mask;
        neuron.syn_count = neighborhood_count(config.nh_radius).min(31) as u8;

        Ok(Self {
            width: config.width,
            height: config.height,
            ticks_count: 0,
            nh_radius: config.nh_radius,
            fire_threshold: DEFAULT_FIRE_THRESHOLD,
            recovery_value: DEFAULT_RECOVERY_VALUE,
            exc_value: DEFAULT_EXC_VALUE,
            decay_value: DEFAULT_DECAY_VALUE,
            pulse_window: DEFAULT_PULSE_WINDOW,
            syngen_pulses_count: DEFAULT_SYNGEN_PULSES_COUNT,
            max_syn_count,
            evol_step: DEFAULT_EVOL_STEP,
            inhexc_ratio: DEFAULT_INHEXC_RATIO,
            sample_window: DEFAULT_SAMPLE_WINDOW,
            pulse_mapping: PulseMapping::Linear,
            neurons: vec![neuron; cell_count],
            seed: (123_456_789, 362_436_069, 521_288_629),
            feed_rng: Xorshift96::default(),
        })
    }

    /// Build a field whose behavior reproduces the simpler historical
    /// baseline with no inhibitory path: every synapse is excitatory.
    pub fn init_all_excitatory(config: FieldConfig) -> Result<Self> {
        let mut field = Self::init(config)?;
        field.inhexc_ratio = u32::MAX;
        Ok(field)
    }

    /// Deep-copy a field: scalar parameters and the full neuron array
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Grid width
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Grid height
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Number of ticks elapsed so far
    pub fn ticks_count(&self) -> u32 {
        self.ticks_count
    }

    /// Chebyshev neighborhood radius
    pub fn nh_radius(&self) -> u8 {
        self.nh_radius
    }

    /// Upper bound on a neuron's active synapse count
    pub fn max_syn_count(&self) -> u8 {
        self.max_syn_count
    }

    /// Pulse history window length
    pub fn pulse_window(&self) -> u8 {
        self.pulse_window
    }

    /// Firing threshold
    pub fn fire_threshold(&self) -> i16 {
        self.fire_threshold
    }

    /// Post-fire reset value
    pub fn recovery_value(&self) -> i16 {
        self.recovery_value
    }

    /// Per-active-synapse charge magnitude
    pub fn exc_value(&self) -> i16 {
        self.exc_value
    }

    /// Base PRNG seed for this field's tick stream
    pub fn seed(&self) -> (u32, u32, u32) {
        self.seed
    }

    /// Borrow the neuron array, row-major, `y * width + x`
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    /// Mutably borrow the neuron array, row-major, `y * width + x`
    pub fn neurons_mut(&mut self) -> &mut [Neuron] {
        &mut self.neurons
    }

    /// Row-major linear index of cell `(x, y)`
    pub fn index(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }

    /// Replace the PRNG seed this field's ticks draw from. Exposed mainly
    /// for reproducible tests; normal callers rely on the default seed.
    pub fn set_seed(&mut self, seed: (u32, u32, u32)) {
        self.seed = seed;
    }

    /// Set the neighborhood radius. No-ops if `radius` is not 1 or 2.
    pub fn set_nh_radius(&mut self, radius: u8) {
        if radius == 1 || radius == 2 {
            self.nh_radius = radius;
        } else {
            warn!("ignoring invalid nh_radius {radius}");
        }
    }

    /// Set the firing threshold unconditionally
    pub fn set_fire_threshold(&mut self, threshold: i16) {
        self.fire_threshold = threshold;
    }

    /// Set the post-fire recovery value unconditionally
    pub fn set_recovery_value(&mut self, value: i16) {
        self.recovery_value = value;
    }

    /// Set the per-synapse excitatory charge magnitude unconditionally
    pub fn set_exc_value(&mut self, value: i16) {
        self.exc_value = value;
    }

    /// Set the per-tick decay magnitude unconditionally
    pub fn set_decay_value(&mut self, value: i16) {
        self.decay_value = value;
    }

    /// Set the structural plasticity cadence unconditionally
    pub fn set_evol_step(&mut self, step: u32) {
        self.evol_step = step;
    }

    /// Set the pulse history window length. No-ops if `window` would
    /// overflow the 32-bit pulse shift register.
    pub fn set_pulse_window(&mut self, window: u8) {
        if window <= 31 {
            self.pulse_window = window;
        } else {
            warn!("ignoring out-of-range pulse_window {window}");
        }
    }

    /// Set the pulse-count threshold gating synapse birth/death
    pub fn set_syngen_pulses_count(&mut self, count: u8) {
        self.syngen_pulses_count = count;
    }

    /// Set the maximum active synapse count a neuron may reach, as a
    /// touch fraction of the full neighborhood. No-ops if `touch` is
    /// outside `0.0..=1.0`.
    pub fn set_max_touch(&mut self, touch_num: u32, touch_den: u32) {
        if touch_den == 0 || touch_num > touch_den {
            warn!("ignoring invalid max_touch {touch_num}/{touch_den}");
            return;
        }
        let count = (neighborhood_count(self.nh_radius) * touch_num) / touch_den;
        self.max_syn_count = count.min(31) as u8;
    }

    /// Set the excitatory/inhibitory split control for new synapses
    pub fn set_inhexc_ratio(&mut self, ratio: u32) {
        self.inhexc_ratio = ratio;
    }

    /// Set the stimulus sub-cycle length used by the sampling feed
    pub fn set_sample_window(&mut self, window: u32) {
        self.sample_window = window;
    }

    /// Set the stimulus-to-pulse-pattern mapping used by the sampling feed
    pub fn set_pulse_mapping(&mut self, mapping: PulseMapping) {
        self.pulse_mapping = mapping;
    }

    /// Current popcount-derived total active synapse count across the
    /// whole field, useful for test assertions and diagnostics.
    pub fn total_syn_count(&self) -> u64 {
        self.neurons.iter().map(|n| u64::from(n.syn_count)).sum()
    }
}
