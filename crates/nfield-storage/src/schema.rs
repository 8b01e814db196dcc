//! Binary layout of a field snapshot: scalar header followed by a packed
//! neuron array. There is no magic number and no version field — two
//! snapshots are only interchangeable when both sides agree on these exact
//! widths, as specified by the field format this crate implements.

/// How an external stimulus value maps onto a binary within-window firing
/// pattern for [`crate`]'s sampling feed. Stored as a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseMapping {
    /// Fire on sub-steps `0..input` (front-loaded within the sub-cycle)
    Linear,
    /// Fire on sub-steps distributed across the sub-cycle so the firing
    /// fraction still averages `input / (sample_window - 1)`
    FastProportional,
}

impl PulseMapping {
    fn to_u8(self) -> u8 {
        match self {
            PulseMapping::Linear => 0,
            PulseMapping::FastProportional => 1,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => PulseMapping::FastProportional,
            _ => PulseMapping::Linear,
        }
    }
}

/// The scalar portion of a field snapshot, in exactly the field order the
/// binary layout uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHeader {
    /// Grid width
    pub width: u16,
    /// Grid height
    pub height: u16,
    /// Tick counter at the time of the snapshot
    pub ticks_count: u32,
    /// Structural plasticity cadence control
    pub evol_step: u32,
    /// Pulse history window length
    pub pulse_window: u8,
    /// Chebyshev neighborhood radius
    pub nh_radius: u8,
    /// Firing threshold
    pub fire_threshold: i16,
    /// Value assigned on firing
    pub recovery_value: i16,
    /// Per-active-synapse charge magnitude
    pub exc_value: i16,
    /// Per-tick decay magnitude
    pub decay_value: i16,
    /// Pulse-count threshold for synapse birth/death
    pub syngen_pulses_count: u8,
    /// Upper bound on a neuron's active synapse count
    pub max_syn_count: u8,
    /// Excitatory/inhibitory split control for new synapses
    pub inhexc_ratio: u32,
    /// Length of the stimulus sub-cycle
    pub sample_window: u32,
    /// Stimulus-to-pulse-pattern mapping
    pub pulse_mapping: PulseMapping,
}

/// Number of bytes a [`FieldHeader`] occupies on the wire
pub const HEADER_BYTES: usize = 2 + 2 + 4 + 4 + 1 + 1 + 2 + 2 + 2 + 2 + 1 + 1 + 4 + 4 + 1;

impl FieldHeader {
    /// Serialize into the fixed little-endian layout
    pub fn encode(&self) -> [u8; HEADER_BYTES] {
        let mut buf = [0u8; HEADER_BYTES];
        let mut at = 0usize;

        macro_rules! put {
            ($bytes:expr) => {{
                let b = $bytes;
                buf[at..at + b.len()].copy_from_slice(&b);
                at += b.len();
            }};
        }

        put!(self.width.to_le_bytes());
        put!(self.height.to_le_bytes());
        put!(self.ticks_count.to_le_bytes());
        put!(self.evol_step.to_le_bytes());
        put!(self.pulse_window.to_le_bytes());
        put!(self.nh_radius.to_le_bytes());
        put!(self.fire_threshold.to_le_bytes());
        put!(self.recovery_value.to_le_bytes());
        put!(self.exc_value.to_le_bytes());
        put!(self.decay_value.to_le_bytes());
        put!(self.syngen_pulses_count.to_le_bytes());
        put!(self.max_syn_count.to_le_bytes());
        put!(self.inhexc_ratio.to_le_bytes());
        put!(self.sample_window.to_le_bytes());
        put!([self.pulse_mapping.to_u8()]);

        debug_assert_eq!(at, HEADER_BYTES);
        buf
    }

    /// Parse from the fixed little-endian layout. `bytes` must be at least
    /// [`HEADER_BYTES`] long.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut at = 0usize;

        macro_rules! take {
            ($ty:ty) => {{
                const N: usize = std::mem::size_of::<$ty>();
                let mut arr = [0u8; N];
                arr.copy_from_slice(&bytes[at..at + N]);
                at += N;
                <$ty>::from_le_bytes(arr)
            }};
        }

        let width = take!(u16);
        let height = take!(u16);
        let ticks_count = take!(u32);
        let evol_step = take!(u32);
        let pulse_window = take!(u8);
        let nh_radius = take!(u8);
        let fire_threshold = take!(i16);
        let recovery_value = take!(i16);
        let exc_value = take!(i16);
        let decay_value = take!(i16);
        let syngen_pulses_count = take!(u8);
        let max_syn_count = take!(u8);
        let inhexc_ratio = take!(u32);
        let sample_window = take!(u32);
        let pulse_mapping = PulseMapping::from_u8(bytes[at]);

        Self {
            width,
            height,
            ticks_count,
            evol_step,
            pulse_window,
            nh_radius,
            fire_threshold,
            recovery_value,
            exc_value,
            decay_value,
            syngen_pulses_count,
            max_syn_count,
            inhexc_ratio,
            sample_window,
            pulse_mapping,
        }
    }
}

/// On-disk representation of a single neuron: `synac_mask, synex_mask,
/// value, pulse_mask, pulse, syn_count`, in that exact order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeuronRecord {
    /// Incoming-synapse activity bitmask
    pub synac_mask: u32,
    /// Excitatory/inhibitory label bitmask
    pub synex_mask: u32,
    /// Membrane potential
    pub value: i16,
    /// Recent-firing shift register
    pub pulse_mask: u32,
    /// Active pulse count within the window
    pub pulse: u8,
    /// Active synapse count (popcount of `synac_mask`)
    pub syn_count: u8,
}

/// Number of bytes a [`NeuronRecord`] occupies on the wire
pub const NEURON_RECORD_BYTES: usize = 4 + 4 + 2 + 4 + 1 + 1;

impl NeuronRecord {
    /// Serialize into the fixed little-endian layout
    pub fn encode(&self) -> [u8; NEURON_RECORD_BYTES] {
        let mut buf = [0u8; NEURON_RECORD_BYTES];
        let mut at = 0usize;

        macro_rules! put {
            ($bytes:expr) => {{
                let b = $bytes;
                buf[at..at + b.len()].copy_from_slice(&b);
                at += b.len();
            }};
        }

        put!(self.synac_mask.to_le_bytes());
        put!(self.synex_mask.to_le_bytes());
        put!(self.value.to_le_bytes());
        put!(self.pulse_mask.to_le_bytes());
        put!([self.pulse]);
        put!([self.syn_count]);

        debug_assert_eq!(at, NEURON_RECORD_BYTES);
        buf
    }

    /// Parse from the fixed little-endian layout. `bytes` must be at least
    /// [`NEURON_RECORD_BYTES`] long.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut at = 0usize;

        macro_rules! take {
            ($ty:ty) => {{
                const N: usize = std::mem::size_of::<$ty>();
                let mut arr = [0u8; N];
                arr.copy_from_slice(&bytes[at..at + N]);
                at += N;
                <$ty>::from_le_bytes(arr)
            }};
        }

        let synac_mask = take!(u32);
        let synex_mask = take!(u32);
        let value = take!(i16);
        let pulse_mask = take!(u32);
        let pulse = bytes[at];
        at += 1;
        let syn_count = bytes[at];

        Self {
            synac_mask,
            synex_mask,
            value,
            pulse_mask,
            pulse,
            syn_count,
        }
    }
}
