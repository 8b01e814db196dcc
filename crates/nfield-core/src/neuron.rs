//! A single cell in the field grid.

use nfield_storage::NeuronRecord;

/// One neuron's full mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neuron {
    /// Membrane potential
    pub value: i16,
    /// Recent-firing shift register, one bit per tick in the pulse window
    pub pulse_mask: u32,
    /// Popcount of `pulse_mask` restricted to the active window
    pub pulse: u8,
    /// Bitmask of neighbor positions with an active incoming synapse
    pub synac_mask: u32,
    /// Excitatory (1) / inhibitory (0) label for each bit in `synac_mask`
    pub synex_mask: u32,
    /// Popcount of `synac_mask`
    pub syn_count: u8,
}

impl Neuron {
    /// A quiescent neuron with no synapses and no firing history
    pub fn new() -> Self {
        Self {
            value: 0,
            pulse_mask: 0,
            pulse: 0,
            synac_mask: 0,
            synex_mask: 0,
            syn_count: 0,
        }
    }

    pub(crate) fn to_record(self) -> NeuronRecord {
        NeuronRecord {
            synac_mask: self.synac_mask,
            synex_mask: self.synex_mask,
            value: self.value,
            pulse_mask: self.pulse_mask,
            pulse: self.pulse,
            syn_count: self.syn_count,
        }
    }

    pub(crate) fn from_record(record: &NeuronRecord) -> Self {
        Self {
            value: record.value,
            pulse_mask: record.pulse_mask,
            pulse: record.pulse,
            synac_mask: record.synac_mask,
            synex_mask: record.synex_mask,
            syn_count: record.syn_count,
        }
    }
}

impl Default for Neuron {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_roundtrip() {
        let neuron = Neuron {
            value: -12,
            pulse_mask: 0xABCD,
            pulse: 4,
            synac_mask: 0x0F0F,
            synex_mask: 0x00FF,
            syn_count: 6,
        };
        let record = neuron.to_record();
        let back = Neuron::from_record(&record);
        assert_eq!(neuron, back);
    }
}
