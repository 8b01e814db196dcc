//! Persisting a [`Field`] to and from the fixed binary layout implemented
//! by `nfield-storage`. This module is the only place `nfield-core` talks
//! to that crate's codec.

use std::path::Path;

use nfield_storage::{FieldHeader, NeuronRecord};

use crate::error::Result;
use crate::field::{Field, FieldConfig};
use crate::neuron::Neuron;

impl Field {
    fn to_header(&self) -> FieldHeader {
        FieldHeader {
            width: self.width,
            height: self.height,
            ticks_count: self.ticks_count,
            evol_step: self.evol_step,
            pulse_window: self.pulse_window,
            nh_radius: self.nh_radius,
            fire_threshold: self.fire_threshold,
            recovery_value: self.recovery_value,
            exc_value: self.exc_value,
            decay_value: self.decay_value,
            syngen_pulses_count: self.syngen_pulses_count,
            max_syn_count: self.max_syn_count,
            inhexc_ratio: self.inhexc_ratio,
            sample_window: self.sample_window,
            pulse_mapping: self.pulse_mapping,
        }
    }

    fn from_parts(header: FieldHeader, records: Vec<NeuronRecord>) -> Result<Self> {
        let config = FieldConfig::new(header.width, header.height).with_nh_radius(header.nh_radius);
        let mut field = Field::init(config)?;
        field.ticks_count = header.ticks_count;
        field.evol_step = header.evol_step;
        field.pulse_window = header.pulse_window;
        field.fire_threshold = header.fire_threshold;
        field.recovery_value = header.recovery_value;
        field.exc_value = header.exc_value;
        field.decay_value = header.decay_value;
        field.syngen_pulses_count = header.syngen_pulses_count;
        field.max_syn_count = header.max_syn_count;
        field.inhexc_ratio = header.inhexc_ratio;
        field.sample_window = header.sample_window;
        field.pulse_mapping = header.pulse_mapping;
        field.neurons = records.iter().map(Neuron::from_record).collect();
        Ok(field)
    }

    /// Write this field's full state to `path` in the fixed binary layout:
    /// header scalars followed by the neuron array, no magic number, no
    /// version, no checksum.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let header = self.to_header();
        let records: Vec<NeuronRecord> = self.neurons.iter().map(|n| n.to_record()).collect();
        nfield_storage::write_to_path(path, &header, &records)?;
        Ok(())
    }

    /// Read a field snapshot from `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let (header, records) = nfield_storage::read_from_path(path)?;
        Self::from_parts(header, records)
    }
}
