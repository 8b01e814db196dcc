//! Fixed-layout binary snapshot codec for 2D spiking neural fields.
//!
//! This crate knows nothing about field dynamics. It reads and writes the
//! scalar header and the per-neuron record array in one fixed byte order,
//! with no magic number, no version field, and no checksum — a snapshot is
//! only portable between two builds that agree on this layout.

mod codec;
mod error;
mod schema;

pub use codec::{read_from_path, read_snapshot, write_snapshot, write_to_path};
pub use error::{Result, StorageError};
pub use schema::{FieldHeader, NeuronRecord, PulseMapping, HEADER_BYTES, NEURON_RECORD_BYTES};
