//! Read/write a full snapshot (header + neuron array) to any `Read`/`Write`
//! stream, and convenience wrappers over file paths.

use std::io::{Read, Write};
use std::path::Path;

use crate::error::{Result, StorageError};
use crate::schema::{FieldHeader, NeuronRecord, HEADER_BYTES, NEURON_RECORD_BYTES};

/// Write a header followed by its neuron records to `writer`, in binary
/// layout order, with no magic number, version, or checksum.
pub fn write_snapshot<W: Write>(
    writer: &mut W,
    header: &FieldHeader,
    neurons: &[NeuronRecord],
) -> Result<()> {
    writer.write_all(&header.encode())?;
    for neuron in neurons {
        writer.write_all(&neuron.encode())?;
    }
    Ok(())
}

/// Read a header and its neuron records from `reader`. The number of
/// records consumed is `header.width as usize * header.height as usize`;
/// a mismatch between that count and what the stream actually holds
/// surfaces as [`StorageError::SizeMismatch`] rather than silently
/// truncating.
pub fn read_snapshot<R: Read>(reader: &mut R) -> Result<(FieldHeader, Vec<NeuronRecord>)> {
    let mut header_buf = [0u8; HEADER_BYTES];
    read_exact_checked(reader, &mut header_buf)?;
    let header = FieldHeader::decode(&header_buf);

    let expected = header.width as usize * header.height as usize;
    let mut neurons = Vec::with_capacity(expected);
    let mut record_buf = [0u8; NEURON_RECORD_BYTES];

    for _ in 0..expected {
        match read_exact_or_eof(reader, &mut record_buf)? {
            true => neurons.push(NeuronRecord::decode(&record_buf)),
            false => break,
        }
    }

    if neurons.len() != expected {
        return Err(StorageError::size_mismatch(expected, neurons.len()));
    }

    Ok((header, neurons))
}

/// Write a snapshot to a file, truncating any existing contents.
pub fn write_to_path<P: AsRef<Path>>(
    path: P,
    header: &FieldHeader,
    neurons: &[NeuronRecord],
) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    write_snapshot(&mut writer, header, neurons)?;
    writer.flush()?;
    Ok(())
}

/// Read a snapshot from a file.
pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<(FieldHeader, Vec<NeuronRecord>)> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    read_snapshot(&mut reader)
}

fn read_exact_checked<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0usize;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            return Err(StorageError::short_read(buf.len(), filled));
        }
        filled += n;
    }
    Ok(())
}

/// Like [`read_exact_checked`] but treats an immediate EOF (zero bytes
/// filled) as a clean end of the neuron array rather than an error, so the
/// caller can tell "stream ended exactly on a record boundary, too few
/// records" apart from "stream ended mid-record".
fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<bool> {
    let mut filled = 0usize;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(false);
            }
            return Err(StorageError::short_read(buf.len(), filled));
        }
        filled += n;
    }
    Ok(true)
}
