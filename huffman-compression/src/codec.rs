use std::io::{self, Read, Write};

use crate::{
    bits::{BitReader, BitWriter},
    code_table::{CodeTable, DecodingTree},
    error::{Error, FormatError, Result},
    frequency::FrequencyTable,
    header::Header,
};

/// What went into (or came out of) one archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveStats {
    pub total_symbols: u32,
    pub distinct_symbols: usize,
    pub payload_bits: u64,
}

impl ArchiveStats {
    pub fn payload_bytes(&self) -> u64 {
        self.payload_bits.div_ceil(8)
    }
}

pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    let mut archive = Vec::new();
    compress_to(input, &mut archive)?;
    Ok(archive)
}

pub fn decompress(archive: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decompress_from(archive, &mut output)?;
    Ok(output)
}

/// Writes the table section followed by the bit-packed payload.
pub fn compress_to<W: Write>(input: &[u8], mut writer: W) -> Result<ArchiveStats> {
    let total_symbols =
        u32::try_from(input.len()).map_err(|_| Error::InputTooLarge(input.len()))?;

    let frequencies = FrequencyTable::from_bytes(input);
    let header = Header::new(total_symbols, CodeTable::from_frequencies(&frequencies));
    header.write(&mut writer)?;

    let mut payload = BitWriter::new(&mut writer);
    for &byte in input {
        let code = header.codes().get(byte).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("no code was generated for byte {byte}"),
            )
        })?;
        payload.write_code(code)?;
    }
    let payload_bits = payload.bits_written();
    payload.finish()?;

    Ok(ArchiveStats {
        total_symbols,
        distinct_symbols: header.codes().len(),
        payload_bits,
    })
}

/// Decodes exactly as many symbols as the header declares. Running out of
/// payload first, or finding whole bytes after the last symbol, is an error.
pub fn decompress_from<R: Read, W: Write>(mut reader: R, mut writer: W) -> Result<ArchiveStats> {
    let header = Header::read(&mut reader)?;
    let tree = DecodingTree::from_codes(header.codes())?;

    let mut walker = tree.walker();
    let mut payload = BitReader::new(reader);
    let mut remaining = header.total_symbols();
    let mut payload_bits = 0;

    while remaining > 0 {
        let bit = payload
            .read_bit()?
            .ok_or(FormatError::Truncated("payload"))?;
        payload_bits += 1;

        if let Some(symbol) = walker.step(bit)? {
            writer.write_all(&[symbol])?;
            remaining -= 1;
        }
    }

    if payload.has_remaining_bytes()? {
        return Err(FormatError::TrailingBytes.into());
    }
    writer.flush()?;

    Ok(ArchiveStats {
        total_symbols: header.total_symbols(),
        distinct_symbols: header.codes().len(),
        payload_bits,
    })
}
