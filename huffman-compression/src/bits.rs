use std::io::{self, Read, Write};

use bit_vec::BitVec;

const BITS_PER_BYTE: u8 = 8;

/// Packs bits most-significant-first into bytes, flushing every full byte to
/// the inner writer.
#[derive(Debug)]
pub struct BitWriter<W> {
    inner: W,
    byte: u8,
    filled: u8,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            byte: 0,
            filled: 0,
            bits_written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.byte |= u8::from(bit) << (BITS_PER_BYTE - 1 - self.filled);
        self.filled += 1;
        self.bits_written += 1;

        if self.filled == BITS_PER_BYTE {
            self.inner.write_all(&[self.byte])?;
            self.byte = 0;
            self.filled = 0;
        }
        Ok(())
    }

    pub fn write_code(&mut self, code: &BitVec) -> io::Result<()> {
        code.iter().try_for_each(|bit| self.write_bit(bit))
    }

    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Zero pads the last partial byte, writes it and hands back the writer.
    pub fn finish(mut self) -> io::Result<W> {
        if self.filled > 0 {
            self.inner.write_all(&[self.byte])?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Yields the bits of a byte stream most-significant-first.
#[derive(Debug)]
pub struct BitReader<R> {
    inner: R,
    byte: u8,
    remaining: u8,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            byte: 0,
            remaining: 0,
        }
    }

    /// Returns `None` once the inner reader is exhausted.
    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        if self.remaining == 0 {
            match read_byte(&mut self.inner)? {
                Some(byte) => {
                    self.byte = byte;
                    self.remaining = BITS_PER_BYTE;
                }
                None => return Ok(None),
            }
        }

        self.remaining -= 1;
        Ok(Some(self.byte & (1 << self.remaining) != 0))
    }

    /// Drops whatever is left of the current byte and reports whether the
    /// inner reader still holds more bytes.
    pub fn has_remaining_bytes(&mut self) -> io::Result<bool> {
        self.remaining = 0;
        Ok(read_byte(&mut self.inner)?.is_some())
    }
}

fn read_byte<R: Read>(reader: &mut R) -> io::Result<Option<u8>> {
    let mut buffer = [0; 1];
    loop {
        match reader.read(&mut buffer) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buffer[0])),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use bit_vec::BitVec;
    use rstest::rstest;

    use super::{BitReader, BitWriter};

    fn bits(code: &str) -> BitVec {
        code.chars().map(|ch| ch == '1').collect()
    }

    #[rstest]
    #[case("", vec![])]
    #[case("1", vec![0b1000_0000])]
    #[case("10110", vec![0b1011_0000])]
    #[case("10000001", vec![0b1000_0001])]
    #[case("111111111", vec![0xff, 0b1000_0000])]
    #[case("0000000000000001", vec![0x00, 0x01])]
    fn test_packing_msb_first_with_zero_padding(#[case] code: &str, #[case] expected: Vec<u8>) {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_code(&bits(code)).unwrap();
        assert_eq!(writer.bits_written(), code.len() as u64);

        let packed = writer.finish().unwrap();
        assert_eq!(packed, expected);
    }

    #[test]
    fn test_codes_span_byte_boundaries() {
        let mut writer = BitWriter::new(Vec::new());
        for code in ["101", "11100", "0110"] {
            writer.write_code(&bits(code)).unwrap();
        }

        let packed = writer.finish().unwrap();
        assert_eq!(packed, vec![0b1011_1100, 0b0110_0000]);
    }

    #[test]
    fn test_reading_bits() {
        let mut reader = BitReader::new(&[0b1010_0001_u8, 0b1000_0000][..]);

        let mut read = String::new();
        while let Some(bit) = reader.read_bit().unwrap() {
            read.push(if bit { '1' } else { '0' });
        }
        assert_eq!(read, "1010000110000000");
    }

    #[test]
    fn test_remaining_bytes_after_partial_byte() {
        let mut reader = BitReader::new(&[0b1100_0000_u8, 0xaa][..]);
        assert_eq!(reader.read_bit().unwrap(), Some(true));
        assert!(reader.has_remaining_bytes().unwrap());

        let mut reader = BitReader::new(&[0b1100_0000_u8][..]);
        assert_eq!(reader.read_bit().unwrap(), Some(true));
        assert!(!reader.has_remaining_bytes().unwrap());
    }
}
