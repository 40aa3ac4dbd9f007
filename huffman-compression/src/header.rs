use std::io::{self, Read, Write};

use bit_vec::BitVec;

use crate::{
    code_table::CodeTable,
    error::{read_field, FormatError, Result},
};

const MAX_DISTINCT_SYMBOLS: u16 = 256;

/// Table section of an archive.
///
/// ```text
/// u32 LE  total symbols in the original input
/// u16 LE  number of code entries
/// entry*  u8 symbol, u8 code length, ceil(length / 8) bytes of code bits
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    total_symbols: u32,
    codes: CodeTable,
}

impl Header {
    pub fn new(total_symbols: u32, codes: CodeTable) -> Self {
        Self {
            total_symbols,
            codes,
        }
    }

    pub fn total_symbols(&self) -> u32 {
        self.total_symbols
    }

    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let distinct = u16::try_from(self.codes.len())
            .ok()
            .filter(|&distinct| distinct <= MAX_DISTINCT_SYMBOLS)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("cannot store {} codes in one archive", self.codes.len()),
                )
            })?;

        writer.write_all(&self.total_symbols.to_le_bytes())?;
        writer.write_all(&distinct.to_le_bytes())?;

        for (symbol, code) in self.codes.iter() {
            let length = u8::try_from(code.len()).map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("code for symbol {symbol} is {} bits long", code.len()),
                )
            })?;
            writer.write_all(&[symbol, length])?;
            writer.write_all(&code.to_bytes())?;
        }
        Ok(())
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut total = [0; 4];
        read_field(reader, &mut total, "symbol total")?;
        let total_symbols = u32::from_le_bytes(total);

        let mut distinct = Vec::with_capacity(2);
        reader.by_ref().take(2).read_to_end(&mut distinct)?;
        let distinct = match distinct[..] {
            // an empty input may be stored as the symbol total alone
            [] if total_symbols == 0 => return Ok(Self::default()),
            [low, high] => u16::from_le_bytes([low, high]),
            _ => return Err(FormatError::Truncated("distinct symbol count").into()),
        };

        if distinct > MAX_DISTINCT_SYMBOLS {
            return Err(FormatError::TooManySymbols(distinct).into());
        }
        if (total_symbols == 0) != (distinct == 0) {
            return Err(FormatError::CountMismatch {
                total: total_symbols,
                distinct,
            }
            .into());
        }

        let mut codes = CodeTable::default();
        for _ in 0..distinct {
            let mut entry = [0; 2];
            read_field(reader, &mut entry, "code entry")?;
            let [symbol, length] = entry;
            if length == 0 {
                return Err(FormatError::EmptyCode(symbol).into());
            }

            let length = usize::from(length);
            let mut packed = vec![0; length.div_ceil(8)];
            read_field(reader, &mut packed, "code bits")?;

            let mut code = BitVec::from_bytes(&packed);
            code.truncate(length);
            codes.insert(symbol, code)?;
        }

        Ok(Self::new(total_symbols, codes))
    }
}
