const ALPHABET_SIZE: usize = 256;

/// Occurrence count of every byte value in an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
    total: u64,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self {
            counts: [0; ALPHABET_SIZE],
            total: 0,
        }
    }
}

impl FrequencyTable {
    pub fn from_bytes(content: &[u8]) -> Self {
        let mut table = Self::default();
        for &byte in content {
            table.counts[usize::from(byte)] += 1;
        }
        table.total = content.len() as u64;
        table
    }

    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[usize::from(symbol)]
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn distinct(&self) -> usize {
        self.iter().count()
    }

    /// Symbols that occur at least once, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        (0..=u8::MAX)
            .map(|symbol| (symbol, self.count(symbol)))
            .filter(|&(_, count)| count > 0)
    }
}

impl FromIterator<(u8, u64)> for FrequencyTable {
    fn from_iter<T: IntoIterator<Item = (u8, u64)>>(iter: T) -> Self {
        let mut table = Self::default();
        for (symbol, count) in iter {
            table.counts[usize::from(symbol)] += count;
            table.total += count;
        }
        table
    }
}
