use std::collections::BTreeMap;

use bit_vec::BitVec;
use itertools::Itertools;

use crate::{error::FormatError, frequency::FrequencyTable, tree::HuffmanTree};

/// Prefix-free code per symbol, ordered by symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable(BTreeMap<u8, BitVec>);

impl CodeTable {
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Self {
        HuffmanTree::from_frequencies(frequencies)
            .map(|tree| Self::from_tree(&tree))
            .unwrap_or_default()
    }

    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut result = BTreeMap::new();
        let mut code = BitVec::new();
        // a lone leaf has no path, give it a one bit code instead
        if let HuffmanTree::Leaf { .. } = tree {
            code.push(false);
        }
        generate_codes_inner(tree, &mut code, &mut result);
        Self(result)
    }

    /// Adds a code read back from an archive.
    pub fn insert(&mut self, symbol: u8, code: BitVec) -> Result<(), FormatError> {
        if code.is_empty() {
            return Err(FormatError::EmptyCode(symbol));
        }
        if self.0.contains_key(&symbol) {
            return Err(FormatError::DuplicateSymbol(symbol));
        }
        self.0.insert(symbol, code);
        Ok(())
    }

    pub fn get(&self, symbol: u8) -> Option<&BitVec> {
        self.0.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitVec)> {
        self.0.iter().map(|(&symbol, code)| (symbol, code))
    }

    /// Sum of frequency times code length over every symbol in the table.
    pub fn weighted_path_length(&self, frequencies: &FrequencyTable) -> u64 {
        self.iter()
            .map(|(symbol, code)| frequencies.count(symbol) * code.len() as u64)
            .sum()
    }
}

fn generate_codes_inner(
    tree: &HuffmanTree,
    current_code: &mut BitVec,
    result: &mut BTreeMap<u8, BitVec>,
) {
    match tree {
        HuffmanTree::Leaf { symbol, .. } => {
            result.insert(*symbol, current_code.clone());
        }
        HuffmanTree::Node { left, right, .. } => {
            current_code.push(false);
            generate_codes_inner(left, current_code, result);
            current_code.pop();

            current_code.push(true);
            generate_codes_inner(right, current_code, result);
            current_code.pop();
        }
    }
}

#[derive(Debug)]
enum DecodeNode {
    Leaf(u8),
    Branch(Branch),
}

#[derive(Debug, Default)]
struct Branch {
    left: Option<Box<DecodeNode>>,
    right: Option<Box<DecodeNode>>,
}

impl Branch {
    fn child(&self, bit: bool) -> Option<&DecodeNode> {
        if bit {
            self.right.as_deref()
        } else {
            self.left.as_deref()
        }
    }

    fn child_mut(&mut self, bit: bool) -> &mut Option<Box<DecodeNode>> {
        if bit {
            &mut self.right
        } else {
            &mut self.left
        }
    }
}

/// Tree rebuilt from the codes stored in an archive. Branches are created on
/// demand, so an incomplete code set leaves some children empty.
#[derive(Debug, Default)]
pub struct DecodingTree {
    root: Branch,
}

impl DecodingTree {
    pub fn from_codes(codes: &CodeTable) -> Result<Self, FormatError> {
        let mut tree = Self::default();
        for (symbol, code) in codes.iter() {
            let bits = code.iter().collect_vec();
            insert(&mut tree.root, &bits, symbol)?;
        }
        Ok(tree)
    }

    pub fn walker(&self) -> Walker<'_> {
        Walker {
            root: &self.root,
            current: &self.root,
        }
    }
}

fn insert(branch: &mut Branch, bits: &[bool], symbol: u8) -> Result<(), FormatError> {
    let Some((&bit, rest)) = bits.split_first() else {
        return Err(FormatError::EmptyCode(symbol));
    };
    let slot = branch.child_mut(bit);

    if rest.is_empty() {
        if slot.is_some() {
            return Err(FormatError::CodeCollision(symbol));
        }
        *slot = Some(Box::new(DecodeNode::Leaf(symbol)));
        return Ok(());
    }

    match &mut **slot.get_or_insert_with(|| Box::new(DecodeNode::Branch(Branch::default()))) {
        DecodeNode::Branch(next) => insert(next, rest, symbol),
        DecodeNode::Leaf(_) => Err(FormatError::CodeCollision(symbol)),
    }
}

/// Walks a [`DecodingTree`] one bit at a time, returning to the root after
/// every decoded symbol.
#[derive(Debug)]
pub struct Walker<'a> {
    root: &'a Branch,
    current: &'a Branch,
}

impl Walker<'_> {
    /// Follows one bit, 0 goes left and 1 goes right. Yields the symbol when
    /// the bit lands on a leaf.
    pub fn step(&mut self, bit: bool) -> Result<Option<u8>, FormatError> {
        match self.current.child(bit) {
            Some(DecodeNode::Leaf(symbol)) => {
                self.current = self.root;
                Ok(Some(*symbol))
            }
            Some(DecodeNode::Branch(next)) => {
                self.current = next;
                Ok(None)
            }
            None => Err(FormatError::UnassignedCode),
        }
    }
}

#[cfg(test)]
mod tests {
    use bit_vec::BitVec;
    use itertools::Itertools;

    use super::{CodeTable, DecodingTree};
    use crate::{error::FormatError, frequency::FrequencyTable, tree::HuffmanTree};

    fn bits(code: &str) -> BitVec {
        code.chars().map(|ch| ch == '1').collect()
    }

    fn decode_all(tree: &DecodingTree, code: &str) -> Result<Vec<u8>, FormatError> {
        let mut walker = tree.walker();
        let mut symbols = vec![];
        for bit in bits(code).iter() {
            if let Some(symbol) = walker.step(bit)? {
                symbols.push(symbol);
            }
        }
        Ok(symbols)
    }

    #[test]
    fn test_code_generation() {
        // symbol weights come from
        // https://opendsa-server.cs.vt.edu/ODSA/Books/CS3/html/Huffman.html
        let weights = [
            (b'C', 32),
            (b'D', 42),
            (b'E', 120),
            (b'K', 7),
            (b'L', 42),
            (b'M', 24),
            (b'U', 37),
            (b'Z', 2),
        ];

        let tree = HuffmanTree::new(weights).unwrap();
        let codes = CodeTable::from_tree(&tree);
        let expected_codes = [
            (b'C', "1110"),
            (b'D', "101"),
            (b'E', "0"),
            (b'K', "111101"),
            (b'L', "110"),
            (b'M', "11111"),
            (b'U', "100"),
            (b'Z', "111100"),
        ];

        assert_eq!(codes.len(), expected_codes.len());
        for (symbol, expected_code) in expected_codes {
            assert_eq!(codes.get(symbol), Some(&bits(expected_code)));
        }

        let frequencies = FrequencyTable::from_iter(weights);
        assert_eq!(codes.weighted_path_length(&frequencies), 785);
    }

    #[test]
    fn test_codes_are_prefix_free() {
        let frequencies = FrequencyTable::from_bytes(b"the quick brown fox jumps over the lazy dog");
        let codes = CodeTable::from_frequencies(&frequencies);
        let codes = codes.iter().collect_vec();

        for (a, b) in codes.iter().tuple_combinations() {
            let (shorter, longer) = if a.1.len() <= b.1.len() { (a, b) } else { (b, a) };
            let is_prefix = shorter.1.iter().zip(longer.1.iter()).all(|(x, y)| x == y);
            assert!(
                !is_prefix,
                "code of {} is a prefix of the code of {}",
                shorter.0, longer.0
            );
        }
    }

    #[test]
    fn test_single_symbol_gets_one_bit_code() {
        let codes = CodeTable::from_frequencies(&FrequencyTable::from_bytes(b"aaaa"));

        assert_eq!(codes.iter().collect_vec(), vec![(b'a', &bits("0"))]);
    }

    #[test]
    fn test_no_symbols_give_an_empty_table() {
        let codes = CodeTable::from_frequencies(&FrequencyTable::default());

        assert!(codes.is_empty());
    }

    #[test]
    fn test_rebuilt_tree_decodes_symbols() {
        let mut codes = CodeTable::default();
        codes.insert(b'a', bits("0")).unwrap();
        codes.insert(b'b', bits("10")).unwrap();
        codes.insert(b'c', bits("11")).unwrap();

        let tree = DecodingTree::from_codes(&codes).unwrap();

        assert_eq!(decode_all(&tree, "0101100").unwrap(), b"abcaa".to_vec());
    }

    #[test]
    fn test_walk_into_unassigned_branch_fails() {
        let mut codes = CodeTable::default();
        codes.insert(b'a', bits("0")).unwrap();

        let tree = DecodingTree::from_codes(&codes).unwrap();

        assert_eq!(decode_all(&tree, "001"), Err(FormatError::UnassignedCode));
    }

    #[test]
    fn test_identical_codes_collide() {
        let mut codes = CodeTable::default();
        codes.insert(b'a', bits("01")).unwrap();
        codes.insert(b'b', bits("01")).unwrap();

        assert_eq!(
            DecodingTree::from_codes(&codes).unwrap_err(),
            FormatError::CodeCollision(b'b')
        );
    }

    #[test]
    fn test_code_passing_through_a_leaf_collides() {
        let mut codes = CodeTable::default();
        codes.insert(b'a', bits("0")).unwrap();
        codes.insert(b'b', bits("01")).unwrap();

        assert_eq!(
            DecodingTree::from_codes(&codes).unwrap_err(),
            FormatError::CodeCollision(b'b')
        );
    }

    #[test]
    fn test_code_ending_on_a_branch_collides() {
        let mut codes = CodeTable::default();
        codes.insert(b'a', bits("10")).unwrap();
        codes.insert(b'b', bits("1")).unwrap();

        assert_eq!(
            DecodingTree::from_codes(&codes).unwrap_err(),
            FormatError::CodeCollision(b'b')
        );
    }

    #[test]
    fn test_insert_rejects_bad_entries() {
        let mut codes = CodeTable::default();

        assert_eq!(
            codes.insert(b'a', BitVec::new()),
            Err(FormatError::EmptyCode(b'a'))
        );
        codes.insert(b'a', bits("0")).unwrap();
        assert_eq!(
            codes.insert(b'a', bits("1")),
            Err(FormatError::DuplicateSymbol(b'a'))
        );
    }
}
