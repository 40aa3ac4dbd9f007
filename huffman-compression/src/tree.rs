use std::cmp::Ordering;

use itertools::Itertools;

use crate::frequency::FrequencyTable;

/// Huffman tree built from symbol frequencies. Internal nodes always own
/// exactly two children, so every leaf sits at the end of a unique path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanTree {
    Leaf {
        symbol: u8,
        weight: u64,
    },
    Node {
        weight: u64,
        left: Box<HuffmanTree>,
        right: Box<HuffmanTree>,
    },
}

impl From<(u8, u64)> for HuffmanTree {
    fn from((symbol, weight): (u8, u64)) -> Self {
        HuffmanTree::Leaf { symbol, weight }
    }
}

impl HuffmanTree {
    /// Returns `None` when no symbol has a non-zero weight.
    pub fn new(values: impl IntoIterator<Item = (u8, u64)>) -> Option<Self> {
        let trees = Trees::from_iter(
            values
                .into_iter()
                .filter(|&(_, weight)| weight > 0)
                .map_into(),
        );
        trees.merge()
    }

    pub fn from_frequencies(frequencies: &FrequencyTable) -> Option<Self> {
        Self::new(frequencies.iter())
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffmanTree::Leaf { weight, .. } | HuffmanTree::Node { weight, .. } => *weight,
        }
    }

    fn merge(left: HuffmanTree, right: HuffmanTree) -> Self {
        HuffmanTree::Node {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// A tree waiting in the queue. `order` is the enqueue position and breaks
/// ties between equal weights, earliest first.
#[derive(Debug)]
struct Queued {
    order: usize,
    tree: HuffmanTree,
}

fn cmp_queued_desc(a: &Queued, b: &Queued) -> Ordering {
    (b.tree.weight(), b.order).cmp(&(a.tree.weight(), a.order))
}

/// Min-priority queue kept as a vector sorted from heaviest to lightest, so the
/// lightest tree is always popped from the back.
struct Trees {
    queue: Vec<Queued>,
    next_order: usize,
}

impl FromIterator<HuffmanTree> for Trees {
    fn from_iter<T: IntoIterator<Item = HuffmanTree>>(iter: T) -> Self {
        let queue = iter
            .into_iter()
            .enumerate()
            .map(|(order, tree)| Queued { order, tree })
            .sorted_by(cmp_queued_desc)
            .collect_vec();
        let next_order = queue.len();

        Self { queue, next_order }
    }
}

impl Trees {
    fn merge(mut self) -> Option<HuffmanTree> {
        loop {
            let result = self.pop_lowest()?;
            match result {
                PopResult::TreesToMerge { left, right } => {
                    self.insert(HuffmanTree::merge(left, right));
                }
                PopResult::Single(tree) => {
                    return Some(tree);
                }
            }
        }
    }

    fn pop_lowest(&mut self) -> Option<PopResult> {
        let left = self.queue.pop()?.tree;

        let item_result = match self.queue.pop() {
            Some(right) => PopResult::TreesToMerge {
                left,
                right: right.tree,
            },
            None => PopResult::Single(left),
        };

        Some(item_result)
    }

    fn insert(&mut self, tree: HuffmanTree) {
        self.queue.push(Queued {
            order: self.next_order,
            tree,
        });
        self.next_order += 1;
        self.queue.sort_unstable_by(cmp_queued_desc);
    }
}

enum PopResult {
    TreesToMerge {
        left: HuffmanTree,
        right: HuffmanTree,
    },
    Single(HuffmanTree),
}
