//! k-mer position index / "AGCT tree" (`spec.md` §4.C4).
//!
//! A complete 4-ary trie of fixed depth `H`, built once before encoding
//! starts. Internal nodes remember only the first position that ever
//! passed through them ("first witness"); leaves (depth `H`) accumulate
//! every position. This is realization (ii) from `spec.md` §3, matching
//! `examples/original_source/biocompress_1/AGCT_tree.py`'s
//! `createPositions`.

use crate::base::Base;

fn base_index(b: Base) -> usize {
    match b {
        Base::A => 0,
        Base::C => 1,
        Base::T => 2,
        Base::G => 3,
    }
}

struct Node {
    depth: usize,
    positions: Vec<usize>,
    children: Option<Box<[Node; 4]>>,
}

impl Node {
    fn build(depth: usize, height: usize) -> Self {
        let children = if depth < height {
            Some(Box::new([
                Node::build(depth + 1, height),
                Node::build(depth + 1, height),
                Node::build(depth + 1, height),
                Node::build(depth + 1, height),
            ]))
        } else {
            None
        };
        Node { depth, positions: Vec::new(), children }
    }
}

/// Fixed-depth 4-ary trie over {A,C,T,G} windows, mapping each recorded
/// prefix to the positions at which it has been seen.
pub struct KmerIndex {
    root: Node,
    height: usize,
}

impl KmerIndex {
    pub fn new(height: usize) -> Self {
        Self { root: Node::build(0, height), height }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Insert the window `seq[pos..pos+height)` (truncated at the end of
    /// `seq` if necessary) under `pos`. Called exactly once per matcher
    /// invocation, using the actual window at that position, regardless of
    /// what candidate the matcher chose (`spec.md` §4.C5 step 7).
    pub fn insert(&mut self, seq: &[Base], pos: usize) {
        let end = (pos + self.height).min(seq.len());
        let window = &seq[pos..end];
        let mut node = &mut self.root;
        for (i, &base) in window.iter().enumerate() {
            let children = match &mut node.children {
                Some(children) => children,
                None => return,
            };
            let child = &mut children[base_index(base)];
            let is_leaf = child.depth == self.height;
            if is_leaf || child.positions.is_empty() {
                child.positions.push(pos);
            }
            node = child;
        }
    }

    /// Longest-prefix-seen lookup (`spec.md` §4.C4 Lookup). Returns the
    /// deepest matching node's positions and depth, or `None` if no prefix
    /// of `query` has ever been recorded.
    pub fn lookup(&self, query: &[Base]) -> Option<(&[usize], usize)> {
        let steps = self.height.min(query.len());
        let mut node = &self.root;
        let mut last: Option<(&[usize], usize)> = None;
        for base in query.iter().take(steps) {
            let children = match &node.children {
                Some(children) => children,
                None => break,
            };
            let child = &children[base_index(*base)];
            if child.positions.is_empty() {
                break;
            }
            last = Some((&child.positions, child.depth));
            node = child;
        }
        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Base::*;

    #[test]
    fn empty_tree_matches_nothing() {
        let tree = KmerIndex::new(3);
        assert!(tree.lookup(&[A, C, G]).is_none());
    }

    #[test]
    fn insert_then_full_depth_lookup() {
        let seq = [A, C, G, T];
        let mut tree = KmerIndex::new(3);
        tree.insert(&seq, 0);
        let (positions, depth) = tree.lookup(&[A, C, G]).unwrap();
        assert_eq!(depth, 3);
        assert_eq!(positions, &[0]);
    }

    #[test]
    fn ancestor_witness_is_first_position_only() {
        let seq = [A, C, G, T, A, C, T, A];
        let mut tree = KmerIndex::new(3);
        // insert ACG at 0 and ACT at 4: both share the "A" and "AC" prefixes
        tree.insert(&seq, 0);
        tree.insert(&seq, 4);
        // a query that only matches to depth 1 ("A...") should report the
        // first witness (position 0), not the later one.
        let (positions, depth) = tree.lookup(&[A, G, G]).unwrap();
        assert_eq!(depth, 1);
        assert_eq!(positions, &[0]);
    }

    #[test]
    fn leaf_accumulates_every_occurrence() {
        let seq = [A, C, G, A, A, C, G, T];
        let mut tree = KmerIndex::new(3);
        tree.insert(&seq, 0); // ACG
        tree.insert(&seq, 4); // ACG again
        let (positions, depth) = tree.lookup(&[A, C, G]).unwrap();
        assert_eq!(depth, 3);
        assert_eq!(positions, &[0, 4]);
    }

    #[test]
    fn truncated_window_near_end_of_input_does_not_panic() {
        let seq = [A, C];
        let mut tree = KmerIndex::new(3);
        tree.insert(&seq, 0); // window would run past the end, stop early
        let (positions, depth) = tree.lookup(&[A, C]).unwrap();
        assert_eq!(depth, 2);
        assert_eq!(positions, &[0]);
    }
}
