//! Suffix tree over a reference sequence, with streaming match queries.
//!
//! The tree is built once with Ukkonen's online algorithm in O(n) time and
//! space, then queried once per query suffix. A query walk follows tree edges
//! as far as the symbols match; where the walk stops determines both the match
//! length and how many times the matched string occurs in the reference
//! (stopping inside a leaf edge means exactly one occurrence).
//!
//! A sentinel byte is appended internally so that every suffix ends at a leaf.
//! The sentinel is not a valid symbol of any sequence alphabet, so query walks
//! can never consume it.

use std::collections::HashMap;

use nacre_core::{NacreError, Result};

/// Terminal symbol appended to the reference before construction.
pub const SENTINEL: u8 = b'$';

const ROOT: usize = 0;

/// Marks a leaf edge; leaf edges implicitly end at the end of the text.
const LEAF_END: usize = usize::MAX;

/// A match between a query substring and a reference substring.
///
/// `length` bytes starting at `reference_start` in the reference equal
/// `length` bytes starting at `query_start` in the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SuffixMatch {
    /// Start of the match in the reference (0-based).
    pub reference_start: usize,
    /// Start of the match in the query (0-based).
    pub query_start: usize,
    /// Match length in bases.
    pub length: usize,
}

#[derive(Debug)]
struct Node {
    /// Start of the incoming edge label in `text`.
    start: usize,
    /// One past the end of the incoming edge label, or [`LEAF_END`].
    end: usize,
    suffix_link: usize,
    children: HashMap<u8, usize>,
}

impl Node {
    fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            suffix_link: ROOT,
            children: HashMap::new(),
        }
    }

    fn is_leaf(&self) -> bool {
        self.end == LEAF_END
    }
}

/// Where a query walk stopped.
struct WalkEnd {
    /// Number of query bytes matched.
    matched: usize,
    /// One past the text index of the last matched reference byte.
    text_pos: usize,
    /// Whether the walk stopped inside a leaf edge.
    on_leaf: bool,
}

/// A suffix tree over a reference sequence.
pub struct SuffixTree {
    text: Vec<u8>,
    nodes: Vec<Node>,
}

impl SuffixTree {
    /// Build the suffix tree for `reference` using Ukkonen's algorithm.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is empty or contains the sentinel
    /// byte `$`.
    pub fn build(reference: &[u8]) -> Result<Self> {
        if reference.is_empty() {
            return Err(NacreError::InvalidInput(
                "reference sequence must not be empty".into(),
            ));
        }
        if reference.contains(&SENTINEL) {
            return Err(NacreError::InvalidInput(format!(
                "reference sequence must not contain the sentinel byte '{}'",
                SENTINEL as char
            )));
        }

        let mut text = Vec::with_capacity(reference.len() + 1);
        text.extend_from_slice(reference);
        text.push(SENTINEL);

        let mut nodes = vec![Node::new(0, 0)];

        let mut active_node = ROOT;
        let mut active_edge = 0usize;
        let mut active_length = 0usize;
        let mut remainder = 0usize;

        for pos in 0..text.len() {
            // Node created or visited last in this phase, awaiting its
            // suffix link.
            let mut need_link: Option<usize> = None;
            remainder += 1;

            while remainder > 0 {
                if active_length == 0 {
                    active_edge = pos;
                }
                let edge_byte = text[active_edge];

                match nodes[active_node].children.get(&edge_byte).copied() {
                    None => {
                        let leaf = nodes.len();
                        nodes.push(Node::new(pos, LEAF_END));
                        nodes[active_node].children.insert(edge_byte, leaf);
                        Self::set_link(&mut nodes, &mut need_link, active_node);
                    }
                    Some(next) => {
                        let span = Self::edge_span(&nodes[next], pos);
                        if active_length >= span {
                            // Walk down into the child and retry.
                            active_edge += span;
                            active_length -= span;
                            active_node = next;
                            continue;
                        }
                        if text[nodes[next].start + active_length] == text[pos] {
                            // The current symbol is already on the edge.
                            active_length += 1;
                            Self::set_link(&mut nodes, &mut need_link, active_node);
                            break;
                        }

                        // Split the edge and hang a new leaf off the split.
                        let next_start = nodes[next].start;
                        let split = nodes.len();
                        nodes.push(Node::new(next_start, next_start + active_length));
                        nodes[active_node].children.insert(edge_byte, split);

                        let leaf = nodes.len();
                        nodes.push(Node::new(pos, LEAF_END));
                        nodes[split].children.insert(text[pos], leaf);

                        nodes[next].start += active_length;
                        let next_byte = text[nodes[next].start];
                        nodes[split].children.insert(next_byte, next);

                        Self::set_link(&mut nodes, &mut need_link, split);
                    }
                }

                remainder -= 1;
                if active_node == ROOT && active_length > 0 {
                    active_length -= 1;
                    active_edge = pos - remainder + 1;
                } else if active_node != ROOT {
                    active_node = nodes[active_node].suffix_link;
                }
            }
        }

        Ok(Self { text, nodes })
    }

    fn set_link(nodes: &mut [Node], need_link: &mut Option<usize>, node: usize) {
        if let Some(n) = need_link.take() {
            if n != ROOT {
                nodes[n].suffix_link = node;
            }
        }
        *need_link = Some(node);
    }

    /// Edge label length during construction; leaf edges grow with the phase.
    fn edge_span(node: &Node, pos: usize) -> usize {
        let end = if node.is_leaf() { pos + 1 } else { node.end };
        end - node.start
    }

    /// Edge label end after construction.
    fn edge_end(&self, node: &Node) -> usize {
        if node.is_leaf() {
            self.text.len()
        } else {
            node.end
        }
    }

    /// Length of the indexed reference (without the sentinel).
    pub fn reference_len(&self) -> usize {
        self.text.len() - 1
    }

    /// Number of nodes in the tree, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Walk the tree from the root along `query[start..]`, stopping at the
    /// first mismatch or when the query is exhausted.
    ///
    /// The returned text position minus the matched length is a valid
    /// occurrence start of the matched string in the reference: every edge
    /// label position `k` at depth `d` satisfies `text[k - d .. k] ==` the
    /// path label up to `k`.
    fn walk_from(&self, query: &[u8], start: usize) -> WalkEnd {
        let mut node = ROOT;
        let mut qi = start;
        let mut matched = 0usize;
        let mut text_pos = 0usize;
        let mut on_leaf = false;

        while qi < query.len() {
            let child = match self.nodes[node].children.get(&query[qi]) {
                Some(&c) => c,
                None => break,
            };
            let child_node = &self.nodes[child];
            let end = self.edge_end(child_node);
            on_leaf = child_node.is_leaf();

            let mut k = child_node.start;
            while k < end && qi < query.len() && self.text[k] == query[qi] {
                k += 1;
                qi += 1;
                matched += 1;
            }
            text_pos = k;

            if k < end {
                // Stopped inside this edge.
                return WalkEnd {
                    matched,
                    text_pos,
                    on_leaf,
                };
            }
            // Leaf edges include the sentinel, which no query byte can
            // match, so a fully consumed edge is always internal.
            node = child;
            on_leaf = false;
        }

        WalkEnd {
            matched,
            text_pos,
            on_leaf,
        }
    }

    /// Find all maximal matches of `query` against the reference that are
    /// unique in the reference and at least `min_len` long.
    ///
    /// One walk is performed per query suffix. A candidate is kept only when
    /// the walk stops inside a leaf edge, which means the matched string has
    /// exactly one occurrence in the reference. Candidates whose query
    /// interval is contained in the previously kept match are dropped, so
    /// the output is strictly increasing in query start and never nested.
    ///
    /// `min_len` must be at least 1; a zero `min_len` yields no matches.
    /// Matches are returned in query order. An empty result is not an error.
    pub fn unique_matches(&self, query: &[u8], min_len: usize) -> Vec<SuffixMatch> {
        self.stream_matches(query, min_len, true)
    }

    /// Find all maximal matches of `query` of at least `min_len`, without
    /// requiring uniqueness in the reference.
    ///
    /// For a string with several reference occurrences the reported
    /// `reference_start` is one of them.
    pub fn maximal_matches(&self, query: &[u8], min_len: usize) -> Vec<SuffixMatch> {
        self.stream_matches(query, min_len, false)
    }

    fn stream_matches(&self, query: &[u8], min_len: usize, unique_only: bool) -> Vec<SuffixMatch> {
        let mut matches = Vec::new();
        if min_len == 0 || query.len() < min_len {
            return matches;
        }

        let mut prev_start = 0usize;
        let mut prev_end = 0usize;

        let last_start = query.len() - (min_len - 1);
        let mut i = 0usize;
        while i < last_start {
            let walk = self.walk_from(query, i);

            if walk.matched >= min_len && (walk.on_leaf || !unique_only) {
                let q_end = i + walk.matched;
                let contained =
                    i >= prev_start && i <= prev_end && q_end >= prev_start && q_end <= prev_end;
                if !contained {
                    matches.push(SuffixMatch {
                        reference_start: walk.text_pos - walk.matched,
                        query_start: i,
                        length: walk.matched,
                    });
                    prev_start = i;
                    prev_end = q_end;

                    if walk.on_leaf && q_end == query.len() {
                        // No later suffix inside this match can reach
                        // further, skip past it.
                        i += walk.matched - 1;
                    }
                }
            }
            i += 1;
        }

        matches
    }
}
