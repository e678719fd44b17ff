//! Core types and strategy traits for pairwise alignment results.

use nacre_core::Result;
use nacre_seq::GAP;

use crate::scoring::SimilarityMatrix;

/// Gap cost model for an alignment.
///
/// Costs are negative numbers, e.g. an open cost of -13, not +13.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GapPenalty {
    /// Every gap symbol costs `open`.
    Linear { open: i32 },
    /// The first gap symbol costs `open`, each further symbol `extend`.
    Affine { open: i32, extend: i32 },
}

impl GapPenalty {
    /// Cost of an uninterrupted gap run of `len` symbols.
    pub fn run_cost(&self, len: usize) -> i32 {
        if len == 0 {
            return 0;
        }
        match *self {
            GapPenalty::Linear { open } => len as i32 * open,
            GapPenalty::Affine { open, extend } => open + (len as i32 - 1) * extend,
        }
    }

    /// The (open, extend) pair; for a linear penalty both are the open cost.
    pub fn costs(&self) -> (i32, i32) {
        match *self {
            GapPenalty::Linear { open } => (open, open),
            GapPenalty::Affine { open, extend } => (open, extend),
        }
    }
}

/// A gapped pairwise alignment of a reference (first) and query (second)
/// sequence.
///
/// The three aligned strands have equal length; removing the gap symbols
/// from `first_aligned` and `second_aligned` reproduces the original inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairwiseAlignedSequence {
    /// Aligned reference sequence, with `-` for gaps.
    pub first_aligned: Vec<u8>,
    /// Aligned query sequence, with `-` for gaps.
    pub second_aligned: Vec<u8>,
    /// Consensus strand produced by the [`ConsensusResolver`].
    pub consensus: Vec<u8>,
    /// Total alignment score.
    pub score: i32,
    /// Start of the aligned region in each input (0-based, inclusive).
    pub start_offsets: [usize; 2],
    /// End of the aligned region in each input (0-based, inclusive).
    pub end_offsets: [usize; 2],
    /// Number of gap symbols inserted into each aligned strand.
    pub insertions: [usize; 2],
}

impl PairwiseAlignedSequence {
    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.first_aligned.len()
    }

    /// Whether the alignment has no columns.
    pub fn is_empty(&self) -> bool {
        self.first_aligned.is_empty()
    }

    /// The reference strand with gap symbols removed.
    pub fn first_degapped(&self) -> Vec<u8> {
        self.first_aligned.iter().copied().filter(|&b| b != GAP).collect()
    }

    /// The query strand with gap symbols removed.
    pub fn second_degapped(&self) -> Vec<u8> {
        self.second_aligned.iter().copied().filter(|&b| b != GAP).collect()
    }
}

impl nacre_core::Scored for PairwiseAlignedSequence {
    fn score(&self) -> f64 {
        self.score as f64
    }
}

/// The alignments produced for one query sequence, keyed by its position in
/// the input query list.
///
/// A query identical to the reference produces an empty alignment list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueryAlignment {
    /// Index of the query in the input list.
    pub query_index: usize,
    /// Alignments found for this query (at most one).
    pub alignments: Vec<PairwiseAlignedSequence>,
}

/// Strategy for aligning two ungapped sequences end to end.
///
/// Used both to fill gap regions between anchor matches and as the fallback
/// when no anchors are found.
pub trait PairwiseAligner: Send + Sync {
    /// Globally align `first` against `second`.
    ///
    /// # Errors
    ///
    /// Returns an error if either sequence is empty.
    fn align(
        &self,
        first: &[u8],
        second: &[u8],
        matrix: &SimilarityMatrix,
        gap: GapPenalty,
        resolver: &dyn ConsensusResolver,
    ) -> Result<PairwiseAlignedSequence>;
}

/// Strategy for deriving one consensus symbol per alignment column.
pub trait ConsensusResolver: Send + Sync {
    /// Resolve a column of the alignment; `first` and `second` may be the
    /// gap symbol but never both.
    fn resolve(&self, first: u8, second: u8) -> u8;
}

/// Default consensus: the symbol itself when both agree or one side is a
/// gap, the reference symbol otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleConsensusResolver;

impl ConsensusResolver for SimpleConsensusResolver {
    fn resolve(&self, first: u8, second: u8) -> u8 {
        if first == GAP {
            second
        } else {
            first
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_run_cost() {
        let gap = GapPenalty::Linear { open: -13 };
        assert_eq!(gap.run_cost(0), 0);
        assert_eq!(gap.run_cost(1), -13);
        assert_eq!(gap.run_cost(3), -39);
    }

    #[test]
    fn affine_run_cost() {
        let gap = GapPenalty::Affine { open: -13, extend: -8 };
        assert_eq!(gap.run_cost(0), 0);
        assert_eq!(gap.run_cost(1), -13);
        assert_eq!(gap.run_cost(3), -29);
    }

    #[test]
    fn affine_with_equal_costs_matches_linear() {
        let linear = GapPenalty::Linear { open: -5 };
        let affine = GapPenalty::Affine { open: -5, extend: -5 };
        for len in 0..10 {
            assert_eq!(linear.run_cost(len), affine.run_cost(len));
        }
    }

    #[test]
    fn degapping_removes_only_gaps() {
        let aln = PairwiseAlignedSequence {
            first_aligned: b"AC-GT".to_vec(),
            second_aligned: b"ACTG-".to_vec(),
            consensus: b"ACTGT".to_vec(),
            score: 0,
            start_offsets: [0, 0],
            end_offsets: [3, 3],
            insertions: [1, 1],
        };
        assert_eq!(aln.first_degapped(), b"ACGT");
        assert_eq!(aln.second_degapped(), b"ACTG");
        assert_eq!(aln.len(), 5);
    }

    #[test]
    fn simple_resolver_prefers_reference() {
        let resolver = SimpleConsensusResolver;
        assert_eq!(resolver.resolve(b'A', b'A'), b'A');
        assert_eq!(resolver.resolve(b'A', b'T'), b'A');
        assert_eq!(resolver.resolve(GAP, b'T'), b'T');
        assert_eq!(resolver.resolve(b'C', GAP), b'C');
    }
}
