//! Needleman-Wunsch global alignment with affine gap penalties.
//!
//! Uses a three-matrix dynamic programming formulation (Gotoh, 1982):
//!
//! - **H** — best score ending in a match/mismatch
//! - **E** — best score ending in a gap in the first sequence
//! - **F** — best score ending in a gap in the second sequence
//!
//! A [`GapPenalty::Linear`] model is the affine model with the extension
//! cost equal to the open cost, so both run through the same recurrence.

use nacre_core::{NacreError, Result};
use nacre_seq::GAP;

use crate::scoring::SimilarityMatrix;
use crate::types::{ConsensusResolver, GapPenalty, PairwiseAlignedSequence, PairwiseAligner};

/// Perform global (Needleman-Wunsch) alignment of `first` against `second`.
///
/// # Errors
///
/// Returns an error if either sequence is empty.
pub fn global_alignment(
    first: &[u8],
    second: &[u8],
    matrix: &SimilarityMatrix,
    gap: GapPenalty,
    resolver: &dyn ConsensusResolver,
) -> Result<PairwiseAlignedSequence> {
    let m = first.len();
    let n = second.len();

    if m == 0 || n == 0 {
        return Err(NacreError::InvalidInput(
            "sequences must not be empty".into(),
        ));
    }

    let (gap_open, gap_extend) = gap.costs();

    let rows = m + 1;
    let cols = n + 1;

    // H[i][j]: best score for aligning first[..i] and second[..j]
    // E[i][j]: best score ending with a gap in the first sequence
    // F[i][j]: best score ending with a gap in the second sequence
    let mut h = vec![i32::MIN / 2; rows * cols];
    let mut e = vec![i32::MIN / 2; rows * cols];
    let mut f = vec![i32::MIN / 2; rows * cols];

    let idx = |i: usize, j: usize| -> usize { i * cols + j };

    // Initialization
    h[idx(0, 0)] = 0;

    for i in 1..rows {
        // Opening a gap in the second sequence of length i
        h[idx(i, 0)] = gap_open + (i as i32 - 1) * gap_extend;
        f[idx(i, 0)] = h[idx(i, 0)];
    }

    for j in 1..cols {
        // Opening a gap in the first sequence of length j
        h[idx(0, j)] = gap_open + (j as i32 - 1) * gap_extend;
        e[idx(0, j)] = h[idx(0, j)];
    }

    // Fill
    for i in 1..rows {
        for j in 1..cols {
            // E: gap in first — consuming second[j-1]
            e[idx(i, j)] = (h[idx(i, j - 1)] + gap_open).max(e[idx(i, j - 1)] + gap_extend);

            // F: gap in second — consuming first[i-1]
            f[idx(i, j)] = (h[idx(i - 1, j)] + gap_open).max(f[idx(i - 1, j)] + gap_extend);

            // H: match/mismatch
            let sub = matrix.score(first[i - 1], second[j - 1]);
            let diag = h[idx(i - 1, j - 1)] + sub;

            h[idx(i, j)] = diag.max(e[idx(i, j)]).max(f[idx(i, j)]);
        }
    }

    // Traceback from (m, n) to (0, 0)
    let mut first_aligned = Vec::new();
    let mut second_aligned = Vec::new();
    let mut consensus = Vec::new();
    let mut insertions = [0usize; 2];

    let mut i = m;
    let mut j = n;

    // Track which matrix we're currently in for traceback
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        H,
        E,
        F,
    }

    let mut state = State::H;

    while i > 0 || j > 0 {
        match state {
            State::H => {
                if i > 0 && j > 0 {
                    let sub = matrix.score(first[i - 1], second[j - 1]);
                    let diag = h[idx(i - 1, j - 1)] + sub;

                    if h[idx(i, j)] == diag {
                        // Match or mismatch
                        first_aligned.push(first[i - 1]);
                        second_aligned.push(second[j - 1]);
                        consensus.push(resolver.resolve(first[i - 1], second[j - 1]));
                        i -= 1;
                        j -= 1;
                    } else if h[idx(i, j)] == e[idx(i, j)] {
                        state = State::E;
                    } else {
                        state = State::F;
                    }
                } else if j > 0 {
                    state = State::E;
                } else {
                    state = State::F;
                }
            }
            State::E => {
                // Gap in first — consume second[j-1]
                first_aligned.push(GAP);
                second_aligned.push(second[j - 1]);
                consensus.push(resolver.resolve(GAP, second[j - 1]));
                insertions[0] += 1;

                // Decide whether to stay in E or return to H
                if e[idx(i, j)] == h[idx(i, j - 1)] + gap_open {
                    state = State::H;
                }
                // else: stay in E (extending the gap)
                j -= 1;
            }
            State::F => {
                // Gap in second — consume first[i-1]
                first_aligned.push(first[i - 1]);
                second_aligned.push(GAP);
                consensus.push(resolver.resolve(first[i - 1], GAP));
                insertions[1] += 1;

                // Decide whether to stay in F or return to H
                if f[idx(i, j)] == h[idx(i - 1, j)] + gap_open {
                    state = State::H;
                }
                // else: stay in F (extending the gap)
                i -= 1;
            }
        }
    }

    // Reverse since we traced back from (m, n)
    first_aligned.reverse();
    second_aligned.reverse();
    consensus.reverse();

    Ok(PairwiseAlignedSequence {
        first_aligned,
        second_aligned,
        consensus,
        score: h[idx(m, n)],
        start_offsets: [0, 0],
        end_offsets: [m - 1, n - 1],
        insertions,
    })
}

/// The default [`PairwiseAligner`], backed by [`global_alignment`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalAligner;

impl PairwiseAligner for GlobalAligner {
    fn align(
        &self,
        first: &[u8],
        second: &[u8],
        matrix: &SimilarityMatrix,
        gap: GapPenalty,
        resolver: &dyn ConsensusResolver,
    ) -> Result<PairwiseAlignedSequence> {
        global_alignment(first, second, matrix, gap, resolver)
    }
}
