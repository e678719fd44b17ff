//! Assembly of a full alignment from an anchor chain.
//!
//! The selected MUMs split the reference and query into alternating anchor
//! and gap regions. Anchors are copied into the alignment verbatim; gap
//! regions where both sequences contribute symbols are aligned with the
//! configured [`PairwiseAligner`], and one-sided regions become runs of gap
//! symbols charged at the gap penalty.

use nacre_core::Result;
use nacre_seq::GAP;

use crate::mum::MaxUniqueMatch;
use crate::scoring::SimilarityMatrix;
use crate::types::{ConsensusResolver, GapPenalty, PairwiseAlignedSequence, PairwiseAligner};

/// Build the complete pairwise alignment of `reference` and `query` around
/// the trimmed, increasing chain `mums`.
///
/// With an empty chain the entire pair is handed to `aligner` in one piece.
pub fn process_gaps(
    reference: &[u8],
    query: &[u8],
    mums: &[MaxUniqueMatch],
    matrix: &SimilarityMatrix,
    gap: GapPenalty,
    aligner: &dyn PairwiseAligner,
    resolver: &dyn ConsensusResolver,
) -> Result<PairwiseAlignedSequence> {
    let mut out = PairwiseAlignedSequence {
        first_aligned: Vec::with_capacity(reference.len().max(query.len())),
        second_aligned: Vec::with_capacity(reference.len().max(query.len())),
        consensus: Vec::with_capacity(reference.len().max(query.len())),
        score: 0,
        start_offsets: [0, 0],
        end_offsets: [
            reference.len().saturating_sub(1),
            query.len().saturating_sub(1),
        ],
        insertions: [0, 0],
    };

    let mut reference_pos = 0;
    let mut query_pos = 0;

    for m in mums {
        align_gap(
            &reference[reference_pos..m.reference_start],
            &query[query_pos..m.query_start],
            matrix,
            gap,
            aligner,
            resolver,
            &mut out,
        )?;

        // The anchor matches exactly; copy it through and score it as a
        // run of identities.
        let anchor = &reference[m.reference_start..m.reference_start + m.length];
        out.first_aligned.extend_from_slice(anchor);
        out.second_aligned.extend_from_slice(anchor);
        out.consensus.extend_from_slice(anchor);
        out.score += anchor.iter().map(|&b| matrix.self_score(b)).sum::<i32>();

        reference_pos = m.reference_start + m.length;
        query_pos = m.query_start + m.length;
    }

    align_gap(
        &reference[reference_pos..],
        &query[query_pos..],
        matrix,
        gap,
        aligner,
        resolver,
        &mut out,
    )?;

    Ok(out)
}

/// Append one gap region between anchors to the accumulated alignment.
fn align_gap(
    reference_slice: &[u8],
    query_slice: &[u8],
    matrix: &SimilarityMatrix,
    gap: GapPenalty,
    aligner: &dyn PairwiseAligner,
    resolver: &dyn ConsensusResolver,
    out: &mut PairwiseAlignedSequence,
) -> Result<()> {
    match (reference_slice.is_empty(), query_slice.is_empty()) {
        (true, true) => {}
        (false, true) => {
            // Reference-only region: gap symbols go into the query strand.
            out.first_aligned.extend_from_slice(reference_slice);
            out.second_aligned
                .extend(std::iter::repeat(GAP).take(reference_slice.len()));
            out.consensus
                .extend(reference_slice.iter().map(|&b| resolver.resolve(b, GAP)));
            out.insertions[1] += reference_slice.len();
            out.score += gap.run_cost(reference_slice.len());
        }
        (true, false) => {
            // Query-only region: gap symbols go into the reference strand.
            out.first_aligned
                .extend(std::iter::repeat(GAP).take(query_slice.len()));
            out.second_aligned.extend_from_slice(query_slice);
            out.consensus
                .extend(query_slice.iter().map(|&b| resolver.resolve(GAP, b)));
            out.insertions[0] += query_slice.len();
            out.score += gap.run_cost(query_slice.len());
        }
        (false, false) => {
            let sub = aligner.align(reference_slice, query_slice, matrix, gap, resolver)?;
            out.first_aligned.extend_from_slice(&sub.first_aligned);
            out.second_aligned.extend_from_slice(&sub.second_aligned);
            out.consensus.extend_from_slice(&sub.consensus);
            out.score += sub.score;
            out.insertions[0] += sub.insertions[0];
            out.insertions[1] += sub.insertions[1];
        }
    }
    Ok(())
}
