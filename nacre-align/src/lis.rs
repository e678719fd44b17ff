//! Longest increasing subsequence selection over sorted MUMs.
//!
//! Greedy cover variant of LIS: each MUM is scored by the reference length
//! it covers minus its overlap with the chosen predecessor, where the
//! overlap is the larger of the query-side and reference-side overlaps.
//! Selecting the best-scoring chain removes criss-crossing MUMs; a final
//! trimming pass shortens each kept MUM by its recorded overlap so the
//! output is strictly increasing in both coordinates and non-overlapping.

use crate::mum::MaxUniqueMatch;

#[derive(Clone, Copy)]
struct Extension {
    score: i64,
    wrap_score: i64,
    adjacent: i64,
    from: Option<usize>,
    good: bool,
}

/// Select the highest-covering increasing chain from `sorted` (ascending
/// reference order) and trim overlaps.
///
/// Lists of zero or one MUM are returned unchanged.
pub fn longest_increasing_subsequence(sorted: &[MaxUniqueMatch]) -> Vec<MaxUniqueMatch> {
    if sorted.len() <= 1 {
        return sorted.to_vec();
    }

    let mut ext = vec![
        Extension {
            score: 0,
            wrap_score: 0,
            adjacent: 0,
            from: None,
            good: false,
        };
        sorted.len()
    ];

    for i in 0..sorted.len() {
        let len_i = sorted[i].length as i64;
        ext[i].score = len_i;
        ext[i].wrap_score = len_i;
        ext[i].adjacent = 0;
        ext[i].from = None;

        for j in 0..i {
            let prev_score = ext[j].score;
            let prev_wrap = ext[j].wrap_score;

            // Overlap in the query coordinate.
            let overlap_query = sorted[j].query_start as i64 + sorted[j].length as i64
                - sorted[i].query_start as i64;
            let mut overlap = overlap_query.max(0);

            let score = prev_score + len_i - overlap;
            if score > ext[i].wrap_score {
                ext[i].wrap_score = score;
            }

            // Overlap in the reference coordinate.
            let overlap_reference = sorted[j].reference_start as i64 + sorted[j].length as i64
                - sorted[i].reference_start as i64;
            overlap = overlap.max(overlap_reference);

            let score = prev_score + len_i - overlap;
            if score > ext[i].score {
                // Chaining from j keeps both coordinates increasing; the
                // overlap is remembered for the trimming pass.
                ext[i].from = Some(j);
                ext[i].score = score;
                ext[i].adjacent = overlap;
            }

            let score = prev_wrap + len_i - overlap;
            if score >= ext[i].wrap_score {
                ext[i].wrap_score = score;
            }
        }
    }

    // The chain ending at the best-scoring MUM is the cover.
    let mut best = 0;
    for i in 1..sorted.len() {
        if ext[i].score > ext[best].score {
            best = i;
        }
    }

    let mut current = Some(best);
    while let Some(i) = current {
        ext[i].good = true;
        current = ext[i].from;
    }

    // Trim each kept MUM by its overlap with the predecessor; drop MUMs
    // whose cover shrinks to nothing.
    let mut result = Vec::new();
    for (i, m) in sorted.iter().enumerate() {
        if !ext[i].good {
            continue;
        }
        let mut kept = *m;
        let adjacent = ext[i].adjacent;
        if adjacent != 0 {
            let remaining = kept.length as i64 - adjacent;
            if remaining <= 0 {
                continue;
            }
            kept.reference_start += adjacent as usize;
            kept.query_start += adjacent as usize;
            kept.length = remaining as usize;
        }
        result.push(kept);
    }

    result
}
