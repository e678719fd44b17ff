//! MUM-anchored alignment of one reference against many queries.
//!
//! `Mummer` builds a suffix tree over the reference once, then fans out over
//! the queries: stream maximal unique matches, sort them by reference
//! position, select an increasing cover, and fill the regions between the
//! anchors with the configured dynamic-programming aligner. Queries with no
//! anchors at all fall back to a full pairwise alignment.

use std::marker::PhantomData;

use log::debug;
use rayon::prelude::*;

use nacre_core::{NacreError, Result};
use nacre_seq::{DnaAlphabet, SuffixTree, ValidatedSeq};

use crate::gaps::process_gaps;
use crate::lis::longest_increasing_subsequence;
use crate::mum::{collect_matches, sort_mums, MaxUniqueMatch, MumReport};
use crate::needleman_wunsch::GlobalAligner;
use crate::scoring::{NucleotideAlphabet, SimilarityMatrix};
use crate::types::{
    ConsensusResolver, GapPenalty, PairwiseAligner, QueryAlignment, SimpleConsensusResolver,
};

/// Outcome of the anchor-finding stage for one query.
enum Stage {
    /// Query bytes equal the reference; no alignment is produced.
    Skipped,
    /// No unique anchor of the minimum length exists.
    NoAnchors,
    /// Trimmed, increasing anchor chain ready for gap filling.
    Selected(Vec<MaxUniqueMatch>),
}

/// MUM-anchored pairwise aligner for nucleotide sequences.
///
/// The alphabet parameter selects the default similarity matrix and keeps
/// reference and queries on the same alphabet at compile time.
///
/// ```
/// use nacre_align::Mummer;
/// use nacre_seq::DnaSequence;
///
/// let reference = DnaSequence::new(b"TTGACTGCATCCGTGAAGCT").unwrap();
/// let query = DnaSequence::new(b"TTGACTGCATNCCGTGAAGCT").unwrap();
///
/// let mut mummer = Mummer::new();
/// mummer.length_of_mum = 8;
/// let results = mummer.align(&reference, &[query]).unwrap();
///
/// let alignment = &results[0].alignments[0];
/// assert_eq!(alignment.score, 87);
/// assert_eq!(alignment.first_aligned, b"TTGACTGCAT-CCGTGAAGCT".to_vec());
/// ```
pub struct Mummer<A: NucleotideAlphabet = DnaAlphabet> {
    /// Minimum anchor length; matches shorter than this are ignored.
    pub length_of_mum: usize,
    /// Gap open cost, a negative number.
    pub gap_open: i32,
    /// Gap extension cost for [`Mummer::align`], a negative number.
    pub gap_extend: i32,
    /// Similarity matrix override; `None` selects the alphabet default.
    pub similarity: Option<SimilarityMatrix>,
    /// When set, all anchor chains are computed before any gap filling.
    /// The produced alignments are identical either way.
    pub store_mums: bool,
    /// Aligner used for gap regions and the no-anchor fallback.
    pub aligner: Box<dyn PairwiseAligner>,
    /// Consensus strategy for every alignment column.
    pub resolver: Box<dyn ConsensusResolver>,
    alphabet: PhantomData<A>,
}

impl<A: NucleotideAlphabet> Default for Mummer<A> {
    fn default() -> Self {
        Mummer {
            length_of_mum: 20,
            gap_open: -13,
            gap_extend: -8,
            similarity: None,
            store_mums: false,
            aligner: Box::new(GlobalAligner),
            resolver: Box::new(SimpleConsensusResolver),
            alphabet: PhantomData,
        }
    }
}

impl<A: NucleotideAlphabet> Mummer<A> {
    /// A MUMmer with the stock configuration: anchors of at least 20 bases,
    /// affine gap costs -13/-8, and the alphabet's default matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Align every query against `reference` with affine gap costs.
    ///
    /// Results are keyed by query index; a query identical to the reference
    /// yields an empty alignment list at its index.
    ///
    /// # Errors
    ///
    /// Returns [`NacreError::InvalidInput`] when the configuration or the
    /// sequences fail validation, naming the offending part.
    pub fn align(
        &self,
        reference: &ValidatedSeq<A>,
        queries: &[ValidatedSeq<A>],
    ) -> Result<Vec<QueryAlignment>> {
        let gap = GapPenalty::Affine {
            open: self.gap_open,
            extend: self.gap_extend,
        };
        self.run(reference, queries, gap)
    }

    /// Align every query against `reference` charging `gap_open` for each
    /// gap symbol, with no separate extension cost.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Mummer::align`].
    pub fn align_simple(
        &self,
        reference: &ValidatedSeq<A>,
        queries: &[ValidatedSeq<A>],
    ) -> Result<Vec<QueryAlignment>> {
        let gap = GapPenalty::Linear {
            open: self.gap_open,
        };
        self.run(reference, queries, gap)
    }

    /// Report the anchors for every query without aligning.
    ///
    /// With `perform_lis` unset the matches come back in streaming order,
    /// numbered as found; with it set they are sorted by reference position
    /// and reduced to the trimmed increasing cover. A query identical to
    /// the reference reports no matches.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Mummer::align`].
    pub fn find_mums(
        &self,
        reference: &ValidatedSeq<A>,
        queries: &[ValidatedSeq<A>],
        perform_lis: bool,
    ) -> Result<Vec<MumReport>> {
        let matrix = self.resolve_matrix();
        self.validate(reference, queries, &matrix)?;
        let tree = SuffixTree::build(reference)?;

        Ok(queries
            .par_iter()
            .enumerate()
            .map(|(query_index, query)| {
                let matches = if query.as_ref() == reference.as_ref() {
                    Vec::new()
                } else {
                    let raw = collect_matches(&tree.unique_matches(query, self.length_of_mum));
                    if perform_lis {
                        longest_increasing_subsequence(&sort_mums(raw))
                    } else {
                        raw
                    }
                };
                MumReport {
                    query_index,
                    matches,
                }
            })
            .collect())
    }

    fn run(
        &self,
        reference: &ValidatedSeq<A>,
        queries: &[ValidatedSeq<A>],
        gap: GapPenalty,
    ) -> Result<Vec<QueryAlignment>> {
        let matrix = self.resolve_matrix();
        self.validate(reference, queries, &matrix)?;

        let tree = SuffixTree::build(reference)?;
        debug!(
            "suffix tree over {} bases has {} nodes; aligning {} queries",
            tree.reference_len(),
            tree.node_count(),
            queries.len()
        );

        if self.store_mums {
            // Accumulate mode: every anchor chain is complete before the
            // first gap region is filled.
            let stages: Vec<Stage> = queries
                .par_iter()
                .map(|query| self.stage(&tree, reference, query))
                .collect();
            stages
                .into_par_iter()
                .enumerate()
                .map(|(i, stage)| self.finish(i, reference, &queries[i], stage, &matrix, gap))
                .collect()
        } else {
            queries
                .par_iter()
                .enumerate()
                .map(|(i, query)| {
                    let stage = self.stage(&tree, reference, query);
                    self.finish(i, reference, query, stage, &matrix, gap)
                })
                .collect()
        }
    }

    fn resolve_matrix(&self) -> SimilarityMatrix {
        self.similarity.clone().unwrap_or_else(A::default_matrix)
    }

    fn validate(
        &self,
        reference: &ValidatedSeq<A>,
        queries: &[ValidatedSeq<A>],
        matrix: &SimilarityMatrix,
    ) -> Result<()> {
        if self.length_of_mum == 0 {
            return Err(NacreError::InvalidInput(
                "minimum match length must be at least 1".into(),
            ));
        }
        if let Some(b) = matrix.first_uncovered(reference) {
            return Err(NacreError::InvalidInput(format!(
                "matrix {} does not cover symbol '{}' in the reference",
                matrix.name(),
                b as char
            )));
        }
        if reference.len() < self.length_of_mum {
            return Err(NacreError::InvalidInput(format!(
                "reference length {} is below the minimum match length {}",
                reference.len(),
                self.length_of_mum
            )));
        }
        if queries.is_empty() {
            return Err(NacreError::InvalidInput("no query sequences given".into()));
        }
        for (i, query) in queries.iter().enumerate() {
            if query.is_empty() {
                return Err(NacreError::InvalidInput(format!("query {i} is empty")));
            }
            if let Some(b) = matrix.first_uncovered(query) {
                return Err(NacreError::InvalidInput(format!(
                    "matrix {} does not cover symbol '{}' in query {i}",
                    matrix.name(),
                    b as char
                )));
            }
        }
        if !queries.iter().any(|q| q.len() >= self.length_of_mum) {
            return Err(NacreError::InvalidInput(format!(
                "no query reaches the minimum match length {}",
                self.length_of_mum
            )));
        }
        Ok(())
    }

    fn stage(&self, tree: &SuffixTree, reference: &[u8], query: &[u8]) -> Stage {
        if query == reference {
            return Stage::Skipped;
        }
        let raw = collect_matches(&tree.unique_matches(query, self.length_of_mum));
        if raw.is_empty() {
            return Stage::NoAnchors;
        }
        let found = raw.len();
        let selected = longest_increasing_subsequence(&sort_mums(raw));
        debug!("selected {} of {} anchors", selected.len(), found);
        Stage::Selected(selected)
    }

    fn finish(
        &self,
        query_index: usize,
        reference: &[u8],
        query: &[u8],
        stage: Stage,
        matrix: &SimilarityMatrix,
        gap: GapPenalty,
    ) -> Result<QueryAlignment> {
        let alignments = match stage {
            Stage::Skipped => Vec::new(),
            Stage::NoAnchors => vec![self.aligner.align(
                reference,
                query,
                matrix,
                gap,
                self.resolver.as_ref(),
            )?],
            Stage::Selected(mums) => vec![process_gaps(
                reference,
                query,
                &mums,
                matrix,
                gap,
                self.aligner.as_ref(),
                self.resolver.as_ref(),
            )?],
        };
        Ok(QueryAlignment {
            query_index,
            alignments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::needleman_wunsch::global_alignment;
    use nacre_seq::DnaSequence;

    fn dna(bytes: &[u8]) -> DnaSequence {
        DnaSequence::new(bytes).unwrap()
    }

    fn mummer(length_of_mum: usize) -> Mummer {
        let mut m = Mummer::new();
        m.length_of_mum = length_of_mum;
        m
    }

    #[test]
    fn insertion_between_two_anchors() {
        let reference = dna(b"TTGACTGCATCCGTGAAGCT");
        let query = dna(b"TTGACTGCATNCCGTGAAGCT");
        let results = mummer(8).align(&reference, &[query.clone()]).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].query_index, 0);
        let aln = &results[0].alignments[0];
        assert_eq!(aln.first_aligned, b"TTGACTGCAT-CCGTGAAGCT".to_vec());
        assert_eq!(aln.second_aligned, query.as_ref().to_vec());
        assert_eq!(aln.score, 87);
        assert_eq!(aln.insertions, [1, 0]);
        assert_eq!(aln.start_offsets, [0, 0]);
        assert_eq!(aln.end_offsets, [19, 20]);
    }

    #[test]
    fn aligned_strands_share_length_and_degap_to_inputs() {
        let reference = dna(b"TTGACTGCATCCGTGAAGCT");
        let query = dna(b"TTGACTGCATNCCGTGAAGCT");
        let results = mummer(8).align(&reference, &[query.clone()]).unwrap();

        let aln = &results[0].alignments[0];
        assert_eq!(aln.first_aligned.len(), aln.second_aligned.len());
        assert_eq!(aln.first_aligned.len(), aln.consensus.len());
        assert_eq!(aln.first_degapped(), reference.as_ref().to_vec());
        assert_eq!(aln.second_degapped(), query.as_ref().to_vec());
    }

    #[test]
    fn substitution_filled_by_inner_aligner() {
        let reference = dna(b"TTGACTGCATACCGTGAAGCT");
        let query = dna(b"TTGACTGCATGCCGTGAAGCT");
        let results = mummer(8).align(&reference, &[query]).unwrap();

        let aln = &results[0].alignments[0];
        assert_eq!(aln.first_aligned, reference.as_ref().to_vec());
        // 20 matching bases at 5 each, plus one A/G mismatch at -4.
        assert_eq!(aln.score, 96);
        assert_eq!(aln.consensus, reference.as_ref().to_vec());
        assert_eq!(aln.insertions, [0, 0]);
    }

    #[test]
    fn affine_and_linear_costs_differ_on_long_gaps() {
        let reference = dna(b"TTGACTGCATCCGTGAAGCT");
        let query = dna(b"TTGACTGCATNNCCGTGAAGCT");
        let m = mummer(8);

        let affine = m.align(&reference, &[query.clone()]).unwrap();
        assert_eq!(affine[0].alignments[0].score, 100 - 13 - 8);

        let linear = m.align_simple(&reference, &[query]).unwrap();
        assert_eq!(linear[0].alignments[0].score, 100 - 13 - 13);
    }

    #[test]
    fn query_identical_to_reference_is_skipped() {
        let reference = dna(b"TTGACTGCATCCGTGAAGCT");
        let results = mummer(8).align(&reference, &[reference.clone()]).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].query_index, 0);
        assert!(results[0].alignments.is_empty());
    }

    #[test]
    fn no_anchors_falls_back_to_full_alignment() {
        // Every substring of the query occurs twice in the reference, so
        // no unique anchor exists.
        let reference = dna(b"GATTACAGATTACA");
        let query = dna(b"GATTACA");
        let results = mummer(6).align(&reference, &[query.clone()]).unwrap();

        let direct = global_alignment(
            reference.as_ref(),
            query.as_ref(),
            &SimilarityMatrix::ambiguous_dna(),
            GapPenalty::Affine { open: -13, extend: -8 },
            &SimpleConsensusResolver,
        )
        .unwrap();
        assert_eq!(results[0].alignments, vec![direct]);
    }

    #[test]
    fn accumulate_mode_matches_streaming_mode() {
        let reference = dna(b"TTGACTGCATCCGTGAAGCT");
        let queries = vec![
            dna(b"TTGACTGCATNCCGTGAAGCT"),
            dna(b"TTGACTGCATCCGTGAAGCT"),
            dna(b"CCGTGAAGCTTTGACTGCAT"),
            dna(b"TTGACTGC"),
        ];
        let streaming = mummer(8).align(&reference, &queries).unwrap();

        let mut accumulating = mummer(8);
        accumulating.store_mums = true;
        let accumulated = accumulating.align(&reference, &queries).unwrap();

        assert_eq!(streaming, accumulated);
    }

    #[test]
    fn query_indices_are_stable() {
        let reference = dna(b"TTGACTGCATCCGTGAAGCT");
        let queries = vec![
            dna(b"TTGACTGCATNCCGTGAAGCT"),
            dna(b"TTGACTGCATCCGTGAAGCT"),
            dna(b"TTGACTGCATGCGTGAAGCT"),
        ];
        let results = mummer(8).align(&reference, &queries).unwrap();
        let indices: Vec<usize> = results.iter().map(|r| r.query_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn zero_minimum_match_length_is_rejected() {
        let reference = dna(b"TTGACTGCATCCGTGAAGCT");
        let err = mummer(0)
            .align(&reference, &[reference.clone()])
            .unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn short_reference_is_rejected() {
        let reference = dna(b"TTGACTGCAT");
        let query = dna(b"TTGACTGCATCC");
        let err = mummer(12).align(&reference, &[query]).unwrap_err();
        assert!(err.to_string().contains("reference length 10"));
    }

    #[test]
    fn all_queries_too_short_is_rejected() {
        let reference = dna(b"TTGACTGCATCCGTGAAGCT");
        let queries = vec![dna(b"TTGAC"), dna(b"CCGTG")];
        let err = mummer(8).align(&reference, &queries).unwrap_err();
        assert!(err.to_string().contains("minimum match length 8"));
    }

    #[test]
    fn uncovered_symbol_names_the_sequence() {
        let matrix = SimilarityMatrix::new(
            "acgt-only",
            b"ACGT",
            vec![
                1, -1, -1, -1, //
                -1, 1, -1, -1, //
                -1, -1, 1, -1, //
                -1, -1, -1, 1,
            ],
        )
        .unwrap();

        let mut m = mummer(4);
        m.similarity = Some(matrix);

        let reference = dna(b"ACGTNACGT");
        let query = dna(b"ACGTACGT");
        let err = m.align(&reference, &[query.clone()]).unwrap_err();
        assert!(err.to_string().contains("'N' in the reference"));

        let reference = dna(b"ACGTACGTT");
        let query = dna(b"ACGNTACGT");
        let err = m.align(&reference, &[query]).unwrap_err();
        assert!(err.to_string().contains("'N' in query 0"));
    }

    #[test]
    fn find_mums_reports_streaming_and_selected_anchors() {
        let reference = dna(b"TTGACTGCATCCGTGAAGCT");
        let query = dna(b"TTGACTGCATNCCGTGAAGCT");
        let m = mummer(8);

        let raw = m.find_mums(&reference, &[query.clone()], false).unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].query_index, 0);
        let matches = &raw[0].matches;
        assert_eq!(matches.len(), 2);
        assert_eq!(
            (matches[0].reference_start, matches[0].query_start, matches[0].length),
            (0, 0, 10)
        );
        assert_eq!(
            (matches[1].reference_start, matches[1].query_start, matches[1].length),
            (10, 11, 10)
        );
        assert_eq!(matches[0].order, 1);
        assert_eq!(matches[1].order, 2);

        let selected = m.find_mums(&reference, &[query], true).unwrap();
        assert_eq!(selected[0].matches.len(), 2);
    }

    #[test]
    fn find_mums_skips_identical_query() {
        let reference = dna(b"TTGACTGCATCCGTGAAGCT");
        let reports = mummer(8)
            .find_mums(&reference, &[reference.clone()], false)
            .unwrap();
        assert!(reports[0].matches.is_empty());
    }

    #[test]
    fn anchor_length_may_equal_query_length() {
        // The whole query is the single anchor.
        let reference = dna(b"TTGACTGCATCCGTGAAGCT");
        let query = dna(b"CCGTGAAGCT");
        let results = mummer(10).align(&reference, &[query.clone()]).unwrap();

        let aln = &results[0].alignments[0];
        assert_eq!(aln.second_degapped(), query.as_ref().to_vec());
        // Ten leading reference bases gapped, ten anchored.
        assert_eq!(aln.score, 50 - 13 - 9 * 8);
        assert_eq!(aln.insertions, [0, 10]);
    }
}
