//! MUM-anchored pairwise alignment for the Nacre bioinformatics ecosystem.
//!
//! Aligns one reference sequence against many queries the MUMmer way: a
//! suffix tree over the reference yields maximal unique matches (MUMs), a
//! longest-increasing-subsequence pass selects a consistent anchor chain,
//! and the regions between anchors are closed with Needleman-Wunsch under
//! affine or linear gap costs.
//!
//! # Quick start
//!
//! ```
//! use nacre_align::Mummer;
//! use nacre_seq::DnaSequence;
//!
//! let reference = DnaSequence::new(b"TTGACTGCATCCGTGAAGCT").unwrap();
//! let query = DnaSequence::new(b"TTGACTGCATNCCGTGAAGCT").unwrap();
//!
//! let mut mummer = Mummer::new();
//! mummer.length_of_mum = 8;
//! let results = mummer.align(&reference, &[query]).unwrap();
//! assert_eq!(results[0].alignments[0].score, 87);
//! ```

pub mod types;
pub mod scoring;
pub mod mum;
pub mod lis;
pub mod needleman_wunsch;
pub mod gaps;
pub mod mummer;

pub use types::{
    ConsensusResolver, GapPenalty, PairwiseAlignedSequence, PairwiseAligner, QueryAlignment,
    SimpleConsensusResolver,
};
pub use scoring::{NucleotideAlphabet, SimilarityMatrix};
pub use mum::{collect_matches, sort_mums, MaxUniqueMatch, MumReport};
pub use lis::longest_increasing_subsequence;
pub use needleman_wunsch::{global_alignment, GlobalAligner};
pub use gaps::process_gaps;
pub use mummer::Mummer;

#[cfg(test)]
mod proptests {
    use super::*;
    use nacre_seq::DnaSequence;
    use proptest::prelude::*;

    fn dna_seq(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<u8>> {
        proptest::collection::vec(
            prop_oneof![Just(b'A'), Just(b'C'), Just(b'G'), Just(b'T')],
            min_len..=max_len,
        )
    }

    fn run(reference: &[u8], query: &[u8]) -> Vec<QueryAlignment> {
        let reference = DnaSequence::new(reference).unwrap();
        let query = DnaSequence::new(query).unwrap();
        let mut mummer = Mummer::new();
        mummer.length_of_mum = 8;
        mummer.align(&reference, &[query]).unwrap()
    }

    proptest! {
        #[test]
        fn alignment_is_deterministic(
            reference in dna_seq(20, 60),
            query in dna_seq(8, 60),
        ) {
            let r1 = run(&reference, &query);
            let r2 = run(&reference, &query);
            prop_assert_eq!(r1, r2);
        }

        #[test]
        fn strands_degap_to_inputs(
            reference in dna_seq(20, 60),
            query in dna_seq(8, 60),
        ) {
            let results = run(&reference, &query);
            for aln in &results[0].alignments {
                prop_assert_eq!(aln.first_degapped(), reference.clone());
                prop_assert_eq!(aln.second_degapped(), query.clone());
            }
        }

        #[test]
        fn strands_share_length(
            reference in dna_seq(20, 60),
            query in dna_seq(8, 60),
        ) {
            let results = run(&reference, &query);
            for aln in &results[0].alignments {
                prop_assert_eq!(aln.first_aligned.len(), aln.second_aligned.len());
                prop_assert_eq!(aln.first_aligned.len(), aln.consensus.len());
                prop_assert_eq!(
                    aln.insertions[0] + aln.insertions[1],
                    aln.len() * 2 - reference.len() - query.len()
                );
            }
        }

        #[test]
        fn selected_anchors_are_increasing_and_disjoint(
            reference in dna_seq(20, 80),
            query in dna_seq(8, 80),
        ) {
            let reference = DnaSequence::new(&reference).unwrap();
            let query = DnaSequence::new(&query).unwrap();
            let mut mummer = Mummer::new();
            mummer.length_of_mum = 8;
            let reports = mummer.find_mums(&reference, &[query], true).unwrap();
            for pair in reports[0].matches.windows(2) {
                prop_assert!(pair[0].reference_start + pair[0].length <= pair[1].reference_start);
                prop_assert!(pair[0].query_start + pair[0].length <= pair[1].query_start);
            }
        }
    }
}
