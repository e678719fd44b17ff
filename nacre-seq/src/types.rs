//! Concrete sequence type aliases.

use crate::alphabet::{DnaAlphabet, ProteinAlphabet, RnaAlphabet};
use crate::seq::ValidatedSeq;

/// A validated DNA sequence (IUPAC alphabet, uppercase).
pub type DnaSequence = ValidatedSeq<DnaAlphabet>;

/// A validated RNA sequence (IUPAC alphabet, uppercase).
pub type RnaSequence = ValidatedSeq<RnaAlphabet>;

/// A validated protein sequence (uppercase).
pub type ProteinSequence = ValidatedSeq<ProteinAlphabet>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dna_and_rna_are_distinct_types() {
        let dna = DnaSequence::new(b"ACGT").unwrap();
        let rna = RnaSequence::new(b"ACGU").unwrap();
        assert_eq!(dna.as_ref(), b"ACGT");
        assert_eq!(rna.as_ref(), b"ACGU");
    }
}
