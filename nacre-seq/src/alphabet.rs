//! Nucleotide and protein alphabets.
//!
//! An alphabet is a zero-sized marker type listing the uppercase bytes a
//! sequence may contain. Validation happens once, at sequence construction;
//! the suffix tree and the aligner then treat sequence bytes as opaque and
//! rely on the gap symbol and the tree sentinel staying outside every
//! alphabet.

/// The gap symbol used in aligned strands.
pub const GAP: u8 = b'-';

/// A fixed set of valid uppercase sequence bytes.
///
/// Input is uppercased before it is checked, so lowercase letters never
/// reach [`Alphabet::is_valid`].
pub trait Alphabet: Clone + Send + Sync + 'static {
    /// Human-readable name (e.g. "DNA"), used in validation errors.
    const NAME: &'static str;

    /// The set of valid uppercase bytes.
    const VALID_BYTES: &'static [u8];

    /// Check whether an uppercased byte belongs to the alphabet.
    fn is_valid(b: u8) -> bool {
        Self::VALID_BYTES.contains(&b)
    }

    /// Position and value of the first byte outside the alphabet, if any.
    fn first_invalid(bytes: &[u8]) -> Option<(usize, u8)> {
        bytes
            .iter()
            .copied()
            .enumerate()
            .find(|&(_, b)| !Self::is_valid(b))
    }
}

/// IUPAC DNA: the four bases plus the eleven ambiguity codes.
///
/// Ambiguity codes validate like any other base; how they score against an
/// anchor's flanks is the similarity matrix's business, not the alphabet's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DnaAlphabet;

impl Alphabet for DnaAlphabet {
    const NAME: &'static str = "DNA";
    const VALID_BYTES: &'static [u8] = b"ACGTNRYSWKMBDHV";
}

/// IUPAC RNA: as DNA with `U` in place of `T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RnaAlphabet;

impl Alphabet for RnaAlphabet {
    const NAME: &'static str = "RNA";
    const VALID_BYTES: &'static [u8] = b"ACGUNRYSWKMBDHV";
}

/// The 20 standard amino acids plus `XBZJUO` and the stop symbol `*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProteinAlphabet;

impl Alphabet for ProteinAlphabet {
    const NAME: &'static str = "Protein";
    const VALID_BYTES: &'static [u8] = b"ACDEFGHIKLMNPQRSTVWYXBZJUO*";
}
