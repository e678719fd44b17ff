//! Similarity matrices for nucleotide alignment scoring.
//!
//! A [`SimilarityMatrix`] is a square score table indexed by IUPAC symbol.
//! The standard matrices ([`SimilarityMatrix::ambiguous_dna`] and
//! [`SimilarityMatrix::ambiguous_rna`]) carry the EMBOSS EDNAFULL (NUC.4.4)
//! values over the full ambiguity alphabet; custom matrices can be built
//! from any symbol set and score table.

use nacre_core::{NacreError, Result};
use nacre_seq::{Alphabet, DnaAlphabet, RnaAlphabet};

/// Sentinel for "symbol not in this matrix" in the byte-to-index table.
const NO_INDEX: u8 = u8::MAX;

/// Matrix dimension of the standard ambiguity matrices: 15 IUPAC symbols.
const NUC_DIM: usize = 15;

/// IUPAC DNA symbols in NUC.4.4 row order.
const NUC44_DNA_SYMBOLS: &[u8] = b"ATGCSWRYKMBVHDN";

/// IUPAC RNA symbols in NUC.4.4 row order (T replaced by U).
const NUC44_RNA_SYMBOLS: &[u8] = b"AUGCSWRYKMBVHDN";

// NUC.4.4 (EDNAFULL) scores, row-major.
// Order: A T G C S W R Y K M B V H D N
#[rustfmt::skip]
const NUC44: [i32; NUC_DIM * NUC_DIM] = [
//   A   T   G   C   S   W   R   Y   K   M   B   V   H   D   N
     5, -4, -4, -4, -4,  1,  1, -4, -4,  1, -4, -1, -1, -1, -2, // A
    -4,  5, -4, -4, -4,  1, -4,  1,  1, -4, -1, -4, -1, -1, -2, // T
    -4, -4,  5, -4,  1, -4,  1, -4,  1, -4, -1, -1, -4, -1, -2, // G
    -4, -4, -4,  5,  1, -4, -4,  1, -4,  1, -1, -1, -1, -4, -2, // C
    -4, -4,  1,  1, -1, -4, -2, -2, -2, -2, -1, -1, -3, -3, -1, // S
     1,  1, -4, -4, -4, -1, -2, -2, -2, -2, -3, -3, -1, -1, -1, // W
     1, -4,  1, -4, -2, -2, -1, -4, -2, -2, -3, -1, -3, -1, -1, // R
    -4,  1, -4,  1, -2, -2, -4, -1, -2, -2, -1, -3, -1, -3, -1, // Y
    -4,  1,  1, -4, -2, -2, -2, -2, -1, -4, -1, -3, -3, -1, -1, // K
     1, -4, -4,  1, -2, -2, -2, -2, -4, -1, -3, -1, -1, -3, -1, // M
    -4, -1, -1, -1, -1, -3, -3, -1, -1, -3, -1, -2, -2, -2, -1, // B
    -1, -4, -1, -1, -1, -3, -1, -3, -3, -1, -2, -1, -2, -2, -1, // V
    -1, -1, -4, -1, -3, -1, -3, -1, -3, -1, -2, -2, -1, -2, -1, // H
    -1, -1, -1, -4, -3, -1, -1, -3, -1, -3, -2, -2, -2, -1, -1, // D
    -2, -2, -2, -2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, // N
];

/// A square similarity matrix indexed by sequence symbol.
///
/// Symbol lookup is case-insensitive; the table itself stores uppercase
/// symbols only.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimilarityMatrix {
    name: String,
    symbols: Vec<u8>,
    /// Byte value to row/column index, `NO_INDEX` for uncovered symbols.
    #[cfg_attr(feature = "serde", serde(with = "serde_index"))]
    index: [u8; 256],
    /// Row-major score table, `symbols.len()` squared entries.
    scores: Vec<i32>,
}

impl SimilarityMatrix {
    /// Build a custom similarity matrix from a symbol set and a row-major
    /// score table.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol set is empty or contains duplicates
    /// (after uppercasing), or if the table is not square over the symbols.
    pub fn new(name: impl Into<String>, symbols: &[u8], scores: Vec<i32>) -> Result<Self> {
        if symbols.is_empty() {
            return Err(NacreError::InvalidInput(
                "similarity matrix symbol set must not be empty".into(),
            ));
        }
        if scores.len() != symbols.len() * symbols.len() {
            return Err(NacreError::InvalidInput(format!(
                "similarity matrix over {} symbols needs {} scores, got {}",
                symbols.len(),
                symbols.len() * symbols.len(),
                scores.len()
            )));
        }

        let mut index = [NO_INDEX; 256];
        let mut upper = Vec::with_capacity(symbols.len());
        for (i, &s) in symbols.iter().enumerate() {
            let u = s.to_ascii_uppercase();
            if index[u as usize] != NO_INDEX {
                return Err(NacreError::InvalidInput(format!(
                    "duplicate symbol '{}' in similarity matrix",
                    u as char
                )));
            }
            index[u as usize] = i as u8;
            index[u.to_ascii_lowercase() as usize] = i as u8;
            upper.push(u);
        }

        Ok(Self {
            name: name.into(),
            symbols: upper,
            index,
            scores,
        })
    }

    /// The EDNAFULL (NUC.4.4) matrix over the IUPAC DNA ambiguity alphabet.
    pub fn ambiguous_dna() -> Self {
        // The built-in tables are well formed, construction cannot fail.
        Self::new("AmbiguousDna", NUC44_DNA_SYMBOLS, NUC44.to_vec())
            .unwrap_or_else(|_| unreachable!())
    }

    /// The EDNAFULL (NUC.4.4) matrix over the IUPAC RNA ambiguity alphabet.
    pub fn ambiguous_rna() -> Self {
        Self::new("AmbiguousRna", NUC44_RNA_SYMBOLS, NUC44.to_vec())
            .unwrap_or_else(|_| unreachable!())
    }

    /// Matrix name (e.g. "AmbiguousDna").
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The uppercase symbols this matrix covers, in row order.
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Score a pair of symbols. Case-insensitive.
    ///
    /// Returns the worst score in the table for uncovered symbols; callers
    /// that need a hard failure should check coverage with
    /// [`first_uncovered`](Self::first_uncovered) first.
    pub fn score(&self, a: u8, b: u8) -> i32 {
        let i = self.index[a as usize];
        let j = self.index[b as usize];
        if i == NO_INDEX || j == NO_INDEX {
            return self.worst_score();
        }
        self.scores[i as usize * self.symbols.len() + j as usize]
    }

    /// Score of a symbol against itself.
    pub fn self_score(&self, a: u8) -> i32 {
        self.score(a, a)
    }

    fn worst_score(&self) -> i32 {
        self.scores.iter().copied().min().unwrap_or(0)
    }

    /// The first symbol of `seq` not covered by this matrix, if any.
    pub fn first_uncovered(&self, seq: &[u8]) -> Option<u8> {
        seq.iter()
            .copied()
            .find(|&b| self.index[b as usize] == NO_INDEX)
    }
}

#[cfg(feature = "serde")]
mod serde_index {
    pub fn serialize<S: serde::Serializer>(
        index: &[u8; 256],
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serde::Serialize::serialize(index.as_slice(), serializer)
    }

    pub fn deserialize<'de, D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<[u8; 256], D::Error> {
        let v: Vec<u8> = serde::Deserialize::deserialize(deserializer)?;
        v.try_into()
            .map_err(|_| serde::de::Error::custom("index table must have 256 entries"))
    }
}

/// Alphabets the anchored aligner accepts, with their default scoring.
///
/// Implemented for DNA and RNA only; protein input is rejected at the type
/// level.
pub trait NucleotideAlphabet: Alphabet {
    /// The similarity matrix used when none is configured.
    fn default_matrix() -> SimilarityMatrix;
}

impl NucleotideAlphabet for DnaAlphabet {
    fn default_matrix() -> SimilarityMatrix {
        SimilarityMatrix::ambiguous_dna()
    }
}

impl NucleotideAlphabet for RnaAlphabet {
    fn default_matrix() -> SimilarityMatrix {
        SimilarityMatrix::ambiguous_rna()
    }
}
