//! Validated sequence types and the suffix-tree index for the Nacre crates.
//!
//! Provides strongly-typed, validated biological sequence types with IUPAC
//! alphabet support, plus the reference index used for match finding:
//!
//! - **Alphabets** — [`DnaAlphabet`], [`RnaAlphabet`], [`ProteinAlphabet`]
//! - **Sequences** — [`DnaSequence`], [`RnaSequence`], [`ProteinSequence`]
//! - **Suffix tree** — [`SuffixTree`] built with Ukkonen's algorithm,
//!   streaming [`SuffixMatch`] queries
//!
//! # Example
//!
//! ```
//! use nacre_seq::{DnaSequence, SuffixTree};
//!
//! let reference = DnaSequence::new(b"ttgactgcatccgtgaagct").unwrap();
//! let query = DnaSequence::new(b"TTGACTGCATNCCGTGAAGCT").unwrap();
//!
//! let tree = SuffixTree::build(&reference).unwrap();
//! let matches = tree.unique_matches(&query, 8);
//! assert_eq!(matches.len(), 2);
//! ```

pub mod alphabet;
pub mod seq;
pub mod suffix_tree;
pub mod types;

// Re-export alphabet types
pub use alphabet::{Alphabet, DnaAlphabet, ProteinAlphabet, RnaAlphabet, GAP};

// Re-export the generic sequence type
pub use seq::ValidatedSeq;

// Re-export concrete type aliases
pub use types::{DnaSequence, ProteinSequence, RnaSequence};

// Re-export the suffix tree index
pub use suffix_tree::{SuffixMatch, SuffixTree, SENTINEL};
