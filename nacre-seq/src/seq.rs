//! Validated sequences, the inputs to match finding and alignment.
//!
//! [`ValidatedSeq<A>`] canonicalizes its bytes to uppercase at construction
//! and rejects anything outside alphabet `A`. Downstream code leans on
//! this: the suffix tree indexes raw bytes, so `acgt` and `ACGT` must be
//! the same sequence before they reach it, and the reference-identical
//! check in the aligner is plain byte equality on the canonical form.
//! `Deref<Target = [u8]>` exposes the bytes to the `&[u8]` APIs of the
//! tree and the aligner without copies.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Deref;

use nacre_core::{NacreError, Sequence, Summarizable};

use crate::alphabet::Alphabet;

/// A canonicalized (uppercase) sequence over alphabet `A`.
///
/// `ValidatedSeq<DnaAlphabet>` is a DNA sequence, `ValidatedSeq<RnaAlphabet>`
/// is RNA, etc. Once constructed the content never changes.
#[derive(Clone)]
pub struct ValidatedSeq<A: Alphabet> {
    data: Vec<u8>,
    _alphabet: PhantomData<A>,
}

impl<A: Alphabet> ValidatedSeq<A> {
    /// Uppercase `bytes` and validate them against the alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`NacreError::Parse`] naming the alphabet, the offending
    /// byte, and its position.
    ///
    /// ```
    /// use nacre_seq::{DnaSequence, SuffixTree};
    ///
    /// let reference = DnaSequence::new(b"ttgactgcat").unwrap();
    /// let tree = SuffixTree::build(&reference).unwrap();
    /// assert_eq!(tree.reference_len(), 10);
    ///
    /// assert!(DnaSequence::new(b"TTGA-CTG").is_err());
    /// ```
    pub fn new(bytes: impl AsRef<[u8]>) -> nacre_core::Result<Self> {
        let data: Vec<u8> = bytes.as_ref().iter().map(|b| b.to_ascii_uppercase()).collect();
        if let Some((i, b)) = A::first_invalid(&data) {
            return Err(NacreError::Parse(format!(
                "byte '{}' (0x{:02X}) at position {} is not a valid {} symbol",
                b as char, b, i, A::NAME
            )));
        }
        Ok(Self {
            data,
            _alphabet: PhantomData,
        })
    }

    /// Consume the sequence and return the inner byte vector.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl<A: Alphabet> Deref for ValidatedSeq<A> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl<A: Alphabet> AsRef<[u8]> for ValidatedSeq<A> {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl<A: Alphabet> Sequence for ValidatedSeq<A> {
    fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl<A: Alphabet> Summarizable for ValidatedSeq<A> {
    fn summary(&self) -> String {
        const PREVIEW: usize = 16;
        let head = &self.data[..self.data.len().min(PREVIEW)];
        let head = std::str::from_utf8(head).unwrap_or("???");
        let ellipsis = if self.data.len() > PREVIEW { "..." } else { "" };
        format!("{} ({} bp): {}{}", A::NAME, self.data.len(), head, ellipsis)
    }
}

impl<A: Alphabet> fmt::Debug for ValidatedSeq<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = std::str::from_utf8(&self.data).unwrap_or("???");
        write!(f, "{}(\"{}\")", A::NAME, s)
    }
}

impl<A: Alphabet> fmt::Display for ValidatedSeq<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = std::str::from_utf8(&self.data).unwrap_or("???");
        f.write_str(s)
    }
}

impl<A: Alphabet> PartialEq for ValidatedSeq<A> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<A: Alphabet> Eq for ValidatedSeq<A> {}

impl<A: Alphabet> Hash for ValidatedSeq<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.hash(state);
    }
}

#[cfg(feature = "serde")]
impl<A: Alphabet> serde::Serialize for ValidatedSeq<A> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let s = std::str::from_utf8(&self.data).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(s)
    }
}

#[cfg(feature = "serde")]
impl<'de, A: Alphabet> serde::Deserialize<'de> for ValidatedSeq<A> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s.as_bytes()).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::DnaAlphabet;
    use crate::suffix_tree::SuffixTree;

    type DnaSeq = ValidatedSeq<DnaAlphabet>;

    #[test]
    fn mixed_case_input_is_canonicalized() {
        let seq = DnaSeq::new(b"ttGacTGcat").unwrap();
        assert_eq!(seq.as_bytes(), b"TTGACTGCAT");
    }

    #[test]
    fn case_does_not_affect_anchor_matching() {
        // The tree sees canonical bytes, so a lowercase reference and an
        // uppercase query still share their anchors.
        let reference = DnaSeq::new(b"ttgactgcatccgtgaagct").unwrap();
        let query = DnaSeq::new(b"TTGACTGCATNCCGTGAAGCT").unwrap();
        let tree = SuffixTree::build(&reference).unwrap();
        assert_eq!(tree.unique_matches(&query, 8).len(), 2);
    }

    #[test]
    fn equality_is_content_equality() {
        let lower = DnaSeq::new(b"acgtn").unwrap();
        let upper = DnaSeq::new(b"ACGTN").unwrap();
        assert_eq!(lower, upper);
        assert_ne!(lower, DnaSeq::new(b"ACGTA").unwrap());
    }

    #[test]
    fn empty_sequence_is_allowed() {
        let seq = DnaSeq::new(b"").unwrap();
        assert!(seq.is_empty());
        assert_eq!(seq.len(), 0);
    }

    #[test]
    fn deref_feeds_slice_apis() {
        let seq = DnaSeq::new(b"ACGT").unwrap();
        let slice: &[u8] = &seq;
        assert_eq!(slice, b"ACGT");
        assert_eq!(seq[0], b'A');
    }

    #[test]
    fn gap_symbol_is_a_parse_error() {
        let err = DnaSeq::new(b"ACG-T").unwrap_err();
        assert!(matches!(err, NacreError::Parse(_)));
        let msg = err.to_string();
        assert!(msg.contains("'-'"), "message was: {}", msg);
        assert!(msg.contains("position 3"), "message was: {}", msg);
        assert!(msg.contains("DNA"), "message was: {}", msg);
    }

    #[test]
    fn display_shows_canonical_bytes() {
        let seq = DnaSeq::new(b"acGT").unwrap();
        assert_eq!(seq.to_string(), "ACGT");
        assert_eq!(format!("{:?}", seq), "DNA(\"ACGT\")");
    }

    #[test]
    fn summary_truncates_long_sequences() {
        let seq = DnaSeq::new(b"ACGT").unwrap();
        assert_eq!(seq.summary(), "DNA (4 bp): ACGT");

        let long = DnaSeq::new(b"ACGTACGTACGTACGTACGT").unwrap();
        assert_eq!(long.summary(), "DNA (20 bp): ACGTACGTACGTACGT...");
    }
}
