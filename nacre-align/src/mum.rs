//! Maximal unique match (MUM) value types and ordering.

use nacre_seq::SuffixMatch;

/// A maximal unique match between the reference and one query.
///
/// The matched string occurs exactly once in the reference and cannot be
/// extended on either side without losing the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaxUniqueMatch {
    /// Start of the match in the reference (0-based).
    pub reference_start: usize,
    /// Start of the match in the query (0-based).
    pub query_start: usize,
    /// Match length in bases.
    pub length: usize,
    /// 1-based rank in the containing list, stamped by [`collect_matches`]
    /// (streaming order) or [`sort_mums`] (reference order).
    pub order: usize,
}

/// The MUMs found for one query sequence, keyed by its position in the
/// input query list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MumReport {
    /// Index of the query in the input list.
    pub query_index: usize,
    /// Matches for this query; empty when none were found or the query was
    /// identical to the reference.
    pub matches: Vec<MaxUniqueMatch>,
}

/// Convert streamed suffix-tree matches into MUMs, stamping 1-based
/// streaming order.
pub fn collect_matches(matches: &[SuffixMatch]) -> Vec<MaxUniqueMatch> {
    matches
        .iter()
        .enumerate()
        .map(|(i, m)| MaxUniqueMatch {
            reference_start: m.reference_start,
            query_start: m.query_start,
            length: m.length,
            order: i + 1,
        })
        .collect()
}

/// Sort MUMs into ascending reference order (ties by query start) and
/// re-stamp their 1-based order.
///
/// The sort is stable, so equal keys keep their streaming order.
pub fn sort_mums(mut mums: Vec<MaxUniqueMatch>) -> Vec<MaxUniqueMatch> {
    mums.sort_by_key(|m| (m.reference_start, m.query_start));
    for (i, m) in mums.iter_mut().enumerate() {
        m.order = i + 1;
    }
    mums
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mum(reference_start: usize, query_start: usize, length: usize) -> MaxUniqueMatch {
        MaxUniqueMatch {
            reference_start,
            query_start,
            length,
            order: 0,
        }
    }

    #[test]
    fn collect_stamps_streaming_order() {
        let raw = vec![
            SuffixMatch { reference_start: 7, query_start: 0, length: 9 },
            SuffixMatch { reference_start: 2, query_start: 10, length: 8 },
        ];
        let mums = collect_matches(&raw);
        assert_eq!(mums[0].order, 1);
        assert_eq!(mums[1].order, 2);
        assert_eq!(mums[0].reference_start, 7);
    }

    #[test]
    fn sort_orders_by_reference_start() {
        let sorted = sort_mums(vec![mum(7, 0, 9), mum(2, 10, 8), mum(5, 20, 8)]);
        let starts: Vec<usize> = sorted.iter().map(|m| m.reference_start).collect();
        assert_eq!(starts, vec![2, 5, 7]);
        let orders: Vec<usize> = sorted.iter().map(|m| m.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn ties_break_by_query_start() {
        let sorted = sort_mums(vec![mum(4, 9, 5), mum(4, 3, 5)]);
        assert_eq!(sorted[0].query_start, 3);
        assert_eq!(sorted[1].query_start, 9);
    }

    #[test]
    fn empty_list_sorts_to_empty() {
        assert!(sort_mums(Vec::new()).is_empty());
    }
}
