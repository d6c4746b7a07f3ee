//! Multiset F1 scoring between predicted and reference token sequences.

use rustc_hash::FxHashMap;

/// Harmonic mean of multiset precision and recall.
///
/// Token order is ignored; each occurrence counts once.  Identical multisets
/// score 1.0 (two empty sequences included), sequences with no overlap score
/// 0.0, and every result lies in `[0, 1]`.
#[must_use]
pub fn f1<R: AsRef<str>, P: AsRef<str>>(reference: &[R], predicted: &[P]) -> f64 {
    if reference.is_empty() && predicted.is_empty() {
        return 1.0;
    }
    if reference.is_empty() || predicted.is_empty() {
        return 0.0;
    }

    let mut remaining: FxHashMap<&str, usize> = FxHashMap::default();
    for token in reference {
        *remaining.entry(token.as_ref()).or_insert(0) += 1;
    }
    let mut overlap = 0usize;
    for token in predicted {
        if let Some(count) = remaining.get_mut(token.as_ref()) {
            if *count > 0 {
                *count -= 1;
                overlap += 1;
            }
        }
    }
    if overlap == 0 {
        return 0.0;
    }

    let precision = overlap as f64 / predicted.len() as f64;
    let recall = overlap as f64 / reference.len() as f64;
    2.0 * precision * recall / (precision + recall)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_multisets_score_one() {
        let tokens = ["a", "b", "b", "c"];
        assert_eq!(f1(&tokens, &tokens), 1.0);
    }

    #[test]
    fn order_is_ignored() {
        assert_eq!(f1(&["a", "b"], &["b", "a"]), 1.0);
    }

    #[test]
    fn disjoint_multisets_score_zero() {
        assert_eq!(f1(&["a", "b"], &["c", "d"]), 0.0);
    }

    #[test]
    fn partial_overlap_scores_between() {
        // precision 1/2, recall 1/2 → F1 1/2.
        assert_eq!(f1(&["a", "b"], &["a", "c"]), 0.5);
    }

    #[test]
    fn duplicate_tokens_count_per_occurrence() {
        // overlap counts "a" once: precision 1/2, recall 1/3.
        let score = f1(&["a", "a", "a"], &["a", "b"]);
        assert!((score - 0.4).abs() < 1e-12);
    }

    #[test]
    fn scores_stay_in_unit_interval() {
        let cases: &[(&[&str], &[&str])] = &[
            (&[], &[]),
            (&["a"], &[]),
            (&[], &["a"]),
            (&["a", "b", "c"], &["a"]),
            (&["a"], &["a", "b", "c"]),
        ];
        for (reference, predicted) in cases {
            let score = f1(reference, predicted);
            assert!((0.0..=1.0).contains(&score));
        }
    }
}
