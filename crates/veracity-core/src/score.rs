//! Score aggregation.

use crate::{ParaphraseMatch, QuoteMatch, ReferenceEntry};

/// Valid-reference ratio above which the reference list is treated as
/// mitigating rather than aggravating.
const VALID_RATIO_CUTOFF: f64 = 0.8;

/// Combine the three analysis results into a bounded originality score.
///
/// `score = min(100, 2.0 * |quotes| + 1.5 * |paraphrases| + penalty)` where
/// the penalty is 0 for an absent reference list, 10 for a mostly-valid one,
/// and 30 otherwise. This is an additive heuristic kept for compatibility,
/// not a calibrated probability; do not re-weight it without new evidence.
pub fn aggregate_score(
    quotes: &[QuoteMatch],
    paraphrases: &[ParaphraseMatch],
    references: &[ReferenceEntry],
) -> f64 {
    let reference_penalty = if references.is_empty() {
        0.0
    } else {
        let valid = references.iter().filter(|r| r.is_valid).count();
        if valid as f64 / references.len() as f64 > VALID_RATIO_CUTOFF {
            10.0
        } else {
            30.0
        }
    };

    (2.0 * quotes.len() as f64 + 1.5 * paraphrases.len() as f64 + reference_penalty).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(n: usize) -> Vec<QuoteMatch> {
        (0..n)
            .map(|i| QuoteMatch {
                text: format!("quote {i}"),
                sources: vec!["src".into()],
            })
            .collect()
    }

    fn para(n: usize) -> Vec<ParaphraseMatch> {
        (0..n)
            .map(|i| ParaphraseMatch {
                text: format!("para {i}"),
                sources: vec![],
                similarity: 0.9,
            })
            .collect()
    }

    fn refs(valid: usize, invalid: usize) -> Vec<ReferenceEntry> {
        let mut out: Vec<ReferenceEntry> = (0..valid)
            .map(|i| ReferenceEntry {
                raw_text: format!("valid {i}"),
                is_valid: true,
            })
            .collect();
        out.extend((0..invalid).map(|i| ReferenceEntry {
            raw_text: format!("invalid {i}"),
            is_valid: false,
        }));
        out
    }

    #[test]
    fn empty_inputs_score_zero() {
        assert_eq!(aggregate_score(&[], &[], &[]), 0.0);
    }

    #[test]
    fn quotes_weigh_more_than_paraphrases() {
        assert_eq!(aggregate_score(&quote(3), &[], &[]), 6.0);
        assert_eq!(aggregate_score(&[], &para(3), &[]), 4.5);
        assert_eq!(aggregate_score(&quote(2), &para(2), &[]), 7.0);
    }

    #[test]
    fn mostly_valid_references_get_small_penalty() {
        // 9/10 valid = 0.9 > 0.8
        assert_eq!(aggregate_score(&[], &[], &refs(9, 1)), 10.0);
    }

    #[test]
    fn half_valid_references_get_large_penalty() {
        // 1/2 valid = 0.5, not > 0.8
        assert_eq!(aggregate_score(&[], &[], &refs(1, 1)), 30.0);
    }

    #[test]
    fn exact_cutoff_is_not_mostly_valid() {
        // 4/5 = 0.8 exactly; the comparison is strict
        assert_eq!(aggregate_score(&[], &[], &refs(4, 1)), 30.0);
    }

    #[test]
    fn score_is_clamped_to_100() {
        assert_eq!(aggregate_score(&quote(80), &para(40), &refs(0, 5)), 100.0);
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let q = quote(4);
        let p = para(7);
        let r = refs(3, 2);
        let first = aggregate_score(&q, &p, &r);
        for _ in 0..10 {
            assert_eq!(aggregate_score(&q, &p, &r), first);
        }
        assert!((0.0..=100.0).contains(&first));
    }
}
