//! Vote aggregation across classifiers
//!
//! Categories are tallied in the order they are first encountered and the
//! earliest category wins a tie, so callers control precedence through
//! the order of their votes.

use serde::{Deserialize, Serialize};
use types::classification::ClassificationCategory;
use types::comparison::Consensus;

/// One classifier's weighted vote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub source: String,
    pub category: ClassificationCategory,
    pub weight: f64,
}

impl Vote {
    pub fn new(source: impl Into<String>, category: ClassificationCategory, weight: f64) -> Self {
        Self {
            source: source.into(),
            category,
            weight,
        }
    }
}

fn tally(votes: impl Iterator<Item = (ClassificationCategory, f64)>) -> Option<Consensus> {
    let mut totals: Vec<(ClassificationCategory, f64)> = Vec::new();
    for (category, weight) in votes {
        let weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
        match totals.iter_mut().find(|(c, _)| *c == category) {
            Some((_, total)) => *total += weight,
            None => totals.push((category, weight)),
        }
    }

    let (first, rest) = totals.split_first()?;
    let mut winner = *first;
    for candidate in rest {
        if candidate.1 > winner.1 {
            winner = *candidate;
        }
    }

    Some(Consensus {
        category: winner.0,
        support: winner.1,
        total: totals.iter().map(|(_, w)| w).sum(),
        unanimous: totals.len() == 1,
    })
}

/// Plain majority by label count; `None` for no votes
pub fn majority_vote(votes: &[ClassificationCategory]) -> Option<Consensus> {
    tally(votes.iter().map(|c| (*c, 1.0)))
}

/// Majority by summed vote weight; `None` for no votes
pub fn weighted_vote(votes: &[Vote]) -> Option<Consensus> {
    tally(votes.iter().map(|v| (v.category, v.weight)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ClassificationCategory::*;

    #[test]
    fn test_unanimous_vote() {
        let consensus = majority_vote(&[Restricted, Restricted, Restricted]).unwrap();
        assert_eq!(consensus.category, Restricted);
        assert!(consensus.unanimous);
        assert_eq!(consensus.agreement(), 1.0);
    }

    #[test]
    fn test_two_against_one() {
        let consensus = majority_vote(&[Confidential, Official, Official]).unwrap();
        assert_eq!(consensus.category, Official);
        assert_eq!(consensus.support, 2.0);
        assert!(!consensus.unanimous);
    }

    #[test]
    fn test_three_way_split_takes_first_vote() {
        let consensus = majority_vote(&[Confidential, Official, Public]).unwrap();
        assert_eq!(consensus.category, Confidential);
        assert_eq!(consensus.support, 1.0);
        assert_eq!(consensus.total, 3.0);
    }

    #[test]
    fn test_empty_vote() {
        assert!(majority_vote(&[]).is_none());
        assert!(weighted_vote(&[]).is_none());
    }

    #[test]
    fn test_weight_can_outvote_count() {
        let votes = [
            Vote::new("fuzzy", Restricted, 2.5),
            Vote::new("svm", Confidential, 0.9),
            Vote::new("tree", Confidential, 1.0),
        ];
        let consensus = weighted_vote(&votes).unwrap();
        assert_eq!(consensus.category, Restricted);
        assert!((consensus.total - 4.4).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_weights_count_as_zero() {
        let votes = [
            Vote::new("a", Public, f64::NAN),
            Vote::new("b", Official, -3.0),
            Vote::new("c", Official, 0.5),
        ];
        let consensus = weighted_vote(&votes).unwrap();
        assert_eq!(consensus.category, Official);
        assert_eq!(consensus.support, 0.5);
    }
}
