use crate::models::Outcome;

/// Summary figures for an accepted outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeStats {
    /// Per-rank share of assigned entities, in percent
    pub rank_percentages: Vec<f64>,
    pub unassigned: usize,
    /// Weighted mean rank over considered entities; `None` when nobody took part
    pub quality_factor: Option<f64>,
}

impl OutcomeStats {
    /// `weighted_ranks` bounds how many leading ranks enter the quality factor.
    pub fn from_outcome(outcome: &Outcome, weighted_ranks: usize) -> Self {
        Self {
            rank_percentages: rank_percentages(&outcome.rank_vector),
            unassigned: outcome.unassigned,
            quality_factor: quality_factor(&outcome.rank_vector, outcome.considered(), weighted_ranks),
        }
    }
}

/// Share of assignments made at each rank; all zero when nothing was assigned.
pub fn rank_percentages(rank_vector: &[usize]) -> Vec<f64> {
    let total: usize = rank_vector.iter().sum();
    if total == 0 {
        return vec![0.0; rank_vector.len()];
    }

    rank_vector
        .iter()
        .map(|&count| 100.0 * count as f64 / total as f64)
        .collect()
}

/// Sum of `count * rank` over the first `weighted_ranks` ranks divided by the
/// number of considered entities. 1.0 means everyone got a first choice.
pub fn quality_factor(rank_vector: &[usize], considered: usize, weighted_ranks: usize) -> Option<f64> {
    if considered == 0 {
        return None;
    }

    let weighted: usize = rank_vector
        .iter()
        .take(weighted_ranks)
        .enumerate()
        .map(|(i, &count)| count * (i + 1))
        .sum();

    Some(weighted as f64 / considered as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Grant, Placement};

    #[test]
    fn percentages_split_assigned_entities() {
        assert_eq!(rank_percentages(&[3, 1, 0]), vec![75.0, 25.0, 0.0]);
    }

    #[test]
    fn percentages_guard_against_nothing_assigned() {
        assert_eq!(rank_percentages(&[0, 0]), vec![0.0, 0.0]);
        assert!(rank_percentages(&[]).is_empty());
    }

    #[test]
    fn quality_factor_is_one_when_all_get_first_choice() {
        assert_eq!(quality_factor(&[4, 0, 0], 4, 3), Some(1.0));
    }

    #[test]
    fn quality_factor_weights_leading_ranks_only() {
        // 2*1 + 1*2 + 1*3 over 5 considered, the fourth rank is not weighted
        assert_eq!(quality_factor(&[2, 1, 1, 1], 5, 3), Some(7.0 / 5.0));
        assert_eq!(quality_factor(&[2, 1, 1, 1], 5, 4), Some(11.0 / 5.0));
    }

    #[test]
    fn quality_factor_undefined_without_entities() {
        assert_eq!(quality_factor(&[0, 0, 0], 0, 3), None);
    }

    #[test]
    fn stats_follow_the_outcome() {
        let outcome = Outcome {
            placements: vec![
                Placement {
                    name: "B".to_string(),
                    grant: Some(Grant { resource: "X".to_string(), rank: 1 }),
                },
                Placement {
                    name: "A".to_string(),
                    grant: Some(Grant { resource: "Y".to_string(), rank: 2 }),
                },
                Placement { name: "C".to_string(), grant: None },
            ],
            rank_vector: vec![1, 1],
            unassigned: 1,
        };

        let stats = OutcomeStats::from_outcome(&outcome, 3);
        assert_eq!(stats.rank_percentages, vec![50.0, 50.0]);
        assert_eq!(stats.unassigned, 1);
        assert_eq!(stats.quality_factor, Some(1.0));
    }
}
