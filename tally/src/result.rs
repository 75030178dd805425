//! Per-candidate tally rows.

use ballot_types::{CandidateId, ChartColor};
use serde::Serialize;

/// One candidate's standing in the current snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResult {
    pub candidate_id: CandidateId,
    pub display_name: String,
    pub count: u64,
    /// Share of all participants, rounded to one decimal.
    pub percentage: f64,
    /// Fixed by the candidate's list position, not by rank.
    pub color: ChartColor,
}

/// `count / total * 100` rounded to one decimal; 0 when `total` is 0.
pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_total_is_zero() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(5, 0), 0.0);
    }

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(1, 8), 12.5);
        assert_eq!(percentage(4, 4), 100.0);
    }

    #[test]
    fn divides_before_scaling() {
        assert_eq!(percentage(23, 80), 28.7);
        assert_eq!(percentage(41, 80), 51.2);
    }
}
