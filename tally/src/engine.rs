//! The tally reducer.

use std::collections::HashMap;

use ballot_types::{Candidate, CandidateId, ChartColor, Role, Vote};

use crate::result::{percentage, VoteResult};

/// Count `votes` for `candidates`, choosing each vote's candidate with
/// `selector`.
///
/// Returns one row per candidate, highest count first. Equal counts keep
/// candidate-list order. Percentages are relative to `votes.len()`, so
/// votes for unknown ids still count as participants.
pub fn tally<F>(candidates: &[Candidate], votes: &[Vote], selector: F) -> Vec<VoteResult>
where
    F: Fn(&Vote) -> &CandidateId,
{
    let index: HashMap<&CandidateId, usize> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| (&c.id, i))
        .collect();

    let mut counts = vec![0u64; candidates.len()];
    for vote in votes {
        if let Some(&i) = index.get(selector(vote)) {
            counts[i] += 1;
        }
    }

    let total = votes.len() as u64;
    let mut results: Vec<VoteResult> = candidates
        .iter()
        .zip(counts)
        .enumerate()
        .map(|(i, (candidate, count))| VoteResult {
            candidate_id: candidate.id.clone(),
            display_name: candidate.display_name(),
            count,
            percentage: percentage(count, total),
            color: ChartColor::for_index(i),
        })
        .collect();

    // Stable: ties stay in list order.
    results.sort_by(|a, b| b.count.cmp(&a.count));
    results
}

/// [`tally`] selecting the vote's choice for `role`.
pub fn tally_role(candidates: &[Candidate], votes: &[Vote], role: Role) -> Vec<VoteResult> {
    tally(candidates, votes, |vote| vote.selection(role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_types::{CandidateRegistry, NewVote, ServerTimestamp, CHART_COLORS};

    fn vote(p: &str, v: &str) -> Vote {
        NewVote::new(p.into(), v.into()).stamp(ServerTimestamp::ZERO)
    }

    fn ids(results: &[VoteResult]) -> Vec<&str> {
        results.iter().map(|r| r.candidate_id.as_str()).collect()
    }

    #[test]
    fn reference_scenario() {
        let registry = CandidateRegistry::builtin();
        let votes = vec![
            vote("p2", "v1"),
            vote("p2", "v1"),
            vote("p1", "v1"),
            vote("unknown", "v1"),
        ];
        let results = tally_role(registry.candidates(Role::President), &votes, Role::President);

        assert_eq!(ids(&results), ["p2", "p1", "p3", "p4"]);
        let counts: Vec<u64> = results.iter().map(|r| r.count).collect();
        assert_eq!(counts, [2, 1, 0, 0]);
        let pcts: Vec<f64> = results.iter().map(|r| r.percentage).collect();
        assert_eq!(pcts, [50.0, 25.0, 0.0, 0.0]);
    }

    #[test]
    fn empty_votes_yield_zero_rows_in_list_order() {
        let registry = CandidateRegistry::builtin();
        let results = tally_role(registry.candidates(Role::VicePresident), &[], Role::VicePresident);
        assert_eq!(ids(&results), ["v1", "v2", "v3", "v4"]);
        assert!(results.iter().all(|r| r.count == 0 && r.percentage == 0.0));
    }

    #[test]
    fn color_follows_list_position_not_rank() {
        let registry = CandidateRegistry::builtin();
        let votes = vec![vote("p4", "v1"), vote("p4", "v1"), vote("p3", "v1")];
        let results = tally_role(registry.candidates(Role::President), &votes, Role::President);
        assert_eq!(results[0].candidate_id.as_str(), "p4");
        assert_eq!(results[0].color, CHART_COLORS[3]);
        assert_eq!(results[1].candidate_id.as_str(), "p3");
        assert_eq!(results[1].color, CHART_COLORS[2]);
    }

    #[test]
    fn custom_selector() {
        let registry = CandidateRegistry::builtin();
        let votes = vec![vote("p1", "v3"), vote("p1", "v3"), vote("p2", "v2")];
        let results = tally(registry.candidates(Role::VicePresident), &votes, |v| {
            &v.vice_president_id
        });
        assert_eq!(results[0].candidate_id.as_str(), "v3");
        assert_eq!(results[0].count, 2);
        assert_eq!(results[0].display_name, "기호 3번 정요엘");
        assert_eq!(results[0].percentage, 66.7);
    }

    #[test]
    fn role_mismatch_counts_nothing() {
        let registry = CandidateRegistry::builtin();
        let votes = vec![vote("p1", "v1")];
        // Vice-president ids never match president candidates.
        let results = tally(registry.candidates(Role::President), &votes, |v| {
            &v.vice_president_id
        });
        assert!(results.iter().all(|r| r.count == 0));
    }
}
