//! Property tests for the approval majority rule and the god-guess plurality.

use proptest::prelude::*;
use uuid::Uuid;

use crate::domain::tally::{GuessTally, VoteTally};
use crate::domain::test_prelude;

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// approved iff approvals >= ceil(total / 2), whatever the arrival order.
    #[test]
    fn prop_majority_rule(votes in proptest::collection::vec(any::<bool>(), 0..=12)) {
        let mut tally = VoteTally::new();
        for (i, approve) in votes.iter().enumerate() {
            tally.cast(Uuid::from_u128(i as u128), *approve);
        }
        let approvals = votes.iter().filter(|v| **v).count();
        let result = tally.result();
        prop_assert_eq!(result.total_votes, votes.len());
        prop_assert_eq!(result.approve_votes, approvals);
        prop_assert_eq!(result.approved, 2 * approvals >= votes.len());
    }

    /// Re-voting never grows the tally beyond the number of distinct voters.
    #[test]
    fn prop_duplicate_votes_overwrite(
        votes in proptest::collection::vec((0u128..5, any::<bool>()), 1..30),
    ) {
        let mut tally = VoteTally::new();
        let mut last = std::collections::HashMap::new();
        for (voter, approve) in &votes {
            tally.cast(Uuid::from_u128(*voter), *approve);
            last.insert(*voter, *approve);
        }
        prop_assert_eq!(tally.len(), last.len());
        prop_assert_eq!(tally.approve_votes(), last.values().filter(|v| **v).count());
    }

    /// The plurality target holds the maximum count and reached it first.
    #[test]
    fn prop_plurality_first_to_reach_max(targets in proptest::collection::vec(0u128..4, 1..12)) {
        let mut tally = GuessTally::new();
        for (guesser, target) in targets.iter().enumerate() {
            tally.cast(Uuid::from_u128(100 + guesser as u128), Uuid::from_u128(*target));
        }
        let winner = tally.plurality().unwrap();

        let mut counts = [0usize; 4];
        let mut reached_max_at = None;
        let max = {
            let mut totals = [0usize; 4];
            for t in &targets {
                totals[*t as usize] += 1;
            }
            *totals.iter().max().unwrap()
        };
        for (i, t) in targets.iter().enumerate() {
            counts[*t as usize] += 1;
            if counts[*t as usize] == max && reached_max_at.is_none() {
                reached_max_at = Some((i, *t));
            }
        }

        prop_assert_eq!(winner.votes, max);
        prop_assert_eq!(Some(winner.target), reached_max_at.map(|(_, t)| Uuid::from_u128(t)));
    }
}
