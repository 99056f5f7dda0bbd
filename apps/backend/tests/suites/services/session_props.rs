// Whole-session properties: any seed, any table behavior, one verdict.

use proptest::prelude::*;
use seraph::config::GameConfig;
use seraph::domain::roles::Role;
use seraph::domain::win::GameOverReason;
use seraph::domain::GameEvent;

use crate::common::proptest_prelude::proptest_prelude_config;
use crate::support::session_driver::{events, play_to_end, seated, Policy};

fn config_strategy() -> impl Strategy<Value = GameConfig> {
    prop_oneof![Just(GameConfig::for_tests()), Just(GameConfig::default())]
}

proptest! {
    #![proptest_config(proptest_prelude_config())]

    #[test]
    fn every_session_ends_with_a_consistent_verdict(
        config in config_strategy(),
        seed in any::<u64>(),
        policy_seed in any::<u64>(),
        approve_rate in 0.5f64..=1.0,
        idle_rate in 0.0f64..0.3,
    ) {
        let (flow, _) = seated(config.clone(), seed);
        let mut policy = Policy::new(policy_seed);
        policy.approve_rate = approve_rate;
        policy.idle_rate = idle_rate;
        let played = play_to_end(flow, &mut policy);

        let state = played.flow.state();
        let summary = &played.summary;
        let god_alive = state.roster.holder_of(Role::God).map(|p| p.alive);

        prop_assert_eq!(summary.winner, summary.reason.winner());
        prop_assert_eq!(state.good_deeds + state.evil_deeds, state.completed_turns);
        prop_assert!(state.disclosed_demons.len() <= config.demon_disclosure_cap);
        prop_assert!(summary.stats.players_killed <= 1);
        prop_assert_eq!(
            state.roster.players().iter().filter(|p| !p.alive).count(),
            summary.stats.players_killed
        );

        match summary.reason {
            GameOverReason::EvilDeeds => {
                prop_assert_eq!(state.evil_deeds, config.evil_win_threshold);
            }
            GameOverReason::GoodDeeds => {
                prop_assert_eq!(state.good_deeds, config.good_win_threshold);
                prop_assert!(state.evil_deeds < config.evil_win_threshold);
            }
            GameOverReason::GodSlain => prop_assert_eq!(god_alive, Some(false)),
            GameOverReason::GodIdentified => prop_assert_eq!(god_alive, Some(true)),
        }

        let order = &state.turn_order;
        prop_assert_eq!(order, &played.opening_order);
        prop_assert_eq!(order.len(), config.roster_capacity);
        let mut seats = order.ids().to_vec();
        seats.sort();
        seats.dedup();
        let mut members = state.roster.players().iter().map(|p| p.id).collect::<Vec<_>>();
        members.sort();
        prop_assert_eq!(seats, members);
        prop_assert!(state.current_turn_index < order.len());

        let game_overs = events(&played.effects)
            .filter(|e| matches!(e, GameEvent::GameOver(_)))
            .count();
        prop_assert_eq!(game_overs, 1);

        let mut last = (0, 0);
        for event in events(&played.effects) {
            if let GameEvent::TokenRevealed { good_deeds, evil_deeds, .. } = event {
                prop_assert_eq!(good_deeds + evil_deeds, last.0 + last.1 + 1);
                last = (*good_deeds, *evil_deeds);
            }
        }
    }
}
