//! Property tests for the token elimination relay.
//!
//! - A draw yields exactly `draw_count` tokens from the configured bag.
//! - Exactly `draw_count - 1` removals are accepted before the reveal.
//! - The leader owns the first removal and the executor owns the rest.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::DeckConfig;
use crate::domain::deck::{Deck, Removal, SelectionStep, Token};
use crate::domain::test_prelude;

fn deck_config() -> impl Strategy<Value = DeckConfig> {
    (0usize..=12, 0usize..=12)
        .prop_filter_map("bag needs two tokens", |(good, evil)| {
            (good + evil >= 2).then_some((good, evil))
        })
        .prop_flat_map(|(good, evil)| {
            (2..=good + evil).prop_map(move |draw| DeckConfig {
                good_tokens: good,
                evil_tokens: evil,
                draw_count: draw,
            })
        })
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    #[test]
    fn prop_draw_respects_composition(config in deck_config(), seed in any::<u64>()) {
        let deck = Deck::draw(&config, &mut ChaCha8Rng::seed_from_u64(seed));
        prop_assert_eq!(deck.len(), config.draw_count);
        let good = deck.tokens().iter().filter(|t| **t == Token::Good).count();
        let evil = deck.len() - good;
        prop_assert!(good <= config.good_tokens);
        prop_assert!(evil <= config.evil_tokens);
    }

    #[test]
    fn prop_relay_accepts_draw_minus_one_removals(
        config in deck_config(),
        seed in any::<u64>(),
        positions in proptest::collection::vec(0usize..16, 0..40),
    ) {
        let mut deck = Deck::draw(&config, &mut ChaCha8Rng::seed_from_u64(seed));
        let mut accepted = 0usize;
        let mut steps = Vec::new();

        for pos in positions.into_iter().chain(std::iter::repeat_n(0, config.draw_count)) {
            let Some(step) = deck.step() else { break };
            let before = deck.len();
            match deck.remove_at(pos) {
                Some(removal) => {
                    accepted += 1;
                    steps.push(step);
                    prop_assert_eq!(deck.len(), before - 1);
                    if let Removal::Continue { remaining, .. } = removal {
                        prop_assert_eq!(remaining, deck.len());
                    }
                }
                None => prop_assert!(pos >= before),
            }
        }

        prop_assert_eq!(accepted, config.draw_count - 1);
        prop_assert_eq!(steps.first(), Some(&SelectionStep::Leader));
        prop_assert!(steps.iter().skip(1).all(|s| *s == SelectionStep::Executor));
        prop_assert!(deck.take_final().is_some());
        prop_assert!(deck.is_empty());
    }
}
