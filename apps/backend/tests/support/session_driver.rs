// Drives a GameFlow to completion through its public API only.

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use seraph::config::GameConfig;
use seraph::domain::player_view::{token_actor, GameOverSummary};
use seraph::domain::roster::PlayerId;
use seraph::domain::state::Phase;
use seraph::domain::turn::TurnOrder;
use seraph::domain::GameEvent;
use seraph::services::game_flow::{FlowEffect, GameFlow, PlayerAction};
use uuid::Uuid;

/// Upper bound on driver steps before a session is considered stuck.
pub const MAX_STEPS: usize = 2_000;

pub fn pid(n: usize) -> PlayerId {
    Uuid::from_u128(n as u128)
}

/// Seat a full roster; the game starts on the next ticks.
pub fn seated(config: GameConfig, seed: u64) -> (GameFlow, Vec<PlayerId>) {
    let n = config.roster_capacity;
    let mut flow = GameFlow::new("PLAY01", "P1", Arc::new(config), Some(seed));
    let ids: Vec<PlayerId> = (1..=n).map(pid).collect();
    for (i, id) in ids.iter().enumerate() {
        flow.join(*id, &format!("P{}", i + 1))
            .expect("seat player");
    }
    (flow, ids)
}

pub fn events(effects: &[FlowEffect]) -> impl Iterator<Item = &GameEvent> {
    effects.iter().filter_map(|e| match e {
        FlowEffect::Emit(o) => Some(&o.event),
        FlowEffect::Teardown => None,
    })
}

/// How participants behave when it is their move.
pub struct Policy {
    rng: ChaCha8Rng,
    /// Chance that any single vote approves.
    pub approve_rate: f64,
    /// Chance that an actor lets the deadline run out instead of acting.
    pub idle_rate: f64,
}

impl Policy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            approve_rate: 1.0,
            idle_rate: 0.0,
        }
    }

    fn pick(&mut self, from: &[PlayerId]) -> PlayerId {
        from[self.rng.random_range(0..from.len())]
    }

    fn idles(&mut self) -> bool {
        self.idle_rate > 0.0 && self.rng.random_bool(self.idle_rate)
    }
}

/// Everything the driver saw while playing one session.
pub struct Played {
    pub flow: GameFlow,
    pub effects: Vec<FlowEffect>,
    pub summary: GameOverSummary,
    pub steps: usize,
    /// Turn order as drawn when the start delay ended.
    pub opening_order: TurnOrder,
}

/// Play until `game_over`, acting for whoever holds the move.
pub fn play_to_end(mut flow: GameFlow, policy: &mut Policy) -> Played {
    let mut effects = Vec::new();
    let mut opening_order: Option<TurnOrder> = None;

    for step in 0..MAX_STEPS {
        effects.extend(flow.drain());
        if opening_order.is_none() && flow.state().phase != Phase::Waiting {
            opening_order = Some(flow.state().turn_order.clone());
        }
        let game_over = events(&effects).find_map(|e| match e {
            GameEvent::GameOver(s) => Some(s.clone()),
            _ => None,
        });
        if let Some(summary) = game_over {
            return Played {
                flow,
                effects,
                summary,
                steps: step,
                opening_order: opening_order.expect("session started"),
            };
        }

        let state = flow.state();
        let living = state.roster.alive_ids();
        let leader = state.leader_id();
        let phase = state.phase;

        if phase == Phase::Nomination {
            let seat = state
                .turn_order
                .at(state.current_turn_index)
                .expect("turn index within the order");
            assert!(
                state.roster.is_alive(seat),
                "turn index {} points at a dead player",
                state.current_turn_index
            );
        }

        let acted = match phase {
            Phase::Nomination if !policy.idles() => {
                let lead = leader.expect("leader during nomination");
                let others: Vec<_> = living.iter().copied().filter(|id| *id != lead).collect();
                let target = policy.pick(&others);
                flow.apply(lead, PlayerAction::Nominate { target })
                    .expect("nominate")
                    .is_applied()
            }
            Phase::Voting if !policy.idles() => {
                for id in living {
                    let approve = policy.rng.random_bool(policy.approve_rate);
                    flow.apply(id, PlayerAction::Vote { approve }).expect("vote");
                    if flow.state().phase != Phase::Voting {
                        break;
                    }
                }
                true
            }
            Phase::CardSelection if !policy.idles() => {
                let holder = token_actor(state).expect("token holder");
                let len = state.deck.as_ref().map_or(0, |d| d.len());
                let position = policy.rng.random_range(0..len);
                flow.apply(holder, PlayerAction::SelectToken { position })
                    .expect("select token")
                    .is_applied()
            }
            Phase::Kill if !policy.idles() => {
                let lead = leader.expect("leader during kill");
                let target = policy.pick(&living);
                flow.apply(lead, PlayerAction::Kill { target })
                    .expect("kill")
                    .is_applied()
            }
            Phase::GodGuess if !policy.idles() => {
                let guessers: Vec<_> = state.roster.living_conspiracy().map(|p| p.id).collect();
                for id in guessers {
                    let target = policy.pick(&living);
                    flow.apply(id, PlayerAction::GuessGod { target })
                        .expect("guess");
                }
                true
            }
            _ => false,
        };

        if !acted {
            flow.tick().expect("tick");
        }
    }

    panic!("session did not finish within {MAX_STEPS} steps");
}
