use std::collections::HashSet;

use seraph::config::GameConfig;
use seraph::domain::roles::Role;
use seraph::domain::state::Phase;
use seraph::domain::{Audience, GameEvent};
use seraph::services::game_flow::{FlowEffect, TimerKind};

use crate::support::session_driver::{events, play_to_end, seated, Policy};

#[test]
fn seeded_sessions_replay_identically() {
    let run = |seed| {
        let (flow, _) = seated(GameConfig::default(), seed);
        play_to_end(flow, &mut Policy::new(seed)).effects
    };
    assert_eq!(run(11), run(11));
    assert_ne!(run(11), run(12));
}

#[test]
fn roles_are_dealt_privately_once_each() {
    let (mut flow, ids) = seated(GameConfig::default(), 3);
    let delay = flow.config().deadlines.start_delay_secs;
    for _ in 0..delay {
        flow.tick().unwrap();
    }
    assert_eq!(flow.state().phase, Phase::Nomination);

    let effects = flow.drain();
    let mut briefed = HashSet::new();
    for effect in &effects {
        let FlowEffect::Emit(out) = effect else { continue };
        let GameEvent::RoleAssigned(briefing) = &out.event else { continue };
        let Audience::Only(id) = out.audience else {
            panic!("role briefing broadcast to everyone");
        };
        assert!(briefed.insert(id), "player briefed twice");
        assert_eq!(flow.state().roster.get(id).unwrap().role, Some(briefing.role));
    }
    assert_eq!(briefed, ids.into_iter().collect());

    let roles: Vec<Role> = flow.state().roster.players().iter().filter_map(|p| p.role).collect();
    assert_eq!(roles.iter().filter(|r| **r == Role::God).count(), 1);
    assert_eq!(roles.iter().filter(|r| **r == Role::Lucifer).count(), 1);
}

#[test]
fn ten_player_game_plays_to_a_verdict() {
    let (flow, _) = seated(GameConfig::default(), 2024);
    let played = play_to_end(flow, &mut Policy::new(9));

    let state = played.flow.state();
    assert_eq!(state.phase, Phase::GameOver);
    assert_eq!(played.summary.winner, played.summary.reason.winner());
    assert_eq!(played.summary.players.len(), 10);
    assert!(played.summary.players.iter().all(|p| p.role.is_some()));
    assert_eq!(played.summary.room_code, "PLAY01");
}

#[test]
fn idle_table_is_carried_by_deadlines() {
    let (flow, _) = seated(GameConfig::for_tests(), 5);
    let mut policy = Policy::new(5);
    policy.idle_rate = 1.0;
    let played = play_to_end(flow, &mut policy);

    let names: Vec<&str> = events(&played.effects).map(GameEvent::name).collect();
    assert!(names.contains(&"timer_update"));
    assert!(names.contains(&"token_revealed"));
    assert!(events(&played.effects).any(|e| matches!(
        e,
        GameEvent::TokenRemoved { timed_out: true, .. }
    )));
}

#[test]
fn finished_session_tears_down_after_grace() {
    let (flow, _) = seated(GameConfig::for_tests(), 8);
    let mut played = play_to_end(flow, &mut Policy::new(8));
    let grace = played.flow.config().deadlines.teardown_grace_secs;
    assert_eq!(
        played.flow.armed_timer().map(|d| d.kind),
        Some(TimerKind::Teardown)
    );

    for _ in 0..grace - 1 {
        played.flow.tick().unwrap();
    }
    assert!(!played.flow.is_torn_down());
    played.flow.tick().unwrap();
    assert!(played.flow.is_torn_down());
    assert!(played.flow.drain().contains(&FlowEffect::Teardown));
}
