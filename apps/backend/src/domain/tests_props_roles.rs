//! Property tests for role assignment.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::config::RoleCounts;
use crate::domain::role_assignment::assign_roles;
use crate::domain::roles::Role;
use crate::domain::roster::Roster;
use crate::domain::test_prelude;

const ALL_ROLES: [Role; 5] = [Role::God, Role::Archangel, Role::Angel, Role::Lucifer, Role::Demon];

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Every player gets one role and each kind matches the configured multiset.
    #[test]
    fn prop_assignment_matches_multiset(
        angels in 0usize..=6,
        demons in 0usize..=5,
        seed in any::<u64>(),
    ) {
        let counts = RoleCounts { angels, demons };
        let mut roster = Roster::new(counts.total());
        for i in 0..counts.total() {
            roster.add(Uuid::from_u128(i as u128 + 1), &format!("P{i}")).unwrap();
        }

        let assignment = assign_roles(&mut roster, &counts, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();

        prop_assert!(roster.players().iter().all(|p| p.role.is_some()));
        for role in ALL_ROLES {
            let held = roster.players().iter().filter(|p| p.has_role(role)).count();
            prop_assert_eq!(held, counts.count_of(role));
        }

        let conspiracy = 1 + demons;
        for player in roster.players() {
            let seen = assignment.known_allies(player.id).len();
            match player.role {
                Some(Role::Archangel) => prop_assert_eq!(seen, 1),
                Some(role) if role.is_conspiracy() => prop_assert_eq!(seen, conspiracy - 1),
                _ => prop_assert_eq!(seen, 0),
            }
        }
    }
}
