//! Role assignment quotas and shuffle behavior.

use parley_games::games::werewolf::{COHORT_SIZE, ROLE_QUOTAS, Role, assign_roles};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;

fn cohort() -> Vec<String> {
    (1..=COHORT_SIZE).map(|i| format!("p{i}")).collect()
}

#[test]
fn every_seed_fills_the_role_quotas_exactly() {
    let players = cohort();
    for seed in 0..16 {
        let roles = assign_roles(&players, &mut StdRng::seed_from_u64(seed));

        // Every player holds exactly one role.
        assert_eq!(roles.len(), COHORT_SIZE);
        for player in &players {
            assert!(roles.contains_key(player));
        }

        let mut counts: HashMap<Role, usize> = HashMap::new();
        for role in roles.values() {
            *counts.entry(*role).or_default() += 1;
        }
        for (role, quota) in ROLE_QUOTAS {
            assert_eq!(counts.get(role), Some(quota), "quota for {role}");
        }
    }
}

#[test]
fn assignment_depends_on_the_seed() {
    let players = cohort();
    let assignments: Vec<HashMap<String, Role>> = (0..4)
        .map(|seed| assign_roles(&players, &mut StdRng::seed_from_u64(seed)))
        .collect();
    assert!(
        assignments.iter().any(|a| a != &assignments[0]),
        "four seeds produced identical assignments"
    );
}

#[test]
fn the_same_seed_reproduces_the_assignment() {
    let players = cohort();
    let first = assign_roles(&players, &mut StdRng::seed_from_u64(99));
    let second = assign_roles(&players, &mut StdRng::seed_from_u64(99));
    assert_eq!(first, second);
}
