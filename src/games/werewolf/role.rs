//! Roles, factions and random role assignment.

use super::text;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use strum::Display;

/// Number of players a Werewolf game requires.
pub const COHORT_SIZE: usize = 12;

/// How many players each role receives, in assignment order.
pub const ROLE_QUOTAS: &[(Role, usize)] = &[
    (Role::Werewolf, 4),
    (Role::Seer, 1),
    (Role::Witch, 1),
    (Role::Hunter, 1),
    (Role::Guardian, 1),
    (Role::Villager, 4),
];

/// A player's secret role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Role {
    /// Picks a victim each night with the other werewolves.
    Werewolf,
    /// Learns each night whether one player is a werewolf.
    Seer,
    /// Holds a one-shot heal potion and a one-shot poison.
    Witch,
    /// May take one player down when eliminated.
    Hunter,
    /// Protects one player per night, never the same player twice running.
    Guardian,
    /// No night action.
    Villager,
}

/// Victory-condition grouping of roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Faction {
    /// The werewolves.
    Werewolf,
    /// Villager-aligned players with a night or death power.
    Special,
    /// Ordinary villagers.
    Ordinary,
}

impl Role {
    /// The faction this role counts toward in win checks.
    pub fn faction(self) -> Faction {
        match self {
            Role::Werewolf => Faction::Werewolf,
            Role::Seer | Role::Witch | Role::Hunter | Role::Guardian => Faction::Special,
            Role::Villager => Faction::Ordinary,
        }
    }

    /// The private instruction text sent to holders of this role at setup.
    pub fn instructions(self) -> &'static str {
        match self {
            Role::Werewolf => text::INSTRUCTIONS_WEREWOLF,
            Role::Seer => text::INSTRUCTIONS_SEER,
            Role::Witch => text::INSTRUCTIONS_WITCH,
            Role::Hunter => text::INSTRUCTIONS_HUNTER,
            Role::Guardian => text::INSTRUCTIONS_GUARDIAN,
            Role::Villager => text::INSTRUCTIONS_VILLAGER,
        }
    }
}

/// Assigns roles to `players` by uniform shuffle, sliced into [`ROLE_QUOTAS`].
pub fn assign_roles(players: &[String], rng: &mut impl Rng) -> HashMap<String, Role> {
    let mut shuffled: Vec<&String> = players.iter().collect();
    shuffled.shuffle(rng);

    let mut roles = HashMap::new();
    let mut remaining = shuffled.into_iter();
    for (role, quota) in ROLE_QUOTAS {
        for _ in 0..*quota {
            if let Some(name) = remaining.next() {
                roles.insert(name.clone(), *role);
            }
        }
    }
    roles
}
