//! Game state threaded through the Werewolf play loop.

use super::role::{Faction, Role};
use std::collections::HashMap;

/// Which faction has won.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Victory {
    /// Every werewolf is dead.
    Village,
    /// The werewolves can no longer be stopped.
    Werewolves,
}

/// One round's worth of Werewolf state.
///
/// Created by `init`, handed by value into each `next`, replaced wholesale
/// by the returned value. Participant order is preserved in `living`.
#[derive(Debug, Clone)]
pub struct WerewolfState {
    /// Every participant of the game, in registration order.
    pub players: Vec<String>,
    /// Secret role assignment, fixed for the whole game.
    pub roles: HashMap<String, Role>,
    /// Currently living players, in registration order.
    pub living: Vec<String>,
    /// Who the guardian protected last night; never guarded twice running.
    pub last_guarded: Option<String>,
    /// Whether the witch's heal potion has been spent.
    pub potion_used: bool,
    /// Whether the witch's poison has been spent.
    pub poison_used: bool,
    /// Completed rounds.
    pub round: u32,
}

impl WerewolfState {
    /// Creates the opening state: everyone alive, resources unspent.
    pub fn new(roles: HashMap<String, Role>, players: Vec<String>) -> Self {
        Self {
            living: players.clone(),
            players,
            roles,
            last_guarded: None,
            potion_used: false,
            poison_used: false,
            round: 0,
        }
    }

    /// The role of `name`, if they are a participant.
    pub fn role_of(&self, name: &str) -> Option<Role> {
        self.roles.get(name).copied()
    }

    /// Living players holding `role`, in participant order.
    pub fn living_with_role(&self, role: Role) -> Vec<String> {
        self.living
            .iter()
            .filter(|p| self.role_of(p) == Some(role))
            .cloned()
            .collect()
    }

    /// The first living holder of `role`, if any.
    pub fn first_living_with_role(&self, role: Role) -> Option<String> {
        self.living
            .iter()
            .find(|p| self.role_of(p) == Some(role))
            .cloned()
    }

    /// Removes `name` from the living list. Returns whether they were alive.
    pub fn remove_living(&mut self, name: &str) -> bool {
        let before = self.living.len();
        self.living.retain(|p| p != name);
        self.living.len() < before
    }

    /// Number of living players in `faction`.
    pub fn living_in_faction(&self, faction: Faction) -> usize {
        self.living
            .iter()
            .filter(|p| self.role_of(p).map(Role::faction) == Some(faction))
            .count()
    }

    /// Evaluates the win conditions.
    ///
    /// The village wins the moment no werewolf lives. The werewolves win
    /// when the living non-werewolves no longer outnumber them, or when
    /// either villager-aligned faction (ordinary or special) is wiped out.
    pub fn winner(&self) -> Option<Victory> {
        let wolves = self.living_in_faction(Faction::Werewolf);
        if wolves == 0 {
            return Some(Victory::Village);
        }
        let special = self.living_in_faction(Faction::Special);
        let ordinary = self.living_in_faction(Faction::Ordinary);
        if special == 0 || ordinary == 0 || special + ordinary <= wolves {
            return Some(Victory::Werewolves);
        }
        None
    }
}
