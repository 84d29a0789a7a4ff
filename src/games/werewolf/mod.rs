//! The Werewolf rule set.
//!
//! Twelve players are secretly split into werewolves, four special roles
//! and ordinary villagers. Rounds alternate a night phase (guard, kill,
//! potions, divination) with a day phase (announcements, discussion and a
//! plurality vote), until one faction is wiped out.

pub mod forms;
mod role;
mod rules;
mod state;
pub(crate) mod text;

pub use role::{COHORT_SIZE, Faction, ROLE_QUOTAS, Role, assign_roles};
pub use rules::WerewolfRule;
pub use state::{Victory, WerewolfState};
