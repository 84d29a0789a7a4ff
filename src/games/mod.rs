//! Game rule implementations.

pub mod werewolf;
