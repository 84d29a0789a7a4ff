//! Player-facing text: shared rules, role briefings, prompts, announcements.

/// The shared rules, broadcast to everyone at setup.
pub const GAME_RULES: &str = "\
Welcome to Werewolf. Twelve players hold secret roles: four werewolves, \
a seer, a witch, a hunter, a guardian and four villagers. Each round has a \
night and a day. At night the werewolves secretly pick a victim while the \
special roles act in the dark. At dawn the deaths are announced. During the \
day everyone speaks in turn, then votes to eliminate one player; a tied \
vote is repeated among the tied players. The village wins when every \
werewolf is dead. The werewolves win when the villagers can no longer \
outvote them, or when either the ordinary villagers or the special roles \
are wiped out.";

/// Private briefing for werewolves.
pub const INSTRUCTIONS_WEREWOLF: &str = "\
You are a Werewolf. Each night you and the other werewolves discuss in \
secret and one of you picks tonight's victim. By day, blend in: discuss, \
accuse and vote like any villager would.";

/// Private briefing for the seer.
pub const INSTRUCTIONS_SEER: &str = "\
You are the Seer. Each night you inspect one player and learn, truthfully, \
whether they are a werewolf. Reveal what you know carefully; a known seer \
rarely survives the next night.";

/// Private briefing for the witch.
pub const INSTRUCTIONS_WITCH: &str = "\
You are the Witch. You own two potions, each usable once per game: a heal \
potion that saves the werewolves' victim, and a poison that kills a player \
of your choice.";

/// Private briefing for the hunter.
pub const INSTRUCTIONS_HUNTER: &str = "\
You are the Hunter. When you die, by wolf, poison or vote, you may take \
one living player down with you, or choose to hold your fire.";

/// Private briefing for the guardian.
pub const INSTRUCTIONS_GUARDIAN: &str = "\
You are the Guardian. Each night you protect one player from the \
werewolves. You may not protect the same player two nights running.";

/// Private briefing for villagers.
pub const INSTRUCTIONS_VILLAGER: &str = "\
You are a Villager. You have no night action. Listen by day, reason about \
who is lying, and vote.";

/// Prompt for the guardian's nightly pick.
pub const GUARD_PROMPT: &str =
    "Night falls. Choose one player to protect from the werewolves tonight.";

/// Prompt for werewolves discussing before the kill pick.
pub const WOLF_DISCUSS_PROMPT: &str =
    "Confer with the other werewolves: who should die tonight, and why?";

/// Prompt for the designated werewolf voter.
pub const WOLF_KILL_PROMPT: &str = "Decide for the pack: choose tonight's victim.";

/// Prompt for the seer's inspection.
pub const SEER_PROMPT: &str = "Choose one player to inspect tonight.";

/// Prompt for a dying player's last words.
pub const LAST_WORDS_PROMPT: &str =
    "You have been eliminated. Say your last words to the village.";

/// Prompt for the dying hunter's shot.
pub const HUNTER_PROMPT: &str =
    "Hunter, you are dying. You may shoot one living player, or hold your fire.";

/// Prompt for daytime discussion.
pub const DISCUSS_PROMPT: &str =
    "It is day. Share your suspicions with the village.";

/// Prompt for the elimination ballot.
pub const VOTE_PROMPT: &str = "Vote to eliminate one player.";

/// Victory announcement when the wolves are wiped out.
pub const VILLAGE_VICTORY: &str =
    "The last werewolf is dead. The village has won.";

/// Victory announcement when the wolves prevail.
pub const WEREWOLF_VICTORY: &str =
    "The village can no longer stop the pack. The werewolves have won.";

/// Private confirmation of the guardian's pick.
pub fn guard_confirmation(target: &str) -> String {
    format!("You are protecting {target} tonight.")
}

/// Confirmation of the kill pick, for the werewolf audience only.
pub fn wolf_kill_confirmation(target: &str) -> String {
    format!("The pack has chosen: {target} will be attacked tonight.")
}

/// Prompt for the witch, naming tonight's victim when a heal is possible.
pub fn witch_prompt(victim: Option<&str>, heal_available: bool) -> String {
    match (victim, heal_available) {
        (Some(victim), true) => format!(
            "The werewolves attacked {victim} tonight. Decide what to do with your potions."
        ),
        _ => "Night falls. Decide what to do with your potions.".to_string(),
    }
}

/// The seer's truthful private reveal.
pub fn seer_reveal(target: &str, is_werewolf: bool) -> String {
    if is_werewolf {
        format!("{target} is a Werewolf.")
    } else {
        format!("{target} is not a Werewolf.")
    }
}

/// Dawn announcement of the night's deaths (0, 1 or N templates).
pub fn night_announcement(eliminated: &[String]) -> String {
    match eliminated {
        [] => "Dawn breaks. Nobody died last night.".to_string(),
        [victim] => format!("Dawn breaks. {victim} died last night."),
        many => format!("Dawn breaks. {} died last night.", many.join(", ")),
    }
}

/// Announcement of a hunter taking someone down.
pub fn hunter_shot_announcement(hunter: &str, target: &str) -> String {
    format!("With a dying breath, {hunter} shoots {target}.")
}

/// One tally line per voter, broadcast verbatim.
pub fn ballot_line(voter: &str, pick: &str) -> String {
    format!("{voter} votes for {pick}.")
}

/// Outcome line when the vote elects a unique target.
pub fn vote_elimination(target: &str) -> String {
    format!("The village has voted: {target} is eliminated.")
}

/// Outcome line when the vote is tied and repeats.
pub fn vote_revote(tied: &[String]) -> String {
    format!(
        "The vote is tied between {}. Vote again among the tied players.",
        tied.join(", ")
    )
}
