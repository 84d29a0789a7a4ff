//! Round sequencing for the Werewolf rule set.

use super::forms::{self, WitchChoice};
use super::role::{COHORT_SIZE, Role, assign_roles};
use super::state::{Victory, WerewolfState};
use super::text;
use crate::engine::{Callbacks, GameError, GameRule};
use crate::protocol::OutboundMessage;
use futures::future::try_join_all;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, instrument};

/// The Werewolf game rule.
///
/// Owns the randomness for role assignment, werewolf speaking order and
/// death-announcement order; seed it for reproducible games.
pub struct WerewolfRule {
    rng: StdRng,
}

impl WerewolfRule {
    /// Creates a rule with entropy-seeded randomness.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a rule with a fixed seed, for reproducible games.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for WerewolfRule {
    fn default() -> Self {
        Self::new()
    }
}

/// What happened during one night, before resolution.
#[derive(Debug, Default)]
struct NightRecord {
    guarded: Option<String>,
    killed: Option<String>,
    healed: bool,
    poisoned: Option<String>,
}

#[async_trait::async_trait]
impl GameRule for WerewolfRule {
    type State = WerewolfState;

    #[instrument(skip(self, players, cx), fields(players = players.len()))]
    async fn init(
        &mut self,
        players: &[String],
        cx: &Callbacks<'_>,
    ) -> Result<WerewolfState, GameError> {
        if players.len() != COHORT_SIZE {
            return Err(GameError::Cohort {
                expected: COHORT_SIZE,
                actual: players.len(),
            });
        }

        let roles = assign_roles(players, &mut self.rng);
        let state = WerewolfState::new(roles, players.to_vec());
        info!("Roles assigned");

        // Shared rules to everyone, then each role's briefing to its holders.
        let mut messages = vec![OutboundMessage::system(text::GAME_RULES, players.to_vec())];
        for (role, _) in super::role::ROLE_QUOTAS {
            let holders: Vec<String> = players
                .iter()
                .filter(|p| state.role_of(p) == Some(*role))
                .cloned()
                .collect();
            messages.push(OutboundMessage::system(role.instructions(), holders));
        }
        cx.send(&messages).await?;

        Ok(state)
    }

    #[instrument(skip(self, state, cx), fields(round = state.round))]
    async fn next(
        &mut self,
        mut state: WerewolfState,
        cx: &Callbacks<'_>,
    ) -> Result<Option<WerewolfState>, GameError> {
        if let Some(victory) = state.winner() {
            let message = match victory {
                Victory::Village => text::VILLAGE_VICTORY,
                Victory::Werewolves => text::WEREWOLF_VICTORY,
            };
            info!(?victory, "Game over");
            cx.send(&[OutboundMessage::system(message, state.players.clone())])
                .await?;
            return Ok(None);
        }

        let night = self.night_phase(&mut state, cx).await?;
        let eliminated = self.resolve_night(&night);

        state.last_guarded = night.guarded.clone();
        state.potion_used |= night.healed;
        state.poison_used |= night.poisoned.is_some();

        self.announce_deaths(&mut state, eliminated, cx).await?;
        self.discussion(&state, cx).await?;
        self.vote(&mut state, cx).await?;

        state.round += 1;
        Ok(Some(state))
    }
}

impl WerewolfRule {
    /// Runs the guard, werewolf, witch and seer sub-rounds, in that order.
    async fn night_phase(
        &mut self,
        state: &mut WerewolfState,
        cx: &Callbacks<'_>,
    ) -> Result<NightRecord, GameError> {
        let mut night = NightRecord::default();

        // Guardian: pick anyone living except last night's ward.
        if let Some(guardian) = state.first_living_with_role(Role::Guardian) {
            let candidates: Vec<String> = state
                .living
                .iter()
                .filter(|p| Some(*p) != state.last_guarded.as_ref())
                .cloned()
                .collect();
            let form = forms::single_choice(
                forms::GUARD,
                "Choose the player to protect tonight.",
                &candidates,
            );
            let answer = cx.form(&guardian, text::GUARD_PROMPT, &form).await?;
            let ward = forms::decode_choice(&form, &answer)?;
            debug!(guardian = %guardian, ward = %ward, "Guardian chose");
            cx.send(&[OutboundMessage::system(
                text::guard_confirmation(&ward),
                vec![guardian.clone()],
            )])
            .await?;
            night.guarded = Some(ward);
        }

        // Werewolves: shuffled speaking order; everyone but the designated
        // voter speaks first, each utterance landing before the next turn.
        let mut wolves = state.living_with_role(Role::Werewolf);
        wolves.shuffle(&mut self.rng);
        if let Some((voter, discussants)) = wolves.split_first() {
            for wolf in discussants {
                let utterance = cx.chat(wolf, text::WOLF_DISCUSS_PROMPT, &wolves).await?;
                cx.send(&[OutboundMessage::from_player(
                    wolf.clone(),
                    utterance,
                    wolves.clone(),
                )])
                .await?;
            }
            let form = forms::single_choice(
                forms::WEREWOLF_KILL,
                "Choose tonight's victim.",
                &state.living,
            );
            let answer = cx.form(voter, text::WOLF_KILL_PROMPT, &form).await?;
            let victim = forms::decode_choice(&form, &answer)?;
            debug!(voter = %voter, victim = %victim, "Werewolves chose");
            cx.send(&[OutboundMessage::system(
                text::wolf_kill_confirmation(&victim),
                wolves.clone(),
            )])
            .await?;
            night.killed = Some(victim);
        }

        // Witch: offered whichever one-shot resources remain.
        if let Some(witch) = state.first_living_with_role(Role::Witch) {
            let form = match (state.potion_used, state.poison_used) {
                (true, true) => None,
                (false, false) => Some(forms::witch_both(&state.living)),
                (false, true) => Some(forms::witch_heal_only()),
                (true, false) => Some(forms::witch_poison_only(&state.living)),
            };
            if let Some(form) = form {
                let prompt = text::witch_prompt(night.killed.as_deref(), !state.potion_used);
                let answer = cx.form(&witch, &prompt, &form).await?;
                match forms::decode_witch(&form, &answer)? {
                    WitchChoice::Heal => night.healed = true,
                    WitchChoice::Poison(target) => night.poisoned = Some(target),
                    WitchChoice::Pass => {}
                }
                debug!(witch = %witch, healed = night.healed, poisoned = ?night.poisoned, "Witch chose");
            }
        }

        // Seer: inspect anyone living except themselves; truthful reveal.
        if let Some(seer) = state.first_living_with_role(Role::Seer) {
            let candidates: Vec<String> = state
                .living
                .iter()
                .filter(|p| **p != seer)
                .cloned()
                .collect();
            let form = forms::single_choice(
                forms::SEER_INSPECT,
                "Choose the player to inspect tonight.",
                &candidates,
            );
            let answer = cx.form(&seer, text::SEER_PROMPT, &form).await?;
            let target = forms::decode_choice(&form, &answer)?;
            let is_werewolf = state.role_of(&target) == Some(Role::Werewolf);
            cx.send(&[OutboundMessage::system(
                text::seer_reveal(&target, is_werewolf),
                vec![seer.clone()],
            )])
            .await?;
        }

        Ok(night)
    }

    /// Computes the night's elimination set and shuffles its announcement
    /// order so the order itself leaks nothing.
    fn resolve_night(&mut self, night: &NightRecord) -> Vec<String> {
        let mut eliminated = Vec::new();
        if let Some(poisoned) = &night.poisoned {
            eliminated.push(poisoned.clone());
        }
        if let Some(killed) = &night.killed {
            let guarded = night.guarded.as_ref() == Some(killed);
            if !night.healed && !guarded && !eliminated.contains(killed) {
                eliminated.push(killed.clone());
            }
        }
        eliminated.shuffle(&mut self.rng);
        eliminated
    }

    /// Announces the night's deaths and runs each victim's elimination chain.
    async fn announce_deaths(
        &mut self,
        state: &mut WerewolfState,
        eliminated: Vec<String>,
        cx: &Callbacks<'_>,
    ) -> Result<(), GameError> {
        // The dying hear their own announcement; audience is fixed before
        // any removal.
        let audience = state.living.clone();
        cx.send(&[OutboundMessage::system(
            text::night_announcement(&eliminated),
            audience,
        )])
        .await?;

        for victim in eliminated {
            self.eliminate(state, victim, cx).await?;
        }
        Ok(())
    }

    /// Removes a player and runs the full elimination chain: last words,
    /// then a dying hunter's optional shot, whose target is chained in
    /// turn. An explicit work-stack keeps the chain depth-first without
    /// assuming anything about how many hunters a game holds.
    async fn eliminate(
        &mut self,
        state: &mut WerewolfState,
        victim: String,
        cx: &Callbacks<'_>,
    ) -> Result<(), GameError> {
        let mut pending = vec![victim];

        while let Some(victim) = pending.pop() {
            state.remove_living(&victim);
            info!(victim = %victim, "Player eliminated");

            let mut audience = state.living.clone();
            let last_words = cx.chat(&victim, text::LAST_WORDS_PROMPT, &audience).await?;
            // Deliver to the author too, so their transcript stays whole.
            audience.push(victim.clone());
            cx.send(&[OutboundMessage::from_player(
                victim.clone(),
                last_words,
                audience.clone(),
            )])
            .await?;

            if state.role_of(&victim) == Some(Role::Hunter) && !state.living.is_empty() {
                let form = forms::hunter_shot(&state.living);
                let answer = cx.form(&victim, text::HUNTER_PROMPT, &form).await?;
                if let Some(target) = forms::decode_hunter_shot(&form, &answer)? {
                    cx.send(&[OutboundMessage::system(
                        text::hunter_shot_announcement(&victim, &target),
                        audience,
                    )])
                    .await?;
                    pending.push(target);
                }
            }
        }
        Ok(())
    }

    /// Day discussion: every living player speaks in participant order,
    /// each utterance broadcast before the next speaker's turn.
    async fn discussion(
        &self,
        state: &WerewolfState,
        cx: &Callbacks<'_>,
    ) -> Result<(), GameError> {
        let living = state.living.clone();
        for player in &living {
            let utterance = cx.chat(player, text::DISCUSS_PROMPT, &living).await?;
            cx.send(&[OutboundMessage::from_player(
                player.clone(),
                utterance,
                living.clone(),
            )])
            .await?;
        }
        Ok(())
    }

    /// Plurality vote with tie-break revoting: the target set starts as
    /// every living player and narrows to the tied leaders until a single
    /// player remains, who is run through the elimination chain.
    async fn vote(
        &mut self,
        state: &mut WerewolfState,
        cx: &Callbacks<'_>,
    ) -> Result<(), GameError> {
        let mut targets = state.living.clone();

        loop {
            let voters = state.living.clone();
            let form = forms::single_choice(forms::VOTE, "Choose who to eliminate.", &targets);

            // All ballots are collected concurrently; the round proceeds
            // only once every voter has answered.
            let ballots: Vec<(String, String)> = try_join_all(voters.iter().map(|voter| {
                let form = &form;
                async move {
                    let answer = cx.form(voter, text::VOTE_PROMPT, form).await?;
                    let pick = forms::decode_choice(form, &answer)?;
                    Ok::<_, GameError>((voter.clone(), pick))
                }
            }))
            .await?;

            let mut lines: Vec<String> = ballots
                .iter()
                .map(|(voter, pick)| text::ballot_line(voter, pick))
                .collect();

            match tally(&targets, &ballots) {
                VoteOutcome::Elected(chosen) => {
                    debug!(chosen = %chosen, "Vote elected a target");
                    lines.push(text::vote_elimination(&chosen));
                    cx.send(&[OutboundMessage::system(lines.join("\n"), voters)])
                        .await?;
                    self.eliminate(state, chosen, cx).await?;
                    return Ok(());
                }
                VoteOutcome::Tied(tied) => {
                    debug!(tied = ?tied, "Vote tied, revoting");
                    lines.push(text::vote_revote(&tied));
                    cx.send(&[OutboundMessage::system(lines.join("\n"), voters)])
                        .await?;
                    targets = tied;
                }
            }
        }
    }
}

/// Result of counting one round of ballots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum VoteOutcome {
    /// A unique plurality winner.
    Elected(String),
    /// The leaders, tied; the next round votes among exactly these.
    Tied(Vec<String>),
}

/// Counts ballots by plurality over `targets`, preserving target order.
pub(crate) fn tally(targets: &[String], ballots: &[(String, String)]) -> VoteOutcome {
    let counts: Vec<(&String, usize)> = targets
        .iter()
        .map(|target| {
            (
                target,
                ballots.iter().filter(|(_, pick)| pick == target).count(),
            )
        })
        .collect();
    let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);
    let mut leaders: Vec<String> = counts
        .into_iter()
        .filter(|(_, n)| *n == max)
        .map(|(target, _)| target.clone())
        .collect();
    if leaders.len() == 1 {
        VoteOutcome::Elected(leaders.remove(0))
    } else {
        VoteOutcome::Tied(leaders)
    }
}
