//! Form builders and answer decoders for the Werewolf rule set.
//!
//! Every pick is encoded as a union over the current candidate names, so
//! the candidate set itself is part of the schema and a conforming answer
//! cannot name an illegal target. Optional actions carry an explicit
//! decline alternative rather than a sentinel value.

use crate::engine::GameError;
use crate::schema::{Form, Fragment, Type};
use serde_json::Value;

/// Form name: guardian's nightly protection pick.
pub const GUARD: &str = "guard";
/// Form name: the designated werewolf's kill pick.
pub const WEREWOLF_KILL: &str = "werewolf_kill";
/// Form name: the witch's potion decision.
pub const WITCH_POTION: &str = "witch_potion";
/// Form name: the seer's inspection pick.
pub const SEER_INSPECT: &str = "seer_inspect";
/// Form name: the daily elimination ballot.
pub const VOTE: &str = "vote";
/// Form name: the dying hunter's optional shot.
pub const HUNTER_SHOT: &str = "hunter_shot";

fn candidate_union(candidates: &[String]) -> Type {
    Type::Union(
        candidates
            .iter()
            .map(|name| Fragment::new(name, format!("Choose {name}."), Type::Unit))
            .collect(),
    )
}

/// A single pick from `candidates`.
pub fn single_choice(name: &str, description: &str, candidates: &[String]) -> Form {
    Form::new(name, description, candidate_union(candidates))
}

/// The hunter's shot: pick a target, or explicitly hold fire.
pub fn hunter_shot(candidates: &[String]) -> Form {
    Form::new(
        HUNTER_SHOT,
        "Take one player down with you, or hold your fire.",
        Type::Union(vec![
            Fragment::new("shoot", "Shoot one living player.", candidate_union(candidates)),
            Fragment::new("hold", "Do not shoot anyone.", Type::Unit),
        ]),
    )
}

/// The witch's decision when both potions remain.
pub fn witch_both(candidates: &[String]) -> Form {
    Form::new(
        WITCH_POTION,
        "Spend the heal potion, the poison, or neither. Each works once per game.",
        Type::Union(vec![
            Fragment::new("heal", "Save tonight's victim with the heal potion.", Type::Unit),
            Fragment::new("poison", "Poison one living player.", candidate_union(candidates)),
            Fragment::new("pass", "Keep both potions.", Type::Unit),
        ]),
    )
}

/// The witch's decision when only the heal potion remains.
pub fn witch_heal_only() -> Form {
    Form::new(
        WITCH_POTION,
        "Your poison is spent. Spend the heal potion, or keep it.",
        Type::Union(vec![
            Fragment::new("heal", "Save tonight's victim with the heal potion.", Type::Unit),
            Fragment::new("pass", "Keep the heal potion.", Type::Unit),
        ]),
    )
}

/// The witch's decision when only the poison remains.
pub fn witch_poison_only(candidates: &[String]) -> Form {
    Form::new(
        WITCH_POTION,
        "Your heal potion is spent. Poison one living player, or do nothing.",
        Type::Union(vec![
            Fragment::new("poison", "Poison one living player.", candidate_union(candidates)),
            Fragment::new("pass", "Keep the poison.", Type::Unit),
        ]),
    )
}

/// The witch's decoded decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WitchChoice {
    /// Spend the heal potion on tonight's victim.
    Heal,
    /// Poison the named player.
    Poison(String),
    /// Spend nothing.
    Pass,
}

fn tag_of<'v>(form: &Form, value: &'v Value) -> Result<(&'v str, &'v Value), GameError> {
    form.schema.validate(value)?;
    value
        .as_object()
        .and_then(|object| object.iter().next())
        .map(|(tag, inner)| (tag.as_str(), inner))
        .ok_or_else(|| GameError::Answer {
            form: form.name.clone(),
            reason: "expected a tagged choice".to_string(),
        })
}

/// Decodes a [`single_choice`] answer into the chosen name.
pub fn decode_choice(form: &Form, value: &Value) -> Result<String, GameError> {
    let (tag, _) = tag_of(form, value)?;
    Ok(tag.to_string())
}

/// Decodes a [`hunter_shot`] answer into a target, or `None` for a decline.
pub fn decode_hunter_shot(form: &Form, value: &Value) -> Result<Option<String>, GameError> {
    let (tag, inner) = tag_of(form, value)?;
    match tag {
        "hold" => Ok(None),
        "shoot" => inner
            .as_object()
            .and_then(|object| object.keys().next().cloned())
            .map(Some)
            .ok_or_else(|| GameError::Answer {
                form: form.name.clone(),
                reason: "shoot carried no target".to_string(),
            }),
        other => Err(GameError::Answer {
            form: form.name.clone(),
            reason: format!("unexpected alternative {other:?}"),
        }),
    }
}

/// Decodes a witch potion answer.
pub fn decode_witch(form: &Form, value: &Value) -> Result<WitchChoice, GameError> {
    let (tag, inner) = tag_of(form, value)?;
    match tag {
        "heal" => Ok(WitchChoice::Heal),
        "pass" => Ok(WitchChoice::Pass),
        "poison" => inner
            .as_object()
            .and_then(|object| object.keys().next().cloned())
            .map(WitchChoice::Poison)
            .ok_or_else(|| GameError::Answer {
                form: form.name.clone(),
                reason: "poison carried no target".to_string(),
            }),
        other => Err(GameError::Answer {
            form: form.name.clone(),
            reason: format!("unexpected alternative {other:?}"),
        }),
    }
}
