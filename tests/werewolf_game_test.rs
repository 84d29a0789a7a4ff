//! Full Werewolf rounds driven over scripted participants.

use parley_games::games::werewolf::{
    Role, WerewolfRule, WerewolfState, assign_roles, forms,
};
use parley_games::{Callbacks, Form, GameError, GameRule, Message, Roster, ScriptedAgent, Type};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type Mailbox = Arc<Mutex<Vec<Message>>>;
type FormLog = Arc<Mutex<Vec<Form>>>;

struct Table {
    roster: Roster,
    mailboxes: HashMap<String, Mailbox>,
    forms: HashMap<String, FormLog>,
}

fn player_names() -> Vec<String> {
    (1..=12).map(|i| format!("p{i}")).collect()
}

/// p1-p4 werewolves, p5 seer, p6 witch, p7 hunter, p8 guardian, rest villagers.
fn standard_roles() -> HashMap<String, Role> {
    let mut roles = HashMap::new();
    for wolf in ["p1", "p2", "p3", "p4"] {
        roles.insert(wolf.to_string(), Role::Werewolf);
    }
    roles.insert("p5".to_string(), Role::Seer);
    roles.insert("p6".to_string(), Role::Witch);
    roles.insert("p7".to_string(), Role::Hunter);
    roles.insert("p8".to_string(), Role::Guardian);
    for villager in ["p9", "p10", "p11", "p12"] {
        roles.insert(villager.to_string(), Role::Villager);
    }
    roles
}

fn build_table(script: impl Fn(&str, ScriptedAgent) -> ScriptedAgent) -> Table {
    let mut roster = Roster::new();
    let mut mailboxes = HashMap::new();
    let mut forms = HashMap::new();
    for name in player_names() {
        let agent = script(&name, ScriptedAgent::new(name.clone()));
        mailboxes.insert(name.clone(), agent.received());
        forms.insert(name.clone(), agent.forms_seen());
        roster.register(name, Box::new(agent)).unwrap();
    }
    Table {
        roster,
        mailboxes,
        forms,
    }
}

fn heard(table: &Table, player: &str, needle: &str) -> bool {
    table.mailboxes[player]
        .lock()
        .unwrap()
        .iter()
        .any(|m| m.content.contains(needle))
}

fn forms_named(table: &Table, player: &str, name: &str) -> Vec<Form> {
    table.forms[player]
        .lock()
        .unwrap()
        .iter()
        .filter(|f| f.name == name)
        .cloned()
        .collect()
}

fn union_names(form: &Form) -> Vec<String> {
    match &form.schema {
        Type::Union(alternatives) => alternatives.iter().map(|a| a.name.clone()).collect(),
        other => panic!("expected a union schema, got {other:?}"),
    }
}

fn living(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn full_round_with_kill_and_poison() {
    let table = build_table(|name, agent| {
        let agent = agent.with_answer(forms::VOTE, json!({ "p1": null }));
        match name {
            "p8" => agent.with_answer(forms::GUARD, json!({ "p9": null })),
            "p1" | "p2" | "p3" | "p4" => {
                agent.with_answer(forms::WEREWOLF_KILL, json!({ "p10": null }))
            }
            "p6" => agent.with_answer(forms::WITCH_POTION, json!({ "poison": { "p11": null } })),
            "p5" => agent.with_answer(forms::SEER_INSPECT, json!({ "p1": null })),
            _ => agent,
        }
    });

    let state = WerewolfState::new(standard_roles(), player_names());
    let mut rule = WerewolfRule::from_seed(11);
    let cx = Callbacks::new(&table.roster);

    let next = rule
        .next(state, &cx)
        .await
        .unwrap()
        .expect("the game continues");

    // p10 was killed, p11 poisoned, p1 voted out.
    assert_eq!(
        next.living,
        living(&["p2", "p3", "p4", "p5", "p6", "p7", "p8", "p9", "p12"])
    );
    assert_eq!(next.round, 1);
    assert_eq!(next.last_guarded, Some("p9".to_string()));
    assert!(!next.potion_used);
    assert!(next.poison_used);

    // Private channels: guard confirmation and seer reveal.
    assert!(heard(&table, "p8", "You are protecting p9 tonight."));
    assert!(heard(&table, "p5", "p1 is a Werewolf."));
    assert!(!heard(&table, "p12", "is a Werewolf."));

    // The kill pick stays inside the pack.
    assert!(heard(&table, "p2", "p10 will be attacked tonight"));
    assert!(!heard(&table, "p12", "will be attacked tonight"));

    // The dawn announcement names both victims, in either order.
    let announced = table.mailboxes["p12"]
        .lock()
        .unwrap()
        .iter()
        .any(|m| {
            m.content.contains("died last night")
                && m.content.contains("p10")
                && m.content.contains("p11")
        });
    assert!(announced);

    // Day discussion reaches the whole village.
    assert!(heard(&table, "p12", "p2 has nothing to add."));
    assert!(heard(&table, "p12", "The village has voted: p1 is eliminated."));

    // The dead do not vote, and nobody was asked for a hunter shot.
    assert!(forms_named(&table, "p10", forms::VOTE).is_empty());
    assert!(forms_named(&table, "p11", forms::VOTE).is_empty());
    assert!(forms_named(&table, "p7", forms::HUNTER_SHOT).is_empty());
}

#[tokio::test]
async fn guardian_cannot_repeat_and_spent_potions_are_not_offered() {
    let table = build_table(|name, agent| {
        let agent = agent.with_answer(forms::VOTE, json!({ "p10": null }));
        match name {
            "p8" => agent.with_answer(forms::GUARD, json!({ "p1": null })),
            "p1" | "p2" | "p3" | "p4" => {
                agent.with_answer(forms::WEREWOLF_KILL, json!({ "p9": null }))
            }
            "p5" => agent.with_answer(forms::SEER_INSPECT, json!({ "p2": null })),
            _ => agent,
        }
    });

    let mut state = WerewolfState::new(standard_roles(), player_names());
    state.last_guarded = Some("p9".to_string());
    state.potion_used = true;
    state.poison_used = true;

    let mut rule = WerewolfRule::from_seed(5);
    let cx = Callbacks::new(&table.roster);
    let next = rule
        .next(state, &cx)
        .await
        .unwrap()
        .expect("the game continues");

    // Last night's ward is missing from the guardian's candidates.
    let guard_forms = forms_named(&table, "p8", forms::GUARD);
    assert_eq!(guard_forms.len(), 1);
    let candidates = union_names(&guard_forms[0]);
    assert_eq!(candidates.len(), 11);
    assert!(!candidates.contains(&"p9".to_string()));

    // Both potions spent: the witch is not consulted at all.
    assert!(forms_named(&table, "p6", forms::WITCH_POTION).is_empty());

    // The seer never inspects themselves.
    let seer_forms = forms_named(&table, "p5", forms::SEER_INSPECT);
    assert!(!union_names(&seer_forms[0]).contains(&"p5".to_string()));

    // p9 died to the wolves (the guard was elsewhere), p10 to the vote.
    assert_eq!(
        next.living,
        living(&["p1", "p2", "p3", "p4", "p5", "p6", "p7", "p8", "p11", "p12"])
    );
    assert_eq!(next.last_guarded, Some("p1".to_string()));
}

#[tokio::test]
async fn guarded_and_healed_victim_survives() {
    let table = build_table(|name, agent| {
        let agent = agent.with_answer(forms::VOTE, json!({ "p1": null }));
        match name {
            "p8" => agent.with_answer(forms::GUARD, json!({ "p9": null })),
            "p1" | "p2" | "p3" | "p4" => {
                agent.with_answer(forms::WEREWOLF_KILL, json!({ "p9": null }))
            }
            "p6" => agent.with_answer(forms::WITCH_POTION, json!({ "heal": null })),
            "p5" => agent.with_answer(forms::SEER_INSPECT, json!({ "p1": null })),
            _ => agent,
        }
    });

    let state = WerewolfState::new(standard_roles(), player_names());
    let mut rule = WerewolfRule::from_seed(2);
    let cx = Callbacks::new(&table.roster);
    let next = rule
        .next(state, &cx)
        .await
        .unwrap()
        .expect("the game continues");

    assert!(heard(&table, "p12", "Nobody died last night."));
    assert!(next.potion_used);
    assert!(!next.poison_used);

    // Only the vote claimed a life.
    assert_eq!(
        next.living,
        living(&["p2", "p3", "p4", "p5", "p6", "p7", "p8", "p9", "p10", "p11", "p12"])
    );
}

#[tokio::test]
async fn hunter_chain_runs_until_a_hunter_holds_fire() {
    // Two hunters: the first shoots the second, who declines to shoot back.
    let mut roles = standard_roles();
    roles.insert("p2".to_string(), Role::Hunter);

    let table = build_table(|name, agent| {
        let agent = agent.with_answer(forms::VOTE, json!({ "p7": null }));
        match name {
            "p8" => agent.with_answer(forms::GUARD, json!({ "p10": null })),
            "p1" | "p3" | "p4" => agent.with_answer(forms::WEREWOLF_KILL, json!({ "p9": null })),
            "p5" => agent.with_answer(forms::SEER_INSPECT, json!({ "p1": null })),
            "p7" => agent.with_answer(forms::HUNTER_SHOT, json!({ "shoot": { "p2": null } })),
            "p2" => agent.with_answer(forms::HUNTER_SHOT, json!({ "hold": null })),
            _ => agent,
        }
    });

    let mut state = WerewolfState::new(roles, player_names());
    state.potion_used = true;
    state.poison_used = true;

    let mut rule = WerewolfRule::from_seed(8);
    let cx = Callbacks::new(&table.roster);
    let next = rule
        .next(state, &cx)
        .await
        .unwrap()
        .expect("the game continues");

    // p9 to the wolves, p7 to the vote, p2 to p7's shot. The chain stops there.
    assert_eq!(
        next.living,
        living(&["p1", "p3", "p4", "p5", "p6", "p8", "p10", "p11", "p12"])
    );
    assert!(heard(&table, "p12", "With a dying breath, p7 shoots p2."));
    assert!(!heard(&table, "p12", "p2 shoots"));

    // The second hunter was only offered still-living targets.
    let shot_forms = forms_named(&table, "p2", forms::HUNTER_SHOT);
    assert_eq!(shot_forms.len(), 1);
    let schema = &shot_forms[0].schema;
    let shoot_candidates = match schema {
        Type::Union(alternatives) => match &alternatives[0].ty {
            Type::Union(candidates) => candidates
                .iter()
                .map(|c| c.name.clone())
                .collect::<Vec<String>>(),
            other => panic!("expected candidate union, got {other:?}"),
        },
        other => panic!("expected a union schema, got {other:?}"),
    };
    assert_eq!(
        shoot_candidates,
        living(&["p1", "p3", "p4", "p5", "p6", "p8", "p10", "p11", "p12"])
    );
}

#[tokio::test]
async fn tied_vote_narrows_to_the_tied() {
    let table = build_table(|name, agent| {
        let number: u32 = name[1..].parse().unwrap();
        // Six votes for p1, six for p2, then everyone converges on p1.
        let first_ballot = if number <= 6 {
            json!({ "p1": null })
        } else {
            json!({ "p2": null })
        };
        let agent = agent
            .with_answer(forms::VOTE, first_ballot)
            .with_answer(forms::VOTE, json!({ "p1": null }));
        match name {
            "p8" => agent.with_answer(forms::GUARD, json!({ "p9": null })),
            "p1" | "p2" | "p3" | "p4" => {
                agent.with_answer(forms::WEREWOLF_KILL, json!({ "p9": null }))
            }
            "p5" => agent.with_answer(forms::SEER_INSPECT, json!({ "p1": null })),
            _ => agent,
        }
    });

    let mut state = WerewolfState::new(standard_roles(), player_names());
    state.potion_used = true;
    state.poison_used = true;

    let mut rule = WerewolfRule::from_seed(21);
    let cx = Callbacks::new(&table.roster);
    let next = rule
        .next(state, &cx)
        .await
        .unwrap()
        .expect("the game continues");

    assert!(heard(&table, "p12", "The vote is tied between p1, p2."));
    assert!(heard(&table, "p12", "The village has voted: p1 is eliminated."));

    // The revote offered exactly the tied leaders.
    let vote_forms = forms_named(&table, "p12", forms::VOTE);
    assert_eq!(vote_forms.len(), 2);
    assert_eq!(union_names(&vote_forms[1]), living(&["p1", "p2"]));

    // The guarded victim survived the night; only the vote claimed a life.
    assert_eq!(
        next.living,
        living(&["p2", "p3", "p4", "p5", "p6", "p7", "p8", "p9", "p10", "p11", "p12"])
    );
}

#[tokio::test]
async fn victory_is_announced_to_everyone_and_terminates() {
    // Village win: every werewolf is already dead.
    let table = build_table(|_, agent| agent);
    let mut state = WerewolfState::new(standard_roles(), player_names());
    for wolf in ["p1", "p2", "p3", "p4"] {
        state.remove_living(wolf);
    }
    let mut rule = WerewolfRule::from_seed(1);
    let cx = Callbacks::new(&table.roster);
    assert!(rule.next(state, &cx).await.unwrap().is_none());
    assert!(heard(&table, "p5", "The village has won."));
    // The dead hear the verdict too.
    assert!(heard(&table, "p1", "The village has won."));

    // Werewolf win: the pack has reached parity.
    let table = build_table(|_, agent| agent);
    let mut state = WerewolfState::new(standard_roles(), player_names());
    for dead in ["p5", "p6", "p9", "p10"] {
        state.remove_living(dead);
    }
    let mut rule = WerewolfRule::from_seed(1);
    let cx = Callbacks::new(&table.roster);
    assert!(rule.next(state, &cx).await.unwrap().is_none());
    assert!(heard(&table, "p12", "The werewolves have won."));
}

#[tokio::test]
async fn init_briefs_every_player_for_their_role() {
    let table = build_table(|_, agent| agent);
    let mut rule = WerewolfRule::from_seed(3);
    let cx = Callbacks::new(&table.roster);

    let state = rule.init(&player_names(), &cx).await.unwrap();
    assert_eq!(state.living.len(), 12);
    assert_eq!(state.round, 0);

    for player in player_names() {
        assert!(heard(&table, &player, "Welcome to Werewolf"));
        let expected = match state.role_of(&player).unwrap() {
            Role::Werewolf => "You are a Werewolf.",
            Role::Seer => "You are the Seer.",
            Role::Witch => "You are the Witch.",
            Role::Hunter => "You are the Hunter.",
            Role::Guardian => "You are the Guardian.",
            Role::Villager => "You are a Villager.",
        };
        assert!(heard(&table, &player, expected));
        if state.role_of(&player) != Some(Role::Werewolf) {
            assert!(!heard(&table, &player, "You are a Werewolf."));
        }
    }

    // The seeded assignment matches a bare rng driven by the same seed.
    let expected = assign_roles(
        &player_names(),
        &mut <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(3),
    );
    assert_eq!(state.roles, expected);
}

#[tokio::test]
async fn init_rejects_the_wrong_cohort_size() {
    let mut roster = Roster::new();
    for i in 1..=11 {
        let name = format!("p{i}");
        roster
            .register(name.clone(), Box::new(ScriptedAgent::new(name)))
            .unwrap();
    }
    let mut rule = WerewolfRule::from_seed(0);
    let cx = Callbacks::new(&roster);
    let names: Vec<String> = roster.names().to_vec();
    let result = rule.init(&names, &cx).await;
    assert!(matches!(
        result,
        Err(GameError::Cohort {
            expected: 12,
            actual: 11
        })
    ));
}
