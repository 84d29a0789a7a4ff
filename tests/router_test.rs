//! Delivery semantics of the audience-scoped broadcast router.

use parley_games::{Callbacks, GameError, Message, OutboundMessage, Roster, ScriptedAgent};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type Mailbox = Arc<Mutex<Vec<Message>>>;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn table(players: &[&str]) -> (Roster, HashMap<String, Mailbox>) {
    let mut roster = Roster::new();
    let mut mailboxes = HashMap::new();
    for name in players {
        let agent = ScriptedAgent::new(*name);
        mailboxes.insert(name.to_string(), agent.received());
        roster.register(*name, Box::new(agent)).unwrap();
    }
    (roster, mailboxes)
}

#[tokio::test]
async fn delivery_respects_audiences() {
    let (roster, mailboxes) = table(&["a", "b", "c", "d"]);
    let cx = Callbacks::new(&roster);

    cx.send(&[
        OutboundMessage::system("one", names(&["a", "b"])),
        OutboundMessage::from_player("a", "two", names(&["b"])),
        OutboundMessage::system("three", names(&["a", "b", "c"])),
    ])
    .await
    .unwrap();

    let a = mailboxes["a"].lock().unwrap();
    assert_eq!(
        *a,
        vec![Message::system("one"), Message::system("three")]
    );

    let b = mailboxes["b"].lock().unwrap();
    assert_eq!(
        *b,
        vec![
            Message::system("one"),
            Message::from_player("a", "two"),
            Message::system("three"),
        ]
    );

    let c = mailboxes["c"].lock().unwrap();
    assert_eq!(*c, vec![Message::system("three")]);

    // A participant outside every audience sees nothing at all.
    assert!(mailboxes["d"].lock().unwrap().is_empty());
}

#[tokio::test]
async fn order_is_preserved_across_batches() {
    let (roster, mailboxes) = table(&["a", "b"]);
    let cx = Callbacks::new(&roster);

    cx.send(&[
        OutboundMessage::system("first", names(&["a", "b"])),
        OutboundMessage::system("second", names(&["a"])),
    ])
    .await
    .unwrap();
    cx.send(&[OutboundMessage::system("third", names(&["a", "b"]))])
        .await
        .unwrap();

    let a: Vec<String> = mailboxes["a"]
        .lock()
        .unwrap()
        .iter()
        .map(|m| m.content.clone())
        .collect();
    assert_eq!(a, vec!["first", "second", "third"]);

    let b: Vec<String> = mailboxes["b"]
        .lock()
        .unwrap()
        .iter()
        .map(|m| m.content.clone())
        .collect();
    assert_eq!(b, vec!["first", "third"]);
}

#[tokio::test]
async fn unknown_audience_member_is_fatal() {
    let (roster, _mailboxes) = table(&["a"]);
    let cx = Callbacks::new(&roster);

    let result = cx
        .send(&[OutboundMessage::system("hello", names(&["a", "ghost"]))])
        .await;
    assert!(matches!(
        result,
        Err(GameError::UnknownRespondent { name }) if name == "ghost"
    ));
}

#[tokio::test]
async fn empty_batch_and_empty_audience_are_no_ops() {
    let (roster, mailboxes) = table(&["a"]);
    let cx = Callbacks::new(&roster);

    cx.send(&[]).await.unwrap();
    cx.send(&[OutboundMessage::system("nobody hears this", Vec::new())])
        .await
        .unwrap();

    assert!(mailboxes["a"].lock().unwrap().is_empty());
}
