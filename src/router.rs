//! Audience-scoped broadcast routing.
//!
//! A batch of outbound messages is grouped into one ordered buffer per
//! recipient (audience stripped), then every non-empty buffer is delivered
//! as a single `send` call. Deliveries to distinct recipients run
//! concurrently; the router joins on all of them before returning, so a
//! caller's next request can never race ahead of its own broadcasts.

use crate::engine::{GameError, Roster};
use crate::protocol::{Message, OutboundMessage};
use futures::future::try_join_all;
use tracing::{debug, instrument};

#[instrument(skip(roster, messages), fields(batch = messages.len()))]
pub(crate) async fn deliver(
    roster: &Roster,
    messages: &[OutboundMessage],
) -> Result<(), GameError> {
    let mut buffers: Vec<(String, Vec<Message>)> = Vec::new();

    for outbound in messages {
        for name in &outbound.audiences {
            if !roster.contains(name) {
                return Err(GameError::UnknownRespondent { name: name.clone() });
            }
            match buffers.iter_mut().find(|(buffered, _)| buffered == name) {
                Some((_, buffer)) => buffer.push(outbound.message()),
                None => buffers.push((name.clone(), vec![outbound.message()])),
            }
        }
    }

    debug!(recipients = buffers.len(), "Delivering message batch");

    try_join_all(buffers.into_iter().map(|(name, batch)| async move {
        let agent = roster
            .get(&name)
            .ok_or_else(|| GameError::UnknownRespondent { name: name.clone() })?;
        agent.lock().await.send(batch).await.map_err(GameError::from)
    }))
    .await?;

    Ok(())
}
