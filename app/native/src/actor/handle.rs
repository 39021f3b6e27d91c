//! Handle for communicating with the homescreen actor.

use std::time::Duration;

use chrono::NaiveDateTime;
use tokio::sync::{mpsc, oneshot};

use super::messages::{HomescreenMessage, HomescreenSnapshot, InboundEvent};

/// Error types for actor communication.
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    /// Failed to send message to actor.
    #[error("Failed to send message to actor: channel closed")]
    SendFailed,

    /// Failed to receive response from actor.
    #[error("Failed to receive response from actor: channel closed")]
    ReceiveFailed,

    /// Query timed out.
    #[error("Query timed out after {0:?}")]
    Timeout(Duration),
}

/// Handle for communicating with the homescreen actor.
///
/// Cheap to clone; every clone feeds the same actor.
#[derive(Clone, Debug)]
pub struct HomescreenHandle {
    sender: mpsc::Sender<HomescreenMessage>,
}

impl HomescreenHandle {
    pub(crate) const fn new(sender: mpsc::Sender<HomescreenMessage>) -> Self { Self { sender } }

    // ========================================================================
    // Sending
    // ========================================================================

    /// Queues a message without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the actor has stopped or its
    /// queue is full.
    pub fn send(&self, msg: HomescreenMessage) -> Result<(), ActorError> {
        self.sender.try_send(msg).map_err(|_| ActorError::SendFailed)
    }

    /// Sends a message, waiting for queue space.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the actor has stopped.
    pub async fn send_async(&self, msg: HomescreenMessage) -> Result<(), ActorError> {
        self.sender.send(msg).await.map_err(|_| ActorError::SendFailed)
    }

    /// Sends a message from a non-async thread, waiting for queue space.
    ///
    /// Must not be called from within the runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the actor has stopped.
    pub fn blocking_send(&self, msg: HomescreenMessage) -> Result<(), ActorError> {
        self.sender.blocking_send(msg).map_err(|_| ActorError::SendFailed)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns a snapshot of the actor state.
    ///
    /// Messages sent before the query are processed first.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has stopped.
    pub async fn snapshot(&self) -> Result<HomescreenSnapshot, ActorError> {
        let (tx, rx) = oneshot::channel();

        self.sender
            .send(HomescreenMessage::Query { respond_to: tx })
            .await
            .map_err(|_| ActorError::SendFailed)?;

        rx.await.map_err(|_| ActorError::ReceiveFailed)
    }

    /// [`Self::snapshot`] with a timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Timeout`] if the actor does not answer in time.
    pub async fn snapshot_timeout(
        &self,
        timeout: Duration,
    ) -> Result<HomescreenSnapshot, ActorError> {
        tokio::time::timeout(timeout, self.snapshot())
            .await
            .map_err(|_| ActorError::Timeout(timeout))?
    }

    // ========================================================================
    // Convenience
    // ========================================================================

    /// Forwards a decoded bus event.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has stopped.
    pub async fn dispatch(&self, event: InboundEvent) -> Result<(), ActorError> {
        self.send_async(HomescreenMessage::Bus(event)).await
    }

    /// Delivers a clock tick.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has stopped.
    pub async fn tick(&self, now: NaiveDateTime) -> Result<(), ActorError> {
        self.send_async(HomescreenMessage::Tick { now }).await
    }

    /// Rotates to the next wallpaper.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has stopped.
    pub async fn next_wallpaper(&self) -> Result<(), ActorError> {
        self.send_async(HomescreenMessage::NextWallpaper).await
    }

    /// Selects a wallpaper by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has stopped.
    pub async fn select_wallpaper(&self, name: &str) -> Result<(), ActorError> {
        self.send_async(HomescreenMessage::SelectWallpaper { name: name.to_string() }).await
    }

    /// Publishes the full idle page.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has stopped.
    pub async fn activate_idle(&self) -> Result<(), ActorError> {
        self.send_async(HomescreenMessage::ActivateIdle).await
    }

    /// Stops the actor after the messages already queued.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has already stopped.
    pub fn shutdown(&self) -> Result<(), ActorError> { self.send(HomescreenMessage::Shutdown) }

    /// Whether the actor is still running.
    #[must_use]
    pub fn is_alive(&self) -> bool { !self.sender.is_closed() }

    pub(crate) fn downgrade(&self) -> mpsc::WeakSender<HomescreenMessage> {
        self.sender.downgrade()
    }
}
