//! Bounded event channel with overflow signalling.
//!
//! [`EventSender`] is handed to agent code, [`EventReceiver`] feeds the
//! response stream. `send` waits for capacity. `try_send` on a full channel
//! marks the stream as overflowed instead of dropping the event silently: the
//! receiver delivers what is already buffered, then a `RUN_ERROR` with code
//! `STREAM_OVERFLOW`, then ends.

use std::sync::Arc;

use agui_core::{Event, RunErrorEvent};
use futures::Stream;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

/// Error code of the synthetic event emitted after an overflow.
pub const STREAM_OVERFLOW_CODE: &str = "STREAM_OVERFLOW";

/// Error type for send operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    /// The receiving side is gone (client disconnected).
    #[error("event channel closed")]
    Closed,
    /// The stream overflowed and accepts no more events.
    #[error("event channel overflowed")]
    Overflowed,
}

/// Sender side of an event channel.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
    overflow: Arc<watch::Sender<bool>>,
}

impl EventSender {
    /// Sends an event, waiting for buffer space.
    pub async fn send(&self, event: impl Into<Event>) -> Result<(), SendError> {
        if self.is_overflowed() {
            return Err(SendError::Overflowed);
        }
        self.sender.send(event.into()).await.map_err(|_| self.closed_reason())
    }

    /// Sends multiple events in order, stopping at the first failure.
    pub async fn send_many(&self, events: impl IntoIterator<Item = Event>) -> Result<(), SendError> {
        for event in events {
            self.send(event).await?;
        }
        Ok(())
    }

    /// Sends without waiting. A full buffer overflows the stream.
    pub fn try_send(&self, event: impl Into<Event>) -> Result<(), SendError> {
        if self.is_overflowed() {
            return Err(SendError::Overflowed);
        }
        match self.sender.try_send(event.into()) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(event)) => {
                warn!(
                    event_type = %event.event_type(),
                    capacity = self.sender.max_capacity(),
                    "event channel full, stream overflowed"
                );
                self.overflow.send_replace(true);
                Err(SendError::Overflowed)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(self.closed_reason()),
        }
    }

    /// True once the stream has overflowed.
    pub fn is_overflowed(&self) -> bool {
        *self.overflow.borrow()
    }

    /// Checks if the receiver is still connected.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    fn closed_reason(&self) -> SendError {
        if self.is_overflowed() {
            SendError::Overflowed
        } else {
            SendError::Closed
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReceiverState {
    Open,
    Draining,
    Done,
}

/// Receiver side of an event channel.
#[derive(Debug)]
pub struct EventReceiver {
    receiver: mpsc::Receiver<Event>,
    overflow: watch::Receiver<bool>,
    watching: bool,
    state: ReceiverState,
}

impl EventReceiver {
    /// Receives the next event in send order.
    ///
    /// Returns `None` once every sender is dropped, or after the overflow
    /// event of an overflowed stream.
    pub async fn recv(&mut self) -> Option<Event> {
        loop {
            match self.state {
                ReceiverState::Done => return None,
                ReceiverState::Draining => {
                    return match self.receiver.try_recv() {
                        Ok(event) => Some(event),
                        Err(_) => {
                            self.state = ReceiverState::Done;
                            Some(overflow_event())
                        }
                    };
                }
                ReceiverState::Open => {}
            }

            tokio::select! {
                biased;
                event = self.receiver.recv() => match event {
                    Some(event) => return Some(event),
                    None if *self.overflow.borrow() => self.start_draining(),
                    None => {
                        debug!("event channel closed by producer");
                        self.state = ReceiverState::Done;
                    }
                },
                changed = self.overflow.changed(), if self.watching => match changed {
                    Ok(()) if *self.overflow.borrow_and_update() => self.start_draining(),
                    Ok(()) => {}
                    Err(_) => self.watching = false,
                },
            }
        }
    }

    /// Converts the receiver into a stream of events.
    pub fn into_stream(self) -> impl Stream<Item = Event> + Send + 'static {
        futures::stream::unfold(self, |mut receiver| async move {
            receiver.recv().await.map(|event| (event, receiver))
        })
    }

    fn start_draining(&mut self) {
        // Closing stops blocked senders from refilling the buffer.
        self.receiver.close();
        self.state = ReceiverState::Draining;
    }
}

fn overflow_event() -> Event {
    RunErrorEvent::new("Event stream overflowed; events were dropped")
        .with_code(STREAM_OVERFLOW_CODE)
        .into()
}

/// Creates a connected sender/receiver pair holding up to `capacity` events.
///
/// # Panics
///
/// Panics if `capacity` is zero, like `tokio::sync::mpsc::channel`.
pub fn channel(capacity: usize) -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    let (overflow_tx, overflow_rx) = watch::channel(false);
    (
        EventSender {
            sender: tx,
            overflow: Arc::new(overflow_tx),
        },
        EventReceiver {
            receiver: rx,
            overflow: overflow_rx,
            watching: true,
            state: ReceiverState::Open,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use agui_core::{EventType, MessageId, TextMessageContentEvent, TextMessageStartEvent};
    use futures::StreamExt;

    #[tokio::test]
    async fn test_channel_creation() {
        let (sender, _receiver) = channel(10);
        assert!(!sender.is_closed());
        assert!(!sender.is_overflowed());
    }

    #[tokio::test]
    async fn test_events_arrive_in_send_order() {
        let (sender, receiver) = channel(10);

        let events: Vec<Event> = vec![
            TextMessageStartEvent::new("m1").into(),
            TextMessageContentEvent::new_unchecked("m1", "Hello").into(),
            RunErrorEvent::new("test error").into(),
        ];
        sender.send_many(events.clone()).await.unwrap();
        drop(sender);

        let received: Vec<Event> = receiver.into_stream().collect().await;
        assert_eq!(received, events);
    }

    #[tokio::test]
    async fn test_channel_close_detection() {
        let (sender, receiver) = channel(10);
        drop(receiver);

        assert!(sender.is_closed());
        let result = sender.send(RunErrorEvent::new("test")).await;
        assert_eq!(result, Err(SendError::Closed));
    }

    #[tokio::test]
    async fn test_overflow_delivers_buffer_then_error() {
        let (sender, mut receiver) = channel(2);

        sender.try_send(TextMessageStartEvent::new(MessageId::random())).unwrap();
        sender.try_send(RunErrorEvent::new("second")).unwrap();
        assert_eq!(
            sender.try_send(RunErrorEvent::new("third")),
            Err(SendError::Overflowed)
        );
        assert!(sender.is_overflowed());

        // The sender is still alive; the receiver must not wait for it.
        assert_eq!(receiver.recv().await.unwrap().event_type(), EventType::TextMessageStart);
        assert_eq!(receiver.recv().await.unwrap().event_type(), EventType::RunError);

        match receiver.recv().await {
            Some(Event::RunError(e)) => assert_eq!(e.code.as_deref(), Some("STREAM_OVERFLOW")),
            other => panic!("expected overflow error, got {other:?}"),
        }
        assert!(receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_sends_after_overflow_are_refused() {
        let (sender, _receiver) = channel(1);
        sender.try_send(RunErrorEvent::new("a")).unwrap();
        assert!(sender.try_send(RunErrorEvent::new("b")).is_err());

        assert_eq!(
            sender.send(RunErrorEvent::new("c")).await,
            Err(SendError::Overflowed)
        );
        assert_eq!(sender.clone().try_send(RunErrorEvent::new("d")), Err(SendError::Overflowed));
    }

    #[tokio::test]
    async fn test_overflow_after_senders_dropped() {
        let (sender, receiver) = channel(1);
        sender.try_send(RunErrorEvent::new("a")).unwrap();
        let _ = sender.try_send(RunErrorEvent::new("b"));
        drop(sender);

        let received: Vec<Event> = receiver.into_stream().collect().await;
        assert_eq!(received.len(), 2);
        assert!(received[1].is_terminal());
    }

    #[tokio::test]
    async fn test_backpressure_send_waits() {
        let (sender, mut receiver) = channel(1);
        sender.send(RunErrorEvent::new("a")).await.unwrap();

        let producer = tokio::spawn(async move {
            sender.send(RunErrorEvent::new("b")).await
        });

        assert!(receiver.recv().await.is_some());
        assert!(producer.await.unwrap().is_ok());
        assert!(receiver.recv().await.is_some());
        assert!(receiver.recv().await.is_none());
    }
}
