//! Event channel implementation using crossbeam-channel.
//!
//! The pipeline sends events from the thread that drives it; any UI layer
//! drains them from another thread.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::Event;

/// Sends events from the core library.
///
/// Cheap to clone and safe to move across threads.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event.
    ///
    /// If the receiver is gone the event is dropped, which keeps progress
    /// reporting optional for the pipeline.
    pub fn send(&self, event: impl Into<Event>) {
        let _ = self.inner.send(event.into());
    }
}

/// Receives events from the core library.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event arrives, or every sender is gone
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Iterate until every sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Constructors for linked sender/receiver pairs
pub struct EventChannel;

impl EventChannel {
    /// Create an unbounded event channel; the pipeline never blocks on it.
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// A sender whose receiver is already gone, for runs without a UI.
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{PipelineEvent, PipelinePhase};
    use std::thread;

    #[test]
    fn events_can_be_sent_across_threads() {
        let (sender, receiver) = EventChannel::new();

        let handle = thread::spawn(move || {
            sender.send(PipelineEvent::PhaseChanged {
                phase: PipelinePhase::Hashing,
            });
        });
        handle.join().unwrap();

        match receiver.recv() {
            Some(Event::Pipeline(PipelineEvent::PhaseChanged { phase })) => {
                assert_eq!(phase, PipelinePhase::Hashing);
            }
            other => panic!("Wrong event: {other:?}"),
        }
    }

    #[test]
    fn null_sender_does_not_panic() {
        null_sender().send(PipelineEvent::Started);
    }

    #[test]
    fn receiver_ends_when_senders_drop() {
        let (sender, receiver) = EventChannel::new();
        sender.send(PipelineEvent::Started);
        drop(sender);

        assert_eq!(receiver.iter().count(), 1);
        assert!(receiver.recv().is_none());
    }
}
