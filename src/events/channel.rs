//! Event channel built on crossbeam-channel.
//!
//! Hash workers run on a rayon pool, so the sender has to be cheap to
//! clone and safe to share across threads.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::Event;

/// Sends events from the core library.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event.
    ///
    /// If the receiver is dropped, the event is silently discarded.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Receives events from the core library.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event is received
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Iterate until every sender has been dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Factory for sender/receiver pairs.
pub struct EventChannel;

impl EventChannel {
    /// Create a new unbounded event channel.
    ///
    /// Unbounded so a slow progress bar never stalls a hash worker.
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// A sender whose receiver is already gone.
///
/// Used by `Pipeline::run` and tests that don't care about progress.
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{HashEvent, HashProgress, PipelineEvent};
    use std::thread;

    #[test]
    fn progress_crosses_threads() {
        let (sender, receiver) = EventChannel::new();

        let workers: Vec<_> = (0..4)
            .map(|i| {
                let sender = sender.clone();
                thread::spawn(move || {
                    sender.send(Event::Hash(HashEvent::Progress(HashProgress {
                        completed: i + 1,
                        total: 4,
                        current_frame: format!("{:06}.png", i),
                    })));
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        drop(sender);

        let received: Vec<_> = receiver.iter().collect();
        assert_eq!(received.len(), 4);
    }

    #[test]
    fn null_sender_does_not_panic() {
        let sender = null_sender();
        sender.send(Event::Pipeline(PipelineEvent::Started));
    }

    #[test]
    fn try_recv_is_empty_until_sent() {
        let (sender, receiver) = EventChannel::new();
        assert!(receiver.try_recv().is_none());

        sender.send(Event::Pipeline(PipelineEvent::Cancelled));
        assert!(matches!(
            receiver.recv(),
            Some(Event::Pipeline(PipelineEvent::Cancelled))
        ));
    }
}
