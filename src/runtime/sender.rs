//! Broadcast sender with explicit end-of-stream signaling

use crossbeam_channel::{SendError, Sender as CrossbeamSender};

/// Channel message wrapper for end-of-stream signaling
///
/// Wraps data flowing through channels so sources can explicitly signal
/// when no more data will be sent. Nodes never see this enum directly —
/// [`Sender::send`] wraps values in `Sample(T)` and
/// [`Receiver::recv`](super::receiver::Receiver::recv) unwraps them
/// transparently.
#[derive(Clone, Debug)]
pub enum ChannelMessage<T> {
    /// A data sample
    Sample(T),
    /// End-of-stream marker — no more data will be sent
    EndOfStream,
}

/// Broadcast sender that sends to one or more consumers
///
/// Sends directly from the caller thread to all destinations, in order.
pub struct Sender<T> {
    destinations: Vec<CrossbeamSender<ChannelMessage<T>>>,
}

impl<T: Clone> Sender<T> {
    /// Create a new Sender from a vector of crossbeam senders
    pub fn new(destinations: Vec<CrossbeamSender<ChannelMessage<T>>>) -> Self {
        Self { destinations }
    }

    /// Get the number of broadcast destinations
    pub fn num_destinations(&self) -> usize {
        self.destinations.len()
    }

    /// Send a value to all destinations
    ///
    /// Only fails if no destination accepted the value; a sender with no
    /// destinations silently discards.
    pub fn send(&self, value: T) -> Result<(), SendError<T>> {
        if self.destinations.is_empty() {
            return Ok(());
        }

        let mut any_success = false;
        let mut last_error = None;

        for dest in &self.destinations {
            match dest.send(ChannelMessage::Sample(value.clone())) {
                Ok(()) => any_success = true,
                Err(SendError(msg)) => {
                    if let ChannelMessage::Sample(v) = msg {
                        last_error = Some(SendError(v));
                    }
                }
            }
        }

        if !any_success {
            if let Some(e) = last_error {
                return Err(e);
            }
        }

        Ok(())
    }

    /// Signal end-of-stream to all destinations
    ///
    /// Downstream [`Receiver`](super::receiver::Receiver)s will return
    /// `WorkError::Shutdown` on subsequent `recv()`/`peek()` calls. Call this
    /// before dropping the sender when a node has finished producing data.
    pub fn close(&self) {
        for dest in &self.destinations {
            let _ = dest.send(ChannelMessage::EndOfStream);
        }
    }
}

impl<T: Clone> Clone for Sender<T> {
    fn clone(&self) -> Self {
        Self {
            destinations: self.destinations.clone(),
        }
    }
}
