//! Type-erased channel endpoints for node connections
//!
//! InputPort and OutputPort wrap channel endpoints behind `Any` so a
//! heterogeneous set of nodes can share the `ProcessNode::work` signature.
//! Ports own the state that must persist across `work()` calls (the cached
//! end-of-stream flag); the per-node putback buffers live in the nodes
//! themselves.

use crossbeam_channel::Receiver as CrossbeamReceiver;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::AtomicBool;

use super::receiver::Receiver;
use super::sender::{ChannelMessage, Sender};

/// Create a connected output/input port pair over a bounded channel.
pub fn channel<T: Send + Clone + 'static>(capacity: usize) -> (OutputPort, InputPort) {
    let (tx, rx) = crossbeam_channel::bounded::<ChannelMessage<T>>(capacity);
    (OutputPort::new(Sender::new(vec![tx])), InputPort::new(rx))
}

/// Type-erased input port wrapping a channel receiver
pub struct InputPort {
    channel: Box<dyn std::any::Any + Send>,
    eos: AtomicBool,
}

impl InputPort {
    /// Create an input port from a raw channel receiver.
    pub fn new<T: Send + 'static>(receiver: CrossbeamReceiver<ChannelMessage<T>>) -> Self {
        Self {
            channel: Box::new(receiver),
            eos: AtomicBool::new(false),
        }
    }

    /// Get a [`Receiver`] over this port, using the caller's putback buffer.
    ///
    /// Returns None if the port doesn't carry items of type `T`.
    pub fn get<'a, T: Send + 'static>(
        &'a self,
        buffer: &'a mut VecDeque<T>,
    ) -> Option<Receiver<'a, T>> {
        let receiver = self
            .channel
            .downcast_ref::<CrossbeamReceiver<ChannelMessage<T>>>()?;
        Some(Receiver::new(receiver, buffer, &self.eos))
    }
}

/// Type-erased output port wrapping a broadcast [`Sender`]
pub struct OutputPort {
    channel: Box<dyn std::any::Any + Send>,
}

impl OutputPort {
    /// Create an output port from a broadcast sender.
    pub fn new<T: Send + Clone + 'static>(sender: Sender<T>) -> Self {
        Self {
            channel: Box::new(sender),
        }
    }

    /// Get an owned [`Sender`] for this port (cheaply cloned).
    ///
    /// Returns None if the port doesn't carry items of type `T`.
    pub fn get<T: Send + Clone + 'static>(&self) -> Option<Sender<T>> {
        self.channel.downcast_ref::<Sender<T>>().cloned()
    }
}

impl fmt::Debug for OutputPort {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "OutputPort")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_pair_round_trip() {
        let (out, inp) = channel::<u32>(8);
        let tx = out.get::<u32>().unwrap();
        tx.send(7).unwrap();
        tx.close();

        let mut buf = VecDeque::new();
        let mut rx = inp.get::<u32>(&mut buf).unwrap();
        assert_eq!(rx.recv().unwrap(), 7);
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_type_mismatch_returns_none() {
        let (out, inp) = channel::<u32>(8);
        assert!(out.get::<i64>().is_none());

        let mut buf = VecDeque::new();
        assert!(inp.get::<i64>(&mut buf).is_none());
    }
}
