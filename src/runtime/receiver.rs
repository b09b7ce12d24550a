//! Channel receiver with a putback buffer and cached end-of-stream state
//!
//! [`Receiver`] wraps a single `crossbeam_channel::Receiver<ChannelMessage<T>>`
//! with a putback buffer, providing `recv`, `peek`, and `put_back`.
//! Transparently unwraps `ChannelMessage` and caches end-of-stream state so
//! subsequent calls return `Shutdown` immediately.

use crossbeam_channel::Receiver as CrossbeamReceiver;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use super::errors::{WorkError, WorkResult};
use super::sender::ChannelMessage;

/// A single crossbeam receiver with a putback buffer.
///
/// The buffer and end-of-stream flag are externally owned (passed by
/// reference) so they persist across `work()` calls in the owning node's
/// port. A disconnected channel is treated the same as an explicit
/// `EndOfStream` message.
pub struct Receiver<'a, T> {
    receiver: &'a CrossbeamReceiver<ChannelMessage<T>>,
    buffer: &'a mut VecDeque<T>,
    eos: &'a AtomicBool,
}

impl<'a, T> Receiver<'a, T> {
    /// Create a new receiver over a channel, buffer, and end-of-stream flag.
    pub fn new(
        receiver: &'a CrossbeamReceiver<ChannelMessage<T>>,
        buffer: &'a mut VecDeque<T>,
        eos: &'a AtomicBool,
    ) -> Self {
        Self {
            receiver,
            buffer,
            eos,
        }
    }

    /// Blocking receive. Returns from the putback buffer first, then falls
    /// through to the underlying channel.
    ///
    /// Returns `Err(WorkError::Shutdown)` if end-of-stream has been received
    /// (either now or in a previous call).
    pub fn recv(&mut self) -> WorkResult<T> {
        if self.eos.load(Ordering::Relaxed) {
            return Err(WorkError::Shutdown);
        }

        if let Some(item) = self.buffer.pop_front() {
            return Ok(item);
        }

        match self.receiver.recv() {
            Ok(ChannelMessage::Sample(item)) => Ok(item),
            Ok(ChannelMessage::EndOfStream) => {
                self.eos.store(true, Ordering::Relaxed);
                tracing::debug!("Receiver::recv() - end of stream");
                Err(WorkError::Shutdown)
            }
            Err(_) => {
                tracing::debug!("Receiver::recv() - channel disconnected");
                Err(WorkError::Shutdown)
            }
        }
    }

    /// Peek at the front item. If the buffer is empty, blocks on the channel
    /// to populate it.
    ///
    /// Returns `Err(WorkError::Shutdown)` if end-of-stream has been received.
    pub fn peek(&mut self) -> WorkResult<&T> {
        if self.eos.load(Ordering::Relaxed) {
            return Err(WorkError::Shutdown);
        }

        if self.buffer.is_empty() {
            match self.receiver.recv() {
                Ok(ChannelMessage::Sample(item)) => {
                    self.buffer.push_back(item);
                }
                Ok(ChannelMessage::EndOfStream) => {
                    self.eos.store(true, Ordering::Relaxed);
                    tracing::debug!("Receiver::peek() - end of stream");
                    return Err(WorkError::Shutdown);
                }
                Err(_) => {
                    tracing::debug!("Receiver::peek() - channel disconnected");
                    return Err(WorkError::Shutdown);
                }
            }
        }
        Ok(self.buffer.front().unwrap())
    }

    /// Push an item back to the front of the buffer so the next `recv()`
    /// returns it.
    pub fn put_back(&mut self, item: T) {
        self.buffer.push_front(item);
    }

    /// Check if there are any buffered items.
    pub fn has_buffered(&self) -> bool {
        !self.buffer.is_empty()
    }
}
