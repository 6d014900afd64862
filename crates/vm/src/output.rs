//! The output channel: append-only, fixed capacity.

use thiserror::Error;

/// Returned by [`OutputChannel::push`] when the channel is at capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("output channel full ({capacity} values)")]
pub struct ChannelFull {
    pub capacity: usize,
}

/// Values emitted by SIO mode 1, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputChannel {
    values: Vec<i64>,
    capacity: usize,
}

impl OutputChannel {
    /// An empty channel holding at most `capacity` values.
    pub fn new(capacity: usize) -> Self {
        Self {
            values: Vec::new(),
            capacity,
        }
    }

    /// Append a value. Fails without modifying the channel when full.
    pub fn push(&mut self, value: i64) -> Result<(), ChannelFull> {
        if self.values.len() >= self.capacity {
            return Err(ChannelFull {
                capacity: self.capacity,
            });
        }
        self.values.push(value);
        Ok(())
    }

    /// Values emitted so far, oldest first.
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Maximum number of values.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Consume the channel, returning its values.
    pub fn into_values(self) -> Vec<i64> {
        self.values
    }
}
