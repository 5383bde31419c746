use crate::error::PublisherError;

/// Fire-and-forget outbound channel. `send` returns once the envelope is
/// accepted into the local queue; there is no delivery acknowledgment.
pub trait MessageSink: Send {
    fn send(&mut self, envelope: Vec<u8>) -> Result<(), PublisherError>;

    /// Flushes within the sink's drain window and releases the channel.
    fn close(self: Box<Self>) -> Result<(), PublisherError>;
}
