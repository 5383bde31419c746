use crate::error::PublisherError;
use crate::message_sink::MessageSink;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// In-process stand-in for the push socket. Clones share the same queue, so a
/// caller can keep one handle to act as the consumer while the publisher owns
/// another. Never blocks: a full queue is reported as `QueueFull`.
#[derive(Clone, Debug)]
pub struct MemorySink {
    capacity: u32,
    queue: Arc<Mutex<VecDeque<Vec<u8>>>>,
    closed: Arc<AtomicBool>,
}

impl MemorySink {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            queue: Arc::new(Mutex::new(VecDeque::new())),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Takes every queued envelope, oldest first.
    pub fn drain(&self) -> Vec<Vec<u8>> {
        self.queue.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl MessageSink for MemorySink {
    fn send(&mut self, envelope: Vec<u8>) -> Result<(), PublisherError> {
        let mut queue = self.queue.lock();

        if queue.len() >= self.capacity as usize {
            return Err(PublisherError::QueueFull {
                capacity: self.capacity,
            });
        }

        debug!("Queued envelope of {} bytes in memory", envelope.len());
        queue.push_back(envelope);

        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), PublisherError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
