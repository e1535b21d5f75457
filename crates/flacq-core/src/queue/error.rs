use thiserror::Error;

/// Queue operation rejected; the queue is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("no queued job at position {position} (queue has {len})")]
    IndexOutOfRange { position: usize, len: usize },
}
