//! In-memory FIFO request queue
//!
//! Insertion order is service order; there is no priority. The queue is
//! owned exclusively by the scheduler, which is the only execution context
//! that touches it, so no locking happens here. Capacity is optional:
//! unbounded matches the source system, a bound is the recommended
//! production configuration.

use crate::playback::request::PlaybackRequest;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Ordered FIFO of pending playback requests
#[derive(Debug, Default)]
pub struct RequestQueue {
    entries: VecDeque<PlaybackRequest>,
    max_len: Option<usize>,
}

impl RequestQueue {
    pub fn new(max_len: Option<usize>) -> Self {
        Self {
            entries: VecDeque::new(),
            max_len,
        }
    }

    /// Append at the tail. Returns false when a configured capacity is
    /// reached; the new request is rejected, never an older one evicted.
    pub fn push(&mut self, request: PlaybackRequest) -> bool {
        if let Some(max) = self.max_len {
            if self.entries.len() >= max {
                warn!(
                    request_id = %request.id,
                    title = %request.title,
                    max,
                    "queue full, rejecting request"
                );
                return false;
            }
        }
        debug!(request_id = %request.id, title = %request.title, "enqueued");
        self.entries.push_back(request);
        true
    }

    /// Remove and return the head
    pub fn pop_front(&mut self) -> Option<PlaybackRequest> {
        self.entries.pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pending requests in service order
    pub fn iter(&self) -> impl Iterator<Item = &PlaybackRequest> {
        self.entries.iter()
    }
}
