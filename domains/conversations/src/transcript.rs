//! Bounded, in-memory chat transcripts keyed by project id
//!
//! At most `capacity` projects keep a transcript; the least recently used one
//! is evicted first. Each transcript keeps its newest `max_messages` messages.

use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

use lru::LruCache;
use shipwright_common::{Error, Result};
use uuid::Uuid;

use crate::domain::entities::ChatMessage;

pub struct TranscriptCache {
    inner: Mutex<LruCache<Uuid, Vec<ChatMessage>>>,
    max_messages: usize,
}

impl TranscriptCache {
    pub fn new(capacity: usize, max_messages: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            Error::Validation("Transcript cache capacity must be greater than 0".to_string())
        })?;
        if max_messages == 0 {
            return Err(Error::Validation(
                "Transcript message limit must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            inner: Mutex::new(LruCache::new(capacity)),
            max_messages,
        })
    }

    /// Copy of a project's transcript, oldest first
    pub fn history(&self, project_id: Uuid) -> Vec<ChatMessage> {
        let mut cache = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get(&project_id).cloned().unwrap_or_default()
    }

    /// Append messages, dropping the oldest beyond the per-transcript limit
    pub fn append(&self, project_id: Uuid, messages: impl IntoIterator<Item = ChatMessage>) {
        let mut cache = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let transcript = cache.get_or_insert_mut(project_id, Vec::new);
        transcript.extend(messages);

        if transcript.len() > self.max_messages {
            let excess = transcript.len() - self.max_messages;
            transcript.drain(..excess);
        }
    }

    /// Forget a project's transcript
    pub fn clear(&self, project_id: Uuid) -> bool {
        let mut cache = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        cache.pop(&project_id).is_some()
    }

    /// Number of projects currently holding a transcript
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
