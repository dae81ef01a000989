//! # Conversation State Module
//!
//! Per-conversation bookkeeping of the messages the bot has put on screen.
//! States are created lazily on first use and kept for the process lifetime.
//!
//! ## Locking
//!
//! Every conversation owns its own async mutex. The outer map lock is held
//! only long enough to look up or insert that mutex, so conversations never
//! wait on each other; events for the same conversation are serialized by
//! holding the per-conversation guard for the whole event.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use teloxide::types::{ChatId, MessageId};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::transport::MessageRef;

/// Fixed-capacity FIFO of tracked message ids.
///
/// Pushing into a full history drops the oldest id. Eviction only stops
/// tracking; it never deletes anything.
#[derive(Debug, Clone)]
pub struct BoundedHistory {
    items: VecDeque<MessageId>,
    capacity: usize,
}

impl BoundedHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Track `id`, returning the evicted id if the history was full.
    /// An id that is already tracked moves to the newest position.
    pub fn push(&mut self, id: MessageId) -> Option<MessageId> {
        if let Some(pos) = self.items.iter().position(|&tracked| tracked == id) {
            self.items.remove(pos);
            self.items.push_back(id);
            return None;
        }
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(id);
        evicted
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.items.contains(&id)
    }

    /// Oldest first
    pub fn to_vec(&self) -> Vec<MessageId> {
        self.items.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// What the bot currently shows in one conversation
#[derive(Debug, Clone)]
pub struct ConversationState {
    pub menu: Option<MessageRef>,
    pub answer: Option<MessageRef>,
    pub tracked: BoundedHistory,
}

impl ConversationState {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            menu: None,
            answer: None,
            tracked: BoundedHistory::new(history_capacity),
        }
    }

    /// Forget the live menu and answer without touching tracked history
    pub fn forget_screen(&mut self) {
        self.menu = None;
        self.answer = None;
    }

    /// Drop all bookkeeping
    pub fn reset(&mut self) {
        self.forget_screen();
        self.tracked.clear();
    }
}

/// Concurrency-safe map of conversation states
#[derive(Debug)]
pub struct ConversationStore {
    history_capacity: usize,
    conversations: Mutex<HashMap<ChatId, Arc<Mutex<ConversationState>>>>,
}

impl ConversationStore {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            history_capacity,
            conversations: Mutex::new(HashMap::new()),
        }
    }

    /// Lock the state of `chat_id`, creating it on first use.
    ///
    /// The guard must be held for the whole read-modify-write of an event.
    pub async fn lock(&self, chat_id: ChatId) -> OwnedMutexGuard<ConversationState> {
        let slot = {
            let mut conversations = self.conversations.lock().await;
            Arc::clone(
                conversations
                    .entry(chat_id)
                    .or_insert_with(|| Arc::new(Mutex::new(ConversationState::new(self.history_capacity)))),
            )
        };
        slot.lock_owned().await
    }

    /// Number of conversations seen so far
    pub async fn len(&self) -> usize {
        self.conversations.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = BoundedHistory::new(3);
        assert_eq!(history.push(MessageId(1)), None);
        assert_eq!(history.push(MessageId(2)), None);
        assert_eq!(history.push(MessageId(3)), None);
        assert_eq!(history.push(MessageId(4)), Some(MessageId(1)));

        assert_eq!(history.len(), 3);
        assert_eq!(
            history.to_vec(),
            vec![MessageId(2), MessageId(3), MessageId(4)]
        );
    }

    #[test]
    fn test_history_never_exceeds_capacity() {
        let mut history = BoundedHistory::new(400);
        for i in 0..1000 {
            history.push(MessageId(i));
            assert!(history.len() <= history.capacity());
        }
        assert_eq!(history.len(), 400);
        assert_eq!(history.to_vec().first(), Some(&MessageId(600)));
    }

    #[test]
    fn test_retracking_moves_id_to_newest() {
        let mut history = BoundedHistory::new(2);
        history.push(MessageId(1));
        history.push(MessageId(2));

        assert_eq!(history.push(MessageId(1)), None);
        assert_eq!(history.to_vec(), vec![MessageId(2), MessageId(1)]);

        // The re-tracked id survives the next eviction
        assert_eq!(history.push(MessageId(3)), Some(MessageId(2)));
        assert_eq!(history.to_vec(), vec![MessageId(1), MessageId(3)]);
    }

    #[test]
    fn test_reset_clears_everything() {
        let chat = ChatId(5);
        let mut state = ConversationState::new(10);
        state.menu = Some(MessageRef::new(chat, MessageId(1)));
        state.answer = Some(MessageRef::new(chat, MessageId(2)));
        state.tracked.push(MessageId(1));

        state.forget_screen();
        assert!(state.menu.is_none() && state.answer.is_none());
        assert_eq!(state.tracked.len(), 1);

        state.reset();
        assert!(state.tracked.is_empty());
    }

    #[tokio::test]
    async fn test_store_creates_state_lazily() {
        let store = ConversationStore::new(10);
        assert!(store.is_empty().await);

        {
            let mut state = store.lock(ChatId(1)).await;
            state.tracked.push(MessageId(7));
        }
        let state = store.lock(ChatId(1)).await;
        assert!(state.tracked.contains(MessageId(7)));
        assert_eq!(state.tracked.capacity(), 10);
        drop(state);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_other_conversations_are_not_blocked() {
        let store = ConversationStore::new(10);
        let _held = store.lock(ChatId(1)).await;

        let other = tokio::time::timeout(Duration::from_millis(200), store.lock(ChatId(2))).await;
        assert!(other.is_ok());

        let same = tokio::time::timeout(Duration::from_millis(50), store.lock(ChatId(1))).await;
        assert!(same.is_err());
    }
}
