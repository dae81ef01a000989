//! Recording chat transport with failure injection, shared by the
//! integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use teloxide::types::{ChatId, InlineKeyboardMarkup, MessageId};

use dish_picker::errors::TransportError;
use dish_picker::transport::{ChatTransport, MessageRef};

/// One transport call as observed by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Send {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    },
    Edit {
        message: MessageRef,
        text: String,
        ok: bool,
    },
    Delete {
        message: MessageRef,
        ok: bool,
    },
    BulkDelete {
        chat_id: ChatId,
        message_ids: Vec<MessageId>,
        ok: bool,
    },
}

#[derive(Default)]
struct Inner {
    next_id: i32,
    calls: Vec<Call>,
    fail_edits: bool,
    fail_single_deletes: bool,
    failing_deletes: HashSet<MessageId>,
    failing_bulk_calls: HashSet<usize>,
    bulk_calls_seen: usize,
    yield_calls: bool,
}

#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

impl MockTransport {
    pub fn new() -> Self {
        let transport = Self::default();
        transport.inner.lock().unwrap().next_id = 1000;
        transport
    }

    pub fn set_fail_edits(&self, fail: bool) {
        self.inner.lock().unwrap().fail_edits = fail;
    }

    pub fn set_fail_single_deletes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_single_deletes = fail;
    }

    pub fn fail_delete_of(&self, message_id: MessageId) {
        self.inner.lock().unwrap().failing_deletes.insert(message_id);
    }

    /// Make the n-th bulk delete call (zero based) fail
    pub fn fail_bulk_call(&self, index: usize) {
        self.inner.lock().unwrap().failing_bulk_calls.insert(index);
    }

    /// Make every call yield to the runtime before it completes, so that
    /// concurrently dispatched events can interleave at transport awaits
    pub fn set_yield_calls(&self, yield_calls: bool) {
        self.inner.lock().unwrap().yield_calls = yield_calls;
    }

    async fn pause(&self) {
        let yield_calls = self.inner.lock().unwrap().yield_calls;
        if yield_calls {
            tokio::task::yield_now().await;
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    pub fn sends(&self) -> Vec<(MessageId, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Send {
                    message_id, text, ..
                } => Some((message_id, text)),
                _ => None,
            })
            .collect()
    }

    pub fn edits(&self) -> Vec<(MessageRef, bool)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Edit { message, ok, .. } => Some((message, ok)),
                _ => None,
            })
            .collect()
    }

    pub fn single_deletes(&self) -> Vec<(MessageId, bool)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Delete { message, ok } => Some((message.message_id, ok)),
                _ => None,
            })
            .collect()
    }

    pub fn bulk_deletes(&self) -> Vec<(Vec<MessageId>, bool)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::BulkDelete {
                    message_ids, ok, ..
                } => Some((message_ids, ok)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageRef, TransportError> {
        self.pause().await;
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let message_id = MessageId(inner.next_id);
        inner.calls.push(Call::Send {
            chat_id,
            message_id,
            text: text.to_string(),
            keyboard,
        });
        Ok(MessageRef::new(chat_id, message_id))
    }

    async fn edit_message_text(
        &self,
        message: MessageRef,
        text: &str,
        _keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), TransportError> {
        self.pause().await;
        let mut inner = self.inner.lock().unwrap();
        let ok = !inner.fail_edits;
        inner.calls.push(Call::Edit {
            message,
            text: text.to_string(),
            ok,
        });
        if ok {
            Ok(())
        } else {
            Err(TransportError::Rejected("message can't be edited".to_string()))
        }
    }

    async fn delete_message(&self, message: MessageRef) -> Result<(), TransportError> {
        self.pause().await;
        let mut inner = self.inner.lock().unwrap();
        let ok = !inner.fail_single_deletes && !inner.failing_deletes.contains(&message.message_id);
        inner.calls.push(Call::Delete { message, ok });
        if ok {
            Ok(())
        } else {
            Err(TransportError::Rejected("message can't be deleted".to_string()))
        }
    }

    async fn delete_messages(
        &self,
        chat_id: ChatId,
        message_ids: &[MessageId],
    ) -> Result<(), TransportError> {
        self.pause().await;
        let mut inner = self.inner.lock().unwrap();
        let index = inner.bulk_calls_seen;
        inner.bulk_calls_seen += 1;
        let ok = !inner.failing_bulk_calls.contains(&index);
        inner.calls.push(Call::BulkDelete {
            chat_id,
            message_ids: message_ids.to_vec(),
            ok,
        });
        if ok {
            Ok(())
        } else {
            Err(TransportError::Rejected("some messages can't be deleted".to_string()))
        }
    }
}
