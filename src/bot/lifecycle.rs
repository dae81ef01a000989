//! Message Lifecycle module
//!
//! Keeps each conversation tidy: at most one live menu message (edited in
//! place whenever Telegram allows it) and at most one live answer message
//! (deleted and re-sent on every new answer). Every message the bot sends is
//! tracked so that a later clear can remove it.
//!
//! All side effects are best effort and never rolled back. Recoveries are
//! reported through [`MenuOutcome`] and [`AnswerOutcome`] instead of being
//! swallowed silently.

use teloxide::types::{ChatId, InlineKeyboardMarkup, MessageId};
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, warn};

use crate::catalog::{Catalog, Pool};
use crate::config::LifecycleConfig;
use crate::errors::TransportError;
use crate::state::{ConversationState, ConversationStore};
use crate::transport::{ChatTransport, MessageRef};

use super::ui_builder::{render_menu, MenuScreen};

/// How `ensure_menu` put the menu on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// The existing menu message was edited in place
    Edited(MessageRef),
    /// A new menu message was sent. `replaced_stale` is set when an edit was
    /// attempted first and failed.
    Sent {
        message: MessageRef,
        replaced_stale: bool,
    },
}

impl MenuOutcome {
    pub fn message(&self) -> MessageRef {
        match self {
            MenuOutcome::Edited(message) => *message,
            MenuOutcome::Sent { message, .. } => *message,
        }
    }
}

/// What happened to the previous answer during `replace_answer`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviousAnswer {
    NoPrevious,
    Deleted(MessageRef),
    /// Deletion was attempted and failed; the message may still be visible
    DeleteFailed(MessageRef),
}

/// Result of `replace_answer`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub message: MessageRef,
    pub previous: PreviousAnswer,
}

/// Owns the chat transport and every conversation's bookkeeping
pub struct MessageLifecycle<T> {
    transport: T,
    store: ConversationStore,
    config: LifecycleConfig,
}

impl<T: ChatTransport> MessageLifecycle<T> {
    pub fn new(transport: T, config: LifecycleConfig) -> Self {
        Self {
            transport,
            store: ConversationStore::new(config.history_capacity),
            config,
        }
    }

    /// Lock `chat_id` and open a session on it.
    ///
    /// Other events for the same conversation wait until the session is
    /// dropped; other conversations are unaffected.
    pub async fn session(&self, chat_id: ChatId) -> ConversationSession<'_, T> {
        let state = self.store.lock(chat_id).await;
        ConversationSession {
            transport: &self.transport,
            config: self.config,
            chat_id,
            state,
        }
    }
}

/// Exclusive access to one conversation for the duration of an event
pub struct ConversationSession<'a, T> {
    pub(super) transport: &'a T,
    pub(super) config: LifecycleConfig,
    pub(super) chat_id: ChatId,
    pub(super) state: OwnedMutexGuard<ConversationState>,
}

impl<T: ChatTransport> ConversationSession<'_, T> {
    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    /// Read-only view of the conversation bookkeeping
    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Record a message as eligible for bulk cleanup
    pub fn track(&mut self, message_id: MessageId) {
        if let Some(evicted) = self.state.tracked.push(message_id) {
            debug!(chat_id = %self.chat_id, message_id = evicted.0, "History full, stopped tracking oldest message");
        }
    }

    /// Treat `message_id` as the live menu if no menu is known yet
    pub fn adopt_menu(&mut self, message_id: MessageId) {
        if self.state.menu.is_none() {
            debug!(chat_id = %self.chat_id, message_id = message_id.0, "Adopting pressed message as menu");
            self.state.menu = Some(MessageRef::new(self.chat_id, message_id));
        }
    }

    /// Forget the current menu and answer so the next render sends fresh messages
    pub fn reset(&mut self) {
        self.state.forget_screen();
    }

    async fn send_tracked(
        &mut self,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageRef, TransportError> {
        let message = self
            .transport
            .send_message(self.chat_id, text, keyboard)
            .await?;
        self.track(message.message_id);
        Ok(message)
    }

    /// Show `text` and `keyboard` in the single menu message.
    ///
    /// Edits the stored menu when there is one. A failed edit marks the
    /// reference stale and a new message is sent instead.
    pub async fn ensure_menu(
        &mut self,
        text: &str,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<MenuOutcome, TransportError> {
        let mut replaced_stale = false;

        if let Some(menu) = self.state.menu {
            match self
                .transport
                .edit_message_text(menu, text, Some(keyboard.clone()))
                .await
            {
                Ok(()) => {
                    debug!(chat_id = %self.chat_id, message_id = menu.message_id.0, "Menu edited in place");
                    return Ok(MenuOutcome::Edited(menu));
                }
                Err(e) => {
                    warn!(chat_id = %self.chat_id, message_id = menu.message_id.0, error = %e, "Menu message is stale, sending a new one");
                    self.state.menu = None;
                    replaced_stale = true;
                }
            }
        }

        let message = self.send_tracked(text, Some(keyboard)).await?;
        self.state.menu = Some(message);
        debug!(chat_id = %self.chat_id, message_id = message.message_id.0, "Menu sent");

        Ok(MenuOutcome::Sent {
            message,
            replaced_stale,
        })
    }

    /// Render `screen` into the menu message
    pub async fn show_menu(
        &mut self,
        screen: &MenuScreen,
        catalog: &Catalog,
        language_code: Option<&str>,
    ) -> Result<MenuOutcome, TransportError> {
        let (text, keyboard) = render_menu(screen, catalog, language_code);
        self.ensure_menu(&text, keyboard).await
    }

    pub async fn set_menu_to_main(
        &mut self,
        catalog: &Catalog,
        language_code: Option<&str>,
    ) -> Result<MenuOutcome, TransportError> {
        self.show_menu(&MenuScreen::Main, catalog, language_code)
            .await
    }

    pub async fn set_menu_to_categories(
        &mut self,
        catalog: &Catalog,
        language_code: Option<&str>,
    ) -> Result<MenuOutcome, TransportError> {
        self.show_menu(&MenuScreen::Categories, catalog, language_code)
            .await
    }

    pub async fn set_menu_to_count(
        &mut self,
        pool: Pool,
        catalog: &Catalog,
        language_code: Option<&str>,
    ) -> Result<MenuOutcome, TransportError> {
        self.show_menu(&MenuScreen::Count(pool), catalog, language_code)
            .await
    }

    /// Replace the single answer message with `text`.
    ///
    /// The previous answer is deleted first; a failed delete is logged and
    /// never prevents the new answer from being sent.
    pub async fn replace_answer(
        &mut self,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<AnswerOutcome, TransportError> {
        let previous = match self.state.answer.take() {
            None => PreviousAnswer::NoPrevious,
            Some(old) => match self.transport.delete_message(old).await {
                Ok(()) => PreviousAnswer::Deleted(old),
                Err(e) => {
                    warn!(chat_id = %self.chat_id, message_id = old.message_id.0, error = %e, "Failed to delete previous answer");
                    PreviousAnswer::DeleteFailed(old)
                }
            },
        };

        let message = self.send_tracked(text, keyboard).await?;
        self.state.answer = Some(message);

        Ok(AnswerOutcome { message, previous })
    }
}
