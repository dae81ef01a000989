//! Interaction Router module: turns decoded intents into menu and answer
//! updates for one conversation.

use std::sync::Arc;
use teloxide::types::{ChatId, MessageId};
use tracing::{debug, info};

// Import localization
use crate::localization::t_lang;

use crate::catalog::Catalog;
use crate::config::LifecycleConfig;
use crate::errors::TransportError;
use crate::transport::ChatTransport;

use super::intent::Intent;
use super::lifecycle::MessageLifecycle;
use super::ui_builder::{format_dish_list, format_random_dish};

/// The message an event originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A command or text typed by the user
    UserMessage(MessageId),
    /// The bot message whose inline button was pressed
    MenuButton(MessageId),
}

pub struct Router<T> {
    lifecycle: MessageLifecycle<T>,
    catalog: Arc<Catalog>,
}

impl<T: ChatTransport> Router<T> {
    pub fn new(transport: T, catalog: Arc<Catalog>, config: LifecycleConfig) -> Self {
        Self {
            lifecycle: MessageLifecycle::new(transport, config),
            catalog,
        }
    }

    pub fn lifecycle(&self) -> &MessageLifecycle<T> {
        &self.lifecycle
    }

    /// Handle one user action in `chat_id`.
    ///
    /// The originating message is tracked so it is removed on the next clear.
    /// A pressed menu that the bot no longer knows about (for instance after a
    /// restart) is adopted as the live menu. The conversation stays locked
    /// until the action is fully rendered.
    pub async fn dispatch(
        &self,
        chat_id: ChatId,
        intent: Intent,
        origin: Option<Origin>,
        language_code: Option<&str>,
    ) -> Result<(), TransportError> {
        let catalog = self.catalog.as_ref();
        let mut session = self.lifecycle.session(chat_id).await;

        match origin {
            Some(Origin::UserMessage(message_id)) => session.track(message_id),
            Some(Origin::MenuButton(message_id)) => {
                session.track(message_id);
                session.adopt_menu(message_id);
            }
            None => {}
        }

        debug!(chat_id = %chat_id, intent = ?intent, "Dispatching intent");

        match intent {
            Intent::Start => {
                session.reset();
                session
                    .replace_answer(&t_lang("greeting", language_code), None)
                    .await?;
                session.set_menu_to_main(catalog, language_code).await?;
            }
            Intent::Help => {
                session
                    .replace_answer(&t_lang("help", language_code), None)
                    .await?;
            }
            Intent::ShowMenu => {
                session.set_menu_to_main(catalog, language_code).await?;
            }
            Intent::ShowCategories => {
                session
                    .set_menu_to_categories(catalog, language_code)
                    .await?;
            }
            Intent::RandomPick => {
                let text = match catalog.sample_random(&mut rand::thread_rng()) {
                    Ok(dish) => format_random_dish(dish, language_code),
                    Err(e) => {
                        info!(chat_id = %chat_id, error = %e, "Random pick from empty catalog");
                        t_lang("answer-catalog-empty", language_code)
                    }
                };
                session.replace_answer(&text, None).await?;
            }
            Intent::CategorySelected(pool) => {
                session
                    .set_menu_to_count(pool, catalog, language_code)
                    .await?;
            }
            Intent::CountSelected { pool, count } => {
                let dishes = catalog.sample_many(&pool, count, &mut rand::thread_rng());
                let text = format_dish_list(&pool, &dishes, language_code);
                session.replace_answer(&text, None).await?;
                session.set_menu_to_main(catalog, language_code).await?;
            }
            Intent::ClearHistory => {
                let report = session.erase_all().await;
                debug!(chat_id = %chat_id, attempted = report.attempted, "History cleared");
                session.set_menu_to_main(catalog, language_code).await?;
            }
        }

        Ok(())
    }
}
