//! Telegram handlers: teloxide endpoints for commands, plain messages and
//! inline keyboard callback queries.

use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::{debug, error, warn};

use super::intent::{Command, Intent};
use super::router::{Origin, Router};

/// Router wired to the Telegram Bot API
pub type BotRouter = Router<Bot>;

/// Update handler tree for the dispatcher
pub fn schema() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(command_handler),
                )
                .branch(dptree::endpoint(message_handler)),
        )
        .branch(Update::filter_callback_query().endpoint(callback_handler))
}

fn user_language(msg: &Message) -> Option<&str> {
    msg.from
        .as_ref()
        .and_then(|user| user.language_code.as_deref())
}

/// Handle a registered `/command`
pub async fn command_handler(msg: Message, cmd: Command, router: Arc<BotRouter>) -> Result<()> {
    debug!(chat_id = %msg.chat.id, command = ?cmd, "Received command");

    if let Err(e) = router
        .dispatch(
            msg.chat.id,
            Intent::from(cmd),
            Some(Origin::UserMessage(msg.id)),
            user_language(&msg),
        )
        .await
    {
        error!(chat_id = %msg.chat.id, error = %e, "Failed to handle command");
    }

    Ok(())
}

/// Handle any other message by tracking it and bringing the menu back
pub async fn message_handler(msg: Message, router: Arc<BotRouter>) -> Result<()> {
    debug!(chat_id = %msg.chat.id, "Received message");

    if let Err(e) = router
        .dispatch(
            msg.chat.id,
            Intent::ShowMenu,
            Some(Origin::UserMessage(msg.id)),
            user_language(&msg),
        )
        .await
    {
        error!(chat_id = %msg.chat.id, error = %e, "Failed to show menu");
    }

    Ok(())
}

/// Handle callback queries from inline keyboards
pub async fn callback_handler(bot: Bot, q: CallbackQuery, router: Arc<BotRouter>) -> Result<()> {
    debug!(user_id = %q.from.id, data = ?q.data, "Received callback query");

    let language_code = q.from.language_code.as_deref();

    match (q.message.as_ref(), q.data.as_deref()) {
        (Some(msg), Some(data)) => match Intent::from_payload(data) {
            Ok(intent) => {
                let chat_id = msg.chat().id;
                if let Err(e) = router
                    .dispatch(
                        chat_id,
                        intent,
                        Some(Origin::MenuButton(msg.id())),
                        language_code,
                    )
                    .await
                {
                    error!(chat_id = %chat_id, error = %e, "Failed to handle callback");
                }
            }
            Err(e) => warn!(user_id = %q.from.id, error = %e, "Ignoring unknown callback payload"),
        },
        _ => debug!(user_id = %q.from.id, "Callback query without message or data"),
    }

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id).await?;

    Ok(())
}
