//! Intent module: the user actions the bot understands, decoded once from
//! commands and button payloads.

use teloxide::utils::command::BotCommands;

use crate::catalog::Pool;
use crate::errors::IntentError;

/// Largest batch a count button may request
pub const MAX_PICK_COUNT: usize = 10;

/// Commands registered with Telegram
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "start over")]
    Start,
    #[command(description = "show the menu")]
    Menu,
    #[command(description = "suggest a random dish")]
    Random,
    #[command(description = "clear the chat")]
    Clear,
    #[command(description = "show help")]
    Help,
}

/// A decoded user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Start,
    Help,
    ShowMenu,
    ShowCategories,
    RandomPick,
    CategorySelected(Pool),
    CountSelected { pool: Pool, count: usize },
    ClearHistory,
}

impl From<Command> for Intent {
    fn from(command: Command) -> Self {
        match command {
            Command::Start => Intent::Start,
            Command::Menu => Intent::ShowMenu,
            Command::Random => Intent::RandomPick,
            Command::Clear => Intent::ClearHistory,
            Command::Help => Intent::Help,
        }
    }
}

impl Intent {
    /// Decode a colon-delimited button payload
    pub fn from_payload(payload: &str) -> Result<Self, IntentError> {
        let unknown = || IntentError::Unknown(payload.to_string());
        let (kind, rest) = payload.split_once(':').ok_or_else(unknown)?;

        match (kind, rest) {
            ("act", "random") => Ok(Intent::RandomPick),
            ("menu", "main") => Ok(Intent::ShowMenu),
            ("menu", "categories") => Ok(Intent::ShowCategories),
            ("hist", "clear") => Ok(Intent::ClearHistory),
            ("cat", category) => {
                if category.is_empty() {
                    return Err(IntentError::EmptyCategory);
                }
                Ok(Intent::CategorySelected(Pool::from_selector(category)))
            }
            ("cnt", rest) => {
                // Categories may contain colons; the count is after the last one
                let (category, count) = rest.rsplit_once(':').ok_or_else(unknown)?;
                if category.is_empty() {
                    return Err(IntentError::EmptyCategory);
                }
                let count = match count.parse::<usize>() {
                    Ok(n) if (1..=MAX_PICK_COUNT).contains(&n) => n,
                    _ => return Err(IntentError::InvalidCount(count.to_string())),
                };
                Ok(Intent::CountSelected {
                    pool: Pool::from_selector(category),
                    count,
                })
            }
            _ => Err(unknown()),
        }
    }

    /// Encode as a button payload.
    ///
    /// `Start` and `Help` are only reachable through commands and have none.
    pub fn to_payload(&self) -> Option<String> {
        let payload = match self {
            Intent::Start | Intent::Help => return None,
            Intent::ShowMenu => "menu:main".to_string(),
            Intent::ShowCategories => "menu:categories".to_string(),
            Intent::RandomPick => "act:random".to_string(),
            Intent::CategorySelected(pool) => format!("cat:{}", pool.selector()),
            Intent::CountSelected { pool, count } => format!("cnt:{}:{count}", pool.selector()),
            Intent::ClearHistory => "hist:clear".to_string(),
        };
        Some(payload)
    }
}
