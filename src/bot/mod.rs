//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `intent`: Commands and button payloads decoded into intents
//! - `ui_builder`: Creates keyboards and formats messages
//! - `lifecycle`: Keeps a single live menu and a single live answer per chat
//! - `eraser`: Bulk deletion of a conversation's tracked messages
//! - `router`: Maps intents to lifecycle operations
//! - `handlers`: Teloxide endpoints and the update handler tree

pub mod eraser;
pub mod handlers;
pub mod intent;
pub mod lifecycle;
pub mod router;
pub mod ui_builder;

pub use eraser::EraseReport;
pub use handlers::{schema, BotRouter};
pub use intent::{Command, Intent};
pub use lifecycle::{AnswerOutcome, ConversationSession, MenuOutcome, MessageLifecycle, PreviousAnswer};
pub use router::{Origin, Router};
pub use ui_builder::MenuScreen;
