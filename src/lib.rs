//! # Dish Picker Telegram Bot
//!
//! A Telegram bot that suggests dishes from a static catalog, either at random
//! or by category, through a single inline menu. It keeps the chat tidy by
//! editing its menu in place, replacing its answers, and erasing its own
//! history on request.

pub mod bot;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod localization;
pub mod state;
pub mod transport;
