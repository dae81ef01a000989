//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::warn;

// Import localization
use crate::localization::{t_args_lang, t_lang};

use crate::catalog::{Catalog, DishEntry, Pool};

use super::intent::Intent;

/// Batch sizes offered on the count screen
pub const COUNT_OPTIONS: [usize; 5] = [1, 2, 3, 5, 10];

/// Telegram rejects callback data longer than 64 bytes
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

/// The screens the menu message can show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuScreen {
    Main,
    Categories,
    Count(Pool),
}

/// Keyboards only carry intents that have a payload
fn button(label: String, intent: &Intent) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, intent.to_payload().unwrap_or_default())
}

/// Human-readable name of a pool
pub fn pool_label(pool: &Pool, language_code: Option<&str>) -> String {
    match pool {
        Pool::All => t_lang("category-all", language_code),
        Pool::Category(name) => name.clone(),
    }
}

/// Render the text and keyboard of a menu screen
pub fn render_menu(
    screen: &MenuScreen,
    catalog: &Catalog,
    language_code: Option<&str>,
) -> (String, InlineKeyboardMarkup) {
    match screen {
        MenuScreen::Main => (
            t_lang("menu-main-title", language_code),
            create_main_menu_keyboard(language_code),
        ),
        MenuScreen::Categories => (
            t_lang("menu-categories-title", language_code),
            create_categories_keyboard(catalog, language_code),
        ),
        MenuScreen::Count(pool) => (
            t_args_lang(
                "menu-count-title",
                &[("category", &pool_label(pool, language_code))],
                language_code,
            ),
            create_count_keyboard(pool, language_code),
        ),
    }
}

/// Create inline keyboard for the main menu
pub fn create_main_menu_keyboard(language_code: Option<&str>) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button(t_lang("button-random", language_code), &Intent::RandomPick)],
        vec![button(
            t_lang("button-by-category", language_code),
            &Intent::ShowCategories,
        )],
        vec![button(
            t_lang("button-clear-history", language_code),
            &Intent::ClearHistory,
        )],
    ])
}

/// Create inline keyboard listing every category, one per row
pub fn create_categories_keyboard(
    catalog: &Catalog,
    language_code: Option<&str>,
) -> InlineKeyboardMarkup {
    let mut buttons = vec![vec![button(
        t_lang("button-all-categories", language_code),
        &Intent::CategorySelected(Pool::All),
    )]];

    for category in catalog.categories() {
        let pool = Pool::Category(category.to_string());
        if !fits_callback_data(&pool) {
            warn!(category, "Category name too long for callback data, hiding it");
            continue;
        }
        buttons.push(vec![button(
            category.to_string(),
            &Intent::CategorySelected(pool),
        )]);
    }

    buttons.push(vec![button(
        t_lang("button-main-menu", language_code),
        &Intent::ShowMenu,
    )]);

    InlineKeyboardMarkup::new(buttons)
}

/// Create inline keyboard with the batch sizes for `pool`
pub fn create_count_keyboard(pool: &Pool, language_code: Option<&str>) -> InlineKeyboardMarkup {
    let counts = COUNT_OPTIONS
        .iter()
        .map(|&count| {
            button(
                count.to_string(),
                &Intent::CountSelected {
                    pool: pool.clone(),
                    count,
                },
            )
        })
        .collect();

    InlineKeyboardMarkup::new(vec![
        counts,
        vec![
            button(
                t_lang("button-back-categories", language_code),
                &Intent::ShowCategories,
            ),
            button(t_lang("button-main-menu", language_code), &Intent::ShowMenu),
        ],
    ])
}

/// Whether every payload generated for `pool` stays within Telegram's limit
pub fn fits_callback_data(pool: &Pool) -> bool {
    let longest = COUNT_OPTIONS.iter().copied().max().unwrap_or(1);
    let payload = Intent::CountSelected {
        pool: pool.clone(),
        count: longest,
    }
    .to_payload();
    payload.is_some_and(|payload| payload.len() <= MAX_CALLBACK_DATA_LEN)
}

/// Format a single random suggestion
pub fn format_random_dish(dish: &DishEntry, language_code: Option<&str>) -> String {
    t_args_lang(
        "answer-random",
        &[("name", &dish.name), ("category", &dish.category)],
        language_code,
    )
}

/// Format a batch of suggestions as a numbered list
pub fn format_dish_list(pool: &Pool, dishes: &[&DishEntry], language_code: Option<&str>) -> String {
    if dishes.is_empty() {
        let key = match pool {
            Pool::All => "answer-catalog-empty",
            Pool::Category(_) => "answer-no-dishes",
        };
        return t_lang(key, language_code);
    }

    let mut result = t_args_lang(
        "answer-list-title",
        &[("category", &pool_label(pool, language_code))],
        language_code,
    );
    result.push('\n');

    for (i, dish) in dishes.iter().enumerate() {
        match pool {
            Pool::All => result.push_str(&format!("\n{}. {} ({})", i + 1, dish.name, dish.category)),
            Pool::Category(_) => result.push_str(&format!("\n{}. {}", i + 1, dish.name)),
        }
    }

    result
}
