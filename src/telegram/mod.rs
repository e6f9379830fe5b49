//! Telegram bot integration and handlers

pub mod bot;
pub mod menu;
pub mod schema;
pub mod state;
pub mod types;

mod articles;
mod banners;
mod notes;
mod notice;
mod questions;

use teloxide::prelude::*;
use teloxide::types::InlineKeyboardButton;

pub use bot::{create_bot, setup_bot_commands, Command};
pub use menu::show_main_menu;
pub use schema::schema;
pub use types::{AdminDialogue, HandlerDeps, HandlerError, HandlerResult};

use crate::core::AppError;

/// Shorthand for an inline keyboard callback button.
pub(crate) fn cb(label: impl Into<String>, data: impl Into<String>) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label.into(), data.into())
}

/// Downloads a Bot API file into memory.
pub(crate) async fn download_file_bytes(
    bot: &Bot,
    file_id: teloxide::types::FileId,
) -> Result<Vec<u8>, AppError> {
    use teloxide::net::Download;

    let file = bot.get_file(file_id).await?;
    let mut bytes = Vec::with_capacity(file.meta.size as usize);
    bot.download_file(&file.path, &mut bytes).await?;
    Ok(bytes)
}
