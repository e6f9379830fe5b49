//! Main menu and top-level action routing

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, MessageId};

use super::state::{MenuAction, State};
use super::types::{AdminDialogue, HandlerDeps, HandlerResult};
use super::{articles, banners, cb, notes, notice, questions};

pub const MENU_TEXT: &str = "Welcome, Admin! Please choose an action:";

/// Builds the six-action main menu keyboard.
pub fn main_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![cb("➕ Add Questions", MenuAction::AddQuestion.as_ref())],
        vec![cb("📄 Add Note (PDF)", MenuAction::AddNote.as_ref())],
        vec![cb("✍️ Add Article", MenuAction::AddArticle.as_ref())],
        vec![cb("🖼️ Add Banner", MenuAction::AddBanner.as_ref())],
        vec![cb("🗑️ Remove Banner", MenuAction::RemoveBanner.as_ref())],
        vec![cb("🔔 Set Latest Update", MenuAction::SetUpdate.as_ref())],
    ])
}

/// Sends the main menu as a fresh message.
pub async fn show_main_menu(bot: &Bot, chat_id: ChatId) -> ResponseResult<Message> {
    bot.send_message(chat_id, MENU_TEXT)
        .reply_markup(main_menu_keyboard())
        .await
}

/// Edits an existing message into the main menu, falling back to a fresh
/// message when the original cannot be edited (media, expired, ...).
pub(crate) async fn edit_main_menu(bot: &Bot, chat_id: ChatId, message_id: MessageId) -> ResponseResult<()> {
    let edited = bot
        .edit_message_text(chat_id, message_id, MENU_TEXT)
        .reply_markup(main_menu_keyboard())
        .await;
    if edited.is_err() {
        show_main_menu(bot, chat_id).await?;
    }
    Ok(())
}

/// Clears the session and shows the menu again.
///
/// Every flow ends here, successful or not: replacing the dialogue state
/// with `MainMenu` drops all collected fields before anything else runs.
pub(crate) async fn return_to_menu(bot: &Bot, dialogue: &AdminDialogue, chat_id: ChatId) -> HandlerResult {
    dialogue.update(State::MainMenu).await?;
    show_main_menu(bot, chat_id).await?;
    Ok(())
}

/// `/start` — reset the session and show the menu.
pub async fn start(bot: Bot, dialogue: AdminDialogue, msg: Message) -> HandlerResult {
    dialogue.update(State::MainMenu).await?;
    show_main_menu(&bot, msg.chat.id).await?;
    Ok(())
}

/// `/cancel` — drop the session with a plain acknowledgement. Accepted from
/// every state and never runs any save logic.
pub async fn cancel(bot: Bot, dialogue: AdminDialogue, msg: Message) -> HandlerResult {
    dialogue.exit().await?;
    bot.send_message(msg.chat.id, "Operation cancelled.").await?;
    Ok(())
}

/// `start_over` callback — re-enter the menu from any state, editing the
/// pressed message in place.
pub async fn start_over(bot: Bot, dialogue: AdminDialogue, q: CallbackQuery) -> HandlerResult {
    let _ = bot.answer_callback_query(q.id.clone()).await;
    dialogue.update(State::MainMenu).await?;
    if let Some(message) = q.message.as_ref() {
        edit_main_menu(&bot, message.chat().id, message.id()).await?;
    }
    Ok(())
}

/// Routes a main-menu button press to the entry step of its flow.
pub async fn handle_action(bot: Bot, dialogue: AdminDialogue, q: CallbackQuery, deps: HandlerDeps) -> HandlerResult {
    let _ = bot.answer_callback_query(q.id.clone()).await;
    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let (Some(chat_id), Some(message_id)) = (
        q.message.as_ref().map(|m| m.chat().id),
        q.message.as_ref().map(|m| m.id()),
    ) else {
        return Ok(());
    };

    match MenuAction::parse(data) {
        Some(MenuAction::AddQuestion) => questions::start(&bot, &dialogue, chat_id, message_id).await,
        Some(MenuAction::AddNote) => notes::start(&bot, &dialogue, chat_id, message_id).await,
        Some(MenuAction::AddArticle) => articles::start(&bot, &dialogue, chat_id, message_id).await,
        Some(MenuAction::AddBanner) => banners::start_add(&bot, &dialogue, chat_id, message_id).await,
        Some(MenuAction::RemoveBanner) => banners::start_removal(&bot, &dialogue, chat_id, message_id, &deps).await,
        Some(MenuAction::SetUpdate) => notice::start(&bot, &dialogue, chat_id, message_id).await,
        None => {
            // Unknown tag: re-show the menu, leave the state alone.
            log::warn!("Unknown menu callback data: {:?}", data);
            edit_main_menu(&bot, chat_id, message_id).await?;
            Ok(())
        }
    }
}

/// Swallows button presses that arrived in a state with no button step,
/// e.g. from an old menu message. Answering stops the client spinner.
pub async fn dismiss_stray(bot: Bot, q: CallbackQuery) -> HandlerResult {
    let _ = bot.answer_callback_query(q.id).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_keyboard_has_one_button_per_action() {
        let keyboard = main_menu_keyboard();
        assert_eq!(keyboard.inline_keyboard.len(), 6);
        for row in &keyboard.inline_keyboard {
            assert_eq!(row.len(), 1);
        }
    }
}
