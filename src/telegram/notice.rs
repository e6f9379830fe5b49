//! "Latest update" notice flow: one text message, upserted in place

use teloxide::prelude::*;
use teloxide::types::MessageId;

use crate::content::{collections, notice_fields, NOTICE_DOC_ID};
use super::menu::return_to_menu;
use super::state::State;
use super::types::{AdminDialogue, HandlerDeps, HandlerResult};

/// Entry step: ask for the new notice text.
pub(crate) async fn start(
    bot: &Bot,
    dialogue: &AdminDialogue,
    chat_id: ChatId,
    message_id: MessageId,
) -> HandlerResult {
    bot.edit_message_text(chat_id, message_id, "Send the new text for the 'Latest Updates' board.")
        .await?;
    dialogue.update(State::ReceiveNoticeText).await?;
    Ok(())
}

/// Text step: overwrite the singleton notice record.
pub async fn receive_text(bot: Bot, dialogue: AdminDialogue, msg: Message, deps: HandlerDeps) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let chat_id = msg.chat.id;

    let saved = deps
        .store
        .upsert_merge(collections::CONFIG, NOTICE_DOC_ID, notice_fields(text))
        .await;
    match saved {
        Ok(()) => {
            bot.send_message(chat_id, "✅ Success! Latest update has been set.")
                .await?;
        }
        Err(e) => {
            log::error!("Failed to set latest update: {}", e);
            bot.send_message(chat_id, "An error occurred, the update was not set.")
                .await?;
        }
    }
    return_to_menu(&bot, &dialogue, chat_id).await
}
