//! Article intake flow: title → body text → save

use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::MessageId;

use crate::content::{article_fields, collections};
use super::menu::return_to_menu;
use super::state::State;
use super::types::{AdminDialogue, HandlerDeps, HandlerResult};

/// Entry step: ask for the article title.
pub(crate) async fn start(
    bot: &Bot,
    dialogue: &AdminDialogue,
    chat_id: ChatId,
    message_id: MessageId,
) -> HandlerResult {
    bot.edit_message_text(chat_id, message_id, "What is the title for this article?")
        .await?;
    dialogue.update(State::ReceiveArticleTitle).await?;
    Ok(())
}

/// Text step: article title.
pub async fn receive_title(bot: Bot, dialogue: AdminDialogue, msg: Message) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let title = text.trim().to_string();

    bot.send_message(msg.chat.id, "Great. Now, send the full text of the article.")
        .await?;
    dialogue.update(State::ReceiveArticleBody { title }).await?;
    Ok(())
}

/// Text step: article body, stored verbatim.
pub async fn receive_body(
    bot: Bot,
    dialogue: AdminDialogue,
    title: String,
    msg: Message,
    deps: HandlerDeps,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let chat_id = msg.chat.id;

    let saved = deps
        .store
        .insert(collections::ARTICLES, article_fields(&title, text, Utc::now()))
        .await;
    match saved {
        Ok(_) => {
            bot.send_message(chat_id, "✅ Success! Article has been saved.").await?;
        }
        Err(e) => {
            log::error!("Failed to save article '{}': {}", title, e);
            bot.send_message(chat_id, "An error occurred, the article was not saved.")
                .await?;
        }
    }
    return_to_menu(&bot, &dialogue, chat_id).await
}
