//! Note intake flow: title → PDF attachment → blob upload → save

use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::{Document, MessageId};
use uuid::Uuid;

use crate::content::{collections, note_fields};
use crate::core::AppResult;
use super::menu::return_to_menu;
use super::state::State;
use super::types::{AdminDialogue, HandlerDeps, HandlerResult};
use super::download_file_bytes;

/// Entry step: ask for the note title.
pub(crate) async fn start(
    bot: &Bot,
    dialogue: &AdminDialogue,
    chat_id: ChatId,
    message_id: MessageId,
) -> HandlerResult {
    bot.edit_message_text(chat_id, message_id, "What is the title for this PDF note?")
        .await?;
    dialogue.update(State::ReceiveNoteTitle).await?;
    Ok(())
}

/// Text step: note title.
pub async fn receive_title(bot: Bot, dialogue: AdminDialogue, msg: Message) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let title = text.trim().to_string();

    bot.send_message(msg.chat.id, "Great. Now, please send the PDF file.").await?;
    dialogue.update(State::ReceiveNotePdf { title }).await?;
    Ok(())
}

/// Attachment step: upload the PDF and save the note record.
pub async fn receive_pdf(
    bot: Bot,
    dialogue: AdminDialogue,
    title: String,
    msg: Message,
    deps: HandlerDeps,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let Some(document) = msg.document() else {
        bot.send_message(chat_id, "Please attach a PDF file, or /cancel.").await?;
        return Ok(());
    };
    if !is_pdf(document) {
        bot.send_message(chat_id, "That doesn't look like a PDF. Please send a PDF file.")
            .await?;
        return Ok(());
    }

    bot.send_message(chat_id, "Uploading PDF...").await?;
    match save_note(&bot, &deps, &title, document).await {
        Ok(()) => {
            bot.send_message(chat_id, "✅ Success! Note uploaded.").await?;
        }
        Err(e) => {
            log::error!("Failed to upload note '{}': {}", title, e);
            bot.send_message(chat_id, "An error occurred, the note was not saved.")
                .await?;
        }
    }
    return_to_menu(&bot, &dialogue, chat_id).await
}

fn is_pdf(document: &Document) -> bool {
    document
        .mime_type
        .as_ref()
        .map(|mime| mime.essence_str() == "application/pdf")
        .unwrap_or_else(|| {
            document
                .file_name
                .as_deref()
                .map(|name| name.to_ascii_lowercase().ends_with(".pdf"))
                .unwrap_or(false)
        })
}

async fn save_note(bot: &Bot, deps: &HandlerDeps, title: &str, document: &Document) -> AppResult<()> {
    let bytes = download_file_bytes(bot, document.file.id.clone()).await?;
    let key = format!("notes/note_{}.pdf", Uuid::new_v4());
    let url = deps.blobs.upload(&key, "application/pdf", bytes).await?;
    deps.store
        .insert(collections::NOTES, note_fields(title, &url, Utc::now()))
        .await?;
    Ok(())
}
