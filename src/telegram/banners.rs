//! Banner flows: photo upload, and two-step deletion with blob cleanup

use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::MessageId;
use uuid::Uuid;

use crate::content::{banner_fields, collections, Banner};
use crate::core::AppResult;
use crate::store::Fields;
use super::menu::{return_to_menu, show_main_menu};
use super::state::State;
use super::types::{AdminDialogue, HandlerDeps, HandlerResult};
use super::{cb, download_file_bytes};

/// Callback data prefix for banner selection buttons.
const DELETE_PREFIX: &str = "del:";

/// Entry step of the add flow: ask for the banner image.
pub(crate) async fn start_add(
    bot: &Bot,
    dialogue: &AdminDialogue,
    chat_id: ChatId,
    message_id: MessageId,
) -> HandlerResult {
    bot.edit_message_text(chat_id, message_id, "Please send the image for the new banner.")
        .await?;
    dialogue.update(State::ReceiveBannerImage).await?;
    Ok(())
}

/// Photo step: upload the largest rendition and save the banner record.
pub async fn receive_image(bot: Bot, dialogue: AdminDialogue, msg: Message, deps: HandlerDeps) -> HandlerResult {
    let chat_id = msg.chat.id;
    let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) else {
        bot.send_message(chat_id, "Please send a photo, or /cancel.").await?;
        return Ok(());
    };
    let file_id = photo.file.id.clone();

    bot.send_message(chat_id, "Uploading banner...").await?;
    match save_banner(&bot, &deps, file_id).await {
        Ok(()) => {
            bot.send_message(chat_id, "✅ Success! Banner added.").await?;
        }
        Err(e) => {
            log::error!("Failed to upload banner: {}", e);
            bot.send_message(chat_id, "An error occurred, the banner was not saved.")
                .await?;
        }
    }
    return_to_menu(&bot, &dialogue, chat_id).await
}

async fn save_banner(bot: &Bot, deps: &HandlerDeps, file_id: teloxide::types::FileId) -> AppResult<()> {
    let bytes = download_file_bytes(bot, file_id).await?;
    // The bare file name is what the record stores; the blob key adds the
    // folder, mirroring how deletion reconstructs it.
    let file_name = format!("banner_{}.jpg", Uuid::new_v4());
    let key = format!("banners/{}", file_name);
    let url = deps.blobs.upload(&key, "image/jpeg", bytes).await?;
    deps.store
        .insert(collections::BANNERS, banner_fields(&url, &file_name, Utc::now()))
        .await?;
    Ok(())
}

/// Entry step of the removal flow: list banners as selectable buttons.
///
/// With no banners stored the selection state is never entered; the admin
/// gets an informational message and lands back on the menu.
pub(crate) async fn start_removal(
    bot: &Bot,
    dialogue: &AdminDialogue,
    chat_id: ChatId,
    message_id: MessageId,
    deps: &HandlerDeps,
) -> HandlerResult {
    let banners = match deps.store.query_equal(collections::BANNERS, &Fields::new()).await {
        Ok(banners) => banners,
        Err(e) => {
            log::error!("Failed to list banners: {}", e);
            bot.send_message(chat_id, "An error occurred while listing banners.")
                .await?;
            return return_to_menu(bot, dialogue, chat_id).await;
        }
    };

    if banners.is_empty() {
        bot.edit_message_text(chat_id, message_id, "No banners to remove.").await?;
        show_main_menu(bot, chat_id).await?;
        return Ok(());
    }

    let keyboard = teloxide::types::InlineKeyboardMarkup::new(banners.iter().enumerate().map(|(i, doc)| {
        vec![cb(
            format!("Delete Banner {}", i + 1),
            format!("{}{}", DELETE_PREFIX, doc.id),
        )]
    }));
    bot.edit_message_text(chat_id, message_id, "Select a banner to delete:")
        .reply_markup(keyboard)
        .await?;
    dialogue.update(State::ChoosingBannerToDelete).await?;
    Ok(())
}

/// Button step: delete the selected banner's blob, then its record.
pub async fn delete_selected(bot: Bot, dialogue: AdminDialogue, q: CallbackQuery, deps: HandlerDeps) -> HandlerResult {
    let _ = bot.answer_callback_query(q.id.clone()).await;
    let Some(banner_id) = q.data.as_deref().and_then(|d| d.strip_prefix(DELETE_PREFIX)) else {
        return Ok(());
    };
    let (Some(chat_id), Some(message_id)) = (
        q.message.as_ref().map(|m| m.chat().id),
        q.message.as_ref().map(|m| m.id()),
    ) else {
        return Ok(());
    };

    match delete_banner(&deps, banner_id).await {
        Ok(()) => {
            bot.edit_message_text(chat_id, message_id, "✅ Success! Banner deleted.")
                .await?;
        }
        Err(e) => {
            log::error!("Failed to delete banner {}: {}", banner_id, e);
            bot.edit_message_text(chat_id, message_id, "An error occurred, the banner was not deleted.")
                .await?;
        }
    }
    return_to_menu(&bot, &dialogue, chat_id).await
}

/// Removes the blob first, then the index record. The blob gateway treats
/// an already-absent object as deleted, so a record orphaned by an earlier
/// partial failure can still be cleaned up.
async fn delete_banner(deps: &HandlerDeps, banner_id: &str) -> AppResult<()> {
    if let Some(doc) = deps.store.get(collections::BANNERS, banner_id).await? {
        let banner = Banner::from_document(&doc);
        if let Some(key) = banner.blob_key() {
            deps.blobs.delete(&key).await?;
        }
        deps.store.delete(collections::BANNERS, banner_id).await?;
    }
    Ok(())
}
