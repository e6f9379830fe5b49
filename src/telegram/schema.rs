//! Dispatcher schema: one handler tree for production and tests

use teloxide::dispatching::dialogue::{self, InMemStorage};
use teloxide::dptree::case;
use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;

use crate::core::config;
use super::bot::Command;
use super::state::State;
use super::types::HandlerError;
use super::{articles, banners, menu, notes, notice, questions};

/// Creates the dispatcher handler tree for the bot.
///
/// Dialogue state is looked up per chat before any branch runs; each state
/// routes exactly one input class to its handler. Messages that match no
/// branch (for example plain text while the menu is open) are ignored, and
/// commands outrank every state so `/cancel` works mid-flow.
pub fn schema() -> UpdateHandler<HandlerError> {
    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start].endpoint(menu::start))
        .branch(case![Command::Cancel].endpoint(menu::cancel));

    let message_handler = Update::filter_message()
        .branch(command_handler)
        .branch(case![State::ReceiveSubject { method }].endpoint(questions::receive_subject))
        .branch(case![State::ReceiveTopic { method, subject }].endpoint(questions::receive_topic))
        .branch(case![State::ReceivePoll { subject, topic }].endpoint(questions::receive_poll))
        .branch(case![State::ReceiveBulkText { subject, topic }].endpoint(questions::receive_bulk_text))
        .branch(case![State::ReceiveNoteTitle].endpoint(notes::receive_title))
        .branch(case![State::ReceiveNotePdf { title }].endpoint(notes::receive_pdf))
        .branch(case![State::ReceiveArticleTitle].endpoint(articles::receive_title))
        .branch(case![State::ReceiveArticleBody { title }].endpoint(articles::receive_body))
        .branch(case![State::ReceiveBannerImage].endpoint(banners::receive_image))
        .branch(case![State::ReceiveNoticeText].endpoint(notice::receive_text));

    let callback_handler = Update::filter_callback_query()
        // `start_over` re-enters the menu from any state.
        .branch(
            dptree::filter(|q: CallbackQuery| q.data.as_deref() == Some("start_over")).endpoint(menu::start_over),
        )
        .branch(case![State::MainMenu].endpoint(menu::handle_action))
        .branch(case![State::ChoosingUploadMethod].endpoint(questions::choose_upload_method))
        .branch(case![State::ChoosingBannerToDelete].endpoint(banners::delete_selected))
        .endpoint(menu::dismiss_stray);

    dptree::entry()
        .filter(|update: Update| is_authorized(&update))
        .branch(
            dialogue::enter::<Update, InMemStorage<State>, State, _>()
                .branch(message_handler)
                .branch(callback_handler),
        )
}

/// Admin gate: with ADMIN_USER_ID configured, updates from anyone else are
/// dropped before they reach the dialogue.
fn is_authorized(update: &Update) -> bool {
    let admin_id = *config::admin::ADMIN_USER_ID;
    if admin_id == 0 {
        return true;
    }
    update
        .from()
        .and_then(|user| i64::try_from(user.id.0).ok())
        .map(|user_id| user_id == admin_id)
        .unwrap_or(false)
}
