//! Question intake flow: subject → topic → poll or bulk text → save

use std::str::FromStr;

use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, MessageId, ParseMode, PollType};

use crate::content::{
    collections, import::import_lines, subject_fields, topic_fields, NewQuestion, DEFAULT_EXPLANATION,
};
use crate::store::{find_or_create, StoreError};
use super::menu::return_to_menu;
use super::state::{State, UploadMethod};
use super::types::{AdminDialogue, HandlerDeps, HandlerResult};
use super::cb;

const BULK_FORMAT_HINT: &str = "Excellent. Now send the questions as text, one per line:\n\
     <code>Question,OptA,OptB,OptC,OptD,CorrectAnswer,Explanation</code>";

/// Entry step: ask how questions will be provided.
pub(crate) async fn start(
    bot: &Bot,
    dialogue: &AdminDialogue,
    chat_id: ChatId,
    message_id: MessageId,
) -> HandlerResult {
    let keyboard = InlineKeyboardMarkup::new(vec![vec![
        cb("Forward Poll", UploadMethod::Poll.as_ref()),
        cb("Upload via CSV Text", UploadMethod::Csv.as_ref()),
    ]]);
    bot.edit_message_text(chat_id, message_id, "How would you like to add questions?")
        .reply_markup(keyboard)
        .await?;
    dialogue.update(State::ChoosingUploadMethod).await?;
    Ok(())
}

/// Button step: remember the chosen method and ask for the subject.
pub async fn choose_upload_method(bot: Bot, dialogue: AdminDialogue, q: CallbackQuery) -> HandlerResult {
    let _ = bot.answer_callback_query(q.id.clone()).await;
    let Some(method) = q.data.as_deref().and_then(|d| UploadMethod::from_str(d).ok()) else {
        return Ok(());
    };
    let Some(message) = q.message.as_ref() else {
        return Ok(());
    };

    bot.edit_message_text(
        message.chat().id,
        message.id(),
        "Let's add questions. First, what is the subject? (e.g., History)",
    )
    .await?;
    dialogue.update(State::ReceiveSubject { method }).await?;
    Ok(())
}

/// Text step: subject name.
pub async fn receive_subject(
    bot: Bot,
    dialogue: AdminDialogue,
    method: UploadMethod,
    msg: Message,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let subject = text.trim().to_string();

    bot.send_message(
        msg.chat.id,
        format!("Great! Now, what is the topic within {}?", subject),
    )
    .await?;
    dialogue.update(State::ReceiveTopic { method, subject }).await?;
    Ok(())
}

/// Text step: topic name, then branch on the chosen upload method.
pub async fn receive_topic(
    bot: Bot,
    dialogue: AdminDialogue,
    (method, subject): (UploadMethod, String),
    msg: Message,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let topic = text.trim().to_string();

    match method {
        UploadMethod::Poll => {
            bot.send_message(msg.chat.id, "Excellent. Now please send the poll.").await?;
            dialogue.update(State::ReceivePoll { subject, topic }).await?;
        }
        UploadMethod::Csv => {
            bot.send_message(msg.chat.id, BULK_FORMAT_HINT)
                .parse_mode(ParseMode::Html)
                .await?;
            dialogue.update(State::ReceiveBulkText { subject, topic }).await?;
        }
    }
    Ok(())
}

/// Poll step: accept exactly one quiz poll and save it as a question.
pub async fn receive_poll(
    bot: Bot,
    dialogue: AdminDialogue,
    (subject, topic): (String, String),
    msg: Message,
    deps: HandlerDeps,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let Some(poll) = msg.poll() else {
        bot.send_message(chat_id, "Please forward a quiz poll, or /cancel.").await?;
        return Ok(());
    };

    // Only quiz polls carry a designated correct option.
    let correct_index = match poll.correct_option_id {
        Some(index) if matches!(poll.poll_type, PollType::Quiz) => index as usize,
        _ => {
            bot.send_message(chat_id, "Error: Not a valid quiz poll.").await?;
            return Ok(());
        }
    };

    let options: Vec<String> = poll.options.iter().map(|o| o.text.clone()).collect();
    let Some(correct_answer) = options.get(correct_index).cloned() else {
        bot.send_message(chat_id, "Error: Not a valid quiz poll.").await?;
        return Ok(());
    };

    let question = NewQuestion {
        question: poll.question.clone(),
        options,
        correct_answer,
        explanation: poll
            .explanation
            .clone()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EXPLANATION.to_string()),
    };

    match save_single_question(&deps, &subject, &topic, question).await {
        Ok(()) => {
            bot.send_message(chat_id, "✅ Success! Question saved.").await?;
        }
        Err(e) => {
            log::error!("Failed to save poll question: {}", e);
            bot.send_message(chat_id, "An error occurred, the question was not saved.")
                .await?;
        }
    }
    return_to_menu(&bot, &dialogue, chat_id).await
}

/// Text step: bulk import, one question per line, single summary reply.
pub async fn receive_bulk_text(
    bot: Bot,
    dialogue: AdminDialogue,
    (subject, topic): (String, String),
    msg: Message,
    deps: HandlerDeps,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let chat_id = msg.chat.id;

    match resolve_subject_topic(&deps, &subject, &topic).await {
        Ok((subject_id, topic_id)) => {
            let report = import_lines(deps.store.as_ref(), &subject_id, &topic_id, text).await;
            log::info!(
                "Bulk import for {}/{}: {} saved, {} failed",
                subject,
                topic,
                report.saved(),
                report.failures().len()
            );
            bot.send_message(chat_id, report.summary()).await?;
        }
        Err(e) => {
            log::error!("Failed to resolve subject/topic for bulk import: {}", e);
            bot.send_message(chat_id, "A major error occurred, nothing was saved.")
                .await?;
        }
    }
    return_to_menu(&bot, &dialogue, chat_id).await
}

/// Resolves the subject and topic names to document ids, creating the
/// records on first use. Resolution happens once per submission, not per
/// line.
async fn resolve_subject_topic(
    deps: &HandlerDeps,
    subject: &str,
    topic: &str,
) -> Result<(String, String), StoreError> {
    let store = deps.store.as_ref();
    let subject_id = find_or_create(store, collections::SUBJECTS, subject_fields(subject)).await?;
    let topic_id = find_or_create(store, collections::TOPICS, topic_fields(topic, &subject_id)).await?;
    Ok((subject_id, topic_id))
}

async fn save_single_question(
    deps: &HandlerDeps,
    subject: &str,
    topic: &str,
    question: NewQuestion,
) -> Result<(), StoreError> {
    let (subject_id, topic_id) = resolve_subject_topic(deps, subject, topic).await?;
    let fields = question.into_fields(&subject_id, &topic_id, Utc::now());
    deps.store.insert(collections::QUESTIONS, fields).await?;
    Ok(())
}

// The hint shown to the admin must describe the exact format the parser
// accepts; keep them in sync.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parser::split_line;

    #[test]
    fn bulk_hint_example_matches_the_parser_arity() {
        let example = BULK_FORMAT_HINT
            .split("<code>")
            .nth(1)
            .and_then(|s| s.split("</code>").next())
            .unwrap();
        assert_eq!(split_line(example).len(), 7);
    }
}
