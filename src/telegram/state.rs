//! Conversation states and menu action tags
//!
//! Each state names the one input it is waiting for and carries exactly the
//! fields collected so far. Transitions replace the whole state record, so
//! no subject/topic from an abandoned flow can leak into a later one.

use std::str::FromStr;

use strum::{AsRefStr, EnumString};

/// Conversation state, one per prompt the admin can be parked at.
#[derive(Debug, Clone, Default)]
pub enum State {
    /// Main menu shown, waiting for an action button.
    #[default]
    MainMenu,
    /// Waiting for the poll-vs-text choice of the question flow.
    ChoosingUploadMethod,
    /// Waiting for the subject name.
    ReceiveSubject { method: UploadMethod },
    /// Waiting for the topic name within `subject`.
    ReceiveTopic { method: UploadMethod, subject: String },
    /// Waiting for a forwarded quiz poll.
    ReceivePoll { subject: String, topic: String },
    /// Waiting for the bulk question text, one line per question.
    ReceiveBulkText { subject: String, topic: String },
    /// Waiting for the note title.
    ReceiveNoteTitle,
    /// Waiting for the PDF attachment of the note titled `title`.
    ReceiveNotePdf { title: String },
    /// Waiting for the article title.
    ReceiveArticleTitle,
    /// Waiting for the article body text.
    ReceiveArticleBody { title: String },
    /// Waiting for the banner photo.
    ReceiveBannerImage,
    /// Waiting for a banner selection button to delete.
    ChoosingBannerToDelete,
    /// Waiting for the new "latest update" notice text.
    ReceiveNoticeText,
}

/// How the admin wants to add questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum UploadMethod {
    /// One forwarded quiz poll at a time.
    Poll,
    /// Bulk comma-separated text, one question per line.
    Csv,
}

/// The six top-level menu actions, a closed set.
///
/// Callback data uses the snake_case form (`add_question`, ...); anything
/// that does not parse is treated defensively as "re-show the menu".
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum MenuAction {
    AddQuestion,
    AddNote,
    AddArticle,
    AddBanner,
    RemoveBanner,
    SetUpdate,
}

impl MenuAction {
    /// Parses callback data into an action tag.
    pub fn parse(data: &str) -> Option<Self> {
        Self::from_str(data).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_six_action_tags_round_trip() {
        let tags = [
            ("add_question", MenuAction::AddQuestion),
            ("add_note", MenuAction::AddNote),
            ("add_article", MenuAction::AddArticle),
            ("add_banner", MenuAction::AddBanner),
            ("remove_banner", MenuAction::RemoveBanner),
            ("set_update", MenuAction::SetUpdate),
        ];
        for (tag, action) in tags {
            assert_eq!(MenuAction::parse(tag), Some(action));
            assert_eq!(action.as_ref(), tag);
        }
    }

    #[test]
    fn unknown_tags_do_not_parse() {
        assert_eq!(MenuAction::parse("drop_tables"), None);
        assert_eq!(MenuAction::parse(""), None);
        // Matching is exact, not case-insensitive.
        assert_eq!(MenuAction::parse("Add_Question"), None);
    }

    #[test]
    fn upload_methods_use_lowercase_tags() {
        assert_eq!(UploadMethod::from_str("poll").ok(), Some(UploadMethod::Poll));
        assert_eq!(UploadMethod::from_str("csv").ok(), Some(UploadMethod::Csv));
        assert_eq!(UploadMethod::Poll.as_ref(), "poll");
    }

    #[test]
    fn default_state_is_the_main_menu() {
        assert!(matches!(State::default(), State::MainMenu));
    }
}
