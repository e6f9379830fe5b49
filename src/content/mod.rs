//! Quiz content records and their wire encoding
//!
//! Field and collection names follow what the content apps already read
//! from Firestore, so this module is the single place that knows the
//! document shapes.

pub mod import;
pub mod parser;

use chrono::{DateTime, Utc};

use crate::store::{FieldValue, Fields, StoredDocument};

/// Firestore collection names
pub mod collections {
    pub const SUBJECTS: &str = "subjects";
    pub const TOPICS: &str = "topics";
    pub const QUESTIONS: &str = "questions";
    pub const NOTES: &str = "notes";
    pub const ARTICLES: &str = "articles";
    pub const BANNERS: &str = "banners";
    pub const CONFIG: &str = "config";
}

/// Document id of the singleton notice record in `config`.
pub const NOTICE_DOC_ID: &str = "main";

/// Default explanation stored when a question arrives without one.
/// Every intake path (poll and bulk text) funnels through this constant.
pub const DEFAULT_EXPLANATION: &str = "N/A";

/// A fully validated question, not yet bound to a subject or topic.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

impl NewQuestion {
    /// Binds the question to its resolved subject/topic and stamps it.
    pub fn into_fields(self, subject_id: &str, topic_id: &str, at: DateTime<Utc>) -> Fields {
        let mut fields = Fields::new();
        fields.insert("question".to_string(), FieldValue::str(self.question));
        fields.insert("options".to_string(), FieldValue::string_array(self.options));
        fields.insert("correctAnswer".to_string(), FieldValue::str(self.correct_answer));
        fields.insert("explanation".to_string(), FieldValue::str(self.explanation));
        fields.insert("subjectId".to_string(), FieldValue::str(subject_id));
        fields.insert("topicId".to_string(), FieldValue::str(topic_id));
        fields.insert("timestamp".to_string(), FieldValue::Timestamp(at));
        fields
    }
}

/// Match fields identifying a subject by name.
pub fn subject_fields(name: &str) -> Fields {
    let mut fields = Fields::new();
    fields.insert("name".to_string(), FieldValue::str(name));
    fields
}

/// Match fields identifying a topic by name within a subject.
pub fn topic_fields(name: &str, subject_id: &str) -> Fields {
    let mut fields = Fields::new();
    fields.insert("name".to_string(), FieldValue::str(name));
    fields.insert("subjectId".to_string(), FieldValue::str(subject_id));
    fields
}

pub fn note_fields(title: &str, file_url: &str, at: DateTime<Utc>) -> Fields {
    let mut fields = Fields::new();
    fields.insert("title".to_string(), FieldValue::str(title));
    fields.insert("fileUrl".to_string(), FieldValue::str(file_url));
    fields.insert("timestamp".to_string(), FieldValue::Timestamp(at));
    fields
}

pub fn article_fields(title: &str, content: &str, at: DateTime<Utc>) -> Fields {
    let mut fields = Fields::new();
    fields.insert("title".to_string(), FieldValue::str(title));
    fields.insert("content".to_string(), FieldValue::str(content));
    fields.insert("timestamp".to_string(), FieldValue::Timestamp(at));
    fields
}

pub fn banner_fields(image_url: &str, file_name: &str, at: DateTime<Utc>) -> Fields {
    let mut fields = Fields::new();
    fields.insert("imageUrl".to_string(), FieldValue::str(image_url));
    fields.insert("fileName".to_string(), FieldValue::str(file_name));
    fields.insert("timestamp".to_string(), FieldValue::Timestamp(at));
    fields
}

pub fn notice_fields(text: &str) -> Fields {
    let mut fields = Fields::new();
    fields.insert("notificationText".to_string(), FieldValue::str(text));
    fields
}

/// A banner record as read back from the store.
#[derive(Debug, Clone)]
pub struct Banner {
    pub id: String,
    /// Blob key under `banners/`; older records may lack it.
    pub file_name: Option<String>,
}

impl Banner {
    pub fn from_document(doc: &StoredDocument) -> Self {
        Self {
            id: doc.id.clone(),
            file_name: doc
                .fields
                .get("fileName")
                .and_then(FieldValue::as_str)
                .map(str::to_string),
        }
    }

    /// Full blob key for this banner's image.
    pub fn blob_key(&self) -> Option<String> {
        self.file_name.as_ref().map(|name| format!("banners/{}", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn question_fields_carry_resolved_ids_and_timestamp() {
        let q = NewQuestion {
            question: "Capital of France?".to_string(),
            options: vec!["Paris".into(), "London".into(), "Berlin".into(), "Madrid".into()],
            correct_answer: "Paris".to_string(),
            explanation: DEFAULT_EXPLANATION.to_string(),
        };
        let at = Utc::now();
        let fields = q.into_fields("s1", "t1", at);

        assert_eq!(fields.get("subjectId"), Some(&FieldValue::str("s1")));
        assert_eq!(fields.get("topicId"), Some(&FieldValue::str("t1")));
        assert_eq!(fields.get("timestamp"), Some(&FieldValue::Timestamp(at)));
        assert_eq!(fields.get("explanation"), Some(&FieldValue::str("N/A")));
    }

    #[test]
    fn topic_match_fields_are_scoped_to_the_subject() {
        let fields = topic_fields("WW2", "s1");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("subjectId"), Some(&FieldValue::str("s1")));
    }

    #[test]
    fn banner_blob_key_prefixes_the_folder() {
        let mut fields = Fields::new();
        fields.insert("fileName".to_string(), FieldValue::str("banner_x.jpg"));
        let banner = Banner::from_document(&StoredDocument {
            id: "b1".to_string(),
            fields,
        });
        assert_eq!(banner.blob_key().as_deref(), Some("banners/banner_x.jpg"));

        let bare = Banner::from_document(&StoredDocument {
            id: "b2".to_string(),
            fields: Fields::new(),
        });
        assert_eq!(bare.blob_key(), None);
    }
}
