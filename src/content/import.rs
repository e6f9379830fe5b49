//! Bulk text import of questions with per-line error collection
//!
//! A batch never aborts early: every line is attempted, each outcome is
//! recorded in input order, and a single summary message is the only error
//! reporting channel. Failed lines are permanently skipped for that
//! submission — there are no partial retries.

use chrono::Utc;

use crate::store::DocumentStore;
use super::collections;
use super::parser::{parse_line, LineError};

/// Aggregated outcome of one bulk submission.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    saved: usize,
    /// 1-based line number plus failure reason, in encounter order.
    failures: Vec<(usize, LineError)>,
}

impl ImportReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_saved(&mut self) {
        self.saved += 1;
    }

    pub fn record_failure(&mut self, line_number: usize, reason: LineError) {
        self.failures.push((line_number, reason));
    }

    pub fn saved(&self) -> usize {
        self.saved
    }

    pub fn failures(&self) -> &[(usize, LineError)] {
        &self.failures
    }

    /// Renders the single summary message shown to the admin.
    pub fn summary(&self) -> String {
        let mut report = format!("✅ Process Complete! Saved: {}.", self.saved);
        if !self.failures.is_empty() {
            report.push_str("\n\nErrors on lines:");
            for (line_number, reason) in &self.failures {
                report.push_str(&format!("\n- L{}: {}", line_number, reason));
            }
        }
        report
    }
}

/// Imports every line of `text` as a question bound to the already-resolved
/// subject and topic.
///
/// A store failure while saving one line is charged to that line and the
/// batch continues; only the caller's subject/topic resolution can fail the
/// submission as a whole.
pub async fn import_lines(store: &dyn DocumentStore, subject_id: &str, topic_id: &str, text: &str) -> ImportReport {
    let mut report = ImportReport::new();

    for (index, line) in text.trim().lines().enumerate() {
        let line_number = index + 1;
        let question = match parse_line(line) {
            Ok(question) => question,
            Err(reason) => {
                report.record_failure(line_number, reason);
                continue;
            }
        };

        let fields = question.into_fields(subject_id, topic_id, Utc::now());
        match store.insert(collections::QUESTIONS, fields).await {
            Ok(_) => report.record_saved(),
            Err(e) => {
                log::error!("Failed to save imported question at line {}: {}", line_number, e);
                report.record_failure(line_number, LineError::LineProcessingError);
            }
        }
    }

    report
}
