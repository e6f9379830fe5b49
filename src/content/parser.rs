//! Line parser for bulk question import
//!
//! One freeform line in, one validated question (or a specific failure)
//! out. The format is comma-separated with double-quote quoting:
//!
//! ```text
//! Question,OptA,OptB,OptC,OptD,CorrectAnswer[,Explanation]
//! ```
//!
//! Quoted fields may contain literal commas; `""` inside a quoted field is
//! an escaped quote. Every field is whitespace-trimmed after unquoting.

use thiserror::Error;

use super::{NewQuestion, DEFAULT_EXPLANATION};

/// Number of mandatory fields (question + 4 options + correct answer).
const MIN_FIELDS: usize = 6;
/// Mandatory fields plus the optional explanation.
const MAX_FIELDS: usize = 7;

/// Why a single line was rejected. Never aborts the rest of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("expected 6-7 fields, got {0}")]
    BadFieldCount(usize),

    #[error("correct answer is not one of the options")]
    AnswerNotInOptions,

    #[error("could not process line")]
    LineProcessingError,
}

/// Splits one line into fields using comma-separated-value rules.
///
/// Permissive by design: an unterminated quote runs to the end of the line
/// rather than failing, and quotes opening mid-field are taken literally
/// enough to keep the admin's sloppier pastes importable.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields.iter().map(|f| f.trim().to_string()).collect()
}

/// Parses one line into a question record.
///
/// The caller is responsible for attaching the resolved subject/topic ids
/// and a creation timestamp; this function only validates shape and the
/// answer-in-options invariant.
pub fn parse_line(line: &str) -> Result<NewQuestion, LineError> {
    let fields = split_line(line);
    let count = fields.len();
    if !(MIN_FIELDS..=MAX_FIELDS).contains(&count) {
        return Err(LineError::BadFieldCount(count));
    }

    let mut fields = fields.into_iter();
    let question = fields.next().ok_or(LineError::LineProcessingError)?;
    let options: Vec<String> = fields.by_ref().take(4).collect();
    let correct_answer = fields.next().ok_or(LineError::LineProcessingError)?;
    let explanation = fields
        .next()
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_EXPLANATION.to_string());

    if !options.contains(&correct_answer) {
        return Err(LineError::AnswerNotInOptions);
    }

    Ok(NewQuestion {
        question,
        options,
        correct_answer,
        explanation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_a_full_seven_field_line() {
        let q = parse_line("Capital of France?,Paris,London,Berlin,Madrid,Paris,Basic geography").unwrap();
        assert_eq!(q.question, "Capital of France?");
        assert_eq!(q.options, vec!["Paris", "London", "Berlin", "Madrid"]);
        assert_eq!(q.correct_answer, "Paris");
        assert_eq!(q.explanation, "Basic geography");
    }

    #[test]
    fn defaults_missing_explanation() {
        let q = parse_line("2+2=?,3,4,5,6,4").unwrap();
        assert_eq!(q.explanation, DEFAULT_EXPLANATION);
    }

    #[test]
    fn rejects_answer_not_in_options() {
        assert_eq!(parse_line("2+2=?,3,4,5,6,7"), Err(LineError::AnswerNotInOptions));
    }

    #[test]
    fn answer_match_is_case_sensitive() {
        assert_eq!(
            parse_line("Capital?,Paris,London,Berlin,Madrid,paris"),
            Err(LineError::AnswerNotInOptions)
        );
    }

    #[test]
    fn rejects_too_few_and_too_many_fields() {
        assert_eq!(parse_line("Q,only,three"), Err(LineError::BadFieldCount(3)));
        assert_eq!(
            parse_line("Q,a,b,c,d,a,expl,extra"),
            Err(LineError::BadFieldCount(8))
        );
    }

    #[test]
    fn bad_field_count_names_the_expected_range() {
        let msg = LineError::BadFieldCount(3).to_string();
        assert_eq!(msg, "expected 6-7 fields, got 3");
    }

    #[test]
    fn quoted_fields_keep_literal_commas() {
        let q = parse_line(r#""Who wrote ""1984""?","G. Orwell, the author",Huxley,Kafka,Camus,"G. Orwell, the author""#)
            .unwrap();
        assert_eq!(q.question, r#"Who wrote "1984"?"#);
        assert_eq!(q.options[0], "G. Orwell, the author");
        assert_eq!(q.correct_answer, "G. Orwell, the author");
    }

    #[test]
    fn fields_are_trimmed() {
        let q = parse_line("  Q?  , a ,b , c,  d , a ").unwrap();
        assert_eq!(q.question, "Q?");
        assert_eq!(q.options, vec!["a", "b", "c", "d"]);
        assert_eq!(q.correct_answer, "a");
    }

    #[test]
    fn unterminated_quote_runs_to_end_of_line() {
        let fields = split_line(r#"a,"b,c"#);
        assert_eq!(fields, vec!["a", "b,c"]);
    }

    #[test]
    fn empty_explanation_field_falls_back_to_default() {
        let q = parse_line("Q?,a,b,c,d,a,").unwrap();
        assert_eq!(q.explanation, DEFAULT_EXPLANATION);
    }
}
