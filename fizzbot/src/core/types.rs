//! Shared deterministic types for the fizzbot core.
//!
//! These are the in-memory and on-disk shapes of the challenge data. Wire
//! payloads from the remote service are decoded into these in `io::api`.

use serde::{Deserialize, Serialize};

/// A `(divisor, text)` substitution rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub divisor: i64,
    pub text: String,
}

impl Rule {
    pub fn new(divisor: i64, text: impl Into<String>) -> Self {
        Self {
            divisor,
            text: text.into(),
        }
    }
}

/// A puzzle fetched from the remote service. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub message: String,
    /// Order matters: matching rules concatenate in list order.
    pub rules: Vec<Rule>,
    pub numbers: Vec<i64>,
    pub example_answer: String,
}

/// The remote verdict on a submitted answer.
///
/// Kept closed so every unrecognized value lands in `Unknown` with the raw
/// string preserved for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Incorrect,
    InterviewComplete,
    Unknown(String),
}

impl Outcome {
    /// Map the service's `result` string onto an outcome.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "correct" => Outcome::Correct,
            "incorrect" => Outcome::Incorrect,
            "interview complete" | "interview_complete" => Outcome::InterviewComplete,
            other => Outcome::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Outcome::Correct => "correct",
            Outcome::Incorrect => "incorrect",
            Outcome::InterviewComplete => "interview complete",
            Outcome::Unknown(raw) => raw,
        }
    }
}

/// Response to an answer submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    /// Path of the next question, e.g. `/fizzbot/questions/<id>`.
    pub next_question_ref: Option<String>,
    pub message: String,
    pub outcome: Outcome,
    pub grade: Option<String>,
    pub elapsed_seconds: Option<u64>,
}

/// One archived question/answer step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    pub id: String,
    pub question: Question,
    pub answer: String,
    /// Empty once the interview is complete.
    pub next_stage_id: String,
}
