//! Classification of an answer result into the next session transition.

use crate::core::next_ref::next_stage_id;
use crate::core::types::{AnswerResult, Outcome, Question};
use crate::error::FizzbotError;

/// What the session does after a submission was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Correct answer: checkpoint `next_stage_id` and keep going.
    Advance { next_stage_id: String },
    /// Interview complete: checkpoint an empty id and stop.
    Finish {
        grade: Option<String>,
        elapsed_seconds: Option<u64>,
    },
}

impl Transition {
    /// Stage id to persist in the checkpoint (empty when finished).
    pub fn next_stage_id(&self) -> &str {
        match self {
            Transition::Advance { next_stage_id } => next_stage_id,
            Transition::Finish { .. } => "",
        }
    }
}

/// Decide the transition for `result`, answering `question` at `stage_id`.
///
/// Any outcome other than correct or interview complete is an error carrying
/// the full question and result for diagnosis.
pub fn classify(
    stage_id: &str,
    question: &Question,
    answer: &str,
    result: &AnswerResult,
) -> Result<Transition, FizzbotError> {
    match &result.outcome {
        Outcome::Correct => {
            let reference = result.next_question_ref.as_deref().ok_or_else(|| {
                FizzbotError::decode(
                    format!("answer result for stage {stage_id}"),
                    "correct outcome without a next question reference",
                )
            })?;
            Ok(Transition::Advance {
                next_stage_id: next_stage_id(reference)?,
            })
        }
        Outcome::InterviewComplete => Ok(Transition::Finish {
            grade: result.grade.clone(),
            elapsed_seconds: result.elapsed_seconds,
        }),
        Outcome::Incorrect => Err(FizzbotError::Incorrect {
            stage_id: stage_id.to_string(),
            answer: answer.to_string(),
            message: result.message.clone(),
            question: dump(question),
            result: dump(result),
        }),
        Outcome::Unknown(raw) => Err(FizzbotError::UnexpectedOutcome {
            stage_id: stage_id.to_string(),
            outcome: raw.clone(),
            question: dump(question),
            result: dump(result),
        }),
    }
}

fn dump<T: serde::Serialize + std::fmt::Debug>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| format!("{value:#?}"))
}
