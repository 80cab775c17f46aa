//! The automated challenge session for `fizzbot run`.
//!
//! Each iteration loads the checkpoint, fetches the question it names,
//! answers it, submits the answer and, on success, archives the stage and
//! advances the checkpoint. The loop ends when the service reports the
//! interview complete; every error ends the run immediately, and a rerun
//! resumes from the last written checkpoint.

use std::path::PathBuf;

use tracing::{debug, info, instrument};

use crate::core::rules::solve;
use crate::core::transition::{Transition, classify};
use crate::core::types::{Question, StageRecord};
use crate::error::FizzbotError;
use crate::io::api::FizzbotApi;
use crate::io::checkpoint::{Checkpoint, load_checkpoint, write_checkpoint};
use crate::io::config::Config;
use crate::io::stage_store::write_stage;

/// Inputs of a session, taken from [`Config`] so tests can swap them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub starter_stage_id: String,
    pub starter_answer: String,
    pub checkpoint_path: PathBuf,
    pub stages_dir: PathBuf,
}

impl SessionConfig {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            starter_stage_id: cfg.starter_stage_id.clone(),
            starter_answer: cfg.starter_answer.clone(),
            checkpoint_path: cfg.checkpoint_path.clone(),
            stages_dir: cfg.stages_dir.clone(),
        }
    }
}

/// How a session begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStart {
    /// Seed the checkpoint with the starter stage and submit the starter answer first.
    Fresh,
    /// Continue from the existing checkpoint; every answer is computed.
    Resume,
}

/// One checkpointed step, handed to the `on_step` callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub stage_id: String,
    pub answer: String,
    /// Message returned with the verdict.
    pub message: String,
    /// Empty when this step completed the interview.
    pub next_stage_id: String,
}

/// Reason why `run_session` stopped successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStop {
    /// The service reported the interview complete.
    Complete {
        grade: Option<String>,
        elapsed_seconds: Option<u64>,
    },
    /// The checkpoint was already terminal; nothing was fetched.
    AlreadyComplete,
}

/// Summary of a session invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub steps_executed: u32,
    pub stop: SessionStop,
}

/// Run the challenge until the interview completes.
///
/// Stops immediately on any error (not found, transport, decode, rejected or
/// unexpected outcome, persistence). Nothing is archived for the failing step.
#[instrument(skip_all, fields(start = ?start))]
pub fn run_session<A: FizzbotApi, F: FnMut(&StepReport)>(
    api: &A,
    config: &SessionConfig,
    start: SessionStart,
    mut on_step: F,
) -> Result<SessionOutcome, FizzbotError> {
    let mut starter_pending = match start {
        SessionStart::Fresh => {
            let seed = Checkpoint::new(config.starter_stage_id.clone());
            write_checkpoint(&config.checkpoint_path, &seed)?;
            info!(stage_id = %seed.last_stage_id, "session seeded");
            true
        }
        SessionStart::Resume => false,
    };

    let mut steps_executed = 0u32;
    loop {
        let checkpoint = load_checkpoint(&config.checkpoint_path)?;
        if checkpoint.is_terminal() {
            info!(steps_executed, "checkpoint is terminal");
            return Ok(SessionOutcome {
                steps_executed,
                stop: SessionStop::AlreadyComplete,
            });
        }
        let stage_id = checkpoint.last_stage_id;

        let question = api.get_question(&stage_id)?;
        let answer = if starter_pending {
            config.starter_answer.clone()
        } else {
            solve(&question.numbers, &question.rules)
        };
        starter_pending = false;
        debug!(stage_id = %stage_id, answer = %answer, "answer prepared");

        let result = api.submit_answer(&stage_id, &answer)?;
        let transition = classify(&stage_id, &question, &answer, &result)?;
        record_stage(config, &stage_id, &question, &answer, &transition)?;

        steps_executed += 1;
        on_step(&StepReport {
            stage_id: stage_id.clone(),
            answer,
            message: result.message.clone(),
            next_stage_id: transition.next_stage_id().to_string(),
        });

        if let Transition::Finish {
            grade,
            elapsed_seconds,
        } = transition
        {
            info!(steps_executed, grade = ?grade, elapsed_seconds = ?elapsed_seconds, "interview complete");
            return Ok(SessionOutcome {
                steps_executed,
                stop: SessionStop::Complete {
                    grade,
                    elapsed_seconds,
                },
            });
        }
    }
}

/// Archive an accepted stage and advance the checkpoint.
///
/// The stage record is written before the checkpoint so a crash in between
/// replays the same stage on resume.
pub fn record_stage(
    config: &SessionConfig,
    stage_id: &str,
    question: &Question,
    answer: &str,
    transition: &Transition,
) -> Result<(), FizzbotError> {
    let next_stage_id = transition.next_stage_id().to_string();
    let record = StageRecord {
        id: stage_id.to_string(),
        question: question.clone(),
        answer: answer.to_string(),
        next_stage_id: next_stage_id.clone(),
    };
    write_stage(&config.stages_dir, &record)?;
    write_checkpoint(&config.checkpoint_path, &Checkpoint::new(next_stage_id))
}
