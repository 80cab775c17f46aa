//! Error taxonomy for remote calls, decoding and persistence.
//!
//! Every variant is fatal for the current run. The CLI maps them to stable
//! exit codes via [`FizzbotError::exit_code`].

use std::path::PathBuf;

use thiserror::Error;

use crate::exit_codes;

#[derive(Debug, Error)]
pub enum FizzbotError {
    #[error("stage not found: {stage_id}")]
    NotFound { stage_id: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server returned {status} for {url}: {body}")]
    Server {
        url: String,
        status: u16,
        body: String,
    },

    #[error("decode {context}: {reason}")]
    Decode { context: String, reason: String },

    #[error(
        "answer {answer:?} to stage {stage_id} was rejected: {message}\nquestion:\n{question}\nresult:\n{result}"
    )]
    Incorrect {
        stage_id: String,
        answer: String,
        message: String,
        /// Pretty JSON dump of the question.
        question: String,
        /// Pretty JSON dump of the answer result.
        result: String,
    },

    #[error(
        "unexpected outcome '{outcome}' for stage {stage_id}\nquestion:\n{question}\nresult:\n{result}"
    )]
    UnexpectedOutcome {
        stage_id: String,
        outcome: String,
        /// Pretty JSON dump of the question.
        question: String,
        /// Pretty JSON dump of the answer result.
        result: String,
    },

    #[error("{action} {}: {source}", .path.display())]
    Persistence {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FizzbotError {
    pub fn decode(context: impl Into<String>, reason: impl ToString) -> Self {
        FizzbotError::Decode {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    pub fn persistence(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FizzbotError::Persistence {
            action,
            path: path.into(),
            source,
        }
    }

    /// Exit code reported by the CLI for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            FizzbotError::NotFound { .. } => exit_codes::NOT_FOUND,
            FizzbotError::Incorrect { .. } => exit_codes::REJECTED,
            FizzbotError::UnexpectedOutcome { .. } => exit_codes::UNEXPECTED_OUTCOME,
            FizzbotError::Transport { .. }
            | FizzbotError::Server { .. }
            | FizzbotError::Decode { .. }
            | FizzbotError::Persistence { .. } => exit_codes::FAILED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_taxonomy() {
        let not_found = FizzbotError::NotFound {
            stage_id: "abc".to_string(),
        };
        assert_eq!(not_found.exit_code(), exit_codes::NOT_FOUND);
        assert_eq!(
            FizzbotError::decode("checkpoint", "eof").exit_code(),
            exit_codes::FAILED
        );
        let io = std::io::Error::other("disk full");
        assert_eq!(
            FizzbotError::persistence("write", "/tmp/x", io).exit_code(),
            exit_codes::FAILED
        );
    }

    #[test]
    fn persistence_message_names_path() {
        let io = std::io::Error::other("denied");
        let err = FizzbotError::persistence("write checkpoint", "/data/save.json", io);
        assert_eq!(err.to_string(), "write checkpoint /data/save.json: denied");
    }
}
