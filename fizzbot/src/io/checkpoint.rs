//! Checkpoint storage: the pointer to the next stage to fetch.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FizzbotError;
use crate::io::files::{read_json, write_json_atomic};

/// Persisted resume point (`save/checkpoint.json` by default).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Checkpoint {
    /// Stage to fetch next. Empty once the interview is complete.
    pub last_stage_id: String,
}

impl Checkpoint {
    pub fn new(last_stage_id: impl Into<String>) -> Self {
        Self {
            last_stage_id: last_stage_id.into(),
        }
    }

    /// True when the interview has been completed.
    pub fn is_terminal(&self) -> bool {
        self.last_stage_id.is_empty()
    }
}

/// Load the checkpoint from disk. Missing or corrupt files are errors.
pub fn load_checkpoint(path: &Path) -> Result<Checkpoint, FizzbotError> {
    debug!(path = %path.display(), "loading checkpoint");
    let checkpoint: Checkpoint = read_json("read checkpoint", path)?;
    debug!(last_stage_id = %checkpoint.last_stage_id, "checkpoint loaded");
    Ok(checkpoint)
}

/// Atomically overwrite the checkpoint on disk.
pub fn write_checkpoint(path: &Path, checkpoint: &Checkpoint) -> Result<(), FizzbotError> {
    debug!(path = %path.display(), last_stage_id = %checkpoint.last_stage_id, "writing checkpoint");
    write_json_atomic(path, checkpoint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn checkpoint_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("save").join("checkpoint.json");

        let checkpoint = Checkpoint::new("sQ4B9Ei5X0CFK7whpHhXImrXrp7tKEyT-n5La-Yi65A");
        write_checkpoint(&path, &checkpoint).expect("write");
        let loaded = load_checkpoint(&path).expect("load");
        assert_eq!(loaded, checkpoint);
        assert!(!loaded.is_terminal());
    }

    /// Guards against accidental changes to the on-disk format.
    #[test]
    fn checkpoint_format_is_stable() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("checkpoint.json");

        write_checkpoint(&path, &Checkpoint::new("1")).expect("write");
        let contents = fs::read_to_string(&path).expect("read");
        assert_eq!(contents, "{\n  \"last_stage_id\": \"1\"\n}\n");
    }

    #[test]
    fn empty_checkpoint_is_terminal() {
        assert!(Checkpoint::new("").is_terminal());
    }

    #[test]
    fn missing_checkpoint_fails() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = load_checkpoint(&temp.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("read checkpoint"));
    }

    #[test]
    fn corrupt_checkpoint_fails() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("checkpoint.json");
        fs::write(&path, "{\"stage\": 3}").expect("write");
        let err = load_checkpoint(&path).unwrap_err();
        assert!(matches!(err, FizzbotError::Decode { .. }));
    }
}
