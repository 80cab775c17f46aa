//! Archive of answered stages, one JSON file per stage id.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::next_ref::validate_stage_id;
use crate::core::types::StageRecord;
use crate::error::FizzbotError;
use crate::io::files::{read_json, write_json_atomic};

/// Path of the archive file for `stage_id` under `stages_dir`.
pub fn stage_path(stages_dir: &Path, stage_id: &str) -> PathBuf {
    stages_dir.join(format!("{stage_id}.json"))
}

/// Archive `record`. An existing record for the same id is left untouched.
///
/// Returns `true` when a new file was written.
pub fn write_stage(stages_dir: &Path, record: &StageRecord) -> Result<bool, FizzbotError> {
    validate_stage_id(&record.id)?;
    let path = stage_path(stages_dir, &record.id);
    if path.exists() {
        debug!(stage_id = %record.id, path = %path.display(), "stage already archived");
        return Ok(false);
    }
    write_json_atomic(&path, record)?;
    info!(stage_id = %record.id, next_stage_id = %record.next_stage_id, "stage archived");
    Ok(true)
}

/// Load the archived record for `stage_id`.
pub fn load_stage(stages_dir: &Path, stage_id: &str) -> Result<StageRecord, FizzbotError> {
    read_json("read stage record", &stage_path(stages_dir, stage_id))
}
