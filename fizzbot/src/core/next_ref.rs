//! Extraction of the next stage id from a `nextQuestion` reference.

use crate::error::FizzbotError;

const EXPECTED_SEGMENTS: usize = 4;

/// Return the stage id named by `reference`.
///
/// The reference must look like `/fizzbot/questions/<id>`: exactly four
/// `/`-separated segments, the first empty and the last a valid stage id
/// (see [`validate_stage_id`]).
pub fn next_stage_id(reference: &str) -> Result<String, FizzbotError> {
    let segments: Vec<&str> = reference.split('/').collect();
    if segments.len() != EXPECTED_SEGMENTS {
        return Err(FizzbotError::decode(
            "next question reference",
            format!(
                "expected {EXPECTED_SEGMENTS} '/'-separated segments in {reference:?}, found {}",
                segments.len()
            ),
        ));
    }
    if !segments[0].is_empty() {
        return Err(FizzbotError::decode(
            "next question reference",
            format!("{reference:?} is not an absolute path"),
        ));
    }
    let id = segments[EXPECTED_SEGMENTS - 1];
    if id.trim().is_empty() {
        return Err(FizzbotError::decode(
            "next question reference",
            format!("{reference:?} has an empty stage id"),
        ));
    }
    validate_stage_id(id)?;
    Ok(id.to_string())
}

/// Stage ids name archive files, so they must be a single plain file-name
/// component: non-empty, not starting with `.`, and free of path separators.
pub fn validate_stage_id(id: &str) -> Result<(), FizzbotError> {
    if id.is_empty() || id.starts_with('.') || id.contains(|c: char| c == '/' || c == '\\') {
        return Err(FizzbotError::decode(
            "stage id",
            format!("{id:?} cannot be used as a file name"),
        ));
    }
    Ok(())
}
