//! Loading snapshot and segment fixtures from disk.
//!
//! The CLI's only I/O: JSON [`Snapshot`] files (validated on decode) and an
//! optional JSON array of [`Segment`]s for name resolution in diff output.

use std::path::Path;

use anyhow::{Context, Result};
use flagstate_core::model::{Segment, SegmentId, Snapshot};

/// Load and validate a snapshot file.
///
/// # Errors
/// Returns an error if the file cannot be read, is not valid JSON, or fails
/// snapshot validation (out-of-scope states, duplicate match keys).
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot at {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&raw)
        .with_context(|| format!("parsing snapshot at {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        states = snapshot.states().len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

/// Load a segments file (JSON array of `{id, name}`).
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_segments(path: &Path) -> Result<Vec<Segment>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading segments at {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing segments at {}", path.display()))
}

/// Resolve a segment's display name, falling back to its id.
#[must_use]
pub fn segment_name(segments: &[Segment], id: SegmentId) -> String {
    segments
        .iter()
        .find(|s| s.id == id)
        .map_or_else(|| id.to_string(), |s| s.name.clone())
}
