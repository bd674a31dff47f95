//! `flagstate diff` — the compare view.
//!
//! Pairs states across two snapshots by match key and renders one
//! field-level diff row per key: the environment default through the simple
//! diff, segment overrides through the override diff with names resolved
//! from an optional segments file.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use serde::Serialize;

use flagstate::config::FlagstateConfig;
use flagstate::format::OutputFormat;
use flagstate::snapshot_io::{load_segments, load_snapshot, segment_name};
use flagstate_core::diff::{
    FeatureStateDiff, SegmentOverrideDiff, diff_feature_state, diff_segment_override,
};
use flagstate_core::model::{MatchKey, Segment, Snapshot};

/// Diff two snapshot files field by field.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Old snapshot.
    #[arg(long)]
    pub old: PathBuf,

    /// New snapshot.
    #[arg(long)]
    pub new: PathBuf,

    /// Segments file (JSON array of {id, name}) for override names.
    #[arg(long)]
    pub segments: Option<PathBuf>,

    /// Output format: text, json.
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Include rows with zero changes.
    #[arg(long)]
    pub show_unchanged: bool,

    /// Config file path.
    #[arg(long, default_value = "flagstate.toml")]
    pub config: PathBuf,
}

/// One rendered comparison row, keyed for JSON consumers.
#[derive(Debug, Serialize)]
pub(crate) struct DiffRow {
    /// `"default"` or the segment id.
    pub key: String,
    #[serde(flatten)]
    pub body: DiffBody,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum DiffBody {
    Default(FeatureStateDiff),
    Override(SegmentOverrideDiff),
}

impl DiffBody {
    fn total_changes(&self) -> u32 {
        match self {
            Self::Default(d) => d.total_changes,
            Self::Override(d) => d.total_changes,
        }
    }
}

pub fn run(args: &DiffArgs) -> Result<()> {
    let config = FlagstateConfig::load(&args.config)?;
    let format = args.format.unwrap_or(config.output.format);
    let show_unchanged = args.show_unchanged || config.diff.show_unchanged;

    let old = load_snapshot(&args.old)?;
    let new = load_snapshot(&args.new)?;
    let segments = match &args.segments {
        Some(path) => load_segments(path)?,
        None => Vec::new(),
    };

    let rows = compute_rows(&old, &new, &segments)?;
    let rows: Vec<DiffRow> = rows
        .into_iter()
        .filter(|row| show_unchanged || row.body.total_changes() > 0)
        .collect();

    match format {
        OutputFormat::Json => println!("{}", format.serialize(&rows)?),
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("no differences");
            }
            for row in &rows {
                println!("{}", render_row(row));
            }
        }
    }
    Ok(())
}

/// Pair states by match key (old order first, then new-only keys) and diff
/// each pair.
pub(crate) fn compute_rows(
    old: &Snapshot,
    new: &Snapshot,
    segments: &[Segment],
) -> Result<Vec<DiffRow>> {
    if old.scope() != new.scope() {
        bail!(
            "snapshots cover different scopes: {} vs {}",
            old.scope(),
            new.scope()
        );
    }

    let mut keys: Vec<MatchKey> = old.states().iter().map(|s| s.match_key()).collect();
    for state in new.states() {
        let key = state.match_key();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    let mut rows = Vec::with_capacity(keys.len());
    for key in keys {
        let old_state = old.state_for(key);
        let new_state = new.state_for(key);
        let body = match key {
            MatchKey::Default => DiffBody::Default(diff_feature_state(old_state, new_state)?),
            MatchKey::Segment(id) => {
                let name = segment_name(segments, id);
                DiffBody::Override(diff_segment_override(old_state, new_state, &name)?)
            }
        };
        rows.push(DiffRow {
            key: key.to_string(),
            body,
        });
    }
    Ok(rows)
}

fn render_row(row: &DiffRow) -> String {
    match &row.body {
        DiffBody::Default(d) => format!(
            "default: enabled {} -> {}, value \"{}\" -> \"{}\" ({} change(s))",
            d.old_enabled, d.new_enabled, d.old_value, d.new_value, d.total_changes
        ),
        DiffBody::Override(d) => {
            let name = if d.new_name.is_empty() {
                &d.old_name
            } else {
                &d.new_name
            };
            format!(
                "segment {name}: enabled {} -> {}, value \"{}\" -> \"{}\", priority \"{}\" -> \"{}\" ({} change(s))",
                d.old_enabled,
                d.new_enabled,
                d.old_value,
                d.new_value,
                d.old_priority,
                d.new_priority,
                d.total_changes
            )
        }
    }
}
