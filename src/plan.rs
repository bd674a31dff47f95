//! `flagstate plan` — the change-set builder.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;

use flagstate::config::FlagstateConfig;
use flagstate::format::OutputFormat;
use flagstate::snapshot_io::load_snapshot;
use flagstate_core::model::FeatureState;
use flagstate_core::reconcile::{ChangeSet, reconcile};

/// Compute a change set from two snapshot files.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Desired snapshot (the edited configuration).
    #[arg(long)]
    pub desired: PathBuf,

    /// Current snapshot (the fetched configuration).
    #[arg(long)]
    pub current: PathBuf,

    /// Output format: text, json.
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Config file path.
    #[arg(long, default_value = "flagstate.toml")]
    pub config: PathBuf,
}

pub fn run(args: &PlanArgs) -> Result<()> {
    let config = FlagstateConfig::load(&args.config)?;
    let format = args.format.unwrap_or(config.output.format);

    let change_set = compute(args)?;

    match format {
        OutputFormat::Json => println!("{}", format.serialize(&change_set)?),
        OutputFormat::Text => print!("{}", render_text(&change_set)),
    }
    Ok(())
}

/// Load both snapshots, check they cover the same scope, and reconcile.
pub(crate) fn compute(args: &PlanArgs) -> Result<ChangeSet> {
    let desired = load_snapshot(&args.desired)?;
    let current = load_snapshot(&args.current)?;
    if desired.scope() != current.scope() {
        bail!(
            "snapshots cover different scopes: {} vs {}",
            desired.scope(),
            current.scope()
        );
    }
    Ok(reconcile(desired.states(), current.states())?)
}

fn render_text(change_set: &ChangeSet) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Plan: {} to create, {} to update, {} override(s) to delete",
        change_set.to_create.len(),
        change_set.to_update.len(),
        change_set.segment_ids_to_delete_overrides.len(),
    );
    for state in &change_set.to_create {
        let _ = writeln!(out, "  + {}", describe(state));
    }
    for state in &change_set.to_update {
        let _ = writeln!(out, "  ~ {}", describe(state));
    }
    for segment in &change_set.segment_ids_to_delete_overrides {
        let _ = writeln!(out, "  - override for segment {segment}");
    }
    if change_set.is_empty() {
        let _ = writeln!(out, "  (no changes)");
    }
    out
}

fn describe(state: &FeatureState) -> String {
    let target = state.feature_segment.map_or_else(
        || "default".to_owned(),
        |fs| format!("segment {} (priority {})", fs.segment, fs.priority),
    );
    let enabled = if state.enabled { "enabled" } else { "disabled" };
    format!("{target}: {enabled}, value \"{}\"", state.resolved_value())
}
