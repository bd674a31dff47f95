//! `flagstate pending` — the "has pending changes" check.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;

use flagstate::snapshot_io::load_snapshot;
use flagstate_core::reconcile::reconcile;

/// Check whether a desired snapshot differs from the current one.
#[derive(Args, Debug)]
pub struct PendingArgs {
    /// Desired snapshot (the edited configuration).
    #[arg(long)]
    pub desired: PathBuf,

    /// Current snapshot (the fetched configuration).
    #[arg(long)]
    pub current: PathBuf,
}

pub fn run(args: &PendingArgs) -> Result<()> {
    let desired = load_snapshot(&args.desired)?;
    let current = load_snapshot(&args.current)?;
    if desired.scope() != current.scope() {
        bail!(
            "snapshots cover different scopes: {} vs {}",
            desired.scope(),
            current.scope()
        );
    }

    let change_set = reconcile(desired.states(), current.states())?;
    if change_set.is_empty() {
        println!("no pending changes");
        Ok(())
    } else {
        println!("{} pending change(s)", change_set.len());
        // Non-zero exit so shell scripts can gate on pending work.
        std::process::exit(1);
    }
}
