use anyhow::Result;
use clap::{Parser, Subcommand};

mod diff_cmd;
mod pending;
mod plan;

/// Feature-state reconciliation and diff
///
/// flagstate compares feature-flag configurations: a *snapshot* is the set
/// of feature states (one environment default plus segment overrides) for
/// one feature in one environment, stored as a JSON file.
///
/// WORKFLOW:
///
///   1. Export the current configuration to current.json
///   2. Edit a copy into desired.json
///   3. Preview the save: flagstate plan --desired desired.json --current current.json
///   4. Gate scripts on pending work: flagstate pending ...
///   5. Review two versions field by field: flagstate diff --old a.json --new b.json
#[derive(Parser)]
#[command(name = "flagstate")]
#[command(version, about)]
#[command(propagate_version = true)]
#[command(after_help = "See 'flagstate <command> --help' for more information on a specific command.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the change set turning a current snapshot into a desired one
    ///
    /// Classifies every desired state as create, update, or no-op, and
    /// lists segment overrides to delete. Nothing is applied; the output is
    /// the change request a caller would submit.
    Plan(plan::PlanArgs),

    /// Check whether a desired snapshot has pending changes
    ///
    /// Prints a one-line verdict. Exits 1 when changes are pending so
    /// scripts can gate on it, 0 when clean.
    Pending(pending::PendingArgs),

    /// Field-level diff between two snapshots
    ///
    /// Pairs states across the snapshots by match key (environment default
    /// or segment id) and prints one before/after row per pair.
    Diff(diff_cmd::DiffArgs),
}

fn main() -> Result<()> {
    flagstate::telemetry::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan(args) => plan::run(&args),
        Commands::Pending(args) => pending::run(&args),
        Commands::Diff(args) => diff_cmd::run(&args),
    }
}
