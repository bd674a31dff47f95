//! flagstate library crate — re-exports for integration tests.
//!
//! The primary interface is the `flagstate` binary. This lib.rs exposes the
//! config, output-format, and telemetry modules so integration tests can
//! exercise them directly without going through the CLI. The engines
//! themselves live in `flagstate-core`.

pub mod config;
pub mod format;
pub mod snapshot_io;
pub mod telemetry;

// Private modules only used by the binary — not re-exported:
// plan, pending, diff_cmd.
