//! Application layer: dashboard state, preview handles and the root shell.

pub mod dashboard;
pub mod preview;
pub mod shell;

pub use dashboard::{DashboardController, DashboardDeps, DashboardOptions, DashboardView, RunOutcome};
pub use preview::{PreviewEntry, PreviewRegistry, PreviewUrl};
pub use shell::{RootShell, ShellView};
