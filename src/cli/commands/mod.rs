//! One module per subcommand; each exposes `execute`.

pub mod audit_cmd;
pub mod clear;
pub mod completions;
pub mod get;
pub mod list;
pub mod remove;
pub mod serve;
pub mod set;
