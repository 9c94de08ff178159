//! `treecopy_log`:
//! Logging sinks shared by the `treecopy` binary.
//!
//! - `syslog` : run notices sent to the system log
//! - `trace`  : stderr `tracing` subscriber

pub mod syslog;
pub mod trace;

pub use syslog::{SYSLOG_IDENT_DEFAULT, SyslogConfig, SyslogFacility, SyslogGuard};
pub use trace::{init_tracing, level_for_verbosity};
