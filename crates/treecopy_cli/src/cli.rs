//! Command-line model for the `treecopy` binary.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use treecopy_io_fs::{
    EnumCopyInterruptStrategy, EnumCopyRootConflictStrategy, SIZE_COPY_BUFFER_DEFAULT,
    SpecCopyOptions,
};
use treecopy_log::SyslogFacility;

#[derive(Debug, Parser)]
#[command(
    name = "treecopy",
    version,
    about = "Recursively copy a directory tree, optionally preserving mode and timestamps"
)]
pub struct Cli {
    /// Directory to copy from
    pub source_directory: PathBuf,

    /// Directory to create and copy into
    pub destination_directory: PathBuf,

    /// Preserve permission bits and access/modification times
    #[arg(short = 'a', long = "preserve")]
    pub preserve: bool,

    /// Copy into an existing destination directory instead of failing
    #[arg(long)]
    pub merge: bool,

    /// Leave the incomplete destination in place when interrupted
    #[arg(long)]
    pub keep_partial: bool,

    /// Transfer chunk size in bytes
    #[arg(
        long,
        value_name = "BYTES",
        default_value_t = SIZE_COPY_BUFFER_DEFAULT,
        value_parser = parse_buffer_size
    )]
    pub buffer_size: usize,

    /// Syslog facility for run notices (user, daemon, local0)
    #[arg(
        long,
        value_name = "NAME",
        default_value = "user",
        value_parser = parse_syslog_facility
    )]
    pub syslog_facility: SyslogFacility,

    /// Increase stderr verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn to_copy_options(&self) -> SpecCopyOptions {
        SpecCopyOptions {
            if_preserve_attributes: self.preserve,
            rule_conflict_root: if self.merge {
                EnumCopyRootConflictStrategy::Merge
            } else {
                EnumCopyRootConflictStrategy::Error
            },
            rule_interrupt: if self.keep_partial {
                EnumCopyInterruptStrategy::Keep
            } else {
                EnumCopyInterruptStrategy::Remove
            },
            size_buffer: self.buffer_size,
            token_cancel: None,
        }
    }
}

const TXT_USAGE: &str = "Usage: treecopy [OPTIONS] <SOURCE_DIRECTORY> <DESTINATION_DIRECTORY>";

/// Collapse a clap parse error into the single stderr line `treecopy` prints.
pub fn usage_line(err: &clap::Error) -> String {
    let txt_rendered = err.render().to_string();
    let txt_reason = txt_rendered
        .lines()
        .take_while(|line| !line.starts_with("Usage:"))
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("tip:"))
        .collect::<Vec<_>>()
        .join(" ");
    let txt_reason = txt_reason.strip_prefix("error: ").unwrap_or(&txt_reason);
    format!("treecopy: {}. {TXT_USAGE}", txt_reason.trim_end_matches('.'))
}

fn parse_buffer_size(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_syslog_facility(raw: &str) -> Result<SyslogFacility, String> {
    SyslogFacility::from_name(raw).ok_or_else(|| format!("unknown syslog facility `{raw}`"))
}
