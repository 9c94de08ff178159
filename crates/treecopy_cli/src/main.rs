//! `treecopy` entry point.
//!
//! Parses arguments, wires SIGINT to cancellation, runs the copy and maps the
//! outcome to an exit status. Every failure prints one line on stderr; start,
//! completion and interruption notices go to syslog.

mod cli;
mod signal;

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use clap::Parser;
use clap::error::ErrorKind;
use treecopy_io_fs::{CopyTreeError, copy_tree};
use treecopy_log::{SYSLOG_IDENT_DEFAULT, SyslogConfig, SyslogGuard, init_tracing};

use crate::cli::Cli;

const NAME_PROGRAM: &str = "treecopy";

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = err.print();
                    ExitCode::SUCCESS
                }
                _ => {
                    eprintln!("{}", cli::usage_line(&err));
                    ExitCode::FAILURE
                }
            };
        }
    };
    init_tracing(cli.verbose);
    tracing::debug!(?cli, "parsed arguments");

    let token_cancel = match signal::install_interrupt_handler() {
        Ok(token) => token,
        Err(e) => {
            eprintln!("{NAME_PROGRAM}: Error setting signal handler: {e}");
            return ExitCode::FAILURE;
        }
    };
    let guard_syslog = SyslogConfig::new(cli.syslog_facility, SYSLOG_IDENT_DEFAULT).open();

    match run(&cli, token_cancel, &guard_syslog) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CopyTreeError::Interrupted { path, if_removed }) => {
            if if_removed {
                guard_syslog.info(&format!(
                    "Copying interrupted. Deleted incomplete destination {}",
                    path.display()
                ));
            } else {
                guard_syslog.info(&format!(
                    "Copying interrupted. Left incomplete destination {} in place",
                    path.display()
                ));
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{NAME_PROGRAM}: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(
    cli: &Cli,
    token_cancel: Arc<AtomicBool>,
    guard_syslog: &SyslogGuard,
) -> Result<(), CopyTreeError> {
    let spec_cp_options = cli.to_copy_options().with_cancel_token(token_cancel);

    guard_syslog.info(&format!(
        "Copying started: {} -> {}",
        cli.source_directory.display(),
        cli.destination_directory.display()
    ));
    let report = copy_tree(
        &cli.source_directory,
        &cli.destination_directory,
        &spec_cp_options,
    )?;
    guard_syslog.info(&format!(
        "Copying completed successfully: {}",
        report.format("copied")
    ));
    Ok(())
}
