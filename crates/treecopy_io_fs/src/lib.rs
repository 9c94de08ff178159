//! `treecopy_io_fs`:
//! Rust-side recursive directory copy engine.
//!
//! Modules:
//! - `copy`   : tree walk and root orchestration
//! - `file`   : single-file content transfer and attribute preservation
//! - `spec`   : enums/options/errors
//! - `report` : run-time report model
//! - `util`   : shared helper functions

pub mod copy;
pub mod file;
pub mod report;
pub mod spec;
mod util;

pub use copy::{copy_directory, copy_tree};
pub use file::copy_file;
pub use report::{ReportCopy, ReportCopyBuilder};
pub use spec::{
    CopyTreeError, EnumCopyInterruptStrategy, EnumCopyOperation, EnumCopyRootConflictStrategy,
    SIZE_COPY_BUFFER_DEFAULT, SpecCopyOptions,
};
