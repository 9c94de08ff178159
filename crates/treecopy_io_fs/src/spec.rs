//! Copy specification models and top-level error types.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Transfer chunk size used when no explicit size is configured.
pub const SIZE_COPY_BUFFER_DEFAULT: usize = 1024;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Existing destination root policy, checked once before traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCopyRootConflictStrategy {
    /// Fail when the destination root already exists.
    Error,
    /// Reuse an existing destination root directory and copy into it.
    Merge,
}

/// What to do with the incomplete destination when a run is interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCopyInterruptStrategy {
    /// Leave the partial tree in place.
    Keep,
    /// Remove the destination root, but only when this run created it.
    Remove,
}

/// Filesystem call that failed, used to name the operation in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCopyOperation {
    OpenSourceDirectory,
    ReadDirectoryEntry,
    GetFileStatus,
    CreateDirectory,
    CheckDestinationDirectory,
    OpenSourceFile,
    OpenDestinationFile,
    ReadSourceFile,
    WriteDestinationFile,
    GetFileAttributes,
    SetFileMode,
    SetFileTimes,
    RemoveIncompleteDestination,
}

impl EnumCopyOperation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenSourceDirectory => "opening source directory",
            Self::ReadDirectoryEntry => "reading directory entry",
            Self::GetFileStatus => "getting file status",
            Self::CreateDirectory => "creating directory",
            Self::CheckDestinationDirectory => "checking destination directory",
            Self::OpenSourceFile => "opening source file",
            Self::OpenDestinationFile => "opening destination file",
            Self::ReadSourceFile => "reading from source file",
            Self::WriteDestinationFile => "writing to destination file",
            Self::GetFileAttributes => "getting file attributes",
            Self::SetFileMode => "setting file mode",
            Self::SetFileTimes => "setting file access times",
            Self::RemoveIncompleteDestination => "removing incomplete destination",
        }
    }
}

impl fmt::Display for EnumCopyOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for `copy_tree`.
///
/// Built once before traversal and only read afterwards.
#[derive(Debug, Clone)]
pub struct SpecCopyOptions {
    /// Copy permission bits and access/modification times to each file.
    pub if_preserve_attributes: bool,
    /// Behavior when the destination root already exists.
    pub rule_conflict_root: EnumCopyRootConflictStrategy,
    /// Behavior for the incomplete destination on interruption.
    pub rule_interrupt: EnumCopyInterruptStrategy,
    /// Transfer chunk size in bytes (must be >= 1).
    pub size_buffer: usize,
    /// Cooperative cancellation flag, observed before each entry and chunk.
    pub token_cancel: Option<Arc<AtomicBool>>,
}

impl Default for SpecCopyOptions {
    fn default() -> Self {
        Self {
            if_preserve_attributes: false,
            rule_conflict_root: EnumCopyRootConflictStrategy::Error,
            rule_interrupt: EnumCopyInterruptStrategy::Remove,
            size_buffer: SIZE_COPY_BUFFER_DEFAULT,
            token_cancel: None,
        }
    }
}

impl SpecCopyOptions {
    /// Attach a cancellation flag shared with a signal handler.
    pub fn with_cancel_token(mut self, token_cancel: Arc<AtomicBool>) -> Self {
        self.token_cancel = Some(token_cancel);
        self
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.token_cancel
            .as_ref()
            .is_some_and(|token| token.load(Ordering::Relaxed))
    }
}

/// Errors returned by the tree walker and file copier.
///
/// Every variant is fatal for the run; the caller decides how to terminate.
#[derive(Debug, thiserror::Error)]
pub enum CopyTreeError {
    /// Option combination or value rejected before any filesystem work.
    #[error("{0}")]
    InvalidOptions(String),
    /// Source path is not a directory.
    #[error("Source is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),
    /// Source and destination overlap (`src` contains `dst` or vice versa).
    #[error(
        "Source and destination directories overlap: {} <-> {}",
        .source_dir.display(),
        .destination_dir.display()
    )]
    SourceDestinationOverlap {
        source_dir: PathBuf,
        destination_dir: PathBuf,
    },
    /// A followed symlink leads back to one of its ancestor directories.
    #[error("Symlink loop detected: {}", .0.display())]
    SymlinkLoop(PathBuf),
    /// Destination root exists while the strict root policy is active.
    #[error("Destination directory already exists: {}", .0.display())]
    DestinationExists(PathBuf),
    /// A filesystem call failed.
    #[error("Error {operation} {}: {source}", .path.display())]
    Io {
        operation: EnumCopyOperation,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Cancellation was observed before the tree was complete.
    #[error("Copying interrupted: {}", .path.display())]
    Interrupted {
        /// Destination root of the run.
        path: PathBuf,
        /// Whether the incomplete destination root was removed.
        if_removed: bool,
    },
}

impl CopyTreeError {
    pub(crate) fn io(
        operation: EnumCopyOperation,
        path: impl Into<PathBuf>,
        source: io::Error,
    ) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Failing operation, when the error came from a filesystem call.
    pub fn operation(&self) -> Option<EnumCopyOperation> {
        match self {
            Self::Io { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
