//! Filesystem tree traversal and copy orchestration.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::file::copy_file;
use crate::report::{ReportCopy, ReportCopyBuilder};
use crate::spec::{CopyTreeError, EnumCopyInterruptStrategy, EnumCopyOperation, SpecCopyOptions};
use crate::util::{
    create_directory, dir_identity, is_overlap, prepare_destination_root,
    remove_incomplete_destination,
};

#[derive(Debug)]
struct SpecCopyContext<'a> {
    spec_cp_options: &'a SpecCopyOptions,
    builder_cp_report: ReportCopyBuilder,
    /// Identities of the directories on the current descent path.
    l_dirs_ancestors: Vec<(u64, u64)>,
}

impl<'a> SpecCopyContext<'a> {
    fn new(spec_cp_options: &'a SpecCopyOptions) -> Self {
        Self {
            spec_cp_options,
            builder_cp_report: ReportCopyBuilder::default(),
            l_dirs_ancestors: Vec::new(),
        }
    }
}

/// Copy a directory tree from `dir_source` to a new `dir_destination`.
///
/// This function performs:
/// 1. Option validation and source/destination overlap checks.
/// 2. The destination root precondition ([`SpecCopyOptions::rule_conflict_root`]).
/// 3. A depth-first walk, creating directories and copying every other entry.
///
/// Any failure stops the walk and is returned as-is. When cancellation is
/// observed the run ends with [`CopyTreeError::Interrupted`], after applying
/// [`SpecCopyOptions::rule_interrupt`]. A root that existed before the run is
/// never removed.
pub fn copy_tree<P, Q>(
    dir_source: P,
    dir_destination: Q,
    spec_cp_options: &SpecCopyOptions,
) -> Result<ReportCopy, CopyTreeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    if spec_cp_options.size_buffer == 0 {
        return Err(CopyTreeError::InvalidOptions(
            "Arg `size_buffer` must be >= 1.".to_string(),
        ));
    }

    let path_dir_src = dir_source.as_ref().to_path_buf();
    let path_dir_dst = dir_destination.as_ref().to_path_buf();

    if !path_dir_src.is_dir() {
        return Err(CopyTreeError::SourceNotDirectory(path_dir_src));
    }
    if is_overlap(&path_dir_src, &path_dir_dst) {
        return Err(CopyTreeError::SourceDestinationOverlap {
            source_dir: path_dir_src,
            destination_dir: path_dir_dst,
        });
    }

    let if_created_root =
        prepare_destination_root(&path_dir_dst, spec_cp_options.rule_conflict_root)?;
    info!(
        src = %path_dir_src.display(),
        dst = %path_dir_dst.display(),
        if_preserve_attributes = spec_cp_options.if_preserve_attributes,
        "copy started"
    );

    let mut spec_cp_ctx = SpecCopyContext::new(spec_cp_options);
    match walk_directory(&path_dir_src, &path_dir_dst, &mut spec_cp_ctx) {
        Ok(()) => {
            let report = spec_cp_ctx.builder_cp_report.build();
            info!("{report}");
            Ok(report)
        }
        Err(CopyTreeError::Interrupted { .. }) => {
            let if_remove = if_created_root
                && spec_cp_options.rule_interrupt == EnumCopyInterruptStrategy::Remove;
            Err(settle_interrupted(path_dir_dst, if_remove))
        }
        Err(e) => Err(e),
    }
}

/// Apply the interrupt cleanup and build the final `Interrupted` error.
///
/// A failed removal is reported as a warning; the run still ends as
/// interrupted, with `if_removed` set to `false`.
fn settle_interrupted(path_dir_dst: PathBuf, if_remove: bool) -> CopyTreeError {
    let mut if_removed = false;
    if if_remove {
        match remove_incomplete_destination(&path_dir_dst) {
            Ok(()) => if_removed = true,
            Err(e) => warn!("{e}"),
        }
    }
    CopyTreeError::Interrupted {
        path: path_dir_dst,
        if_removed,
    }
}

/// Recursively reproduce the directory `dir_source` under `dir_destination`.
///
/// `dir_destination` is created if missing; an existing directory is reused.
/// Entries are classified through symlinks: a link to a directory is walked,
/// anything else is handed to [`copy_file`]. No root precondition or
/// interruption cleanup is applied here, see [`copy_tree`].
pub fn copy_directory<P, Q>(
    dir_source: P,
    dir_destination: Q,
    spec_cp_options: &SpecCopyOptions,
) -> Result<ReportCopy, CopyTreeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let mut spec_cp_ctx = SpecCopyContext::new(spec_cp_options);
    walk_directory(
        dir_source.as_ref(),
        dir_destination.as_ref(),
        &mut spec_cp_ctx,
    )?;
    Ok(spec_cp_ctx.builder_cp_report.build())
}

fn interrupted_at(path: &Path) -> CopyTreeError {
    CopyTreeError::Interrupted {
        path: path.to_path_buf(),
        if_removed: false,
    }
}

fn walk_directory(
    path_dir_src: &Path,
    path_dir_dst: &Path,
    spec_cp_ctx: &mut SpecCopyContext<'_>,
) -> Result<(), CopyTreeError> {
    if spec_cp_ctx.spec_cp_options.is_cancelled() {
        return Err(interrupted_at(path_dir_dst));
    }

    let iter_entries = fs::read_dir(path_dir_src).map_err(|e| {
        CopyTreeError::io(EnumCopyOperation::OpenSourceDirectory, path_dir_src, e)
    })?;
    let stat_dir_src = fs::metadata(path_dir_src).map_err(|e| {
        CopyTreeError::io(EnumCopyOperation::GetFileStatus, path_dir_src, e)
    })?;
    let identity_dir = dir_identity(&stat_dir_src);
    if let Some(identity) = identity_dir {
        if spec_cp_ctx.l_dirs_ancestors.contains(&identity) {
            return Err(CopyTreeError::SymlinkLoop(path_dir_src.to_path_buf()));
        }
        spec_cp_ctx.l_dirs_ancestors.push(identity);
    }

    let res_walk = walk_entries(iter_entries, path_dir_src, path_dir_dst, spec_cp_ctx);

    if identity_dir.is_some() {
        spec_cp_ctx.l_dirs_ancestors.pop();
    }
    res_walk
}

fn walk_entries(
    iter_entries: fs::ReadDir,
    path_dir_src: &Path,
    path_dir_dst: &Path,
    spec_cp_ctx: &mut SpecCopyContext<'_>,
) -> Result<(), CopyTreeError> {
    if create_directory(path_dir_dst)? {
        debug!(dst = %path_dir_dst.display(), "created directory");
    }
    spec_cp_ctx.builder_cp_report.add_dir();

    for _entry_res in iter_entries {
        if spec_cp_ctx.spec_cp_options.is_cancelled() {
            return Err(interrupted_at(path_dir_dst));
        }

        let entry = _entry_res.map_err(|e| {
            CopyTreeError::io(EnumCopyOperation::ReadDirectoryEntry, path_dir_src, e)
        })?;
        let path_entry_src: PathBuf = entry.path();
        let path_entry_dst = path_dir_dst.join(entry.file_name());

        let stat_entry = fs::metadata(&path_entry_src).map_err(|e| {
            CopyTreeError::io(EnumCopyOperation::GetFileStatus, &path_entry_src, e)
        })?;

        if stat_entry.is_dir() {
            walk_directory(&path_entry_src, &path_entry_dst, spec_cp_ctx)?;
        } else {
            let n_bytes =
                copy_file(&path_entry_src, &path_entry_dst, spec_cp_ctx.spec_cp_options)?;
            spec_cp_ctx.builder_cp_report.add_file(n_bytes);
        }
    }
    Ok(())
}
