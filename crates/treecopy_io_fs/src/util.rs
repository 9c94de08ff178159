use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

use crate::spec::{CopyTreeError, EnumCopyOperation, EnumCopyRootConflictStrategy};

////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

fn _absolutize_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

/// Resolve `path` as far as the filesystem allows.
///
/// A destination that does not exist yet is resolved through its parent.
fn _normalize_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    let path_abs = _absolutize_path(path);
    match (path_abs.parent(), path_abs.file_name()) {
        (Some(parent), Some(name)) => match fs::canonicalize(parent) {
            Ok(parent_resolved) => parent_resolved.join(name),
            Err(_) => path_abs,
        },
        _ => path_abs,
    }
}

pub(crate) fn is_overlap(src: &Path, dst: &Path) -> bool {
    let src_resolved = _normalize_path(src);
    let dst_resolved = _normalize_path(dst);
    dst_resolved.starts_with(&src_resolved) || src_resolved.starts_with(&dst_resolved)
}

/// `(device, inode)` pair identifying a directory, used for loop detection.
#[cfg(unix)]
pub(crate) fn dir_identity(stat: &Metadata) -> Option<(u64, u64)> {
    use std::os::unix::fs::MetadataExt;
    Some((stat.dev(), stat.ino()))
}

#[cfg(not(unix))]
pub(crate) fn dir_identity(_stat: &Metadata) -> Option<(u64, u64)> {
    None
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DestinationUtilities

/// Create `path_dir` unless it already exists as a directory.
///
/// Returns whether a new directory was created.
pub(crate) fn create_directory(path_dir: &Path) -> Result<bool, CopyTreeError> {
    match fs::create_dir(path_dir) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path_dir.is_dir() => Ok(false),
        Err(e) => Err(CopyTreeError::io(
            EnumCopyOperation::CreateDirectory,
            path_dir,
            e,
        )),
    }
}

/// Enforce the destination root policy and make sure the root exists.
///
/// Returns whether this call created the root.
pub(crate) fn prepare_destination_root(
    path_dir_dst: &Path,
    rule_conflict_root: EnumCopyRootConflictStrategy,
) -> Result<bool, CopyTreeError> {
    match fs::metadata(path_dir_dst) {
        Ok(stat_dst) => match rule_conflict_root {
            EnumCopyRootConflictStrategy::Error => {
                Err(CopyTreeError::DestinationExists(path_dir_dst.to_path_buf()))
            }
            EnumCopyRootConflictStrategy::Merge if stat_dst.is_dir() => Ok(false),
            EnumCopyRootConflictStrategy::Merge => Err(CopyTreeError::io(
                EnumCopyOperation::CreateDirectory,
                path_dir_dst,
                io::Error::from(io::ErrorKind::NotADirectory),
            )),
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => create_directory(path_dir_dst),
        Err(e) => Err(CopyTreeError::io(
            EnumCopyOperation::CheckDestinationDirectory,
            path_dir_dst,
            e,
        )),
    }
}

pub(crate) fn remove_incomplete_destination(path_dir_dst: &Path) -> Result<(), CopyTreeError> {
    fs::remove_dir_all(path_dir_dst).map_err(|e| {
        CopyTreeError::io(
            EnumCopyOperation::RemoveIncompleteDestination,
            path_dir_dst,
            e,
        )
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::{create_directory, is_overlap, prepare_destination_root};
    use crate::spec::{CopyTreeError, EnumCopyOperation, EnumCopyRootConflictStrategy};

    #[test]
    fn is_overlap_detects_nested_destination() {
        let tmp = TempDir::new().expect("tempdir");
        let src = tmp.path().join("src");
        std::fs::create_dir_all(&src).expect("mkdir src");

        assert!(is_overlap(&src, &src.join("nested")));
        assert!(is_overlap(&src.join("nested"), &src));
        assert!(!is_overlap(&src, &tmp.path().join("dst")));
        assert!(!is_overlap(&src, &tmp.path().join("src_copy")));
    }

    #[test]
    fn create_directory_is_idempotent() {
        let tmp = TempDir::new().expect("tempdir");
        let path_dir = tmp.path().join("d");
        assert!(create_directory(&path_dir).expect("first create"));
        assert!(!create_directory(&path_dir).expect("second create"));
    }

    #[test]
    fn create_directory_rejects_existing_file() {
        let tmp = TempDir::new().expect("tempdir");
        let path_file = tmp.path().join("f");
        std::fs::write(&path_file, "x").expect("write file");

        let err = create_directory(&path_file).expect_err("file in the way must fail");
        assert_eq!(err.operation(), Some(EnumCopyOperation::CreateDirectory));
    }

    #[test]
    fn prepare_destination_root_strict_and_merge() {
        let tmp = TempDir::new().expect("tempdir");
        let dst = tmp.path().join("dst");

        assert!(
            prepare_destination_root(&dst, EnumCopyRootConflictStrategy::Error)
                .expect("fresh root")
        );
        assert!(dst.is_dir());

        let err = prepare_destination_root(&dst, EnumCopyRootConflictStrategy::Error)
            .expect_err("existing root must fail in strict mode");
        assert!(matches!(err, CopyTreeError::DestinationExists(_)));

        assert!(
            !prepare_destination_root(&dst, EnumCopyRootConflictStrategy::Merge)
                .expect("merge into existing root")
        );
    }

    #[test]
    fn prepare_destination_root_merge_rejects_file() {
        let tmp = TempDir::new().expect("tempdir");
        let dst = tmp.path().join("dst");
        std::fs::write(&dst, "x").expect("write file");

        let err = prepare_destination_root(&dst, EnumCopyRootConflictStrategy::Merge)
            .expect_err("file root must fail");
        assert_eq!(err.operation(), Some(EnumCopyOperation::CreateDirectory));
    }

    #[test]
    fn prepare_destination_root_missing_parent_fails() {
        let tmp = TempDir::new().expect("tempdir");
        let dst = tmp.path().join("missing/dst");

        let err = prepare_destination_root(&dst, EnumCopyRootConflictStrategy::Error)
            .expect_err("missing parent must fail");
        assert_eq!(err.operation(), Some(EnumCopyOperation::CreateDirectory));
    }
}
