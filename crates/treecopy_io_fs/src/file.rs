//! Single-file content transfer and attribute preservation.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use filetime::{FileTime, set_file_times};
use tracing::debug;

use crate::spec::{CopyTreeError, EnumCopyOperation, SpecCopyOptions};

/// Creation mode for destination files before umask.
#[cfg(unix)]
const MODE_FILE_CREATE: u32 = 0o666;

/// Copy the byte content of one non-directory entry.
///
/// `file_source` is opened through any symlink, so a link to a regular file is
/// copied as that file's content. The destination is created or truncated.
/// When [`SpecCopyOptions::if_preserve_attributes`] is set, the source mode is
/// applied through the open destination handle and the access/modification
/// times by path, both after the content is fully written.
///
/// Returns the number of bytes written.
pub fn copy_file<P, Q>(
    file_source: P,
    file_destination: Q,
    spec_cp_options: &SpecCopyOptions,
) -> Result<u64, CopyTreeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_file_src = file_source.as_ref();
    let path_file_dst = file_destination.as_ref();

    let mut file_src = File::open(path_file_src)
        .map_err(|e| CopyTreeError::io(EnumCopyOperation::OpenSourceFile, path_file_src, e))?;
    let mut file_dst = open_destination_file(path_file_dst).map_err(|e| {
        CopyTreeError::io(EnumCopyOperation::OpenDestinationFile, path_file_dst, e)
    })?;

    let n_bytes = transfer_content(
        &mut file_src,
        &mut file_dst,
        path_file_src,
        path_file_dst,
        spec_cp_options,
    )?;

    if spec_cp_options.if_preserve_attributes {
        apply_attributes(path_file_src, path_file_dst, &file_dst)?;
    }

    debug!(
        src = %path_file_src.display(),
        dst = %path_file_dst.display(),
        n_bytes,
        "copied file"
    );
    Ok(n_bytes)
}

fn open_destination_file(path_file_dst: &Path) -> io::Result<File> {
    let mut open_options = OpenOptions::new();
    open_options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        open_options.mode(MODE_FILE_CREATE);
    }
    open_options.open(path_file_dst)
}

/// Move bytes from `reader` to `writer` in `size_buffer` chunks.
///
/// Each chunk is written in full; a writer that stops accepting bytes fails
/// the transfer. Cancellation is checked before every read.
fn transfer_content<R, W>(
    reader: &mut R,
    writer: &mut W,
    path_file_src: &Path,
    path_file_dst: &Path,
    spec_cp_options: &SpecCopyOptions,
) -> Result<u64, CopyTreeError>
where
    R: Read,
    W: Write,
{
    if spec_cp_options.size_buffer == 0 {
        return Err(CopyTreeError::InvalidOptions(
            "Arg `size_buffer` must be >= 1.".to_string(),
        ));
    }

    let mut buffer = vec![0_u8; spec_cp_options.size_buffer];
    let mut n_bytes_total: u64 = 0;
    loop {
        if spec_cp_options.is_cancelled() {
            return Err(CopyTreeError::Interrupted {
                path: path_file_dst.to_path_buf(),
                if_removed: false,
            });
        }

        let n_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(CopyTreeError::io(
                    EnumCopyOperation::ReadSourceFile,
                    path_file_src,
                    e,
                ));
            }
        };

        writer.write_all(&buffer[..n_read]).map_err(|e| {
            CopyTreeError::io(EnumCopyOperation::WriteDestinationFile, path_file_dst, e)
        })?;
        n_bytes_total += n_read as u64;
    }
    Ok(n_bytes_total)
}

fn apply_attributes(
    path_file_src: &Path,
    path_file_dst: &Path,
    file_dst: &File,
) -> Result<(), CopyTreeError> {
    let stat_src = fs::metadata(path_file_src)
        .map_err(|e| CopyTreeError::io(EnumCopyOperation::GetFileAttributes, path_file_src, e))?;

    file_dst
        .set_permissions(stat_src.permissions())
        .map_err(|e| CopyTreeError::io(EnumCopyOperation::SetFileMode, path_file_dst, e))?;

    let file_time_access = FileTime::from_last_access_time(&stat_src);
    let file_time_modify = FileTime::from_last_modification_time(&stat_src);
    set_file_times(path_file_dst, file_time_access, file_time_modify)
        .map_err(|e| CopyTreeError::io(EnumCopyOperation::SetFileTimes, path_file_dst, e))?;
    Ok(())
}
