//! File subsystem: owns the stream handle table.
//!
//! Streams are host files opened through [`FileSubsystem::open_create`] and
//! addressed afterwards only by their [`ObjectId`].

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::{debug, error};

use crate::error::{OsalError, OsalResult};
use crate::handle_table::{HandleTable, ObjectId, ObjectType};

/// How a stream may be accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Reads only.
    ReadOnly,
    /// Writes only.
    WriteOnly,
    /// Reads and writes.
    ReadWrite,
}

/// Flags controlling how a stream is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenFlags {
    /// Create the file if it does not exist.
    pub create: bool,
    /// Truncate an existing file to zero length.
    pub truncate: bool,
    /// Position every write at the end of the file.
    pub append: bool,
}

/// Reference point for [`FileSubsystem::lseek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekWhence {
    /// From the start of the file.
    Set,
    /// From the current position.
    Current,
    /// From the end of the file.
    End,
}

struct FileRecord {
    path: PathBuf,
    handle: File,
}

/// Table of open streams plus the limits that apply to them.
pub struct FileSubsystem {
    table: Mutex<HandleTable<FileRecord>>,
    max_path_len: usize,
}

impl FileSubsystem {
    /// Creates a subsystem with room for `max_open_files` streams.
    ///
    /// # Errors
    ///
    /// Returns `OsalError::Error` if `max_open_files` is not a usable table size.
    pub fn new(max_open_files: usize, max_path_len: usize) -> OsalResult<Self> {
        let table = HandleTable::with_capacity(ObjectType::Stream, max_open_files)?;
        Ok(Self { table: Mutex::new(table), max_path_len })
    }

    /// Opens (and optionally creates) a host file and registers it as a stream.
    ///
    /// # Errors
    ///
    /// - `PathInvalid` if the path is empty or contains NUL.
    /// - `PathTooLong` if the path is at least `max_path_len` bytes.
    /// - `File` if the host open fails.
    /// - `NoFreeIds` if the stream table is full.
    pub fn open_create(
        &self,
        path: &Path,
        flags: OpenFlags,
        access: AccessMode,
    ) -> OsalResult<ObjectId> {
        self.check_path(path)?;

        let mut options = OpenOptions::new();
        match access {
            AccessMode::ReadOnly => options.read(true),
            AccessMode::WriteOnly => options.write(true),
            AccessMode::ReadWrite => options.read(true).write(true),
        };
        options.create(flags.create).truncate(flags.truncate).append(flags.append);

        let handle = options.open(path).map_err(|e| {
            debug!("open {} failed: {e}", path.display());
            OsalError::File
        })?;

        let id = self.lock()?.allocate(FileRecord { path: path.to_path_buf(), handle })?;
        debug!("opened {} as stream {id}", path.display());
        Ok(id)
    }

    /// Closes a stream and releases its slot.
    ///
    /// # Errors
    ///
    /// Returns `InvalidId` if the id is not an open stream.
    pub fn close(&self, id: ObjectId) -> OsalResult<()> {
        let record = self.lock()?.release(id)?;
        debug!("closed stream {id} ({})", record.path.display());
        Ok(())
    }

    /// Reads up to `buf.len()` bytes from the stream.
    ///
    /// # Errors
    ///
    /// Returns `InvalidId` for an unknown stream or `File` if the host read fails.
    pub fn read(&self, id: ObjectId, buf: &mut [u8]) -> OsalResult<usize> {
        self.with_file(id, |file| file.read(buf).map_err(|_| OsalError::File))
    }

    /// Writes `data` to the stream and returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns `InvalidId` for an unknown stream or `File` if the host write fails.
    pub fn write(&self, id: ObjectId, data: &[u8]) -> OsalResult<usize> {
        self.with_file(id, |file| file.write(data).map_err(|_| OsalError::File))
    }

    /// Moves the stream position and returns the new offset from the start.
    ///
    /// # Errors
    ///
    /// Returns `InvalidId` for an unknown stream or `File` if the host seek fails.
    pub fn lseek(&self, id: ObjectId, offset: i64, whence: SeekWhence) -> OsalResult<u64> {
        let pos = match whence {
            SeekWhence::Set => SeekFrom::Start(u64::try_from(offset).map_err(|_| OsalError::File)?),
            SeekWhence::Current => SeekFrom::Current(offset),
            SeekWhence::End => SeekFrom::End(offset),
        };
        self.with_file(id, |file| file.seek(pos).map_err(|_| OsalError::File))
    }

    /// Returns the path the stream was opened with.
    ///
    /// # Errors
    ///
    /// Returns `InvalidId` if the id is not an open stream.
    pub fn path_of(&self, id: ObjectId) -> OsalResult<PathBuf> {
        Ok(self.lock()?.get(id)?.path.clone())
    }

    /// Runs `f` on the host file behind `id` while the table is locked.
    ///
    /// # Errors
    ///
    /// Returns `InvalidId` if the id is not an open stream, or whatever `f` returns.
    pub fn with_file<R>(
        &self,
        id: ObjectId,
        f: impl FnOnce(&mut File) -> OsalResult<R>,
    ) -> OsalResult<R> {
        let mut table = self.lock()?;
        let record = table.get_mut(id)?;
        f(&mut record.handle)
    }

    /// Returns a second host handle sharing the stream's open file description.
    ///
    /// The offset is shared, so output written through the duplicate lands
    /// at the stream's current position.
    ///
    /// # Errors
    ///
    /// Returns `InvalidId` for an unknown stream or `File` if the host dup fails.
    pub fn duplicate(&self, id: ObjectId) -> OsalResult<File> {
        self.with_file(id, |file| file.try_clone().map_err(|_| OsalError::File))
    }

    /// Ids of all open streams.
    ///
    /// # Errors
    ///
    /// Returns `OsalError::Error` if the table lock is poisoned.
    pub fn open_ids(&self) -> OsalResult<Vec<ObjectId>> {
        Ok(self.lock()?.ids())
    }

    fn check_path(&self, path: &Path) -> OsalResult<()> {
        let raw = path.as_os_str();
        if raw.is_empty() || raw.as_encoded_bytes().contains(&0) {
            return Err(OsalError::PathInvalid);
        }
        if raw.len() >= self.max_path_len {
            return Err(OsalError::PathTooLong);
        }
        Ok(())
    }

    fn lock(&self) -> OsalResult<MutexGuard<'_, HandleTable<FileRecord>>> {
        self.table.lock().map_err(|e| {
            error!("stream table lock poisoned: {e}");
            OsalError::Error
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("osal_file_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn create_flags() -> OpenFlags {
        OpenFlags { create: true, truncate: true, append: false }
    }

    #[test]
    fn write_seek_read_round_trip() {
        let dir = scratch_dir("rw");
        let files = FileSubsystem::new(4, 4096).unwrap();
        let id = files
            .open_create(&dir.join("data.txt"), create_flags(), AccessMode::ReadWrite)
            .unwrap();

        assert_eq!(files.write(id, b"hello").unwrap(), 5);
        assert_eq!(files.lseek(id, 0, SeekWhence::Set).unwrap(), 0);
        let mut buf = [0u8; 16];
        let n = files.read(id, &mut buf).unwrap();
        assert_eq!(&buf[..n], b"hello");
        assert_eq!(files.lseek(id, 0, SeekWhence::End).unwrap(), 5);

        files.close(id).unwrap();
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn closed_stream_is_invalid() {
        let dir = scratch_dir("closed");
        let files = FileSubsystem::new(4, 4096).unwrap();
        let id = files
            .open_create(&dir.join("a.txt"), create_flags(), AccessMode::WriteOnly)
            .unwrap();

        files.close(id).unwrap();
        assert_eq!(files.close(id), Err(OsalError::InvalidId));
        assert_eq!(files.write(id, b"x"), Err(OsalError::InvalidId));
        assert_eq!(files.path_of(id), Err(OsalError::InvalidId));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn path_limits_are_enforced() {
        let files = FileSubsystem::new(4, 16).unwrap();
        assert_eq!(
            files.open_create(Path::new(""), create_flags(), AccessMode::WriteOnly),
            Err(OsalError::PathInvalid)
        );
        assert_eq!(
            files.open_create(
                Path::new("/tmp/a/very/long/path/name.txt"),
                create_flags(),
                AccessMode::WriteOnly
            ),
            Err(OsalError::PathTooLong)
        );
    }

    #[test]
    fn missing_file_without_create_is_a_file_error() {
        let dir = scratch_dir("missing");
        let files = FileSubsystem::new(4, 4096).unwrap();
        let result =
            files.open_create(&dir.join("nope.txt"), OpenFlags::default(), AccessMode::ReadOnly);
        assert_eq!(result, Err(OsalError::File));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn table_exhaustion_reports_no_free_ids() {
        let dir = scratch_dir("full");
        let files = FileSubsystem::new(1, 4096).unwrap();
        let first = files
            .open_create(&dir.join("1.txt"), create_flags(), AccessMode::WriteOnly)
            .unwrap();
        assert_eq!(
            files.open_create(&dir.join("2.txt"), create_flags(), AccessMode::WriteOnly),
            Err(OsalError::NoFreeIds)
        );
        assert_eq!(files.open_ids().unwrap(), vec![first]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn duplicate_shares_offset() {
        let dir = scratch_dir("dup");
        let files = FileSubsystem::new(4, 4096).unwrap();
        let id = files
            .open_create(&dir.join("d.txt"), create_flags(), AccessMode::ReadWrite)
            .unwrap();

        files.write(id, b"abc").unwrap();
        let mut dup = files.duplicate(id).unwrap();
        dup.write_all(b"def").unwrap();
        assert_eq!(files.lseek(id, 0, SeekWhence::Current).unwrap(), 6);

        files.close(id).unwrap();
        assert_eq!(std::fs::read_to_string(dir.join("d.txt")).unwrap(), "abcdef");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
