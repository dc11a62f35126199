//! Temporary storage for chunks of the out-of-core pipeline.
//!
//! A [`ChunkStore`] scopes all chunk files to one `tmp.*` directory created
//! inside the caller's work dir, so the final promotion is a same-filesystem
//! rename and dropping the store reclaims every unconsumed chunk on success
//! and failure paths alike.

use crate::error::{MergeError, Result};
use crate::interval::Interval;
use crate::text::{parse_intervals, write_intervals};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile, TempDir};

/// Owner of the ephemeral directory backing one pipeline run.
pub struct ChunkStore {
    dir: TempDir,
}

impl ChunkStore {
    /// Create the scoped temp directory under `work_dir`.
    pub fn open_in<P: AsRef<Path>>(work_dir: P) -> Result<Self> {
        let dir = Builder::new().prefix("tmp.").tempdir_in(work_dir)?;
        Ok(Self { dir })
    }

    /// Persist a merged sequence as a new chunk file.
    pub fn create_chunk(&self, intervals: &[Interval]) -> Result<Chunk> {
        let mut file = Builder::new().tempfile_in(self.dir.path())?;
        write_intervals(file.as_file_mut(), intervals)?;
        Ok(Chunk { file })
    }

    /// Reclaim the scoped directory, downgrading a failure to a warning.
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            eprintln!(
                "warning: failed to clean up temp directory {}: {}",
                path.display(),
                e
            );
        }
    }
}

/// One chunk of serialized, already-merged intervals on disk.
///
/// The backing file is removed when the chunk is dropped, unless it is
/// promoted into the result artifact first.
#[derive(Debug)]
pub struct Chunk {
    file: NamedTempFile,
}

impl Chunk {
    /// Read the chunk's full content back as intervals.
    pub fn read_intervals(&mut self) -> Result<Vec<Interval>> {
        let file = self.file.as_file_mut();
        file.seek(SeekFrom::Start(0))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        parse_intervals(&data)
    }

    /// Replace the chunk's content with a freshly merged sequence.
    pub fn overwrite(&mut self, intervals: &[Interval]) -> Result<()> {
        let file = self.file.as_file_mut();
        file.seek(SeekFrom::Start(0))?;
        write_intervals(file, intervals)?;
        // The new serialization can be shorter than what it replaces.
        let end = file.stream_position()?;
        file.set_len(end)?;
        Ok(())
    }

    /// Append `other`'s serialized content after a single space separator.
    pub fn append_from(&mut self, other: &mut Chunk) -> Result<()> {
        other.file.as_file_mut().seek(SeekFrom::Start(0))?;
        let dst = self.file.as_file_mut();
        dst.seek(SeekFrom::End(0))?;
        dst.write_all(b" ")?;
        io::copy(other.file.as_file_mut(), dst)?;
        Ok(())
    }

    /// Turn the chunk into the durable result artifact at `dest`: append the
    /// trailing newline and rename the file out of the scoped directory.
    pub fn promote(mut self, dest: &Path) -> Result<PathBuf> {
        let file = self.file.as_file_mut();
        file.seek(SeekFrom::End(0))?;
        file.write_all(b"\n")?;
        self.file
            .persist(dest)
            .map_err(|e| MergeError::Io(e.error))?;
        Ok(dest.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn iv(x: i64, y: i64) -> Interval {
        Interval::new(x, y)
    }

    #[test]
    fn test_create_and_read_back() {
        let work = tempfile::tempdir().unwrap();
        let store = ChunkStore::open_in(work.path()).unwrap();

        let mut chunk = store.create_chunk(&[iv(1, 2), iv(4, 6)]).unwrap();
        assert_eq!(chunk.read_intervals().unwrap(), vec![iv(1, 2), iv(4, 6)]);
    }

    #[test]
    fn test_overwrite_truncates_stale_bytes() {
        let work = tempfile::tempdir().unwrap();
        let store = ChunkStore::open_in(work.path()).unwrap();

        // "[1,2] [5,6]" is longer than "[1,6]"; nothing of it may survive.
        let mut chunk = store.create_chunk(&[iv(1, 2), iv(5, 6)]).unwrap();
        chunk.overwrite(&[iv(1, 6)]).unwrap();
        assert_eq!(chunk.read_intervals().unwrap(), vec![iv(1, 6)]);
    }

    #[test]
    fn test_append_adds_separator() {
        let work = tempfile::tempdir().unwrap();
        let store = ChunkStore::open_in(work.path()).unwrap();

        let mut a = store.create_chunk(&[iv(1, 2)]).unwrap();
        let mut b = store.create_chunk(&[iv(5, 6)]).unwrap();
        a.append_from(&mut b).unwrap();

        assert_eq!(a.read_intervals().unwrap(), vec![iv(1, 2), iv(5, 6)]);
    }

    #[test]
    fn test_promote_writes_newline_and_moves_file() {
        let work = tempfile::tempdir().unwrap();
        let store = ChunkStore::open_in(work.path()).unwrap();
        let dest = work.path().join("result.txt");

        let chunk = store.create_chunk(&[iv(2, 23), iv(25, 30)]).unwrap();
        let path = chunk.promote(&dest).unwrap();

        assert_eq!(path, dest);
        assert_eq!(fs::read_to_string(&dest).unwrap(), "[2,23] [25,30]\n");
    }

    #[test]
    fn test_dropping_store_removes_directory() {
        let work = tempfile::tempdir().unwrap();
        let store = ChunkStore::open_in(work.path()).unwrap();
        let _chunk = store.create_chunk(&[iv(1, 2)]).unwrap();

        let entries = fs::read_dir(work.path()).unwrap().count();
        assert_eq!(entries, 1);

        drop(_chunk);
        drop(store);
        assert_eq!(fs::read_dir(work.path()).unwrap().count(), 0);
    }
}
