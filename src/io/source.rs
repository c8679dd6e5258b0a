use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use parquet::file::reader::{ChunkReader, Length};

use crate::io::pool::MemoryPool;
use crate::Result;

/// Read-only file opened for random access.
///
/// Cheap to clone; clones share the underlying handle. All reads are
/// positional, so clones can be read from concurrently without sharing a
/// cursor.
#[derive(Debug, Clone)]
pub struct RandomAccessFile {
    path: PathBuf,
    file: Arc<File>,
    len: u64,
}

/// Open a file for random-access reading
pub fn open_random_access(path: &Path) -> Result<RandomAccessFile> {
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    log::debug!("opened {} ({} bytes)", path.display(), len);

    Ok(RandomAccessFile {
        path: path.to_path_buf(),
        file: Arc::new(file),
        len,
    })
}

impl RandomAccessFile {
    /// Path the file was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File size in bytes at open time
    pub fn size(&self) -> u64 {
        self.len
    }

    /// Reader over `[start, end)` of the file
    pub fn range(&self, start: u64, end: u64) -> FileRange {
        FileRange {
            file: Arc::clone(&self.file),
            position: start,
            end: end.min(self.len),
        }
    }

    /// Read the whole file into a buffer from `pool`
    pub fn read_all(&self, pool: &MemoryPool) -> Result<Bytes> {
        let mut buffer = pool.allocate(self.len)?;
        let read = self.range(0, self.len).read_to_end(&mut buffer)?;
        if read as u64 != self.len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "{} shrank while reading: expected {} bytes, got {}",
                    self.path.display(),
                    self.len,
                    read
                ),
            )
            .into());
        }
        Ok(Bytes::from(buffer))
    }
}

/// Bounded positional reader over part of a [`RandomAccessFile`]
#[derive(Debug)]
pub struct FileRange {
    file: Arc<File>,
    position: u64,
    end: u64,
}

impl Read for FileRange {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.end.saturating_sub(self.position);
        if remaining == 0 || buf.is_empty() {
            return Ok(0);
        }

        let want = remaining.min(buf.len() as u64) as usize;
        let read = read_at(&self.file, &mut buf[..want], self.position)?;
        self.position += read as u64;
        Ok(read)
    }
}

#[cfg(unix)]
fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    use std::os::unix::fs::FileExt;
    file.read_at(buf, offset)
}

#[cfg(windows)]
fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    use std::os::windows::fs::FileExt;
    file.seek_read(buf, offset)
}

impl Length for RandomAccessFile {
    fn len(&self) -> u64 {
        self.len
    }
}

impl ChunkReader for RandomAccessFile {
    type T = FileRange;

    fn get_read(&self, start: u64) -> parquet::errors::Result<Self::T> {
        Ok(self.range(start, self.len))
    }

    fn get_bytes(&self, start: u64, length: usize) -> parquet::errors::Result<Bytes> {
        let mut buffer = vec![0; length];
        self.range(start, start.saturating_add(length as u64))
            .read_exact(&mut buffer)?;
        Ok(Bytes::from(buffer))
    }
}
