/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::error::Result;
use crate::traits::*;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// How a [`FileStore`] opens its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OpenMode {
    /// Open an existing file for reading only; writes, growth and
    /// truncation fail with an I/O error.
    Read,
    /// Open an existing file for reading and writing.
    ReadWrite,
    /// Open a file for reading and writing, creating it if it does not
    /// exist. Existing content is preserved.
    Create,
}

/// An implementation of [`ByteStore`] on a [`File`].
///
/// Reads and writes are positioned: every access seeks the file to the
/// requested offset and then performs a blocking
/// [`read_exact`](Read::read_exact) or [`write_all`](Write::write_all), so
/// the cursor logic never depends on the position of the file handle.
///
/// The length of the file is cached at opening and kept up to date by
/// [`grow_to`](ByteStore::grow_to) and
/// [`truncate_to`](ByteStore::truncate_to); the file is assumed not to be
/// modified by others while the store is alive.
#[derive(Debug)]
pub struct FileStore {
    file: File,
    path: PathBuf,
    mode: OpenMode,
    len: u64,
}

impl FileStore {
    /// Open the file at `path` with the given mode.
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut options = OpenOptions::new();
        options.read(true);
        match mode {
            OpenMode::Read => {}
            OpenMode::ReadWrite => {
                options.write(true);
            }
            OpenMode::Create => {
                options.write(true).create(true);
            }
        }
        let file = options.open(&path)?;
        let len = file.metadata()?.len();
        tracing::debug!(path = %path.display(), ?mode, len, "opened file store");
        Ok(Self {
            file,
            path,
            mode,
            len,
        })
    }

    /// The path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Flush and close the file.
    pub fn close(mut self) -> Result<()> {
        self.file.flush()?;
        if self.mode != OpenMode::Read {
            self.file.sync_all()?;
        }
        Ok(())
    }

    /// Rename the file, keeping it open.
    pub fn rename(&mut self, new_path: impl AsRef<Path>) -> Result<()> {
        let new_path = new_path.as_ref().to_path_buf();
        std::fs::rename(&self.path, &new_path)?;
        tracing::debug!(from = %self.path.display(), to = %new_path.display(), "renamed file store");
        self.path = new_path;
        Ok(())
    }

    /// Close the file and delete it.
    pub fn unlink(self) -> Result<()> {
        let path = self.path.clone();
        drop(self.file);
        std::fs::remove_file(&path)?;
        tracing::debug!(path = %path.display(), "deleted file store");
        Ok(())
    }

    pub fn into_inner(self) -> File {
        self.file
    }
}

impl ByteStore for FileStore {
    #[inline(always)]
    fn len(&self) -> u64 {
        self.len
    }

    fn read_at(&mut self, pos: u64, buf: &mut [u8]) -> Result<()> {
        self.file.seek(SeekFrom::Start(pos))?;
        self.file.read_exact(buf)?;
        Ok(())
    }

    fn write_at(&mut self, pos: u64, buf: &[u8]) -> Result<()> {
        self.file.seek(SeekFrom::Start(pos))?;
        self.file.write_all(buf)?;
        self.len = self.len.max(pos + buf.len() as u64);
        Ok(())
    }

    fn grow_to(&mut self, new_len: u64) -> Result<()> {
        if new_len > self.len {
            // set_len zero-fills the extension
            self.file.set_len(new_len)?;
            self.len = new_len;
        }
        Ok(())
    }

    fn truncate_to(&mut self, new_len: u64) -> Result<()> {
        if new_len < self.len {
            self.file.set_len(new_len)?;
            self.len = new_len;
        }
        Ok(())
    }
}
