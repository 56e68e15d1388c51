use std::fs::File;

use memmap2::MmapOptions;

use crate::{AccessMode, Error, Mapping, Result};

/// An opaque, externally-owned reference to a randomly-addressable byte
/// sequence with known length.
///
/// `pagedfile` borrows the handle for its lifetime; it never manages the
/// handle's lifetime, and extending the file (in read-write mode) is the
/// handle's own responsibility during `map`.
pub trait FileHandle {
    /// Current length of the underlying byte sequence, in bytes.
    fn len(&self) -> Result<u64>;

    /// Returns `true` if the underlying byte sequence is currently empty.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Returns an OS memory mapping of `[offset, offset + length)` in the
    /// given access mode. In read-write mode, implementations that back a
    /// growable file extend it to cover the requested span first.
    fn map(&self, offset: u64, length: usize, mode: AccessMode) -> Result<Mapping>;
}

impl FileHandle for File {
    fn len(&self) -> Result<u64> {
        Ok(self.metadata().map_err(Error::IoSize)?.len())
    }

    fn map(&self, offset: u64, length: usize, mode: AccessMode) -> Result<Mapping> {
        if length == 0 {
            return Ok(Mapping::Empty);
        }

        match mode {
            AccessMode::ReadOnly => {
                let mmap = unsafe {
                    MmapOptions::new()
                        .offset(offset)
                        .len(length)
                        .map(self)
                        .map_err(Error::IoMap)?
                };
                Ok(Mapping::ReadOnly(mmap))
            }
            AccessMode::ReadWrite => {
                let required = offset.checked_add(length as u64).ok_or_else(|| {
                    Error::InvalidArgument {
                        reason: format!("offset {offset} + length {length} overflows u64"),
                    }
                })?;
                let current_len = FileHandle::len(self)?;
                if current_len < required {
                    self.set_len(required).map_err(Error::IoMap)?;
                }
                let mmap = unsafe {
                    MmapOptions::new()
                        .offset(offset)
                        .len(length)
                        .map_mut(self)
                        .map_err(Error::IoMap)?
                };
                Ok(Mapping::ReadWrite(mmap))
            }
        }
    }
}
