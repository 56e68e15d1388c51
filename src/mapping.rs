use memmap2::{Mmap, MmapMut};

use crate::{Error, Result};

/// The OS mapping owned by a [`crate::Region`], plus its own interior cursor
/// in `[0, capacity]`.
///
/// `Empty` stands in for the zero-length mapping the OS would otherwise
/// refuse to hand back for an empty file (most platforms reject `mmap` of
/// length 0); it carries no real mapping and is never selected by
/// `Region::encompasses`.
#[derive(Debug)]
pub enum Mapping {
    Empty,
    ReadOnly(Mmap),
    ReadWrite(MmapMut),
}

impl Mapping {
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Mapping::Empty => 0,
            Mapping::ReadOnly(m) => m.len(),
            Mapping::ReadWrite(m) => m.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        match self {
            Mapping::Empty => &[],
            Mapping::ReadOnly(m) => &m[..],
            Mapping::ReadWrite(m) => &m[..],
        }
    }

    /// Returns the writable slice, or `None` if this mapping was opened
    /// read-only (or is the empty placeholder).
    #[inline]
    pub fn as_mut_slice(&mut self) -> Option<&mut [u8]> {
        match self {
            Mapping::Empty | Mapping::ReadOnly(_) => None,
            Mapping::ReadWrite(m) => Some(&mut m[..]),
        }
    }

    /// Requests an OS flush (`msync`) of this mapping.
    pub fn flush(&self) -> Result<()> {
        match self {
            Mapping::Empty | Mapping::ReadOnly(_) => Ok(()),
            Mapping::ReadWrite(m) => m
                .flush()
                .map_err(|e| Error::IoFlushOrUnmap(e.to_string())),
        }
    }

    /// Explicitly releases the OS mapping via the platform's unmap
    /// primitive, rather than relying on a `Drop` finalization pass — a
    /// region is routinely discarded long before the engine itself ends, so
    /// the release must be deterministic here.
    #[cfg(unix)]
    pub fn unmap(self) -> Result<()> {
        let (ptr, len) = match &self {
            Mapping::Empty => return Ok(()),
            Mapping::ReadOnly(m) => (m.as_ptr() as *mut libc::c_void, m.len()),
            Mapping::ReadWrite(m) => (m.as_ptr() as *mut libc::c_void, m.len()),
        };
        // SAFETY: `ptr`/`len` describe exactly the mapping `self` owns; we
        // forget `self` first so its own (memmap2) Drop impl does not also
        // try to munmap the same range.
        std::mem::forget(self);
        let result = unsafe { libc::munmap(ptr, len) };
        if result != 0 {
            return Err(Error::IoFlushOrUnmap(
                std::io::Error::last_os_error().to_string(),
            ));
        }
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn unmap(self) -> Result<()> {
        // memmap2 unmaps on drop on every supported platform; there is no
        // separate non-unix unmap primitive to invoke explicitly.
        drop(self);
        Ok(())
    }
}
