use crate::{Error, Mapping, Result};

/// Immutable descriptor of one mapped file span, plus a use counter.
///
/// `start`/`end` never change after construction; the only mutable state is
/// the mapping's interior cursor (used by the transfer loop to know where
/// the next byte goes) and the saturating `use_count`.
#[derive(Debug)]
pub struct Region {
    start: u64,
    end: u64,
    mapping: Mapping,
    position: usize,
    use_count: u64,
}

impl Region {
    /// Builds a region starting at `start`, owning `mapping`.
    ///
    /// `end` is `start + capacity - 1` for a non-empty mapping; for a
    /// zero-capacity mapping (the OS's stand-in for an empty file) `end`
    /// equals `start` and the region never encompasses anything.
    pub fn new(start: u64, mapping: Mapping) -> Self {
        let capacity = mapping.len() as u64;
        let end = if capacity > 0 {
            start + capacity - 1
        } else {
            start
        };
        Self {
            start,
            end,
            mapping,
            position: 0,
            use_count: 0,
        }
    }

    #[inline]
    pub fn start(&self) -> u64 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> u64 {
        self.end
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.mapping.len()
    }

    #[inline]
    pub fn use_count(&self) -> u64 {
        self.use_count
    }

    /// `true` iff `capacity > 0` and `start <= p <= end`.
    #[inline]
    pub fn encompasses(&self, p: u64) -> bool {
        self.capacity() > 0 && self.start <= p && p <= self.end
    }

    /// `true` iff this region lies strictly before `p` (`end < p`).
    ///
    /// A zero-capacity region has `end == start`, so it only tests as
    /// "before" a position strictly greater than `start` — matching
    /// `encompasses` being false everywhere for such a region.
    #[inline]
    pub fn is_before(&self, p: u64) -> bool {
        self.end < p
    }

    /// `true` iff this region lies strictly after `p` (`start > p`).
    #[inline]
    pub fn is_after(&self, p: u64) -> bool {
        self.start > p
    }

    /// Increments the use counter, saturating at `u64::MAX`.
    #[inline]
    pub fn bump_use_count(&mut self) {
        self.use_count = self.use_count.saturating_add(1);
    }

    /// Bytes left between the interior cursor and the end of the mapping.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.position
    }

    /// Positions the mapping's interior cursor at `offset`.
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.capacity() {
            return Err(Error::RegionOverflow {
                offset: offset as u64,
            });
        }
        self.position = offset;
        Ok(())
    }

    /// Copies `min(remaining, dst.len())` bytes from the interior cursor
    /// into `dst`, advancing the cursor. Returns the number of bytes copied.
    pub fn read_into(&mut self, dst: &mut [u8]) -> usize {
        let n = self.remaining().min(dst.len());
        let src = &self.mapping.as_slice()[self.position..self.position + n];
        dst[..n].copy_from_slice(src);
        self.position += n;
        n
    }

    /// Copies `min(remaining, src.len())` bytes from `src` into the mapping
    /// at the interior cursor, advancing the cursor. Returns the number of
    /// bytes written.
    pub fn write_from(&mut self, src: &[u8]) -> Result<usize> {
        let n = self.remaining().min(src.len());
        let position = self.position;
        let Some(dst) = self.mapping.as_mut_slice() else {
            return Err(Error::InvalidArgument {
                reason: "region is not writable".to_string(),
            });
        };
        dst[position..position + n].copy_from_slice(&src[..n]);
        self.position += n;
        Ok(n)
    }

    /// Requests an OS flush of the region's mapping.
    #[inline]
    pub fn flush(&self) -> Result<()> {
        self.mapping.flush()
    }

    /// Releases the OS mapping, consuming the region.
    #[inline]
    pub fn unmap(self) -> Result<()> {
        self.mapping.unmap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_encompasses() {
        let region = Region::new(10, Mapping::Empty);
        // zero capacity: never encompasses anything, including its own start
        assert!(!region.encompasses(10));

        let mmap = memmap2::MmapMut::map_anon(8).unwrap();
        let region = Region::new(10, Mapping::ReadWrite(mmap));
        assert_eq!(region.start(), 10);
        assert_eq!(region.end(), 17);
        assert!(region.encompasses(10));
        assert!(region.encompasses(17));
        assert!(!region.encompasses(18));
        assert!(!region.encompasses(9));
    }

    #[test]
    fn is_before_is_after_complementary_outside_span() {
        let mmap = memmap2::MmapMut::map_anon(8).unwrap();
        let region = Region::new(10, Mapping::ReadWrite(mmap)); // [10,17]
        assert!(region.is_before(18));
        assert!(!region.is_after(18));
        assert!(region.is_after(9));
        assert!(!region.is_before(9));
    }

    #[test]
    fn zero_capacity_never_before_at_or_before_start() {
        let region = Region::new(10, Mapping::Empty);
        assert!(!region.is_before(10));
        assert!(!region.is_before(9));
        assert!(region.is_before(11));
    }
}
