use log::{debug, trace};

use crate::{
    AccessMode, Error, FileHandle, Mapper, RegionTable, Result, size_calculator,
};

/// Sequential/random-access byte interface over a host file that behaves as
/// if the file were one contiguous buffer of unbounded size, while only a
/// bounded set of memory-mapped regions is kept resident.
///
/// Single-caller: every mutating operation takes `&mut self`; there is no
/// internal locking and no atomic cursor.
#[derive(Debug)]
pub struct PagedFile<F: FileHandle> {
    file: F,
    access_mode: AccessMode,
    table: RegionTable,
    mapper: Mapper,
    fc_position: u64,
    next_fc_position: u64,
}

impl<F: FileHandle> PagedFile<F> {
    pub(crate) fn open(
        file: F,
        access_mode: AccessMode,
        min_buffer_size: u64,
        max_buffer_size: u64,
        max_regions: usize,
        initial_position: u64,
    ) -> Result<Self> {
        let mut table = RegionTable::new(max_regions);
        let mapper = Mapper::new(min_buffer_size, max_buffer_size);

        let file_len = file.len()?;
        let size = size_calculator::clamp(file_len, min_buffer_size, max_buffer_size);
        // A read-only mapping must never reach past EOF (the handle can't
        // extend the file to cover it); a read-write mapping may, since
        // `FileHandle::map` extends the file to fit.
        let size = if access_mode.is_writable() {
            size
        } else {
            let available = file_len.saturating_sub(initial_position);
            size.min(available)
        };
        let mapping = file.map(initial_position, size as usize, access_mode)?;
        let region = crate::Region::new(initial_position, mapping);
        let slot = table.insert(region);
        table.set_active(slot);

        debug!(
            "pagedfile: opened at position {initial_position} with initial region of {size} bytes"
        );

        Ok(Self {
            file,
            access_mode,
            table,
            mapper,
            fc_position: initial_position,
            next_fc_position: initial_position,
        })
    }

    /// The position the next transfer will start at.
    #[inline]
    pub fn position(&self) -> u64 {
        self.next_fc_position
    }

    /// Sets the pending cursor position. No mapping occurs until the next
    /// transfer.
    pub fn set_position(&mut self, p: i64) -> Result<()> {
        if p < 0 {
            return Err(Error::InvalidArgument {
                reason: format!("position {p} must be non-negative"),
            });
        }
        self.next_fc_position = p as u64;
        Ok(())
    }

    /// Current number of live regions.
    #[inline]
    pub fn region_count(&self) -> usize {
        self.table.used()
    }

    /// `[start, end]` of the currently active region.
    pub fn active_region_span(&self) -> (u64, u64) {
        let region = self.table.slot(self.table.active());
        (region.start(), region.end())
    }

    /// Slot index of the region last touched by a transfer.
    #[inline]
    pub fn active_index(&self) -> usize {
        self.table.active()
    }

    /// `[start, end]` of the region currently occupying `slot`.
    pub fn region_span_at(&self, slot: usize) -> (u64, u64) {
        let region = self.table.slot(slot);
        (region.start(), region.end())
    }

    /// Transfers `length` bytes starting at the current position into
    /// `dst[offset..offset+length]`.
    pub fn get(&mut self, dst: &mut [u8], offset: usize, length: usize) -> Result<()> {
        let dst_len = dst.len();
        let end = offset.checked_add(length).ok_or_else(|| Error::InvalidArgument {
            reason: format!("offset {offset} + length {length} overflows"),
        })?;
        if end > dst_len {
            return Err(Error::InvalidArgument {
                reason: format!(
                    "offset {offset} + length {length} exceeds destination length {dst_len}"
                ),
            });
        }

        let file_len = self.file.len()?;
        let available = file_len.saturating_sub(self.next_fc_position);
        if length as u64 > available {
            return Err(Error::Underflow {
                requested: length as u64,
                available,
            });
        }

        // A zero-length transfer still commits the cursor: `fc_position`
        // must equal `next_fc_position` after every successful `get`, even
        // one that moves no bytes (the loop below never runs for it).
        self.fc_position = self.next_fc_position;

        let mut remaining = length;
        let mut dst_offset = offset;
        while remaining > 0 {
            let p = self.next_fc_position;
            let slot = self.locate(p)?;

            self.fc_position = p;
            self.table.set_active(slot);

            let region = self.table.slot_mut(slot);
            let region_offset = p.checked_sub(region.start()).ok_or(Error::RegionOverflow {
                offset: p,
            })?;
            let region_offset = usize::try_from(region_offset).map_err(|_| Error::RegionOverflow {
                offset: region_offset,
            })?;
            region.seek(region_offset)?;

            let chunk_len = region.remaining().min(remaining);
            if chunk_len == 0 {
                return Err(Error::InvariantViolation(
                    "mapped region has zero remaining capacity".to_string(),
                ));
            }
            let copied = region.read_into(&mut dst[dst_offset..dst_offset + chunk_len]);
            region.bump_use_count();

            self.fc_position += copied as u64;
            self.next_fc_position += copied as u64;
            dst_offset += copied;
            remaining -= copied;
        }

        Ok(())
    }

    /// `get(dst, 0, dst.len())`.
    #[inline]
    pub fn get_all(&mut self, dst: &mut [u8]) -> Result<()> {
        let len = dst.len();
        self.get(dst, 0, len)
    }

    /// Writes `byte` at the current position (write mode only) and advances
    /// the cursor by one, matching `get`'s cursor semantics.
    pub fn put(&mut self, byte: u8) -> Result<()> {
        if !self.access_mode.is_writable() {
            return Err(Error::InvalidArgument {
                reason: "put requires read-write access mode".to_string(),
            });
        }

        let p = self.next_fc_position;
        let slot = self.locate(p)?;

        self.fc_position = p;
        self.table.set_active(slot);

        let region = self.table.slot_mut(slot);
        let region_offset = p.checked_sub(region.start()).ok_or(Error::RegionOverflow {
            offset: p,
        })?;
        let region_offset = usize::try_from(region_offset).map_err(|_| Error::RegionOverflow {
            offset: region_offset,
        })?;
        region.seek(region_offset)?;

        let buf = [byte];
        let written = region.write_from(&buf)?;
        region.bump_use_count();
        if written == 0 {
            return Err(Error::InvariantViolation(
                "mapped region has zero remaining capacity".to_string(),
            ));
        }

        self.fc_position += written as u64;
        self.next_fc_position += written as u64;

        Ok(())
    }

    /// Finds (or maps) the slot covering `p`.
    fn locate(&mut self, p: u64) -> Result<usize> {
        if let Some(slot) = self.table.find_covering(p) {
            trace!("pagedfile: position {p} covered by existing slot {slot}");
            return Ok(slot);
        }
        self.mapper
            .map_region(&self.file, &mut self.table, self.access_mode, p)
    }

    /// Drains the table in descending slot order, flushing then unmapping
    /// each region. Aggregates any failures into a single error; the
    /// instance is unusable after this call (it is consumed).
    pub fn close(mut self) -> Result<()> {
        let mut errors = Vec::new();

        while self.table.used() > 0 {
            let last = self.table.used() - 1;
            if let Err(e) = self.table.slot(last).flush() {
                errors.push(e.to_string());
            }
            let region = self.table.delete(last);
            if let Err(e) = region.unmap() {
                errors.push(e.to_string());
            }
        }

        debug!("pagedfile: closed ({} error(s))", errors.len());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::IoFlushOrUnmap(errors.join("; ")))
        }
    }
}
