use log::debug;

use crate::{AccessMode, Evictor, FileHandle, Region, RegionTable, Result, size_calculator};

/// Wraps the OS `map` call; decides the size of a new region and installs
/// it in the table, evicting first if the table is full.
#[derive(Debug)]
pub struct Mapper {
    min_buffer_size: u64,
    max_buffer_size: u64,
}

impl Mapper {
    pub fn new(min_buffer_size: u64, max_buffer_size: u64) -> Self {
        Self {
            min_buffer_size,
            max_buffer_size,
        }
    }

    /// Maps a new region covering `p` and inserts it into `table`, returning
    /// the slot it landed in.
    pub fn map_region<F: FileHandle>(
        &self,
        file: &F,
        table: &mut RegionTable,
        access_mode: AccessMode,
        p: u64,
    ) -> Result<usize> {
        if table.is_full() {
            Evictor.evict(table)?;
        }

        // The available span guarantees the new region will not overlap its
        // successor.
        let span = match table.closest_after(p) {
            Some(after) => table.slot(after).start().saturating_sub(p),
            None => self.max_buffer_size,
        };
        let mut size = size_calculator::clamp(span, self.min_buffer_size, self.max_buffer_size);

        // A read-only mapping can never reach past EOF; a read-write one may,
        // since `FileHandle::map` extends the file to fit.
        if !access_mode.is_writable() {
            let file_len = file.len()?;
            let available = file_len.saturating_sub(p);
            size = size.min(available);
        }

        debug!("mapper: mapping {size} bytes at offset {p}");
        let mapping = file.map(p, size as usize, access_mode)?;
        let region = Region::new(p, mapping);
        Ok(table.insert(region))
    }
}
