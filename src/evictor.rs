use log::debug;

use crate::{Error, RegionTable, Result};

/// Picks the least-frequently-used region, flushes it, unmaps it, and
/// removes it from the table.
///
/// Ties are broken toward the highest slot index: initializing the
/// candidate to the last slot means a full-table eviction under strictly
/// sequential forward access removes the last slot, which needs no
/// left-shift afterward.
#[derive(Debug, Clone, Copy)]
pub struct Evictor;

impl Evictor {
    pub fn evict(&self, table: &mut RegionTable) -> Result<()> {
        if table.used() == 0 {
            return Err(Error::InvariantViolation(
                "evict called on an empty region table".to_string(),
            ));
        }

        let mut candidate = table.used() - 1;
        let mut min_count = table.slot(candidate).use_count();
        for i in 0..table.used() - 1 {
            let count = table.slot(i).use_count();
            if count < min_count {
                min_count = count;
                candidate = i;
            }
        }

        debug!(
            "evictor: evicting slot {candidate} (use_count={min_count}, used={})",
            table.used()
        );

        table.slot(candidate).flush()?;
        let region = table.delete(candidate);
        region.unmap()?;
        Ok(())
    }
}
