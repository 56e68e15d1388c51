use log::trace;

use crate::Region;

/// Fixed-capacity ordered sequence of up to `max_regions` regions, always
/// sorted strictly ascending by `start`.
///
/// `used` gives the prefix length of live slots; `active` identifies the
/// slot last touched by a transfer, used as the starting point for
/// lookups. Slots at index `>= used` are unoccupied.
#[derive(Debug)]
pub struct RegionTable {
    slots: Vec<Option<Region>>,
    used: usize,
    active: usize,
}

impl RegionTable {
    pub fn new(max_regions: usize) -> Self {
        let mut slots = Vec::with_capacity(max_regions);
        slots.resize_with(max_regions, || None);
        Self {
            slots,
            used: 0,
            active: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn used(&self) -> usize {
        self.used
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.used == self.capacity()
    }

    #[inline]
    pub fn active(&self) -> usize {
        self.active
    }

    #[inline]
    pub fn set_active(&mut self, index: usize) {
        debug_assert!(index < self.used.max(1));
        self.active = index;
    }

    #[inline]
    pub fn slot(&self, index: usize) -> &Region {
        self.slots[index].as_ref().expect("slot must be occupied")
    }

    #[inline]
    pub fn slot_mut(&mut self, index: usize) -> &mut Region {
        self.slots[index].as_mut().expect("slot must be occupied")
    }

    /// Returns the slot whose region encompasses `p`, checking `active`
    /// first (the common case under sequential access) before falling back
    /// to a full scan.
    pub fn find_covering(&self, p: u64) -> Option<usize> {
        if self.used == 0 {
            return None;
        }
        if self.slots[self.active]
            .as_ref()
            .is_some_and(|r| r.encompasses(p))
        {
            return Some(self.active);
        }
        (0..self.used).find(|&i| self.slot(i).encompasses(p))
    }

    /// The highest-indexed slot `i` with `regions[i].is_before(p)`, or
    /// `None` if no such slot exists.
    pub fn closest_before(&self, p: u64) -> Option<usize> {
        (0..self.used).rev().find(|&i| self.slot(i).is_before(p))
    }

    /// The lowest-indexed slot `i` with `regions[i].is_after(p)`, or `None`
    /// if no such slot exists.
    pub fn closest_after(&self, p: u64) -> Option<usize> {
        (0..self.used).find(|&i| self.slot(i).is_after(p))
    }

    /// Inserts `region` (not covering any existing region) at
    /// `closest_before(region.start()) + 1`, shifting later slots right by
    /// one. Returns the slot the region landed in.
    ///
    /// # Panics
    /// Panics if the table is already full; callers must evict first.
    pub fn insert(&mut self, region: Region) -> usize {
        assert!(!self.is_full(), "RegionTable::insert called on a full table");

        let start = region.start();
        let insert_at = self.closest_before(start).map(|i| i + 1).unwrap_or(0);

        trace!("region_table: inserting start={start} at slot {insert_at}");

        for i in (insert_at..self.used).rev() {
            self.slots[i + 1] = self.slots[i].take();
        }
        self.slots[insert_at] = Some(region);
        self.used += 1;
        insert_at
    }

    /// Removes the region at slot `e`, shifting slots `e+1..used` left by
    /// one and decrementing `used`. Returns the removed region.
    pub fn delete(&mut self, e: usize) -> Region {
        let region = self.slots[e].take().expect("slot must be occupied");

        for i in e..self.used - 1 {
            self.slots[i] = self.slots[i + 1].take();
        }
        self.used -= 1;

        if self.active == e {
            self.active = e.saturating_sub(1);
        } else if self.active > e {
            self.active -= 1;
        }

        trace!("region_table: deleted slot {e}, used={}, active={}", self.used, self.active);
        region
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mapping;

    fn region(start: u64, len: usize) -> Region {
        let mmap = memmap2::MmapMut::map_anon(len.max(1)).unwrap();
        Region::new(start, Mapping::ReadWrite(mmap))
    }

    #[test]
    fn insert_keeps_ascending_order() {
        let mut table = RegionTable::new(4);
        table.insert(region(16, 8));
        table.insert(region(0, 8));
        table.insert(region(8, 8));

        assert_eq!(table.used(), 3);
        assert_eq!(table.slot(0).start(), 0);
        assert_eq!(table.slot(1).start(), 8);
        assert_eq!(table.slot(2).start(), 16);
    }

    #[test]
    fn delete_shifts_left_and_decrements_used() {
        let mut table = RegionTable::new(4);
        table.insert(region(0, 8));
        table.insert(region(8, 8));
        table.insert(region(16, 8));

        table.delete(1);
        assert_eq!(table.used(), 2);
        assert_eq!(table.slot(0).start(), 0);
        assert_eq!(table.slot(1).start(), 16);
    }

    #[test]
    fn delete_adjusts_active_when_active_equals_e() {
        let mut table = RegionTable::new(4);
        table.insert(region(0, 8));
        table.insert(region(8, 8));
        table.insert(region(16, 8));
        table.set_active(2);

        table.delete(2);
        assert_eq!(table.active(), 1);
    }

    #[test]
    fn closest_before_and_after() {
        let mut table = RegionTable::new(4);
        table.insert(region(0, 8)); // [0,7]
        table.insert(region(16, 8)); // [16,23]

        assert_eq!(table.closest_before(10), Some(0));
        assert_eq!(table.closest_after(10), Some(1));
        assert_eq!(table.closest_before(0), None);
        assert_eq!(table.closest_after(23), None);
    }

    #[test]
    fn find_covering_none_when_no_region_matches() {
        let mut table = RegionTable::new(4);
        table.insert(region(0, 8));
        assert_eq!(table.find_covering(100), None);
    }
}
