use crate::{AccessMode, Error, FileHandle, PagedFile, Result};

/// One mebibyte.
const MIB: u64 = 1024 * 1024;

const DEFAULT_MIN_BUFFER_SIZE: u64 = 64 * MIB;
const DEFAULT_MAX_BUFFER_SIZE: u64 = 512 * MIB;
const DEFAULT_MAX_REGIONS: usize = 16;

/// Fluent construction object for [`PagedFile`].
///
/// This is a thin external collaborator: it only validates and assembles
/// construction parameters before handing them to the engine, and never
/// duplicates the region cache or mapping logic itself.
#[derive(Debug)]
pub struct PagedFileBuilder<F: FileHandle> {
    file: F,
    access_mode: AccessMode,
    min_buffer_size: u64,
    max_buffer_size: u64,
    max_regions: usize,
    initial_position: i64,
}

impl<F: FileHandle> PagedFileBuilder<F> {
    pub fn new(file: F) -> Self {
        Self {
            file,
            access_mode: AccessMode::ReadOnly,
            min_buffer_size: DEFAULT_MIN_BUFFER_SIZE,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
            max_regions: DEFAULT_MAX_REGIONS,
            initial_position: 0,
        }
    }

    #[inline]
    pub fn access_mode(mut self, access_mode: AccessMode) -> Self {
        self.access_mode = access_mode;
        self
    }

    #[inline]
    pub fn min_buffer_size(mut self, min_buffer_size: u64) -> Self {
        self.min_buffer_size = min_buffer_size;
        self
    }

    #[inline]
    pub fn max_buffer_size(mut self, max_buffer_size: u64) -> Self {
        self.max_buffer_size = max_buffer_size;
        self
    }

    #[inline]
    pub fn max_regions(mut self, max_regions: usize) -> Self {
        self.max_regions = max_regions;
        self
    }

    #[inline]
    pub fn initial_position(mut self, initial_position: i64) -> Self {
        self.initial_position = initial_position;
        self
    }

    /// Validates parameters and eagerly maps the first region.
    pub fn build(self) -> Result<PagedFile<F>> {
        if self.initial_position < 0 {
            return Err(Error::InvalidArgument {
                reason: format!(
                    "initial_position {} must be non-negative",
                    self.initial_position
                ),
            });
        }
        if self.max_regions == 0 {
            return Err(Error::InvalidArgument {
                reason: "max_regions must be at least 1".to_string(),
            });
        }
        if self.min_buffer_size == 0 {
            return Err(Error::InvalidArgument {
                reason: "min_buffer_size must be at least 1".to_string(),
            });
        }
        if self.min_buffer_size > self.max_buffer_size {
            return Err(Error::InvalidArgument {
                reason: format!(
                    "min_buffer_size {} exceeds max_buffer_size {}",
                    self.min_buffer_size, self.max_buffer_size
                ),
            });
        }

        PagedFile::open(
            self.file,
            self.access_mode,
            self.min_buffer_size,
            self.max_buffer_size,
            self.max_regions,
            self.initial_position as u64,
        )
    }
}
