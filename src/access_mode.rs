/// Access mode fixed at construction; determines whether writes are legal
/// and whether the OS mapping permits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    #[default]
    ReadOnly,
    ReadWrite,
}

impl AccessMode {
    #[inline]
    pub fn is_writable(self) -> bool {
        matches!(self, AccessMode::ReadWrite)
    }
}
