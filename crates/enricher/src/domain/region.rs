#![forbid(unsafe_code)]

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionState {
    Free,
    Committed,
    Reserved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionPurpose {
    /// Backed by a loaded module image.
    Image,
    /// Backed by a mapped file that is not a module.
    Mapped,
    /// Anonymous memory private to the process.
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRegion {
    pub state: RegionState,
    pub size: u64,
    /// Only meaningful for committed regions. `None` when the snapshot does
    /// not say.
    pub purpose: Option<RegionPurpose>,
}

impl MemoryRegion {
    pub const fn free(size: u64) -> Self {
        Self {
            state: RegionState::Free,
            size,
            purpose: None,
        }
    }

    pub const fn reserved(size: u64) -> Self {
        Self {
            state: RegionState::Reserved,
            size,
            purpose: None,
        }
    }

    pub const fn committed(size: u64, purpose: RegionPurpose) -> Self {
        Self {
            state: RegionState::Committed,
            size,
            purpose: Some(purpose),
        }
    }
}
