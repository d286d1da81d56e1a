//! Memory access classification.

/// The kind of memory access being translated or performed.
///
/// Address-error and TLB faults carry different cause codes depending on
/// whether the access was a fetch/load or a store, so translation paths
/// thread this through to fault construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Instruction fetch (faults report on the load side).
    Fetch,
    /// Data load.
    Read,
    /// Data store.
    Write,
}

impl AccessType {
    /// Returns `true` for stores.
    pub const fn is_store(self) -> bool {
        matches!(self, Self::Write)
    }
}
