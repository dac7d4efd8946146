use std::fmt;

/// Handle assigned to each registered group.
///
/// Handles are never reused within a run, so a handle to a removed group
/// stays invalid even after new groups are added.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupHandle(u32);

impl GroupHandle {
    pub(crate) fn new(id: u32) -> Self {
        Self(id)
    }

    /// Return the raw id backing this handle.
    #[inline]
    pub fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for GroupHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group#{}", self.0)
    }
}
