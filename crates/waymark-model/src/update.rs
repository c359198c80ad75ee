#![forbid(unsafe_code)]

//! The update protocol shared by models and presenters.

use core::fmt;

/// How much of the UI a model notification invalidates.
///
/// Every [`Observable`](crate::Observable) notification carries one of
/// these. The kind is chosen by whoever triggers the mutation, because only
/// the caller knows how the change should ripple: a favorite toggle redraws
/// one row, a filter switch redraws the whole board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateKind {
    /// A model finished its initial load successfully.
    Init,
    /// A model could not complete its initial load.
    InitFailed,
    /// One waypoint changed in place. Refresh that row only.
    Patch,
    /// The list contents changed. Rebuild the list, keep the filter.
    Minor,
    /// Everything derived from the filter is stale. Rebuild the board.
    Major,
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpdateKind::Init => "init",
            UpdateKind::InitFailed => "init-failed",
            UpdateKind::Patch => "patch",
            UpdateKind::Minor => "minor",
            UpdateKind::Major => "major",
        };
        f.write_str(name)
    }
}

/// Where a remote model stands with its initial load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitStatus {
    /// `init()` has not finished yet.
    #[default]
    Pending,
    /// The remote data is cached and usable.
    Ready,
    /// The load failed; the cache is empty and stays so.
    Failed,
}

impl InitStatus {
    /// True once the load has concluded, either way.
    #[must_use]
    pub fn is_settled(self) -> bool {
        !matches!(self, InitStatus::Pending)
    }
}
