//! Workspace Synchronization
//!
//! Last-write-wins reconciliation of the in-memory workspace collection with
//! the synced store.

mod clock;
mod index;
mod merge;
mod synchronizer;

pub use clock::{Clock, SystemClock};
pub use index::WorkspaceIndex;
pub use merge::merge_workspaces;
pub use synchronizer::{SaveOutcome, SyncReport, WorkspaceSynchronizer};
