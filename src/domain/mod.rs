//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer does no I/O.

mod entity;
mod workspace;
mod ide;
mod history;
mod notification;
mod performance;
pub mod compat;

pub use entity::{Entity, DomainError, DomainResult};
pub use workspace::{Workspace, PageDescriptor};
pub use ide::IdeEntry;
pub use history::HistoryEntry;
pub use notification::{Notification, NotificationKind};
pub use performance::PerformanceSample;
pub use compat::{CompatibilityData, CompatibleIde, RepoRef};
