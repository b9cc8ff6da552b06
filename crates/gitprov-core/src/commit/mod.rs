//! Git history: commit records and the builder turning them into file
//! version chains

pub mod builder;
pub mod record;

pub use builder::CommitHistoryBuilder;
pub use record::{ChangeKind, ChangeRecord, CommitRecord};
