//! Document composition
//!
//! Operations over whole documents. Each one leaves its inputs untouched and
//! returns a new document.
//!
//! - [`combine`]: union of documents from separate runs
//! - [`merge_duplicate_agents`]: collapse agents the operator declared to be
//!   the same person
//! - [`pseudonymize`]: replace identifying agent data with salted digests

pub mod alias;
pub mod combine;
pub mod pseudonym;

pub use alias::merge_duplicate_agents;
pub use combine::combine;
pub use pseudonym::pseudonymize;
