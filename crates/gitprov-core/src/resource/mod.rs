//! Platform resources: issues, merge requests, commit views, tags and
//! releases

pub mod builder;
pub mod record;
pub mod release;

pub use builder::ResourceHistoryBuilder;
pub use record::{Annotation, AnnotationBody, CommitLink, ResourceRecord};
pub use release::{AssetRecord, EvidenceRecord, ReleaseHistoryBuilder, ReleaseRecord, TagRecord};
