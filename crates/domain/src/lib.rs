//! Domain records and invariants for the SK administrative collections.

#![forbid(unsafe_code)]

mod access;
mod announcement;
mod award;
mod bookmark;
mod directory;
mod eligibility;
mod profile;
mod record;
mod sk_official;
mod status;
mod template;

pub use access::{can_author, can_manage};
pub use announcement::Announcement;
pub use award::Award;
pub use bookmark::{BookmarkTag, BookmarkThresholds};
pub use directory::DirectoryEntry;
pub use eligibility::{
    TERM_EXPIRY_WARNING_DAYS, TermStatus, YouthClassification, age_on, is_sk_official_eligible,
};
pub use profile::YouthProfile;
pub use record::ManagedRecord;
pub use sk_official::SkOfficial;
pub use status::{RecordAction, RecordStatus};
pub use template::DocumentTemplate;
