use std::str::FromStr;

use serde::{Deserialize, Serialize};
use skmis_core::AppError;

/// Lifecycle status carried by every managed record.
///
/// Which pair of statuses a collection uses is domain-dependent:
/// announcements move between `published` and `archived`, SK officials
/// between `active` and `not_active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Visible to the public.
    Published,
    /// Saved but not yet published.
    Draft,
    /// Active account or listing.
    Active,
    /// Deactivated account or listing.
    NotActive,
    /// Soft-deleted.
    Archived,
}

impl RecordStatus {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Draft => "draft",
            Self::Active => "active",
            Self::NotActive => "not_active",
            Self::Archived => "archived",
        }
    }

    /// Returns whether the status is a soft-deleted state.
    #[must_use]
    pub fn is_archived(&self) -> bool {
        matches!(self, Self::Archived | Self::NotActive)
    }
}

impl FromStr for RecordStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "published" => Ok(Self::Published),
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "not_active" => Ok(Self::NotActive),
            "archived" => Ok(Self::Archived),
            _ => Err(AppError::Validation(format!(
                "unknown record status '{value}'"
            ))),
        }
    }
}

/// Lifecycle transition an operator can request on one or many records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordAction {
    /// Soft-delete a live record.
    Archive,
    /// Undo a soft delete.
    Restore,
    /// Permanently remove a soft-deleted record.
    Delete,
}

impl RecordAction {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::Restore => "restore",
            Self::Delete => "delete",
        }
    }

    /// Returns the path segment used by bulk endpoints.
    #[must_use]
    pub fn bulk_path(&self) -> &'static str {
        match self {
            Self::Archive => "bulk-archive",
            Self::Restore => "bulk-restore",
            Self::Delete => "bulk-delete",
        }
    }

    /// Returns whether a record in `status` may undergo this transition.
    #[must_use]
    pub fn is_eligible(&self, status: RecordStatus) -> bool {
        match self {
            Self::Archive => !status.is_archived(),
            Self::Restore | Self::Delete => status.is_archived(),
        }
    }

    /// Returns the present-tense verb shown on confirmation buttons.
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Archive => "Archive",
            Self::Restore => "Restore",
            Self::Delete => "Delete",
        }
    }

    /// Returns the past-tense verb used in notifications.
    #[must_use]
    pub fn past_tense(&self) -> &'static str {
        match self {
            Self::Archive => "archived",
            Self::Restore => "restored",
            Self::Delete => "deleted",
        }
    }
}

impl FromStr for RecordAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "archive" => Ok(Self::Archive),
            "restore" => Ok(Self::Restore),
            "delete" => Ok(Self::Delete),
            _ => Err(AppError::Validation(format!(
                "unknown record action '{value}'"
            ))),
        }
    }
}
