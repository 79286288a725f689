use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days before term end at which a term is reported as expiring.
pub const TERM_EXPIRY_WARNING_DAYS: i64 = 30;

/// Returns the age in whole years on `today`, or `None` for a future birthdate.
#[must_use]
pub fn age_on(birthdate: NaiveDate, today: NaiveDate) -> Option<u32> {
    if birthdate > today {
        return None;
    }

    let mut years = today.year() - birthdate.year();
    if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
        years -= 1;
    }

    u32::try_from(years).ok()
}

/// Katipunan ng Kabataan age bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YouthClassification {
    /// Ages 15 to 17.
    ChildYouth,
    /// Ages 18 to 24.
    CoreYouth,
    /// Ages 25 to 30.
    YoungAdult,
}

impl YouthClassification {
    /// Classifies an age, returning `None` outside the 15 to 30 youth range.
    #[must_use]
    pub fn from_age(age: u32) -> Option<Self> {
        match age {
            15..=17 => Some(Self::ChildYouth),
            18..=24 => Some(Self::CoreYouth),
            25..=30 => Some(Self::YoungAdult),
            _ => None,
        }
    }

    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChildYouth => "child_youth",
            Self::CoreYouth => "core_youth",
            Self::YoungAdult => "young_adult",
        }
    }
}

/// Returns whether someone of `age` may hold an elected SK post.
#[must_use]
pub fn is_sk_official_eligible(age: u32) -> bool {
    (18..=24).contains(&age)
}

/// Standing of an official's term relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermStatus {
    /// More than the warning window remains.
    Active,
    /// Ends within the warning window.
    ExpiringSoon,
    /// Already ended.
    Expired,
}

impl TermStatus {
    /// Derives the term status on `today` for a term ending on `term_end`.
    #[must_use]
    pub fn on(term_end: NaiveDate, today: NaiveDate) -> Self {
        if today > term_end {
            return Self::Expired;
        }

        if (term_end - today).num_days() <= TERM_EXPIRY_WARNING_DAYS {
            Self::ExpiringSoon
        } else {
            Self::Active
        }
    }

    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::ExpiringSoon => "expiring_soon",
            Self::Expired => "expired",
        }
    }
}
