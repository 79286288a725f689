use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use skmis_core::RecordId;

use crate::{ManagedRecord, RecordStatus, TermStatus, age_on, is_sk_official_eligible};

/// Registered SK official account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkOfficial {
    /// Backend identifier.
    pub id: RecordId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Council position such as `chairperson`, `kagawad` or `treasurer`.
    #[serde(default)]
    pub position: Option<String>,
    /// Barangay station the official serves.
    #[serde(default)]
    pub barangay: Option<String>,
    /// Birth date, used for eligibility checks.
    #[serde(default)]
    pub birthdate: Option<NaiveDate>,
    /// Last day of the official's term.
    #[serde(default)]
    pub term_end: Option<NaiveDate>,
    /// Account status.
    pub status: RecordStatus,
}

impl SkOfficial {
    /// Returns `first last` for display.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

impl ManagedRecord for SkOfficial {
    const RESOURCE: &'static str = "sk-officials";
    const LABEL: &'static str = "SK official";
    const LIVE_STATUS: RecordStatus = RecordStatus::Active;
    const ARCHIVED_STATUS: RecordStatus = RecordStatus::NotActive;

    fn id(&self) -> RecordId {
        self.id
    }

    fn status(&self) -> RecordStatus {
        self.status
    }

    fn set_status(&mut self, status: RecordStatus) {
        self.status = status;
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Owned(self.display_name()),
            Cow::Borrowed(self.email.as_str()),
            Cow::Borrowed(self.position.as_deref().unwrap_or_default()),
        ]
    }

    fn category(&self) -> Option<&str> {
        self.position.as_deref()
    }

    fn facet(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "barangay" => self.barangay.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }

    fn station(&self) -> Option<&str> {
        self.barangay.as_deref()
    }

    /// Flags terms nearing or past their end and officials outside the
    /// eligible age window.
    fn tags(&self, now: DateTime<Utc>) -> Vec<&'static str> {
        let today = now.date_naive();
        let mut tags = Vec::new();

        if let Some(term_end) = self.term_end {
            match TermStatus::on(term_end, today) {
                TermStatus::Active => {}
                status => tags.push(status.as_str()),
            }
        }

        if let Some(age) = self.birthdate.and_then(|birthdate| age_on(birthdate, today))
            && !is_sk_official_eligible(age)
        {
            tags.push("age_ineligible");
        }

        tags
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use skmis_core::RecordId;

    use super::SkOfficial;
    use crate::{ManagedRecord, RecordStatus};

    fn official(birthdate: Option<NaiveDate>, term_end: Option<NaiveDate>) -> SkOfficial {
        SkOfficial {
            id: RecordId::new(2),
            first_name: "Jose".to_owned(),
            last_name: "Rizal".to_owned(),
            email: "jose@example.ph".to_owned(),
            position: Some("kagawad".to_owned()),
            barangay: Some("Poblacion".to_owned()),
            birthdate,
            term_end,
            status: RecordStatus::Active,
        }
    }

    #[test]
    fn expiring_term_and_age_are_flagged() {
        let Some(now) = Utc.with_ymd_and_hms(2026, 11, 10, 0, 0, 0).single() else {
            panic!("valid timestamp");
        };
        let tagged = official(
            NaiveDate::from_ymd_opt(2000, 1, 1),
            NaiveDate::from_ymd_opt(2026, 11, 30),
        );
        assert_eq!(tagged.tags(now), vec!["expiring_soon", "age_ineligible"]);

        let clear = official(
            NaiveDate::from_ymd_opt(2005, 5, 5),
            NaiveDate::from_ymd_opt(2029, 6, 30),
        );
        assert!(clear.tags(now).is_empty());
        assert!(official(None, None).tags(now).is_empty());
    }
}
