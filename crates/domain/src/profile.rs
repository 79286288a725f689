use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use skmis_core::RecordId;

use crate::{ManagedRecord, RecordStatus, YouthClassification, age_on};

/// Katipunan ng Kabataan (KK) youth profile gathered during barangay profiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YouthProfile {
    /// Backend identifier.
    pub id: RecordId,
    /// Given name.
    pub first_name: String,
    /// Middle name, often blank.
    #[serde(default)]
    pub middle_name: String,
    /// Family name.
    pub last_name: String,
    /// Birth date.
    #[serde(default)]
    pub birthdate: Option<NaiveDate>,
    /// Self-reported gender.
    #[serde(default)]
    pub gender: Option<String>,
    /// Home barangay.
    #[serde(default)]
    pub barangay: Option<String>,
    /// KK age classification as recorded by the profiler.
    #[serde(default)]
    pub youth_classification: Option<String>,
    /// Lifecycle status.
    pub status: RecordStatus,
}

impl YouthProfile {
    /// Returns the composite name key: first, middle and last name joined by
    /// single spaces, lower-cased, with blank parts skipped.
    #[must_use]
    pub fn full_name_key(&self) -> String {
        [
            self.first_name.as_str(),
            self.middle_name.as_str(),
            self.last_name.as_str(),
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
    }
}

impl ManagedRecord for YouthProfile {
    const RESOURCE: &'static str = "profiles";
    const LABEL: &'static str = "youth profile";

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
        vec![Cow::Owned(self.full_name_key())]
    }

    fn facet(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "barangay" => self.barangay.as_deref().map(Cow::Borrowed),
            "gender" => self.gender.as_deref().map(Cow::Borrowed),
            "youth_classification" => self.youth_classification.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }

    fn station(&self) -> Option<&str> {
        self.barangay.as_deref()
    }

    /// Tags the age bracket derived from the birthdate.
    fn tags(&self, now: DateTime<Utc>) -> Vec<&'static str> {
        self.birthdate
            .and_then(|birthdate| age_on(birthdate, now.date_naive()))
            .and_then(YouthClassification::from_age)
            .map(|classification| vec![classification.as_str()])
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use skmis_core::RecordId;

    use super::YouthProfile;
    use crate::{ManagedRecord, RecordStatus};

    fn profile(first: &str, middle: &str, last: &str) -> YouthProfile {
        YouthProfile {
            id: RecordId::new(1),
            first_name: first.to_owned(),
            middle_name: middle.to_owned(),
            last_name: last.to_owned(),
            birthdate: None,
            gender: None,
            barangay: None,
            youth_classification: None,
            status: RecordStatus::Active,
        }
    }

    #[test]
    fn full_name_key_skips_blank_middle_name() {
        assert_eq!(profile(" Maria ", "", "Santos").full_name_key(), "maria santos");
    }

    #[test]
    fn full_name_key_lowercases_every_part() {
        assert_eq!(
            profile("Juan", "Dela", "CRUZ").full_name_key(),
            "juan dela cruz"
        );
    }

    #[test]
    fn age_bracket_is_derived_from_birthdate() {
        let Some(now) = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).single() else {
            panic!("valid timestamp");
        };
        let mut youth = profile("Ana", "", "Reyes");
        youth.birthdate = NaiveDate::from_ymd_opt(2010, 1, 15);
        assert_eq!(youth.tags(now), vec!["child_youth"]);

        youth.birthdate = NaiveDate::from_ymd_opt(1990, 1, 15);
        assert!(youth.tags(now).is_empty());

        youth.birthdate = None;
        assert!(youth.tags(now).is_empty());
    }
}
