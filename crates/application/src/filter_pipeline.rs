use std::collections::BTreeMap;

use skmis_domain::ManagedRecord;

/// Sentinel used by list screens for "no filter".
pub const ALL_SENTINEL: &str = "all";

/// Value of one categorical filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FilterValue {
    /// Filter disabled.
    #[default]
    All,
    /// Exact-match filter value.
    Exact(String),
}

impl FilterValue {
    /// Parses a transport value; blank input and the `all` sentinel disable the filter.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_SENTINEL) {
            Self::All
        } else {
            Self::Exact(trimmed.to_owned())
        }
    }

    /// Returns the exact-match value, if the filter is active.
    #[must_use]
    pub fn as_exact(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Exact(value) => Some(value.as_str()),
        }
    }

    fn admits(&self, value: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Exact(expected) => value == Some(expected.as_str()),
        }
    }
}

/// Active search text and categorical selections of one list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Free-text search, matched case-insensitively as a substring.
    ///
    /// Surrounding whitespace is part of the query; a blank query is inactive.
    pub search_query: String,
    /// Primary category filter.
    pub category: FilterValue,
    /// Lifecycle status filter, compared against the status transport value.
    pub status: FilterValue,
    /// Domain-specific facet filters keyed by facet name.
    pub facets: BTreeMap<String, FilterValue>,
}

impl FilterState {
    /// Returns whether every filter is at its sentinel.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.search_query.trim().is_empty()
            && self.category == FilterValue::All
            && self.status == FilterValue::All
            && self.facets.values().all(|value| *value == FilterValue::All)
    }

    /// Returns active facet filters in name order.
    pub fn active_facets(&self) -> impl Iterator<Item = (&str, &str)> {
        self.facets
            .iter()
            .filter_map(|(name, value)| value.as_exact().map(|value| (name.as_str(), value)))
    }
}

/// Returns whether `record` passes every active filter.
#[must_use]
pub fn matches_filters<R: ManagedRecord>(record: &R, filters: &FilterState) -> bool {
    let query = filters.search_query.to_lowercase();
    if !query.trim().is_empty()
        && !record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(query.as_str()))
    {
        return false;
    }

    if !filters.category.admits(record.category()) {
        return false;
    }

    if !filters.status.admits(Some(record.status().as_str())) {
        return false;
    }

    filters
        .facets
        .iter()
        .all(|(name, value)| value.admits(record.facet(name).as_deref()))
}

/// Applies search, category, status and facet filters conjunctively.
///
/// Output preserves input order.
#[must_use]
pub fn apply_filters<'a, R: ManagedRecord>(records: &'a [R], filters: &FilterState) -> Vec<&'a R> {
    records
        .iter()
        .filter(|record| matches_filters(*record, filters))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;
    use skmis_core::RecordId;
    use skmis_domain::{DirectoryEntry, ManagedRecord, RecordStatus};

    use super::{FilterState, FilterValue, apply_filters};

    fn entry(id: u64, name: &str, status: RecordStatus, category: &str) -> DirectoryEntry {
        DirectoryEntry {
            id: RecordId::new(id),
            name: name.to_owned(),
            role: "Kagawad".to_owned(),
            email: format!("user{id}@sk.gov.ph"),
            phone: format!("0917000{id:04}"),
            category: Some(category.to_owned()),
            station: None,
            status,
        }
    }

    fn ids(records: &[&DirectoryEntry]) -> Vec<u64> {
        records.iter().map(|record| record.id().value()).collect()
    }

    #[test]
    fn all_sentinel_and_blank_parse_to_all() {
        assert_eq!(FilterValue::parse("all"), FilterValue::All);
        assert_eq!(FilterValue::parse(" ALL "), FilterValue::All);
        assert_eq!(FilterValue::parse(""), FilterValue::All);
        assert_eq!(
            FilterValue::parse("archived"),
            FilterValue::Exact("archived".to_owned())
        );
    }

    #[test]
    fn status_filter_keeps_input_order() {
        let records = vec![
            entry(1, "A", RecordStatus::Published, "federation"),
            entry(2, "B", RecordStatus::Archived, "federation"),
            entry(3, "C", RecordStatus::Published, "federation"),
        ];
        let filters = FilterState {
            status: FilterValue::parse("published"),
            ..FilterState::default()
        };

        assert_eq!(ids(&apply_filters(&records, &filters)), vec![1, 3]);
    }

    #[test]
    fn search_is_case_insensitive_substring_over_any_field() {
        let records = vec![
            entry(1, "Maria Santos", RecordStatus::Published, "federation"),
            entry(2, "Juan Dela Cruz", RecordStatus::Published, "federation"),
        ];
        let filters = FilterState {
            search_query: "maria".to_owned(),
            ..FilterState::default()
        };
        assert_eq!(ids(&apply_filters(&records, &filters)), vec![1]);

        let by_phone = FilterState {
            search_query: "0002".to_owned(),
            ..FilterState::default()
        };
        assert_eq!(ids(&apply_filters(&records, &by_phone)), vec![2]);
    }

    #[test]
    fn search_whitespace_is_significant() {
        let records = vec![
            entry(1, "Maria Santos", RecordStatus::Published, "federation"),
            entry(2, "Ana Maria", RecordStatus::Published, "federation"),
        ];
        let trailing = FilterState {
            search_query: "maria ".to_owned(),
            ..FilterState::default()
        };
        assert_eq!(ids(&apply_filters(&records, &trailing)), vec![1]);

        let leading = FilterState {
            search_query: " maria".to_owned(),
            ..FilterState::default()
        };
        assert_eq!(ids(&apply_filters(&records, &leading)), vec![2]);
    }

    #[test]
    fn filters_are_conjunctive() {
        let records = vec![
            entry(1, "Maria Santos", RecordStatus::Published, "federation"),
            entry(2, "Maria Reyes", RecordStatus::Published, "barangay"),
            entry(3, "Maria Lim", RecordStatus::Archived, "barangay"),
        ];
        let filters = FilterState {
            search_query: "MARIA".to_owned(),
            category: FilterValue::parse("barangay"),
            status: FilterValue::parse("published"),
            facets: BTreeMap::new(),
        };

        assert_eq!(ids(&apply_filters(&records, &filters)), vec![2]);
    }

    #[test]
    fn unknown_facet_filter_excludes_records_without_the_facet() {
        let records = vec![entry(1, "A", RecordStatus::Published, "federation")];
        let mut filters = FilterState::default();
        filters
            .facets
            .insert("barangay".to_owned(), FilterValue::parse("Poblacion"));

        assert!(apply_filters(&records, &filters).is_empty());
    }

    proptest! {
        #[test]
        fn sentinel_filters_are_identity(statuses in prop::collection::vec(0_u8..3, 0..40)) {
            let records: Vec<DirectoryEntry> = statuses
                .iter()
                .enumerate()
                .map(|(index, status)| {
                    let status = match status {
                        0 => RecordStatus::Published,
                        1 => RecordStatus::Archived,
                        _ => RecordStatus::Draft,
                    };
                    entry(index as u64, "Name", status, "federation")
                })
                .collect();
            let mut filters = FilterState {
                search_query: "   ".to_owned(),
                category: FilterValue::parse("all"),
                status: FilterValue::All,
                facets: BTreeMap::new(),
            };
            filters.facets.insert("barangay".to_owned(), FilterValue::All);

            prop_assert!(filters.is_unfiltered());
            let filtered = apply_filters(&records, &filters);
            prop_assert_eq!(filtered.len(), records.len());
            for (left, right) in filtered.iter().zip(records.iter()) {
                prop_assert_eq!(*left, right);
            }
        }
    }
}
