use std::collections::BTreeSet;
use std::str::FromStr;

use skmis_core::{AppError, RecordId};
use skmis_domain::{ManagedRecord, RecordAction};

/// Which ids count as "visible" for select-all and eviction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionScope {
    /// Only the current page; navigating away drops the selection.
    #[default]
    Page,
    /// Every record matching the active filters, across pages.
    Filtered,
}

impl SelectionScope {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Filtered => "filtered",
        }
    }
}

impl FromStr for SelectionScope {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "page" => Ok(Self::Page),
            "filtered" => Ok(Self::Filtered),
            _ => Err(AppError::Validation(format!(
                "unknown selection scope '{value}'"
            ))),
        }
    }
}

/// Display state of the "select all" checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    /// No visible id is selected.
    Unchecked,
    /// Some but not all visible ids are selected.
    Indeterminate,
    /// Every visible id is selected.
    Checked,
}

/// Set of selected record ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<RecordId>,
}

impl SelectionSet {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    /// Returns selected ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.ids.iter().copied()
    }

    /// Flips membership of `id`; returns whether it is now selected.
    pub fn toggle(&mut self, id: RecordId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Select-all checkbox handler.
    ///
    /// When every visible id is already selected the visible ids are removed;
    /// otherwise the visible ids are added to the existing selection.
    pub fn toggle_all(&mut self, visible: &[RecordId]) {
        if self.is_all_selected(visible) {
            for id in visible {
                self.ids.remove(id);
            }
        } else {
            self.ids.extend(visible.iter().copied());
        }
    }

    /// Clears the selection.
    pub fn select_none(&mut self) {
        self.ids.clear();
    }

    /// Returns whether every visible id is selected; false for an empty view.
    #[must_use]
    pub fn is_all_selected(&self, visible: &[RecordId]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.ids.contains(id))
    }

    /// Derives the select-all checkbox state for the visible ids.
    #[must_use]
    pub fn state(&self, visible: &[RecordId]) -> SelectAllState {
        if self.is_all_selected(visible) {
            SelectAllState::Checked
        } else if visible.iter().any(|id| self.ids.contains(id)) {
            SelectAllState::Indeterminate
        } else {
            SelectAllState::Unchecked
        }
    }

    /// Evicts ids that are no longer visible; returns how many were dropped.
    pub fn retain_visible(&mut self, visible: &[RecordId]) -> usize {
        let before = self.ids.len();
        let visible: BTreeSet<RecordId> = visible.iter().copied().collect();
        self.ids.retain(|id| visible.contains(id));
        before - self.ids.len()
    }
}

/// Selected ids partitioned by which bulk transition they are eligible for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkEligibility {
    /// Selected live records.
    pub archivable: Vec<RecordId>,
    /// Selected archived records.
    pub restorable: Vec<RecordId>,
    /// Selected archived records that may be permanently removed.
    pub deletable: Vec<RecordId>,
}

impl BulkEligibility {
    /// Partitions the selection using the live status of each record.
    ///
    /// Selected ids missing from `records` are ignored.
    #[must_use]
    pub fn partition<R: ManagedRecord>(selection: &SelectionSet, records: &[R]) -> Self {
        let mut eligibility = Self::default();
        for record in records.iter().filter(|record| selection.contains(record.id())) {
            let status = record.status();
            if RecordAction::Archive.is_eligible(status) {
                eligibility.archivable.push(record.id());
            }
            if RecordAction::Restore.is_eligible(status) {
                eligibility.restorable.push(record.id());
            }
            if RecordAction::Delete.is_eligible(status) {
                eligibility.deletable.push(record.id());
            }
        }

        eligibility.archivable.sort_unstable();
        eligibility.restorable.sort_unstable();
        eligibility.deletable.sort_unstable();
        eligibility
    }

    /// Returns the ids eligible for `action`.
    #[must_use]
    pub fn for_action(&self, action: RecordAction) -> &[RecordId] {
        match action {
            RecordAction::Archive => &self.archivable,
            RecordAction::Restore => &self.restorable,
            RecordAction::Delete => &self.deletable,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use skmis_core::RecordId;
    use skmis_domain::{Announcement, RecordAction, RecordStatus};

    use super::{BulkEligibility, SelectAllState, SelectionSet};

    fn ids(values: &[u64]) -> Vec<RecordId> {
        values.iter().copied().map(RecordId::new).collect()
    }

    fn announcement(id: u64, status: RecordStatus) -> Announcement {
        Announcement {
            id: RecordId::new(id),
            title: format!("Notice {id}"),
            content: String::new(),
            category: None,
            status,
            is_pinned: false,
            station: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn toggle_drives_checkbox_state() {
        let visible = ids(&[1, 2]);
        let mut selection = SelectionSet::new();
        assert_eq!(selection.state(&visible), SelectAllState::Unchecked);

        assert!(selection.toggle(RecordId::new(1)));
        assert_eq!(selection.state(&visible), SelectAllState::Indeterminate);

        selection.toggle(RecordId::new(2));
        assert_eq!(selection.state(&visible), SelectAllState::Checked);

        assert!(!selection.toggle(RecordId::new(1)));
        assert_eq!(selection.state(&visible), SelectAllState::Indeterminate);
    }

    #[test]
    fn toggle_all_unions_then_clears_only_visible() {
        let mut selection = SelectionSet::new();
        selection.toggle(RecordId::new(9));
        let visible = ids(&[1, 2, 3]);

        selection.toggle_all(&visible);
        assert_eq!(selection.len(), 4);

        selection.toggle_all(&visible);
        assert_eq!(selection.ids().collect::<Vec<_>>(), ids(&[9]));
    }

    #[test]
    fn empty_view_is_never_all_selected() {
        let selection = SelectionSet::new();
        assert!(!selection.is_all_selected(&[]));
        assert_eq!(selection.state(&[]), SelectAllState::Unchecked);
    }

    #[test]
    fn retain_visible_evicts_hidden_ids() {
        let mut selection = SelectionSet::new();
        selection.toggle_all(&ids(&[1, 2, 3]));
        assert_eq!(selection.retain_visible(&ids(&[2])), 2);
        assert_eq!(selection.ids().collect::<Vec<_>>(), ids(&[2]));
    }

    #[test]
    fn bulk_archive_excludes_already_archived_records() {
        let records = vec![
            announcement(1, RecordStatus::Published),
            announcement(2, RecordStatus::Archived),
            announcement(3, RecordStatus::Published),
        ];
        let mut selection = SelectionSet::new();
        selection.toggle_all(&ids(&[1, 2, 3]));

        let eligibility = BulkEligibility::partition(&selection, &records);
        assert_eq!(eligibility.for_action(RecordAction::Archive), ids(&[1, 3]).as_slice());
        assert_eq!(eligibility.for_action(RecordAction::Restore), ids(&[2]).as_slice());
        assert_eq!(eligibility.for_action(RecordAction::Delete), ids(&[2]).as_slice());
    }

    proptest! {
        #[test]
        fn double_select_all_restores_disjoint_selection(
            selected in prop::collection::btree_set(100_u64..200, 0..10),
            visible in prop::collection::btree_set(0_u64..50, 1..20),
        ) {
            let mut selection = SelectionSet::new();
            for id in &selected {
                selection.toggle(RecordId::new(*id));
            }
            let before = selection.clone();
            let visible: Vec<RecordId> = visible.into_iter().map(RecordId::new).collect();

            selection.toggle_all(&visible);
            prop_assert!(selection.is_all_selected(&visible));
            selection.toggle_all(&visible);
            prop_assert_eq!(selection, before);
        }
    }
}
