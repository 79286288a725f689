use skmis_core::{CurrentUser, Role};

use crate::ManagedRecord;

/// Returns whether the operator may create records at all.
#[must_use]
pub fn can_author(user: &CurrentUser) -> bool {
    !matches!(user.role(), Role::Viewer)
}

/// Returns whether the operator may edit, archive, restore or delete `record`.
///
/// Administrators manage everything. SK chairpersons and officials manage
/// records of their own station plus records not scoped to any station.
#[must_use]
pub fn can_manage<R: ManagedRecord>(user: &CurrentUser, record: &R) -> bool {
    match user.role() {
        Role::Admin => true,
        Role::Viewer => false,
        Role::SkChairperson | Role::SkOfficial => match (record.station(), user.station()) {
            (None, _) => true,
            (Some(record_station), Some(user_station)) => record_station
                .trim()
                .eq_ignore_ascii_case(user_station.trim()),
            (Some(_), None) => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use skmis_core::{CurrentUser, RecordId, Role};

    use super::{can_author, can_manage};
    use crate::{Award, RecordStatus};

    fn award(station: Option<&str>) -> Award {
        Award {
            id: RecordId::new(7),
            title: "Outstanding Youth Leader".to_owned(),
            description: String::new(),
            recipient: "Maria Santos".to_owned(),
            category: Some("leadership".to_owned()),
            awarded_on: None,
            station: station.map(str::to_owned),
            status: RecordStatus::Published,
        }
    }

    #[test]
    fn admin_manages_any_station() {
        let admin = CurrentUser::new(Role::Admin, None);
        assert!(can_manage(&admin, &award(Some("Poblacion"))));
    }

    #[test]
    fn chairperson_manages_only_own_station() {
        let chair = CurrentUser::new(Role::SkChairperson, Some("poblacion".to_owned()));
        assert!(can_manage(&chair, &award(Some("Poblacion"))));
        assert!(!can_manage(&chair, &award(Some("San Isidro"))));
        assert!(can_manage(&chair, &award(None)));
    }

    #[test]
    fn official_without_station_cannot_manage_scoped_award() {
        let official = CurrentUser::new(Role::SkOfficial, None);
        assert!(!can_manage(&official, &award(Some("Poblacion"))));
    }

    #[test]
    fn viewer_is_read_only() {
        let viewer = CurrentUser::new(Role::Viewer, Some("Poblacion".to_owned()));
        assert!(!can_author(&viewer));
        assert!(!can_manage(&viewer, &award(Some("Poblacion"))));
    }
}
