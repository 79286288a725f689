use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// Administrative role held by the signed-in operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Municipal administrator with access to every station.
    Admin,
    /// SK chairperson scoped to one barangay station.
    SkChairperson,
    /// SK council member scoped to one barangay station.
    SkOfficial,
    /// Read-only operator.
    Viewer,
}

impl Role {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::SkChairperson => "sk_chairperson",
            Self::SkOfficial => "sk_official",
            Self::Viewer => "viewer",
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "sk_chairperson" | "skchairperson" => Ok(Self::SkChairperson),
            "sk_official" | "skofficial" => Ok(Self::SkOfficial),
            "viewer" => Ok(Self::Viewer),
            _ => Err(AppError::Validation(format!("unknown role '{value}'"))),
        }
    }
}

/// Capability object describing the operator on whose behalf actions run.
///
/// Passed explicitly into permission checks instead of being read from
/// ambient state, so policy predicates stay deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    role: Role,
    station: Option<String>,
}

impl CurrentUser {
    /// Creates a user capability, dropping a blank station.
    #[must_use]
    pub fn new(role: Role, station: Option<String>) -> Self {
        Self {
            role,
            station: station.and_then(|value| {
                let trimmed = value.trim().to_owned();
                (!trimmed.is_empty()).then_some(trimmed)
            }),
        }
    }

    /// Returns the operator role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the station (barangay) the operator is assigned to.
    #[must_use]
    pub fn station(&self) -> Option<&str> {
        self.station.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::{CurrentUser, Role};

    #[test]
    fn role_accepts_legacy_spelling() {
        assert!(matches!(
            "SKChairperson".parse::<Role>(),
            Ok(Role::SkChairperson)
        ));
    }

    #[test]
    fn blank_station_is_dropped() {
        let user = CurrentUser::new(Role::SkOfficial, Some("  ".to_owned()));
        assert_eq!(user.station(), None);
    }
}
